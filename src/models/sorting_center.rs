// Sorting center model: the origin buffer of the chain

use crate::models::{CargoHold, Point};

/// Stationary, capacity-bounded holding pool for parcels awaiting pickup
#[derive(Debug, Clone)]
pub struct SortingCenter {
    /// Where the van picks parcels up
    location: Point,

    /// Parcels currently held, oldest first
    hold: CargoHold,
}

impl SortingCenter {
    /// Creates an empty sorting center
    pub fn new(location: Point, capacity: usize) -> Self {
        Self {
            location,
            hold: CargoHold::new(capacity),
        }
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn capacity(&self) -> usize {
        self.hold.capacity()
    }

    pub fn hold(&self) -> &CargoHold {
        &self.hold
    }

    pub(crate) fn hold_mut(&mut self) -> &mut CargoHold {
        &mut self.hold
    }
}
