// Capacity-bounded, insertion-ordered parcel container

use crate::error::CargoError;
use crate::models::ParcelKey;
use std::collections::HashSet;

/// Holds parcel handles in the order they were loaded.
///
/// Iteration is oldest-first, so any batch taken from the front of the hold
/// is FIFO. Membership checks are O(1).
#[derive(Debug, Clone, Default)]
pub struct CargoHold {
    capacity: usize,
    order: Vec<ParcelKey>,
    members: HashSet<ParcelKey>,
}

impl CargoHold {
    /// Creates an empty hold accepting at most `capacity` parcels
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: Vec::with_capacity(capacity.min(64)),
            members: HashSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }

    pub fn contains(&self, parcel: ParcelKey) -> bool {
        self.members.contains(&parcel)
    }

    /// Appends a parcel; a full hold is left untouched
    pub fn load(&mut self, parcel: ParcelKey) -> Result<(), CargoError> {
        if self.is_full() {
            return Err(CargoError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if !self.members.insert(parcel) {
            return Err(CargoError::AlreadyLoaded);
        }
        self.order.push(parcel);
        Ok(())
    }

    /// Removes a parcel, keeping the remaining parcels in load order
    pub fn unload(&mut self, parcel: ParcelKey) -> Option<ParcelKey> {
        if !self.members.remove(&parcel) {
            return None;
        }
        let index = self.order.iter().position(|held| *held == parcel)?;
        Some(self.order.remove(index))
    }

    /// Point-in-time copy of the held parcels, oldest first
    pub fn snapshot(&self) -> Vec<ParcelKey> {
        self.order.clone()
    }

    /// Iterates the held parcels, oldest first
    pub fn iter(&self) -> impl Iterator<Item = ParcelKey> + '_ {
        self.order.iter().copied()
    }
}
