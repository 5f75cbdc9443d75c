// Transport unit model shared by the van and the courier

use crate::error::ConfigError;
use crate::models::{CargoHold, Cost, DeliveryLeg, Point};
use serde::{Deserialize, Serialize};

/// Which role a transport unit plays in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Van,
    Courier,
}

impl UnitKind {
    /// Fixed cost charged per unit of distance travelled
    pub fn cost_per_distance(self) -> Cost {
        match self {
            UnitKind::Van => 0.5,
            UnitKind::Courier => 1.5,
        }
    }
}

/// Movement status of a transport unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    #[default]
    Free,
    OnMove,
}

/// Destinations the courier is working towards; read by presentation only
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveryTargets {
    /// Drop-off point of the parcel being delivered right now
    pub current: Option<Point>,

    /// Drop-off point of the next parcel in the same batch
    pub next: Option<Point>,
}

/// A van or a courier: a moving, capacity-bounded cargo hold
#[derive(Debug, Clone)]
pub struct TransportUnit {
    kind: UnitKind,
    location: Point,
    speed: f64,
    hold: CargoHold,
    status: UnitStatus,

    /// Destination of the movement in flight, if any
    destination: Option<Point>,

    /// Only present on couriers
    targets: Option<DeliveryTargets>,
}

impl TransportUnit {
    /// Creates a unit of the given kind. `speed` must be positive and finite.
    pub fn new(
        kind: UnitKind,
        location: Point,
        capacity: usize,
        speed: f64,
    ) -> Result<Self, ConfigError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed { unit: kind, speed });
        }
        let targets = match kind {
            UnitKind::Courier => Some(DeliveryTargets::default()),
            UnitKind::Van => None,
        };
        Ok(Self {
            kind,
            location,
            speed,
            hold: CargoHold::new(capacity),
            status: UnitStatus::Free,
            destination: None,
            targets,
        })
    }

    /// Creates a delivery van
    pub fn van(location: Point, capacity: usize, speed: f64) -> Result<Self, ConfigError> {
        Self::new(UnitKind::Van, location, capacity, speed)
    }

    /// Creates a courier
    pub fn courier(location: Point, capacity: usize, speed: f64) -> Result<Self, ConfigError> {
        Self::new(UnitKind::Courier, location, capacity, speed)
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn capacity(&self) -> usize {
        self.hold.capacity()
    }

    pub fn cost_per_distance(&self) -> Cost {
        self.kind.cost_per_distance()
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    pub fn hold(&self) -> &CargoHold {
        &self.hold
    }

    pub(crate) fn hold_mut(&mut self) -> &mut CargoHold {
        &mut self.hold
    }

    /// Where the unit is heading while `OnMove`
    pub fn destination(&self) -> Option<Point> {
        self.destination
    }

    /// Courier's current drop-off point; always `None` for a van
    pub fn current_target(&self) -> Option<Point> {
        self.targets.and_then(|t| t.current)
    }

    /// Courier's queued drop-off point; always `None` for a van
    pub fn next_target(&self) -> Option<Point> {
        self.targets.and_then(|t| t.next)
    }

    /// Time and cost of this unit travelling from `from` to `to`
    pub fn leg(&self, from: &Point, to: &Point) -> DeliveryLeg {
        DeliveryLeg::between(self.speed, self.cost_per_distance(), from, to)
    }

    /// Time and cost of travelling from the current location to `to`
    pub fn leg_to(&self, to: &Point) -> DeliveryLeg {
        self.leg(&self.location, to)
    }

    pub(crate) fn set_targets(&mut self, current: Option<Point>, next: Option<Point>) {
        if let Some(targets) = self.targets.as_mut() {
            targets.current = current;
            targets.next = next;
        }
    }

    pub(crate) fn clear_targets(&mut self) {
        self.set_targets(None, None);
    }

    pub(crate) fn begin_move(&mut self, destination: Point) {
        self.status = UnitStatus::OnMove;
        self.destination = Some(destination);
    }

    /// Lands the unit at its destination. Returns the new location, or
    /// `None` if nothing was in flight.
    pub(crate) fn complete_move(&mut self) -> Option<Point> {
        let destination = self.destination.take()?;
        self.location = destination;
        self.status = UnitStatus::Free;
        Some(destination)
    }

    /// Abandons any movement in flight, leaving the unit where it last was
    pub(crate) fn halt(&mut self) {
        self.destination = None;
        self.status = UnitStatus::Free;
    }
}
