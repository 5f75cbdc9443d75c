// Leg model: time and cost of one point-to-point traversal

use crate::models::{Cost, Point, Time};
use serde::{Deserialize, Serialize};

/// Time and cost of moving one transport unit between two points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveryLeg {
    /// Travel time (distance / speed)
    pub time: Time,

    /// Travel cost (distance * cost per distance)
    pub cost: Cost,
}

impl DeliveryLeg {
    /// Creates a leg from precomputed values
    pub fn new(time: Time, cost: Cost) -> Self {
        Self { time, cost }
    }

    /// Computes the leg for a unit moving at `speed` and charging
    /// `cost_per_distance` from `from` to `to`.
    ///
    /// `speed` must be positive; a zero-length leg is free regardless.
    pub fn between(speed: f64, cost_per_distance: Cost, from: &Point, to: &Point) -> Self {
        let distance = from.distance_to(to);
        if distance == 0.0 {
            return Self::default();
        }
        Self {
            time: distance / speed,
            cost: distance * cost_per_distance,
        }
    }

    /// Sum of two legs, as charged to a parcel carried over both
    pub fn combined(&self, other: &DeliveryLeg) -> DeliveryLeg {
        DeliveryLeg {
            time: self.time + other.time,
            cost: self.cost + other.cost,
        }
    }
}
