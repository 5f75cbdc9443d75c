// Point model representing coordinates in 2D space

use crate::utils::distance::euclidean_distance;
use serde::{Deserialize, Serialize};

/// Tolerance under which two points count as the same place
pub const POINT_EPS: f64 = 1e-6;

/// Represents a location with (x, y) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance between two points
    pub fn distance_to(&self, other: &Point) -> f64 {
        euclidean_distance(self, other)
    }

    /// Whether two points lie within `POINT_EPS` of each other
    pub fn approx_eq(&self, other: &Point) -> bool {
        self.distance_to(other) < POINT_EPS
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}
