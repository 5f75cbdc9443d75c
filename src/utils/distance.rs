// Distance calculation utilities

use crate::models::{Distance, Point};

/// Calculate the Euclidean distance between two points
pub fn euclidean_distance(p1: &Point, p2: &Point) -> Distance {
    ((p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2)).sqrt()
}
