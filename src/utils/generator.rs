// Random parcel generation for demos, benches and sweeps

use crate::algorithms::network::DeliveryNetwork;
use crate::error::NetworkError;
use crate::models::{ParcelKey, Point};
use crate::utils::config::ParcelAreaConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Everything needed to create a parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelSpec {
    pub id: String,
    pub destination: Point,
    pub weight: f64,
}

impl ParcelSpec {
    /// Creates the described parcel in `network`'s sorting center
    pub fn create_in(&self, network: &mut DeliveryNetwork) -> Result<ParcelKey, NetworkError> {
        network.create_parcel(self.id.clone(), self.destination, self.weight)
    }
}

/// Produces parcels with sequential `PKG-<n>` ids and random destinations
/// and weights drawn from a configured area
#[derive(Debug, Clone)]
pub struct ParcelGenerator {
    rng: StdRng,
    area: ParcelAreaConfig,
    next_number: u32,
}

impl ParcelGenerator {
    /// Reproducible generator
    pub fn new(area: ParcelAreaConfig, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            area,
            next_number: 1,
        }
    }

    /// Generator seeded from system entropy
    pub fn from_entropy(area: ParcelAreaConfig) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            area,
            next_number: 1,
        }
    }

    /// Continue numbering from `number` (e.g. after parcels created elsewhere)
    pub fn starting_at(mut self, number: u32) -> Self {
        self.next_number = number;
        self
    }

    pub fn next_spec(&mut self) -> ParcelSpec {
        let area = &self.area;
        let x = self.rng.gen_range(area.min.x..area.max.x);
        let y = self.rng.gen_range(area.min.y..area.max.y);
        let weight = self.rng.gen_range(area.min_weight..area.max_weight);
        let id = format!("PKG-{}", self.next_number);
        self.next_number += 1;

        ParcelSpec {
            id,
            destination: Point::new(x, y),
            weight,
        }
    }

    pub fn specs(&mut self, count: usize) -> Vec<ParcelSpec> {
        (0..count).map(|_| self.next_spec()).collect()
    }
}
