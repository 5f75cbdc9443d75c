// Compare van/courier capacity combinations over the same parcel set

use crate::algorithms::chain::{run_to_completion, RunOutcome};
use crate::algorithms::driver::InstantDriver;
use crate::algorithms::events::NullObserver;
use crate::algorithms::network::DeliveryNetwork;
use crate::error::{RunError, SweepError};
use crate::models::{Cost, Time};
use crate::utils::config::ChainConfig;
use crate::utils::generator::ParcelSpec;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Result of draining the sorting center with one fleet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetOutcome {
    pub van_capacity: usize,
    pub courier_capacity: usize,

    /// Runs started until the center was empty or a run delivered nothing
    pub runs: usize,
    pub delivered: usize,
    pub undelivered: usize,

    /// Sum of per-parcel delivery costs
    pub total_cost: Cost,

    /// Sum of per-parcel delivery times
    pub total_time: Time,
}

impl FleetOutcome {
    pub fn cost_per_parcel(&self) -> Option<Cost> {
        (self.delivered > 0).then(|| self.total_cost / self.delivered as f64)
    }
}

/// Evaluates every (van capacity, courier capacity) pair in parallel.
///
/// Results come back in grid order: van capacities outer, courier inner.
pub fn sweep(
    base: &ChainConfig,
    parcels: &[ParcelSpec],
    van_capacities: &[usize],
    courier_capacities: &[usize],
) -> Result<Vec<FleetOutcome>, SweepError> {
    let grid: Vec<(usize, usize)> = van_capacities
        .iter()
        .flat_map(|&van| courier_capacities.iter().map(move |&courier| (van, courier)))
        .collect();

    grid.par_iter()
        .map(|&(van, courier)| evaluate(base, parcels, van, courier))
        .collect()
}

/// Drains the sorting center with a single fleet configuration
pub fn evaluate(
    base: &ChainConfig,
    parcels: &[ParcelSpec],
    van_capacity: usize,
    courier_capacity: usize,
) -> Result<FleetOutcome, SweepError> {
    let mut config = base.clone();
    config.van.capacity = van_capacity;
    config.courier.capacity = courier_capacity;

    let mut network = DeliveryNetwork::from_config(&config)?;
    for spec in parcels {
        spec.create_in(&mut network)?;
    }

    let mut outcome = FleetOutcome {
        van_capacity,
        courier_capacity,
        runs: 0,
        delivered: 0,
        undelivered: 0,
        total_cost: 0.0,
        total_time: 0.0,
    };

    let mut driver = InstantDriver::new();
    loop {
        let summary = match run_to_completion(&mut network, &mut driver, &mut NullObserver) {
            Ok(RunOutcome::Completed(summary)) => summary,
            Ok(RunOutcome::Cancelled) | Err(RunError::EmptyRunRejected) => break,
            Err(e) => return Err(e.into()),
        };
        outcome.runs += 1;
        outcome.delivered += summary.delivered.len();
        outcome.total_cost += summary.total_cost();
        outcome.total_time += summary.total_time();
        if summary.delivered.is_empty() {
            break;
        }
    }
    outcome.undelivered = network.parcel_count() - outcome.delivered;

    tracing::debug!(
        van_capacity,
        courier_capacity,
        runs = outcome.runs,
        delivered = outcome.delivered,
        "fleet configuration evaluated"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn specs(n: usize) -> Vec<ParcelSpec> {
        (1..=n)
            .map(|i| ParcelSpec {
                id: format!("PKG-{}", i),
                destination: Point::new(100.0 + i as f64 * 10.0, 300.0),
                weight: 1.0,
            })
            .collect()
    }

    #[test]
    fn test_evaluate_drains_center() {
        let outcome = evaluate(&ChainConfig::default(), &specs(5), 2, 1).unwrap();

        assert_eq!(outcome.runs, 3);
        assert_eq!(outcome.delivered, 5);
        assert_eq!(outcome.undelivered, 0);
        assert!(outcome.total_cost > 0.0);
    }

    #[test]
    fn test_evaluate_zero_van_capacity() {
        let outcome = evaluate(&ChainConfig::default(), &specs(3), 0, 2).unwrap();

        assert_eq!(outcome.runs, 1);
        assert_eq!(outcome.delivered, 0);
        assert_eq!(outcome.undelivered, 3);
        assert_eq!(outcome.cost_per_parcel(), None);
    }

    #[test]
    fn test_sweep_grid_order() {
        let outcomes = sweep(&ChainConfig::default(), &specs(4), &[1, 4], &[1, 2]).unwrap();
        let grid: Vec<(usize, usize)> = outcomes
            .iter()
            .map(|o| (o.van_capacity, o.courier_capacity))
            .collect();

        assert_eq!(grid, vec![(1, 1), (1, 2), (4, 1), (4, 2)]);
        assert!(outcomes.iter().all(|o| o.delivered == 4));
    }

    #[test]
    fn test_bigger_van_shares_van_leg() {
        // One van trip instead of four: the shared van leg is paid the same
        // per parcel, so totals match while fewer runs are needed.
        let small = evaluate(&ChainConfig::default(), &specs(4), 1, 2).unwrap();
        let large = evaluate(&ChainConfig::default(), &specs(4), 4, 2).unwrap();

        assert_eq!(small.runs, 4);
        assert_eq!(large.runs, 1);
        assert!((small.total_cost - large.total_cost).abs() < 1e-9);
    }
}
