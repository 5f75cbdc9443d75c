//! Property-based tests for the delivery chain.
//!
//! Random fleets and parcel sets are driven step by step; after every step
//! the capacity, conservation and status-ordering invariants must hold.

use delivery_chain::algorithms::chain::{DeliveryRun, Progress};
use delivery_chain::algorithms::events::NullObserver;
use delivery_chain::algorithms::network::DeliveryNetwork;
use delivery_chain::error::RunError;
use delivery_chain::models::{ParcelKey, ParcelStatus, Point, SortingCenter, TransportUnit};
use proptest::prelude::*;
use std::collections::HashMap;

// ===========================================================================
// Generators
// ===========================================================================

#[derive(Debug, Clone)]
struct Scenario {
    center_capacity: usize,
    van_capacity: usize,
    courier_capacity: usize,
    destinations: Vec<(f64, f64)>,
}

fn arb_scenario() -> impl Strategy<Value = Scenario> {
    (1..20usize, 0..6usize, 0..4usize).prop_flat_map(|(center, van, courier)| {
        proptest::collection::vec((0.0..500.0f64, 0.0..500.0f64), 0..25).prop_map(
            move |destinations| Scenario {
                center_capacity: center,
                van_capacity: van,
                courier_capacity: courier,
                destinations,
            },
        )
    })
}

fn build(scenario: &Scenario) -> (DeliveryNetwork, Vec<ParcelKey>) {
    let mut network = DeliveryNetwork::new(
        SortingCenter::new(Point::new(50.0, 400.0), scenario.center_capacity),
        TransportUnit::van(Point::new(50.0, 50.0), scenario.van_capacity, 40.0).unwrap(),
        TransportUnit::courier(Point::new(450.0, 50.0), scenario.courier_capacity, 60.0)
            .unwrap(),
        Point::new(250.0, 250.0),
    );
    let mut keys = Vec::new();
    for (i, &(x, y)) in scenario.destinations.iter().enumerate() {
        // Parcels beyond the center's capacity are refused
        if let Ok(key) = network.create_parcel(format!("PKG-{}", i + 1), Point::new(x, y), 1.0) {
            keys.push(key);
        }
    }
    (network, keys)
}

// ===========================================================================
// Invariant checks
// ===========================================================================

fn check_invariants(
    network: &DeliveryNetwork,
    keys: &[ParcelKey],
    last_seen: &mut HashMap<ParcelKey, ParcelStatus>,
) -> Result<(), TestCaseError> {
    let center = network.center().hold();
    let van = network.van().hold();
    let courier = network.courier().hold();

    // Capacity
    prop_assert!(center.len() <= center.capacity());
    prop_assert!(van.len() <= van.capacity());
    prop_assert!(courier.len() <= courier.capacity());

    // Conservation
    let total: usize = network.status_counts().iter().map(|(_, n)| n).sum();
    prop_assert_eq!(total, keys.len());

    for &key in keys {
        let status = network.parcel(key).unwrap().status();

        // Monotonicity
        if let Some(previous) = last_seen.insert(key, status) {
            prop_assert!(previous <= status, "{:?} regressed to {:?}", previous, status);
        }

        // Each undelivered parcel sits in exactly the container its status names
        let holders = [center.contains(key), van.contains(key), courier.contains(key)];
        let expected = match status {
            ParcelStatus::InCenter => [true, false, false],
            ParcelStatus::InVan => [false, true, false],
            ParcelStatus::WithCourier => [false, false, true],
            ParcelStatus::Delivered => [false, false, false],
        };
        prop_assert_eq!(holders, expected);
    }
    Ok(())
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn invariants_hold_across_runs(scenario in arb_scenario()) {
        let (mut network, keys) = build(&scenario);
        let mut last_seen = HashMap::new();
        check_invariants(&network, &keys, &mut last_seen)?;

        for _ in 0..(keys.len() + 1) {
            let mut run = match DeliveryRun::start(&mut network) {
                Ok(run) => run,
                Err(RunError::EmptyRunRejected) => break,
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            };
            check_invariants(&network, &keys, &mut last_seen)?;

            let summary = loop {
                let progress = run.acknowledge_arrival(&mut network, &mut NullObserver)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                check_invariants(&network, &keys, &mut last_seen)?;
                if let Progress::Finished(summary) = progress {
                    break summary;
                }
            };

            // Nothing stays in flight once a run is done
            prop_assert!(network.courier().hold().is_empty());
            if scenario.courier_capacity > 0 {
                prop_assert!(network.van().hold().is_empty());
            }
            if summary.delivered.is_empty() {
                break;
            }
        }

        if scenario.van_capacity > 0 && scenario.courier_capacity > 0 {
            prop_assert_eq!(network.count_with_status(ParcelStatus::Delivered), keys.len());
        }
    }

    #[test]
    fn van_loads_oldest_parcels_first(
        n in 1..15usize,
        van_capacity in 1..15usize,
    ) {
        let scenario = Scenario {
            center_capacity: 20,
            van_capacity,
            courier_capacity: 2,
            destinations: (0..n).map(|i| (100.0 + i as f64, 100.0)).collect(),
        };
        let (mut network, keys) = build(&scenario);

        let mut run = DeliveryRun::start(&mut network)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        run.acknowledge_arrival(&mut network, &mut NullObserver)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let loaded = van_capacity.min(n);
        prop_assert_eq!(network.van().hold().snapshot(), keys[..loaded].to_vec());
        prop_assert_eq!(network.center().hold().snapshot(), keys[loaded..].to_vec());
    }

    #[test]
    fn delivered_charges_never_change(scenario in arb_scenario()) {
        let (mut network, keys) = build(&scenario);
        let mut charges: HashMap<ParcelKey, (f64, f64)> = HashMap::new();

        while let Ok(mut run) = DeliveryRun::start(&mut network) {
            let mut delivered_this_run = 0;
            loop {
                let progress = run.acknowledge_arrival(&mut network, &mut NullObserver)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                for &key in &keys {
                    let parcel = network.parcel(key).unwrap();
                    if parcel.is_delivered() {
                        let charge = (parcel.delivery_cost(), parcel.delivery_time());
                        match charges.get(&key) {
                            Some(previous) => {
                                prop_assert_eq!(*previous, charge);
                            }
                            None => {
                                charges.insert(key, charge);
                                delivered_this_run += 1;
                            }
                        }
                    } else {
                        prop_assert_eq!(parcel.delivery_cost(), 0.0);
                    }
                }
                if let Progress::Finished(_) = progress {
                    break;
                }
            }
            if delivered_this_run == 0 {
                break;
            }
        }
    }
}
