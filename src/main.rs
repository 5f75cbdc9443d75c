use delivery_chain::algorithms::chain::{run_to_completion, RunOutcome};
use delivery_chain::algorithms::driver::InstantDriver;
use delivery_chain::algorithms::events::ProgressEvent;
use delivery_chain::algorithms::network::DeliveryNetwork;
use delivery_chain::utils::config::ChainConfig;
use delivery_chain::utils::fleet_sweep::sweep;
use delivery_chain::utils::generator::ParcelGenerator;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let parcel_count = 7;

    // Load the scene, falling back to the demo defaults
    let config = match std::env::args().nth(1) {
        Some(path) => match ChainConfig::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                return;
            }
        },
        None => ChainConfig::default(),
    };

    let mut network = match DeliveryNetwork::from_config(&config) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return;
        }
    };

    // Optional second argument pins the parcel seed
    let mut generator = match std::env::args().nth(2) {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => ParcelGenerator::new(config.parcels.clone(), seed),
            Err(e) => {
                eprintln!("Invalid seed {}: {}", raw, e);
                return;
            }
        },
        None => ParcelGenerator::from_entropy(config.parcels.clone()),
    };
    let specs = generator.specs(parcel_count);
    for spec in &specs {
        if let Err(e) = spec.create_in(&mut network) {
            eprintln!("Failed to create parcels: {}", e);
            return;
        }
    }

    println!("\nParcels in sorting center:");
    for (_, parcel) in network.parcels() {
        let destination = parcel.destination();
        println!(
            "  {} -> ({:.1}, {:.1})",
            parcel, destination.x, destination.y
        );
    }

    // Drive one run, streaming progress through a channel
    let (mut tx, rx) = mpsc::channel::<ProgressEvent>();
    let mut driver = InstantDriver::new();
    let outcome = run_to_completion(&mut network, &mut driver, &mut tx);
    drop(tx);

    println!("\nProgress:");
    for event in rx.iter() {
        let moved = event
            .moved
            .map(|m| format!(" {:?} at ({:.1}, {:.1})", m.unit, m.location.x, m.location.y))
            .unwrap_or_default();
        println!("  {:?}{}", event.stage, moved);
        for change in &event.status_changes {
            println!("    {}: {} -> {}", change.parcel_id, change.from, change.to);
        }
        if let Some(report) = &event.delivery {
            println!(
                "    delivered {} (time {:.2} h, cost {:.2})",
                report.parcel_id, report.time, report.cost
            );
        }
    }

    match outcome {
        Ok(RunOutcome::Completed(summary)) => {
            println!("\nRun finished after {} moves", driver.issued().len());
            println!("  Delivered: {}", summary.delivered.len());
            println!("  Courier batches: {}", summary.batches);
            println!(
                "  Van leg: time {:.2} h, cost {:.2}",
                summary.van_leg.time, summary.van_leg.cost
            );
            println!("  Total cost: {:.2}", summary.total_cost());
            println!("  Still in sorting center: {}", summary.left_in_center);
        }
        Ok(RunOutcome::Cancelled) => println!("\nRun cancelled"),
        Err(e) => {
            eprintln!("Run failed: {}", e);
            return;
        }
    }

    println!("\nParcels after run:");
    for (_, parcel) in network.parcels() {
        println!("  {}", parcel);
    }

    // Compare fleet sizes on a fresh copy of the same parcels
    match sweep(&config, &specs, &[2, 5, 10], &[1, 2, 3]) {
        Ok(outcomes) => {
            println!("\nFleet sweep ({} parcels):", parcel_count);
            println!("  van  courier  runs  delivered  total cost  cost/parcel");
            for o in outcomes {
                println!(
                    "  {:>3}  {:>7}  {:>4}  {:>9}  {:>10.2}  {:>11.2}",
                    o.van_capacity,
                    o.courier_capacity,
                    o.runs,
                    o.delivered,
                    o.total_cost,
                    o.cost_per_parcel().unwrap_or(0.0)
                );
            }
        }
        Err(e) => eprintln!("Fleet sweep failed: {}", e),
    }
}
