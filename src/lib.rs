// Public modules
pub mod algorithms;
pub mod error;
pub mod models;
pub mod utils;

// Re-exports for convenience
pub use algorithms::chain::{run_to_completion, DeliveryRun, Progress, RunSummary, Stage};
pub use algorithms::network::DeliveryNetwork;
pub use models::{Parcel, ParcelKey, ParcelStatus, Point, TransportUnit, UnitKind};
