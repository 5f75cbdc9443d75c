// Error types shared across the crate

use crate::models::{ParcelStatus, UnitKind};
use std::io;

/// Failures of a capacity-bounded cargo hold
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CargoError {
    #[error("cargo hold is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("parcel is not held in this container")]
    ParcelNotFound,
    #[error("parcel is already held in this container")]
    AlreadyLoaded,
}

/// Failures of a parcel lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParcelError {
    #[error("parcel status cannot move from {from:?} to {to:?}")]
    StatusRegression { from: ParcelStatus, to: ParcelStatus },
    #[error("parcel was already delivered")]
    AlreadyDelivered,
}

/// Failures while populating a delivery network
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("sorting center is full (capacity {capacity})")]
    CenterFull { capacity: usize },
    #[error("parcel id already in use: {0}")]
    DuplicateParcelId(String),
    #[error("parcel weight must be positive and finite, got {weight}")]
    InvalidWeight { weight: f64 },
}

/// Failures of a delivery run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("nothing to deliver: no parcels waiting in the sorting center")]
    EmptyRunRejected,
    #[error("a delivery run is already in progress")]
    RunInProgress,
    #[error("no movement is awaiting acknowledgement")]
    NoPendingMove,
    #[error("run has already finished")]
    AlreadyFinished,
    #[error("parcel handle does not belong to this network")]
    UnknownParcel,
    #[error(transparent)]
    Cargo(#[from] CargoError),
    #[error(transparent)]
    Parcel(#[from] ParcelError),
}

/// Failures while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{unit:?} speed must be positive and finite, got {speed}")]
    NonPositiveSpeed { unit: UnitKind, speed: f64 },
    #[error("parcel area is empty: min {min:?}, max {max:?}")]
    EmptyArea { min: (f64, f64), max: (f64, f64) },
    #[error("weight range is invalid: {min}..{max}")]
    InvalidWeightRange { min: f64, max: f64 },
}

/// Failures while evaluating a fleet configuration
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Run(#[from] RunError),
}
