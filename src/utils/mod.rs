pub mod config;
pub mod distance;
pub mod fleet_sweep;
pub mod generator;
