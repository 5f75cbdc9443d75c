// Scenario configuration loaded from JSON

use crate::error::ConfigError;
use crate::models::{Point, UnitKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sorting center settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterConfig {
    pub location: Point,
    pub capacity: usize,
}

/// Van or courier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Starting location
    pub location: Point,
    pub capacity: usize,
    pub speed: f64,
}

/// Where generated parcels may be sent and how heavy they are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelAreaConfig {
    /// Lower corner of the destination area (inclusive)
    pub min: Point,
    /// Upper corner of the destination area (exclusive)
    pub max: Point,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for ParcelAreaConfig {
    fn default() -> Self {
        Self {
            min: Point::new(70.0, 70.0),
            max: Point::new(370.0, 370.0),
            min_weight: 1.0,
            max_weight: 11.0,
        }
    }
}

/// Full description of a delivery network.
///
/// Missing top-level sections fall back to the defaults; a section that is
/// present must be complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub center: CenterConfig,
    pub van: UnitConfig,
    pub courier: UnitConfig,
    pub transfer_point: Point,
    pub parcels: ParcelAreaConfig,
}

impl Default for ChainConfig {
    /// The 500x500 demo scene
    fn default() -> Self {
        Self {
            center: CenterConfig {
                location: Point::new(50.0, 400.0),
                capacity: 100,
            },
            van: UnitConfig {
                location: Point::new(50.0, 50.0),
                capacity: 10,
                speed: 40.0,
            },
            courier: UnitConfig {
                location: Point::new(450.0, 50.0),
                capacity: 2,
                speed: 60.0,
            },
            transfer_point: Point::new(250.0, 250.0),
            parcels: ParcelAreaConfig::default(),
        }
    }
}

impl ChainConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ChainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the invariants the orchestrator relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, unit) in [(UnitKind::Van, &self.van), (UnitKind::Courier, &self.courier)] {
            if !(unit.speed.is_finite() && unit.speed > 0.0) {
                return Err(ConfigError::NonPositiveSpeed {
                    unit: kind,
                    speed: unit.speed,
                });
            }
        }

        let area = &self.parcels;
        let corners_finite = [area.min.x, area.min.y, area.max.x, area.max.y]
            .iter()
            .all(|v| v.is_finite());
        let spans_finite =
            (area.max.x - area.min.x).is_finite() && (area.max.y - area.min.y).is_finite();
        let ordered = area.min.x < area.max.x && area.min.y < area.max.y;
        if !(corners_finite && spans_finite && ordered) {
            return Err(ConfigError::EmptyArea {
                min: (area.min.x, area.min.y),
                max: (area.max.x, area.max.y),
            });
        }

        let weights_ordered = area.min_weight > 0.0 && area.min_weight < area.max_weight;
        if !(weights_ordered && area.max_weight.is_finite()) {
            return Err(ConfigError::InvalidWeightRange {
                min: area.min_weight,
                max: area.max_weight,
            });
        }
        Ok(())
    }
}
