// Models module - exports all model types

mod cargo;
mod leg;
mod parcel;
mod point;
mod sorting_center;
mod transport;

// Re-export model types
pub use self::cargo::CargoHold;
pub use self::leg::DeliveryLeg;
pub use self::parcel::{Parcel, ParcelKey, ParcelStatus};
pub use self::point::Point;
pub use self::sorting_center::SortingCenter;
pub use self::transport::{DeliveryTargets, TransportUnit, UnitKind, UnitStatus};

// Common type aliases for improved code readability
pub type Cost = f64;
pub type Time = f64;
pub type Distance = f64;
