// Parcel model representing a single item moving through the delivery chain

use crate::error::ParcelError;
use crate::models::{Cost, DeliveryLeg, Point, Time};
use serde::{Deserialize, Serialize};
use std::fmt;

slotmap::new_key_type! {
    /// Stable handle to a parcel owned by a delivery network
    pub struct ParcelKey;
}

/// Where a parcel currently is in the chain.
///
/// Variants are declared in lifecycle order so the derived `Ord` matches
/// the only direction a parcel may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParcelStatus {
    InCenter,
    InVan,
    WithCourier,
    Delivered,
}

impl ParcelStatus {
    pub const ALL: [ParcelStatus; 4] = [
        ParcelStatus::InCenter,
        ParcelStatus::InVan,
        ParcelStatus::WithCourier,
        ParcelStatus::Delivered,
    ];
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParcelStatus::InCenter => "IN_CENTER",
            ParcelStatus::InVan => "IN_VAN",
            ParcelStatus::WithCourier => "WITH_COURIER",
            ParcelStatus::Delivered => "DELIVERED",
        };
        f.write_str(label)
    }
}

/// Represents a parcel travelling from the sorting center to its destination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parcel {
    /// Caller-assigned identifier, unique within a network
    id: String,

    /// Where the courier drops the parcel off
    destination: Point,

    /// Parcel weight
    weight: f64,

    /// Current position in the chain
    status: ParcelStatus,

    /// Accrued cost, fixed once delivered
    delivery_cost: Cost,

    /// Accrued time, fixed once delivered
    delivery_time: Time,
}

impl Parcel {
    /// Creates a new parcel waiting in the sorting center
    pub fn new<S: Into<String>>(id: S, destination: Point, weight: f64) -> Self {
        Self {
            id: id.into(),
            destination,
            weight,
            status: ParcelStatus::InCenter,
            delivery_cost: 0.0,
            delivery_time: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn destination(&self) -> Point {
        self.destination
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn status(&self) -> ParcelStatus {
        self.status
    }

    /// Cost charged for delivery; zero until delivered
    pub fn delivery_cost(&self) -> Cost {
        self.delivery_cost
    }

    /// Time charged for delivery; zero until delivered
    pub fn delivery_time(&self) -> Time {
        self.delivery_time
    }

    pub fn is_delivered(&self) -> bool {
        self.status == ParcelStatus::Delivered
    }

    /// Numeric suffix of the id (`PKG-12` gives 12); 0 when there is none
    pub fn number(&self) -> u32 {
        self.id
            .rsplit_once('-')
            .and_then(|(_, suffix)| suffix.parse().ok())
            .unwrap_or(0)
    }

    /// Moves the parcel forward to `next`. Delivery goes through `deliver`.
    pub(crate) fn advance_to(&mut self, next: ParcelStatus) -> Result<(), ParcelError> {
        if self.is_delivered() {
            return Err(ParcelError::AlreadyDelivered);
        }
        if next <= self.status || next == ParcelStatus::Delivered {
            return Err(ParcelError::StatusRegression {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Marks a parcel in the courier's hands delivered and fixes its accrued
    /// cost and time
    pub(crate) fn deliver(&mut self, charge: DeliveryLeg) -> Result<(), ParcelError> {
        if self.is_delivered() {
            return Err(ParcelError::AlreadyDelivered);
        }
        if self.status != ParcelStatus::WithCourier {
            return Err(ParcelError::StatusRegression {
                from: self.status,
                to: ParcelStatus::Delivered,
            });
        }
        self.status = ParcelStatus::Delivered;
        self.delivery_cost = charge.cost;
        self.delivery_time = charge.time;
        Ok(())
    }
}

impl fmt::Display for Parcel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_delivered() {
            write!(
                f,
                "{} | weight: {:.2} | time: {:.2} h | cost: {:.2}",
                self.id, self.weight, self.delivery_time, self.delivery_cost
            )
        } else {
            write!(
                f,
                "{} | weight: {:.2} | status: {}",
                self.id, self.weight, self.status
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel() -> Parcel {
        Parcel::new("PKG-7", Point::new(100.0, 120.0), 3.5)
    }

    fn parcel_with_courier() -> Parcel {
        let mut p = parcel();
        p.advance_to(ParcelStatus::WithCourier).unwrap();
        p
    }

    #[test]
    fn test_new_parcel_waits_in_center() {
        let p = parcel();
        assert_eq!(p.status(), ParcelStatus::InCenter);
        assert_eq!(p.delivery_cost(), 0.0);
        assert_eq!(p.delivery_time(), 0.0);
    }

    #[test]
    fn test_number() {
        assert_eq!(parcel().number(), 7);
        assert_eq!(Parcel::new("PKG-12", Point::default(), 1.0).number(), 12);
        assert_eq!(Parcel::new("PKG", Point::default(), 1.0).number(), 0);
        assert_eq!(Parcel::new("PKG-x", Point::default(), 1.0).number(), 0);
    }

    #[test]
    fn test_status_only_moves_forward() {
        let mut p = parcel();
        assert!(p.advance_to(ParcelStatus::InVan).is_ok());
        assert_eq!(
            p.advance_to(ParcelStatus::InCenter),
            Err(ParcelError::StatusRegression {
                from: ParcelStatus::InVan,
                to: ParcelStatus::InCenter,
            })
        );
        assert!(p.advance_to(ParcelStatus::InVan).is_err());
        assert!(p.advance_to(ParcelStatus::WithCourier).is_ok());
        assert!(p.advance_to(ParcelStatus::Delivered).is_err());
    }

    #[test]
    fn test_only_courier_parcels_can_be_delivered() {
        let mut p = parcel();
        assert_eq!(
            p.deliver(DeliveryLeg::new(1.0, 1.0)),
            Err(ParcelError::StatusRegression {
                from: ParcelStatus::InCenter,
                to: ParcelStatus::Delivered,
            })
        );

        p.advance_to(ParcelStatus::InVan).unwrap();
        assert!(p.deliver(DeliveryLeg::new(1.0, 1.0)).is_err());
        assert_eq!(p.status(), ParcelStatus::InVan);
        assert_eq!(p.delivery_cost(), 0.0);
    }

    #[test]
    fn test_delivery_fixes_charges() {
        let mut p = parcel_with_courier();
        p.deliver(DeliveryLeg::new(2.5, 40.0)).unwrap();

        assert!(p.is_delivered());
        assert_eq!(p.delivery_time(), 2.5);
        assert_eq!(p.delivery_cost(), 40.0);

        assert_eq!(
            p.deliver(DeliveryLeg::new(9.0, 9.0)),
            Err(ParcelError::AlreadyDelivered)
        );
        assert_eq!(
            p.advance_to(ParcelStatus::InVan),
            Err(ParcelError::AlreadyDelivered)
        );
        assert_eq!(p.delivery_cost(), 40.0);
    }

    #[test]
    fn test_display() {
        let p = parcel();
        assert_eq!(p.to_string(), "PKG-7 | weight: 3.50 | status: IN_CENTER");

        let mut p = parcel_with_courier();
        p.deliver(DeliveryLeg::new(1.25, 10.0)).unwrap();
        assert_eq!(
            p.to_string(),
            "PKG-7 | weight: 3.50 | time: 1.25 h | cost: 10.00"
        );
    }
}
