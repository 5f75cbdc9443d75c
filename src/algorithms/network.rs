// The entities a delivery run operates on

use crate::error::{ConfigError, NetworkError};
use crate::models::{
    CargoHold, Parcel, ParcelKey, ParcelStatus, Point, SortingCenter, TransportUnit, UnitKind,
    UnitStatus,
};
use crate::utils::config::ChainConfig;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt;

/// Which container a parcel handle lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Holder {
    Center,
    Unit(UnitKind),
}

/// What the courier is doing, as shown to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierActivity {
    Idle,
    /// Heading to a drop-off point; the number of the parcel whose
    /// destination matches, if any
    EnRouteToParcel(Option<u32>),
    /// Heading back to the van for another batch
    ReturningToVan,
}

impl fmt::Display for CourierActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourierActivity::Idle => f.write_str("courier: free"),
            CourierActivity::EnRouteToParcel(Some(number)) => {
                write!(f, "courier: heading to point {}", number)
            }
            CourierActivity::EnRouteToParcel(None) => f.write_str("courier: heading to point ?"),
            CourierActivity::ReturningToVan => {
                f.write_str("courier: returning to the van for a new batch")
            }
        }
    }
}

/// Sorting center, van, courier, transfer point and every parcel created.
///
/// The network owns the parcels; containers only hold `ParcelKey`s, so a
/// transfer moves a handle and never copies a parcel.
#[derive(Debug, Clone)]
pub struct DeliveryNetwork {
    parcels: SlotMap<ParcelKey, Parcel>,
    created: Vec<ParcelKey>,
    ids: HashMap<String, ParcelKey>,
    center: SortingCenter,
    van: TransportUnit,
    courier: TransportUnit,
    transfer_point: Point,

    /// Set while a delivery run is between `start` and `Done`/cancel
    active_run: bool,
}

impl DeliveryNetwork {
    /// Assembles a network. `van` and `courier` must be of the matching kind.
    pub fn new(
        center: SortingCenter,
        van: TransportUnit,
        courier: TransportUnit,
        transfer_point: Point,
    ) -> Self {
        debug_assert_eq!(van.kind(), UnitKind::Van);
        debug_assert_eq!(courier.kind(), UnitKind::Courier);
        Self {
            parcels: SlotMap::with_key(),
            created: Vec::new(),
            ids: HashMap::new(),
            center,
            van,
            courier,
            transfer_point,
            active_run: false,
        }
    }

    /// Builds an empty network from a validated configuration
    pub fn from_config(config: &ChainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let center = SortingCenter::new(config.center.location, config.center.capacity);
        let van = TransportUnit::van(config.van.location, config.van.capacity, config.van.speed)?;
        let courier = TransportUnit::courier(
            config.courier.location,
            config.courier.capacity,
            config.courier.speed,
        )?;
        Ok(Self::new(center, van, courier, config.transfer_point))
    }

    /// Creates a parcel and places it in the sorting center
    pub fn create_parcel<S: Into<String>>(
        &mut self,
        id: S,
        destination: Point,
        weight: f64,
    ) -> Result<ParcelKey, NetworkError> {
        let id = id.into();
        if !(weight.is_finite() && weight > 0.0) {
            return Err(NetworkError::InvalidWeight { weight });
        }
        if self.ids.contains_key(&id) {
            return Err(NetworkError::DuplicateParcelId(id));
        }
        if self.center.hold().is_full() {
            return Err(NetworkError::CenterFull {
                capacity: self.center.capacity(),
            });
        }

        let key = self.parcels.insert(Parcel::new(id.clone(), destination, weight));
        if self.center.hold_mut().load(key).is_err() {
            self.parcels.remove(key);
            return Err(NetworkError::CenterFull {
                capacity: self.center.capacity(),
            });
        }
        self.created.push(key);
        self.ids.insert(id, key);
        tracing::debug!(parcel = %self.parcels[key].id(), "parcel created in sorting center");
        Ok(key)
    }

    pub fn parcel(&self, key: ParcelKey) -> Option<&Parcel> {
        self.parcels.get(key)
    }

    pub fn parcel_by_id(&self, id: &str) -> Option<(ParcelKey, &Parcel)> {
        let key = *self.ids.get(id)?;
        self.parcels.get(key).map(|parcel| (key, parcel))
    }

    /// All parcels in creation order
    pub fn parcels(&self) -> impl Iterator<Item = (ParcelKey, &Parcel)> + '_ {
        self.created
            .iter()
            .filter_map(move |key| self.parcels.get(*key).map(|parcel| (*key, parcel)))
    }

    pub fn parcel_count(&self) -> usize {
        self.created.len()
    }

    pub fn count_with_status(&self, status: ParcelStatus) -> usize {
        self.parcels
            .values()
            .filter(|parcel| parcel.status() == status)
            .count()
    }

    /// Parcel counts per status, in lifecycle order
    pub fn status_counts(&self) -> [(ParcelStatus, usize); 4] {
        ParcelStatus::ALL.map(|status| (status, self.count_with_status(status)))
    }

    /// Parcels in the sorting center still eligible for a run
    pub fn waiting_in_center(&self) -> usize {
        self.center
            .hold()
            .iter()
            .filter(|key| self.status_of(*key) == Some(ParcelStatus::InCenter))
            .count()
    }

    pub fn center(&self) -> &SortingCenter {
        &self.center
    }

    pub fn van(&self) -> &TransportUnit {
        &self.van
    }

    pub fn courier(&self) -> &TransportUnit {
        &self.courier
    }

    pub fn unit(&self, kind: UnitKind) -> &TransportUnit {
        match kind {
            UnitKind::Van => &self.van,
            UnitKind::Courier => &self.courier,
        }
    }

    pub fn transfer_point(&self) -> Point {
        self.transfer_point
    }

    /// Whether a delivery run has started and not yet finished or been cancelled
    pub fn is_run_active(&self) -> bool {
        self.active_run
    }

    /// Resets the network after an abandoned run: units stop where they are,
    /// the courier's targets are cleared and a new run may start. Parcels stay
    /// in whichever container holds them.
    pub fn abort_run(&mut self) {
        self.halt_all();
        self.active_run = false;
    }

    /// Describes the courier's current errand from its status and targets
    pub fn courier_activity(&self) -> CourierActivity {
        match (self.courier.status(), self.courier.current_target()) {
            (UnitStatus::OnMove, Some(target)) => {
                let number = self
                    .parcels()
                    .find(|(_, parcel)| parcel.destination().approx_eq(&target))
                    .map(|(_, parcel)| parcel.number())
                    .filter(|number| *number != 0);
                CourierActivity::EnRouteToParcel(number)
            }
            (UnitStatus::OnMove, None) => CourierActivity::ReturningToVan,
            (UnitStatus::Free, _) => CourierActivity::Idle,
        }
    }

    pub(crate) fn status_of(&self, key: ParcelKey) -> Option<ParcelStatus> {
        self.parcels.get(key).map(Parcel::status)
    }

    pub(crate) fn parcel_mut(&mut self, key: ParcelKey) -> Option<&mut Parcel> {
        self.parcels.get_mut(key)
    }

    pub(crate) fn unit_mut(&mut self, kind: UnitKind) -> &mut TransportUnit {
        match kind {
            UnitKind::Van => &mut self.van,
            UnitKind::Courier => &mut self.courier,
        }
    }

    pub(crate) fn hold(&self, holder: Holder) -> &CargoHold {
        match holder {
            Holder::Center => self.center.hold(),
            Holder::Unit(kind) => self.unit(kind).hold(),
        }
    }

    pub(crate) fn hold_mut(&mut self, holder: Holder) -> &mut CargoHold {
        match holder {
            Holder::Center => self.center.hold_mut(),
            Holder::Unit(kind) => self.unit_mut(kind).hold_mut(),
        }
    }

    pub(crate) fn set_run_active(&mut self, active: bool) {
        self.active_run = active;
    }

    /// Stops both units where they are and clears the courier's targets
    fn halt_all(&mut self) {
        self.van.halt();
        self.courier.halt();
        self.courier.clear_targets();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_network(center_capacity: usize) -> DeliveryNetwork {
        DeliveryNetwork::new(
            SortingCenter::new(Point::new(50.0, 400.0), center_capacity),
            TransportUnit::van(Point::new(50.0, 50.0), 10, 40.0).unwrap(),
            TransportUnit::courier(Point::new(450.0, 50.0), 2, 60.0).unwrap(),
            Point::new(250.0, 250.0),
        )
    }

    #[test]
    fn test_create_parcel_lands_in_center() {
        let mut network = create_test_network(10);
        let key = network
            .create_parcel("PKG-1", Point::new(100.0, 100.0), 2.0)
            .unwrap();

        assert!(network.center().hold().contains(key));
        assert_eq!(network.parcel(key).unwrap().status(), ParcelStatus::InCenter);
        assert_eq!(network.waiting_in_center(), 1);
        assert_eq!(network.parcel_by_id("PKG-1").map(|(k, _)| k), Some(key));
    }

    #[test]
    fn test_create_parcel_rejections() {
        let mut network = create_test_network(1);
        network
            .create_parcel("PKG-1", Point::new(100.0, 100.0), 2.0)
            .unwrap();

        assert_eq!(
            network.create_parcel("PKG-1", Point::new(1.0, 1.0), 1.0),
            Err(NetworkError::DuplicateParcelId("PKG-1".to_string()))
        );
        assert_eq!(
            network.create_parcel("PKG-2", Point::new(1.0, 1.0), 1.0),
            Err(NetworkError::CenterFull { capacity: 1 })
        );
        assert_eq!(
            network.create_parcel("PKG-3", Point::new(1.0, 1.0), 0.0),
            Err(NetworkError::InvalidWeight { weight: 0.0 })
        );
        assert_eq!(network.parcel_count(), 1);
    }

    #[test]
    fn test_parcels_iterate_in_creation_order() {
        let mut network = create_test_network(10);
        for i in 1..=4 {
            network
                .create_parcel(format!("PKG-{}", i), Point::new(i as f64, 0.0), 1.0)
                .unwrap();
        }
        let ids: Vec<&str> = network.parcels().map(|(_, p)| p.id()).collect();

        assert_eq!(ids, vec!["PKG-1", "PKG-2", "PKG-3", "PKG-4"]);
        assert_eq!(
            network.status_counts()[0],
            (ParcelStatus::InCenter, 4)
        );
    }

    #[test]
    fn test_courier_activity() {
        let mut network = create_test_network(10);
        let destination = Point::new(120.0, 300.0);
        network.create_parcel("PKG-5", destination, 1.0).unwrap();
        assert_eq!(network.courier_activity(), CourierActivity::Idle);

        let courier = network.unit_mut(UnitKind::Courier);
        courier.begin_move(Point::new(250.0, 250.0));
        assert_eq!(network.courier_activity(), CourierActivity::ReturningToVan);

        let courier = network.unit_mut(UnitKind::Courier);
        courier.set_targets(Some(destination), None);
        courier.begin_move(destination);
        assert_eq!(
            network.courier_activity(),
            CourierActivity::EnRouteToParcel(Some(5))
        );
        assert_eq!(
            network.courier_activity().to_string(),
            "courier: heading to point 5"
        );

        network.abort_run();
        assert_eq!(network.courier_activity(), CourierActivity::Idle);
    }
}
