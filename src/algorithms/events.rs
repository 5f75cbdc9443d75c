// Progress events emitted by a delivery run after every atomic step

use crate::algorithms::chain::Stage;
use crate::models::{Cost, ParcelStatus, Point, Time, UnitKind};
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

/// A unit that just finished moving, and where it ended up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPosition {
    pub unit: UnitKind,
    pub location: Point,
}

/// One parcel status transition applied during a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub parcel_id: String,
    pub from: ParcelStatus,
    pub to: ParcelStatus,
}

/// Final charges of a delivered parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub parcel_id: String,
    pub cost: Cost,
    pub time: Time,
}

/// What happened in a single step of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Stage the step belonged to
    pub stage: Stage,

    /// Unit whose movement completed in this step
    pub moved: Option<UnitPosition>,

    /// Parcel status transitions applied in this step
    pub status_changes: Vec<StatusChange>,

    /// Present when a parcel was delivered
    pub delivery: Option<DeliveryReport>,
}

impl ProgressEvent {
    pub(crate) fn new(stage: Stage) -> Self {
        Self {
            stage,
            moved: None,
            status_changes: Vec::new(),
            delivery: None,
        }
    }

    pub(crate) fn arrived(stage: Stage, moved: UnitPosition) -> Self {
        Self {
            moved: Some(moved),
            ..Self::new(stage)
        }
    }
}

/// Receives progress events from a delivery run
pub trait ProgressObserver {
    fn on_progress(&mut self, event: ProgressEvent);
}

impl ProgressObserver for Vec<ProgressEvent> {
    fn on_progress(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}

impl ProgressObserver for mpsc::Sender<ProgressEvent> {
    fn on_progress(&mut self, event: ProgressEvent) {
        // A dropped receiver only means nobody is listening any more.
        if self.send(event).is_err() {
            tracing::trace!("progress receiver dropped");
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&mut self, _event: ProgressEvent) {}
}
