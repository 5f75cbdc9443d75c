// Movement handshake between the orchestrator and whatever animates it

use crate::algorithms::network::DeliveryNetwork;
use crate::models::{Distance, Point, UnitKind};
use serde::{Deserialize, Serialize};

/// A movement the orchestrator needs performed before it can continue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub unit: UnitKind,
    pub from: Point,
    pub to: Point,
}

impl MoveRequest {
    pub fn distance(&self) -> Distance {
        self.from.distance_to(&self.to)
    }
}

/// Driver's answer to a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAck {
    /// The unit reached its destination
    Arrived,
    /// The driver abandoned the run
    Cancelled,
}

/// Performs (or animates) movements on behalf of a delivery run.
///
/// The network is handed over read-only so a driver can render the state
/// it is animating; it must never mutate it.
pub trait MoveDriver {
    fn request_move(&mut self, request: &MoveRequest, network: &DeliveryNetwork) -> MoveAck;
}

/// Acknowledges every movement immediately, remembering what was asked
#[derive(Debug, Clone, Default)]
pub struct InstantDriver {
    issued: Vec<MoveRequest>,
}

impl InstantDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request seen so far, in issue order
    pub fn issued(&self) -> &[MoveRequest] {
        &self.issued
    }
}

impl MoveDriver for InstantDriver {
    fn request_move(&mut self, request: &MoveRequest, _network: &DeliveryNetwork) -> MoveAck {
        self.issued.push(*request);
        MoveAck::Arrived
    }
}

impl<F> MoveDriver for F
where
    F: FnMut(&MoveRequest, &DeliveryNetwork) -> MoveAck,
{
    fn request_move(&mut self, request: &MoveRequest, network: &DeliveryNetwork) -> MoveAck {
        self(request, network)
    }
}
