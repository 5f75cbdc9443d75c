//! The delivery-chain state machine.
//!
//! A [`DeliveryRun`] walks parcels from the sorting center through the van
//! and the courier to their destinations. Every movement is a suspension
//! point: the run issues a [`MoveRequest`], then waits for the caller to
//! report arrival through [`DeliveryRun::acknowledge_arrival`]. All cargo
//! changes happen between suspension points, and only one unit is ever in
//! flight.
//!
//! Cost model: the van leg (center to transfer point) is computed once per
//! run and charged in full to every parcel that run delivers; each parcel
//! additionally pays its own courier leg (transfer point to destination).

use crate::algorithms::driver::{MoveAck, MoveDriver, MoveRequest};
use crate::algorithms::events::{
    DeliveryReport, ProgressEvent, ProgressObserver, StatusChange, UnitPosition,
};
use crate::algorithms::network::{DeliveryNetwork, Holder};
use crate::error::{CargoError, RunError};
use crate::models::{Cost, DeliveryLeg, ParcelKey, ParcelStatus, Point, Time, UnitKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Stages of a single run, in the order they are first entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    VanApproach,
    LoadingVan,
    VanToTransfer,
    CourierApproach,
    HandoffToCourier,
    CourierDelivering,
    CourierReturnForMore,
    Done,
}

/// Where a run stands after a step
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Blocked until the given movement is acknowledged
    AwaitingArrival(MoveRequest),
    /// Reached `Done`
    Finished(RunSummary),
}

/// How a driven run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunSummary),
    Cancelled,
}

/// Totals for a finished run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Delivered parcels in delivery order
    pub delivered: Vec<DeliveryReport>,

    /// Van leg charged to every delivered parcel
    pub van_leg: DeliveryLeg,

    /// Courier batches formed during the run
    pub batches: usize,

    /// Parcels still waiting in the sorting center
    pub left_in_center: usize,

    /// Parcels still in the van (only when the courier could take none)
    pub left_in_van: usize,
}

impl RunSummary {
    pub fn total_cost(&self) -> Cost {
        self.delivered.iter().map(|report| report.cost).sum()
    }

    pub fn total_time(&self) -> Time {
        self.delivered.iter().map(|report| report.time).sum()
    }
}

/// One run of the delivery chain, from `VanApproach` to `Done`
#[derive(Debug, Clone)]
pub struct DeliveryRun {
    stage: Stage,
    pending: Option<MoveRequest>,
    van_leg: DeliveryLeg,

    /// Courier's current batch and the position of the parcel in hand
    batch: Vec<ParcelKey>,
    index: usize,

    batches: usize,
    delivered: Vec<DeliveryReport>,
}

impl DeliveryRun {
    /// Starts a run by sending the van to the sorting center.
    ///
    /// Rejected without touching the network when another run is still in
    /// progress or no parcel in the center is waiting for pickup.
    pub fn start(network: &mut DeliveryNetwork) -> Result<Self, RunError> {
        if network.is_run_active() {
            warn!("delivery run rejected: another run is in progress");
            return Err(RunError::RunInProgress);
        }
        let waiting = network.waiting_in_center();
        if waiting == 0 {
            warn!("delivery run rejected: nothing to deliver");
            return Err(RunError::EmptyRunRejected);
        }
        info!(waiting, "starting delivery run");

        let mut run = Self {
            stage: Stage::VanApproach,
            pending: None,
            van_leg: DeliveryLeg::default(),
            batch: Vec::new(),
            index: 0,
            batches: 0,
            delivered: Vec::new(),
        };
        network.set_run_active(true);
        let center = network.center().location();
        run.issue_move(network, UnitKind::Van, center);
        Ok(run)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Movement the run is waiting on, if any
    pub fn pending_move(&self) -> Option<MoveRequest> {
        self.pending
    }

    /// Van leg computed for this run; zero until the van leaves the center
    pub fn van_leg(&self) -> DeliveryLeg {
        self.van_leg
    }

    /// Parcels of the courier's current batch
    pub fn current_batch(&self) -> &[ParcelKey] {
        &self.batch
    }

    /// Parcels delivered so far in this run
    pub fn delivered(&self) -> &[DeliveryReport] {
        &self.delivered
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Completes the pending movement and advances through every
    /// instantaneous step up to the next movement or the end of the run
    pub fn acknowledge_arrival<O>(
        &mut self,
        network: &mut DeliveryNetwork,
        observer: &mut O,
    ) -> Result<Progress, RunError>
    where
        O: ProgressObserver + ?Sized,
    {
        if self.is_finished() {
            return Err(RunError::AlreadyFinished);
        }
        let request = self.pending.take().ok_or(RunError::NoPendingMove)?;
        let location = network
            .unit_mut(request.unit)
            .complete_move()
            .unwrap_or(request.to);
        let moved = UnitPosition {
            unit: request.unit,
            location,
        };
        debug!(
            stage = ?self.stage,
            unit = ?request.unit,
            x = location.x,
            y = location.y,
            "unit arrived"
        );

        match self.stage {
            Stage::VanApproach => {
                observer.on_progress(ProgressEvent::arrived(Stage::VanApproach, moved));
                self.load_van(network, observer)?;
                Ok(self.depart_van(network))
            }
            Stage::VanToTransfer => {
                observer.on_progress(ProgressEvent::arrived(Stage::VanToTransfer, moved));
                self.enter(Stage::CourierApproach);
                network.unit_mut(UnitKind::Courier).clear_targets();
                let transfer = network.transfer_point();
                Ok(self.issue_move(network, UnitKind::Courier, transfer))
            }
            Stage::CourierApproach | Stage::CourierReturnForMore => {
                observer.on_progress(ProgressEvent::arrived(self.stage, moved));
                self.hand_off(network, observer)
            }
            Stage::CourierDelivering => {
                self.drop_off(network, moved, observer)?;
                self.deliver_next(network, observer)
            }
            Stage::LoadingVan | Stage::HandoffToCourier | Stage::Done => {
                Err(RunError::NoPendingMove)
            }
        }
    }

    /// Abandons the run between suspension points.
    ///
    /// Units stop where they are, the courier's targets are cleared and the
    /// batch is discarded. Parcels stay with whichever container holds them;
    /// delivered parcels keep their charges.
    pub fn cancel(self, network: &mut DeliveryNetwork) {
        warn!(
            stage = ?self.stage,
            delivered = self.delivered.len(),
            "delivery run cancelled"
        );
        network.abort_run();
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "stage transition");
        self.stage = stage;
    }

    fn issue_move(&mut self, network: &mut DeliveryNetwork, unit: UnitKind, to: Point) -> Progress {
        let transport = network.unit_mut(unit);
        let request = MoveRequest {
            unit,
            from: transport.location(),
            to,
        };
        transport.begin_move(to);
        debug!(stage = ?self.stage, ?unit, x = to.x, y = to.y, "move requested");
        self.pending = Some(request);
        Progress::AwaitingArrival(request)
    }

    fn load_van<O>(
        &mut self,
        network: &mut DeliveryNetwork,
        observer: &mut O,
    ) -> Result<(), RunError>
    where
        O: ProgressObserver + ?Sized,
    {
        self.enter(Stage::LoadingVan);
        let room = free_room(network, UnitKind::Van);
        let selected = select_oldest(network, Holder::Center, ParcelStatus::InCenter, room);
        let changes = transfer(
            network,
            &selected,
            Holder::Center,
            Holder::Unit(UnitKind::Van),
            ParcelStatus::InVan,
        )?;
        info!(loaded = changes.len(), "van loaded");

        let mut event = ProgressEvent::new(Stage::LoadingVan);
        event.status_changes = changes;
        observer.on_progress(event);
        Ok(())
    }

    fn depart_van(&mut self, network: &mut DeliveryNetwork) -> Progress {
        self.enter(Stage::VanToTransfer);
        let from = network.center().location();
        let transfer = network.transfer_point();
        self.van_leg = network.van().leg(&from, &transfer);
        self.issue_move(network, UnitKind::Van, transfer)
    }

    fn hand_off<O>(
        &mut self,
        network: &mut DeliveryNetwork,
        observer: &mut O,
    ) -> Result<Progress, RunError>
    where
        O: ProgressObserver + ?Sized,
    {
        self.enter(Stage::HandoffToCourier);
        let room = free_room(network, UnitKind::Courier);
        let selected = select_oldest(
            network,
            Holder::Unit(UnitKind::Van),
            ParcelStatus::InVan,
            room,
        );
        let changes = transfer(
            network,
            &selected,
            Holder::Unit(UnitKind::Van),
            Holder::Unit(UnitKind::Courier),
            ParcelStatus::WithCourier,
        )?;
        info!(batch = changes.len(), "parcels handed to courier");

        let mut event = ProgressEvent::new(Stage::HandoffToCourier);
        event.status_changes = changes;
        observer.on_progress(event);

        // A courier that can take nothing would shuttle forever.
        if selected.is_empty() {
            return Ok(self.finish(network, observer));
        }
        self.batch = selected;
        self.index = 0;
        self.batches += 1;
        self.deliver_next(network, observer)
    }

    fn deliver_next<O>(
        &mut self,
        network: &mut DeliveryNetwork,
        observer: &mut O,
    ) -> Result<Progress, RunError>
    where
        O: ProgressObserver + ?Sized,
    {
        if let Some(&key) = self.batch.get(self.index) {
            self.enter(Stage::CourierDelivering);
            let destination = destination_of(network, key)?;
            let next = match self.batch.get(self.index + 1) {
                Some(&next_key) => Some(destination_of(network, next_key)?),
                None => None,
            };
            network
                .unit_mut(UnitKind::Courier)
                .set_targets(Some(destination), next);
            return Ok(self.issue_move(network, UnitKind::Courier, destination));
        }

        self.batch.clear();
        self.index = 0;
        let remaining = held_with_status(network, Holder::Unit(UnitKind::Van), ParcelStatus::InVan);
        if remaining > 0 {
            self.enter(Stage::CourierReturnForMore);
            info!(remaining, "courier returning for more parcels");
            network.unit_mut(UnitKind::Courier).clear_targets();
            let transfer = network.transfer_point();
            Ok(self.issue_move(network, UnitKind::Courier, transfer))
        } else {
            Ok(self.finish(network, observer))
        }
    }

    fn drop_off<O>(
        &mut self,
        network: &mut DeliveryNetwork,
        moved: UnitPosition,
        observer: &mut O,
    ) -> Result<(), RunError>
    where
        O: ProgressObserver + ?Sized,
    {
        let key = *self.batch.get(self.index).ok_or(RunError::NoPendingMove)?;
        let courier = network.unit_mut(UnitKind::Courier);
        let unloaded = courier.hold_mut().unload(key);
        debug_assert!(unloaded.is_some(), "batch parcel missing from courier");
        unloaded.ok_or(CargoError::ParcelNotFound)?;
        courier.clear_targets();

        let destination = destination_of(network, key)?;
        let courier_leg = network
            .courier()
            .leg(&network.transfer_point(), &destination);
        let charge = self.van_leg.combined(&courier_leg);

        let parcel = network.parcel_mut(key).ok_or(RunError::UnknownParcel)?;
        let change = StatusChange {
            parcel_id: parcel.id().to_string(),
            from: parcel.status(),
            to: ParcelStatus::Delivered,
        };
        parcel.deliver(charge)?;
        let report = DeliveryReport {
            parcel_id: parcel.id().to_string(),
            cost: parcel.delivery_cost(),
            time: parcel.delivery_time(),
        };
        info!(
            parcel = %report.parcel_id,
            cost = report.cost,
            time = report.time,
            "parcel delivered"
        );

        observer.on_progress(ProgressEvent {
            stage: Stage::CourierDelivering,
            moved: Some(moved),
            status_changes: vec![change],
            delivery: Some(report.clone()),
        });
        self.delivered.push(report);
        self.index += 1;
        Ok(())
    }

    fn finish<O>(&mut self, network: &mut DeliveryNetwork, observer: &mut O) -> Progress
    where
        O: ProgressObserver + ?Sized,
    {
        self.enter(Stage::Done);
        network.unit_mut(UnitKind::Courier).clear_targets();
        network.set_run_active(false);
        observer.on_progress(ProgressEvent::new(Stage::Done));

        let summary = RunSummary {
            delivered: self.delivered.clone(),
            van_leg: self.van_leg,
            batches: self.batches,
            left_in_center: network.waiting_in_center(),
            left_in_van: network.van().hold().len(),
        };
        info!(
            delivered = summary.delivered.len(),
            total_cost = summary.total_cost(),
            left_in_center = summary.left_in_center,
            "delivery run finished"
        );
        Progress::Finished(summary)
    }
}

/// Starts a run and drives it with `driver` until it finishes or the
/// driver cancels
pub fn run_to_completion<D, O>(
    network: &mut DeliveryNetwork,
    driver: &mut D,
    observer: &mut O,
) -> Result<RunOutcome, RunError>
where
    D: MoveDriver + ?Sized,
    O: ProgressObserver + ?Sized,
{
    let mut run = DeliveryRun::start(network)?;
    loop {
        let request = run.pending_move().ok_or(RunError::NoPendingMove)?;
        match driver.request_move(&request, network) {
            MoveAck::Arrived => match run.acknowledge_arrival(network, observer) {
                Ok(Progress::Finished(summary)) => return Ok(RunOutcome::Completed(summary)),
                Ok(Progress::AwaitingArrival(_)) => {}
                Err(e) => {
                    network.abort_run();
                    return Err(e);
                }
            },
            MoveAck::Cancelled => {
                run.cancel(network);
                return Ok(RunOutcome::Cancelled);
            }
        }
    }
}

fn free_room(network: &DeliveryNetwork, unit: UnitKind) -> usize {
    let hold = network.unit(unit).hold();
    hold.capacity().saturating_sub(hold.len())
}

/// Up to `limit` parcels of `holder` in `status`, oldest first
fn select_oldest(
    network: &DeliveryNetwork,
    holder: Holder,
    status: ParcelStatus,
    limit: usize,
) -> Vec<ParcelKey> {
    network
        .hold(holder)
        .iter()
        .filter(|key| network.status_of(*key) == Some(status))
        .take(limit)
        .collect()
}

fn held_with_status(network: &DeliveryNetwork, holder: Holder, status: ParcelStatus) -> usize {
    network
        .hold(holder)
        .iter()
        .filter(|key| network.status_of(*key) == Some(status))
        .count()
}

fn destination_of(network: &DeliveryNetwork, key: ParcelKey) -> Result<Point, RunError> {
    network
        .parcel(key)
        .map(|parcel| parcel.destination())
        .ok_or(RunError::UnknownParcel)
}

/// Moves already-selected parcels between containers and advances their
/// status. The selection was bounded by the destination's free room, so a
/// load failure here is a selection bug.
fn transfer(
    network: &mut DeliveryNetwork,
    selected: &[ParcelKey],
    from: Holder,
    to: Holder,
    status: ParcelStatus,
) -> Result<Vec<StatusChange>, RunError> {
    let mut changes = Vec::with_capacity(selected.len());
    for &key in selected {
        let unloaded = network.hold_mut(from).unload(key);
        debug_assert!(unloaded.is_some(), "selected parcel missing from source");
        unloaded.ok_or(CargoError::ParcelNotFound)?;

        let loaded = network.hold_mut(to).load(key);
        debug_assert!(loaded.is_ok(), "selection exceeded destination capacity");
        loaded?;

        let parcel = network.parcel_mut(key).ok_or(RunError::UnknownParcel)?;
        let previous = parcel.status();
        parcel.advance_to(status)?;
        changes.push(StatusChange {
            parcel_id: parcel.id().to_string(),
            from: previous,
            to: status,
        });
    }
    Ok(changes)
}
