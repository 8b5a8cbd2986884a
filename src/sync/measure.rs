//! Two-phase height measurement.
//!
//! Phase one asks the renderer to lay out a candidate pinned set off screen
//! and hands out a [`MeasureTicket`]. Phase two is the host reporting the
//! measured height with that ticket. Each view holds at most one request in
//! flight; a newer request replaces the older one, and a completion carrying
//! a replaced ticket is rejected instead of applied out of order.

use crate::model::{SyncError, ViewId};
use crate::navigator::JumpRequest;
use std::time::{Duration, Instant};

/// Receipt for one measurement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasureTicket {
    /// View being measured.
    pub view: ViewId,
    /// Per-view sequence number.
    pub seq: u64,
}

/// Request waiting for its measured height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMeasurement {
    /// Ticket handed to the renderer.
    pub ticket: MeasureTicket,
    /// Jump to perform once the height is known.
    pub jump: JumpRequest,
    /// When the request was issued.
    pub started: Instant,
}

/// Per-view measurement slot.
#[derive(Debug, Clone)]
pub struct MeasurementSlot {
    view: ViewId,
    next_seq: u64,
    in_flight: Option<PendingMeasurement>,
}

impl MeasurementSlot {
    /// Empty slot for `view`.
    pub fn new(view: ViewId) -> Self {
        Self {
            view,
            next_seq: 0,
            in_flight: None,
        }
    }

    /// Start a request, replacing any request still in flight.
    pub fn begin(&mut self, jump: JumpRequest, now: Instant) -> MeasureTicket {
        let ticket = MeasureTicket {
            view: self.view,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.in_flight = Some(PendingMeasurement {
            ticket,
            jump,
            started: now,
        });
        ticket
    }

    /// Accept a completion if `ticket` is the request in flight.
    pub fn complete(&mut self, ticket: MeasureTicket) -> Result<PendingMeasurement, SyncError> {
        match self.in_flight.take() {
            Some(pending) if pending.ticket == ticket => Ok(pending),
            other => {
                self.in_flight = other;
                Err(SyncError::StaleMeasurement {
                    view: ticket.view,
                    seq: ticket.seq,
                })
            }
        }
    }

    /// Drop the request in flight.
    pub fn cancel(&mut self) -> Option<PendingMeasurement> {
        self.in_flight.take()
    }

    /// Abandon the request in flight if it has waited at least `timeout`.
    pub fn expire(&mut self, now: Instant, timeout: Duration) -> Option<SyncError> {
        let expired = self
            .in_flight
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.started) >= timeout);
        if !expired {
            return None;
        }
        self.in_flight.take().map(|p| SyncError::MeasurementExpired {
            view: p.ticket.view,
            seq: p.ticket.seq,
        })
    }

    /// The request in flight, if any.
    pub fn in_flight(&self) -> Option<&PendingMeasurement> {
        self.in_flight.as_ref()
    }
}
