//! Status state machine rules.
//!
//! Statuses move strictly forward along the dispensing pipeline:
//! pending -> processing -> ready -> dispensed. `Expired` is reachable
//! from any non-terminal state; terminal states admit no transition.

use chrono::{DateTime, Utc};

use crate::model::{LifecycleTimestamps, PrescriptionStatus};

/// Position along the dispensing pipeline.
fn rank(status: PrescriptionStatus) -> u8 {
    match status {
        PrescriptionStatus::Pending => 0,
        PrescriptionStatus::Processing => 1,
        PrescriptionStatus::Ready => 2,
        PrescriptionStatus::Dispensed => 3,
        PrescriptionStatus::Expired => 4,
    }
}

pub fn can_transition(from: PrescriptionStatus, to: PrescriptionStatus) -> bool {
    if from.is_terminal() {
        return false;
    }
    match to {
        PrescriptionStatus::Expired => true,
        PrescriptionStatus::Pending => false,
        _ => rank(to) > rank(from),
    }
}

/// Stamps the timestamp slot for a newly reached status. Each slot is
/// written at most once, on first entry.
pub fn stamp(timestamps: &mut LifecycleTimestamps, status: PrescriptionStatus, now: DateTime<Utc>) {
    let slot = match status {
        PrescriptionStatus::Pending => return,
        PrescriptionStatus::Processing => &mut timestamps.date_processed,
        PrescriptionStatus::Ready => &mut timestamps.date_ready,
        PrescriptionStatus::Dispensed => &mut timestamps.date_dispensed,
        PrescriptionStatus::Expired => &mut timestamps.date_expired,
    };

    if slot.is_none() {
        *slot = Some(now);
    }
}
