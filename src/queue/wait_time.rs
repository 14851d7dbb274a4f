//! Wait-time estimation for the waiting set.
//!
//! The estimate for a patient is their level's base wait scaled by how loaded
//! the department is (`waiting / staff`), rounded up to a whole unit. Current
//! wait is the whole units elapsed since arrival.

use crate::config::{BaseWaitTable, TriageConfig};
use crate::models::{Patient, PatientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimeEstimate {
    pub patient_id: PatientId,
    pub current_wait_time: u64,
    pub estimated_remaining_wait: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitTimeEstimator {
    base_wait: BaseWaitTable,
    unit: Duration,
}

impl WaitTimeEstimator {
    pub fn new(base_wait: BaseWaitTable, unit: Duration) -> Self {
        Self { base_wait, unit }
    }

    pub fn from_config(config: &TriageConfig) -> Self {
        Self::new(config.base_wait_minutes, config.wait_time_unit())
    }

    /// One estimate per patient in `queue`, in the same order.
    ///
    /// `queue` is expected to be the ordered waiting set; its length is the
    /// waiting count used for the load factor.
    pub fn estimate(
        &self,
        queue: &[&Patient],
        available_staff: u32,
        now: DateTime<Utc>,
    ) -> Vec<WaitTimeEstimate> {
        let waiting = queue.len() as u64;

        queue
            .iter()
            .map(|patient| WaitTimeEstimate {
                patient_id: patient.id,
                current_wait_time: patient.wait_time(now, self.unit),
                estimated_remaining_wait: scaled_wait(
                    self.base_wait.for_level(patient.urgency_level),
                    waiting,
                    available_staff,
                ),
            })
            .collect()
    }
}

/// `ceil(base * waiting / staff)` in integer arithmetic, saturating at `u64::MAX`
fn scaled_wait(base: u64, waiting: u64, available_staff: u32) -> u64 {
    let staff = u64::from(available_staff.max(1));
    base.saturating_mul(waiting).div_ceil(staff)
}
