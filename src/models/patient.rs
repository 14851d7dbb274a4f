use super::urgency::UrgencyLevel;
use crate::error::{Result, TriageError};
use crate::state_machine::{determine_target_state, LifecyclePolicy, PatientEvent, PatientStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identity assigned by the queue manager, unique within one manager instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(u64);

impl PatientId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| format!("Invalid patient id: {s}"))
    }
}

/// Patient record tracked by the triage queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub age: u8,
    pub urgency_level: UrgencyLevel,
    pub symptoms: String,
    pub arrival_time: DateTime<Utc>,
    pub status: PatientStatus,
    pub treatment_started_at: Option<DateTime<Utc>>,
    pub discharged_at: Option<DateTime<Utc>>,
}

/// New patient intake as received from a caller, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: i64,
    pub urgency_level: i64,
    pub symptoms: String,
}

impl NewPatient {
    pub fn new(
        name: impl Into<String>,
        age: i64,
        urgency_level: i64,
        symptoms: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            urgency_level,
            symptoms: symptoms.into(),
        }
    }
}

/// Intake that has passed validation; only constructible through `validation`
#[derive(Debug, Clone)]
pub struct ValidatedIntake {
    pub(crate) name: String,
    pub(crate) age: u8,
    pub(crate) urgency_level: UrgencyLevel,
    pub(crate) symptoms: String,
}

impl Patient {
    pub(crate) fn admit(id: PatientId, intake: ValidatedIntake, arrival_time: DateTime<Utc>) -> Self {
        Self {
            id,
            name: intake.name,
            age: intake.age,
            urgency_level: intake.urgency_level,
            symptoms: intake.symptoms,
            arrival_time,
            status: PatientStatus::Waiting,
            treatment_started_at: None,
            discharged_at: None,
        }
    }

    /// Whole units elapsed since arrival, never negative
    pub fn wait_time(&self, now: DateTime<Utc>, unit: Duration) -> u64 {
        let elapsed_ms = (now - self.arrival_time).num_milliseconds().max(0) as u128;
        let unit_ms = unit.as_millis().max(1);
        (elapsed_ms / unit_ms) as u64
    }

    /// Apply a lifecycle event, stamping the matching timestamp.
    ///
    /// Returns the status the patient held before the transition. The record is
    /// left untouched when the transition is rejected.
    pub(crate) fn apply_event(
        &mut self,
        event: PatientEvent,
        at: DateTime<Utc>,
        policy: LifecyclePolicy,
    ) -> Result<PatientStatus> {
        let previous = self.status;
        let target = determine_target_state(previous, event, policy).ok_or(
            TriageError::InvalidState {
                id: self.id,
                status: previous,
                operation: event.event_type(),
            },
        )?;

        match target {
            PatientStatus::Treating => self.treatment_started_at = Some(at),
            PatientStatus::Discharged => self.discharged_at = Some(at),
            PatientStatus::Waiting => {}
        }
        self.status = target;

        Ok(previous)
    }
}
