//! # Queue Manager
//!
//! Owns every patient record for the lifetime of the process and is the only
//! place lifecycle transitions happen.
//!
//! ## Locking
//!
//! All state sits behind a single `RwLock`. Mutations hold the write lock for
//! the whole read-modify-recompute cycle, so counts, ordering and estimates are
//! always computed from one consistent view. Alerts produced during a mutation
//! are buffered and handed to the dispatcher only after the lock is released.

use super::clock::{Clock, SystemClock};
use super::threshold::{StaffingAssessment, ThresholdPolicy};
use super::wait_time::{WaitTimeEstimate, WaitTimeEstimator};
use crate::config::TriageConfig;
use crate::constants::events::{
    CRITICAL_PATIENT, STAFFING_ALERT, TREATMENT_INTERRUPT, WAIT_TIME_UPDATE,
};
use crate::error::{Result, TriageError};
use crate::events::AlertDispatcher;
use crate::logging::{log_alert, log_patient_operation};
use crate::models::{NewPatient, Patient, PatientId};
use crate::state_machine::{LifecyclePolicy, PatientEvent, PatientStatus};
use crate::validation::{validate_new_patient, validate_staff_count};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Thread-safe triage queue shared by every caller as `Arc<QueueManager>`
pub struct QueueManager {
    state: RwLock<QueueState>,
    dispatcher: Arc<dyn AlertDispatcher>,
    clock: Arc<dyn Clock>,
    threshold: ThresholdPolicy,
    estimator: WaitTimeEstimator,
    lifecycle: LifecyclePolicy,
}

/// Point-in-time counts for monitoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSnapshot {
    pub total: usize,
    pub waiting: usize,
    pub treating: usize,
    pub discharged: usize,
    pub staff_available: u32,
    pub currently_treating: u32,
    pub staffing_ratio: f64,
}

struct QueueState {
    /// Append-only; records are never removed
    patients: Vec<Patient>,
    index: HashMap<PatientId, usize>,
    staff_available: u32,
    /// Always equals the number of records in `Treating`
    currently_treating: u32,
    next_id: u64,
}

/// Alert produced under the lock, delivered after it is released
enum PendingAlert {
    CriticalPatient(Patient),
    TreatmentInterruption(Patient),
    Staffing(StaffingAssessment),
    WaitTimes {
        estimates: Vec<WaitTimeEstimate>,
        timestamp: DateTime<Utc>,
    },
}

impl QueueState {
    fn new(staff_available: u32) -> Self {
        Self {
            patients: Vec::new(),
            index: HashMap::new(),
            staff_available,
            currently_treating: 0,
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> PatientId {
        let id = PatientId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, patient: Patient) {
        self.index.insert(patient.id, self.patients.len());
        self.patients.push(patient);
    }

    fn find(&self, id: PatientId) -> Result<&Patient> {
        self.index
            .get(&id)
            .map(|&position| &self.patients[position])
            .ok_or(TriageError::NotFound(id))
    }

    fn find_mut(&mut self, id: PatientId) -> Result<&mut Patient> {
        match self.index.get(&id) {
            Some(&position) => Ok(&mut self.patients[position]),
            None => Err(TriageError::NotFound(id)),
        }
    }

    fn waiting_count(&self) -> usize {
        self.patients
            .iter()
            .filter(|patient| patient.status.is_waiting())
            .count()
    }

    /// Waiting records by urgency, then arrival, then id
    fn ordered_queue(&self) -> Vec<&Patient> {
        let mut queue: Vec<&Patient> = self
            .patients
            .iter()
            .filter(|patient| patient.status.is_waiting())
            .collect();
        queue.sort_by(|a, b| {
            a.urgency_level
                .cmp(&b.urgency_level)
                .then_with(|| a.arrival_time.cmp(&b.arrival_time))
                .then_with(|| a.id.cmp(&b.id))
        });
        queue
    }
}

impl QueueManager {
    /// Create a manager using wall-clock time
    pub fn new(config: &TriageConfig, dispatcher: Arc<dyn AlertDispatcher>) -> Result<Self> {
        Self::with_clock(config, dispatcher, Arc::new(SystemClock))
    }

    /// Create a manager with an explicit time source.
    ///
    /// The configuration is validated first; an invalid one is rejected with
    /// `TriageError::Configuration` rather than adjusted.
    pub fn with_clock(
        config: &TriageConfig,
        dispatcher: Arc<dyn AlertDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        debug!(
            dispatcher = dispatcher.description(),
            staff_available = config.default_staff,
            staff_threshold_ratio = config.staff_threshold_ratio,
            "Creating queue manager"
        );

        Ok(Self {
            state: RwLock::new(QueueState::new(config.default_staff)),
            dispatcher,
            clock,
            threshold: ThresholdPolicy::new(config.staff_threshold_ratio),
            estimator: WaitTimeEstimator::from_config(config),
            lifecycle: config.lifecycle_policy(),
        })
    }

    /// Register a new arrival.
    ///
    /// Level-1 arrivals raise both a critical-patient and a treatment-interruption
    /// alert. No running treatment is preempted.
    pub fn add_patient(&self, input: NewPatient) -> Result<Patient> {
        let intake = validate_new_patient(&input).inspect_err(|e| {
            debug!(error = %e, "Rejected patient intake");
        })?;

        let (patient, alerts) = {
            let mut state = self.state.write();
            let now = self.clock.now();

            let id = state.allocate_id();
            let patient = Patient::admit(id, intake, now);
            state.push(patient.clone());

            let mut alerts = Vec::new();
            if patient.urgency_level.is_critical() {
                alerts.push(PendingAlert::CriticalPatient(patient.clone()));
                alerts.push(PendingAlert::TreatmentInterruption(patient.clone()));
            }
            self.recompute(&state, now, &mut alerts);

            (patient, alerts)
        };

        log_patient_operation(
            "add_patient",
            Some(patient.id.get()),
            Some(patient.urgency_level.get()),
            &patient.status.to_string(),
            None,
        );
        self.dispatch(alerts);

        Ok(patient)
    }

    /// Waiting patients in treatment order
    pub fn get_queue(&self) -> Vec<Patient> {
        let state = self.state.read();
        state.ordered_queue().into_iter().cloned().collect()
    }

    /// Every patient ever registered, in arrival order
    pub fn get_all_patients(&self) -> Vec<Patient> {
        self.state.read().patients.clone()
    }

    /// Patients in one lifecycle state; waiting patients come back in queue order
    pub fn patients_by_status(&self, status: PatientStatus) -> Vec<Patient> {
        if status.is_waiting() {
            return self.get_queue();
        }

        self.state
            .read()
            .patients
            .iter()
            .filter(|patient| patient.status == status)
            .cloned()
            .collect()
    }

    pub fn get_patient(&self, id: PatientId) -> Result<Patient> {
        self.state.read().find(id).cloned()
    }

    /// Move a waiting patient into a free treatment slot
    pub fn start_treatment(&self, id: PatientId) -> Result<Patient> {
        let (patient, alerts) = {
            let mut state = self.state.write();
            let now = self.clock.now();
            let currently_treating = state.currently_treating;
            let staff_available = state.staff_available;
            let lifecycle = self.lifecycle;

            let record = state.find_mut(id)?;
            if !record.status.is_waiting() {
                return Err(TriageError::InvalidState {
                    id,
                    status: record.status,
                    operation: PatientEvent::StartTreatment.event_type(),
                });
            }
            if currently_treating >= staff_available {
                return Err(TriageError::Capacity {
                    currently_treating,
                    staff_available,
                });
            }

            record.apply_event(PatientEvent::StartTreatment, now, lifecycle)?;
            let patient = record.clone();
            state.currently_treating += 1;

            let mut alerts = Vec::new();
            self.recompute(&state, now, &mut alerts);
            (patient, alerts)
        };

        log_patient_operation(
            "start_treatment",
            Some(patient.id.get()),
            Some(patient.urgency_level.get()),
            &patient.status.to_string(),
            None,
        );
        self.dispatch(alerts);

        Ok(patient)
    }

    /// Release a patient, freeing their treatment slot if they held one
    pub fn discharge_patient(&self, id: PatientId) -> Result<Patient> {
        let (patient, previous, alerts) = {
            let mut state = self.state.write();
            let now = self.clock.now();
            let lifecycle = self.lifecycle;

            let record = state.find_mut(id)?;
            let previous = record.apply_event(PatientEvent::Discharge, now, lifecycle)?;
            let patient = record.clone();
            if previous.is_active() {
                state.currently_treating = state.currently_treating.saturating_sub(1);
            }

            let mut alerts = Vec::new();
            self.recompute(&state, now, &mut alerts);
            (patient, previous, alerts)
        };

        let details = format!("from {previous}");
        log_patient_operation(
            "discharge_patient",
            Some(patient.id.get()),
            Some(patient.urgency_level.get()),
            &patient.status.to_string(),
            Some(&details),
        );
        self.dispatch(alerts);

        Ok(patient)
    }

    /// Change the number of staff on shift.
    ///
    /// Lowering staff below the number of patients already in treatment is
    /// allowed; nobody is sent back to the queue, and new treatments are refused
    /// until enough slots free up.
    pub fn update_staffing(&self, count: u32) -> Result<()> {
        let count = validate_staff_count(i64::from(count))?;

        let alerts = {
            let mut state = self.state.write();
            let now = self.clock.now();
            state.staff_available = count;

            let mut alerts = Vec::new();
            self.recompute(&state, now, &mut alerts);
            alerts
        };

        debug!(staff_available = count, "Staffing updated");
        self.dispatch(alerts);

        Ok(())
    }

    /// Current estimates for the waiting set, without broadcasting them
    pub fn wait_time_estimates(&self) -> Vec<WaitTimeEstimate> {
        let state = self.state.read();
        let now = self.clock.now();
        self.estimator
            .estimate(&state.ordered_queue(), state.staff_available, now)
    }

    /// Recompute estimates, broadcast them and return them
    pub fn refresh_wait_times(&self) -> Vec<WaitTimeEstimate> {
        let (estimates, timestamp) = {
            let state = self.state.read();
            let now = self.clock.now();
            let estimates = self
                .estimator
                .estimate(&state.ordered_queue(), state.staff_available, now);
            (estimates, now)
        };

        self.dispatch(vec![PendingAlert::WaitTimes {
            estimates: estimates.clone(),
            timestamp,
        }]);
        estimates
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.state.read();
        let mut snapshot = QueueSnapshot {
            total: state.patients.len(),
            waiting: 0,
            treating: 0,
            discharged: 0,
            staff_available: state.staff_available,
            currently_treating: state.currently_treating,
            staffing_ratio: 0.0,
        };
        for patient in &state.patients {
            match patient.status {
                PatientStatus::Waiting => snapshot.waiting += 1,
                PatientStatus::Treating => snapshot.treating += 1,
                PatientStatus::Discharged => snapshot.discharged += 1,
            }
        }
        snapshot.staffing_ratio = self
            .threshold
            .evaluate(snapshot.waiting, snapshot.staff_available)
            .ratio;
        snapshot
    }

    pub fn staff_available(&self) -> u32 {
        self.state.read().staff_available
    }

    pub fn currently_treating(&self) -> u32 {
        self.state.read().currently_treating
    }

    pub fn threshold_policy(&self) -> ThresholdPolicy {
        self.threshold
    }

    /// Threshold evaluation and wait-time recomputation shared by every mutation
    fn recompute(&self, state: &QueueState, now: DateTime<Utc>, alerts: &mut Vec<PendingAlert>) {
        let assessment = self
            .threshold
            .evaluate(state.waiting_count(), state.staff_available);
        if assessment.exceeded {
            alerts.push(PendingAlert::Staffing(assessment));
        }

        let estimates = self
            .estimator
            .estimate(&state.ordered_queue(), state.staff_available, now);
        alerts.push(PendingAlert::WaitTimes {
            estimates,
            timestamp: now,
        });
    }

    /// Deliver alerts; failures are logged and never reach the caller.
    ///
    /// Runs on the caller's thread with no lock held. Dispatchers must not
    /// block (see `AlertDispatcher`).
    fn dispatch(&self, alerts: Vec<PendingAlert>) {
        for alert in alerts {
            let (name, result) = match &alert {
                PendingAlert::CriticalPatient(patient) => {
                    log_alert(
                        CRITICAL_PATIENT,
                        Some(&format!("patient {} ({})", patient.id, patient.symptoms)),
                    );
                    (
                        CRITICAL_PATIENT,
                        self.dispatcher.notify_critical_patient(patient),
                    )
                }
                PendingAlert::TreatmentInterruption(patient) => {
                    log_alert(
                        TREATMENT_INTERRUPT,
                        Some(&format!("patient {}", patient.id)),
                    );
                    (
                        TREATMENT_INTERRUPT,
                        self.dispatcher.notify_treatment_interruption(patient),
                    )
                }
                PendingAlert::Staffing(assessment) => {
                    log_alert(
                        STAFFING_ALERT,
                        Some(&format!(
                            "ratio {:.2} ({} waiting / {} staff)",
                            assessment.ratio,
                            assessment.waiting_patients,
                            assessment.available_staff
                        )),
                    );
                    (
                        STAFFING_ALERT,
                        self.dispatcher.notify_staffing_threshold(
                            assessment.ratio,
                            assessment.waiting_patients,
                            assessment.available_staff,
                        ),
                    )
                }
                PendingAlert::WaitTimes {
                    estimates,
                    timestamp,
                } => (
                    WAIT_TIME_UPDATE,
                    self.dispatcher.update_wait_times(estimates, *timestamp),
                ),
            };

            if let Err(e) = result {
                warn!(
                    dispatcher = self.dispatcher.description(),
                    alert = name,
                    error = %e,
                    "Alert dispatch failed"
                );
            }
        }
    }
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("dispatcher", &self.dispatcher.description())
            .field("clock", &self.clock)
            .field("threshold", &self.threshold)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
