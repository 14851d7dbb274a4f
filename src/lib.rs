#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Triage Queue
//!
//! In-memory patient triage queue for an emergency department.
//!
//! ## Overview
//!
//! Patients are admitted with a triage level from 1 (critical) to 5 (non-urgent),
//! ordered by urgency then arrival, moved through `waiting -> treating -> discharged`
//! as staff capacity allows, and watched for staffing overload. Every mutation
//! re-evaluates the staffing ratio and publishes fresh wait-time estimates.
//!
//! ## Module Organization
//!
//! - [`queue`] - The queue manager, threshold policy, and wait-time estimator
//! - [`models`] - Patient records and triage levels
//! - [`state_machine`] - Patient lifecycle transitions
//! - [`events`] - Alert payloads and dispatchers
//! - [`validation`] - Intake and staffing validation
//! - [`config`] - Layered configuration
//! - [`simulation`] - Synthetic arrival and treatment load
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use triage_queue::{BroadcastDispatcher, NewPatient, QueueManager, TriageConfig};
//!
//! # fn example() -> triage_queue::Result<()> {
//! let config = TriageConfig::load(None)?;
//! let dispatcher = Arc::new(BroadcastDispatcher::new(config.alert_channel_capacity));
//! let manager = QueueManager::new(&config, dispatcher)?;
//!
//! let patient = manager.add_patient(NewPatient::new("Ada", 34, 2, "Chest pain"))?;
//! manager.start_treatment(patient.id)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod queue;
pub mod simulation;
pub mod state_machine;
pub mod validation;

pub use config::{BaseWaitTable, SimulationConfig, TriageConfig};
pub use error::{Result, TriageError};
pub use events::{
    AlertDispatcher, AlertEvent, BroadcastDispatcher, NoopDispatcher, PublishedAlert,
    RecordingDispatcher,
};
pub use models::{NewPatient, Patient, PatientId, UrgencyLevel};
pub use queue::{
    Clock, ManualClock, QueueManager, QueueSnapshot, StaffingAssessment, SystemClock,
    ThresholdPolicy, WaitTimeEstimate, WaitTimeEstimator,
};
pub use simulation::{SimulationDriver, TickOutcome};
pub use state_machine::{LifecyclePolicy, PatientEvent, PatientStatus};
