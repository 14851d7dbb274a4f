//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod strategies;

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use triage_queue::{ManualClock, NewPatient, QueueManager, RecordingDispatcher, TriageConfig};

/// Manager wired to an in-memory recorder and a hand-driven clock
pub struct TestQueue {
    pub manager: QueueManager,
    pub alerts: Arc<RecordingDispatcher>,
    pub clock: Arc<ManualClock>,
}

impl TestQueue {
    pub fn new() -> Self {
        Self::with_config(TriageConfig::default())
    }

    pub fn with_staff(staff: u32) -> Self {
        Self::with_config(TriageConfig {
            default_staff: staff,
            ..TriageConfig::default()
        })
    }

    pub fn with_config(config: TriageConfig) -> Self {
        Self::build(config, Arc::new(RecordingDispatcher::new()))
    }

    /// Queue whose dispatcher fails every delivery
    pub fn failing() -> Self {
        Self::build(TriageConfig::default(), Arc::new(RecordingDispatcher::failing()))
    }

    fn build(config: TriageConfig, alerts: Arc<RecordingDispatcher>) -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        ));
        let manager = QueueManager::with_clock(&config, alerts.clone(), clock.clone())
            .expect("valid test configuration");
        Self {
            manager,
            alerts,
            clock,
        }
    }

    /// Advance the clock one second so arrival order is unambiguous
    pub fn tick(&self) {
        self.clock.advance(chrono::Duration::seconds(1));
    }
}

/// Valid intake at the given triage level
pub fn intake(name: &str, urgency_level: i64) -> NewPatient {
    NewPatient::new(name, 42, urgency_level, "Moderate pain")
}
