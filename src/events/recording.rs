use super::dispatcher::{AlertDispatcher, DispatchError, DispatchResult};
use super::types::AlertEvent;
use crate::models::Patient;
use crate::queue::WaitTimeEstimate;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Dispatcher that keeps every alert in memory, in dispatch order.
///
/// Useful for tests and for embedding applications that poll alerts instead
/// of subscribing. `failing()` builds one that records and then reports an
/// error, to exercise the fire-and-forget path.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    events: Mutex<Vec<AlertEvent>>,
    fail: bool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded alerts with the given event name
    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }

    /// Most recent alert with the given event name
    pub fn last(&self, name: &str) -> Option<AlertEvent> {
        self.events
            .lock()
            .iter()
            .rev()
            .find(|event| event.name() == name)
            .cloned()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn record(&self, event: AlertEvent) -> DispatchResult {
        self.events.lock().push(event);
        if self.fail {
            Err(DispatchError::Unavailable("recording dispatcher set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

impl AlertDispatcher for RecordingDispatcher {
    fn notify_critical_patient(&self, patient: &Patient) -> DispatchResult {
        self.record(AlertEvent::critical_patient(patient))
    }

    fn notify_treatment_interruption(&self, patient: &Patient) -> DispatchResult {
        self.record(AlertEvent::treatment_interrupt(patient))
    }

    fn notify_staffing_threshold(
        &self,
        ratio: f64,
        waiting_patients: usize,
        available_staff: u32,
    ) -> DispatchResult {
        self.record(AlertEvent::staffing_alert(
            ratio,
            waiting_patients,
            available_staff,
        ))
    }

    fn update_wait_times(
        &self,
        estimates: &[WaitTimeEstimate],
        timestamp: DateTime<Utc>,
    ) -> DispatchResult {
        self.record(AlertEvent::wait_time_update(estimates, timestamp))
    }

    fn description(&self) -> &'static str {
        "recording dispatcher"
    }
}
