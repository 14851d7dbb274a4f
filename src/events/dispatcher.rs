use crate::models::Patient;
use crate::queue::WaitTimeEstimate;
use chrono::{DateTime, Utc};

/// Error types for alert delivery
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Alert channel is closed")]
    ChannelClosed,
    #[error("Alert transport unavailable: {0}")]
    Unavailable(String),
}

pub type DispatchResult = Result<(), DispatchError>;

/// Capability the queue manager uses to raise alerts.
///
/// Calls are fire-and-forget: the manager logs and discards every error, and
/// always invokes the dispatcher after releasing its state lock.
///
/// # Blocking
///
/// Every method runs synchronously on the thread performing the queue
/// operation, so its latency is added to that operation. Implementations must
/// not block: no network or disk I/O, no waiting on locks held by other
/// callers. Anything slow belongs behind a channel, the way
/// [`BroadcastDispatcher`](super::BroadcastDispatcher) hands alerts to its
/// subscribers. Calling back into the `QueueManager` from a dispatcher is
/// permitted.
pub trait AlertDispatcher: Send + Sync {
    fn notify_critical_patient(&self, patient: &Patient) -> DispatchResult;

    fn notify_treatment_interruption(&self, patient: &Patient) -> DispatchResult;

    fn notify_staffing_threshold(
        &self,
        ratio: f64,
        waiting_patients: usize,
        available_staff: u32,
    ) -> DispatchResult;

    fn update_wait_times(
        &self,
        estimates: &[WaitTimeEstimate],
        timestamp: DateTime<Utc>,
    ) -> DispatchResult;

    /// Get a description of this dispatcher for logging
    fn description(&self) -> &'static str {
        "alert dispatcher"
    }
}

/// Dispatcher that drops every alert
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatcher;

impl AlertDispatcher for NoopDispatcher {
    fn notify_critical_patient(&self, _patient: &Patient) -> DispatchResult {
        Ok(())
    }

    fn notify_treatment_interruption(&self, _patient: &Patient) -> DispatchResult {
        Ok(())
    }

    fn notify_staffing_threshold(
        &self,
        _ratio: f64,
        _waiting_patients: usize,
        _available_staff: u32,
    ) -> DispatchResult {
        Ok(())
    }

    fn update_wait_times(
        &self,
        _estimates: &[WaitTimeEstimate],
        _timestamp: DateTime<Utc>,
    ) -> DispatchResult {
        Ok(())
    }

    fn description(&self) -> &'static str {
        "no-op dispatcher"
    }
}
