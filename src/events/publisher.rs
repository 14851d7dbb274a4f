use super::dispatcher::{AlertDispatcher, DispatchResult};
use super::types::{AlertEvent, PublishedAlert};
use crate::constants::defaults;
use crate::models::Patient;
use crate::queue::WaitTimeEstimate;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

/// In-process alert transport fanning out to any number of subscribers
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    sender: broadcast::Sender<PublishedAlert>,
}

impl BroadcastDispatcher {
    /// Create a new dispatcher with the specified per-subscriber buffer
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an alert to every current subscriber
    pub fn publish(&self, event: AlertEvent) -> DispatchResult {
        let alert = PublishedAlert {
            id: Uuid::new_v4(),
            event,
            published_at: Utc::now(),
        };

        // send() only fails when nobody is subscribed, and alerts are
        // at-most-once, so an empty audience is not an error.
        match self.sender.send(alert) {
            Ok(receivers) => {
                trace!(receivers, "Alert published");
                Ok(())
            }
            Err(broadcast::error::SendError(alert)) => {
                trace!(alert = alert.event.name(), "Alert dropped, no subscribers");
                Ok(())
            }
        }
    }

    /// Subscribe to alerts published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedAlert> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastDispatcher {
    fn default() -> Self {
        Self::new(defaults::ALERT_CHANNEL_CAPACITY)
    }
}

impl AlertDispatcher for BroadcastDispatcher {
    fn notify_critical_patient(&self, patient: &Patient) -> DispatchResult {
        self.publish(AlertEvent::critical_patient(patient))
    }

    fn notify_treatment_interruption(&self, patient: &Patient) -> DispatchResult {
        self.publish(AlertEvent::treatment_interrupt(patient))
    }

    fn notify_staffing_threshold(
        &self,
        ratio: f64,
        waiting_patients: usize,
        available_staff: u32,
    ) -> DispatchResult {
        self.publish(AlertEvent::staffing_alert(
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
        self.publish(AlertEvent::wait_time_update(estimates, timestamp))
    }

    fn description(&self) -> &'static str {
        "broadcast dispatcher"
    }
}
