use super::{events::PatientEvent, states::PatientStatus};

/// Transition rules that are configurable per deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    /// Whether a waiting patient may be discharged without ever being treated
    pub allow_discharge_from_waiting: bool,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            allow_discharge_from_waiting: true,
        }
    }
}

/// Determine the target state based on current state and event.
///
/// Returns `None` when the transition is illegal; callers turn that into an
/// `InvalidState` error carrying their own context.
pub fn determine_target_state(
    current_state: PatientStatus,
    event: PatientEvent,
    policy: LifecyclePolicy,
) -> Option<PatientStatus> {
    match (current_state, event) {
        (PatientStatus::Waiting, PatientEvent::StartTreatment) => Some(PatientStatus::Treating),
        (PatientStatus::Treating, PatientEvent::Discharge) => Some(PatientStatus::Discharged),

        // Left without being seen
        (PatientStatus::Waiting, PatientEvent::Discharge)
            if policy.allow_discharge_from_waiting =>
        {
            Some(PatientStatus::Discharged)
        }

        _ => None,
    }
}
