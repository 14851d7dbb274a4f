use serde::{Deserialize, Serialize};

/// Events that can trigger patient state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientEvent {
    /// Assign a treatment slot to a waiting patient
    StartTreatment,
    /// Release the patient from the department
    Discharge,
}

impl PatientEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StartTreatment => "start_treatment",
            Self::Discharge => "discharge",
        }
    }
}
