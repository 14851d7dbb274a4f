use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a patient record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    /// Initial state when the patient arrives
    Waiting,
    /// Patient occupies a treatment slot
    Treating,
    /// Patient has left the department
    Discharged,
}

impl PatientStatus {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Discharged)
    }

    /// Check if this state holds a treatment slot
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Treating)
    }

    /// Check if the patient is still in the triage queue
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Treating => write!(f, "treating"),
            Self::Discharged => write!(f, "discharged"),
        }
    }
}

impl std::str::FromStr for PatientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "treating" => Ok(Self::Treating),
            "discharged" => Ok(Self::Discharged),
            _ => Err(format!("Invalid patient status: {s}")),
        }
    }
}

/// Default state for new patients
impl Default for PatientStatus {
    fn default() -> Self {
        Self::Waiting
    }
}
