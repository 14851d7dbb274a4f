use crate::models::PatientId;
use crate::state_machine::PatientStatus;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TriageError {
    /// Every violated input constraint, reported together
    Validation(Vec<String>),
    NotFound(PatientId),
    InvalidState {
        id: PatientId,
        status: PatientStatus,
        operation: &'static str,
    },
    Capacity {
        currently_treating: u32,
        staff_available: u32,
    },
    Configuration(String),
}

impl TriageError {
    pub fn validation(message: impl Into<String>) -> Self {
        TriageError::Validation(vec![message.into()])
    }

    /// Violations carried by a validation error, empty for every other variant
    pub fn violations(&self) -> &[String] {
        match self {
            TriageError::Validation(violations) => violations,
            _ => &[],
        }
    }
}

impl fmt::Display for TriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriageError::Validation(violations) => {
                write!(f, "Validation error: {}", violations.join("; "))
            }
            TriageError::NotFound(id) => write!(f, "Patient not found: {id}"),
            TriageError::InvalidState {
                id,
                status,
                operation,
            } => write!(
                f,
                "Invalid state: cannot {operation} patient {id} while {status}"
            ),
            TriageError::Capacity {
                currently_treating,
                staff_available,
            } => write!(
                f,
                "No staff available to treat patient ({currently_treating}/{staff_available} treatment slots in use)"
            ),
            TriageError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for TriageError {}

pub type Result<T> = std::result::Result<T, TriageError>;
