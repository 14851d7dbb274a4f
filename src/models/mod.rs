pub mod patient;
pub mod urgency;

// Re-export core models for easy access
pub use patient::{NewPatient, Patient, PatientId};
pub use urgency::UrgencyLevel;
