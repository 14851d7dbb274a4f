// State machine module for the patient lifecycle
//
// Patients move strictly forward: waiting -> treating -> discharged.

pub mod events;
pub mod patient_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use events::PatientEvent;
pub use patient_state_machine::{determine_target_state, LifecyclePolicy};
pub use states::PatientStatus;
