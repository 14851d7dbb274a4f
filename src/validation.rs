//! Input validation for patient intake
//!
//! Every constraint is checked before a record exists, and all violations are
//! reported together so a caller can fix the whole form in one round trip.

use crate::error::{Result, TriageError};
use crate::models::patient::{NewPatient, ValidatedIntake};
use crate::models::UrgencyLevel;

/// Oldest age accepted at intake
pub const MAX_PATIENT_AGE: i64 = 120;

/// Minimum length of the symptom description, in characters
pub const MIN_SYMPTOMS_LENGTH: usize = 3;

/// Validates a new patient intake, collecting every violated constraint
pub fn validate_new_patient(input: &NewPatient) -> Result<ValidatedIntake> {
    let mut violations = Vec::new();

    let name = input.name.trim();
    if name.is_empty() {
        violations.push("Patient name is required".to_string());
    }

    let age = u8::try_from(input.age)
        .ok()
        .filter(|age| i64::from(*age) <= MAX_PATIENT_AGE);
    if age.is_none() {
        violations.push(format!(
            "Age must be a number between 0 and {MAX_PATIENT_AGE} (got {})",
            input.age
        ));
    }

    let urgency_level = UrgencyLevel::new(input.urgency_level);
    if urgency_level.is_none() {
        violations.push(format!(
            "Triage level must be a number between {} and {} (got {})",
            UrgencyLevel::MIN,
            UrgencyLevel::MAX,
            input.urgency_level
        ));
    }

    let symptoms = input.symptoms.trim();
    if symptoms.chars().count() < MIN_SYMPTOMS_LENGTH {
        violations.push(format!(
            "Symptoms must be a descriptive string of at least {MIN_SYMPTOMS_LENGTH} characters"
        ));
    }

    match (age, urgency_level) {
        (Some(age), Some(urgency_level)) if violations.is_empty() => Ok(ValidatedIntake {
            name: name.to_string(),
            age,
            urgency_level,
            symptoms: symptoms.to_string(),
        }),
        _ => Err(TriageError::Validation(violations)),
    }
}

/// Validates a staffing level update
pub fn validate_staff_count(count: i64) -> Result<u32> {
    u32::try_from(count)
        .ok()
        .filter(|count| *count >= 1)
        .ok_or_else(|| {
            TriageError::validation(format!("Staff count must be at least 1 (got {count})"))
        })
}
