use crate::constants::events;
use crate::models::{Patient, PatientId, UrgencyLevel};
use crate::queue::WaitTimeEstimate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured alert payload delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AlertEvent {
    CriticalPatient {
        message: String,
        patient: PatientAlert,
    },
    TreatmentInterrupt {
        message: String,
        patient: PatientAlert,
    },
    StaffingAlert {
        message: String,
        details: StaffingDetails,
    },
    WaitTimeUpdate {
        wait_times: Vec<WaitTimeEstimate>,
        timestamp: DateTime<Utc>,
    },
}

/// Patient fields carried by urgency alerts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAlert {
    pub id: PatientId,
    pub name: String,
    pub urgency_level: UrgencyLevel,
    pub symptoms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingDetails {
    pub ratio: f64,
    pub waiting_patients: usize,
    pub available_staff: u32,
}

/// Alert as it leaves the broadcast transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedAlert {
    pub id: Uuid,
    pub event: AlertEvent,
    pub published_at: DateTime<Utc>,
}

impl From<&Patient> for PatientAlert {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            urgency_level: patient.urgency_level,
            symptoms: patient.symptoms.clone(),
        }
    }
}

impl AlertEvent {
    pub fn critical_patient(patient: &Patient) -> Self {
        Self::CriticalPatient {
            message: "ALERT: Critical patient (Level 1) has arrived and needs immediate attention"
                .to_string(),
            patient: patient.into(),
        }
    }

    pub fn treatment_interrupt(patient: &Patient) -> Self {
        Self::TreatmentInterrupt {
            message: "URGENT: Level 1 emergency requires immediate staff attention, potentially interrupting current treatments"
                .to_string(),
            patient: patient.into(),
        }
    }

    pub fn staffing_alert(ratio: f64, waiting_patients: usize, available_staff: u32) -> Self {
        Self::StaffingAlert {
            message: "ALERT: Patient-to-staff ratio exceeds safe levels".to_string(),
            details: StaffingDetails {
                ratio,
                waiting_patients,
                available_staff,
            },
        }
    }

    pub fn wait_time_update(wait_times: &[WaitTimeEstimate], timestamp: DateTime<Utc>) -> Self {
        Self::WaitTimeUpdate {
            wait_times: wait_times.to_vec(),
            timestamp,
        }
    }

    /// Event name used on the wire and in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::CriticalPatient { .. } => events::CRITICAL_PATIENT,
            Self::TreatmentInterrupt { .. } => events::TREATMENT_INTERRUPT,
            Self::StaffingAlert { .. } => events::STAFFING_ALERT,
            Self::WaitTimeUpdate { .. } => events::WAIT_TIME_UPDATE,
        }
    }
}
