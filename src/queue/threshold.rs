use serde::Serialize;

/// Staffing overload check: waiting patients per available staff member
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    staff_threshold_ratio: f64,
}

/// Result of one threshold evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StaffingAssessment {
    pub ratio: f64,
    pub waiting_patients: usize,
    pub available_staff: u32,
    pub exceeded: bool,
}

impl ThresholdPolicy {
    pub fn new(staff_threshold_ratio: f64) -> Self {
        Self {
            staff_threshold_ratio,
        }
    }

    pub fn staff_threshold_ratio(&self) -> f64 {
        self.staff_threshold_ratio
    }

    /// Evaluate the current counts. Exceeding means strictly greater than the
    /// configured ratio.
    pub fn evaluate(&self, waiting_patients: usize, available_staff: u32) -> StaffingAssessment {
        let ratio = staffing_ratio(waiting_patients, available_staff);
        StaffingAssessment {
            ratio,
            waiting_patients,
            available_staff,
            exceeded: ratio > self.staff_threshold_ratio,
        }
    }
}

/// Waiting patients per staff member; zero staff with anyone waiting is unbounded
pub fn staffing_ratio(waiting_patients: usize, available_staff: u32) -> f64 {
    match (waiting_patients, available_staff) {
        (0, _) => 0.0,
        (_, 0) => f64::INFINITY,
        (waiting, staff) => waiting as f64 / f64::from(staff),
    }
}
