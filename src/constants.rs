//! # System Constants
//!
//! Default operating limits and alert event names shared by the queue manager,
//! the configuration layer and alert subscribers.

/// Alert event names as seen by subscribers
pub mod events {
    pub const CRITICAL_PATIENT: &str = "critical-patient";
    pub const TREATMENT_INTERRUPT: &str = "treatment-interrupt";
    pub const STAFFING_ALERT: &str = "staffing-alert";
    pub const WAIT_TIME_UPDATE: &str = "wait-time-update";

    pub const ALL: [&str; 4] = [
        CRITICAL_PATIENT,
        TREATMENT_INTERRUPT,
        STAFFING_ALERT,
        WAIT_TIME_UPDATE,
    ];
}

/// Default limits used when no configuration overrides them
pub mod defaults {
    /// Alert when the waiting-to-staff ratio exceeds this value
    pub const STAFF_THRESHOLD_RATIO: f64 = 3.0;

    /// Treatment slots available at startup
    pub const STAFF_AVAILABLE: u32 = 5;

    /// Base wait per urgency level, in wait-time units, most critical first
    pub const BASE_WAIT_MINUTES: [u64; 5] = [2, 10, 30, 90, 180];

    /// Largest accepted base wait for any level: one week of minutes
    pub const MAX_BASE_WAIT_MINUTES: u64 = 7 * 24 * 60;

    /// Length of one wait-time unit
    pub const WAIT_TIME_UNIT_SECONDS: u64 = 60;

    /// Buffered alerts per broadcast subscriber before it starts lagging
    pub const ALERT_CHANNEL_CAPACITY: usize = 1000;

    pub const SIMULATION_TICK_INTERVAL_MS: u64 = 1000;
    pub const SIMULATION_TREAT_PROBABILITY: f64 = 0.7;
    pub const SIMULATION_DISCHARGE_PROBABILITY: f64 = 0.5;
}

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TRIAGE";
