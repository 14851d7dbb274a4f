//! # Triage Configuration
//!
//! Operating limits are loaded once at startup and never re-derived. Sources are
//! layered with the `config` crate, later sources winning:
//!
//! 1. compiled defaults (`TriageConfig::default()`)
//! 2. an optional file (TOML, YAML or JSON, chosen by extension)
//! 3. `TRIAGE_*` environment variables, `__` separating nested keys
//!    (`TRIAGE_SIMULATION__ENABLED=true`)

use crate::constants::{defaults, ENV_PREFIX};
use crate::error::{Result, TriageError};
use crate::models::UrgencyLevel;
use crate::state_machine::LifecyclePolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Staffing alert fires when waiting / staff exceeds this ratio
    pub staff_threshold_ratio: f64,
    /// Staff on shift when the manager starts
    pub default_staff: u32,
    pub base_wait_minutes: BaseWaitTable,
    pub wait_time_unit_seconds: u64,
    pub allow_discharge_from_waiting: bool,
    pub alert_channel_capacity: usize,
    pub simulation: SimulationConfig,
}

/// Base wait per urgency level, in wait-time units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseWaitTable {
    pub level_1: u64,
    pub level_2: u64,
    pub level_3: u64,
    pub level_4: u64,
    pub level_5: u64,
}

/// Synthetic-load driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub enabled: bool,
    pub tick_interval_ms: u64,
    pub treat_probability: f64,
    pub discharge_probability: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            staff_threshold_ratio: defaults::STAFF_THRESHOLD_RATIO,
            default_staff: defaults::STAFF_AVAILABLE,
            base_wait_minutes: BaseWaitTable::default(),
            wait_time_unit_seconds: defaults::WAIT_TIME_UNIT_SECONDS,
            allow_discharge_from_waiting: true,
            alert_channel_capacity: defaults::ALERT_CHANNEL_CAPACITY,
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for BaseWaitTable {
    fn default() -> Self {
        let [level_1, level_2, level_3, level_4, level_5] = defaults::BASE_WAIT_MINUTES;
        Self {
            level_1,
            level_2,
            level_3,
            level_4,
            level_5,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tick_interval_ms: defaults::SIMULATION_TICK_INTERVAL_MS,
            treat_probability: defaults::SIMULATION_TREAT_PROBABILITY,
            discharge_probability: defaults::SIMULATION_DISCHARGE_PROBABILITY,
            seed: None,
        }
    }
}

impl BaseWaitTable {
    pub fn for_level(&self, level: UrgencyLevel) -> u64 {
        self.as_array()[level.index()]
    }

    pub fn as_array(&self) -> [u64; 5] {
        [
            self.level_1,
            self.level_2,
            self.level_3,
            self.level_4,
            self.level_5,
        ]
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl TriageConfig {
    /// Load defaults, then the optional file, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        Self::build(path, environment)
    }

    /// Load from defaults and the process environment only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load with an explicit set of environment variables instead of the
    /// process environment. Keys carry the `TRIAGE_` prefix.
    pub fn load_from_sources(
        path: Option<&Path>,
        env_vars: HashMap<String, String>,
    ) -> Result<Self> {
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(env_vars.into_iter().collect()));
        Self::build(path, environment)
    }

    fn build(path: Option<&Path>, environment: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.is_file() {
                return Err(TriageError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        let config: TriageConfig = builder
            .add_source(environment)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| TriageError::Configuration(format!("Failed to load configuration: {e}")))?;

        config.validate()?;

        debug!(
            staff_threshold_ratio = config.staff_threshold_ratio,
            default_staff = config.default_staff,
            simulation_enabled = config.simulation.enabled,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Reject values the queue manager cannot operate with
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if !(self.staff_threshold_ratio.is_finite() && self.staff_threshold_ratio > 0.0) {
            problems.push(format!(
                "staff_threshold_ratio must be a positive number (got {})",
                self.staff_threshold_ratio
            ));
        }
        if self.default_staff < 1 {
            problems.push("default_staff must be at least 1".to_string());
        }
        if self.wait_time_unit_seconds == 0 {
            problems.push("wait_time_unit_seconds must be at least 1".to_string());
        }
        for level in UrgencyLevel::all() {
            let minutes = self.base_wait_minutes.for_level(level);
            if minutes > defaults::MAX_BASE_WAIT_MINUTES {
                problems.push(format!(
                    "base_wait_minutes.level_{level} must be at most {} (got {minutes})",
                    defaults::MAX_BASE_WAIT_MINUTES
                ));
            }
        }
        if self.alert_channel_capacity == 0 {
            problems.push("alert_channel_capacity must be at least 1".to_string());
        }
        if self.simulation.tick_interval_ms == 0 {
            problems.push("simulation.tick_interval_ms must be at least 1".to_string());
        }
        for (name, value) in [
            ("treat_probability", self.simulation.treat_probability),
            ("discharge_probability", self.simulation.discharge_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                problems.push(format!(
                    "simulation.{name} must be between 0 and 1 (got {value})"
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(TriageError::Configuration(problems.join("; ")))
        }
    }

    pub fn wait_time_unit(&self) -> Duration {
        Duration::from_secs(self.wait_time_unit_seconds)
    }

    pub fn lifecycle_policy(&self) -> LifecyclePolicy {
        LifecyclePolicy {
            allow_discharge_from_waiting: self.allow_discharge_from_waiting,
        }
    }
}
