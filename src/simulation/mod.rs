//! # Synthetic Load Driver
//!
//! Emulates a busy emergency department by calling the same public queue
//! operations as any other client: one arrival per tick, then maybe a treatment
//! start for the head of the queue, then maybe a discharge.

pub mod symptoms;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::models::{NewPatient, PatientId};
use crate::queue::QueueManager;
use crate::state_machine::PatientStatus;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub admitted: Option<PatientId>,
    pub treated: Option<PatientId>,
    pub discharged: Option<PatientId>,
}

pub struct SimulationDriver {
    manager: Arc<QueueManager>,
    config: SimulationConfig,
    rng: StdRng,
    patient_counter: u64,
}

impl SimulationDriver {
    pub fn new(manager: Arc<QueueManager>, config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            manager,
            config,
            rng,
            patient_counter: 0,
        }
    }

    /// Run a single simulation step
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let mut outcome = TickOutcome::default();

        let intake = self.random_patient();
        let patient = self.manager.add_patient(intake)?;
        debug!(
            patient_id = %patient.id,
            urgency_level = %patient.urgency_level,
            "[Simulation] Added {}",
            patient.name
        );
        outcome.admitted = Some(patient.id);

        if self.rng.gen_bool(self.config.treat_probability) {
            if let Some(head) = self.manager.get_queue().first() {
                // A full department is the normal case under load
                match self.manager.start_treatment(head.id) {
                    Ok(patient) => {
                        debug!(patient_id = %patient.id, "[Simulation] Started treatment");
                        outcome.treated = Some(patient.id);
                    }
                    Err(e) => debug!(patient_id = %head.id, error = %e, "[Simulation] Treatment not started"),
                }
            }
        }

        if self.rng.gen_bool(self.config.discharge_probability) {
            let treating = self.manager.patients_by_status(PatientStatus::Treating);
            if let Some(chosen) = treating.choose(&mut self.rng) {
                match self.manager.discharge_patient(chosen.id) {
                    Ok(patient) => {
                        debug!(patient_id = %patient.id, "[Simulation] Discharged");
                        outcome.discharged = Some(patient.id);
                    }
                    Err(e) => debug!(patient_id = %chosen.id, error = %e, "[Simulation] Discharge skipped"),
                }
            }
        }

        Ok(outcome)
    }

    /// Tick on the configured interval until `shutdown` is notified.
    /// Returns the number of completed ticks.
    pub async fn run(mut self, shutdown: Arc<Notify>) -> u64 {
        let mut interval = tokio::time::interval(self.config.tick_interval());
        let mut ticks = 0;

        info!(
            tick_interval_ms = self.config.tick_interval_ms,
            "Starting triage simulation"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick() {
                        crate::logging::log_error("simulation", "tick", &e.to_string(), None);
                    }
                    ticks += 1;
                }
                _ = shutdown.notified() => {
                    info!(ticks, "Stopping triage simulation");
                    break;
                }
            }
        }

        ticks
    }

    /// Run the driver on the tokio runtime
    pub fn spawn(self, shutdown: Arc<Notify>) -> JoinHandle<u64> {
        tokio::spawn(self.run(shutdown))
    }

    fn random_patient(&mut self) -> NewPatient {
        self.patient_counter += 1;
        let level = symptoms::weighted_urgency_level(self.rng.gen::<f64>());
        let symptoms = symptoms::random_symptom(level, &mut self.rng);

        NewPatient::new(
            format!("Patient {}", self.patient_counter),
            self.rng.gen_range(1..=90),
            level,
            symptoms,
        )
    }
}
