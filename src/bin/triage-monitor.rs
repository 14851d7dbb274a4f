//! Triage Monitor Binary
//!
//! Runs a queue manager with the broadcast alert transport, logs every alert as
//! JSON, and optionally drives it with synthetic load until Ctrl-C.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::{broadcast, Notify};
use tracing::{info, warn};

use triage_queue::logging::init_structured_logging;
use triage_queue::{BroadcastDispatcher, QueueManager, SimulationDriver, TriageConfig};

#[derive(Parser)]
#[command(name = "triage-monitor")]
#[command(about = "Run the triage queue and stream its alerts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drive the queue with synthetic arrivals regardless of configuration
    #[arg(long)]
    simulate: bool,

    /// Override the initial staff count
    #[arg(long)]
    staff: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let mut config =
        TriageConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(staff) = cli.staff {
        config.default_staff = staff;
    }
    if cli.simulate {
        config.simulation.enabled = true;
    }

    let dispatcher = Arc::new(BroadcastDispatcher::new(config.alert_channel_capacity));
    let alerts = tokio::spawn(stream_alerts(dispatcher.subscribe()));
    let manager = Arc::new(
        QueueManager::new(&config, dispatcher.clone()).context("invalid configuration")?,
    );

    info!(
        staff_available = manager.staff_available(),
        staff_threshold_ratio = manager.threshold_policy().staff_threshold_ratio(),
        "Triage monitor started"
    );

    let shutdown = Arc::new(Notify::new());
    let simulation = config
        .simulation
        .enabled
        .then(|| SimulationDriver::new(manager.clone(), config.simulation.clone()).spawn(shutdown.clone()));

    signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    if let Some(handle) = simulation {
        shutdown.notify_one();
        let ticks = handle.await.context("simulation task panicked")?;
        info!(ticks, "Simulation stopped");
    }

    let snapshot = manager.snapshot();
    info!(
        total = snapshot.total,
        waiting = snapshot.waiting,
        treating = snapshot.treating,
        discharged = snapshot.discharged,
        "Final queue state"
    );

    // Dropping every sender closes the channel and ends the alert stream
    drop(manager);
    drop(dispatcher);
    alerts.await.context("alert stream task panicked")?;

    Ok(())
}

async fn stream_alerts(mut receiver: broadcast::Receiver<triage_queue::PublishedAlert>) {
    loop {
        match receiver.recv().await {
            Ok(alert) => match serde_json::to_string(&alert) {
                Ok(json) => info!(alert = alert.event.name(), payload = %json, "Alert received"),
                Err(e) => warn!(error = %e, "Failed to serialize alert"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Alert subscriber lagged, alerts dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
