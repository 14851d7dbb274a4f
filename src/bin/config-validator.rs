//! # Triage Configuration Validator
//!
//! Command-line tool for checking a triage configuration file, together with any
//! `TRIAGE_*` environment overrides, before starting the monitor.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use triage_queue::constants::{events, ENV_PREFIX};
use triage_queue::TriageConfig;

#[derive(Parser)]
#[command(name = "config-validator")]
#[command(about = "Validate triage queue configuration")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path; defaults and environment only when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format (table, json)
    #[arg(long, default_value = "table")]
    format: String,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate the effective configuration
    Validate,

    /// Print the effective configuration
    Show,

    /// List the alert names subscribers can receive
    Alerts,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let result = match &cli.command {
        Some(Commands::Validate) | None => validate_config(&cli),
        Some(Commands::Show) => show_config(&cli),
        Some(Commands::Alerts) => list_alerts(),
    };

    match result {
        Ok(()) => {
            info!("Configuration check completed successfully");
            process::exit(0);
        }
        Err(e) => {
            error!("Configuration check failed: {}", e);
            process::exit(1);
        }
    }
}

fn load(cli: &Cli) -> Result<TriageConfig, Box<dyn std::error::Error>> {
    Ok(TriageConfig::load(cli.config.as_deref())?)
}

fn validate_config(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔧 Validating Triage Configuration");
    match &cli.config {
        Some(path) => println!("File: {}", path.display()),
        None => println!("File: (none, defaults and {ENV_PREFIX}_* environment only)"),
    }
    println!();

    let config = load(cli)?;
    config.validate()?;

    println!("✅ Configuration is valid");
    println!();
    print_config(cli, &config)
}

fn show_config(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(cli)?;
    print_config(cli, &config)
}

fn print_config(cli: &Cli, config: &TriageConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(config)?),
        "table" => print_table(config),
        other => return Err(format!("Unsupported output format: {other}").into()),
    }
    Ok(())
}

fn print_table(config: &TriageConfig) {
    println!("📋 Effective Configuration:");
    println!("  staff_threshold_ratio     {}", config.staff_threshold_ratio);
    println!("  default_staff             {}", config.default_staff);
    println!("  wait_time_unit_seconds    {}", config.wait_time_unit_seconds);
    println!("  allow_discharge_from_waiting {}", config.allow_discharge_from_waiting);
    println!("  alert_channel_capacity    {}", config.alert_channel_capacity);

    println!("\n⏱  Base wait per triage level:");
    for (index, minutes) in config.base_wait_minutes.as_array().iter().enumerate() {
        println!("  level {}                   {}", index + 1, minutes);
    }

    let simulation = &config.simulation;
    println!("\n🎲 Simulation:");
    println!("  enabled                   {}", simulation.enabled);
    println!("  tick_interval_ms          {}", simulation.tick_interval_ms);
    println!("  treat_probability         {}", simulation.treat_probability);
    println!("  discharge_probability     {}", simulation.discharge_probability);
    match simulation.seed {
        Some(seed) => println!("  seed                      {seed}"),
        None => println!("  seed                      (entropy)"),
    }
}

fn list_alerts() -> Result<(), Box<dyn std::error::Error>> {
    println!("📣 Alert names:");
    for name in events::ALL {
        println!("  • {name}");
    }
    Ok(())
}
