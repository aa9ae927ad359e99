//! visio-footprint - Environmental footprint of a virtual meeting
//!
//! Reads a coefficient catalog and a scenario description, computes the
//! scenario's damage and prints it as JSON. With `--alternatives` the
//! heavy-visio and light-transport siblings are computed and printed too.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use footprint_catalog::StaticCatalog;
use footprint_engine::{Alternatives, FootprintService, MeetingScenario, ScenarioDescriptor};
use footprint_types::Bound;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::CliConfig;

/// visio-footprint CLI
#[derive(Parser)]
#[command(name = "visio-footprint")]
#[command(about = "Estimate the environmental damage of a virtual meeting", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FOOTPRINT_CONFIG")]
    config: Option<PathBuf>,

    /// Coefficient catalog (JSON); overrides `catalog_path` from the config
    #[arg(long, env = "FOOTPRINT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Scenario description (JSON)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Coefficient bound: upper or lower
    #[arg(short, long)]
    bound: Option<Bound>,

    /// Also generate the two alternative scenarios
    #[arg(long)]
    alternatives: bool,

    /// Log level; overrides the config file
    #[arg(long, env = "FOOTPRINT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "FOOTPRINT_LOG_JSON")]
    json_logs: bool,
}

#[derive(Serialize)]
struct Report {
    scenario: MeetingScenario,
    #[serde(skip_serializing_if = "Option::is_none")]
    alternatives: Option<Alternatives>,
}

fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.to_string().into());

    // Logs go to stderr so stdout stays parseable JSON.
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(
        cli.log_level.as_deref().unwrap_or(&config.logging.level),
        cli.json_logs || config.logging.json,
    );

    let catalog_path = cli
        .catalog
        .or(config.catalog_path)
        .context("no coefficient catalog given (use --catalog or catalog_path)")?;
    let catalog = StaticCatalog::from_path(&catalog_path)
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;

    let raw = std::fs::read_to_string(&cli.scenario)
        .with_context(|| format!("failed to read scenario {}", cli.scenario.display()))?;
    let descriptor: ScenarioDescriptor = serde_json::from_str(&raw)
        .with_context(|| format!("invalid scenario {}", cli.scenario.display()))?;

    let service = FootprintService::in_memory(Arc::new(catalog), config.engine)
        .context("invalid engine configuration")?;
    let scenario = service
        .create_and_compute(&descriptor, &descriptor.payload(cli.bound))
        .context("failed to compute scenario damage")?;
    info!(
        scenario_id = %scenario.id(),
        bound = ?cli.bound,
        "Scenario computed"
    );

    let alternatives = if cli.alternatives {
        Some(
            service
                .generate_alternatives(&scenario.id())
                .context("failed to generate alternatives")?,
        )
    } else {
        None
    };

    let report = Report {
        scenario,
        alternatives,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
