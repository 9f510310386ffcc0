//! Scenario runner for the bolt combat runtime.
//!
//! Stages a small fight on a manual clock and prints every event the runtime
//! published. Run with: `cargo run -p bolt-sim -- --scenario duel`

mod output;
mod scenario;

use anyhow::Result;
use bolt_runtime::{ClockMode, Runtime, RuntimeConfig, Topic};
use clap::Parser;

use output::OutputFormat;
use scenario::Scenario;

/// Stage a bolt fight and print the event stream
#[derive(Parser)]
#[command(name = "bolt-sim")]
#[command(about = "Stage a bolt fight and print the event stream", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario to stage
    #[arg(short, long, value_enum, default_value = "duel")]
    scenario: Scenario,

    /// Dice seed (overrides BOLT_SEED)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for BOLT_* tuning)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = RuntimeConfig::from_env();
    config.clock = ClockMode::Manual;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    // Events are printed after the scenario, so every topic has to hold all of them.
    config.event_buffer_size = config.event_buffer_size.max(4_096);
    tracing::info!(seed = config.seed, scenario = ?cli.scenario, "staging scenario");

    let runtime = Runtime::builder()
        .config(config)
        .region(scenario::REGION)
        .build()
        .await?;
    let mut receivers = runtime.event_bus().subscribe_multiple(&Topic::ALL);

    cli.scenario.stage(&runtime).await?;

    let events = output::collect(&mut receivers);
    output::print(&events, cli.format)?;

    runtime.shutdown().await?;
    Ok(())
}
