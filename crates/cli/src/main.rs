mod error;
mod replay;
mod scenario;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trimline_engine::EngineConfig;

use crate::error::Result;
use crate::replay::{replay, write_lines};
use crate::scenario::Scenario;

/// Replays a gesture scenario and prints the engine events as JSON lines.
#[derive(Debug, Parser)]
#[command(name = "trimline", version)]
struct Args {
    /// Scenario JSON file.
    scenario: PathBuf,

    /// Engine config JSON file. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final segments after the events.
    #[arg(long)]
    segments: bool,
}

fn main() {
    init_tracing();

    if let Err(error) = run(Args::parse()) {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let scenario = Scenario::load(&args.scenario)?;
    let replayed = replay(&scenario, config)?;
    info!(
        steps = scenario.steps.len(),
        events = replayed.lines.len(),
        segments = replayed.segments.len(),
        "scenario replayed"
    );

    let stdout = std::io::stdout();
    write_lines(&replayed.lines, stdout.lock())?;
    if args.segments {
        let json = serde_json::to_string(&replayed.segments)
            .map_err(|source| error::CliError::Output(source.into()))?;
        println!("{json}");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
