//! Headless tactics runner binary.
//!
//! Runs the agent against a synthetic battlefield and prints one JSON
//! tick report per line to stdout. Logs go to stderr. A run can be
//! recorded as a snapshot replay and re-verified later.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tactics_core::prelude::Agent;
use tactics_headless::{read_frames, replay_orders, Runner, Scenario};

#[derive(Parser)]
#[command(name = "tactics_headless")]
#[command(about = "Headless tactics agent runner for testing and CI")]
#[command(version)]
struct Cli {
    /// RON scenario file (defaults to the built-in skirmish)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override the number of ticks to simulate
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Record each tick's snapshot as a replay frame to this file
    #[arg(long, conflicts_with = "replay")]
    record: Option<PathBuf>,

    /// Re-run recorded replay frames instead of simulating
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let mut scenario = match cli.scenario {
        Some(path) => match Scenario::load(&path) {
            Ok(scenario) => scenario,
            Err(e) => {
                tracing::error!("failed to load scenario: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Scenario::default(),
    };
    if let Some(ticks) = cli.ticks {
        scenario.ticks = ticks;
    }

    if let Some(path) = cli.replay {
        return cmd_replay(&path, &scenario);
    }
    cmd_run(scenario, cli.record.as_deref())
}

/// Simulate the scenario, optionally recording replay frames.
fn cmd_run(scenario: Scenario, record: Option<&std::path::Path>) -> ExitCode {
    tracing::info!(
        name = %scenario.name,
        ticks = scenario.ticks,
        "starting scenario"
    );

    let mut runner = Runner::new(scenario);
    if let Some(path) = record {
        match File::create(path) {
            Ok(file) => runner = runner.with_replay(Box::new(file)),
            Err(e) => {
                tracing::error!("failed to create replay file: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut stdout = std::io::stdout().lock();
    match runner.run(&mut stdout) {
        Ok(reports) => {
            let emitted = reports.iter().filter(|r| r.order.is_some()).count();
            tracing::info!(ticks = reports.len(), orders = emitted, "scenario complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("scenario failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Feed recorded frames to a fresh agent and print the reproduced
/// orders, one JSON line per tick.
fn cmd_replay(path: &std::path::Path, scenario: &Scenario) -> ExitCode {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("failed to open replay file: {e}");
            return ExitCode::FAILURE;
        }
    };
    let frames = match read_frames(&mut file) {
        Ok(frames) => frames,
        Err(e) => {
            tracing::error!("failed to read replay frames: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(frames = frames.len(), "replaying recorded snapshots");

    match replay_orders(&frames, Agent::new(scenario.agent_config())) {
        Ok(ticks) => {
            use std::io::Write;

            let mut stdout = std::io::stdout().lock();
            for tick in &ticks {
                if serde_json::to_writer(&mut stdout, tick).is_err() || writeln!(stdout).is_err() {
                    tracing::error!("failed to write replay output");
                    return ExitCode::FAILURE;
                }
            }
            let emitted = ticks.iter().filter(|t| t.order.is_some()).count();
            tracing::info!(ticks = ticks.len(), orders = emitted, "replay complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("replay failed: {e}");
            ExitCode::FAILURE
        }
    }
}
