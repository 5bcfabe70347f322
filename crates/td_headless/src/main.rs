//! Headless tower-defense runner.
//!
//! This binary runs levels without graphics for balance testing and CI
//! verification. Levels load from RON files; a scripted strategy stands
//! in for the player.
//!
//! # Usage
//!
//! ```bash
//! # Play one level with the default strategy
//! cargo run -p td_headless -- run --levels assets/levels --level 1
//!
//! # Play every level in a directory and summarize
//! cargo run -p td_headless -- sweep --levels assets/levels
//!
//! # Parse and sanity-check level files
//! cargo run -p td_headless -- validate --levels assets/levels
//! ```
//!
//! Output (stdout): one JSON summary per run.
//! Logs (stderr): debug information.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use td_core::prelude::*;

mod levels;
mod strategy;

use levels::load_catalogue;
use strategy::ScriptedPlayer;

/// Fixed step used by every headless run.
const FRAME_DT: f32 = 1.0 / 60.0;

/// Wall of simulated seconds after which a run is declared stuck.
const DEFAULT_TIME_LIMIT: f32 = 1800.0;

#[derive(Parser)]
#[command(name = "td_headless")]
#[command(about = "Headless tower-defense runner for balance testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single level to its end state
    Run {
        /// Directory of level RON files
        #[arg(long, default_value = "assets/levels")]
        levels: PathBuf,

        /// Level id to play
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Tower build order, e.g. "basic,basic,splash"
        #[arg(long, default_value = "basic,basic,sniper,splash")]
        build: String,

        /// Simulated-seconds limit before the run is declared stuck
        #[arg(long, default_value_t = DEFAULT_TIME_LIMIT)]
        time_limit: f32,
    },

    /// Play every level in the directory and summarize results
    Sweep {
        /// Directory of level RON files
        #[arg(long, default_value = "assets/levels")]
        levels: PathBuf,

        /// Tower build order used for every level
        #[arg(long, default_value = "basic,basic,sniper,splash")]
        build: String,

        /// Simulated-seconds limit per level
        #[arg(long, default_value_t = DEFAULT_TIME_LIMIT)]
        time_limit: f32,
    },

    /// Parse and sanity-check every level file
    Validate {
        /// Directory of level RON files
        #[arg(long, default_value = "assets/levels")]
        levels: PathBuf,
    },
}

/// JSON summary of one completed run.
#[derive(Debug, Serialize)]
struct RunSummary {
    level_id: u32,
    level_name: String,
    outcome: &'static str,
    stars: Option<u8>,
    lives_left: u32,
    gold_left: u32,
    score: u32,
    enemies_killed: u32,
    enemies_leaked: u32,
    towers_built: usize,
    sim_seconds: f32,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON summaries.
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

    match cli.command {
        Commands::Run {
            levels,
            level,
            build,
            time_limit,
        } => cmd_run(&levels, level, &build, time_limit),
        Commands::Sweep {
            levels,
            build,
            time_limit,
        } => cmd_sweep(&levels, &build, time_limit),
        Commands::Validate { levels } => cmd_validate(&levels),
    }
}

fn cmd_run(levels_dir: &Path, level_id: u32, build: &str, time_limit: f32) {
    let catalogue = load_or_exit(levels_dir);
    let summary = play_level(&catalogue, level_id, build, time_limit);
    match summary {
        Ok(summary) => {
            print_summary(&summary);
            if summary.outcome != "level_complete" {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_sweep(levels_dir: &Path, build: &str, time_limit: f32) {
    let catalogue = load_or_exit(levels_dir);
    let mut failures = 0u32;

    for level in catalogue.iter() {
        match play_level(&catalogue, level.id, build, time_limit) {
            Ok(summary) => {
                if summary.outcome != "level_complete" {
                    failures += 1;
                }
                print_summary(&summary);
            }
            Err(e) => {
                failures += 1;
                eprintln!("Level {}: {e}", level.id);
            }
        }
    }

    eprintln!(
        "Sweep complete: {}/{} levels cleared",
        catalogue.len() as u32 - failures,
        catalogue.len()
    );
    if failures > 0 {
        std::process::exit(1);
    }
}

fn cmd_validate(levels_dir: &Path) {
    let catalogue = load_or_exit(levels_dir);
    let mut problems = 0u32;

    for level in catalogue.iter() {
        if let Err(e) = level.validate() {
            eprintln!("Level {}: {e}", level.id);
            problems += 1;
        }
    }

    if problems > 0 {
        eprintln!("FAIL: {problems} problem(s) in {} level(s)", catalogue.len());
        std::process::exit(1);
    }
    eprintln!("OK: {} level(s) validated", catalogue.len());
}

fn load_or_exit(levels_dir: &Path) -> LevelCatalogue {
    match load_catalogue(levels_dir) {
        Ok(catalogue) if !catalogue.is_empty() => catalogue,
        Ok(_) => {
            eprintln!("FATAL: no level files found in {}", levels_dir.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    }
}

fn play_level(
    catalogue: &LevelCatalogue,
    level_id: u32,
    build: &str,
    time_limit: f32,
) -> Result<RunSummary> {
    let mut sim = Simulation::from_catalogue(catalogue, level_id)?;
    let mut player = ScriptedPlayer::from_build_order(build)?;

    let mut killed = 0u32;
    let mut leaked = 0u32;
    let mut stars = None;

    while sim.state() == GameState::Playing && sim.clock() < time_limit {
        let input = player.act(&mut sim);
        let events = sim.update(FRAME_DT, &input);
        killed += events.enemies_killed;
        leaked += events.enemies_leaked;
        if let Some(result) = events.level_complete {
            stars = Some(result.stars);
        }
    }

    let outcome = match sim.state() {
        GameState::LevelComplete => "level_complete",
        GameState::GameOver => "game_over",
        _ => "timed_out",
    };

    Ok(RunSummary {
        level_id: sim.level_id(),
        level_name: sim.level_name().to_string(),
        outcome,
        stars,
        lives_left: sim.lives(),
        gold_left: sim.gold(),
        score: sim.score(),
        enemies_killed: killed,
        enemies_leaked: leaked,
        towers_built: sim.towers().len(),
        sim_seconds: sim.clock(),
    })
}

fn print_summary(summary: &RunSummary) {
    match serde_json::to_string(summary) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("failed to serialize summary: {e}"),
    }
}
