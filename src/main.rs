//! Rift CLI - Command-line interface for running and viewing Rift matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Rift - A deterministic 5v5 lane-combat match engine
#[derive(Parser, Debug)]
#[command(name = "rift")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Match configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single autopilot match
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (default: from config, 80)
        #[arg(short, long)]
        turns: Option<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Replay a recorded match
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show the state after this many turns
        #[arg(short, long)]
        turn: Option<u32>,
    },

    /// Run mass parallel matches and aggregate statistics
    Tournament {
        /// Number of matches to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum turns per match (default: from config, 80)
        #[arg(short = 't', long)]
        max_turns: Option<u32>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Queue teams through the real-time orchestrator
    Live {
        /// Number of teams to queue (even)
        #[arg(long, default_value = "2")]
        teams: u32,

        /// Matchmaker seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Timer scale factor (1.0 = real time)
        #[arg(long, default_value = "0.001")]
        speed: f64,

        /// Team 1 surrenders after this turn (default: from config, 80)
        #[arg(short = 't', long)]
        max_turns: Option<u32>,

        /// Queue for ranked instead of normal matches
        #[arg(long)]
        ranked: bool,
    },
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.quiet);
    let config = args.config;

    let result = match args.command {
        Commands::Run {
            seed,
            turns,
            format,
            save,
        } => cli::run::execute(seed, turns, format, save, args.quiet, config),

        Commands::Replay {
            recording,
            format,
            turn,
        } => cli::replay::execute(recording, format, turn),

        Commands::Tournament {
            games,
            seed,
            threads,
            max_turns,
            format,
            progress,
        } => cli::tournament::execute(games, seed, threads, max_turns, format, progress, config),

        Commands::Live {
            teams,
            seed,
            speed,
            max_turns,
            ranked,
        } => cli::live::execute(teams, seed, speed, max_turns, ranked, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
