//! Run command implementation.

use super::output::format_summary;
use super::{load_config, seed_or_clock, CliError, OutputFormat};
use rift::replay::{render_events, render_text, Recording};
use rift::tournament::{rosters_for_seed, Simulation};
use std::path::PathBuf;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the match fails to run.
pub(crate) fn execute(
    seed: Option<u64>,
    max_turns: Option<u32>,
    format: OutputFormat,
    save: Option<PathBuf>,
    quiet: bool,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    let seed = seed_or_clock(seed);
    let mut config = load_config(config.as_deref())?;
    if let Some(turns) = max_turns {
        config.max_turns = turns;
    }
    let rosters = rosters_for_seed(seed);

    let verbose = !quiet && format == OutputFormat::Text;
    if verbose {
        println!("Running match with seed {seed}...");
        println!("Teams: {} vs {}", rosters[0].name, rosters[1].name);
        println!();
    }

    let mut sim = Simulation::new(seed, rosters.clone(), &config)?;
    if verbose {
        print!("{}", render_events(sim.game().log()));
    }
    while let Some(result) = sim.step()? {
        if verbose {
            print!("{}", render_events(&result.events));
        }
    }
    let summary = sim.summary();

    if let Some(save_path) = save {
        let recording = Recording::new(seed, rosters, config);
        recording
            .save(&save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        if verbose {
            println!();
            println!("Recording saved to: {}", save_path.display());
        }
    }

    match format {
        OutputFormat::Text => {
            if verbose {
                println!();
                print!("{}", render_text(sim.game()));
                println!();
            }
            print!("{}", format_summary(&summary));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
