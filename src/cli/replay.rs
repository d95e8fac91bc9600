//! Replay command implementation.

use super::{CliError, OutputFormat};
use rift::replay::{render_events, Recording, ReplayEngine};
use std::path::PathBuf;

/// Execute the replay command.
///
/// With `turn`, prints the board after that turn. Without it, plays the
/// recording to the end and prints every turn's events, then the final board.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(recording_path: PathBuf, format: OutputFormat, turn: Option<u32>) -> Result<(), CliError> {
    let recording = Recording::load(&recording_path).map_err(|e| {
        CliError::new(format!("Failed to load recording {}: {e}", recording_path.display()))
    })?;

    let engine = match turn {
        Some(target_turn) => ReplayEngine::new_at_turn(recording, target_turn)?,
        None => {
            let mut engine = ReplayEngine::new(recording)?;
            if format == OutputFormat::Text {
                print!("{}", render_events(engine.game().log()));
            }
            while !engine.is_game_over() {
                let result = engine.step_forward()?;
                if format == OutputFormat::Text {
                    print!("{}", render_events(&result.events));
                }
            }
            engine
        }
    };

    match format {
        OutputFormat::Text => {
            println!();
            print!("{}", engine.render());
        }
        OutputFormat::Json => {
            let state = match engine.last_result() {
                Some(result) => serde_json::to_string_pretty(result)?,
                None => serde_json::to_string_pretty(engine.game())?,
            };
            println!("{state}");
        }
    }

    Ok(())
}
