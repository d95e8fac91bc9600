//! Match replay and viewing.
//!
//! Because matches are fully deterministic, a replay requires only:
//! - `seed: u64` - the match seed the autopilots are derived from
//! - `rosters: [Roster; 2]` - both teams
//! - `config: MatchConfig` - the rules and turn cap
//!
//! No state deltas are stored. To view turn N, re-run the simulation from
//! turn 1 to N.
//!
//! # Time Travel
//!
//! - **Forward**: continue stepping the simulation
//! - **Backward**: re-run from the draft to (`turn` - 1)
//! - **Jump to turn N**: re-run from the draft to N

mod text;

pub use text::{render_events, render_text};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::engine::{Match, TurnResult};
use crate::game::Roster;
use crate::tournament::{Simulation, TournamentError};

/// Format version written by [`Recording::save`].
pub const RECORDING_VERSION: u32 = 1;

/// Minimal recording: seed, rosters and config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Format version.
    pub version: u32,
    /// Match seed.
    pub seed: u64,
    /// Both rosters, team 1 first.
    pub rosters: [Roster; 2],
    /// Configuration the match ran with.
    pub config: MatchConfig,
}

impl Recording {
    /// Create a recording of the current format version.
    #[must_use]
    pub const fn new(seed: u64, rosters: [Roster; 2], config: MatchConfig) -> Self {
        Self {
            version: RECORDING_VERSION,
            seed,
            rosters,
            config,
        }
    }

    /// Save the recording as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ReplayError::Parse(e.to_string()))?;
        fs::write(path, json).map_err(|e| ReplayError::Io(format!("{}: {e}", path.display())))
    }

    /// Load a recording and check its version.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable, malformed or of another version.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path).map_err(|e| ReplayError::Io(format!("{}: {e}", path.display())))?;
        let recording: Self = serde_json::from_str(&text).map_err(|e| ReplayError::Parse(e.to_string()))?;
        if recording.version != RECORDING_VERSION {
            return Err(ReplayError::Version(recording.version));
        }
        Ok(recording)
    }
}

/// Error type for replay operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// Reading or writing the recording failed.
    Io(String),
    /// The recording is not valid JSON.
    Parse(String),
    /// The recording has an unsupported version.
    Version(u32),
    /// Re-simulation failed.
    Simulation(TournamentError),
    /// Turn number out of bounds.
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Last reachable turn.
        max_turn: u32,
    },
    /// Game is already over.
    GameOver,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Recording I/O failed: {e}"),
            Self::Parse(e) => write!(f, "Recording is malformed: {e}"),
            Self::Version(v) => write!(f, "Unsupported recording version {v} (expected {RECORDING_VERSION})"),
            Self::Simulation(e) => write!(f, "Re-simulation failed: {e}"),
            Self::TurnOutOfBounds { requested, max_turn } => {
                write!(f, "Turn {requested} out of bounds (max: {max_turn})")
            }
            Self::GameOver => write!(f, "Game is already over"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<TournamentError> for ReplayError {
    fn from(e: TournamentError) -> Self {
        Self::Simulation(e)
    }
}

/// Replay engine - steps through a match deterministically.
///
/// `turn` counts resolved turns: 0 right after the draft.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recording: Recording,
    sim: Simulation,
    turn: u32,
    last: Option<TurnResult>,
}

impl ReplayEngine {
    /// Create a replay positioned right after the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording cannot be simulated.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        Self::new_at_turn(recording, 0)
    }

    /// Create a replay with `target_turn` turns resolved, or fewer if the
    /// match ends first.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording cannot be simulated.
    pub fn new_at_turn(recording: Recording, target_turn: u32) -> Result<Self, ReplayError> {
        let sim = Simulation::new(recording.seed, recording.rosters.clone(), &recording.config)?;
        let mut engine = Self {
            recording,
            sim,
            turn: 0,
            last: None,
        };
        while engine.turn < target_turn && !engine.is_game_over() {
            engine.advance()?;
        }
        Ok(engine)
    }

    fn advance(&mut self) -> Result<(), ReplayError> {
        let result = self.sim.step()?.ok_or(ReplayError::GameOver)?;
        self.turn += 1;
        self.last = Some(result);
        Ok(())
    }

    /// The recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Turns resolved so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Match state after the current turn.
    #[must_use]
    pub const fn game(&self) -> &Match {
        self.sim.game()
    }

    /// Result of the most recently resolved turn.
    #[must_use]
    pub const fn last_result(&self) -> Option<&TurnResult> {
        self.last.as_ref()
    }

    /// Whether the match ended or hit the turn cap.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.sim.is_finished()
    }

    /// Resolve one more turn.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::GameOver`] once the match is over.
    pub fn step_forward(&mut self) -> Result<&TurnResult, ReplayError> {
        if self.is_game_over() {
            return Err(ReplayError::GameOver);
        }
        self.advance()?;
        self.last.as_ref().ok_or(ReplayError::GameOver)
    }

    /// Go back one turn by re-simulating.
    ///
    /// # Errors
    ///
    /// Returns an error if already at turn 0.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        if self.turn == 0 {
            return Err(ReplayError::TurnOutOfBounds {
                requested: 0,
                max_turn: self.recording.config.max_turns,
            });
        }
        self.goto_turn(self.turn - 1)
    }

    /// Jump to `target_turn` by re-simulating from the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is beyond the cap.
    pub fn goto_turn(&mut self, target_turn: u32) -> Result<(), ReplayError> {
        let max_turn = self.recording.config.max_turns;
        if target_turn > max_turn {
            return Err(ReplayError::TurnOutOfBounds {
                requested: target_turn,
                max_turn,
            });
        }
        *self = Self::new_at_turn(self.recording.clone(), target_turn)?;
        Ok(())
    }

    /// Render the board and the last turn's events.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = render_text(self.game());
        if let Some(result) = &self.last {
            output.push('\n');
            output.push_str(&render_events(&result.events));
        }
        output
    }
}
