//! Match configuration.
//!
//! All tunable constants live here so the engine, the orchestrator and the
//! headless runner agree on one set of numbers. Every struct has a `Default`
//! and can be read from a JSON file; missing fields keep their defaults.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Gameplay constants consumed by the turn pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Gold every player starts with.
    pub starting_gold: u32,
    /// Flat gold granted to every player each turn.
    pub gold_per_turn: u32,
    /// Gold for landing a kill.
    pub kill_gold: u32,
    /// Gold for each assist.
    pub assist_gold: u32,
    /// Gold granted to the team that wins an objective fight, split across the roster.
    pub objective_team_gold: u32,
    /// Turns a dead player waits before respawning.
    pub respawn_delay: u32,
    /// First turn a surrender request is accepted.
    pub surrender_min_turn: u32,
    /// Health of an outer tower.
    pub outer_tower_health: f64,
    /// Health of an inner tower.
    pub inner_tower_health: f64,
    /// Health of the nexus.
    pub nexus_health: f64,
    /// Turns the voidgrub buff lasts.
    pub grub_duration: u32,
    /// Turns the baron buff lasts.
    pub baron_duration: u32,
    /// Turns the elder buff lasts.
    pub elder_duration: u32,
    /// Turns between reaching four dragons (or resolving an elder) and the elder spawn.
    pub elder_delay: u32,
    /// Turns between a dragon resolution and its respawn.
    pub dragon_respawn: u32,
    /// First turn baron may spawn.
    pub baron_first_turn: u32,
    /// Minimum turns between two baron spawns.
    pub baron_interval: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_gold: 500,
            gold_per_turn: 100,
            kill_gold: 300,
            assist_gold: 150,
            objective_team_gold: 1000,
            respawn_delay: 2,
            surrender_min_turn: 15,
            outer_tower_health: 1500.0,
            inner_tower_health: 2000.0,
            nexus_health: 3000.0,
            grub_duration: 5,
            baron_duration: 3,
            elder_duration: 2,
            elder_delay: 2,
            dragon_respawn: 2,
            baron_first_turn: 12,
            baron_interval: 5,
        }
    }
}

/// Server-owned timers for the live orchestrator, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Time both teams have to submit a turn.
    pub turn_ms: u64,
    /// Time the acting team has for one ban or pick.
    pub draft_slot_ms: u64,
    /// Delay between a resolved turn and the start of the next one.
    pub result_delay_ms: u64,
    /// Window after the draft during which champion swaps are accepted.
    pub swap_window_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            turn_ms: 60_000,
            draft_slot_ms: 30_000,
            result_delay_ms: 15_000,
            swap_window_ms: 10_000,
        }
    }
}

impl TimerConfig {
    /// Turn submission timeout.
    #[must_use]
    pub const fn turn(&self) -> Duration {
        Duration::from_millis(self.turn_ms)
    }

    /// Draft slot timeout.
    #[must_use]
    pub const fn draft_slot(&self) -> Duration {
        Duration::from_millis(self.draft_slot_ms)
    }

    /// Delay after a turn resolves.
    #[must_use]
    pub const fn result_delay(&self) -> Duration {
        Duration::from_millis(self.result_delay_ms)
    }

    /// Champion swap window.
    #[must_use]
    pub const fn swap_window(&self) -> Duration {
        Duration::from_millis(self.swap_window_ms)
    }

    /// Scale every timer by `factor`, keeping at least one millisecond.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| ((ms as f64 * factor) as u64).max(1);
        Self {
            turn_ms: scale(self.turn_ms),
            draft_slot_ms: scale(self.draft_slot_ms),
            result_delay_ms: scale(self.result_delay_ms),
            swap_window_ms: scale(self.swap_window_ms),
        }
    }
}

/// Complete configuration for one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Gameplay constants.
    pub rules: RulesConfig,
    /// Live orchestrator timers.
    pub timers: TimerConfig,
    /// Turn cap for headless simulations. The live orchestrator ignores it.
    pub max_turns: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            timers: TimerConfig::default(),
            max_turns: 80,
        }
    }
}

impl MatchConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json(&text)
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError {
            reason: format!("invalid configuration: {e}"),
        })
    }
}

/// Error loading a configuration.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Description of the failure.
    pub reason: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error: {}", self.reason)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.rules.gold_per_turn, 100);
        assert_eq!(config.rules.surrender_min_turn, 15);
        assert_eq!(config.timers.turn(), Duration::from_secs(60));
        assert_eq!(config.timers.draft_slot(), Duration::from_secs(30));
        assert_eq!(config.timers.result_delay(), Duration::from_secs(15));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MatchConfig::from_json(r#"{"rules": {"gold_per_turn": 250}, "max_turns": 40}"#)
            .unwrap();
        assert_eq!(config.rules.gold_per_turn, 250);
        assert_eq!(config.rules.kill_gold, 300);
        assert_eq!(config.max_turns, 40);
        assert_eq!(config.timers, TimerConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = MatchConfig::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rift.json");
        std::fs::write(&path, r#"{"timers": {"turn_ms": 500}}"#).unwrap();

        let config = MatchConfig::load(&path).unwrap();
        assert_eq!(config.timers.turn(), Duration::from_millis(500));
        assert_eq!(config.timers.draft_slot_ms, 30_000);
    }

    #[test]
    fn test_scaled_timers() {
        let timers = TimerConfig::default().scaled(0.001);
        assert_eq!(timers.turn_ms, 60);
        assert_eq!(timers.result_delay_ms, 15);
    }
}
