// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Rift: a turn-based 5v5 lane-combat match engine.
//!
//! This crate provides a deterministic match simulator designed for:
//! - Seeded, reproducible turn resolution
//! - A competitive ban/pick draft
//! - Real-time orchestration with per-phase timers
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  live: matchmaker, match workers, rewards   │
//! ├─────────────────────────────────────────────┤
//! │  tournament / replay / autopilot            │
//! ├─────────────────────────────────────────────┤
//! │  engine: Match, draft, turn pipeline        │
//! ├─────────────────────────────────────────────┤
//! │  combat, champion, objective                │
//! ├─────────────────────────────────────────────┤
//! │  game: stats, items, players, teams, rng    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The engine itself is synchronous; only [`live`] touches the tokio runtime.

pub mod autopilot;
pub mod champion;
pub mod combat;
pub mod config;
pub mod draft;
pub mod engine;
pub mod error;
pub mod game;
pub mod live;
pub mod objective;
pub mod replay;
pub mod tournament;

pub use config::{ConfigError, MatchConfig, RulesConfig, TimerConfig};
pub use engine::{Match, MatchId, MatchKind, MatchRecord, MatchStatus, TurnResult};
pub use error::{MatchError, MatchResult};

// Re-export key game types at crate root for convenience
pub use game::{
    ChampionId, ItemId, Lane, PlayerAction, PlayerCommand, PlayerId, Position, Roster, Side, TeamId,
};
