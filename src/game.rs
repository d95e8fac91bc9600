//! Game data model.
//!
//! Plain state shared by every other layer:
//! - Stat bundles and the item catalog
//! - Players, teams, towers and team buffs
//! - Per-turn player commands
//! - The seeded match RNG
//! - Invariant checks run after every turn

mod action;
mod invariants;
pub mod items;
mod player;
mod rng;
pub mod stats;
mod team;

pub use action::{PlayerAction, PlayerCommand};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use items::{item_by_id, Item, ItemId, ItemSpecial, ItemTier, MAX_INVENTORY};
pub use player::{
    AbilityState, ChampionId, Lane, PlayerId, PlayerState, Position, StatusEffect, StatusKind,
    TimedBuff, DAMAGE_SOURCE_CAPACITY, MAX_LEVEL,
};
pub use rng::MatchRng;
pub use stats::{base_stats, recompute_stats, StatBundle};
pub use team::{
    Roster, RosterPlayer, Side, Structure, StructureHit, TeamBuffs, TeamId, TeamState, TowerState,
    TowerTier, MAX_DRAGON_STACKS, split_sides,
};
