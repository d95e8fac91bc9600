//! Combat resolution.
//!
//! - Damage formulas and team power
//! - Kill and assist bookkeeping
//! - Lane skirmishes and sieges
//! - Objective teamfights

mod damage;
mod kill;
mod lane;
mod objective;

pub use damage::{
    mitigate, mitigation, roll_hit, team_power, Hit, ATTACK_MULTIPLIER, CRIT_MULTIPLIER, MAGIC_VARIANCE,
    MIN_DAMAGE_FRACTION, MITIGATION_CONSTANT,
};
pub use kill::{resolve_kill, KillReport};
pub use lane::{
    command_for, is_warded, lane_participants, resolve_lane, resolve_siege, LaneReport,
    AMBUSH_MULTIPLIER, DEFEND_MULTIPLIER, ELDER_EXECUTE_THRESHOLD, FREE_HIT_MULTIPLIER,
};
pub use objective::{
    contesters, resolve_contest, ContestReport, LOSER_DEATH_BASE, LOSER_DEATH_FACTOR, WINNER_DEATH_FACTOR,
};
