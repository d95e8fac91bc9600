//! Champions and their abilities.
//!
//! The static [`CHAMPIONS`] table holds the numbers; [`use_ability`]
//! dispatches on the champion id to one of 24 effects.

mod abilities;
mod table;

pub use abilities::{
    ability_level_for, effect_of, init_ability, is_ability_ready, tick_cooldowns, use_ability,
    AbilityEffect, SCALING_RATIO,
};
pub use table::{
    champion_by_id, is_valid_champion, ChampionData, Scaling, CHAMPIONS, CHAMPION_COUNT,
};
