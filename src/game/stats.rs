//! Stat bundles and derived-stat recomputation.
//!
//! Derived stats are never edited in place. Anything that changes a player's
//! inputs (items, stacks, buffs, level) calls [`recompute_stats`], which
//! rebuilds the whole bundle from base stats.

use serde::{Deserialize, Serialize};

use crate::game::items::{item_by_id, ItemSpecial};
use crate::game::{PlayerState, Position};

/// Multiplier applied to total ability power by the capstone AP item.
pub const AP_CAPSTONE_MULTIPLIER: f64 = 1.3;

/// Attack gained per jungle farm, as a fraction of base attack.
pub const FARM_ATTACK_BONUS: f64 = 0.01;

/// Additive bundle of combat stats.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBundle {
    /// Physical attack.
    pub attack: f64,
    /// Physical defense.
    pub defense: f64,
    /// Speed; decides attack order in a lane.
    pub speed: f64,
    /// Ability power; adds magic damage for mid laners.
    pub ability_power: f64,
    /// Magic resist.
    pub magic_resist: f64,
    /// Maximum health.
    pub max_health: f64,
    /// Critical hit chance in `[0, 1]`.
    pub crit_chance: f64,
    /// Chance to evade a hit entirely in `[0, 1]`.
    pub evasion: f64,
    /// Fraction of damage dealt returned as healing.
    pub life_steal: f64,
}

impl StatBundle {
    /// Bundle with every stat at zero.
    pub const ZERO: Self = Self {
        attack: 0.0,
        defense: 0.0,
        speed: 0.0,
        ability_power: 0.0,
        magic_resist: 0.0,
        max_health: 0.0,
        crit_chance: 0.0,
        evasion: 0.0,
        life_steal: 0.0,
    };

    /// Add every field of `other` to `self`.
    pub fn add(&mut self, other: &Self) {
        self.attack += other.attack;
        self.defense += other.defense;
        self.speed += other.speed;
        self.ability_power += other.ability_power;
        self.magic_resist += other.magic_resist;
        self.max_health += other.max_health;
        self.crit_chance += other.crit_chance;
        self.evasion += other.evasion;
        self.life_steal += other.life_steal;
    }

    fn clamp(&mut self) {
        self.attack = self.attack.max(0.0);
        self.defense = self.defense.max(0.0);
        self.speed = self.speed.max(0.0);
        self.ability_power = self.ability_power.max(0.0);
        self.magic_resist = self.magic_resist.max(0.0);
        self.max_health = self.max_health.max(1.0);
        self.crit_chance = self.crit_chance.clamp(0.0, 1.0);
        self.evasion = self.evasion.clamp(0.0, 1.0);
        self.life_steal = self.life_steal.clamp(0.0, 1.0);
    }
}

/// Base stats for a player with the given overall rating and position.
#[must_use]
pub fn base_stats(overall: u8, position: Position) -> StatBundle {
    let ovr = f64::from(overall);
    let mut base = StatBundle {
        attack: ovr * 0.6,
        defense: ovr * 0.4,
        speed: ovr * 0.5,
        ability_power: 0.0,
        magic_resist: ovr * 0.3,
        max_health: 500.0 + ovr * 5.0,
        ..StatBundle::ZERO
    };

    match position {
        Position::Top => base.defense *= 1.25,
        Position::Jungle => base.speed *= 1.2,
        Position::Mid => base.ability_power = ovr * 0.5,
        Position::Adc => base.attack *= 1.2,
        Position::Support => base.max_health += 100.0,
    }

    base
}

/// Rebuild a player's derived stats from scratch.
///
/// Folds base stats, every owned item's bundle, stacking-item bonuses, farm
/// stacks, permanent bonuses and active timed buffs, then applies the AP
/// capstone multiplier once. Current health keeps its ratio to max health.
/// Calling this twice in a row changes nothing.
pub fn recompute_stats(player: &mut PlayerState) {
    let old_max = player.stats.max_health;

    let mut stats = player.base;
    let mut capstone = false;

    for &id in &player.items {
        let Some(item) = item_by_id(id) else {
            continue;
        };
        stats.add(&item.stats);
        match item.special {
            Some(ItemSpecial::StackingAttack { per_turn, cap }) => {
                let stacks = player.item_stacks.get(&id).copied().unwrap_or(0);
                stats.attack += (f64::from(stacks) * per_turn).min(cap);
            }
            Some(ItemSpecial::AbilityPowerCapstone) => capstone = true,
            _ => {}
        }
    }

    stats.attack += player.base.attack * FARM_ATTACK_BONUS * f64::from(player.farm_stacks);
    stats.add(&player.permanent_bonus);
    for buff in &player.buffs {
        stats.add(&buff.stats);
    }

    stats.clamp();

    if capstone {
        stats.ability_power *= AP_CAPSTONE_MULTIPLIER;
    }

    player.stats = stats;

    if old_max > 0.0 && (stats.max_health - old_max).abs() > f64::EPSILON {
        player.health = (player.health / old_max * stats.max_health).min(stats.max_health);
    }
    player.health = player.health.clamp(0.0, stats.max_health);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{RosterPlayer, TimedBuff};

    fn player(position: Position) -> PlayerState {
        let roster = RosterPlayer::new(1, "tester", position, 80);
        PlayerState::new(&roster, 0, 500)
    }

    #[test]
    fn test_base_stats_by_position() {
        let top = base_stats(80, Position::Top);
        let adc = base_stats(80, Position::Adc);
        let mid = base_stats(80, Position::Mid);

        assert!((top.defense - 40.0).abs() < 1e-9);
        assert!((adc.attack - 57.6).abs() < 1e-9);
        assert!((mid.ability_power - 40.0).abs() < 1e-9);
        assert!(top.ability_power.abs() < 1e-9);
    }

    #[test]
    fn test_items_add_to_base() {
        let mut p = player(Position::Adc);
        let base_attack = p.stats.attack;
        p.items.push(10); // Long Sword
        recompute_stats(&mut p);
        assert!((p.stats.attack - (base_attack + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut p = player(Position::Mid);
        p.items.extend([20, 52, 13]);
        recompute_stats(&mut p);
        let first = (p.stats, p.health);
        recompute_stats(&mut p);
        assert_eq!(first, (p.stats, p.health));
    }

    #[test]
    fn test_capstone_applies_once_and_last() {
        let mut p = player(Position::Mid);
        let base_ap = p.base.ability_power;
        p.items.extend([52, 14]); // capstone then a tome
        recompute_stats(&mut p);

        let crown = item_by_id(52).unwrap().stats.ability_power;
        let tome = item_by_id(14).unwrap().stats.ability_power;
        let expected = (base_ap + crown + tome) * AP_CAPSTONE_MULTIPLIER;
        assert!((p.stats.ability_power - expected).abs() < 1e-9);
    }

    #[test]
    fn test_health_keeps_ratio() {
        let mut p = player(Position::Top);
        p.health = p.stats.max_health / 2.0;
        p.items.push(13); // Ruby Crystal
        recompute_stats(&mut p);
        assert!((p.health / p.stats.max_health - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_timed_buff_and_shred_floor() {
        let mut p = player(Position::Support);
        p.buffs.push(TimedBuff {
            label: "shred".to_string(),
            stats: StatBundle {
                defense: -1000.0,
                ..StatBundle::ZERO
            },
            until_turn: 3,
        });
        recompute_stats(&mut p);
        assert!(p.stats.defense.abs() < 1e-9);
    }

    #[test]
    fn test_stacking_attack_capped() {
        let mut p = player(Position::Jungle);
        let base_attack = p.stats.attack;
        p.items.push(38); // stacking jungle item
        p.item_stacks.insert(38, 1000);
        recompute_stats(&mut p);

        let item = item_by_id(38).unwrap();
        let Some(ItemSpecial::StackingAttack { cap, .. }) = item.special else {
            panic!("item 38 should stack");
        };
        let expected = base_attack + item.stats.attack + cap;
        assert!((p.stats.attack - expected).abs() < 1e-9);
    }
}
