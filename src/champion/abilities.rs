//! Ability dispatch.
//!
//! Each champion id maps to one [`AbilityEffect`]. The numbers an effect
//! uses come from the champion's [`ChampionData`] row at the caster's current
//! ability level; effects themselves hold no data.

use serde::Serialize;

use crate::champion::table::{champion_by_id, ChampionData, Scaling};
use crate::combat::{mitigate, resolve_kill};
use crate::config::RulesConfig;
use crate::game::{
    recompute_stats, Lane, PlayerId, PlayerState, StatBundle, StatusKind, TeamState, TimedBuff,
};

/// Share of the caster's scaling stat added to an ability's base value.
pub const SCALING_RATIO: f64 = 0.5;

/// The 24 ability behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbilityEffect {
    /// Single-target damage.
    Nuke,
    /// Damage and stun.
    Stun,
    /// Damage and root.
    Root,
    /// Damage and silence.
    Silence,
    /// Puts the target to sleep.
    Sleep,
    /// Damage to several enemies.
    AreaBlast,
    /// Damage that kills a target left under a health threshold.
    Execute,
    /// Heals the caster.
    SelfHeal,
    /// Heals every living ally.
    TeamHeal,
    /// Shields an ally.
    Shield,
    /// Sends an enemy back to base.
    ForcedRecall,
    /// Takes gold from an enemy.
    GoldSteal,
    /// Temporary attack for the caster.
    AttackBuff,
    /// Temporary defense for the team.
    TeamDefenseBuff,
    /// Permanent attack and health, once per match.
    PermanentGrowth,
    /// Arms a revive for the caster's next death, once per match.
    Revive,
    /// Announces a stolen ability without applying it.
    StealAbility,
    /// Damage that heals the caster.
    LifeDrain,
    /// Damage to an enemy structure.
    TowerStrike,
    /// Temporary speed for the team.
    Haste,
    /// Removes status effects from allies and heals them.
    Cleanse,
    /// Lowers a target's defense and magic resist.
    ArmorShred,
    /// Trades the caster's health for attack.
    Bloodrage,
    /// Damage to every living enemy, once per match.
    Requiem,
}

/// Effect bound to a champion id, in table order.
const EFFECTS: [AbilityEffect; 24] = [
    AbilityEffect::Nuke,
    AbilityEffect::Stun,
    AbilityEffect::Root,
    AbilityEffect::Silence,
    AbilityEffect::Sleep,
    AbilityEffect::AreaBlast,
    AbilityEffect::Execute,
    AbilityEffect::SelfHeal,
    AbilityEffect::TeamHeal,
    AbilityEffect::Shield,
    AbilityEffect::ForcedRecall,
    AbilityEffect::GoldSteal,
    AbilityEffect::AttackBuff,
    AbilityEffect::TeamDefenseBuff,
    AbilityEffect::PermanentGrowth,
    AbilityEffect::Revive,
    AbilityEffect::StealAbility,
    AbilityEffect::LifeDrain,
    AbilityEffect::TowerStrike,
    AbilityEffect::Haste,
    AbilityEffect::Cleanse,
    AbilityEffect::ArmorShred,
    AbilityEffect::Bloodrage,
    AbilityEffect::Requiem,
];

/// Effect for a champion id.
#[must_use]
pub fn effect_of(id: u8) -> Option<AbilityEffect> {
    EFFECTS.get(usize::from(id)).copied()
}

/// Ability level for a player level: 0 below 6, then 1, 2 and 3 at 6, 12 and 18.
#[must_use]
pub const fn ability_level_for(level: u8) -> u8 {
    match level {
        0..=5 => 0,
        6..=11 => 1,
        12..=17 => 2,
        _ => 3,
    }
}

/// Whether `player` may cast right now.
#[must_use]
pub fn is_ability_ready(player: &PlayerState) -> bool {
    let Some(data) = player.champion.and_then(champion_by_id) else {
        return false;
    };
    player.can_cast()
        && player.ability.cooldown == 0
        && ability_level_for(player.level) > 0
        && !(data.one_time && player.ability.used)
}

/// Tick every cooldown down by one and refresh ability levels.
pub fn tick_cooldowns(team: &mut TeamState) {
    for player in &mut team.players {
        if player.champion.is_none() {
            continue;
        }
        player.ability.cooldown = player.ability.cooldown.saturating_sub(1);
        player.ability.level = ability_level_for(player.level);
    }
}

/// Reset ability state after a champion assignment.
pub fn init_ability(player: &mut PlayerState) {
    player.ability.cooldown = 0;
    player.ability.used = false;
    player.ability.level = ability_level_for(player.level);
}

/// Cast the ability of `caster` on `allies`.
///
/// Returns the event line, or `None` without touching any state when the
/// caster is not ready. Kills caused by the ability are resolved in place and
/// mentioned in the same line.
pub fn use_ability(
    allies: &mut TeamState,
    enemies: &mut TeamState,
    caster: PlayerId,
    turn: u32,
    target: Option<PlayerId>,
    rules: &RulesConfig,
) -> Option<String> {
    let index = allies.player_index(caster)?;
    let player = &allies.players[index];
    if !is_ability_ready(player) {
        return None;
    }
    let data = player.champion.and_then(champion_by_id)?;
    let effect = effect_of(data.id)?;
    let level = ability_level_for(player.level);

    let mut cast = Cast {
        allies,
        enemies,
        index,
        data,
        level,
        turn,
        rules,
    };
    let summary = cast.apply(effect, target);

    let player = &mut cast.allies.players[index];
    player.ability.cooldown = data.cooldown;
    player.ability.level = level;
    if data.one_time {
        player.ability.used = true;
    }

    Some(format!("{} ({}) {summary}", player.name, data.name))
}

struct Cast<'a> {
    allies: &'a mut TeamState,
    enemies: &'a mut TeamState,
    index: usize,
    data: &'static ChampionData,
    level: u8,
    turn: u32,
    rules: &'a RulesConfig,
}

impl Cast<'_> {
    fn caster(&self) -> &PlayerState {
        &self.allies.players[self.index]
    }

    fn value(&self) -> f64 {
        self.data.value(self.level)
    }

    fn secondary(&self) -> f64 {
        self.data.secondary(self.level)
    }

    fn turns(&self) -> u32 {
        duration(self.secondary())
    }

    /// Base value plus the caster's scaling stat share.
    fn power(&self) -> f64 {
        let stats = &self.caster().stats;
        let stat = match self.data.scaling {
            Scaling::Ad => stats.attack,
            Scaling::Ap => stats.ability_power,
        };
        self.value() + stat * SCALING_RATIO
    }

    /// Requested enemy if alive, else the living enemy with the least health.
    fn enemy_target(&self, requested: Option<PlayerId>) -> Option<usize> {
        if let Some(index) = requested.and_then(|id| self.enemies.player_index(id)) {
            if self.enemies.players[index].is_alive() {
                return Some(index);
            }
        }
        lowest_health(&self.enemies.players)
    }

    /// Requested ally if alive, else the living ally with the lowest health ratio.
    fn ally_target(&self, requested: Option<PlayerId>) -> Option<usize> {
        if let Some(index) = requested.and_then(|id| self.allies.player_index(id)) {
            if self.allies.players[index].is_alive() {
                return Some(index);
            }
        }
        self.allies
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive())
            .min_by(|(_, a), (_, b)| a.health_ratio().total_cmp(&b.health_ratio()))
            .map(|(i, _)| i)
    }

    /// Damage an enemy, mitigated by the matching resist. Returns damage dealt
    /// and a kill note when the target died.
    fn strike(&mut self, target: usize, raw: f64) -> (f64, String) {
        let caster_id = self.caster().id;
        let victim = &mut self.enemies.players[target];
        let resist = match self.data.scaling {
            Scaling::Ad => victim.stats.defense,
            Scaling::Ap => victim.stats.magic_resist,
        };
        let dealt = victim.take_damage(mitigate(raw, resist).floor());
        victim.record_damage_source(caster_id);
        if victim.health > 0.0 {
            return (dealt, String::new());
        }
        (dealt, self.kill(target))
    }

    fn kill(&mut self, target: usize) -> String {
        let caster_id = self.caster().id;
        let victim_id = self.enemies.players[target].id;
        resolve_kill(self.allies, caster_id, self.enemies, victim_id, self.turn, self.rules)
            .map(|report| {
                if report.revived {
                    format!(", {} revives", self.enemies.players[target].name)
                } else {
                    format!(", killing {}", self.enemies.players[target].name)
                }
            })
            .unwrap_or_default()
    }

    fn buff(&self, label: &str, stats: StatBundle) -> TimedBuff {
        TimedBuff {
            label: format!("{} {label}", self.data.name),
            stats,
            until_turn: self.turn + self.turns(),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn apply(&mut self, effect: AbilityEffect, requested: Option<PlayerId>) -> String {
        match effect {
            AbilityEffect::Nuke | AbilityEffect::Stun | AbilityEffect::Root | AbilityEffect::Silence => {
                let Some(target) = self.enemy_target(requested) else {
                    return "found no target".to_string();
                };
                let power = self.power();
                let turns = self.turns();
                let until = self.turn + turns;
                let (dealt, note) = self.strike(target, power);
                let victim = &mut self.enemies.players[target];
                let status = match effect {
                    AbilityEffect::Stun => Some((StatusKind::Stun, "stunning")),
                    AbilityEffect::Root => Some((StatusKind::Root, "rooting")),
                    AbilityEffect::Silence => Some((StatusKind::Silence, "silencing")),
                    _ => None,
                };
                let mut line = format!("hits {} for {dealt:.0}", victim.name);
                if let Some((kind, verb)) = status {
                    if victim.is_alive() {
                        victim.apply_status(kind, until);
                        line = format!("{line}, {verb} for {turns} turns");
                    }
                }
                line + &note
            }
            AbilityEffect::Sleep => {
                let Some(target) = self.enemy_target(requested) else {
                    return "found no target".to_string();
                };
                let until = self.turn + self.turns();
                let victim = &mut self.enemies.players[target];
                victim.apply_status(StatusKind::Sleep, until);
                format!("puts {} to sleep until turn {until}", victim.name)
            }
            AbilityEffect::AreaBlast | AbilityEffect::Requiem => {
                let limit = if effect == AbilityEffect::AreaBlast {
                    duration(self.secondary()) as usize
                } else {
                    usize::MAX
                };
                let targets: Vec<usize> = (0..self.enemies.players.len())
                    .filter(|&i| self.enemies.players[i].is_alive())
                    .take(limit)
                    .collect();
                let power = self.power();
                let mut total = 0.0;
                let mut notes = String::new();
                for &target in &targets {
                    let (dealt, note) = self.strike(target, power);
                    total += dealt;
                    notes.push_str(&note);
                }
                format!("blasts {} enemies for {total:.0} total{notes}", targets.len())
            }
            AbilityEffect::Execute => {
                let Some(target) = self.enemy_target(requested) else {
                    return "found no target".to_string();
                };
                let power = self.power();
                let threshold = self.secondary();
                let (dealt, mut note) = self.strike(target, power);
                let victim = &mut self.enemies.players[target];
                let name = victim.name.clone();
                if note.is_empty() && victim.is_alive() && victim.health_ratio() < threshold {
                    victim.health = 0.0;
                    note = self.kill(target);
                }
                format!("strikes {name} for {dealt:.0}{note}")
            }
            AbilityEffect::SelfHeal => {
                let power = self.power();
                let percent = self.secondary();
                let caster = &mut self.allies.players[self.index];
                let amount = power + caster.stats.max_health * percent;
                let healed = caster.heal(amount);
                format!("heals for {healed:.0}")
            }
            AbilityEffect::TeamHeal => {
                let power = self.power();
                let total: f64 = self.allies.players.iter_mut().map(|p| p.heal(power)).sum();
                format!("heals the team for {total:.0}")
            }
            AbilityEffect::Shield => {
                let Some(target) = self.ally_target(requested) else {
                    return "found no ally".to_string();
                };
                let power = self.power();
                let until = self.turn + self.turns();
                let ally = &mut self.allies.players[target];
                ally.shield += power;
                ally.shield_until = ally.shield_until.max(until);
                format!("shields {} for {power:.0}", ally.name)
            }
            AbilityEffect::ForcedRecall => {
                let Some(target) = self.enemy_target(requested) else {
                    return "found no target".to_string();
                };
                let until = self.turn + self.turns();
                let victim = &mut self.enemies.players[target];
                victim.apply_status(StatusKind::Displaced, until);
                format!("banishes {} to base until turn {until}", victim.name)
            }
            AbilityEffect::GoldSteal => {
                let Some(target) = self.enemy_target(requested) else {
                    return "found no target".to_string();
                };
                let wanted = whole(self.value());
                let victim = &mut self.enemies.players[target];
                let stolen = wanted.min(victim.gold);
                victim.gold -= stolen;
                let name = victim.name.clone();
                self.allies.players[self.index].gold += stolen;
                format!("steals {stolen} gold from {name}")
            }
            AbilityEffect::AttackBuff | AbilityEffect::Bloodrage => {
                let bonus = self.value();
                let mut line = String::new();
                if effect == AbilityEffect::Bloodrage {
                    let cost = self.caster().health * self.secondary();
                    let caster = &mut self.allies.players[self.index];
                    caster.health = (caster.health - cost).max(1.0);
                    line = format!("sacrifices {cost:.0} health and ");
                }
                let buff = if effect == AbilityEffect::Bloodrage {
                    TimedBuff {
                        label: format!("{} bloodrage", self.data.name),
                        stats: StatBundle { attack: bonus, ..StatBundle::ZERO },
                        until_turn: self.turn + 2,
                    }
                } else {
                    self.buff("fury", StatBundle { attack: bonus, ..StatBundle::ZERO })
                };
                let caster = &mut self.allies.players[self.index];
                caster.buffs.push(buff);
                recompute_stats(caster);
                format!("{line}gains {bonus:.0} attack")
            }
            AbilityEffect::TeamDefenseBuff | AbilityEffect::Haste => {
                let (label, stats, what) = if effect == AbilityEffect::Haste {
                    ("haste", StatBundle { speed: self.value(), ..StatBundle::ZERO }, "speed")
                } else {
                    ("bulwark", StatBundle { defense: self.value(), ..StatBundle::ZERO }, "defense")
                };
                let buff = self.buff(label, stats);
                let mut count = 0;
                for ally in self.allies.players.iter_mut().filter(|p| p.is_alive()) {
                    ally.buffs.push(buff.clone());
                    recompute_stats(ally);
                    count += 1;
                }
                format!("grants {:.0} {what} to {count} allies", self.value())
            }
            AbilityEffect::PermanentGrowth => {
                let attack = self.value();
                let health = self.secondary();
                let caster = &mut self.allies.players[self.index];
                caster.permanent_bonus.attack += attack;
                caster.permanent_bonus.max_health += health;
                recompute_stats(caster);
                format!("grows permanently by {attack:.0} attack and {health:.0} health")
            }
            AbilityEffect::Revive => {
                let fraction = self.secondary();
                self.allies.players[self.index].revive = Some(fraction);
                format!("prepares to rise again at {:.0}% health", fraction * 100.0)
            }
            AbilityEffect::StealAbility => {
                // Announces the most recent enemy cast; the copied effect is never applied.
                let stolen = self
                    .enemies
                    .players
                    .iter()
                    .filter(|p| p.is_alive())
                    .find_map(|p| {
                        let data = p.champion.and_then(champion_by_id)?;
                        (p.ability.cooldown == data.cooldown && p.ability.cooldown > 0)
                            .then_some(data.name)
                    });
                stolen.map_or_else(
                    || "finds no ability to steal".to_string(),
                    |name| format!("mimics {name}'s ability"),
                )
            }
            AbilityEffect::LifeDrain => {
                let Some(target) = self.enemy_target(requested) else {
                    return "found no target".to_string();
                };
                let power = self.power();
                let ratio = self.secondary();
                let name = self.enemies.players[target].name.clone();
                let (dealt, note) = self.strike(target, power);
                let healed = self.allies.players[self.index].heal(dealt * ratio);
                format!("drains {dealt:.0} from {name}, healing {healed:.0}{note}")
            }
            AbilityEffect::TowerStrike => {
                let lane = self
                    .caster()
                    .position
                    .home_lane()
                    .unwrap_or(Lane::Mid);
                let power = self.power();
                let hit = self.enemies.damage_structure(lane, power);
                let verb = if hit.destroyed { " and destroys it" } else { "" };
                format!("strikes the {} for {:.0}{verb}", hit.structure, hit.damage)
            }
            AbilityEffect::Cleanse => {
                let power = self.power();
                let mut cleared = 0;
                for ally in self.allies.players.iter_mut().filter(|p| p.is_alive()) {
                    cleared += ally.statuses.len();
                    ally.statuses.clear();
                    ally.heal(power);
                }
                format!("cleanses {cleared} effects and heals allies for {power:.0}")
            }
            AbilityEffect::ArmorShred => {
                let Some(target) = self.enemy_target(requested) else {
                    return "found no target".to_string();
                };
                let amount = self.value();
                let shred = self.buff(
                    "shred",
                    StatBundle {
                        defense: -amount,
                        magic_resist: -amount,
                        ..StatBundle::ZERO
                    },
                );
                let victim = &mut self.enemies.players[target];
                victim.buffs.push(shred);
                recompute_stats(victim);
                format!("shreds {} armor by {amount:.0}", victim.name)
            }
        }
    }
}

fn lowest_health(players: &[PlayerState]) -> Option<usize> {
    players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_alive())
        .min_by(|(_, a), (_, b)| a.health.total_cmp(&b.health))
        .map(|(i, _)| i)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn duration(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64) -> u32 {
    value.max(0.0).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Roster, Side};

    fn teams() -> (TeamState, TeamState, RulesConfig) {
        let rules = RulesConfig::default();
        (
            TeamState::new(Side::Team1, &Roster::uniform(1, 1, 80), &rules),
            TeamState::new(Side::Team2, &Roster::uniform(2, 11, 80), &rules),
            rules,
        )
    }

    /// Give the caster at `slot` a champion and enough levels to cast.
    fn arm(team: &mut TeamState, slot: usize, champion: u8, level: u8) -> PlayerId {
        let player = &mut team.players[slot];
        player.champion = Some(champion);
        player.level = level;
        init_ability(player);
        player.id
    }

    #[test]
    fn test_ability_levels() {
        assert_eq!(ability_level_for(1), 0);
        assert_eq!(ability_level_for(5), 0);
        assert_eq!(ability_level_for(6), 1);
        assert_eq!(ability_level_for(11), 1);
        assert_eq!(ability_level_for(12), 2);
        assert_eq!(ability_level_for(17), 2);
        assert_eq!(ability_level_for(18), 3);
    }

    #[test]
    fn test_every_champion_has_effect() {
        for id in 0..24u8 {
            assert!(effect_of(id).is_some());
        }
        assert_eq!(effect_of(16), Some(AbilityEffect::StealAbility));
        assert!(effect_of(24).is_none());
    }

    #[test]
    fn test_level_five_is_a_no_op() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 2, 0, 5);
        let (before_a, before_b) = (a.clone(), b.clone());

        assert!(use_ability(&mut a, &mut b, caster, 3, None, &rules).is_none());
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn test_cooldown_and_dead_caster_block() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 2, 0, 10);

        assert!(use_ability(&mut a, &mut b, caster, 3, None, &rules).is_some());
        assert_eq!(a.players[2].ability.cooldown, 3);
        let snapshot = (a.clone(), b.clone());
        assert!(use_ability(&mut a, &mut b, caster, 3, None, &rules).is_none());
        assert_eq!((a.clone(), b.clone()), snapshot);

        a.players[2].ability.cooldown = 0;
        a.players[2].dead = true;
        assert!(use_ability(&mut a, &mut b, caster, 3, None, &rules).is_none());
    }

    #[test]
    fn test_one_time_ability() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 0, 14, 6);
        let attack = a.players[0].stats.attack;

        assert!(use_ability(&mut a, &mut b, caster, 6, None, &rules).is_some());
        assert!(a.players[0].ability.used);
        assert!((a.players[0].stats.attack - attack - 20.0).abs() < 1e-9);

        tick_cooldowns(&mut a);
        assert_eq!(a.players[0].ability.cooldown, 0);
        assert!(!is_ability_ready(&a.players[0]));
        assert!(use_ability(&mut a, &mut b, caster, 7, None, &rules).is_none());
    }

    #[test]
    fn test_stun_applies_through_duration() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 2, 1, 6);
        let target = b.players[4].id;

        let line = use_ability(&mut a, &mut b, caster, 8, Some(target), &rules).unwrap();
        assert!(line.contains("stunning"));
        let victim = b.player_mut(target).unwrap();
        assert!(!victim.can_act());
        victim.expire_effects(9);
        assert!(!victim.can_act());
        victim.expire_effects(10);
        assert!(victim.can_act());
    }

    #[test]
    fn test_silenced_caster_cannot_cast() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 2, 0, 10);
        a.players[2].apply_status(StatusKind::Silence, 5);
        assert!(use_ability(&mut a, &mut b, caster, 4, None, &rules).is_none());
    }

    #[test]
    fn test_revive_arms_and_fires() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 3, 15, 18);
        assert!(use_ability(&mut a, &mut b, caster, 20, None, &rules).is_some());
        assert!(a.players[3].revive.is_some_and(|fraction| (fraction - 0.7).abs() < 1e-9));

        let report = resolve_kill(&mut b, 11, &mut a, caster, 21, &rules).unwrap();
        assert!(report.revived);
        assert!(a.players[3].is_alive());
    }

    #[test]
    fn test_steal_ability_changes_nothing_but_cooldown() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 2, 16, 12);
        arm(&mut b, 2, 0, 12);
        b.players[2].ability.cooldown = 3;
        let enemies_before = b.clone();

        let line = use_ability(&mut a, &mut b, caster, 12, None, &rules).unwrap();
        assert!(line.contains("mimics"));
        assert_eq!(b, enemies_before);
        assert_eq!(a.players[2].ability.cooldown, 4);
    }

    #[test]
    fn test_gold_steal_capped_by_victim_gold() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 1, 11, 6);
        b.players[0].gold = 40;
        let target = b.players[0].id;
        let before = a.players[1].gold;

        use_ability(&mut a, &mut b, caster, 6, Some(target), &rules).unwrap();
        assert_eq!(b.players[0].gold, 0);
        assert_eq!(a.players[1].gold, before + 40);
    }

    #[test]
    fn test_execute_kills_below_threshold() {
        let (mut a, mut b, rules) = teams();
        let caster = arm(&mut a, 3, 6, 18);
        let target = b.players[1].id;
        b.players[1].health = 400.0;

        let line = use_ability(&mut a, &mut b, caster, 18, Some(target), &rules).unwrap();
        assert!(line.contains("killing"), "{line}");
        assert!(b.players[1].dead);
        assert_eq!(a.players[3].kills, 1);
    }

    #[test]
    fn test_tick_cooldowns_refreshes_level() {
        let (mut a, _, _) = teams();
        arm(&mut a, 0, 0, 5);
        a.players[0].ability.cooldown = 2;
        a.players[0].level = 12;
        tick_cooldowns(&mut a);
        assert_eq!(a.players[0].ability.cooldown, 1);
        assert_eq!(a.players[0].ability.level, 2);
        tick_cooldowns(&mut a);
        tick_cooldowns(&mut a);
        assert_eq!(a.players[0].ability.cooldown, 0);
    }
}
