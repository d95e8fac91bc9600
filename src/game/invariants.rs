//! Match invariants.
//!
//! Bug detectors, not gameplay limits: a correct engine never trips them.
//! The turn pipeline asserts them after every turn in debug builds.

use std::collections::BTreeSet;
use std::fmt;

use crate::engine::Match;
use crate::game::{item_by_id, DAMAGE_SOURCE_CAPACITY, MAX_DRAGON_STACKS, MAX_INVENTORY, MAX_LEVEL};

/// Invariant violation.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check every match invariant and return the violations found.
#[must_use]
pub fn check_invariants(game: &Match) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });
    let mut champions = BTreeSet::new();

    for team in game.teams() {
        if !(0.0..=team.nexus_max_health).contains(&team.nexus_health) {
            fail(format!("{} nexus health {} outside 0..={}", team.name, team.nexus_health, team.nexus_max_health));
        }
        for tower in &team.towers {
            if !(0.0..=tower.max_health).contains(&tower.health) {
                fail(format!("{} {:?} {:?} tower health {} out of range", team.name, tower.lane, tower.tier, tower.health));
            }
        }
        if team.buffs.dragon_stacks > MAX_DRAGON_STACKS {
            fail(format!("{} has {} dragon stacks", team.name, team.buffs.dragon_stacks));
        }

        for player in &team.players {
            let who = &player.name;
            if !(0.0..=player.stats.max_health).contains(&player.health) {
                fail(format!("{who} health {} outside 0..={}", player.health, player.stats.max_health));
            }
            if player.dead && (player.health > 0.0 || player.respawn_turn.is_none()) {
                fail(format!("dead player {who} has health {} and respawn {:?}", player.health, player.respawn_turn));
            }
            if !player.dead && player.respawn_turn.is_some() {
                fail(format!("living player {who} has a respawn turn"));
            }
            if player.items.len() > MAX_INVENTORY {
                fail(format!("{who} holds {} items", player.items.len()));
            }
            if player.items.iter().any(|&id| item_by_id(id).is_none_or(|item| item.is_consumable())) {
                fail(format!("{who} holds a consumable or unknown item"));
            }
            if player.level == 0 || player.level > MAX_LEVEL {
                fail(format!("{who} is level {}", player.level));
            }
            if player.ability.level > 3 {
                fail(format!("{who} ability level {}", player.ability.level));
            }
            if player.damage_sources.len() > DAMAGE_SOURCE_CAPACITY {
                fail(format!("{who} remembers {} damage sources", player.damage_sources.len()));
            }
            if let Some(champion) = player.champion {
                if !champions.insert(champion) {
                    fail(format!("champion {champion} is assigned twice"));
                }
            }
        }
    }

    violations
}

/// Assert every match invariant holds.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics listing every violation.
#[cfg(debug_assertions)]
pub fn assert_invariants(game: &Match) {
    let violations = check_invariants(game);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Match invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_game: &Match) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::engine::MatchKind;
    use crate::game::Roster;

    fn game() -> Match {
        Match::new(
            1,
            MatchKind::Normal,
            [Roster::uniform(1, 1, 70), Roster::uniform(2, 11, 70)],
            0,
            RulesConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_match_is_clean() {
        assert!(check_invariants(&game()).is_empty());
    }

    #[test]
    fn test_negative_nexus_detected() {
        let mut game = game();
        game.teams[1].nexus_health = -5.0;
        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("nexus"));
    }

    #[test]
    fn test_dead_player_without_respawn_detected() {
        let mut game = game();
        game.teams[0].players[2].dead = true;
        game.teams[0].players[2].health = 0.0;
        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("dead player")));
    }

    #[test]
    fn test_duplicate_champion_detected() {
        let mut game = game();
        game.teams[0].players[0].champion = Some(4);
        game.teams[1].players[3].champion = Some(4);
        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("twice")));
    }

    #[test]
    fn test_consumable_in_inventory_detected() {
        let mut game = game();
        game.teams[0].players[0].items.push(1);
        assert!(!check_invariants(&game).is_empty());
    }

    #[test]
    #[should_panic(expected = "invariant")]
    #[cfg(debug_assertions)]
    fn test_assert_panics_in_debug() {
        let mut game = game();
        game.teams[0].players[0].level = 40;
        assert_invariants(&game);
    }
}
