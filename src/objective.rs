//! Objective scheduling and rewards.
//!
//! Which objective spawns on a turn is a pure function of the turn number,
//! a small [`ObjectiveTracker`] and, for baron only, one coin flip.

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::game::{MatchRng, PlayerAction, Side, TeamState, MAX_DRAGON_STACKS};

/// Turn that always spawns dragon and voidgrubs together.
pub const OPENING_OBJECTIVE_TURN: u32 = 4;

/// Chance that an eligible baron actually spawns.
pub const BARON_SPAWN_CHANCE: f64 = 0.5;

/// A single contestable objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// Elemental dragon: one permanent stack.
    Dragon,
    /// Voidgrubs: siege bonus.
    Voidgrub,
    /// Baron: power and siege bonus.
    Baron,
    /// Elder dragon: execute.
    Elder,
}

impl ObjectiveKind {
    /// Action a player submits to contest this objective.
    #[must_use]
    pub const fn contest_action(self) -> PlayerAction {
        match self {
            Self::Dragon => PlayerAction::ContestDragon,
            Self::Voidgrub => PlayerAction::ContestVoidgrub,
            Self::Baron => PlayerAction::ContestBaron,
            Self::Elder => PlayerAction::ContestElder,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dragon => "dragon",
            Self::Voidgrub => "voidgrubs",
            Self::Baron => "baron",
            Self::Elder => "elder dragon",
        }
    }
}

/// What spawns on a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveSpawn {
    /// The opening combo: dragon, then voidgrubs.
    DragonAndVoidgrub,
    /// A dragon.
    Dragon,
    /// Baron.
    Baron,
    /// The elder dragon.
    Elder,
}

impl ObjectiveSpawn {
    /// Objectives resolved for this spawn, in order.
    #[must_use]
    pub const fn kinds(self) -> &'static [ObjectiveKind] {
        match self {
            Self::DragonAndVoidgrub => &[ObjectiveKind::Dragon, ObjectiveKind::Voidgrub],
            Self::Dragon => &[ObjectiveKind::Dragon],
            Self::Baron => &[ObjectiveKind::Baron],
            Self::Elder => &[ObjectiveKind::Elder],
        }
    }
}

/// History the scheduler needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectiveTracker {
    /// Turn the last dragon was resolved, taken or not.
    pub last_dragon_turn: Option<u32>,
    /// Whether each side has reached four dragons.
    pub has_four_dragons: [bool; 2],
    /// Turn baron last spawned.
    pub last_baron_turn: Option<u32>,
    /// Turn the elder dragon will spawn.
    pub elder_turn: Option<u32>,
}

impl ObjectiveTracker {
    /// Whether either side has four dragons.
    #[must_use]
    pub const fn dragons_complete(&self) -> bool {
        self.has_four_dragons[0] || self.has_four_dragons[1]
    }

    /// Record a dragon resolution. `winner_stacks` is the winner's stack count
    /// after the reward.
    pub fn record_dragon(&mut self, turn: u32, winner: Option<(Side, u8)>, rules: &RulesConfig) {
        self.last_dragon_turn = Some(turn);
        if let Some((side, stacks)) = winner {
            if stacks >= MAX_DRAGON_STACKS && !self.has_four_dragons[side.index()] {
                self.has_four_dragons[side.index()] = true;
                if self.elder_turn.is_none() {
                    self.elder_turn = Some(turn + rules.elder_delay);
                }
            }
        }
    }

    /// Record that baron spawned.
    pub fn record_baron(&mut self, turn: u32) {
        self.last_baron_turn = Some(turn);
    }

    /// Record an elder resolution and schedule the next one.
    pub fn record_elder(&mut self, turn: u32, rules: &RulesConfig) {
        self.elder_turn = Some(turn + rules.elder_delay);
    }

    /// Push a due elder to the next turn when another objective took its slot.
    pub fn defer_elder(&mut self, turn: u32) {
        if self.elder_turn == Some(turn) {
            self.elder_turn = Some(turn + 1);
        }
    }
}

/// The objective spawning on `turn`, if any. First matching rule wins:
///
/// 1. turn 4 spawns dragon and voidgrubs
/// 2. a dragon respawns a fixed delay after the last one while nobody has four
/// 3. from the first baron turn, once the interval has passed, baron spawns on a coin flip
/// 4. elder spawns on its scheduled turn
pub fn scheduled_objective(
    turn: u32,
    tracker: &ObjectiveTracker,
    rules: &RulesConfig,
    rng: &mut MatchRng,
) -> Option<ObjectiveSpawn> {
    if turn == OPENING_OBJECTIVE_TURN {
        return Some(ObjectiveSpawn::DragonAndVoidgrub);
    }

    if !tracker.dragons_complete()
        && tracker
            .last_dragon_turn
            .is_some_and(|last| turn == last + rules.dragon_respawn)
    {
        return Some(ObjectiveSpawn::Dragon);
    }

    let baron_due = turn >= rules.baron_first_turn
        && tracker
            .last_baron_turn
            .is_none_or(|last| turn.saturating_sub(last) >= rules.baron_interval);
    if baron_due && rng.roll(BARON_SPAWN_CHANCE) {
        return Some(ObjectiveSpawn::Baron);
    }

    if tracker.elder_turn == Some(turn) {
        return Some(ObjectiveSpawn::Elder);
    }

    None
}

/// Grant the reward for `kind` to `team` and return a description.
///
/// Every player receives an equal share of the objective gold.
pub fn apply_reward(team: &mut TeamState, kind: ObjectiveKind, turn: u32, rules: &RulesConfig) -> String {
    let share = rules.objective_team_gold / u32::try_from(team.players.len().max(1)).unwrap_or(1);
    for player in &mut team.players {
        player.gold += share;
    }

    let effect = match kind {
        ObjectiveKind::Dragon => {
            team.buffs.dragon_stacks = (team.buffs.dragon_stacks + 1).min(MAX_DRAGON_STACKS);
            format!("{} dragon stacks", team.buffs.dragon_stacks)
        }
        ObjectiveKind::Voidgrub => {
            team.buffs.grub_until = Some(turn + rules.grub_duration);
            format!("voidgrub buff through turn {}", turn + rules.grub_duration)
        }
        ObjectiveKind::Baron => {
            team.buffs.baron_until = Some(turn + rules.baron_duration);
            format!("baron buff through turn {}", turn + rules.baron_duration)
        }
        ObjectiveKind::Elder => {
            team.buffs.elder_until = Some(turn + rules.elder_duration);
            format!("elder buff through turn {}", turn + rules.elder_duration)
        }
    };

    format!("{} secures the {} ({effect}, +{share} gold each)", team.name, kind.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Roster;

    fn rules() -> RulesConfig {
        RulesConfig::default()
    }

    #[test]
    fn test_turn_four_always_combo() {
        let mut rng = MatchRng::new(1);
        let mut tracker = ObjectiveTracker::default();
        tracker.last_dragon_turn = Some(2);
        tracker.elder_turn = Some(4);
        assert_eq!(
            scheduled_objective(4, &tracker, &rules(), &mut rng),
            Some(ObjectiveSpawn::DragonAndVoidgrub)
        );
        assert_eq!(ObjectiveSpawn::DragonAndVoidgrub.kinds().len(), 2);
    }

    #[test]
    fn test_dragon_respawns_two_turns_later() {
        let mut rng = MatchRng::new(1);
        let mut tracker = ObjectiveTracker::default();
        tracker.record_dragon(4, None, &rules());

        assert_eq!(scheduled_objective(5, &tracker, &rules(), &mut rng), None);
        assert_eq!(
            scheduled_objective(6, &tracker, &rules(), &mut rng),
            Some(ObjectiveSpawn::Dragon)
        );
        assert_eq!(scheduled_objective(7, &tracker, &rules(), &mut rng), None);
    }

    #[test]
    fn test_four_dragons_schedule_elder() {
        let mut rng = MatchRng::new(1);
        let mut tracker = ObjectiveTracker::default();
        tracker.record_dragon(10, Some((Side::Team2, 4)), &rules());

        assert!(tracker.dragons_complete());
        assert_eq!(tracker.elder_turn, Some(12));
        assert_ne!(scheduled_objective(12, &tracker, &rules(), &mut rng), Some(ObjectiveSpawn::Dragon));

        tracker.record_baron(11);
        assert_eq!(
            scheduled_objective(12, &tracker, &rules(), &mut rng),
            Some(ObjectiveSpawn::Elder)
        );
        tracker.record_elder(12, &rules());
        assert_eq!(tracker.elder_turn, Some(14));
    }

    #[test]
    fn test_baron_never_before_first_turn() {
        let tracker = ObjectiveTracker::default();
        for seed in 0..50 {
            let mut rng = MatchRng::new(seed);
            for turn in 5..12 {
                assert_eq!(scheduled_objective(turn, &tracker, &rules(), &mut rng), None);
            }
        }
    }

    #[test]
    fn test_baron_coin_flip_and_interval() {
        let mut spawned = 0;
        for seed in 0..400 {
            let mut rng = MatchRng::new(seed);
            if scheduled_objective(12, &ObjectiveTracker::default(), &rules(), &mut rng)
                == Some(ObjectiveSpawn::Baron)
            {
                spawned += 1;
            }
        }
        assert!((120..280).contains(&spawned), "spawned {spawned}");

        let mut tracker = ObjectiveTracker::default();
        tracker.record_baron(12);
        for seed in 0..50 {
            let mut rng = MatchRng::new(seed);
            assert_eq!(scheduled_objective(16, &tracker, &rules(), &mut rng), None);
        }
    }

    #[test]
    fn test_defer_elder() {
        let mut tracker = ObjectiveTracker::default();
        tracker.elder_turn = Some(20);
        tracker.defer_elder(19);
        assert_eq!(tracker.elder_turn, Some(20));
        tracker.defer_elder(20);
        assert_eq!(tracker.elder_turn, Some(21));
    }

    #[test]
    fn test_rewards() {
        let r = rules();
        let mut team = TeamState::new(Side::Team1, &Roster::uniform(1, 1, 70), &r);
        let gold = team.players[0].gold;

        let line = apply_reward(&mut team, ObjectiveKind::Baron, 10, &r);
        assert_eq!(team.buffs.baron_until, Some(13));
        assert!(line.contains("baron"));
        assert_eq!(team.players[0].gold, gold + 200);

        for _ in 0..6 {
            apply_reward(&mut team, ObjectiveKind::Dragon, 10, &r);
        }
        assert_eq!(team.buffs.dragon_stacks, MAX_DRAGON_STACKS);
    }
}
