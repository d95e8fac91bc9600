//! Built-in decision policy.
//!
//! [`Autopilot`] plans one team's commands for a turn and its draft choices.
//! It only reads the public state of a [`Match`] and draws from its own
//! seeded generator, so a simulation driven by two autopilots is fully
//! reproducible from the seeds.

use crate::champion::is_ability_ready;
use crate::config::RulesConfig;
use crate::draft::DraftState;
use crate::engine::Match;
use crate::game::items::purchase_plan;
use crate::game::{
    item_by_id, ChampionId, ItemId, Lane, MatchRng, PlayerAction, PlayerCommand, PlayerState,
    Position, Side, Structure, TeamState, TowerTier, MAX_INVENTORY,
};
use crate::objective::{ObjectiveTracker, OPENING_OBJECTIVE_TURN};

/// Health fraction below which a player goes home.
const RECALL_BELOW: f64 = 0.3;

/// Health fraction below which a player buys a potion.
const POTION_BELOW: f64 = 0.5;

/// Chance the jungler ganks instead of farming.
const GANK_CHANCE: f64 = 0.3;

/// Chance a laner holds a lane that already lost its outer tower.
const DEFEND_CHANCE: f64 = 0.4;

const HEALTH_POTION: ItemId = 1;

const TOP_PATH: &[ItemId] = &[10, 13, 41, 10, 30, 60, 11, 13, 31, 37, 54, 12];
const JUNGLE_PATH: &[ItemId] = &[23, 12, 38, 10, 10, 30, 21, 57];
const MID_PATH: &[ItemId] = &[14, 40, 20, 20, 52, 19];
const ADC_PATH: &[ItemId] = &[18, 36, 21, 51, 16, 17, 35];
const SUPPORT_PATH: &[ItemId] = &[22, 13, 32, 64, 15, 34, 65];

/// Item build order for a position.
#[must_use]
pub const fn build_path(position: Position) -> &'static [ItemId] {
    match position {
        Position::Top => TOP_PATH,
        Position::Jungle => JUNGLE_PATH,
        Position::Mid => MID_PATH,
        Position::Adc => ADC_PATH,
        Position::Support => SUPPORT_PATH,
    }
}

/// First entry of the build path the player has not bought yet.
///
/// Purchases are matched against the path with multiplicity, so a path that
/// lists the same component twice needs two purchases of it.
#[must_use]
pub fn next_build_item(player: &PlayerState) -> Option<ItemId> {
    let mut bought = player.purchases.clone();
    build_path(player.position).iter().copied().find(|item| {
        match bought.iter().position(|b| b == item) {
            Some(index) => {
                bought.swap_remove(index);
                false
            }
            None => true,
        }
    })
}

/// Objective the policy sends players to on `turn`, if any.
///
/// Mirrors the scheduler without its coin flip: a turn where baron may spawn
/// is treated as a baron turn.
fn expected_objective(turn: u32, tracker: &ObjectiveTracker, rules: &RulesConfig) -> Option<PlayerAction> {
    if turn == OPENING_OBJECTIVE_TURN {
        return Some(PlayerAction::ContestDragon);
    }
    if !tracker.dragons_complete()
        && tracker
            .last_dragon_turn
            .is_some_and(|last| turn == last + rules.dragon_respawn)
    {
        return Some(PlayerAction::ContestDragon);
    }
    let baron_due = turn >= rules.baron_first_turn
        && tracker
            .last_baron_turn
            .is_none_or(|last| turn.saturating_sub(last) >= rules.baron_interval);
    if baron_due {
        return Some(PlayerAction::ContestBaron);
    }
    (tracker.elder_turn == Some(turn)).then_some(PlayerAction::ContestElder)
}

/// Who answers an objective call.
const fn contests(objective: PlayerAction, position: Position, turn: u32) -> Option<PlayerAction> {
    match (objective, position) {
        (PlayerAction::ContestDragon, Position::Top) if turn == OPENING_OBJECTIVE_TURN => {
            Some(PlayerAction::ContestVoidgrub)
        }
        (PlayerAction::ContestDragon, Position::Jungle | Position::Support)
        | (PlayerAction::ContestBaron, Position::Jungle | Position::Top | Position::Mid)
        | (PlayerAction::ContestElder, Position::Jungle | Position::Support | Position::Adc) => {
            Some(objective)
        }
        _ => None,
    }
}

/// Seeded bot for one or both sides of a match.
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: MatchRng,
}

impl Autopilot {
    /// Create a policy with its own generator.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: MatchRng::new(seed),
        }
    }

    /// Champion for the current draft slot, or `None` to skip it.
    pub fn draft_choice(&mut self, draft: &DraftState, side: Side) -> Option<ChampionId> {
        let slot = draft.current_slot()?;
        if slot.side != side {
            return None;
        }
        self.rng.choose(&draft.available()).copied()
    }

    /// Commands for every player of `side` on the match's current turn.
    pub fn plan_turn(&mut self, game: &Match, side: Side) -> Vec<PlayerCommand> {
        let turn = game.turn();
        let team = game.team(side);
        let objective = expected_objective(turn, game.tracker(), game.rules());
        team.players
            .iter()
            .map(|player| self.plan_player(player, team, objective, turn, game.rules()))
            .collect()
    }

    fn plan_player(
        &mut self,
        player: &PlayerState,
        team: &TeamState,
        objective: Option<PlayerAction>,
        turn: u32,
        rules: &RulesConfig,
    ) -> PlayerCommand {
        let action = self.choose_action(player, team, objective, turn);
        let mut command = PlayerCommand::new(player.id, action);

        if let Some(item) = shopping(player, rules) {
            command = command.buy(item);
        }
        if player.position == Position::Support {
            command = command.ward(Lane::Bot);
        }
        if player.is_alive() && action != PlayerAction::Recall && is_ability_ready(player) {
            command = command.cast(None);
        }
        command
    }

    fn choose_action(
        &mut self,
        player: &PlayerState,
        team: &TeamState,
        objective: Option<PlayerAction>,
        turn: u32,
    ) -> PlayerAction {
        if !player.is_alive() {
            return PlayerAction::Fight;
        }
        if player.health_ratio() < RECALL_BELOW {
            return PlayerAction::Recall;
        }
        if let Some(action) = objective.and_then(|o| contests(o, player.position, turn)) {
            return action;
        }

        let Some(lane) = player.position.home_lane() else {
            if self.rng.roll(GANK_CHANCE) {
                if let Some(&lane) = self.rng.choose(&Lane::ALL) {
                    return PlayerAction::Gank(lane);
                }
            }
            return PlayerAction::Farm;
        };

        let outer_lost = team.front_structure(lane) != Structure::Tower(lane, TowerTier::Outer);
        if outer_lost && self.rng.roll(DEFEND_CHANCE) {
            PlayerAction::Defend
        } else {
            PlayerAction::Fight
        }
    }
}

/// Item to buy this turn, checked the way a submission is validated.
fn shopping(player: &PlayerState, rules: &RulesConfig) -> Option<ItemId> {
    let budget = player.gold + rules.gold_per_turn;

    if let Some(item) = next_build_item(player).and_then(item_by_id) {
        let (price, consumed) = purchase_plan(item, &player.items);
        let fits = player.items.len() - consumed.len() < MAX_INVENTORY;
        if item.usable_by(player.position) && price <= budget && fits {
            return Some(item.id);
        }
    }

    let potion = item_by_id(HEALTH_POTION)?;
    (player.is_alive() && player.health_ratio() < POTION_BELOW && potion.cost <= budget)
        .then_some(HEALTH_POTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::started;

    #[test]
    fn test_build_path_progress() {
        let game = started(3);
        let mut player = game.team(Side::Team1).player_at(Position::Top).unwrap().clone();
        assert_eq!(next_build_item(&player), Some(10));
        player.purchases = vec![10, 13, 41, 1, 10];
        assert_eq!(next_build_item(&player), Some(30));
        player.purchases = TOP_PATH.to_vec();
        assert_eq!(next_build_item(&player), None);
    }

    #[test]
    fn test_plan_covers_every_player_and_validates() {
        let mut game = started(11);
        let mut pilot = Autopilot::new(1);
        for side in Side::ALL {
            let plan = pilot.plan_turn(&game, side);
            assert_eq!(plan.len(), 5);
            game.submit_actions(side, plan).unwrap();
        }
        game.process_turn().unwrap();
    }

    #[test]
    fn test_low_health_recalls() {
        let mut game = started(2);
        let max = game.teams[0].players[2].stats.max_health;
        game.teams[0].players[2].health = max * 0.1;
        let plan = Autopilot::new(4).plan_turn(&game, Side::Team1);
        assert_eq!(plan[2].action, PlayerAction::Recall);
        assert!(!plan[2].use_ability);
    }

    #[test]
    fn test_opening_objective_assignment() {
        let mut game = started(8);
        game.turn = OPENING_OBJECTIVE_TURN;
        let plan = Autopilot::new(9).plan_turn(&game, Side::Team2);
        let action_of = |position: Position| {
            let id = game.team(Side::Team2).player_at(position).unwrap().id;
            plan.iter().find(|c| c.player_id == id).unwrap().action
        };
        assert_eq!(action_of(Position::Jungle), PlayerAction::ContestDragon);
        assert_eq!(action_of(Position::Support), PlayerAction::ContestDragon);
        assert_eq!(action_of(Position::Top), PlayerAction::ContestVoidgrub);
        assert_eq!(action_of(Position::Mid), PlayerAction::Fight);
    }

    #[test]
    fn test_draft_choice_only_on_own_slot() {
        let draft = DraftState::new();
        let mut pilot = Autopilot::new(0);
        assert!(pilot.draft_choice(&draft, Side::Team2).is_none());
        let pick = pilot.draft_choice(&draft, Side::Team1).unwrap();
        assert!(draft.is_available(pick));
    }

    #[test]
    fn test_same_seed_same_plan() {
        let game = started(21);
        let a = Autopilot::new(77).plan_turn(&game, Side::Team1);
        let b = Autopilot::new(77).plan_turn(&game, Side::Team1);
        assert_eq!(a, b);
    }
}
