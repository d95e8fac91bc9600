//! Match aggregate.
//!
//! [`Match`] owns both teams, the draft, pending submissions and the event
//! log. Every request either applies fully or is rejected with a
//! [`MatchError`] and leaves the match untouched. Turns are resolved by
//! [`Match::process_turn`].

mod result;
mod turn;

pub use result::{
    EndReason, GameEnd, GameEvent, ItemUsage, MatchRecord, ObjectiveResult, Phase, TurnResult,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::champion::{champion_by_id, init_ability};
use crate::config::RulesConfig;
use crate::draft::{DraftAction, DraftSlot, DraftSlotResult, DraftState};
use crate::error::{MatchError, MatchResult};
use crate::game::{
    item_by_id, ChampionId, ItemTier, MatchRng, PlayerCommand, PlayerId, Roster, Side, TeamState,
    MAX_INVENTORY,
};
use crate::game::items::purchase_plan;
use crate::objective::ObjectiveTracker;

/// Match identifier assigned by the matchmaker.
pub type MatchId = u64;

/// Queue a match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    /// Rated match.
    Ranked,
    /// Unrated match.
    Normal,
}

/// Lifecycle status. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Created, draft not started.
    Waiting,
    /// Draft and swap window.
    BanPick,
    /// Turns are being played.
    InProgress,
    /// Team 1 won.
    Team1Wins,
    /// Team 2 won.
    Team2Wins,
    /// A team surrendered.
    Surrendered,
}

impl MatchStatus {
    /// Whether the match is over.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Team1Wins | Self::Team2Wins | Self::Surrendered)
    }

    /// Status for a combat or forfeit win by `side`.
    #[must_use]
    pub const fn win_for(side: Side) -> Self {
        match side {
            Side::Team1 => Self::Team1Wins,
            Side::Team2 => Self::Team2Wins,
        }
    }
}

/// One match, from draft to result.
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub(crate) id: MatchId,
    pub(crate) kind: MatchKind,
    pub(crate) status: MatchStatus,
    pub(crate) turn: u32,
    pub(crate) teams: [TeamState; 2],
    pub(crate) draft: Option<DraftState>,
    pub(crate) pending: [Option<Vec<PlayerCommand>>; 2],
    pub(crate) ready: [bool; 2],
    pub(crate) log: Vec<GameEvent>,
    pub(crate) tracker: ObjectiveTracker,
    pub(crate) swaps: Vec<(PlayerId, PlayerId)>,
    pub(crate) end: Option<GameEnd>,
    pub(crate) rules: RulesConfig,
    #[serde(skip)]
    pub(crate) rng: MatchRng,
}

impl Match {
    /// Create a match from two roster snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidRoster`] when a roster is malformed or a
    /// player id appears on both teams.
    pub fn new(
        id: MatchId,
        kind: MatchKind,
        rosters: [Roster; 2],
        seed: u64,
        rules: RulesConfig,
    ) -> MatchResult<Self> {
        for roster in &rosters {
            roster
                .validate()
                .map_err(|reason| MatchError::InvalidRoster(format!("{}: {reason}", roster.name)))?;
        }
        if let Some(shared) = rosters[0]
            .players
            .iter()
            .find(|a| rosters[1].players.iter().any(|b| b.player_id == a.player_id))
        {
            return Err(MatchError::InvalidRoster(format!(
                "player {} is on both teams",
                shared.player_id
            )));
        }

        let [team1, team2] = &rosters;
        Ok(Self {
            id,
            kind,
            status: MatchStatus::Waiting,
            turn: 1,
            teams: [
                TeamState::new(Side::Team1, team1, &rules),
                TeamState::new(Side::Team2, team2, &rules),
            ],
            draft: None,
            pending: [None, None],
            ready: [false; 2],
            log: Vec::new(),
            tracker: ObjectiveTracker::default(),
            swaps: Vec::new(),
            end: None,
            rules,
            rng: MatchRng::new(seed),
        })
    }

    /// Match id.
    #[must_use]
    pub const fn id(&self) -> MatchId {
        self.id
    }

    /// Match kind.
    #[must_use]
    pub const fn kind(&self) -> MatchKind {
        self.kind
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> MatchStatus {
        self.status
    }

    /// Turn waiting to be resolved, or the final turn once the match is over.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Both teams, team 1 first.
    #[must_use]
    pub const fn teams(&self) -> &[TeamState; 2] {
        &self.teams
    }

    /// Team on `side`.
    #[must_use]
    pub const fn team(&self, side: Side) -> &TeamState {
        &self.teams[side.index()]
    }

    /// Draft state while the draft exists.
    #[must_use]
    pub const fn draft(&self) -> Option<&DraftState> {
        self.draft.as_ref()
    }

    /// Slot waiting for a choice.
    #[must_use]
    pub fn current_draft_slot(&self) -> Option<DraftSlot> {
        self.draft.as_ref().and_then(DraftState::current_slot)
    }

    /// Whether the draft has resolved all slots.
    #[must_use]
    pub fn draft_complete(&self) -> bool {
        self.draft.as_ref().is_some_and(DraftState::is_complete)
    }

    /// Append-only event log.
    #[must_use]
    pub fn log(&self) -> &[GameEvent] {
        &self.log
    }

    /// Objective history.
    #[must_use]
    pub const fn tracker(&self) -> &ObjectiveTracker {
        &self.tracker
    }

    /// Terminal outcome, once reached.
    #[must_use]
    pub const fn end(&self) -> Option<&GameEnd> {
        self.end.as_ref()
    }

    /// Rules in force.
    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Seed the match was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Whether `side` is marked ready.
    #[must_use]
    pub const fn is_ready(&self, side: Side) -> bool {
        self.ready[side.index()]
    }

    /// Whether both sides are ready.
    #[must_use]
    pub const fn both_ready(&self) -> bool {
        self.ready[0] && self.ready[1]
    }

    /// Commands `side` has submitted for the current turn.
    #[must_use]
    pub fn pending(&self, side: Side) -> Option<&[PlayerCommand]> {
        self.pending[side.index()].as_deref()
    }

    /// Side of `player`, if they are in this match.
    #[must_use]
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.teams[side.index()].player(player).is_some())
    }

    /// Open the draft.
    ///
    /// # Errors
    ///
    /// Fails unless the match is waiting.
    pub fn begin_draft(&mut self) -> MatchResult<()> {
        self.require(MatchStatus::Waiting)?;
        self.status = MatchStatus::BanPick;
        self.draft = Some(DraftState::new());
        self.push_event(Phase::Setup, "Draft begins".to_string());
        debug!(match_id = self.id, "draft started");
        Ok(())
    }

    /// Ban `champion` for `side`.
    ///
    /// # Errors
    ///
    /// Fails outside the draft or when the draft rejects the ban.
    pub fn draft_ban(&mut self, side: Side, champion: ChampionId) -> MatchResult<DraftSlotResult> {
        let result = self.draft_mut()?.ban(side, champion)?;
        Ok(self.after_slot(result))
    }

    /// Pick `champion` for `side`.
    ///
    /// # Errors
    ///
    /// Fails outside the draft or when the draft rejects the pick.
    pub fn draft_pick(&mut self, side: Side, champion: ChampionId) -> MatchResult<DraftSlotResult> {
        let result = self.draft_mut()?.pick(side, champion)?;
        Ok(self.after_slot(result))
    }

    /// Pass the current slot for `side`.
    ///
    /// # Errors
    ///
    /// Fails outside the draft or when it is not `side`'s slot.
    pub fn draft_skip(&mut self, side: Side) -> MatchResult<DraftSlotResult> {
        self.require(MatchStatus::BanPick)?;
        let draft = self.draft.as_mut().ok_or(MatchError::WrongStage("no draft running"))?;
        let result = draft.skip(side, &mut self.rng)?;
        Ok(self.after_slot(result))
    }

    /// Resolve the current slot after its timer expired.
    ///
    /// # Errors
    ///
    /// Fails outside the draft or once it is complete.
    pub fn draft_timeout(&mut self) -> MatchResult<DraftSlotResult> {
        self.require(MatchStatus::BanPick)?;
        let draft = self.draft.as_mut().ok_or(MatchError::WrongStage("no draft running"))?;
        let result = draft.timeout(&mut self.rng)?;
        Ok(self.after_slot(result))
    }

    /// Swap the champions of two players on `side`, once per pair, between
    /// the end of the draft and the start of the game.
    ///
    /// # Errors
    ///
    /// Rejects the swap when the draft is not complete, the game already
    /// started, either player is not on `side`, the pair already swapped, or
    /// the expected champions do not match the current assignment.
    pub fn request_swap(
        &mut self,
        side: Side,
        first: PlayerId,
        second: PlayerId,
        expected_first: ChampionId,
        expected_second: ChampionId,
    ) -> MatchResult<()> {
        self.require(MatchStatus::BanPick)?;
        if !self.draft_complete() {
            return Err(MatchError::DraftIncomplete);
        }
        if first == second {
            return Err(MatchError::SwapSamePlayer(first));
        }
        let pair = (first.min(second), first.max(second));
        if self.swaps.contains(&pair) {
            return Err(MatchError::SwapAlreadyUsed(pair.0, pair.1));
        }

        let team = &self.teams[side.index()];
        let a = team.player_index(first).ok_or(MatchError::UnknownPlayer(first))?;
        let b = team.player_index(second).ok_or(MatchError::UnknownPlayer(second))?;
        for (index, expected) in [(a, expected_first), (b, expected_second)] {
            let player = &team.players[index];
            if player.champion != Some(expected) {
                return Err(MatchError::SwapMismatch {
                    player: player.id,
                    actual: player.champion,
                });
            }
        }

        let team = &mut self.teams[side.index()];
        let champion_a = team.players[a].champion;
        team.players[a].champion = team.players[b].champion;
        team.players[b].champion = champion_a;
        init_ability(&mut team.players[a]);
        init_ability(&mut team.players[b]);
        let line = format!("{} and {} swap champions", team.players[a].name, team.players[b].name);
        self.swaps.push(pair);
        self.push_event(Phase::Setup, line);
        Ok(())
    }

    /// Close the draft and start turn 1.
    ///
    /// # Errors
    ///
    /// Fails unless the match is in the draft and every slot has resolved.
    pub fn start_game(&mut self) -> MatchResult<()> {
        self.require(MatchStatus::BanPick)?;
        if !self.draft_complete() {
            return Err(MatchError::DraftIncomplete);
        }
        self.draft = None;
        self.status = MatchStatus::InProgress;
        self.push_event(Phase::Setup, "The game begins".to_string());
        info!(match_id = self.id, "game started");
        Ok(())
    }

    /// Store `side`'s commands for the current turn and mark it ready.
    ///
    /// A later submission replaces an earlier one. Players without a command
    /// fight.
    ///
    /// # Errors
    ///
    /// Rejects the whole submission, storing nothing, when the match is not
    /// in progress or any command is invalid.
    pub fn submit_actions(&mut self, side: Side, commands: Vec<PlayerCommand>) -> MatchResult<()> {
        self.require(MatchStatus::InProgress)?;
        let team = &self.teams[side.index()];
        let mut seen = Vec::with_capacity(commands.len());
        for command in &commands {
            if seen.contains(&command.player_id) {
                return Err(MatchError::DuplicateCommand(command.player_id));
            }
            seen.push(command.player_id);
            self.validate_command(team, command)?;
        }
        self.pending[side.index()] = Some(commands);
        self.ready[side.index()] = true;
        debug!(match_id = self.id, turn = self.turn, ?side, "actions submitted");
        Ok(())
    }

    fn validate_command(&self, team: &TeamState, command: &PlayerCommand) -> MatchResult<()> {
        let player = team
            .player(command.player_id)
            .ok_or(MatchError::UnknownPlayer(command.player_id))?;

        let mut owned = player.items.clone();
        let mut budget = player.gold + self.rules.gold_per_turn;
        if let Some(sold) = command.sell_item {
            let item = item_by_id(sold).ok_or(MatchError::UnknownItem(sold))?;
            let index = owned
                .iter()
                .position(|&id| id == sold)
                .ok_or(MatchError::ItemNotOwned(sold))?;
            owned.remove(index);
            budget += item.cost;
        }

        if let Some(bought) = command.buy_item {
            let item = item_by_id(bought).ok_or(MatchError::UnknownItem(bought))?;
            if let Some(position) = item.position.filter(|&p| p != player.position) {
                return Err(MatchError::ItemRestricted { item: bought, position });
            }
            let (price, consumed) = purchase_plan(item, &owned);
            if price > budget {
                return Err(MatchError::InsufficientGold { need: price, have: budget });
            }
            if item.tier != ItemTier::Consumable && owned.len() - consumed.len() >= MAX_INVENTORY {
                return Err(MatchError::InventoryFull);
            }
        }
        Ok(())
    }

    /// Set or clear `side`'s ready flag.
    ///
    /// # Errors
    ///
    /// Fails unless the match is in progress.
    pub fn set_ready(&mut self, side: Side, ready: bool) -> MatchResult<()> {
        self.require(MatchStatus::InProgress)?;
        self.ready[side.index()] = ready;
        Ok(())
    }

    /// Concede the match for `side`.
    ///
    /// # Errors
    ///
    /// Fails unless the match is in progress and the surrender turn has been reached.
    pub fn surrender(&mut self, side: Side) -> MatchResult<GameEnd> {
        self.require(MatchStatus::InProgress)?;
        if self.turn < self.rules.surrender_min_turn {
            return Err(MatchError::SurrenderTooEarly {
                turn: self.turn,
                min_turn: self.rules.surrender_min_turn,
            });
        }
        let line = format!("{} surrenders", self.teams[side.index()].name);
        self.push_event(Phase::Forfeit, line);
        Ok(self.finish(side.opponent(), EndReason::Surrender, MatchStatus::Surrendered))
    }

    /// Forfeit the match for `side` after a disconnect.
    ///
    /// # Errors
    ///
    /// Fails unless the match is in the draft or in progress.
    pub fn disconnect(&mut self, side: Side) -> MatchResult<GameEnd> {
        if self.status.is_terminal() {
            return Err(MatchError::MatchOver(self.status));
        }
        if !matches!(self.status, MatchStatus::BanPick | MatchStatus::InProgress) {
            return Err(MatchError::WrongStage("match has not started"));
        }
        let line = format!("{} disconnected and forfeits", self.teams[side.index()].name);
        self.push_event(Phase::Forfeit, line);
        let winner = side.opponent();
        Ok(self.finish(winner, EndReason::Disconnect, MatchStatus::win_for(winner)))
    }

    /// The record handed to the reward collaborator, once the match is over.
    #[must_use]
    pub fn record(&self) -> Option<MatchRecord> {
        let end = self.end?;
        let item_usage = self
            .teams
            .iter()
            .flat_map(|team| {
                team.players.iter().map(|p| ItemUsage {
                    player_id: p.id,
                    team_id: team.team_id,
                    position: p.position,
                    champion: p.champion,
                    final_items: p.items.clone(),
                    purchases: p.purchases.clone(),
                    kills: p.kills,
                    deaths: p.deaths,
                    assists: p.assists,
                })
            })
            .collect();
        Some(MatchRecord {
            match_id: self.id,
            kind: self.kind,
            team_ids: [self.teams[0].team_id, self.teams[1].team_id],
            winner: self.teams[end.winner.index()].team_id,
            winner_side: end.winner,
            status: self.status,
            reason: end.reason,
            final_turn: end.turn,
            events: self.log.clone(),
            item_usage,
        })
    }

    fn require(&self, wanted: MatchStatus) -> MatchResult<()> {
        if self.status == wanted {
            return Ok(());
        }
        if self.status.is_terminal() {
            return Err(MatchError::MatchOver(self.status));
        }
        Err(match wanted {
            MatchStatus::InProgress => MatchError::NotInProgress(self.status),
            MatchStatus::BanPick => MatchError::WrongStage("draft is not running"),
            _ => MatchError::WrongStage("match already started"),
        })
    }

    fn draft_mut(&mut self) -> MatchResult<&mut DraftState> {
        self.require(MatchStatus::BanPick)?;
        self.draft.as_mut().ok_or(MatchError::WrongStage("no draft running"))
    }

    fn after_slot(&mut self, result: DraftSlotResult) -> DraftSlotResult {
        let team = &self.teams[result.slot.side.index()].name;
        let verb = match result.slot.action {
            DraftAction::Ban => "bans",
            DraftAction::Pick => "picks",
        };
        let line = match result.champion.and_then(champion_by_id) {
            Some(data) => format!("{team} {verb} {} ({:?})", data.name, result.choice),
            None => format!("{team} passes its ban"),
        };
        self.push_event(Phase::Setup, line);
        if result.is_complete() {
            self.assign_champions();
        }
        result
    }

    fn assign_champions(&mut self) {
        let Some(draft) = self.draft.as_ref() else {
            return;
        };
        for side in Side::ALL {
            let Some(assignments) = draft.assignments(side) else {
                continue;
            };
            for player in &mut self.teams[side.index()].players {
                player.champion = assignments
                    .iter()
                    .find(|(position, _)| *position == player.position)
                    .map(|&(_, champion)| champion);
                init_ability(player);
            }
        }
        self.push_event(Phase::Setup, "Draft complete; champions assigned".to_string());
        debug!(match_id = self.id, "draft complete");
    }

    fn finish(&mut self, winner: Side, reason: EndReason, status: MatchStatus) -> GameEnd {
        let end = GameEnd {
            winner,
            reason,
            turn: self.turn,
        };
        self.status = status;
        self.end = Some(end);
        self.pending = [None, None];
        self.ready = [false; 2];
        info!(match_id = self.id, turn = self.turn, ?winner, ?reason, "match finished");
        end
    }

    fn push_event(&mut self, phase: Phase, message: String) {
        self.log.push(GameEvent {
            turn: self.turn,
            phase,
            message,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::{PlayerAction, Position};

    pub(crate) fn drafted(seed: u64) -> Match {
        let mut game = Match::new(
            7,
            MatchKind::Normal,
            [Roster::uniform(1, 1, 75), Roster::uniform(2, 11, 75)],
            seed,
            RulesConfig::default(),
        )
        .unwrap();
        game.begin_draft().unwrap();
        while !game.draft_complete() {
            game.draft_timeout().unwrap();
        }
        game
    }

    pub(crate) fn started(seed: u64) -> Match {
        let mut game = drafted(seed);
        game.start_game().unwrap();
        game
    }

    #[test]
    fn test_new_rejects_shared_player() {
        let err = Match::new(
            1,
            MatchKind::Ranked,
            [Roster::uniform(1, 1, 75), Roster::uniform(2, 3, 75)],
            0,
            RulesConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MatchError::InvalidRoster(_)));
    }

    #[test]
    fn test_draft_assigns_every_champion() {
        let mut game = drafted(3);
        assert_eq!(game.status(), MatchStatus::BanPick);
        for team in game.teams() {
            assert!(team.players.iter().all(|p| p.champion.is_some()));
        }
        assert_eq!(game.draft_timeout().unwrap_err(), MatchError::DraftComplete);
    }

    #[test]
    fn test_draft_requests_before_begin_rejected() {
        let mut game = Match::new(
            1,
            MatchKind::Normal,
            [Roster::uniform(1, 1, 75), Roster::uniform(2, 11, 75)],
            0,
            RulesConfig::default(),
        )
        .unwrap();
        assert!(game.draft_ban(Side::Team1, 0).is_err());
        assert!(game.submit_actions(Side::Team1, Vec::new()).is_err());
        assert_eq!(
            game.disconnect(Side::Team1),
            Err(MatchError::WrongStage("match has not started"))
        );
        game.begin_draft().unwrap();
        assert_eq!(
            game.draft_pick(Side::Team1, 0),
            Err(MatchError::SlotMismatch { expected: DraftAction::Ban })
        );
    }

    #[test]
    fn test_swap_once_per_pair() {
        let mut game = drafted(5);
        let team = game.team(Side::Team1);
        let (a, b) = (team.players[0].id, team.players[1].id);
        let (ca, cb) = (team.players[0].champion.unwrap(), team.players[1].champion.unwrap());

        assert!(matches!(
            game.request_swap(Side::Team1, a, b, cb, ca),
            Err(MatchError::SwapMismatch { .. })
        ));
        game.request_swap(Side::Team1, a, b, ca, cb).unwrap();
        assert_eq!(game.team(Side::Team1).players[0].champion, Some(cb));
        assert_eq!(
            game.request_swap(Side::Team1, b, a, ca, cb),
            Err(MatchError::SwapAlreadyUsed(a.min(b), a.max(b)))
        );

        game.start_game().unwrap();
        assert!(game.request_swap(Side::Team1, a, b, cb, ca).is_err());
    }

    #[test]
    fn test_invalid_submission_leaves_state() {
        let mut game = started(9);
        let team = game.team(Side::Team1);
        let top = team.players[0].id;
        let support = team.player_at(Position::Support).unwrap().id;
        let before = game.clone();

        let cases = [
            vec![PlayerCommand::new(top, PlayerAction::Fight).buy(60)],
            vec![PlayerCommand::new(top, PlayerAction::Fight).buy(999)],
            vec![PlayerCommand::new(top, PlayerAction::Fight).buy(22)],
            vec![PlayerCommand::new(top, PlayerAction::Fight).sell(10)],
            vec![PlayerCommand::new(99, PlayerAction::Fight)],
            vec![
                PlayerCommand::new(support, PlayerAction::Fight),
                PlayerCommand::new(support, PlayerAction::Defend),
            ],
        ];
        for commands in cases {
            assert!(game.submit_actions(Side::Team1, commands).is_err());
            assert!(game.pending(Side::Team1).is_none());
            assert!(!game.is_ready(Side::Team1));
        }
        assert_eq!(game.log().len(), before.log().len());
        assert_eq!(game.teams(), before.teams());
    }

    #[test]
    fn test_affordable_with_turn_income() {
        let mut game = started(9);
        let top = game.team(Side::Team1).players[0].id;
        // 500 starting gold plus 100 income covers a 600 item.
        let commands = vec![PlayerCommand::new(top, PlayerAction::Fight).buy(16)];
        assert!(game.submit_actions(Side::Team1, commands).is_ok());
        assert!(game.is_ready(Side::Team1));
        assert!(!game.both_ready());
    }

    #[test]
    fn test_inventory_cap_rejected() {
        let mut game = started(9);
        let top = game.team(Side::Team1).players[0].id;
        game.teams[0].players[0].items = vec![11, 12, 13, 14, 15, 16];
        game.teams[0].players[0].gold = 10_000;
        let commands = vec![PlayerCommand::new(top, PlayerAction::Fight).buy(10)];
        assert_eq!(game.submit_actions(Side::Team1, commands), Err(MatchError::InventoryFull));

        let commands = vec![PlayerCommand::new(top, PlayerAction::Fight).sell(16).buy(10)];
        assert!(game.submit_actions(Side::Team1, commands).is_ok());
    }

    #[test]
    fn test_surrender_before_minimum_turn_rejected() {
        let mut game = started(1);
        assert_eq!(
            game.surrender(Side::Team2),
            Err(MatchError::SurrenderTooEarly { turn: 1, min_turn: 15 })
        );
        assert_eq!(game.status(), MatchStatus::InProgress);

        game.turn = 15;
        let end = game.surrender(Side::Team2).unwrap();
        assert_eq!(end.winner, Side::Team1);
        assert_eq!(game.status(), MatchStatus::Surrendered);
        assert!(game.process_turn().is_err());
    }

    #[test]
    fn test_disconnect_forfeits() {
        let mut game = drafted(2);
        let end = game.disconnect(Side::Team1).unwrap();
        assert_eq!(end.reason, EndReason::Disconnect);
        assert_eq!(game.status(), MatchStatus::Team2Wins);
        assert!(game.disconnect(Side::Team2).is_err());

        let record = game.record().unwrap();
        assert_eq!(record.winner, 2);
        assert_eq!(record.item_usage.len(), 10);
    }
}
