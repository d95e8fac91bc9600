//! The turn pipeline.
//!
//! Phases run in a fixed order; each reads what the previous ones wrote:
//!
//! ```text
//! buff expiry -> gold -> shop -> respawn -> stacking -> lanes (TOP, MID, BOT)
//!   -> jungle -> siege -> recall -> level up -> abilities -> cooldowns
//!   -> sustain -> objective -> victory
//! ```

use tracing::{debug, info};

use crate::champion::{tick_cooldowns, use_ability};
use crate::combat::{command_for, resolve_contest, resolve_lane, resolve_siege};
use crate::engine::{
    EndReason, GameEnd, GameEvent, Match, MatchStatus, ObjectiveResult, Phase, TurnResult,
};
use crate::error::MatchResult;
use crate::game::items::{purchase_plan, AuraScope};
use crate::game::{
    assert_invariants, item_by_id, recompute_stats, split_sides, ItemSpecial, Lane, PlayerAction,
    PlayerCommand, Side, StatBundle, TeamState, TimedBuff, MAX_INVENTORY, MAX_LEVEL,
};
use crate::objective::{apply_reward, scheduled_objective, ObjectiveKind, ObjectiveSpawn};

/// Attack gained per level.
const LEVEL_ATTACK: f64 = 2.0;
/// Max and current health gained per level.
const LEVEL_HEALTH: f64 = 20.0;

struct TurnLog {
    turn: u32,
    events: Vec<GameEvent>,
}

impl TurnLog {
    fn push(&mut self, phase: Phase, message: String) {
        self.events.push(GameEvent {
            turn: self.turn,
            phase,
            message,
        });
    }

    fn extend(&mut self, phase: Phase, lines: Vec<String>) {
        for line in lines {
            self.push(phase, line);
        }
    }
}

impl Match {
    /// Resolve the current turn with the submitted commands, falling back to
    /// FIGHT for every player without one.
    ///
    /// # Errors
    ///
    /// Fails unless the match is in progress.
    ///
    /// # Panics
    ///
    /// In debug builds, panics when the turn leaves the match in an
    /// inconsistent state.
    pub fn process_turn(&mut self) -> MatchResult<TurnResult> {
        self.require(MatchStatus::InProgress)?;
        let turn = self.turn;
        let mut log = TurnLog {
            turn,
            events: Vec::new(),
        };

        let commands = self.take_commands();
        self.mark_recalls(&commands);

        self.expire_buffs(&mut log);
        self.grant_gold(&mut log);
        self.run_shop(&commands, &mut log);
        self.respawn(&mut log);
        self.grow_stacks(&mut log);

        let mut lanes = Vec::new();
        for lane in Lane::ALL {
            let mut lines = Vec::new();
            if let Some(report) = resolve_lane(
                &mut self.teams,
                &commands,
                lane,
                turn,
                &mut self.rng,
                &self.rules,
                &mut lines,
            ) {
                lanes.push(report);
            }
            log.extend(Phase::Lanes, lines);
        }

        self.farm(&commands, &mut log);

        let mut lines = Vec::new();
        let siege_damage = resolve_siege(&mut self.teams, &commands, &mut lines);
        log.extend(Phase::Siege, lines);

        self.recall(&mut log);
        self.level_up(&mut log);
        self.cast_abilities(&commands, &mut log);

        for team in &mut self.teams {
            tick_cooldowns(team);
            for player in &mut team.players {
                player.recalling = false;
            }
        }

        self.sustain(&mut log);
        let objective = self.resolve_objective(&commands, &mut log);
        let game_end = self.check_victory(&mut log);

        let events = log.events;
        self.log.extend(events.iter().cloned());
        assert_invariants(self);

        self.pending = [None, None];
        self.ready = [false; 2];
        if game_end.is_none() {
            self.turn += 1;
        }
        debug!(match_id = self.id, turn, events = events.len(), "turn resolved");

        Ok(TurnResult {
            turn,
            events,
            teams: self.teams.clone(),
            lanes,
            siege_damage,
            objective,
            game_end,
        })
    }

    /// Submitted commands first, in submission order, then FIGHT for the rest.
    fn take_commands(&mut self) -> [Vec<PlayerCommand>; 2] {
        let mut out: [Vec<PlayerCommand>; 2] = [Vec::new(), Vec::new()];
        for side in Side::ALL {
            let mut commands = self.pending[side.index()].take().unwrap_or_default();
            for player in &self.teams[side.index()].players {
                if !commands.iter().any(|c| c.player_id == player.id) {
                    commands.push(PlayerCommand::fallback(player.id));
                }
            }
            out[side.index()] = commands;
        }
        out
    }

    fn mark_recalls(&mut self, commands: &[Vec<PlayerCommand>; 2]) {
        for side in Side::ALL {
            let team = &mut self.teams[side.index()];
            for player in &mut team.players {
                player.recalling = player.can_act()
                    && command_for(&commands[side.index()], player.id).action == PlayerAction::Recall;
            }
        }
    }

    fn expire_buffs(&mut self, log: &mut TurnLog) {
        for team in &mut self.teams {
            for name in team.expire_buffs(log.turn) {
                log.push(Phase::BuffExpiry, format!("{}'s {name} buff has expired", team.name));
            }
            for player in &mut team.players {
                if player.expire_effects(log.turn) {
                    recompute_stats(player);
                }
            }
        }
    }

    fn grant_gold(&mut self, log: &mut TurnLog) {
        for player in self.teams.iter_mut().flat_map(|t| t.players.iter_mut()) {
            player.gold += self.rules.gold_per_turn;
        }
        log.push(Phase::Gold, format!("Every player earns {} gold", self.rules.gold_per_turn));
    }

    /// Sales refund the full cost, then purchases are re-checked and applied.
    fn run_shop(&mut self, commands: &[Vec<PlayerCommand>; 2], log: &mut TurnLog) {
        for side in Side::ALL {
            let team = &mut self.teams[side.index()];
            for command in &commands[side.index()] {
                let Some(player) = team.player_mut(command.player_id) else {
                    continue;
                };
                let mut changed = false;

                if let Some(item) = command.sell_item.and_then(item_by_id) {
                    if player.remove_item(item.id) {
                        player.gold += item.cost;
                        changed = true;
                        log.push(Phase::Shop, format!("{} sells {} for {}", player.name, item.name, item.cost));
                    }
                }

                if let Some(item) = command.buy_item.and_then(item_by_id) {
                    let (price, consumed) = purchase_plan(item, &player.items);
                    let consumable = item.is_consumable();
                    if !item.usable_by(player.position) {
                        log.push(Phase::Shop, format!("{} cannot use {}", player.name, item.name));
                    } else if price > player.gold {
                        log.push(
                            Phase::Shop,
                            format!("{} cannot afford {} ({price} > {})", player.name, item.name, player.gold),
                        );
                    } else if !consumable && player.items.len() - consumed.len() >= MAX_INVENTORY {
                        log.push(Phase::Shop, format!("{}'s inventory is full; {} skipped", player.name, item.name));
                    } else {
                        player.gold -= price;
                        player.purchases.push(item.id);
                        changed = true;
                        match item.special {
                            Some(ItemSpecial::Potion { heal }) if consumable => {
                                player.heal(player.stats.max_health * heal);
                            }
                            Some(ItemSpecial::Elixir { turns }) if consumable => {
                                player.buffs.push(TimedBuff {
                                    label: item.name.to_string(),
                                    stats: item.stats,
                                    until_turn: log.turn + turns,
                                });
                            }
                            _ => {
                                for component in &consumed {
                                    player.remove_item(*component);
                                }
                                player.items.push(item.id);
                            }
                        }
                        log.push(Phase::Shop, format!("{} buys {} for {price}", player.name, item.name));
                    }
                }

                if changed {
                    recompute_stats(player);
                }
            }
        }
    }

    fn respawn(&mut self, log: &mut TurnLog) {
        for player in self.teams.iter_mut().flat_map(|t| t.players.iter_mut()) {
            if player.dead && player.respawn_turn.is_some_and(|at| at <= log.turn) {
                player.dead = false;
                player.respawn_turn = None;
                player.damage_sources.clear();
                player.health = player.stats.max_health;
                log.push(Phase::Respawn, format!("{} respawns", player.name));
            }
        }
    }

    fn grow_stacks(&mut self, log: &mut TurnLog) {
        for player in self.teams.iter_mut().flat_map(|t| t.players.iter_mut()) {
            if !player.is_alive() {
                continue;
            }
            let mut grew = false;
            for id in player.items.clone() {
                let Some(item) = item_by_id(id) else {
                    continue;
                };
                let Some(ItemSpecial::StackingAttack { per_turn, cap }) = item.special else {
                    continue;
                };
                let stacks = player.item_stacks.entry(id).or_insert(0);
                if f64::from(*stacks) * per_turn < cap {
                    *stacks += 1;
                    grew = true;
                    if f64::from(*stacks) * per_turn >= cap {
                        log.push(Phase::Stacking, format!("{}'s {} is fully stacked", player.name, item.name));
                    }
                }
            }
            if grew {
                recompute_stats(player);
            }
        }
    }

    fn farm(&mut self, commands: &[Vec<PlayerCommand>; 2], log: &mut TurnLog) {
        for side in Side::ALL {
            let team = &mut self.teams[side.index()];
            for player in &mut team.players {
                let farming = command_for(&commands[side.index()], player.id).action == PlayerAction::Farm;
                if farming && player.can_act() && !player.recalling {
                    player.farm_stacks += 1;
                    recompute_stats(player);
                    log.push(
                        Phase::Jungle,
                        format!("{} farms the jungle ({} stacks)", player.name, player.farm_stacks),
                    );
                }
            }
        }
    }

    fn recall(&mut self, log: &mut TurnLog) {
        for player in self.teams.iter_mut().flat_map(|t| t.players.iter_mut()) {
            if player.recalling && player.is_alive() {
                player.health = player.stats.max_health;
                log.push(Phase::Recall, format!("{} recalls and heals to full", player.name));
            }
        }
    }

    fn level_up(&mut self, log: &mut TurnLog) {
        let bonus = StatBundle {
            attack: LEVEL_ATTACK,
            max_health: LEVEL_HEALTH,
            ..StatBundle::ZERO
        };
        for team in &mut self.teams {
            let mut levelled = 0;
            for player in &mut team.players {
                if player.recalling || player.level >= MAX_LEVEL {
                    continue;
                }
                player.level += 1;
                player.permanent_bonus.add(&bonus);
                let before = player.health;
                recompute_stats(player);
                if player.is_alive() {
                    player.health = (before + LEVEL_HEALTH).min(player.stats.max_health);
                }
                if matches!(player.level, 6 | 12 | 18) {
                    log.push(
                        Phase::LevelUp,
                        format!("{} reaches level {} and ranks up their ability", player.name, player.level),
                    );
                }
                levelled += 1;
            }
            if levelled > 0 {
                log.push(Phase::LevelUp, format!("{} players on {} level up", levelled, team.name));
            }
        }
    }

    fn cast_abilities(&mut self, commands: &[Vec<PlayerCommand>; 2], log: &mut TurnLog) {
        for side in Side::ALL {
            for command in commands[side.index()].iter().filter(|c| c.use_ability) {
                let (own, enemy) = split_sides(&mut self.teams, side);
                if let Some(line) =
                    use_ability(own, enemy, command.player_id, log.turn, command.ability_target, &self.rules)
                {
                    log.push(Phase::Abilities, line);
                }
            }
        }
    }

    fn sustain(&mut self, log: &mut TurnLog) {
        for team in &mut self.teams {
            sustain_team(team, log);
        }
    }

    fn resolve_objective(
        &mut self,
        commands: &[Vec<PlayerCommand>; 2],
        log: &mut TurnLog,
    ) -> Option<ObjectiveResult> {
        let turn = log.turn;
        let spawn = scheduled_objective(turn, &self.tracker, &self.rules, &mut self.rng)?;
        if spawn != ObjectiveSpawn::Elder {
            self.tracker.defer_elder(turn);
        }
        if spawn == ObjectiveSpawn::Baron {
            self.tracker.record_baron(turn);
        }

        let mut contests = Vec::with_capacity(spawn.kinds().len());
        for &kind in spawn.kinds() {
            log.push(Phase::Objective, format!("The {} spawns", kind.name()));
            let mut lines = Vec::new();
            let report = resolve_contest(
                &mut self.teams,
                commands,
                kind,
                turn,
                &mut self.rng,
                &self.rules,
                &mut lines,
            );
            log.extend(Phase::Objective, lines);

            if let Some(winner) = report.winner {
                let team = &mut self.teams[winner.index()];
                log.push(Phase::Objective, apply_reward(team, kind, turn, &self.rules));
            }
            match kind {
                ObjectiveKind::Dragon => {
                    let winner = report
                        .winner
                        .map(|side| (side, self.teams[side.index()].buffs.dragon_stacks));
                    self.tracker.record_dragon(turn, winner, &self.rules);
                }
                ObjectiveKind::Elder => self.tracker.record_elder(turn, &self.rules),
                ObjectiveKind::Voidgrub | ObjectiveKind::Baron => {}
            }
            contests.push(report);
        }

        Some(ObjectiveResult { spawn, contests })
    }

    /// Team 1's nexus is checked first, so a double knockout goes to team 2.
    fn check_victory(&mut self, log: &mut TurnLog) -> Option<GameEnd> {
        let winner = if self.teams[0].nexus_destroyed() {
            Side::Team2
        } else if self.teams[1].nexus_destroyed() {
            Side::Team1
        } else {
            return None;
        };
        log.push(
            Phase::Victory,
            format!(
                "{}'s nexus is destroyed; {} wins",
                self.teams[winner.opponent().index()].name,
                self.teams[winner.index()].name
            ),
        );
        self.status = MatchStatus::win_for(winner);
        let end = GameEnd {
            winner,
            reason: EndReason::NexusDestroyed,
            turn: log.turn,
        };
        self.end = Some(end);
        info!(match_id = self.id, turn = log.turn, ?winner, "nexus destroyed");
        Some(end)
    }
}

fn sustain_team(team: &mut TeamState, log: &mut TurnLog) {
    let mut auras = Vec::new();
    for (index, player) in team.players.iter().enumerate() {
        if !player.is_alive() {
            continue;
        }
        for &id in &player.items {
            if let Some(item) = item_by_id(id) {
                if let Some(ItemSpecial::Aura { scope, percent }) = item.special {
                    auras.push((index, scope, percent, item.name));
                }
            }
        }
    }

    for (source, scope, percent, name) in auras {
        let mut healed = 0.0;
        for (index, player) in team.players.iter_mut().enumerate() {
            let reached = match scope {
                AuraScope::SelfOnly => index == source,
                AuraScope::Team => true,
                AuraScope::AlliesOnly => index != source,
            };
            if reached && player.is_alive() {
                healed += player.heal(player.stats.max_health * percent);
            }
        }
        if healed >= 1.0 {
            log.push(
                Phase::Sustain,
                format!("{}'s {name} restores {healed:.0} health", team.players[source].name),
            );
        }
    }
}
