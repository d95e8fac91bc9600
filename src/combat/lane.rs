//! Lane skirmishes.

use serde::{Deserialize, Serialize};

use crate::combat::damage::{roll_hit, team_power};
use crate::combat::kill::{resolve_kill, KillReport};
use crate::config::RulesConfig;
use crate::game::{
    split_sides, ItemSpecial, Lane, MatchRng, PlayerAction, PlayerCommand, PlayerId, Side,
    TeamState, item_by_id,
};

/// Structure damage per point of attack for an unopposed attacker.
pub const FREE_HIT_MULTIPLIER: f64 = 2.5;

/// Damage multiplier for a ganker the enemy did not ward.
pub const AMBUSH_MULTIPLIER: f64 = 1.2;

/// Damage multiplier for hits on a defending player.
pub const DEFEND_MULTIPLIER: f64 = 0.8;

/// Health fraction under which an elder-buffed team executes a target.
pub const ELDER_EXECUTE_THRESHOLD: f64 = 0.1;

/// Outcome of one lane for the turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneReport {
    /// Lane resolved.
    pub lane: Lane,
    /// Participants per side, in attack order within the side.
    pub participants: [Vec<PlayerId>; 2],
    /// Fighting power per side.
    pub power: [f64; 2],
    /// Champion damage dealt per side.
    pub damage: [f64; 2],
    /// Structure damage dealt per side.
    pub structure_damage: [f64; 2],
    /// Kills, in the order they happened.
    pub kills: Vec<KillReport>,
}

/// Submitted command for `player`, or the fallback.
#[must_use]
pub fn command_for(commands: &[PlayerCommand], player: PlayerId) -> PlayerCommand {
    commands
        .iter()
        .find(|c| c.player_id == player)
        .copied()
        .unwrap_or_else(|| PlayerCommand::fallback(player))
}

/// Indices of the players of `team` fighting in `lane`, in submission order.
///
/// A player is in a lane when they fight or defend in their home lane, or
/// gank it. Dead, recalling and disabled players are never placed, and a
/// rooted player cannot gank.
#[must_use]
pub fn lane_participants(team: &TeamState, commands: &[PlayerCommand], lane: Lane) -> Vec<usize> {
    let mut order: Vec<PlayerId> = commands.iter().map(|c| c.player_id).collect();
    for player in &team.players {
        if !order.contains(&player.id) {
            order.push(player.id);
        }
    }

    order
        .into_iter()
        .filter_map(|id| {
            let index = team.player_index(id)?;
            let player = &team.players[index];
            if !player.can_act() || player.recalling {
                return None;
            }
            let placed = match command_for(commands, id).action {
                PlayerAction::Fight | PlayerAction::Defend => player.position.home_lane() == Some(lane),
                PlayerAction::Gank(target) => target == lane && player.can_roam(),
                _ => false,
            };
            placed.then_some(index)
        })
        .collect()
}

/// Whether any command of `commands` wards `lane`.
#[must_use]
pub fn is_warded(commands: &[PlayerCommand], lane: Lane) -> bool {
    commands.iter().any(|c| c.ward_lane == Some(lane))
}

/// Resolve the fight in `lane`. Returns `None` when nobody is there.
///
/// An unopposed side free-hits the enemy's front structure. Otherwise every
/// participant attacks once, fastest first, picking a random living enemy in
/// the lane, or the front structure once no enemy remains.
#[allow(clippy::too_many_lines, clippy::too_many_arguments)]
pub fn resolve_lane(
    teams: &mut [TeamState; 2],
    commands: &[Vec<PlayerCommand>; 2],
    lane: Lane,
    turn: u32,
    rng: &mut MatchRng,
    rules: &RulesConfig,
    events: &mut Vec<String>,
) -> Option<LaneReport> {
    let participants = [
        lane_participants(&teams[0], &commands[0], lane),
        lane_participants(&teams[1], &commands[1], lane),
    ];
    if participants.iter().all(Vec::is_empty) {
        return None;
    }

    let mut report = LaneReport {
        lane,
        participants: [
            participants[0].iter().map(|&i| teams[0].players[i].id).collect(),
            participants[1].iter().map(|&i| teams[1].players[i].id).collect(),
        ],
        power: [
            team_power(&teams[0], &participants[0]),
            team_power(&teams[1], &participants[1]),
        ],
        damage: [0.0; 2],
        structure_damage: [0.0; 2],
        kills: Vec::new(),
    };

    let unopposed = Side::ALL
        .into_iter()
        .find(|side| participants[side.opponent().index()].is_empty());

    if let Some(side) = unopposed {
        let (own, enemy) = split_sides(teams, side);
        for &index in &participants[side.index()] {
            let player = &own.players[index];
            if command_for(&commands[side.index()], player.id).action == PlayerAction::Defend {
                continue;
            }
            let hit = enemy.damage_structure(lane, player.stats.attack * FREE_HIT_MULTIPLIER);
            report.structure_damage[side.index()] += hit.damage;
            events.push(format!("{} hits the enemy {} for {:.0}", player.name, hit.structure, hit.damage));
            if hit.destroyed {
                events.push(format!("{}'s {} has been destroyed", enemy.name, hit.structure));
            }
        }
        return Some(report);
    }

    let mut order: Vec<(Side, usize)> = Side::ALL
        .into_iter()
        .flat_map(|side| participants[side.index()].iter().map(move |&i| (side, i)))
        .collect();
    order.sort_by(|a, b| {
        let speed = |&(side, i): &(Side, usize)| teams[side.index()].players[i].stats.speed;
        speed(b).total_cmp(&speed(a))
    });

    for (side, index) in order {
        let own_commands = &commands[side.index()];
        let enemy_commands = &commands[side.opponent().index()];
        let enemy_pool = &participants[side.opponent().index()];
        let (own, enemy) = split_sides(teams, side);

        let attacker = &own.players[index];
        if !attacker.can_act() {
            continue;
        }
        let command = command_for(own_commands, attacker.id);

        let targets: Vec<usize> = enemy_pool
            .iter()
            .copied()
            .filter(|&i| enemy.players[i].is_alive())
            .collect();

        let Some(&target) = rng.choose(&targets) else {
            if command.action == PlayerAction::Defend {
                continue;
            }
            let hit = enemy.damage_structure(lane, attacker.stats.attack * FREE_HIT_MULTIPLIER);
            report.structure_damage[side.index()] += hit.damage;
            events.push(format!("{} hits the enemy {} for {:.0}", attacker.name, hit.structure, hit.damage));
            if hit.destroyed {
                events.push(format!("{}'s {} has been destroyed", enemy.name, hit.structure));
            }
            continue;
        };

        let defender = &enemy.players[target];
        let hit = roll_hit(&attacker.stats, attacker.position, &defender.stats, rng);
        if hit.evaded {
            events.push(format!("{} evades {}'s attack", defender.name, attacker.name));
            continue;
        }

        let mut damage = hit.damage;
        if matches!(command.action, PlayerAction::Gank(_)) && !is_warded(enemy_commands, lane) {
            damage *= AMBUSH_MULTIPLIER;
        }
        if command_for(enemy_commands, defender.id).action == PlayerAction::Defend {
            damage *= DEFEND_MULTIPLIER;
        }
        let damage = damage.floor();

        let attacker_id = attacker.id;
        let attacker_name = attacker.name.clone();
        let life_steal = attacker.stats.life_steal;
        let execute = execute_threshold(&attacker.items, own.buffs.has_elder());

        let defender = &mut enemy.players[target];
        let dealt = defender.take_damage(damage);
        defender.record_damage_source(attacker_id);
        report.damage[side.index()] += dealt;
        let crit = if hit.crit { " (critical)" } else { "" };
        events.push(format!("{attacker_name} hits {} for {dealt:.0}{crit}", defender.name));

        if life_steal > 0.0 && dealt > 0.0 {
            own.players[index].heal(dealt * life_steal);
        }

        let defender = &mut enemy.players[target];
        let lethal = defender.health <= 0.0
            || (defender.health_ratio() < execute && defender.is_alive());
        if lethal {
            if defender.health > 0.0 {
                events.push(format!("{attacker_name} executes {}", defender.name));
                defender.health = 0.0;
            }
            let victim_id = defender.id;
            if let Some(kill) = resolve_kill(own, attacker_id, enemy, victim_id, turn, rules) {
                events.push(kill.describe(own, enemy));
                report.kills.push(kill);
            }
        }
    }

    Some(report)
}

/// Highest execute threshold from items and the elder buff.
fn execute_threshold(items: &[crate::game::ItemId], elder: bool) -> f64 {
    let from_items = items
        .iter()
        .filter_map(|&id| match item_by_id(id)?.special {
            Some(ItemSpecial::Execute { threshold }) => Some(threshold),
            _ => None,
        })
        .fold(0.0, f64::max);
    if elder {
        from_items.max(ELDER_EXECUTE_THRESHOLD)
    } else {
        from_items
    }
}

/// Structure damage for lanes one side holds alone, boosted by voidgrub and baron.
///
/// Defenders never siege. Returns the total damage dealt per side.
pub fn resolve_siege(
    teams: &mut [TeamState; 2],
    commands: &[Vec<PlayerCommand>; 2],
    events: &mut Vec<String>,
) -> [f64; 2] {
    let mut dealt = [0.0; 2];
    for lane in Lane::ALL {
        let participants = [
            lane_participants(&teams[0], &commands[0], lane),
            lane_participants(&teams[1], &commands[1], lane),
        ];
        for side in Side::ALL {
            if !participants[side.opponent().index()].is_empty() {
                continue;
            }
            let (own, enemy) = split_sides(teams, side);
            let attack: f64 = participants[side.index()]
                .iter()
                .map(|&i| &own.players[i])
                .filter(|p| command_for(&commands[side.index()], p.id).action != PlayerAction::Defend)
                .map(|p| p.stats.attack)
                .sum();
            if attack <= 0.0 {
                continue;
            }
            let hit = enemy.damage_structure(lane, attack * own.buffs.siege_multiplier());
            dealt[side.index()] += hit.damage;
            events.push(format!("{} sieges the enemy {} for {:.0}", own.name, hit.structure, hit.damage));
            if hit.destroyed {
                events.push(format!("{}'s {} has been destroyed", enemy.name, hit.structure));
            }
        }
    }
    dealt
}
