//! Objective teamfights.

use serde::{Deserialize, Serialize};

use crate::combat::damage::team_power;
use crate::combat::kill::{resolve_kill, KillReport};
use crate::combat::lane::command_for;
use crate::config::RulesConfig;
use crate::game::{split_sides, MatchRng, PlayerCommand, PlayerId, Side, TeamState};
use crate::objective::ObjectiveKind;

/// Death chance per point of power deficit for the winning side.
pub const WINNER_DEATH_FACTOR: f64 = 0.4;
/// Base death chance for the losing side.
pub const LOSER_DEATH_BASE: f64 = 0.5;
/// Death chance per point of power deficit for the losing side.
pub const LOSER_DEATH_FACTOR: f64 = 0.3;

/// Outcome of one objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestReport {
    /// Objective fought over.
    pub objective: ObjectiveKind,
    /// Contesters per side.
    pub contesters: [Vec<PlayerId>; 2],
    /// Side that took the objective; `None` when nobody came.
    pub winner: Option<Side>,
    /// Team 1's win chance when both sides fought.
    pub team1_win_chance: Option<f64>,
    /// Deaths in the fight.
    pub deaths: Vec<KillReport>,
}

/// Indices of `team` players contesting with the matching action.
///
/// Dead, recalling, disabled and rooted players cannot contest.
#[must_use]
pub fn contesters(team: &TeamState, commands: &[PlayerCommand], objective: ObjectiveKind) -> Vec<usize> {
    let wanted = objective.contest_action();
    team.players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.can_roam() && !p.recalling)
        .filter(|(_, p)| command_for(commands, p.id).action == wanted)
        .map(|(i, _)| i)
        .collect()
}

/// Fight over `objective`.
///
/// A lone side takes it without a roll. When both sides show up, team 1
/// wins with probability equal to its share of the combined power; each
/// participant then rolls for death and survivors are left in a health band.
/// Rewards are not applied here.
pub fn resolve_contest(
    teams: &mut [TeamState; 2],
    commands: &[Vec<PlayerCommand>; 2],
    objective: ObjectiveKind,
    turn: u32,
    rng: &mut MatchRng,
    rules: &RulesConfig,
    events: &mut Vec<String>,
) -> ContestReport {
    let present = [
        contesters(&teams[0], &commands[0], objective),
        contesters(&teams[1], &commands[1], objective),
    ];
    let mut report = ContestReport {
        objective,
        contesters: [
            present[0].iter().map(|&i| teams[0].players[i].id).collect(),
            present[1].iter().map(|&i| teams[1].players[i].id).collect(),
        ],
        winner: None,
        team1_win_chance: None,
        deaths: Vec::new(),
    };

    match (present[0].is_empty(), present[1].is_empty()) {
        (true, true) => {
            events.push(format!("Nobody contests the {}; it despawns", objective.name()));
            return report;
        }
        (false, true) => {
            report.winner = Some(Side::Team1);
            events.push(format!("{} takes the {} uncontested", teams[0].name, objective.name()));
            return report;
        }
        (true, false) => {
            report.winner = Some(Side::Team2);
            events.push(format!("{} takes the {} uncontested", teams[1].name, objective.name()));
            return report;
        }
        (false, false) => {}
    }

    let power = [team_power(&teams[0], &present[0]), team_power(&teams[1], &present[1])];
    let total = power[0] + power[1];
    let chance = if total > 0.0 { power[0] / total } else { 0.5 };
    report.team1_win_chance = Some(chance);

    let winner = if rng.roll(chance) { Side::Team1 } else { Side::Team2 };
    let loser = winner.opponent();
    report.winner = Some(winner);
    let ratio = |side: Side| if side == Side::Team1 { chance } else { 1.0 - chance };
    events.push(format!(
        "{} wins the fight for the {} ({:.0}% to win)",
        teams[winner.index()].name,
        objective.name(),
        ratio(winner) * 100.0
    ));

    let loser_death = LOSER_DEATH_BASE + (1.0 - ratio(loser)) * LOSER_DEATH_FACTOR;
    let winner_death = (1.0 - ratio(winner)) * WINNER_DEATH_FACTOR;

    for (side, death_chance, band) in [(loser, loser_death, (0.2, 0.5)), (winner, winner_death, (0.7, 0.95))] {
        for &index in &present[side.index()] {
            let (own, enemy) = split_sides(teams, side);
            if !own.players[index].is_alive() {
                continue;
            }
            if rng.roll(death_chance) {
                let killers: Vec<usize> = present[side.opponent().index()]
                    .iter()
                    .copied()
                    .filter(|&i| enemy.players[i].is_alive())
                    .collect();
                let Some(&killer_index) = rng.choose(&killers) else {
                    continue;
                };
                let killer = enemy.players[killer_index].id;
                let victim = own.players[index].id;
                own.players[index].health = 0.0;
                if let Some(kill) = resolve_kill(enemy, killer, own, victim, turn, rules) {
                    events.push(kill.describe(enemy, own));
                    report.deaths.push(kill);
                }
            } else {
                let player = &mut own.players[index];
                player.health = (player.stats.max_health * rng.uniform(band.0, band.1)).floor().max(1.0);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PlayerAction, Roster};

    fn setup() -> ([TeamState; 2], RulesConfig) {
        let rules = RulesConfig::default();
        (
            [
                TeamState::new(Side::Team1, &Roster::uniform(1, 1, 80), &rules),
                TeamState::new(Side::Team2, &Roster::uniform(2, 11, 80), &rules),
            ],
            rules,
        )
    }

    fn commands(team: &TeamState, action: PlayerAction, count: usize) -> Vec<PlayerCommand> {
        team.players
            .iter()
            .enumerate()
            .map(|(i, p)| {
                PlayerCommand::new(p.id, if i < count { action } else { PlayerAction::Fight })
            })
            .collect()
    }

    #[test]
    fn test_single_side_wins_without_roll() {
        let (mut teams, rules) = setup();
        let cmds = [
            commands(&teams[0], PlayerAction::ContestDragon, 2),
            commands(&teams[1], PlayerAction::Fight, 0),
        ];
        let mut rng = MatchRng::new(3);
        let mut untouched = rng.clone();
        let before = teams.clone();
        let mut events = Vec::new();

        let report = resolve_contest(&mut teams, &cmds, ObjectiveKind::Dragon, 4, &mut rng, &rules, &mut events);
        assert_eq!(report.winner, Some(Side::Team1));
        assert!(report.deaths.is_empty());
        assert_eq!(teams, before);
        assert_eq!(rng.uniform(0.0, 1.0).to_bits(), untouched.uniform(0.0, 1.0).to_bits());
    }

    #[test]
    fn test_nobody_contests() {
        let (mut teams, rules) = setup();
        let cmds = [commands(&teams[0], PlayerAction::Fight, 0), commands(&teams[1], PlayerAction::Fight, 0)];
        let mut rng = MatchRng::new(3);
        let mut events = Vec::new();
        let report = resolve_contest(&mut teams, &cmds, ObjectiveKind::Baron, 14, &mut rng, &rules, &mut events);
        assert!(report.winner.is_none());
        assert!(events[0].contains("despawns"));
    }

    #[test]
    fn test_wrong_action_does_not_contest() {
        let (teams, _) = setup();
        let cmds = commands(&teams[0], PlayerAction::ContestBaron, 5);
        assert!(contesters(&teams[0], &cmds, ObjectiveKind::Dragon).is_empty());
        assert_eq!(contesters(&teams[0], &cmds, ObjectiveKind::Baron).len(), 5);
    }

    #[test]
    fn test_win_rate_tracks_power_ratio() {
        let (base, rules) = setup();
        let cmds = [
            commands(&base[0], PlayerAction::ContestBaron, 3),
            commands(&base[1], PlayerAction::ContestBaron, 1),
        ];
        let mut wins = 0;
        let trials = 2000;
        let mut expected = 0.0;
        for seed in 0..trials {
            let mut teams = base.clone();
            let mut rng = MatchRng::new(seed);
            let mut events = Vec::new();
            let report = resolve_contest(&mut teams, &cmds, ObjectiveKind::Baron, 14, &mut rng, &rules, &mut events);
            expected = report.team1_win_chance.unwrap();
            if report.winner == Some(Side::Team1) {
                wins += 1;
            }
        }
        let observed = f64::from(wins) / f64::from(u32::try_from(trials).unwrap());
        assert!((observed - expected).abs() < 0.05, "observed {observed}, expected {expected}");
    }

    #[test]
    fn test_survivors_land_in_health_bands() {
        let (mut teams, rules) = setup();
        let cmds = [
            commands(&teams[0], PlayerAction::ContestElder, 5),
            commands(&teams[1], PlayerAction::ContestElder, 5),
        ];
        let mut rng = MatchRng::new(11);
        let mut events = Vec::new();
        let report = resolve_contest(&mut teams, &cmds, ObjectiveKind::Elder, 20, &mut rng, &rules, &mut events);
        let winner = report.winner.unwrap();

        for side in Side::ALL {
            let (lo, hi) = if side == winner { (0.7, 0.95) } else { (0.2, 0.5) };
            for p in teams[side.index()].players.iter().filter(|p| p.is_alive()) {
                let ratio = p.health_ratio();
                assert!(ratio >= lo - 0.01 && ratio <= hi, "{ratio} outside {lo}..{hi}");
            }
        }
    }
}
