//! Kill, assist and revive bookkeeping.

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::game::{PlayerId, TeamState};

/// What happened when a player reached zero health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillReport {
    /// Player credited with the kill.
    pub killer: PlayerId,
    /// Player who died.
    pub victim: PlayerId,
    /// Players credited with assists.
    pub assists: Vec<PlayerId>,
    /// The victim came back through a revive instead of dying.
    pub revived: bool,
}

impl KillReport {
    /// One-line description for the event log.
    #[must_use]
    pub fn describe(&self, killers: &TeamState, victims: &TeamState) -> String {
        let name = |team: &TeamState, id| {
            team.player(id).map_or_else(|| format!("#{id}"), |p| p.name.clone())
        };
        let killer = name(killers, self.killer);
        let victim = name(victims, self.victim);
        if self.revived {
            return format!("{victim} was struck down by {killer} but revived");
        }
        if self.assists.is_empty() {
            format!("{killer} killed {victim}")
        } else {
            let assists: Vec<_> = self.assists.iter().map(|&id| name(killers, id)).collect();
            format!("{killer} killed {victim} (assists: {})", assists.join(", "))
        }
    }
}

/// Resolve the death of `victim` on `victims`, credited to `killer` on `killers`.
///
/// A pending revive consumes itself and restores health instead. Otherwise
/// the victim is marked dead with a respawn turn, the killer earns kill gold,
/// and every remembered attacker other than the killer who is still alive
/// earns an assist. Returns `None` when the victim is unknown or already dead.
pub fn resolve_kill(
    killers: &mut TeamState,
    killer: PlayerId,
    victims: &mut TeamState,
    victim: PlayerId,
    turn: u32,
    rules: &RulesConfig,
) -> Option<KillReport> {
    let target = victims.player_mut(victim)?;
    if target.dead {
        return None;
    }

    if let Some(fraction) = target.revive.take() {
        target.health = (target.stats.max_health * fraction).max(1.0);
        return Some(KillReport {
            killer,
            victim,
            assists: Vec::new(),
            revived: true,
        });
    }

    target.dead = true;
    target.health = 0.0;
    target.deaths += 1;
    target.respawn_turn = Some(turn + rules.respawn_delay);
    target.shield = 0.0;
    target.statuses.clear();
    let sources: Vec<PlayerId> = target.damage_sources.drain(..).collect();

    let mut assists = Vec::new();
    for source in sources {
        if source == killer {
            continue;
        }
        if let Some(helper) = killers.player_mut(source) {
            if helper.is_alive() {
                helper.assists += 1;
                helper.gold += rules.assist_gold;
                assists.push(source);
            }
        }
    }

    if let Some(credited) = killers.player_mut(killer) {
        credited.kills += 1;
        credited.gold += rules.kill_gold;
    }

    Some(KillReport {
        killer,
        victim,
        assists,
        revived: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Roster, RosterPlayer, Side};

    fn teams() -> (TeamState, TeamState) {
        let roster = |team_id, first| Roster {
            team_id,
            name: format!("t{team_id}"),
            players: Position::ALL
                .iter()
                .zip(first..)
                .map(|(&pos, id)| RosterPlayer::new(id, format!("p{id}"), pos, 70))
                .collect(),
        };
        let rules = RulesConfig::default();
        (
            TeamState::new(Side::Team1, &roster(1, 1), &rules),
            TeamState::new(Side::Team2, &roster(2, 11), &rules),
        )
    }

    #[test]
    fn test_kill_without_assists() {
        let (mut a, mut b) = teams();
        let rules = RulesConfig::default();
        let gold_before = a.players[0].gold;

        let report = resolve_kill(&mut a, 1, &mut b, 11, 5, &rules).unwrap();
        assert!(report.assists.is_empty());
        assert!(!report.revived);
        assert_eq!(a.players[0].gold, gold_before + 300);
        assert_eq!(a.players[0].kills, 1);

        let victim = b.player(11).unwrap();
        assert!(victim.dead);
        assert_eq!(victim.respawn_turn, Some(7));
        assert_eq!(victim.deaths, 1);
    }

    #[test]
    fn test_assists_exclude_killer_and_dead() {
        let (mut a, mut b) = teams();
        let rules = RulesConfig::default();
        {
            let victim = b.player_mut(13).unwrap();
            for source in [2, 1, 3] {
                victim.record_damage_source(source);
            }
        }
        a.player_mut(3).unwrap().dead = true;

        let report = resolve_kill(&mut a, 1, &mut b, 13, 9, &rules).unwrap();
        assert_eq!(report.assists, vec![2]);
        assert_eq!(a.player(2).unwrap().assists, 1);
        assert_eq!(a.player(3).unwrap().assists, 0);
        assert!(b.player(13).unwrap().damage_sources.is_empty());
        assert!(report.describe(&a, &b).contains("assists: p2"));
    }

    #[test]
    fn test_revive_consumes_itself() {
        let (mut a, mut b) = teams();
        let rules = RulesConfig::default();
        {
            let victim = b.player_mut(12).unwrap();
            victim.revive = Some(0.5);
            victim.health = 0.0;
        }

        let report = resolve_kill(&mut a, 1, &mut b, 12, 3, &rules).unwrap();
        assert!(report.revived);
        let victim = b.player(12).unwrap();
        assert!(victim.is_alive());
        assert!((victim.health_ratio() - 0.5).abs() < 1e-9);
        assert!(victim.revive.is_none());
        assert_eq!(a.player(1).unwrap().kills, 0);

        let report = resolve_kill(&mut a, 1, &mut b, 12, 3, &rules).unwrap();
        assert!(!report.revived);
        assert!(resolve_kill(&mut a, 1, &mut b, 12, 3, &rules).is_none());
    }
}
