//! Plain-text board rendering.

#![allow(clippy::format_push_string)]

use crate::champion::champion_by_id;
use crate::engine::{GameEvent, Match};
use crate::game::{item_by_id, PlayerState, TeamState};

/// Render both teams and the match status.
///
/// Output format:
/// ```text
/// === TURN 12 | InProgress ===
///
/// Team1 (Team 1) nexus 3000/3000, towers 5/6, dragons 1, buffs: baron
///   Top      1-top          Ironwarden     L9   812/1025       gold 340   2/1/3  [Warhammer]
///   ...
/// ```
#[must_use]
pub fn render_text(game: &Match) -> String {
    let mut output = String::new();
    output.push_str(&format!("=== TURN {} | {:?} ===\n", game.turn(), game.status()));
    if let Some(end) = game.end() {
        output.push_str(&format!(
            "Winner: {:?} ({:?}, turn {})\n",
            end.winner, end.reason, end.turn
        ));
    }

    for team in game.teams() {
        output.push('\n');
        render_team(&mut output, team);
    }
    output
}

fn render_team(output: &mut String, team: &TeamState) {
    let mut buffs = Vec::new();
    if team.buffs.has_grub() {
        buffs.push("voidgrub");
    }
    if team.buffs.has_baron() {
        buffs.push("baron");
    }
    if team.buffs.has_elder() {
        buffs.push("elder");
    }
    output.push_str(&format!(
        "{:?} ({}) nexus {:.0}/{:.0}, towers {}/{}, dragons {}, buffs: {}\n",
        team.side,
        team.name,
        team.nexus_health.max(0.0),
        team.nexus_max_health,
        team.towers_standing(),
        team.towers.len(),
        team.buffs.dragon_stacks,
        if buffs.is_empty() { "none".to_string() } else { buffs.join(", ") },
    ));
    for player in &team.players {
        render_player(output, player);
    }
}

fn render_player(output: &mut String, player: &PlayerState) {
    let champion = player
        .champion
        .and_then(champion_by_id)
        .map_or("-", |c| c.name);
    let items: Vec<&str> = player
        .items
        .iter()
        .map(|&id| item_by_id(id).map_or("?", |item| item.name))
        .collect();
    let state = match player.respawn_turn {
        Some(turn) if player.dead => format!("dead until {turn}"),
        _ => format!("{:.0}/{:.0}", player.health, player.stats.max_health),
    };
    let position = format!("{:?}", player.position);
    output.push_str(&format!(
        "  {:<8} {:<14} {:<14} L{:<3} {:<14} gold {:<5} {}/{}/{}  [{}]\n",
        position,
        player.name,
        champion,
        player.level,
        state,
        player.gold,
        player.kills,
        player.deaths,
        player.assists,
        items.join(", "),
    ));
}

/// Render events one per line, tagged with turn and phase.
#[must_use]
pub fn render_events(events: &[GameEvent]) -> String {
    events
        .iter()
        .map(|e| {
            let phase = format!("{:?}", e.phase);
            format!("[T{:>3} {phase:<10}] {}\n", e.turn, e.message)
        })
        .collect()
}
