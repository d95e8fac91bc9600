//! Output formatting utilities for CLI.

#![allow(clippy::format_push_string)]

use rift::game::Side;
use rift::tournament::{MatchSummary, TournamentStats};
use serde::Serialize;

/// Format a match summary as human-readable text.
pub(super) fn format_summary(summary: &MatchSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match Result (seed: {})\n", summary.seed));
    match (summary.winner, summary.reason) {
        (Some(winner), Some(reason)) => {
            output.push_str(&format!("  Winner: {winner:?} ({reason:?})\n"));
        }
        _ => output.push_str("  Winner: none (turn cap reached)\n"),
    }
    output.push_str(&format!("  Turns: {}\n\n", summary.turns_played));

    for side in Side::ALL {
        let i = side.index();
        output.push_str(&format!(
            "  {side:?}: {} kills, {} towers destroyed, nexus {:.0}\n",
            summary.kills[i],
            summary.towers_destroyed[i],
            summary.nexus_health[i].max(0.0),
        ));
    }

    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Games that failed to run.
    errors: u64,
    /// Games stopped by the turn cap.
    capped: u64,
    /// Per-side statistics.
    sides: Vec<JsonTournamentSide>,
    /// Average game length in turns.
    avg_turns: f64,
    /// Standard deviation of game length.
    turns_std_dev: f64,
    /// Average kills per game.
    avg_kills: f64,
    /// Average towers destroyed per game.
    avg_towers: f64,
    /// Wall-clock duration in seconds.
    duration_secs: f64,
}

/// JSON-serializable per-side tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentSide {
    /// Side name.
    side: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
}

impl JsonTournamentResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &TournamentStats, duration_secs: f64) -> Self {
        let sides = Side::ALL
            .into_iter()
            .map(|side| JsonTournamentSide {
                side: format!("{side:?}"),
                wins: stats.wins[side.index()],
                win_rate: stats.win_rate(side),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            errors: stats.errors,
            capped: stats.capped,
            sides,
            avg_turns: stats.avg_turns(),
            turns_std_dev: stats.turns_std_dev(),
            avg_kills: stats.avg_kills(),
            avg_towers: stats.avg_towers(),
            duration_secs,
        }
    }
}

/// Format tournament stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_tournament_text(stats: &TournamentStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for side in Side::ALL {
        output.push_str(&format!(
            "  {side:?}: {:.1}% ({} wins)\n",
            stats.win_rate(side) * 100.0,
            stats.wins[side.index()]
        ));
    }
    let capped_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.capped as f64 / stats.games_played as f64 * 100.0
    };
    output.push_str(&format!("  Turn cap: {} ({capped_rate:.1}%)\n\n", stats.capped));

    output.push_str(&format!(
        "Average Game Length: {:.1} turns (+/- {:.1})\n",
        stats.avg_turns(),
        stats.turns_std_dev()
    ));
    output.push_str(&format!("Average Kills: {:.1}\n", stats.avg_kills()));
    output.push_str(&format!("Average Towers Destroyed: {:.1}\n", stats.avg_towers()));
    if stats.errors > 0 {
        output.push_str(&format!("Failed games: {}\n", stats.errors));
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats) -> String {
    let mut output = String::from("side,wins,win_rate,avg_turns,avg_kills,capped\n");
    for side in Side::ALL {
        output.push_str(&format!(
            "{side:?},{},{:.4},{:.2},{:.2},{}\n",
            stats.wins[side.index()],
            stats.win_rate(side),
            stats.avg_turns(),
            stats.avg_kills(),
            stats.capped,
        ));
    }
    output
}
