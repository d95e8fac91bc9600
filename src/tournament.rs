//! Headless match runner.
//!
//! Provides a pure function interface: `(seed, rosters, config) -> MatchSummary`
//!
//! The runner handles:
//! - Seeded roster generation
//! - A full draft and game driven by two [`Autopilot`]s
//! - A turn cap so a stalled game always returns
//! - Parallel batches with rayon

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::autopilot::Autopilot;
use crate::config::MatchConfig;
use crate::draft::DraftAction;
use crate::engine::{EndReason, Match, MatchKind, TurnResult};
use crate::error::MatchError;
use crate::game::{MatchRng, PlayerId, Position, Roster, RosterPlayer, Side, TeamId};

/// Lowest overall rating a generated player gets.
const MIN_OVERALL: u8 = 60;

/// Spread of generated overall ratings above the minimum.
const OVERALL_SPREAD: usize = 31;

/// Salts separating each autopilot's stream from the match stream.
const PILOT_SALT: [u64; 2] = [0x5EED_0001, 0x5EED_0002];

/// Outcome of one headless match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Seed the match ran with.
    pub seed: u64,
    /// Winning side, `None` when the turn cap was hit.
    pub winner: Option<Side>,
    /// Why the match ended.
    pub reason: Option<EndReason>,
    /// Turns resolved.
    pub turns_played: u32,
    /// Kills per side.
    pub kills: [u32; 2],
    /// Towers each side destroyed.
    pub towers_destroyed: [usize; 2],
    /// Nexus health left per side.
    pub nexus_health: [f64; 2],
}

/// Error type for headless runs.
#[derive(Debug, Clone, PartialEq)]
pub enum TournamentError {
    /// The engine rejected a request.
    Match(MatchError),
    /// A simulation was configured with no turns to play.
    NoTurns,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match(e) => write!(f, "Match error: {e}"),
            Self::NoTurns => write!(f, "max_turns must be at least 1"),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<MatchError> for TournamentError {
    fn from(e: MatchError) -> Self {
        Self::Match(e)
    }
}

/// Roster with seeded ratings. Player ids count up from `first_player_id`.
#[must_use]
pub fn generate_roster(team_id: TeamId, first_player_id: PlayerId, seed: u64) -> Roster {
    let mut rng = MatchRng::new(seed);
    let players = Position::ALL
        .iter()
        .zip(first_player_id..)
        .map(|(&position, id)| {
            let spread = rng.index(OVERALL_SPREAD).and_then(|n| u8::try_from(n).ok()).unwrap_or(0);
            RosterPlayer::new(id, format!("{team_id}-{position:?}").to_lowercase(), position, MIN_OVERALL + spread)
        })
        .collect();
    Roster {
        team_id,
        name: format!("Team {team_id}"),
        players,
    }
}

/// The two generated rosters a batch game with `seed` uses.
#[must_use]
pub fn rosters_for_seed(seed: u64) -> [Roster; 2] {
    [
        generate_roster(1, 1, seed),
        generate_roster(2, 6, seed.wrapping_add(1)),
    ]
}

/// A match played by two autopilots, one turn at a time.
#[derive(Debug, Clone)]
pub struct Simulation {
    game: Match,
    pilots: [Autopilot; 2],
    max_turns: u32,
}

impl Simulation {
    /// Create the match and play the whole draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the rosters are invalid or the turn cap is zero.
    pub fn new(seed: u64, rosters: [Roster; 2], config: &MatchConfig) -> Result<Self, TournamentError> {
        if config.max_turns == 0 {
            return Err(TournamentError::NoTurns);
        }
        let game = Match::new(seed, MatchKind::Normal, rosters, seed, config.rules)?;
        let pilots = [
            Autopilot::new(seed ^ PILOT_SALT[0]),
            Autopilot::new(seed ^ PILOT_SALT[1]),
        ];
        let mut sim = Self {
            game,
            pilots,
            max_turns: config.max_turns,
        };
        sim.run_draft()?;
        Ok(sim)
    }

    fn run_draft(&mut self) -> Result<(), TournamentError> {
        self.game.begin_draft()?;
        while let Some(slot) = self.game.current_draft_slot() {
            let choice = match self.game.draft() {
                Some(draft) => self.pilots[slot.side.index()].draft_choice(draft, slot.side),
                None => None,
            };
            match (choice, slot.action) {
                (Some(champion), DraftAction::Ban) => self.game.draft_ban(slot.side, champion)?,
                (Some(champion), DraftAction::Pick) => self.game.draft_pick(slot.side, champion)?,
                (None, _) => self.game.draft_skip(slot.side)?,
            };
        }
        self.game.start_game()?;
        Ok(())
    }

    /// The match being played.
    #[must_use]
    pub const fn game(&self) -> &Match {
        &self.game
    }

    /// Whether the match ended or the turn cap was reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.game.status().is_terminal() || self.game.turn() > self.max_turns
    }

    /// Plan, submit and resolve one turn. Returns `None` once finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects a planned submission.
    pub fn step(&mut self) -> Result<Option<TurnResult>, TournamentError> {
        if self.is_finished() {
            return Ok(None);
        }
        for side in Side::ALL {
            let plan = self.pilots[side.index()].plan_turn(&self.game, side);
            self.game.submit_actions(side, plan)?;
        }
        Ok(Some(self.game.process_turn()?))
    }

    /// Play to the end and summarize.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects a planned submission.
    pub fn run(mut self) -> Result<MatchSummary, TournamentError> {
        while self.step()?.is_some() {}
        Ok(self.summary())
    }

    /// Summary of the match as it stands.
    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        let teams = self.game.teams();
        let end = self.game.end();
        let turns_played = match end {
            Some(end) => end.turn,
            None => self.game.turn().saturating_sub(1),
        };
        let towers = |side: Side| teams[side.index()].towers.len() - teams[side.index()].towers_standing();
        MatchSummary {
            seed: self.game.seed(),
            winner: end.map(|e| e.winner),
            reason: end.map(|e| e.reason),
            turns_played,
            kills: [teams[0].total_kills(), teams[1].total_kills()],
            towers_destroyed: [towers(Side::Team2), towers(Side::Team1)],
            nexus_health: [teams[0].nexus_health, teams[1].nexus_health],
        }
    }
}

/// Run one headless match from draft to result.
///
/// # Errors
///
/// Returns an error if the rosters are invalid or the engine rejects a request.
pub fn run_match(seed: u64, rosters: [Roster; 2], config: &MatchConfig) -> Result<MatchSummary, TournamentError> {
    let summary = Simulation::new(seed, rosters, config)?.run()?;
    debug!(seed, winner = ?summary.winner, turns = summary.turns_played, "headless match finished");
    Ok(summary)
}

/// Aggregated batch results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TournamentStats {
    /// Games that finished or hit the cap.
    pub games_played: u64,
    /// Wins per side.
    pub wins: [u64; 2],
    /// Games stopped by the turn cap.
    pub capped: u64,
    /// Games that failed to run.
    pub errors: u64,
    total_turns: u64,
    turn_sq_sum: f64,
    total_kills: u64,
    total_towers: u64,
}

impl TournamentStats {
    /// Empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a game result.
    pub fn add_result(&mut self, summary: &MatchSummary) {
        self.games_played += 1;
        match summary.winner {
            Some(side) => self.wins[side.index()] += 1,
            None => self.capped += 1,
        }
        let turns = f64::from(summary.turns_played);
        self.total_turns += u64::from(summary.turns_played);
        self.turn_sq_sum += turns * turns;
        self.total_kills += u64::from(summary.kills[0] + summary.kills[1]);
        let towers = summary.towers_destroyed[0] + summary.towers_destroyed[1];
        self.total_towers += u64::try_from(towers).unwrap_or(u64::MAX);
    }

    /// Count a game that returned an error.
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Combine with stats from another worker.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.wins[0] += other.wins[0];
        self.wins[1] += other.wins[1];
        self.capped += other.capped;
        self.errors += other.errors;
        self.total_turns += other.total_turns;
        self.turn_sq_sum += other.turn_sq_sum;
        self.total_kills += other.total_kills;
        self.total_towers += other.total_towers;
    }

    fn per_game(&self, total: f64) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            total / self.games_played as f64
        }
    }

    /// Share of games `side` won, 0.0 to 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, side: Side) -> f64 {
        self.per_game(self.wins[side.index()] as f64)
    }

    /// Average game length.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_turns(&self) -> f64 {
        self.per_game(self.total_turns as f64)
    }

    /// Standard deviation of game length.
    #[must_use]
    pub fn turns_std_dev(&self) -> f64 {
        let mean = self.avg_turns();
        let variance = self.per_game(self.turn_sq_sum) - mean * mean;
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Average kills per game, both sides together.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_kills(&self) -> f64 {
        self.per_game(self.total_kills as f64)
    }

    /// Average towers destroyed per game, both sides together.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_towers(&self) -> f64 {
        self.per_game(self.total_towers as f64)
    }
}

/// Run `games` matches with seeds `base_seed..` on the rayon pool.
///
/// Each thread folds into its own [`TournamentStats`]; the partials are
/// merged at the end.
#[must_use]
pub fn run_batch(base_seed: u64, games: u64, config: &MatchConfig) -> TournamentStats {
    (0..games)
        .into_par_iter()
        .fold(TournamentStats::new, |mut stats, i| {
            let seed = base_seed.wrapping_add(i);
            match run_match(seed, rosters_for_seed(seed), config) {
                Ok(summary) => stats.add_result(&summary),
                Err(_) => stats.add_error(),
            }
            stats
        })
        .reduce(TournamentStats::new, |mut a, b| {
            a.merge(&b);
            a
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_roster_is_valid_and_seeded() {
        let a = generate_roster(4, 31, 99);
        assert!(a.validate().is_ok());
        assert_eq!(a.players[0].player_id, 31);
        assert!(a.players.iter().all(|p| (MIN_OVERALL..=90).contains(&p.overall)));
        assert_eq!(a, generate_roster(4, 31, 99));
    }

    #[test]
    fn test_run_match_deterministic() {
        let config = MatchConfig::default();
        let a = run_match(12, rosters_for_seed(12), &config).unwrap();
        let b = run_match(12, rosters_for_seed(12), &config).unwrap();
        assert_eq!(a, b);
        assert!(a.turns_played >= 1);
        assert!(a.turns_played <= config.max_turns);
    }

    #[test]
    fn test_turn_cap_leaves_no_winner() {
        let config = MatchConfig {
            max_turns: 2,
            ..MatchConfig::default()
        };
        let summary = run_match(3, rosters_for_seed(3), &config).unwrap();
        assert_eq!(summary.turns_played, 2);
        assert_eq!(summary.winner, None);
        assert_eq!(summary.reason, None);
    }

    #[test]
    fn test_zero_turn_cap_rejected() {
        let config = MatchConfig {
            max_turns: 0,
            ..MatchConfig::default()
        };
        assert_eq!(
            run_match(1, rosters_for_seed(1), &config).unwrap_err(),
            TournamentError::NoTurns
        );
    }

    #[test]
    fn test_invalid_roster_surfaces_match_error() {
        let rosters = [generate_roster(1, 1, 0), generate_roster(2, 1, 0)];
        let err = run_match(0, rosters, &MatchConfig::default()).unwrap_err();
        assert!(matches!(err, TournamentError::Match(MatchError::InvalidRoster(_))));
    }

    #[test]
    fn test_batch_counts_every_game() {
        let config = MatchConfig {
            max_turns: 30,
            ..MatchConfig::default()
        };
        let stats = run_batch(100, 6, &config);
        assert_eq!(stats.games_played + stats.errors, 6);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.wins[0] + stats.wins[1] + stats.capped, 6);
        assert!(stats.avg_turns() > 0.0);
    }

    #[test]
    fn test_merge_matches_sequential() {
        let summaries: Vec<MatchSummary> = (0..4)
            .map(|seed| MatchSummary {
                seed,
                winner: if seed % 2 == 0 { Some(Side::Team1) } else { None },
                reason: None,
                turns_played: 10 + u32::try_from(seed).unwrap(),
                kills: [1, 2],
                towers_destroyed: [0, 1],
                nexus_health: [3000.0, 3000.0],
            })
            .collect();
        let mut all = TournamentStats::new();
        summaries.iter().for_each(|s| all.add_result(s));
        let mut left = TournamentStats::new();
        let mut right = TournamentStats::new();
        summaries[..2].iter().for_each(|s| left.add_result(s));
        summaries[2..].iter().for_each(|s| right.add_result(s));
        left.merge(&right);
        assert_eq!(left, all);
        assert!((all.win_rate(Side::Team1) - 0.5).abs() < 1e-9);
        assert_eq!(all.capped, 2);
    }
}
