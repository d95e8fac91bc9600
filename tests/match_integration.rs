//! End-to-end tests for the match lifecycle: draft, turns and terminal states.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use rift::autopilot::Autopilot;
use rift::config::{MatchConfig, RulesConfig};
use rift::draft::DRAFT_SLOTS;
use rift::engine::{EndReason, Match, MatchKind, MatchStatus, Phase};
use rift::error::MatchError;
use rift::game::{check_invariants, PlayerAction, PlayerCommand, Roster, Side};
use rift::tournament::{rosters_for_seed, run_match, Simulation};

fn new_match(seed: u64) -> Match {
    Match::new(
        1,
        MatchKind::Ranked,
        [Roster::uniform(10, 1, 70), Roster::uniform(20, 6, 70)],
        seed,
        RulesConfig::default(),
    )
    .unwrap()
}

fn drafted(seed: u64) -> Match {
    let mut game = new_match(seed);
    game.begin_draft().unwrap();
    for _ in 0..DRAFT_SLOTS {
        game.draft_timeout().unwrap();
    }
    game.start_game().unwrap();
    game
}

#[test]
fn test_full_draft_assigns_unique_champions() {
    let game = drafted(5);
    assert_eq!(game.status(), MatchStatus::InProgress);
    assert!(game.draft().is_none());

    let mut champions: Vec<_> = game
        .teams()
        .iter()
        .flat_map(|t| t.players.iter().map(|p| p.champion.unwrap()))
        .collect();
    champions.sort_unstable();
    champions.dedup();
    assert_eq!(champions.len(), 10);
    assert!(game.log().iter().all(|e| e.phase == Phase::Setup));
}

#[test]
fn test_turns_require_in_progress() {
    let mut game = new_match(1);
    assert!(matches!(game.process_turn(), Err(MatchError::WrongStage(_) | MatchError::NotInProgress(_))));
    assert!(game.submit_actions(Side::Team1, Vec::new()).is_err());
}

#[test]
fn test_event_phases_follow_pipeline_order() {
    let mut game = drafted(17);
    let mut pilot = Autopilot::new(3);
    for _ in 0..12 {
        for side in Side::ALL {
            let plan = pilot.plan_turn(&game, side);
            game.submit_actions(side, plan).unwrap();
        }
        let result = game.process_turn().unwrap();
        assert!(result.events.windows(2).all(|w| w[0].phase <= w[1].phase));
        assert!(result.events.iter().all(|e| e.turn == result.turn));
        assert!(check_invariants(&game).is_empty());
        if result.game_end.is_some() {
            break;
        }
    }
}

#[test]
fn test_all_recall_leaves_structures_untouched() {
    let mut game = drafted(8);
    for side in Side::ALL {
        let commands = game
            .team(side)
            .players
            .iter()
            .map(|p| PlayerCommand::new(p.id, PlayerAction::Recall))
            .collect();
        game.submit_actions(side, commands).unwrap();
    }
    let result = game.process_turn().unwrap();
    assert!(result.lanes.is_empty());
    assert!(result.siege_damage.iter().all(|d| d.abs() < 1e-12));
    for team in result.teams {
        assert_eq!(team.towers_standing(), 6);
        assert!(team.players.iter().all(|p| p.level == 1));
    }
}

#[test]
fn test_surrender_flow_and_record() {
    let mut sim = Simulation::new(
        4,
        rosters_for_seed(4),
        &MatchConfig {
            max_turns: 200,
            ..MatchConfig::default()
        },
    )
    .unwrap();
    for _ in 0..14 {
        if sim.step().unwrap().is_none() {
            return;
        }
    }
    let mut game = sim.game().clone();
    if game.status().is_terminal() {
        return;
    }
    let end = game.surrender(Side::Team2).unwrap();
    assert_eq!(end.winner, Side::Team1);
    assert_eq!(end.reason, EndReason::Surrender);
    assert_eq!(game.status(), MatchStatus::Surrendered);

    let record = game.record().unwrap();
    assert_eq!(record.winner, game.team(Side::Team1).team_id);
    assert_eq!(record.item_usage.len(), 10);
    assert_eq!(record.events.last().unwrap().phase, Phase::Forfeit);
    assert!(matches!(game.surrender(Side::Team1), Err(MatchError::MatchOver(_))));
}

#[test]
fn test_headless_matches_finish_with_consistent_summary() {
    let config = MatchConfig::default();
    for seed in 0..5 {
        let summary = run_match(seed, rosters_for_seed(seed), &config).unwrap();
        match summary.winner {
            Some(winner) => {
                assert_eq!(summary.reason, Some(EndReason::NexusDestroyed));
                assert!(summary.nexus_health[winner.opponent().index()] <= 0.0);
                assert!(summary.towers_destroyed[winner.index()] > 0);
            }
            None => assert_eq!(summary.turns_played, config.max_turns),
        }
    }
}
