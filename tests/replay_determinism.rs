//! Recordings reproduce the original match exactly.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use rift::config::MatchConfig;
use rift::replay::{render_text, Recording, ReplayEngine};
use rift::tournament::{generate_roster, run_match, Simulation};

fn config() -> MatchConfig {
    MatchConfig {
        max_turns: 40,
        ..MatchConfig::default()
    }
}

#[test]
fn test_saved_recording_replays_same_match() {
    let rosters = [generate_roster(3, 1, 500), generate_roster(9, 6, 501)];
    let mut sim = Simulation::new(500, rosters.clone(), &config()).unwrap();
    let mut live_results = Vec::new();
    while let Some(result) = sim.step().unwrap() {
        live_results.push(result);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("500.json");
    Recording::new(500, rosters, config()).save(&path).unwrap();

    let mut replay = ReplayEngine::new(Recording::load(&path).unwrap()).unwrap();
    for expected in &live_results {
        let result = replay.step_forward().unwrap();
        assert_eq!(result, expected);
    }
    assert!(replay.is_game_over());
    assert_eq!(replay.game().log(), sim.game().log());
    assert_eq!(render_text(replay.game()), render_text(sim.game()));
}

#[test]
fn test_seek_backward_and_forward_agree() {
    let recording = Recording::new(77, [generate_roster(1, 1, 77), generate_roster(2, 6, 78)], config());
    let mut engine = ReplayEngine::new_at_turn(recording.clone(), 10).unwrap();
    let at_ten = engine.game().teams().clone();

    engine.goto_turn(3).unwrap();
    assert_eq!(engine.turn(), 3);
    engine.goto_turn(10).unwrap();
    assert_eq!(engine.game().teams(), &at_ten);

    engine.step_backward().unwrap();
    engine.step_forward().unwrap();
    assert_eq!(engine.game().teams(), &at_ten);
}

#[test]
fn test_replay_summary_matches_headless_run() {
    let rosters = [generate_roster(1, 1, 9), generate_roster(2, 6, 10)];
    let summary = run_match(9, rosters.clone(), &config()).unwrap();

    let mut engine = ReplayEngine::new(Recording::new(9, rosters, config())).unwrap();
    while !engine.is_game_over() {
        engine.step_forward().unwrap();
    }
    assert_eq!(engine.turn(), summary.turns_played);
    assert_eq!(engine.game().end().map(|e| e.winner), summary.winner);
}
