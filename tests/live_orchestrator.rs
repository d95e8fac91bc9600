//! Real-time orchestrator tests on a paused tokio clock.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use rift::autopilot::Autopilot;
use rift::config::{MatchConfig, RulesConfig, TimerConfig};
use rift::draft::{DraftAction, DRAFT_SLOTS};
use rift::engine::{EndReason, Match, MatchKind, MatchStatus};
use rift::error::MatchError;
use rift::game::{Position, Roster, Side};
use rift::live::{spawn_match, MatchHandle, MatchUpdate, Matchmaker, MemoryRewardSink, Stage};
use tokio::sync::broadcast;

fn fresh(id: u64) -> Match {
    Match::new(
        id,
        MatchKind::Normal,
        [Roster::uniform(1, 1, 70), Roster::uniform(2, 6, 70)],
        id,
        RulesConfig::default(),
    )
    .unwrap()
}

/// Wait for the worker to enter `target`, skipping earlier updates.
async fn reach(updates: &mut broadcast::Receiver<MatchUpdate>, target: Stage) {
    loop {
        match updates.recv().await.unwrap() {
            MatchUpdate::Stage(stage) if stage == target => return,
            MatchUpdate::Stage(Stage::Finished) => panic!("finished before {target:?}"),
            _ => {}
        }
    }
}

async fn draft_by_hand(handle: &MatchHandle) {
    let mut pilot = Autopilot::new(1);
    for _ in 0..DRAFT_SLOTS {
        let snapshot = handle.snapshot().await.unwrap();
        let slot = snapshot.current_draft_slot().unwrap();
        let champion = pilot.draft_choice(snapshot.draft().unwrap(), slot.side).unwrap();
        match slot.action {
            DraftAction::Ban => handle.ban(slot.side, champion).await.unwrap(),
            DraftAction::Pick => handle.pick(slot.side, champion).await.unwrap(),
        };
    }
}

#[tokio::test(start_paused = true)]
async fn test_manual_draft_swap_and_turns() {
    let sink = Arc::new(MemoryRewardSink::new());
    let (handle, join) = spawn_match(fresh(1), TimerConfig::default(), sink.clone());
    let mut updates = handle.subscribe();

    draft_by_hand(&handle).await;
    reach(&mut updates, Stage::SwapWindow).await;

    let snapshot = handle.snapshot().await.unwrap();
    let team = snapshot.team(Side::Team1);
    let (top, mid) = (team.player_at(Position::Top).unwrap(), team.player_at(Position::Mid).unwrap());
    let pair = (top.id, mid.id);
    let expected = (top.champion.unwrap(), mid.champion.unwrap());
    handle.swap(Side::Team1, pair, expected).await.unwrap();
    assert!(matches!(
        handle.swap(Side::Team1, pair, (expected.1, expected.0)).await,
        Err(MatchError::SwapAlreadyUsed(..))
    ));

    // Swap window expires on its own.
    reach(&mut updates, Stage::Turn).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.status(), MatchStatus::InProgress);
    assert_eq!(snapshot.team(Side::Team1).player(pair.0).unwrap().champion, Some(expected.1));
    assert!(handle.swap(Side::Team1, pair, expected).await.is_err());

    // Both teams submit: the turn resolves without waiting for the timer.
    let started = tokio::time::Instant::now();
    let mut pilot = Autopilot::new(2);
    for side in Side::ALL {
        handle.submit(side, pilot.plan_turn(&snapshot, side)).await.unwrap();
    }
    let turn = loop {
        if let MatchUpdate::Turn(result) = updates.recv().await.unwrap() {
            break result;
        }
    };
    assert_eq!(turn.turn, 1);
    assert!(started.elapsed() < Duration::from_secs(1));
    reach(&mut updates, Stage::Intermission).await;

    // Nobody submits turn 2: intermission then the turn timer resolve it.
    let waited = tokio::time::Instant::now();
    let turn = loop {
        if let MatchUpdate::Turn(result) = updates.recv().await.unwrap() {
            break result;
        }
    };
    assert_eq!(turn.turn, 2);
    assert!(waited.elapsed() >= Duration::from_secs(75));

    handle.disconnect(Side::Team2).await.unwrap();
    let record = join.await.unwrap().unwrap();
    assert_eq!(record.reason, EndReason::Disconnect);
    assert_eq!(record.winner, 1);
    assert_eq!(sink.records(), vec![record]);
}

#[tokio::test(start_paused = true)]
async fn test_ready_toggle_and_submission_in_draft() {
    let sink = Arc::new(MemoryRewardSink::new());
    let (handle, _join) = spawn_match(fresh(2), TimerConfig::default(), sink);

    assert!(matches!(
        handle.submit(Side::Team1, Vec::new()).await,
        Err(MatchError::WrongStage(_) | MatchError::NotInProgress(_))
    ));
    assert!(handle.set_ready(Side::Team1, true).await.is_err());
    assert!(handle.surrender(Side::Team1).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_surrender_after_minimum_turn() {
    let sink = Arc::new(MemoryRewardSink::new());
    let timers = TimerConfig::default().scaled(0.01);
    let rules = RulesConfig {
        surrender_min_turn: 3,
        ..RulesConfig::default()
    };
    let game = Match::new(
        3,
        MatchKind::Normal,
        [Roster::uniform(1, 1, 70), Roster::uniform(2, 6, 70)],
        3,
        rules,
    )
    .unwrap();
    let (handle, join) = spawn_match(game, timers, sink.clone());
    let mut updates = handle.subscribe();

    // Draft and every turn run purely on timers.
    loop {
        match updates.recv().await.unwrap() {
            MatchUpdate::Turn(result) if result.turn + 1 >= rules.surrender_min_turn => break,
            MatchUpdate::Finished(_) => panic!("match ended before surrender"),
            _ => {}
        }
    }
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.turn(), rules.surrender_min_turn);
    let end = handle.surrender(Side::Team1).await.unwrap();
    assert_eq!(end.winner, Side::Team2);
    assert_eq!(end.reason, EndReason::Surrender);

    let record = join.await.unwrap().unwrap();
    assert_eq!(record.status, MatchStatus::Surrendered);
    assert_eq!(sink.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_matchmaker_pairs_into_running_match() {
    let sink = Arc::new(MemoryRewardSink::new());
    let config = MatchConfig::default();
    let (mm, _task) = Matchmaker::spawn(config, sink.clone(), 40);

    let first = mm.enqueue(Roster::uniform(7, 1, 70), MatchKind::Ranked).await.unwrap();
    let second = mm.enqueue(Roster::uniform(8, 6, 70), MatchKind::Ranked).await.unwrap();
    let (a, b) = (first.await.unwrap(), second.await.unwrap());
    assert_eq!((a.side, b.side), (Side::Team1, Side::Team2));

    let snapshot = a.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.kind(), MatchKind::Ranked);
    assert_eq!(snapshot.status(), MatchStatus::BanPick);

    b.handle.disconnect(Side::Team2).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].team_ids, [7, 8]);
    assert_eq!(records[0].winner, 7);
}
