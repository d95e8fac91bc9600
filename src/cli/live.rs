//! Live command: queue generated teams and let autopilot clients play them
//! through the real-time orchestrator.

use super::{load_config, seed_or_clock, CliError};
use rift::autopilot::Autopilot;
use rift::config::MatchConfig;
use rift::engine::{Match, MatchKind, MatchRecord, MatchStatus};
use rift::error::MatchResult;
use rift::game::Side;
use rift::live::{Assignment, MatchHandle, MatchUpdate, Matchmaker, MemoryRewardSink, RewardSink, Stage};
use rift::tournament::generate_roster;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Execute the live command.
///
/// # Errors
///
/// Returns an error if the runtime cannot start or a team cannot be queued.
pub(crate) fn execute(
    teams: u32,
    seed: Option<u64>,
    speed: f64,
    max_turns: Option<u32>,
    ranked: bool,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    if teams < 2 || teams % 2 != 0 {
        return Err(CliError::new(format!("--teams must be an even number of at least 2, got {teams}")));
    }
    if speed.is_nan() || speed <= 0.0 {
        return Err(CliError::new("--speed must be positive"));
    }
    let seed = seed_or_clock(seed);
    let mut config = load_config(config.as_deref())?;
    config.timers = config.timers.scaled(speed);
    let surrender_after = max_turns.unwrap_or(config.max_turns);
    let kind = if ranked { MatchKind::Ranked } else { MatchKind::Normal };

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let records = runtime.block_on(play_all(config, teams, seed, kind, surrender_after))?;

    println!("{} matches finished", records.len());
    for record in &records {
        println!(
            "  match {}: team {} beat team {} ({:?}, {:?}, turn {})",
            record.match_id,
            record.winner,
            record.team_ids.iter().find(|&&t| t != record.winner).copied().unwrap_or_default(),
            record.status,
            record.reason,
            record.final_turn,
        );
    }
    Ok(())
}

/// Queue `teams` generated rosters, play every match to the end and return
/// the records the reward sink received, ordered by match id.
async fn play_all(
    config: MatchConfig,
    teams: u32,
    seed: u64,
    kind: MatchKind,
    surrender_after: u32,
) -> Result<Vec<MatchRecord>, CliError> {
    let sink = Arc::new(MemoryRewardSink::new());
    let shared: Arc<dyn RewardSink> = sink.clone();
    let (matchmaker, _queue) = Matchmaker::spawn(config, shared, seed);

    let mut clients = JoinSet::new();
    let mut tickets = Vec::new();
    for team in 1..=teams {
        let roster = generate_roster(u64::from(team), (team - 1) * 5 + 1, seed.wrapping_add(u64::from(team)));
        tickets.push(matchmaker.enqueue(roster, kind).await?);
    }
    for (i, ticket) in tickets.into_iter().enumerate() {
        let assignment = ticket
            .await
            .map_err(|_| CliError::new("matchmaker dropped a queued team"))?;
        let pilot_seed = seed ^ (u64::try_from(i).unwrap_or(0) + 1).rotate_left(32);
        clients.spawn(play_side(assignment, pilot_seed, surrender_after));
    }

    while let Some(joined) = clients.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(%err, "client stopped early"),
            Err(err) => warn!(%err, "client task failed"),
        }
    }

    let mut records = sink.records();
    records.sort_by_key(|r| r.match_id);
    Ok(records)
}

/// One team's client: answers draft slots and turns from the autopilot.
async fn play_side(assignment: Assignment, seed: u64, surrender_after: u32) -> MatchResult<()> {
    let Assignment { handle, side } = assignment;
    let mut updates = handle.subscribe();
    let mut pilot = Autopilot::new(seed);

    // Anything published before the subscription is caught up from a snapshot.
    let snapshot = handle.snapshot().await?;
    act(&handle, &mut pilot, &snapshot, side, surrender_after).await?;

    loop {
        match updates.recv().await {
            Ok(MatchUpdate::DraftSlot(slot)) => {
                if slot.next.is_some_and(|next| next.side == side) {
                    let snapshot = handle.snapshot().await?;
                    act(&handle, &mut pilot, &snapshot, side, surrender_after).await?;
                }
            }
            Ok(MatchUpdate::Stage(Stage::Turn)) => {
                let snapshot = handle.snapshot().await?;
                act(&handle, &mut pilot, &snapshot, side, surrender_after).await?;
            }
            Ok(MatchUpdate::Turn(result)) => {
                debug!(match_id = handle.id(), ?side, turn = result.turn, events = result.events.len(), "turn resolved");
            }
            Ok(MatchUpdate::Finished(record)) => {
                info!(match_id = handle.id(), ?side, won = record.winner_side == side, "match finished");
                return Ok(());
            }
            Ok(_) => {}
            Err(RecvError::Lagged(missed)) => {
                warn!(match_id = handle.id(), ?side, missed, "client lagged; resyncing");
                let snapshot = handle.snapshot().await?;
                if snapshot.status().is_terminal() {
                    return Ok(());
                }
                act(&handle, &mut pilot, &snapshot, side, surrender_after).await?;
            }
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}

/// React to the state in `snapshot`. Rejections from a race with a timer
/// are logged and skipped.
async fn act(
    handle: &MatchHandle,
    pilot: &mut Autopilot,
    snapshot: &Match,
    side: Side,
    surrender_after: u32,
) -> MatchResult<()> {
    match snapshot.status() {
        MatchStatus::BanPick => {
            let Some(slot) = snapshot.current_draft_slot().filter(|s| s.side == side) else {
                return Ok(());
            };
            let choice = snapshot.draft().and_then(|d| pilot.draft_choice(d, side));
            let result = match (choice, slot.action) {
                (Some(champion), rift::draft::DraftAction::Ban) => handle.ban(side, champion).await,
                (Some(champion), rift::draft::DraftAction::Pick) => handle.pick(side, champion).await,
                (None, _) => handle.skip(side).await,
            };
            if let Err(err) = result {
                debug!(match_id = handle.id(), ?side, %err, "draft choice rejected");
            }
        }
        MatchStatus::InProgress if snapshot.turn() > surrender_after && side == Side::Team1 => {
            if let Err(err) = handle.surrender(side).await {
                warn!(match_id = handle.id(), %err, "surrender rejected");
            }
        }
        MatchStatus::InProgress if !snapshot.is_ready(side) => {
            let plan = pilot.plan_turn(snapshot, side);
            if let Err(err) = handle.submit(side, plan).await {
                debug!(match_id = handle.id(), ?side, %err, "submission rejected");
            }
        }
        _ => {}
    }
    Ok(())
}
