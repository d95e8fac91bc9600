//! One task per live match.
//!
//! The worker exclusively owns its [`Match`]. Requests arrive on an `mpsc`
//! channel and are answered over `oneshot`; results go out on a `broadcast`
//! channel. Timer expiry runs the same code path as an explicit request.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::TimerConfig;
use crate::draft::DraftSlotResult;
use crate::engine::{GameEnd, Match, MatchId, MatchRecord, MatchStatus, TurnResult};
use crate::error::{MatchError, MatchResult};
use crate::game::{ChampionId, PlayerCommand, PlayerId, Side};
use crate::live::reward::RewardSink;
use crate::live::timer::{wait_until, PhaseTimer};

const REQUEST_BUFFER: usize = 64;
const UPDATE_BUFFER: usize = 128;

/// Where the worker is in the match lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Ban/pick slots, one timer per slot.
    Draft,
    /// Champion swaps before the game starts.
    SwapWindow,
    /// Waiting for both teams' submissions.
    Turn,
    /// Result display delay between turns.
    Intermission,
    /// Terminal; the record has been delivered.
    Finished,
}

/// Broadcast to every subscriber of a match.
#[derive(Debug, Clone)]
pub enum MatchUpdate {
    /// The worker moved to another stage.
    Stage(Stage),
    /// A draft slot resolved.
    DraftSlot(DraftSlotResult),
    /// Two players swapped champions.
    Swapped {
        /// Team.
        side: Side,
        /// First player.
        first: PlayerId,
        /// Second player.
        second: PlayerId,
    },
    /// A team changed its ready flag.
    Ready {
        /// Team.
        side: Side,
        /// New flag.
        ready: bool,
    },
    /// A turn resolved.
    Turn(Box<TurnResult>),
    /// The match is over.
    Finished(Box<MatchRecord>),
}

enum Request {
    Ban(Side, ChampionId, oneshot::Sender<MatchResult<DraftSlotResult>>),
    Pick(Side, ChampionId, oneshot::Sender<MatchResult<DraftSlotResult>>),
    Skip(Side, oneshot::Sender<MatchResult<DraftSlotResult>>),
    Swap {
        side: Side,
        players: (PlayerId, PlayerId),
        expected: (ChampionId, ChampionId),
        reply: oneshot::Sender<MatchResult<()>>,
    },
    Submit(Side, Vec<PlayerCommand>, oneshot::Sender<MatchResult<()>>),
    SetReady(Side, bool, oneshot::Sender<MatchResult<()>>),
    Surrender(Side, oneshot::Sender<MatchResult<GameEnd>>),
    Disconnect(Side, oneshot::Sender<MatchResult<GameEnd>>),
    Snapshot(oneshot::Sender<Box<Match>>),
}

/// Cloneable handle to a running match worker.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    id: MatchId,
    requests: mpsc::Sender<Request>,
    updates: broadcast::Sender<MatchUpdate>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ban(..) => "Ban",
            Self::Pick(..) => "Pick",
            Self::Skip(..) => "Skip",
            Self::Swap { .. } => "Swap",
            Self::Submit(..) => "Submit",
            Self::SetReady(..) => "SetReady",
            Self::Surrender(..) => "Surrender",
            Self::Disconnect(..) => "Disconnect",
            Self::Snapshot(..) => "Snapshot",
        };
        f.write_str(name)
    }
}

impl MatchHandle {
    /// Match id.
    #[must_use]
    pub const fn id(&self) -> MatchId {
        self.id
    }

    /// Receive every update published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MatchUpdate> {
        self.updates.subscribe()
    }

    async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> MatchResult<T> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(build(reply))
            .await
            .map_err(|_| MatchError::WorkerGone)?;
        response.await.map_err(|_| MatchError::WorkerGone)
    }

    /// Ban a champion.
    ///
    /// # Errors
    ///
    /// Returns the draft's rejection, or [`MatchError::WorkerGone`].
    pub async fn ban(&self, side: Side, champion: ChampionId) -> MatchResult<DraftSlotResult> {
        self.call(|reply| Request::Ban(side, champion, reply)).await?
    }

    /// Pick a champion.
    ///
    /// # Errors
    ///
    /// Returns the draft's rejection, or [`MatchError::WorkerGone`].
    pub async fn pick(&self, side: Side, champion: ChampionId) -> MatchResult<DraftSlotResult> {
        self.call(|reply| Request::Pick(side, champion, reply)).await?
    }

    /// Pass the current draft slot.
    ///
    /// # Errors
    ///
    /// Returns the draft's rejection, or [`MatchError::WorkerGone`].
    pub async fn skip(&self, side: Side) -> MatchResult<DraftSlotResult> {
        self.call(|reply| Request::Skip(side, reply)).await?
    }

    /// Swap two players' champions during the swap window.
    ///
    /// # Errors
    ///
    /// Returns the engine's rejection, or [`MatchError::WorkerGone`].
    pub async fn swap(
        &self,
        side: Side,
        players: (PlayerId, PlayerId),
        expected: (ChampionId, ChampionId),
    ) -> MatchResult<()> {
        self.call(|reply| Request::Swap {
            side,
            players,
            expected,
            reply,
        })
        .await?
    }

    /// Submit a team's commands for the current turn.
    ///
    /// # Errors
    ///
    /// Returns the validation error, or [`MatchError::WorkerGone`].
    pub async fn submit(&self, side: Side, commands: Vec<PlayerCommand>) -> MatchResult<()> {
        self.call(|reply| Request::Submit(side, commands, reply)).await?
    }

    /// Set a team's ready flag.
    ///
    /// # Errors
    ///
    /// Fails outside a game in progress, or with [`MatchError::WorkerGone`].
    pub async fn set_ready(&self, side: Side, ready: bool) -> MatchResult<()> {
        self.call(|reply| Request::SetReady(side, ready, reply)).await?
    }

    /// Surrender for `side`.
    ///
    /// # Errors
    ///
    /// Fails before the surrender turn, or with [`MatchError::WorkerGone`].
    pub async fn surrender(&self, side: Side) -> MatchResult<GameEnd> {
        self.call(|reply| Request::Surrender(side, reply)).await?
    }

    /// Report that `side` disconnected. The opponent wins immediately.
    ///
    /// # Errors
    ///
    /// Fails once the match is over, or with [`MatchError::WorkerGone`].
    pub async fn disconnect(&self, side: Side) -> MatchResult<GameEnd> {
        self.call(|reply| Request::Disconnect(side, reply)).await?
    }

    /// Clone of the authoritative match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::WorkerGone`] once the worker has stopped.
    pub async fn snapshot(&self) -> MatchResult<Match> {
        self.call(Request::Snapshot).await.map(|game| *game)
    }
}

/// Start a worker for `game`. The join handle yields the delivered record.
///
/// A match still waiting for its draft has the draft opened immediately.
pub fn spawn_match(
    game: Match,
    timers: TimerConfig,
    sink: Arc<dyn RewardSink>,
) -> (MatchHandle, JoinHandle<Option<MatchRecord>>) {
    let (requests_tx, requests) = mpsc::channel(REQUEST_BUFFER);
    let (updates, _) = broadcast::channel(UPDATE_BUFFER);
    let handle = MatchHandle {
        id: game.id(),
        requests: requests_tx,
        updates: updates.clone(),
    };
    let worker = Worker {
        game,
        timers,
        requests,
        inbox_open: true,
        updates,
        sink,
        stage: Stage::Draft,
        timer: PhaseTimer::new(),
        delivered: false,
    };
    (handle, tokio::spawn(worker.run()))
}

enum Wake {
    Request(Option<Request>),
    Timeout,
}

struct Worker {
    game: Match,
    timers: TimerConfig,
    requests: mpsc::Receiver<Request>,
    inbox_open: bool,
    updates: broadcast::Sender<MatchUpdate>,
    sink: Arc<dyn RewardSink>,
    stage: Stage,
    timer: PhaseTimer,
    delivered: bool,
}

impl Worker {
    async fn run(mut self) -> Option<MatchRecord> {
        info!(match_id = self.game.id(), "match worker started");
        self.enter_initial_stage();
        self.drive().await
    }

    async fn drive(mut self) -> Option<MatchRecord> {
        while self.stage != Stage::Finished {
            let deadline = self.timer.deadline();
            if deadline.is_none() && !self.inbox_open {
                warn!(match_id = self.game.id(), stage = ?self.stage, "no timer and no handles left; worker stops");
                break;
            }
            let wake = tokio::select! {
                request = self.requests.recv(), if self.inbox_open => Wake::Request(request),
                () = wait_until(deadline) => Wake::Timeout,
            };
            match wake {
                Wake::Request(Some(request)) => self.handle(request),
                Wake::Request(None) => {
                    debug!(match_id = self.game.id(), "all handles dropped; running on timers");
                    self.inbox_open = false;
                }
                Wake::Timeout => self.on_timeout(),
            }
        }

        self.deliver()
    }

    fn enter_initial_stage(&mut self) {
        match self.game.status() {
            MatchStatus::Waiting => {
                if self.game.begin_draft().is_ok() {
                    self.enter(Stage::Draft);
                }
            }
            MatchStatus::BanPick if self.game.draft_complete() => self.enter(Stage::SwapWindow),
            MatchStatus::BanPick => self.enter(Stage::Draft),
            MatchStatus::InProgress => self.enter(Stage::Turn),
            _ => self.enter(Stage::Finished),
        }
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        match stage {
            Stage::Draft => self.timer.arm(self.timers.draft_slot()),
            Stage::SwapWindow => self.timer.arm(self.timers.swap_window()),
            Stage::Turn => self.timer.arm(self.timers.turn()),
            Stage::Intermission => self.timer.arm(self.timers.result_delay()),
            Stage::Finished => self.timer.cancel(),
        }
        debug!(match_id = self.game.id(), ?stage, "stage entered");
        self.publish(MatchUpdate::Stage(stage));
    }

    fn publish(&self, update: MatchUpdate) {
        // No subscribers is fine.
        let _ = self.updates.send(update);
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Ban(side, champion, reply) => {
                let result = self.game.draft_ban(side, champion);
                let _ = reply.send(self.after_slot(result));
            }
            Request::Pick(side, champion, reply) => {
                let result = self.game.draft_pick(side, champion);
                let _ = reply.send(self.after_slot(result));
            }
            Request::Skip(side, reply) => {
                let result = self.game.draft_skip(side);
                let _ = reply.send(self.after_slot(result));
            }
            Request::Swap {
                side,
                players,
                expected,
                reply,
            } => {
                let result = if self.stage == Stage::SwapWindow {
                    self.game
                        .request_swap(side, players.0, players.1, expected.0, expected.1)
                } else if self.stage == Stage::Draft {
                    Err(MatchError::DraftIncomplete)
                } else {
                    Err(MatchError::WrongStage("swap window closed"))
                };
                if result.is_ok() {
                    self.publish(MatchUpdate::Swapped {
                        side,
                        first: players.0,
                        second: players.1,
                    });
                }
                let _ = reply.send(result);
            }
            Request::Submit(side, commands, reply) => {
                let result = self.game.submit_actions(side, commands);
                let ok = result.is_ok();
                let _ = reply.send(result);
                if ok {
                    self.publish(MatchUpdate::Ready { side, ready: true });
                    self.resolve_if_ready();
                }
            }
            Request::SetReady(side, ready, reply) => {
                let result = self.game.set_ready(side, ready);
                let ok = result.is_ok();
                let _ = reply.send(result);
                if ok {
                    self.publish(MatchUpdate::Ready { side, ready });
                    self.resolve_if_ready();
                }
            }
            Request::Surrender(side, reply) => {
                let result = self.game.surrender(side);
                let ended = result.is_ok();
                let _ = reply.send(result);
                if ended {
                    info!(match_id = self.game.id(), ?side, "team surrendered");
                    self.enter(Stage::Finished);
                }
            }
            Request::Disconnect(side, reply) => {
                let result = self.game.disconnect(side);
                let ended = result.is_ok();
                let _ = reply.send(result);
                if ended {
                    warn!(match_id = self.game.id(), ?side, "team disconnected; forfeit");
                    self.enter(Stage::Finished);
                }
            }
            Request::Snapshot(reply) => {
                let _ = reply.send(Box::new(self.game.clone()));
            }
        }
    }

    fn after_slot(&mut self, result: MatchResult<DraftSlotResult>) -> MatchResult<DraftSlotResult> {
        let slot = result?;
        self.publish(MatchUpdate::DraftSlot(slot.clone()));
        if slot.is_complete() {
            self.enter(Stage::SwapWindow);
        } else {
            self.timer.arm(self.timers.draft_slot());
        }
        Ok(slot)
    }

    fn resolve_if_ready(&mut self) {
        if self.stage == Stage::Turn && self.game.both_ready() {
            self.resolve_turn();
        }
    }

    fn on_timeout(&mut self) {
        match self.stage {
            Stage::Draft => {
                debug!(match_id = self.game.id(), "draft slot timed out");
                let result = self.game.draft_timeout();
                if let Err(err) = self.after_slot(result) {
                    error!(match_id = self.game.id(), %err, "draft timeout rejected; abandoning match");
                    self.enter(Stage::Finished);
                }
            }
            Stage::SwapWindow => match self.game.start_game() {
                Ok(()) => self.enter(Stage::Turn),
                Err(err) => {
                    error!(match_id = self.game.id(), %err, "game failed to start; abandoning match");
                    self.enter(Stage::Finished);
                }
            },
            Stage::Turn => {
                debug!(match_id = self.game.id(), turn = self.game.turn(), "turn timed out");
                self.resolve_turn();
            }
            Stage::Intermission => {
                self.enter(Stage::Turn);
                self.resolve_if_ready();
            }
            Stage::Finished => self.timer.cancel(),
        }
    }

    fn resolve_turn(&mut self) {
        match self.game.process_turn() {
            Ok(result) => {
                let ended = result.game_end.is_some();
                self.publish(MatchUpdate::Turn(Box::new(result)));
                if ended {
                    self.enter(Stage::Finished);
                } else {
                    self.enter(Stage::Intermission);
                }
            }
            Err(err) => {
                warn!(match_id = self.game.id(), %err, "turn not resolved");
                if self.game.status().is_terminal() {
                    self.enter(Stage::Finished);
                }
            }
        }
    }

    fn deliver(&mut self) -> Option<MatchRecord> {
        if self.delivered {
            return None;
        }
        let record = self.game.record()?;
        self.delivered = true;
        info!(
            match_id = record.match_id,
            winner = record.winner,
            turns = record.final_turn,
            "delivering match record"
        );
        self.sink.deliver(record.clone());
        self.publish(MatchUpdate::Finished(Box::new(record.clone())));
        Some(record)
    }
}
