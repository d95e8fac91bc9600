//! Matchmaking queue actor.
//!
//! A single task owns the per-kind FIFO queues. Teams enqueue and receive a
//! oneshot that resolves once they are paired; pairing creates a [`Match`]
//! and spawns its worker.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::MatchConfig;
use crate::engine::{Match, MatchId, MatchKind};
use crate::error::{MatchError, MatchResult};
use crate::game::{Roster, Side, TeamId};
use crate::live::reward::RewardSink;
use crate::live::worker::{spawn_match, MatchHandle};

/// Where a queued team ended up.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Handle to the new match.
    pub handle: MatchHandle,
    /// Side the team plays on.
    pub side: Side,
}

/// Pending pairing for one queued team.
pub type Ticket = oneshot::Receiver<Assignment>;

struct Waiting {
    roster: Roster,
    notify: oneshot::Sender<Assignment>,
}

enum QueueRequest {
    Enqueue(Roster, MatchKind, oneshot::Sender<MatchResult<Ticket>>),
    Cancel(TeamId, oneshot::Sender<bool>),
    Len(MatchKind, oneshot::Sender<usize>),
}

/// Cloneable handle to the matchmaker task.
#[derive(Debug, Clone)]
pub struct Matchmaker {
    requests: mpsc::Sender<QueueRequest>,
}

impl std::fmt::Debug for QueueRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enqueue(roster, kind, _) => write!(f, "Enqueue({}, {kind:?})", roster.team_id),
            Self::Cancel(team, _) => write!(f, "Cancel({team})"),
            Self::Len(kind, _) => write!(f, "Len({kind:?})"),
        }
    }
}

impl Matchmaker {
    /// Start the matchmaker. Match `n` is seeded with `seed + n`.
    #[must_use]
    pub fn spawn(config: MatchConfig, sink: Arc<dyn RewardSink>, seed: u64) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(64);
        let actor = QueueActor {
            config,
            sink,
            seed,
            next_id: 1,
            ranked: VecDeque::new(),
            normal: VecDeque::new(),
            requests: rx,
        };
        (Self { requests: tx }, tokio::spawn(actor.run()))
    }

    /// Queue `roster` for a `kind` match.
    ///
    /// # Errors
    ///
    /// Rejects malformed rosters and teams already queued.
    pub async fn enqueue(&self, roster: Roster, kind: MatchKind) -> MatchResult<Ticket> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(QueueRequest::Enqueue(roster, kind, reply))
            .await
            .map_err(|_| MatchError::WorkerGone)?;
        response.await.map_err(|_| MatchError::WorkerGone)?
    }

    /// Remove `team` from whichever queue holds it. Returns whether it was queued.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::WorkerGone`] when the matchmaker stopped.
    pub async fn cancel(&self, team: TeamId) -> MatchResult<bool> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(QueueRequest::Cancel(team, reply))
            .await
            .map_err(|_| MatchError::WorkerGone)?;
        response.await.map_err(|_| MatchError::WorkerGone)
    }

    /// Number of teams waiting for a `kind` match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::WorkerGone`] when the matchmaker stopped.
    pub async fn queue_len(&self, kind: MatchKind) -> MatchResult<usize> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(QueueRequest::Len(kind, reply))
            .await
            .map_err(|_| MatchError::WorkerGone)?;
        response.await.map_err(|_| MatchError::WorkerGone)
    }
}

struct QueueActor {
    config: MatchConfig,
    sink: Arc<dyn RewardSink>,
    seed: u64,
    next_id: MatchId,
    ranked: VecDeque<Waiting>,
    normal: VecDeque<Waiting>,
    requests: mpsc::Receiver<QueueRequest>,
}

impl QueueActor {
    async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            match request {
                QueueRequest::Enqueue(roster, kind, reply) => {
                    let _ = reply.send(self.enqueue(roster, kind));
                }
                QueueRequest::Cancel(team, reply) => {
                    let _ = reply.send(self.cancel(team));
                }
                QueueRequest::Len(kind, reply) => {
                    self.prune(kind);
                    let _ = reply.send(self.queue(kind).len());
                }
            }
        }
        debug!("matchmaker stopped");
    }

    fn queue(&mut self, kind: MatchKind) -> &mut VecDeque<Waiting> {
        match kind {
            MatchKind::Ranked => &mut self.ranked,
            MatchKind::Normal => &mut self.normal,
        }
    }

    /// Drop teams whose ticket was abandoned.
    fn prune(&mut self, kind: MatchKind) {
        self.queue(kind).retain(|w| !w.notify.is_closed());
    }

    fn enqueue(&mut self, roster: Roster, kind: MatchKind) -> MatchResult<Ticket> {
        roster.validate().map_err(MatchError::InvalidRoster)?;
        let queued = self
            .ranked
            .iter()
            .chain(self.normal.iter())
            .any(|w| w.roster.team_id == roster.team_id && !w.notify.is_closed());
        if queued {
            return Err(MatchError::InvalidRoster(format!("team {} is already queued", roster.team_id)));
        }

        self.prune(kind);
        let (notify, ticket) = oneshot::channel();
        let Some(opponent) = self.queue(kind).pop_front() else {
            debug!(team_id = roster.team_id, ?kind, "team queued");
            self.queue(kind).push_back(Waiting { roster, notify });
            return Ok(ticket);
        };

        let id = self.next_id;
        let game = match Match::new(
            id,
            kind,
            [opponent.roster.clone(), roster.clone()],
            self.seed.wrapping_add(id),
            self.config.rules,
        ) {
            Ok(game) => game,
            Err(err) => {
                warn!(%err, "pairing rejected; opponent stays queued");
                self.queue(kind).push_front(opponent);
                return Err(err);
            }
        };
        self.next_id += 1;

        let (handle, _) = spawn_match(game, self.config.timers, Arc::clone(&self.sink));
        info!(
            match_id = id,
            team1 = opponent.roster.team_id,
            team2 = roster.team_id,
            ?kind,
            "match created"
        );
        let _ = opponent.notify.send(Assignment {
            handle: handle.clone(),
            side: Side::Team1,
        });
        let _ = notify.send(Assignment {
            handle,
            side: Side::Team2,
        });
        Ok(ticket)
    }

    fn cancel(&mut self, team: TeamId) -> bool {
        let mut removed = false;
        for queue in [&mut self.ranked, &mut self.normal] {
            let before = queue.len();
            queue.retain(|w| w.roster.team_id != team);
            removed |= queue.len() != before;
        }
        removed
    }
}
