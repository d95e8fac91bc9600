//! Error types for match operations.
//!
//! Every variant of [`MatchError`] describes a rejected request: the state
//! that produced it is left untouched. Internal invariant violations are not
//! represented here; see [`crate::game::assert_invariants`].

use std::fmt;

use crate::draft::DraftAction;
use crate::engine::MatchStatus;
use crate::game::{ChampionId, ItemId, PlayerId, Position, Side};

/// A request the engine refused to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    /// The request needs a match that is in progress.
    NotInProgress(MatchStatus),
    /// The match already reached a terminal status.
    MatchOver(MatchStatus),
    /// The request is not valid in the current stage of the match.
    WrongStage(&'static str),
    /// The player id does not belong to the requesting team.
    UnknownPlayer(PlayerId),
    /// The same player appears twice in one submission.
    DuplicateCommand(PlayerId),
    /// It is the other team's draft slot.
    NotYourSlot {
        /// Team that owns the current slot.
        expected: Side,
    },
    /// The request type does not match the current draft slot.
    SlotMismatch {
        /// Action the current slot expects.
        expected: DraftAction,
    },
    /// The champion id is not in the catalog.
    UnknownChampion(ChampionId),
    /// The champion has already been banned or picked.
    ChampionUnavailable(ChampionId),
    /// All twenty draft slots have been resolved.
    DraftComplete,
    /// The draft has not finished yet.
    DraftIncomplete,
    /// The expected champion ids of a swap do not match the assignment.
    SwapMismatch {
        /// Player whose champion did not match.
        player: PlayerId,
        /// Champion the server has assigned.
        actual: Option<ChampionId>,
    },
    /// The pair already used its one swap.
    SwapAlreadyUsed(PlayerId, PlayerId),
    /// A swap needs two distinct players.
    SwapSamePlayer(PlayerId),
    /// The item id is not in the catalog.
    UnknownItem(ItemId),
    /// The item is reserved for another position.
    ItemRestricted {
        /// Item requested.
        item: ItemId,
        /// Position the item is limited to.
        position: Position,
    },
    /// The player does not own the item being sold.
    ItemNotOwned(ItemId),
    /// Not enough gold for the purchase.
    InsufficientGold {
        /// Gold the purchase costs.
        need: u32,
        /// Gold available.
        have: u32,
    },
    /// The six-slot inventory is full.
    InventoryFull,
    /// Surrender is only allowed from a minimum turn onwards.
    SurrenderTooEarly {
        /// Current turn.
        turn: u32,
        /// First turn a surrender is accepted.
        min_turn: u32,
    },
    /// The roster snapshot cannot seed a match.
    InvalidRoster(String),
    /// The match worker is no longer running.
    WorkerGone,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInProgress(status) => write!(f, "match is not in progress ({status:?})"),
            Self::MatchOver(status) => write!(f, "match is already over ({status:?})"),
            Self::WrongStage(what) => write!(f, "not allowed at this stage: {what}"),
            Self::UnknownPlayer(id) => write!(f, "player {id} is not on this team"),
            Self::DuplicateCommand(id) => write!(f, "player {id} submitted more than once"),
            Self::NotYourSlot { expected } => write!(f, "draft slot belongs to {expected:?}"),
            Self::SlotMismatch { expected } => write!(f, "draft slot expects a {expected:?}"),
            Self::UnknownChampion(id) => write!(f, "unknown champion {id}"),
            Self::ChampionUnavailable(id) => write!(f, "champion {id} is already banned or picked"),
            Self::DraftComplete => write!(f, "draft is already complete"),
            Self::DraftIncomplete => write!(f, "draft is not complete"),
            Self::SwapMismatch { player, actual } => {
                write!(f, "player {player} has champion {actual:?}, not the expected one")
            }
            Self::SwapAlreadyUsed(a, b) => write!(f, "players {a} and {b} already swapped"),
            Self::SwapSamePlayer(id) => write!(f, "player {id} cannot swap with themselves"),
            Self::UnknownItem(id) => write!(f, "unknown item {id}"),
            Self::ItemRestricted { item, position } => {
                write!(f, "item {item} is restricted to {position:?}")
            }
            Self::ItemNotOwned(id) => write!(f, "item {id} is not in the inventory"),
            Self::InsufficientGold { need, have } => {
                write!(f, "not enough gold: need {need}, have {have}")
            }
            Self::InventoryFull => write!(f, "inventory is full"),
            Self::SurrenderTooEarly { turn, min_turn } => {
                write!(f, "cannot surrender on turn {turn} (allowed from turn {min_turn})")
            }
            Self::InvalidRoster(reason) => write!(f, "invalid roster: {reason}"),
            Self::WorkerGone => write!(f, "match worker has stopped"),
        }
    }
}

impl std::error::Error for MatchError {}

/// Result type for match requests.
pub type MatchResult<T> = Result<T, MatchError>;
