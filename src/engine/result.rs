//! Turn output and end-of-match records.

use serde::{Deserialize, Serialize};

use crate::combat::{ContestReport, LaneReport};
use crate::engine::{MatchId, MatchKind, MatchStatus};
use crate::game::{ChampionId, ItemId, PlayerId, Position, Side, TeamId, TeamState};
use crate::objective::ObjectiveSpawn;

/// Sub-phase of a turn, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Draft and pre-game events.
    Setup,
    /// Team buffs and timed effects expire.
    BuffExpiry,
    /// Per-turn gold.
    Gold,
    /// Purchases and sales.
    Shop,
    /// Dead players return.
    Respawn,
    /// Stacking items grow.
    Stacking,
    /// Lane fights.
    Lanes,
    /// Jungle farming.
    Jungle,
    /// Unopposed structure damage.
    Siege,
    /// Recalls heal.
    Recall,
    /// Levels go up.
    LevelUp,
    /// Champion abilities.
    Abilities,
    /// Cooldowns tick.
    Cooldowns,
    /// Aura heals.
    Sustain,
    /// Objective spawn and fight.
    Objective,
    /// Nexus check.
    Victory,
    /// Surrender and disconnect.
    Forfeit,
}

/// One line of the match log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Turn the event happened on.
    pub turn: u32,
    /// Phase that produced it.
    pub phase: Phase,
    /// Human-readable description.
    pub message: String,
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A nexus fell.
    NexusDestroyed,
    /// A team surrendered.
    Surrender,
    /// A team disconnected.
    Disconnect,
}

/// Terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnd {
    /// Winning side.
    pub winner: Side,
    /// Why the match ended.
    pub reason: EndReason,
    /// Turn the match ended on.
    pub turn: u32,
}

/// Objective activity on a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveResult {
    /// What spawned.
    pub spawn: ObjectiveSpawn,
    /// One report per objective, in resolution order.
    pub contests: Vec<ContestReport>,
}

/// Everything a resolved turn produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Turn resolved.
    pub turn: u32,
    /// Events in phase order.
    pub events: Vec<GameEvent>,
    /// Both teams after the turn.
    pub teams: [TeamState; 2],
    /// Lane fights, TOP, MID, BOT order, skipping empty lanes.
    pub lanes: Vec<LaneReport>,
    /// Structure damage from sieges per side.
    pub siege_damage: [f64; 2],
    /// Objective fight, if one spawned.
    pub objective: Option<ObjectiveResult>,
    /// Set when the turn ended the match.
    pub game_end: Option<GameEnd>,
}

/// Items one player bought during the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUsage {
    /// Player.
    pub player_id: PlayerId,
    /// Team the player was on.
    pub team_id: TeamId,
    /// Position played.
    pub position: Position,
    /// Champion played.
    pub champion: Option<ChampionId>,
    /// Inventory at the end.
    pub final_items: Vec<ItemId>,
    /// Every purchase in order.
    pub purchases: Vec<ItemId>,
    /// Kills.
    pub kills: u32,
    /// Deaths.
    pub deaths: u32,
    /// Assists.
    pub assists: u32,
}

/// What the reward collaborator receives once a match is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Match id.
    pub match_id: MatchId,
    /// Ranked or normal.
    pub kind: MatchKind,
    /// Team ids, team 1 first.
    pub team_ids: [TeamId; 2],
    /// Winning team id.
    pub winner: TeamId,
    /// Winning side.
    pub winner_side: Side,
    /// Terminal status.
    pub status: MatchStatus,
    /// Why the match ended.
    pub reason: EndReason,
    /// Last turn played.
    pub final_turn: u32,
    /// Full event log.
    pub events: Vec<GameEvent>,
    /// Per-player item usage.
    pub item_usage: Vec<ItemUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert!(Phase::BuffExpiry < Phase::Gold);
        assert!(Phase::Shop < Phase::Respawn);
        assert!(Phase::Lanes < Phase::Jungle);
        assert!(Phase::Siege < Phase::Recall);
        assert!(Phase::Abilities < Phase::Cooldowns);
        assert!(Phase::Objective < Phase::Victory);
    }
}
