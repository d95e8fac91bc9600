//! Per-turn player actions and submissions.

use serde::{Deserialize, Serialize};

use crate::game::items::ItemId;
use crate::game::player::{Lane, PlayerId};

/// What a player does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fight in the home lane.
    #[default]
    Fight,
    /// Hold the home lane: less damage taken, no structure hits.
    Defend,
    /// Farm the jungle.
    Farm,
    /// Go back to base and heal fully.
    Recall,
    /// Join another lane's fight.
    Gank(Lane),
    /// Contest the dragon.
    ContestDragon,
    /// Contest the voidgrubs.
    ContestVoidgrub,
    /// Contest baron.
    ContestBaron,
    /// Contest the elder dragon.
    ContestElder,
}

impl PlayerAction {
    /// Whether the action contests an objective.
    #[must_use]
    pub const fn is_contest(self) -> bool {
        matches!(
            self,
            Self::ContestDragon | Self::ContestVoidgrub | Self::ContestBaron | Self::ContestElder
        )
    }
}

/// One player's submission for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCommand {
    /// Player the command is for.
    pub player_id: PlayerId,
    /// Main action.
    pub action: PlayerAction,
    /// Item to buy in the shop phase.
    #[serde(default)]
    pub buy_item: Option<ItemId>,
    /// Item to sell in the shop phase.
    #[serde(default)]
    pub sell_item: Option<ItemId>,
    /// Lane to ward against enemy ganks.
    #[serde(default)]
    pub ward_lane: Option<Lane>,
    /// Whether to use the champion ability.
    #[serde(default)]
    pub use_ability: bool,
    /// Target for a targeted ability.
    #[serde(default)]
    pub ability_target: Option<PlayerId>,
}

impl PlayerCommand {
    /// Command with only an action.
    #[must_use]
    pub const fn new(player_id: PlayerId, action: PlayerAction) -> Self {
        Self {
            player_id,
            action,
            buy_item: None,
            sell_item: None,
            ward_lane: None,
            use_ability: false,
            ability_target: None,
        }
    }

    /// Default command used when a player submitted nothing.
    #[must_use]
    pub const fn fallback(player_id: PlayerId) -> Self {
        Self::new(player_id, PlayerAction::Fight)
    }

    /// Buy an item.
    #[must_use]
    pub const fn buy(mut self, item: ItemId) -> Self {
        self.buy_item = Some(item);
        self
    }

    /// Sell an item.
    #[must_use]
    pub const fn sell(mut self, item: ItemId) -> Self {
        self.sell_item = Some(item);
        self
    }

    /// Ward a lane.
    #[must_use]
    pub const fn ward(mut self, lane: Lane) -> Self {
        self.ward_lane = Some(lane);
        self
    }

    /// Use the ability, optionally on a target.
    #[must_use]
    pub const fn cast(mut self, target: Option<PlayerId>) -> Self {
        self.use_ability = true;
        self.ability_target = target;
        self
    }
}
