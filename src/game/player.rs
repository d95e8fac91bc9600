//! Player state management.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::game::items::ItemId;
use crate::game::stats::{base_stats, StatBundle};
use crate::game::team::RosterPlayer;

/// Unique identifier for a player.
pub type PlayerId = u32;

/// Identifier of a champion in the champion table.
pub type ChampionId = u8;

/// Highest reachable level.
pub const MAX_LEVEL: u8 = 18;

/// Number of recent damage sources remembered for assists.
pub const DAMAGE_SOURCE_CAPACITY: usize = 3;

/// Roster position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    /// Top laner.
    Top,
    /// Jungler; has no home lane.
    Jungle,
    /// Mid laner.
    Mid,
    /// Bottom carry.
    Adc,
    /// Bottom support.
    Support,
}

impl Position {
    /// Positions in draft assignment order.
    pub const ALL: [Self; 5] = [Self::Top, Self::Jungle, Self::Mid, Self::Adc, Self::Support];

    /// Lane this position fights in by default.
    #[must_use]
    pub const fn home_lane(self) -> Option<Lane> {
        match self {
            Self::Top => Some(Lane::Top),
            Self::Jungle => None,
            Self::Mid => Some(Lane::Mid),
            Self::Adc | Self::Support => Some(Lane::Bot),
        }
    }
}

/// One of the three lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    /// Top lane.
    Top,
    /// Mid lane.
    Mid,
    /// Bottom lane.
    Bot,
}

impl Lane {
    /// Lanes in resolution order.
    pub const ALL: [Self; 3] = [Self::Top, Self::Mid, Self::Bot];

    /// Index into per-lane arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Mid => 1,
            Self::Bot => 2,
        }
    }
}

/// Crowd-control and displacement effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Cannot act.
    Stun,
    /// Cannot gank or contest objectives.
    Root,
    /// Cannot cast.
    Silence,
    /// Cannot act; breaks on damage.
    Sleep,
    /// Sent back to base; cannot act.
    Displaced,
}

/// A status effect with the last turn it applies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Effect.
    pub kind: StatusKind,
    /// Last turn the effect holds.
    pub until_turn: u32,
}

/// Temporary stat change, positive or negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedBuff {
    /// Source shown in events.
    pub label: String,
    /// Stats added while active.
    pub stats: StatBundle,
    /// Last turn the buff holds.
    pub until_turn: u32,
}

/// Champion ability bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityState {
    /// Turns until the ability is ready.
    pub cooldown: u32,
    /// Ability level, 0 to 3.
    pub level: u8,
    /// Set once a one-time ability fires.
    pub used: bool,
}

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Unique identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Roster slot, 0 to 4.
    pub slot: u8,
    /// Assigned position.
    pub position: Position,
    /// Champion, once the draft assigned one.
    pub champion: Option<ChampionId>,
    /// Overall rating the base stats come from.
    pub overall: u8,
    /// Stats before items and effects.
    pub base: StatBundle,
    /// Derived stats; rebuilt by `recompute_stats`.
    pub stats: StatBundle,
    /// Current health.
    pub health: f64,
    /// Gold on hand.
    pub gold: u32,
    /// Owned non-consumable items.
    pub items: Vec<ItemId>,
    /// Stack counts for stacking items.
    pub item_stacks: BTreeMap<ItemId, u32>,
    /// Level, 1 to 18.
    pub level: u8,
    /// Kills.
    pub kills: u32,
    /// Deaths.
    pub deaths: u32,
    /// Assists.
    pub assists: u32,
    /// Whether the player is dead.
    pub dead: bool,
    /// Turn the player respawns on.
    pub respawn_turn: Option<u32>,
    /// Whether the player recalled this turn.
    pub recalling: bool,
    /// Most recent enemies that damaged this player, oldest first.
    pub damage_sources: VecDeque<PlayerId>,
    /// Ability state.
    pub ability: AbilityState,
    /// Damage absorbed before health.
    pub shield: f64,
    /// Last turn the shield holds.
    pub shield_until: u32,
    /// Active status effects.
    pub statuses: Vec<StatusEffect>,
    /// Active timed buffs and shreds.
    pub buffs: Vec<TimedBuff>,
    /// Stats gained permanently from abilities and leveling.
    pub permanent_bonus: StatBundle,
    /// Jungle farms completed.
    pub farm_stacks: u32,
    /// Health fraction restored on the next death.
    pub revive: Option<f64>,
    /// Every item bought, in order, consumables included.
    pub purchases: Vec<ItemId>,
}

impl PlayerState {
    /// Create a player from a roster entry.
    #[must_use]
    pub fn new(roster: &RosterPlayer, slot: u8, starting_gold: u32) -> Self {
        let base = base_stats(roster.overall, roster.position);
        Self {
            id: roster.player_id,
            name: roster.name.clone(),
            slot,
            position: roster.position,
            champion: None,
            overall: roster.overall,
            base,
            stats: base,
            health: base.max_health,
            gold: starting_gold,
            items: Vec::new(),
            item_stacks: BTreeMap::new(),
            level: 1,
            kills: 0,
            deaths: 0,
            assists: 0,
            dead: false,
            respawn_turn: None,
            recalling: false,
            damage_sources: VecDeque::with_capacity(DAMAGE_SOURCE_CAPACITY),
            ability: AbilityState::default(),
            shield: 0.0,
            shield_until: 0,
            statuses: Vec::new(),
            buffs: Vec::new(),
            permanent_bonus: StatBundle::ZERO,
            farm_stacks: 0,
            revive: None,
            purchases: Vec::new(),
        }
    }

    /// Whether the player is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Current health as a fraction of max health.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        if self.stats.max_health > 0.0 {
            self.health / self.stats.max_health
        } else {
            0.0
        }
    }

    /// Whether a status effect of `kind` is active.
    #[must_use]
    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.iter().any(|s| s.kind == kind)
    }

    /// Alive and not stunned, asleep or displaced.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.is_alive()
            && !self.has_status(StatusKind::Stun)
            && !self.has_status(StatusKind::Sleep)
            && !self.has_status(StatusKind::Displaced)
    }

    /// Can leave the home lane: gank or contest objectives.
    #[must_use]
    pub fn can_roam(&self) -> bool {
        self.can_act() && !self.has_status(StatusKind::Root)
    }

    /// Can use the champion ability.
    #[must_use]
    pub fn can_cast(&self) -> bool {
        self.can_act() && !self.has_status(StatusKind::Silence)
    }

    /// Apply a status effect, extending an existing one of the same kind.
    pub fn apply_status(&mut self, kind: StatusKind, until_turn: u32) {
        if let Some(existing) = self.statuses.iter_mut().find(|s| s.kind == kind) {
            existing.until_turn = existing.until_turn.max(until_turn);
        } else {
            self.statuses.push(StatusEffect { kind, until_turn });
        }
    }

    /// Remember `source` as the most recent attacker.
    ///
    /// A repeat attacker moves to the back; the oldest entry is evicted past
    /// capacity.
    pub fn record_damage_source(&mut self, source: PlayerId) {
        self.damage_sources.retain(|&id| id != source);
        self.damage_sources.push_back(source);
        while self.damage_sources.len() > DAMAGE_SOURCE_CAPACITY {
            self.damage_sources.pop_front();
        }
    }

    /// Apply damage through the shield. Returns health actually lost.
    pub fn take_damage(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 || self.dead {
            return 0.0;
        }
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        let through = amount - absorbed;
        let before = self.health;
        self.health = (self.health - through).max(0.0);
        self.statuses.retain(|s| s.kind != StatusKind::Sleep);
        before - self.health
    }

    /// Heal a living player. Returns health actually restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 || self.dead {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.stats.max_health);
        self.health - before
    }

    /// Drop statuses, buffs and shields that ended before `turn`.
    ///
    /// Returns true when a timed buff was removed and stats need a recompute.
    pub fn expire_effects(&mut self, turn: u32) -> bool {
        self.statuses.retain(|s| s.until_turn >= turn);
        if self.shield > 0.0 && self.shield_until < turn {
            self.shield = 0.0;
        }
        let before = self.buffs.len();
        self.buffs.retain(|b| b.until_turn >= turn);
        before != self.buffs.len()
    }

    /// Whether the inventory holds `item`.
    #[must_use]
    pub fn owns_item(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    /// Remove one copy of `item` from the inventory.
    pub fn remove_item(&mut self, item: ItemId) -> bool {
        if let Some(index) = self.items.iter().position(|&id| id == item) {
            self.items.remove(index);
            if !self.items.contains(&item) {
                self.item_stacks.remove(&item);
            }
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerState {
        let roster = RosterPlayer::new(7, "Faker", Position::Mid, 90);
        PlayerState::new(&roster, 2, 500)
    }

    #[test]
    fn test_player_creation() {
        let p = player();
        assert_eq!(p.id, 7);
        assert_eq!(p.level, 1);
        assert_eq!(p.gold, 500);
        assert!(p.is_alive());
        assert!((p.health - p.stats.max_health).abs() < 1e-9);
        assert!(p.champion.is_none());
    }

    #[test]
    fn test_home_lanes() {
        assert_eq!(Position::Top.home_lane(), Some(Lane::Top));
        assert_eq!(Position::Jungle.home_lane(), None);
        assert_eq!(Position::Adc.home_lane(), Some(Lane::Bot));
        assert_eq!(Position::Support.home_lane(), Some(Lane::Bot));
    }

    #[test]
    fn test_damage_sources_fifo() {
        let mut p = player();
        for id in [1, 2, 3, 4] {
            p.record_damage_source(id);
        }
        assert_eq!(p.damage_sources, VecDeque::from([2, 3, 4]));

        p.record_damage_source(2);
        assert_eq!(p.damage_sources, VecDeque::from([3, 4, 2]));
    }

    #[test]
    fn test_shield_absorbs_first() {
        let mut p = player();
        p.shield = 50.0;
        p.shield_until = 3;
        let lost = p.take_damage(80.0);
        assert!((lost - 30.0).abs() < 1e-9);
        assert!(p.shield.abs() < 1e-9);
    }

    #[test]
    fn test_sleep_breaks_on_damage() {
        let mut p = player();
        p.apply_status(StatusKind::Sleep, 5);
        assert!(!p.can_act());
        p.take_damage(1.0);
        assert!(p.can_act());
    }

    #[test]
    fn test_status_expiry_is_inclusive() {
        let mut p = player();
        p.apply_status(StatusKind::Root, 4);
        p.expire_effects(4);
        assert!(p.has_status(StatusKind::Root));
        assert!(!p.can_roam());
        p.expire_effects(5);
        assert!(!p.has_status(StatusKind::Root));
    }

    #[test]
    fn test_heal_capped_and_dead_ignored() {
        let mut p = player();
        p.health = p.stats.max_health - 10.0;
        assert!((p.heal(100.0) - 10.0).abs() < 1e-9);
        p.dead = true;
        assert!(p.heal(100.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_item() {
        let mut p = player();
        p.items = vec![10, 10, 14];
        p.item_stacks.insert(10, 3);
        assert!(p.remove_item(10));
        assert_eq!(p.item_stacks.get(&10), Some(&3));
        assert!(p.remove_item(10));
        assert!(!p.item_stacks.contains_key(&10));
        assert!(!p.remove_item(99));
    }
}
