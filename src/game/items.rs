//! Static item catalog.

use serde::{Deserialize, Serialize};

use crate::game::stats::StatBundle;
use crate::game::Position;

/// Catalog identifier for an item.
pub type ItemId = u16;

/// Inventory slots for non-consumable items.
pub const MAX_INVENTORY: usize = 6;

/// Item tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemTier {
    /// Used on purchase, never enters the inventory.
    Consumable,
    /// Starter component.
    Basic,
    /// Built from basics.
    Intermediate,
    /// Completed item.
    Legendary,
}

/// Who an aura heal reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuraScope {
    /// Only the owner.
    SelfOnly,
    /// Every living teammate, owner included.
    Team,
    /// Every living teammate except the owner.
    AlliesOnly,
}

/// Behaviour beyond the additive stat bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemSpecial {
    /// Gains one stack per turn; each stack adds `per_turn` attack up to `cap`.
    StackingAttack {
        /// Attack per stack.
        per_turn: f64,
        /// Maximum bonus attack.
        cap: f64,
    },
    /// A surviving target below `threshold` of max health dies on hit.
    Execute {
        /// Health fraction.
        threshold: f64,
    },
    /// Heals a percentage of max health every turn.
    Aura {
        /// Recipients.
        scope: AuraScope,
        /// Fraction of each recipient's max health.
        percent: f64,
    },
    /// Multiplies total ability power.
    AbilityPowerCapstone,
    /// Consumable: restores a fraction of max health.
    Potion {
        /// Fraction of max health.
        heal: f64,
    },
    /// Consumable: grants the item's stats for a number of turns.
    Elixir {
        /// Duration in turns.
        turns: u32,
    },
}

/// Immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Item {
    /// Catalog id.
    pub id: ItemId,
    /// Display name.
    pub name: &'static str,
    /// Full gold cost.
    pub cost: u32,
    /// Tier.
    pub tier: ItemTier,
    /// Position allowed to buy the item, if restricted.
    pub position: Option<Position>,
    /// Additive stats.
    pub stats: StatBundle,
    /// Components consumed when building this item.
    pub builds_from: &'static [ItemId],
    /// Extra behaviour.
    pub special: Option<ItemSpecial>,
}

impl Item {
    /// Whether the item is used up on purchase.
    #[must_use]
    pub const fn is_consumable(&self) -> bool {
        matches!(self.tier, ItemTier::Consumable)
    }

    /// Whether a player in `position` may buy this item.
    #[must_use]
    pub fn usable_by(&self, position: Position) -> bool {
        self.position.is_none_or(|p| p == position)
    }
}

const fn item(
    id: ItemId,
    name: &'static str,
    cost: u32,
    tier: ItemTier,
    stats: StatBundle,
    builds_from: &'static [ItemId],
) -> Item {
    Item {
        id,
        name,
        cost,
        tier,
        position: None,
        stats,
        builds_from,
        special: None,
    }
}

const fn with_special(mut item: Item, special: ItemSpecial) -> Item {
    item.special = Some(special);
    item
}

const fn only_for(mut item: Item, position: Position) -> Item {
    item.position = Some(position);
    item
}

const Z: StatBundle = StatBundle::ZERO;

use ItemTier::{Basic, Consumable, Intermediate, Legendary};

/// The catalog, sorted by id.
pub static ITEMS: &[Item] = &[
    // Consumables
    with_special(item(1, "Health Potion", 50, Consumable, Z, &[]), ItemSpecial::Potion { heal: 0.3 }),
    with_special(
        item(2, "Elixir of Wrath", 150, Consumable, StatBundle { attack: 20.0, ..Z }, &[]),
        ItemSpecial::Elixir { turns: 3 },
    ),
    with_special(
        item(3, "Elixir of Iron", 150, Consumable, StatBundle { defense: 20.0, max_health: 100.0, ..Z }, &[]),
        ItemSpecial::Elixir { turns: 3 },
    ),
    with_special(
        item(4, "Elixir of Sorcery", 150, Consumable, StatBundle { ability_power: 30.0, ..Z }, &[]),
        ItemSpecial::Elixir { turns: 3 },
    ),
    with_special(item(5, "Refillable Flask", 100, Consumable, Z, &[]), ItemSpecial::Potion { heal: 0.5 }),
    // Basics
    item(10, "Long Sword", 350, Basic, StatBundle { attack: 10.0, ..Z }, &[]),
    item(11, "Cloth Armor", 300, Basic, StatBundle { defense: 15.0, ..Z }, &[]),
    item(12, "Boots", 300, Basic, StatBundle { speed: 10.0, ..Z }, &[]),
    item(13, "Ruby Crystal", 400, Basic, StatBundle { max_health: 150.0, ..Z }, &[]),
    item(14, "Amplifying Tome", 400, Basic, StatBundle { ability_power: 20.0, ..Z }, &[]),
    item(15, "Null-Magic Mantle", 450, Basic, StatBundle { magic_resist: 20.0, ..Z }, &[]),
    item(16, "Cloak of Agility", 600, Basic, StatBundle { crit_chance: 0.15, ..Z }, &[]),
    item(17, "Dagger", 300, Basic, StatBundle { speed: 6.0, ..Z }, &[]),
    item(18, "Vampiric Scepter", 900, Basic, StatBundle { attack: 15.0, life_steal: 0.08, ..Z }, &[]),
    item(19, "Sapphire Crystal", 350, Basic, StatBundle { ability_power: 10.0, magic_resist: 5.0, ..Z }, &[]),
    item(20, "Blasting Wand", 850, Basic, StatBundle { ability_power: 40.0, ..Z }, &[]),
    item(21, "B. F. Sword", 1300, Basic, StatBundle { attack: 40.0, ..Z }, &[]),
    only_for(
        item(22, "Spellthief's Edge", 400, Basic, StatBundle { ability_power: 8.0, max_health: 50.0, ..Z }, &[]),
        Position::Support,
    ),
    only_for(
        with_special(
            item(23, "Hunter's Machete", 350, Basic, StatBundle { attack: 8.0, ..Z }, &[]),
            ItemSpecial::StackingAttack { per_turn: 1.0, cap: 10.0 },
        ),
        Position::Jungle,
    ),
    with_special(
        item(24, "Rejuvenation Bead", 300, Basic, Z, &[]),
        ItemSpecial::Aura { scope: AuraScope::SelfOnly, percent: 0.02 },
    ),
    item(25, "Winged Cloak", 500, Basic, StatBundle { evasion: 0.08, ..Z }, &[]),
    item(26, "Pickaxe", 875, Basic, StatBundle { attack: 25.0, ..Z }, &[]),
    // Intermediates
    item(30, "Caulfield's Warhammer", 1100, Intermediate, StatBundle { attack: 25.0, ..Z }, &[10, 10]),
    item(31, "Chain Vest", 800, Intermediate, StatBundle { defense: 40.0, ..Z }, &[11]),
    item(32, "Kindlegem", 800, Intermediate, StatBundle { max_health: 200.0, ..Z }, &[13]),
    item(33, "Aether Wisp", 850, Intermediate, StatBundle { ability_power: 30.0, speed: 5.0, ..Z }, &[14]),
    item(34, "Negatron Cloak", 900, Intermediate, StatBundle { magic_resist: 40.0, ..Z }, &[15]),
    item(35, "Zeal", 1050, Intermediate, StatBundle { crit_chance: 0.15, speed: 8.0, ..Z }, &[16, 17]),
    item(36, "Vampiric Edge", 1200, Intermediate, StatBundle { attack: 20.0, life_steal: 0.10, ..Z }, &[18]),
    item(37, "Giant's Belt", 900, Intermediate, StatBundle { max_health: 350.0, ..Z }, &[13]),
    only_for(
        with_special(
            item(38, "Tracker's Knife", 1000, Intermediate, StatBundle { attack: 15.0, ..Z }, &[23]),
            ItemSpecial::StackingAttack { per_turn: 2.0, cap: 30.0 },
        ),
        Position::Jungle,
    ),
    item(39, "Serrated Dirk", 1100, Intermediate, StatBundle { attack: 30.0, ..Z }, &[10, 10]),
    item(40, "Fiendish Codex", 900, Intermediate, StatBundle { ability_power: 35.0, ..Z }, &[14]),
    item(41, "Phage", 1100, Intermediate, StatBundle { attack: 15.0, max_health: 200.0, ..Z }, &[10, 13]),
    // Legendaries
    item(50, "Infinity Edge", 3400, Legendary, StatBundle { attack: 70.0, crit_chance: 0.25, ..Z }, &[21, 16]),
    item(51, "Bloodthirster", 3400, Legendary, StatBundle { attack: 55.0, life_steal: 0.18, ..Z }, &[36, 21]),
    with_special(
        item(52, "Archmage's Crown", 3600, Legendary, StatBundle { ability_power: 120.0, ..Z }, &[20, 20]),
        ItemSpecial::AbilityPowerCapstone,
    ),
    item(53, "Void Staff", 3000, Legendary, StatBundle { ability_power: 70.0, magic_resist: 10.0, ..Z }, &[20, 40]),
    item(54, "Thornmail", 2700, Legendary, StatBundle { defense: 70.0, max_health: 350.0, ..Z }, &[31, 37]),
    with_special(
        item(55, "Spirit Visage", 2900, Legendary, StatBundle { magic_resist: 60.0, max_health: 450.0, ..Z }, &[34, 32]),
        ItemSpecial::Aura { scope: AuraScope::SelfOnly, percent: 0.05 },
    ),
    with_special(
        item(56, "Warmog's Armor", 3000, Legendary, StatBundle { max_health: 800.0, ..Z }, &[37, 32]),
        ItemSpecial::Aura { scope: AuraScope::SelfOnly, percent: 0.05 },
    ),
    with_special(
        item(57, "Lord Dominik's Regards", 3000, Legendary, StatBundle { attack: 35.0, crit_chance: 0.2, ..Z }, &[21, 30]),
        ItemSpecial::Execute { threshold: 0.08 },
    ),
    with_special(
        item(58, "The Collector", 3000, Legendary, StatBundle { attack: 60.0, crit_chance: 0.2, ..Z }, &[39, 16]),
        ItemSpecial::Execute { threshold: 0.05 },
    ),
    item(
        59,
        "Trinity Force",
        3333,
        Legendary,
        StatBundle { attack: 40.0, speed: 15.0, max_health: 300.0, ..Z },
        &[41, 35],
    ),
    item(60, "Black Cleaver", 3000, Legendary, StatBundle { attack: 50.0, max_health: 400.0, ..Z }, &[41, 30]),
    item(61, "Randuin's Omen", 2700, Legendary, StatBundle { defense: 60.0, max_health: 400.0, ..Z }, &[31, 37]),
    item(62, "Zhonya's Hourglass", 3250, Legendary, StatBundle { ability_power: 80.0, defense: 45.0, ..Z }, &[40, 31]),
    item(63, "Luden's Tempest", 2900, Legendary, StatBundle { ability_power: 90.0, speed: 10.0, ..Z }, &[33, 20]),
    only_for(
        with_special(
            item(64, "Redemption", 2300, Legendary, StatBundle { max_health: 200.0, ability_power: 20.0, ..Z }, &[32]),
            ItemSpecial::Aura { scope: AuraScope::Team, percent: 0.08 },
        ),
        Position::Support,
    ),
    only_for(
        with_special(
            item(65, "Mikael's Blessing", 2300, Legendary, StatBundle { magic_resist: 40.0, ..Z }, &[34]),
            ItemSpecial::Aura { scope: AuraScope::AlliesOnly, percent: 0.10 },
        ),
        Position::Support,
    ),
    only_for(
        with_special(
            item(
                66,
                "Locket of the Iron Solari",
                2500,
                Legendary,
                StatBundle { defense: 30.0, magic_resist: 30.0, max_health: 200.0, ..Z },
                &[31, 34],
            ),
            ItemSpecial::Aura { scope: AuraScope::Team, percent: 0.05 },
        ),
        Position::Support,
    ),
    item(67, "Sterak's Gage", 3100, Legendary, StatBundle { attack: 40.0, max_health: 450.0, ..Z }, &[37, 30]),
    item(
        68,
        "Phantom Dancer",
        2800,
        Legendary,
        StatBundle { crit_chance: 0.25, speed: 15.0, evasion: 0.10, ..Z },
        &[35, 25],
    ),
    item(69, "Guardian Angel", 3200, Legendary, StatBundle { attack: 45.0, defense: 40.0, ..Z }, &[26, 31]),
    item(70, "Ravenous Hydra", 3300, Legendary, StatBundle { attack: 65.0, life_steal: 0.12, ..Z }, &[36, 26]),
    item(
        71,
        "Blade of the Ruined King",
        3200,
        Legendary,
        StatBundle { attack: 40.0, life_steal: 0.10, speed: 10.0, ..Z },
        &[18, 17],
    ),
    with_special(
        item(72, "Mortal Reminder", 3000, Legendary, StatBundle { attack: 35.0, ..Z }, &[30]),
        ItemSpecial::Execute { threshold: 0.10 },
    ),
    item(73, "Sunfire Aegis", 2700, Legendary, StatBundle { defense: 50.0, max_health: 450.0, ..Z }, &[31, 32]),
    item(74, "Rylai's Crystal Scepter", 2600, Legendary, StatBundle { ability_power: 75.0, max_health: 400.0, ..Z }, &[20, 13]),
    item(
        75,
        "Force of Nature",
        2800,
        Legendary,
        StatBundle { magic_resist: 70.0, max_health: 350.0, speed: 10.0, ..Z },
        &[34, 37],
    ),
];

/// Look up an item by id.
#[must_use]
pub fn item_by_id(id: ItemId) -> Option<&'static Item> {
    ITEMS
        .binary_search_by_key(&id, |item| item.id)
        .ok()
        .map(|index| &ITEMS[index])
}

/// Gold price and consumed components for buying `item` with `owned` in the inventory.
///
/// Each component in `builds_from` that is owned is consumed once and its
/// cost is discounted from the price.
#[must_use]
pub fn purchase_plan(item: &Item, owned: &[ItemId]) -> (u32, Vec<ItemId>) {
    let mut remaining: Vec<ItemId> = owned.to_vec();
    let mut consumed = Vec::new();
    let mut discount = 0u32;

    for &component in item.builds_from {
        if let Some(index) = remaining.iter().position(|&id| id == component) {
            remaining.swap_remove(index);
            consumed.push(component);
            discount += item_by_id(component).map_or(0, |c| c.cost);
        }
    }

    (item.cost.saturating_sub(discount), consumed)
}
