//! Static champion data.

use serde::Serialize;

use crate::game::ChampionId;

/// Stat an ability scales with, and the resist that mitigates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Scaling {
    /// Attack; mitigated by defense.
    Ad,
    /// Ability power; mitigated by magic resist.
    Ap,
}

/// One row of the champion table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChampionData {
    /// Champion id.
    pub id: ChampionId,
    /// Display name.
    pub name: &'static str,
    /// Cooldown in turns after a cast.
    pub cooldown: u32,
    /// Scaling type.
    pub scaling: Scaling,
    /// Main value per ability level.
    pub values: [f64; 3],
    /// Secondary parameter per ability level.
    pub secondary: [f64; 3],
    /// Whether the ability can fire only once per match.
    pub one_time: bool,
}

impl ChampionData {
    /// Main value at `level` (1 to 3).
    #[must_use]
    pub fn value(&self, level: u8) -> f64 {
        self.values[tier(level)]
    }

    /// Secondary parameter at `level` (1 to 3).
    #[must_use]
    pub fn secondary(&self, level: u8) -> f64 {
        self.secondary[tier(level)]
    }
}

fn tier(level: u8) -> usize {
    usize::from(level.clamp(1, 3) - 1)
}

const fn row(
    id: ChampionId,
    name: &'static str,
    cooldown: u32,
    scaling: Scaling,
    values: [f64; 3],
    secondary: [f64; 3],
    one_time: bool,
) -> ChampionData {
    ChampionData {
        id,
        name,
        cooldown,
        scaling,
        values,
        secondary,
        one_time,
    }
}

use Scaling::{Ad, Ap};

/// Number of champions.
pub const CHAMPION_COUNT: usize = 24;

/// The champion table, indexed by id.
pub static CHAMPIONS: [ChampionData; CHAMPION_COUNT] = [
    row(0, "Varkas", 3, Ad, [120.0, 200.0, 300.0], [0.0, 0.0, 0.0], false),
    row(1, "Morrigan", 4, Ap, [60.0, 100.0, 150.0], [1.0, 1.0, 2.0], false),
    row(2, "Thessaly", 3, Ap, [50.0, 90.0, 140.0], [1.0, 2.0, 2.0], false),
    row(3, "Ildren", 3, Ap, [40.0, 80.0, 120.0], [1.0, 2.0, 2.0], false),
    row(4, "Somnia", 4, Ap, [0.0, 0.0, 0.0], [1.0, 2.0, 2.0], false),
    row(5, "Kaelthorn", 4, Ap, [80.0, 130.0, 190.0], [3.0, 4.0, 5.0], false),
    row(6, "Draven Mor", 4, Ad, [100.0, 160.0, 230.0], [0.15, 0.2, 0.25], false),
    row(7, "Seraphine Vale", 3, Ap, [100.0, 160.0, 240.0], [0.1, 0.15, 0.2], false),
    row(8, "Lumen", 5, Ap, [80.0, 130.0, 190.0], [0.0, 0.0, 0.0], false),
    row(9, "Aegida", 3, Ap, [120.0, 200.0, 300.0], [2.0, 2.0, 3.0], false),
    row(10, "Gravemaw", 5, Ad, [0.0, 0.0, 0.0], [1.0, 1.0, 2.0], false),
    row(11, "Fennick", 4, Ad, [150.0, 250.0, 400.0], [0.0, 0.0, 0.0], false),
    row(12, "Brakka", 4, Ad, [20.0, 35.0, 50.0], [2.0, 2.0, 3.0], false),
    row(13, "Bastion", 5, Ad, [15.0, 25.0, 40.0], [2.0, 2.0, 3.0], false),
    row(14, "Ymira", 1, Ad, [20.0, 35.0, 50.0], [150.0, 250.0, 400.0], true),
    row(15, "Phoenyx", 1, Ap, [0.0, 0.0, 0.0], [0.3, 0.5, 0.7], true),
    row(16, "Quillon", 4, Ap, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], false),
    row(17, "Nocthyr", 3, Ap, [70.0, 110.0, 160.0], [0.5, 0.6, 0.75], false),
    row(18, "Ordmarr", 4, Ad, [200.0, 350.0, 500.0], [0.0, 0.0, 0.0], false),
    row(19, "Zephyra", 4, Ap, [10.0, 20.0, 30.0], [2.0, 2.0, 3.0], false),
    row(20, "Halcyon", 5, Ap, [50.0, 90.0, 140.0], [0.0, 0.0, 0.0], false),
    row(21, "Rusk", 3, Ad, [15.0, 25.0, 40.0], [2.0, 2.0, 3.0], false),
    row(22, "Khorvan", 4, Ad, [25.0, 40.0, 60.0], [0.1, 0.1, 0.1], false),
    row(23, "Elegia", 1, Ap, [150.0, 250.0, 400.0], [0.0, 0.0, 0.0], true),
];

/// Look up a champion by id.
#[must_use]
pub fn champion_by_id(id: ChampionId) -> Option<&'static ChampionData> {
    CHAMPIONS.get(usize::from(id))
}

/// Whether `id` names a champion.
#[must_use]
pub fn is_valid_champion(id: ChampionId) -> bool {
    usize::from(id) < CHAMPION_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_index() {
        for (index, champ) in CHAMPIONS.iter().enumerate() {
            assert_eq!(usize::from(champ.id), index, "{}", champ.name);
        }
    }

    #[test]
    fn test_one_time_champions() {
        let one_time: Vec<_> = CHAMPIONS.iter().filter(|c| c.one_time).map(|c| c.id).collect();
        assert_eq!(one_time, vec![14, 15, 23]);
    }

    #[test]
    fn test_tier_lookup() {
        let nuke = champion_by_id(0).unwrap();
        assert!((nuke.value(1) - 120.0).abs() < 1e-9);
        assert!((nuke.value(3) - 300.0).abs() < 1e-9);
        assert!(champion_by_id(24).is_none());
        assert!(!is_valid_champion(200));
    }
}
