//! Damage formulas.

use crate::game::{MatchRng, Position, StatBundle, TeamState};

/// Resist at which half of incoming damage is mitigated.
pub const MITIGATION_CONSTANT: f64 = 300.0;

/// Physical damage per point of attack.
pub const ATTACK_MULTIPLIER: f64 = 2.0;

/// Minimum damage as a fraction of raw attack.
pub const MIN_DAMAGE_FRACTION: f64 = 0.1;

/// Critical hit multiplier.
pub const CRIT_MULTIPLIER: f64 = 1.5;

/// Upper bound of the random magic damage factor.
pub const MAGIC_VARIANCE: f64 = 1.17;

/// Fraction of incoming damage removed by `resist`.
#[must_use]
pub fn mitigation(resist: f64) -> f64 {
    let resist = resist.max(0.0);
    resist / (resist + MITIGATION_CONSTANT)
}

/// `raw` after mitigation by `resist`.
#[must_use]
pub fn mitigate(raw: f64, resist: f64) -> f64 {
    raw * (1.0 - mitigation(resist))
}

/// A single resolved attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Damage dealt, already floored to a whole number.
    pub damage: f64,
    /// Whether the crit roll succeeded.
    pub crit: bool,
    /// Whether the defender evaded.
    pub evaded: bool,
}

/// Roll one basic attack from `attacker` against `defender`.
///
/// Mid laners add a magic component from ability power. Damage never drops
/// below a tenth of raw attack before crit and evasion are rolled.
pub fn roll_hit(
    attacker: &StatBundle,
    position: Position,
    defender: &StatBundle,
    rng: &mut MatchRng,
) -> Hit {
    let physical = mitigate(attacker.attack * ATTACK_MULTIPLIER, defender.defense);
    let magic = if position == Position::Mid && attacker.ability_power > 0.0 {
        let raw = attacker.ability_power * rng.uniform(1.0, MAGIC_VARIANCE);
        mitigate(raw, defender.magic_resist)
    } else {
        0.0
    };

    let mut damage = (physical + magic).max(attacker.attack * MIN_DAMAGE_FRACTION);

    let crit = rng.roll(attacker.crit_chance);
    if crit {
        damage *= CRIT_MULTIPLIER;
    }

    let evaded = rng.roll(defender.evasion);
    if evaded {
        damage = 0.0;
    }

    Hit {
        damage: damage.floor(),
        crit,
        evaded,
    }
}

/// Aggregate fighting power of `participants` (indices into `team.players`).
///
/// Each participant's attack is added, then the running total is scaled by
/// the dragon multiplier and, with baron, by 1.2. Scaling the running total
/// per participant compounds the multipliers for larger groups.
#[must_use]
pub fn team_power(team: &TeamState, participants: &[usize]) -> f64 {
    let dragon = 1.0 + 0.05 * f64::from(team.buffs.dragon_stacks);
    let baron = team.buffs.has_baron();

    let mut power = 0.0;
    for &index in participants {
        let Some(player) = team.players.get(index) else {
            continue;
        };
        power += player.stats.attack;
        power *= dragon;
        if baron {
            power *= 1.2;
        }
    }
    power
}
