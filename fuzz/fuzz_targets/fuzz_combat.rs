#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rift::combat::{mitigation, roll_hit, MIN_DAMAGE_FRACTION};
use rift::game::{MatchRng, Position, StatBundle};

/// Structured input for single-hit fuzzing.
#[derive(Arbitrary, Debug)]
struct HitInput {
    attack: u16,
    ability_power: u16,
    defense: u16,
    magic_resist: u16,
    /// Crit and evasion chances in hundredths.
    crit: u8,
    evasion: u8,
    mid: bool,
    seed: u64,
}

fuzz_target!(|input: HitInput| {
    let attacker = StatBundle {
        attack: f64::from(input.attack),
        ability_power: f64::from(input.ability_power),
        crit_chance: f64::from(input.crit.min(100)) / 100.0,
        ..StatBundle::ZERO
    };
    let defender = StatBundle {
        defense: f64::from(input.defense),
        magic_resist: f64::from(input.magic_resist),
        evasion: f64::from(input.evasion.min(100)) / 100.0,
        ..StatBundle::ZERO
    };
    let position = if input.mid { Position::Mid } else { Position::Top };
    let mut rng = MatchRng::new(input.seed);

    let m = mitigation(defender.defense);
    assert!((0.0..1.0).contains(&m), "mitigation out of range: {m}");

    let hit = roll_hit(&attacker, position, &defender, &mut rng);
    assert!(hit.damage >= 0.0 && hit.damage.is_finite());
    assert_eq!(hit.damage.fract(), 0.0);
    if hit.evaded {
        assert_eq!(hit.damage, 0.0);
    } else {
        assert!(hit.damage >= (attacker.attack * MIN_DAMAGE_FRACTION).floor());
    }
});
