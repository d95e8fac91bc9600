#![no_main]

//! Draft fuzzer: any sequence of bans, picks, skips and timeouts either
//! fails cleanly or keeps the draft consistent.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rift::draft::DraftState;
use rift::game::{MatchRng, Side};

#[derive(Arbitrary, Debug)]
enum DraftMove {
    Ban { team2: bool, champion: u8 },
    Pick { team2: bool, champion: u8 },
    Skip { team2: bool },
    Timeout,
}

#[derive(Arbitrary, Debug)]
struct DraftInput {
    seed: u64,
    moves: Vec<DraftMove>,
}

const fn side(team2: bool) -> Side {
    if team2 { Side::Team2 } else { Side::Team1 }
}

fuzz_target!(|input: DraftInput| {
    let mut draft = DraftState::new();
    let mut rng = MatchRng::new(input.seed);

    for m in input.moves.into_iter().take(64) {
        let before = draft.current_slot();
        let result = match m {
            DraftMove::Ban { team2, champion } => draft.ban(side(team2), champion),
            DraftMove::Pick { team2, champion } => draft.pick(side(team2), champion),
            DraftMove::Skip { team2 } => draft.skip(side(team2), &mut rng),
            DraftMove::Timeout => draft.timeout(&mut rng),
        };
        if result.is_err() {
            assert_eq!(draft.current_slot(), before, "failed move advanced the draft");
        }
    }

    let mut seen: Vec<_> = draft
        .picks()
        .iter()
        .chain(draft.bans().iter())
        .flatten()
        .copied()
        .collect();
    let total = seen.len();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), total, "champion drafted twice");
});
