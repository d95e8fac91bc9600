#![no_main]

//! Full turn fuzzer.
//!
//! Drafts by timeout, then feeds arbitrary command lists through
//! submission and the whole turn pipeline. Rejected submissions must leave
//! the match untouched; accepted ones must never break an invariant.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rift::config::RulesConfig;
use rift::engine::{Match, MatchKind};
use rift::game::{check_invariants, Lane, PlayerAction, PlayerCommand, Roster, Side};

#[derive(Arbitrary, Debug, Clone)]
struct FuzzCommand {
    /// Index into the team's players; out of range hits unknown ids.
    player: u8,
    action: u8,
    buy: Option<u16>,
    sell: Option<u16>,
    ward: Option<u8>,
    cast: Option<u8>,
}

#[derive(Arbitrary, Debug)]
struct TurnInput {
    seed: u64,
    level: u8,
    turns: Vec<[Vec<FuzzCommand>; 2]>,
}

fn lane(code: u8) -> Lane {
    match code % 3 {
        0 => Lane::Top,
        1 => Lane::Mid,
        _ => Lane::Bot,
    }
}

fn action(code: u8) -> PlayerAction {
    match code % 12 {
        0 => PlayerAction::Defend,
        1 => PlayerAction::Farm,
        2 => PlayerAction::Recall,
        3..=5 => PlayerAction::Gank(lane(code)),
        6 => PlayerAction::ContestDragon,
        7 => PlayerAction::ContestVoidgrub,
        8 => PlayerAction::ContestBaron,
        9 => PlayerAction::ContestElder,
        _ => PlayerAction::Fight,
    }
}

fn build(game: &Match, side: Side, raw: &FuzzCommand) -> PlayerCommand {
    let team = game.team(side);
    let id = team
        .players
        .get(usize::from(raw.player))
        .map_or(u32::from(raw.player) + 100, |p| p.id);
    let mut command = PlayerCommand::new(id, action(raw.action));
    if let Some(item) = raw.buy {
        command = command.buy(item);
    }
    if let Some(item) = raw.sell {
        command = command.sell(item);
    }
    if let Some(code) = raw.ward {
        command = command.ward(lane(code));
    }
    if let Some(target) = raw.cast {
        command = command.cast(Some(u32::from(target)));
    }
    command
}

fuzz_target!(|input: TurnInput| {
    let level = 40 + input.level % 60;
    let Ok(mut game) = Match::new(
        input.seed,
        MatchKind::Normal,
        [Roster::uniform(1, 1, level), Roster::uniform(2, 6, level)],
        input.seed,
        RulesConfig::default(),
    ) else {
        return;
    };
    if game.begin_draft().is_err() {
        return;
    }
    while !game.draft_complete() {
        if game.draft_timeout().is_err() {
            return;
        }
    }
    if game.start_game().is_err() {
        return;
    }

    for commands in input.turns.into_iter().take(30) {
        for side in Side::ALL {
            let list: Vec<_> = commands[side.index()]
                .iter()
                .take(12)
                .map(|raw| build(&game, side, raw))
                .collect();
            let before = game.pending(side).map(<[_]>::to_vec);
            if game.submit_actions(side, list).is_err() {
                assert_eq!(game.pending(side).map(<[_]>::to_vec), before);
            }
        }
        let result = match game.process_turn() {
            Ok(result) => result,
            Err(e) => panic!("turn failed: {e}"),
        };
        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "{violations:?}");
        if result.game_end.is_some() {
            break;
        }
    }
});
