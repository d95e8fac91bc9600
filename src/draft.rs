//! Ban/pick draft.
//!
//! Twenty fixed slots in competitive order: six bans, six picks, four bans,
//! four picks. Each slot belongs to one side and is either a ban or a pick.
//! A slot resolves by a manual choice, a skip, or a timeout.

use serde::{Deserialize, Serialize};

use crate::champion::{is_valid_champion, CHAMPION_COUNT};
use crate::error::{MatchError, MatchResult};
use crate::game::{ChampionId, MatchRng, Position, Side};

/// Kind of draft slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftAction {
    /// Remove a champion from the pool.
    Ban,
    /// Take a champion.
    Pick,
}

/// One slot of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSlot {
    /// Slot index, 0 to 19.
    pub index: usize,
    /// Side acting.
    pub side: Side,
    /// Ban or pick.
    pub action: DraftAction,
}

/// Number of draft slots.
pub const DRAFT_SLOTS: usize = 20;

const B: Side = Side::Team1;
const R: Side = Side::Team2;

/// Acting side and action for every slot.
pub const DRAFT_SEQUENCE: [(Side, DraftAction); DRAFT_SLOTS] = [
    (B, DraftAction::Ban),
    (R, DraftAction::Ban),
    (B, DraftAction::Ban),
    (R, DraftAction::Ban),
    (B, DraftAction::Ban),
    (R, DraftAction::Ban),
    (B, DraftAction::Pick),
    (R, DraftAction::Pick),
    (R, DraftAction::Pick),
    (B, DraftAction::Pick),
    (B, DraftAction::Pick),
    (R, DraftAction::Pick),
    (R, DraftAction::Ban),
    (B, DraftAction::Ban),
    (R, DraftAction::Ban),
    (B, DraftAction::Ban),
    (R, DraftAction::Pick),
    (B, DraftAction::Pick),
    (B, DraftAction::Pick),
    (R, DraftAction::Pick),
];

/// How a slot was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftChoice {
    /// The acting side chose.
    Manual,
    /// The acting side passed.
    Skipped,
    /// The slot timer ran out.
    TimedOut,
}

/// Result of resolving one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSlotResult {
    /// Slot resolved.
    pub slot: DraftSlot,
    /// How it was resolved.
    pub choice: DraftChoice,
    /// Champion banned or picked; `None` for a passed ban.
    pub champion: Option<ChampionId>,
    /// Bans per side.
    pub bans: [Vec<ChampionId>; 2],
    /// Picks per side.
    pub picks: [Vec<ChampionId>; 2],
    /// Next slot, or `None` when the draft is complete.
    pub next: Option<DraftSlot>,
}

impl DraftSlotResult {
    /// Whether this was the last slot.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.next.is_none()
    }
}

/// Draft progress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DraftState {
    slot: usize,
    bans: [Vec<ChampionId>; 2],
    picks: [Vec<ChampionId>; 2],
}

impl DraftState {
    /// Fresh draft at slot 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot waiting for a choice.
    #[must_use]
    pub fn current_slot(&self) -> Option<DraftSlot> {
        slot_at(self.slot)
    }

    /// Whether all slots are resolved.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.slot >= DRAFT_SLOTS
    }

    /// Bans per side.
    #[must_use]
    pub const fn bans(&self) -> &[Vec<ChampionId>; 2] {
        &self.bans
    }

    /// Picks per side.
    #[must_use]
    pub const fn picks(&self) -> &[Vec<ChampionId>; 2] {
        &self.picks
    }

    /// Whether `champion` is still in the pool.
    #[must_use]
    pub fn is_available(&self, champion: ChampionId) -> bool {
        is_valid_champion(champion)
            && self
                .bans
                .iter()
                .chain(self.picks.iter())
                .all(|list| !list.contains(&champion))
    }

    /// Every champion still in the pool, ascending.
    #[must_use]
    pub fn available(&self) -> Vec<ChampionId> {
        (0..CHAMPION_COUNT)
            .filter_map(|id| ChampionId::try_from(id).ok())
            .filter(|&id| self.is_available(id))
            .collect()
    }

    /// Ban `champion` for `side`.
    ///
    /// # Errors
    ///
    /// Rejects the request without changes when the draft is over, it is not
    /// `side`'s slot, the slot is a pick, or the champion is unavailable.
    pub fn ban(&mut self, side: Side, champion: ChampionId) -> MatchResult<DraftSlotResult> {
        self.check(side, DraftAction::Ban, champion)?;
        Ok(self.resolve(Some(champion), DraftChoice::Manual))
    }

    /// Pick `champion` for `side`.
    ///
    /// # Errors
    ///
    /// Same rejections as [`DraftState::ban`], with the slot required to be a pick.
    pub fn pick(&mut self, side: Side, champion: ChampionId) -> MatchResult<DraftSlotResult> {
        self.check(side, DraftAction::Pick, champion)?;
        Ok(self.resolve(Some(champion), DraftChoice::Manual))
    }

    /// Pass the current slot. A passed ban bans nothing; a passed pick takes
    /// a random available champion.
    ///
    /// # Errors
    ///
    /// Rejects the request when the draft is over or it is not `side`'s slot.
    pub fn skip(&mut self, side: Side, rng: &mut MatchRng) -> MatchResult<DraftSlotResult> {
        let slot = self.current_slot().ok_or(MatchError::DraftComplete)?;
        if slot.side != side {
            return Err(MatchError::NotYourSlot { expected: slot.side });
        }
        let champion = match slot.action {
            DraftAction::Ban => None,
            DraftAction::Pick => self.random_available(rng),
        };
        Ok(self.resolve(champion, DraftChoice::Skipped))
    }

    /// Resolve the current slot after its timer expired with a random
    /// available champion.
    ///
    /// # Errors
    ///
    /// Fails only when the draft is already complete.
    pub fn timeout(&mut self, rng: &mut MatchRng) -> MatchResult<DraftSlotResult> {
        if self.is_complete() {
            return Err(MatchError::DraftComplete);
        }
        let champion = self.random_available(rng);
        Ok(self.resolve(champion, DraftChoice::TimedOut))
    }

    /// Champions for `side` in position order, once the draft is complete.
    #[must_use]
    pub fn assignments(&self, side: Side) -> Option<[(Position, ChampionId); 5]> {
        if !self.is_complete() {
            return None;
        }
        let picks = &self.picks[side.index()];
        let mut out = [(Position::Top, 0); 5];
        for (slot, position) in out.iter_mut().zip(Position::ALL) {
            let &champion = picks.get(position_index(position))?;
            *slot = (position, champion);
        }
        Some(out)
    }

    fn check(&self, side: Side, action: DraftAction, champion: ChampionId) -> MatchResult<()> {
        let slot = self.current_slot().ok_or(MatchError::DraftComplete)?;
        if slot.side != side {
            return Err(MatchError::NotYourSlot { expected: slot.side });
        }
        if slot.action != action {
            return Err(MatchError::SlotMismatch { expected: slot.action });
        }
        if !is_valid_champion(champion) {
            return Err(MatchError::UnknownChampion(champion));
        }
        if !self.is_available(champion) {
            return Err(MatchError::ChampionUnavailable(champion));
        }
        Ok(())
    }

    fn random_available(&self, rng: &mut MatchRng) -> Option<ChampionId> {
        rng.choose(&self.available()).copied()
    }

    fn resolve(&mut self, champion: Option<ChampionId>, choice: DraftChoice) -> DraftSlotResult {
        let (side, action) = DRAFT_SEQUENCE[self.slot];
        let slot = DraftSlot {
            index: self.slot,
            side,
            action,
        };
        if let Some(champion) = champion {
            match action {
                DraftAction::Ban => self.bans[side.index()].push(champion),
                DraftAction::Pick => self.picks[side.index()].push(champion),
            }
        }
        self.slot += 1;
        DraftSlotResult {
            slot,
            choice,
            champion,
            bans: self.bans.clone(),
            picks: self.picks.clone(),
            next: self.current_slot(),
        }
    }
}

fn slot_at(index: usize) -> Option<DraftSlot> {
    DRAFT_SEQUENCE.get(index).map(|&(side, action)| DraftSlot { index, side, action })
}

fn position_index(position: Position) -> usize {
    Position::ALL.iter().position(|&p| p == position).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_shape() {
        let bans = DRAFT_SEQUENCE.iter().filter(|(_, a)| *a == DraftAction::Ban).count();
        assert_eq!(bans, 10);
        for side in Side::ALL {
            let picks = DRAFT_SEQUENCE
                .iter()
                .filter(|&&(s, a)| s == side && a == DraftAction::Pick)
                .count();
            assert_eq!(picks, 5);
        }
    }

    #[test]
    fn test_wrong_side_and_slot_rejected() {
        let mut draft = DraftState::new();
        assert_eq!(draft.ban(Side::Team2, 3), Err(MatchError::NotYourSlot { expected: Side::Team1 }));
        assert_eq!(
            draft.pick(Side::Team1, 3),
            Err(MatchError::SlotMismatch { expected: DraftAction::Ban })
        );
        assert_eq!(draft.ban(Side::Team1, 99), Err(MatchError::UnknownChampion(99)));
        assert_eq!(draft, DraftState::new());
    }

    #[test]
    fn test_taken_champion_rejected() {
        let mut draft = DraftState::new();
        draft.ban(Side::Team1, 5).unwrap();
        assert_eq!(draft.ban(Side::Team2, 5), Err(MatchError::ChampionUnavailable(5)));
        let result = draft.ban(Side::Team2, 6).unwrap();
        assert_eq!(result.bans, [vec![5], vec![6]]);
        assert_eq!(result.next.unwrap().index, 2);
    }

    #[test]
    fn test_timeouts_complete_in_twenty_slots() {
        let mut draft = DraftState::new();
        let mut rng = MatchRng::new(17);
        let mut slots = 0;
        while !draft.is_complete() {
            let result = draft.timeout(&mut rng).unwrap();
            assert_eq!(result.choice, DraftChoice::TimedOut);
            slots += 1;
        }
        assert_eq!(slots, DRAFT_SLOTS);
        assert_eq!(draft.timeout(&mut rng), Err(MatchError::DraftComplete));

        let mut seen: Vec<ChampionId> = draft
            .bans()
            .iter()
            .chain(draft.picks().iter())
            .flatten()
            .copied()
            .collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
        assert_eq!(total, DRAFT_SLOTS);
    }

    #[test]
    fn test_skipped_ban_bans_nothing() {
        let mut draft = DraftState::new();
        let mut rng = MatchRng::new(1);
        let result = draft.skip(Side::Team1, &mut rng).unwrap();
        assert_eq!(result.champion, None);
        assert!(draft.bans()[0].is_empty());
        assert_eq!(draft.current_slot().unwrap().index, 1);
    }

    #[test]
    fn test_assignments_follow_position_order() {
        let mut draft = DraftState::new();
        let mut rng = MatchRng::new(2);
        assert!(draft.assignments(Side::Team1).is_none());
        while !draft.is_complete() {
            draft.timeout(&mut rng).unwrap();
        }
        let assigned = draft.assignments(Side::Team1).unwrap();
        assert_eq!(assigned[0].0, Position::Top);
        assert_eq!(assigned[4].0, Position::Support);
        assert_eq!(assigned[2].1, draft.picks()[0][2]);
    }
}
