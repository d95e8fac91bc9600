//! Team state: roster, structures and team-wide buffs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::game::player::{Lane, PlayerId, PlayerState, Position};

/// External team identifier supplied by matchmaking.
pub type TeamId = u64;

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// First team (blue side).
    Team1,
    /// Second team (red side).
    Team2,
}

impl Side {
    /// Both sides in resolution order.
    pub const ALL: [Self; 2] = [Self::Team1, Self::Team2];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }

    /// Index into per-side arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Team1 => 0,
            Self::Team2 => 1,
        }
    }
}

/// One player in a roster snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    /// Player id.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
    /// Position the player fills.
    pub position: Position,
    /// Overall rating, 1 to 100.
    pub overall: u8,
    /// Card the player was drafted from, if any.
    #[serde(default)]
    pub card_id: Option<u64>,
}

impl RosterPlayer {
    /// Create a roster entry without a card.
    pub fn new(player_id: PlayerId, name: impl Into<String>, position: Position, overall: u8) -> Self {
        Self {
            player_id,
            name: name.into(),
            position,
            overall,
            card_id: None,
        }
    }
}

/// Five-player roster snapshot used to build a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Team id.
    pub team_id: TeamId,
    /// Team name.
    pub name: String,
    /// Exactly one player per position.
    pub players: Vec<RosterPlayer>,
}

impl Roster {
    /// Roster with one player per position, ids counting up from `first_player_id`.
    #[must_use]
    pub fn uniform(team_id: TeamId, first_player_id: PlayerId, overall: u8) -> Self {
        Self {
            team_id,
            name: format!("Team {team_id}"),
            players: Position::ALL
                .iter()
                .zip(first_player_id..)
                .map(|(&position, id)| RosterPlayer::new(id, format!("player-{id}"), position, overall))
                .collect(),
        }
    }

    /// Check the roster has exactly one player per position and valid ratings.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.players.len() != Position::ALL.len() {
            return Err(format!(
                "team {} has {} players, expected {}",
                self.team_id,
                self.players.len(),
                Position::ALL.len()
            ));
        }
        for position in Position::ALL {
            let count = self.players.iter().filter(|p| p.position == position).count();
            if count != 1 {
                return Err(format!("team {} has {count} players at {position:?}", self.team_id));
            }
        }
        for player in &self.players {
            if player.overall == 0 || player.overall > 100 {
                return Err(format!("player {} has overall {}", player.player_id, player.overall));
            }
        }
        for (i, a) in self.players.iter().enumerate() {
            if self.players[i + 1..].iter().any(|b| b.player_id == a.player_id) {
                return Err(format!("player {} appears twice", a.player_id));
            }
        }
        Ok(())
    }
}

/// Tower tier within a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TowerTier {
    /// First tower an attacker reaches.
    Outer,
    /// Second tower, guarding the nexus.
    Inner,
}

/// A single tower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerState {
    /// Lane the tower stands in.
    pub lane: Lane,
    /// Tier.
    pub tier: TowerTier,
    /// Current health.
    pub health: f64,
    /// Health when full.
    pub max_health: f64,
}

impl TowerState {
    /// Whether the tower has fallen.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }
}

/// The structure a hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Structure {
    /// A tower in a lane.
    Tower(Lane, TowerTier),
    /// The nexus.
    Nexus,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tower(lane, TowerTier::Outer) => write!(f, "{lane:?} outer tower"),
            Self::Tower(lane, TowerTier::Inner) => write!(f, "{lane:?} inner tower"),
            Self::Nexus => write!(f, "nexus"),
        }
    }
}

/// Outcome of damaging a structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureHit {
    /// What was hit.
    pub structure: Structure,
    /// Damage applied after clamping at zero health.
    pub damage: f64,
    /// Whether the hit brought the structure to zero.
    pub destroyed: bool,
}

/// Team-wide buffs. Timed buffs hold the last turn they are active on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamBuffs {
    /// Voidgrub buff expiry.
    pub grub_until: Option<u32>,
    /// Dragons secured, up to four.
    pub dragon_stacks: u8,
    /// Baron buff expiry.
    pub baron_until: Option<u32>,
    /// Elder buff expiry.
    pub elder_until: Option<u32>,
}

/// Maximum dragon stacks.
pub const MAX_DRAGON_STACKS: u8 = 4;

impl TeamBuffs {
    /// Voidgrub buff active.
    #[must_use]
    pub const fn has_grub(&self) -> bool {
        self.grub_until.is_some()
    }

    /// Baron buff active.
    #[must_use]
    pub const fn has_baron(&self) -> bool {
        self.baron_until.is_some()
    }

    /// Elder buff active.
    #[must_use]
    pub const fn has_elder(&self) -> bool {
        self.elder_until.is_some()
    }

    /// Multiplier on structure damage from voidgrub and baron.
    #[must_use]
    pub fn siege_multiplier(&self) -> f64 {
        let mut multiplier = 1.0;
        if self.has_grub() {
            multiplier *= 1.25;
        }
        if self.has_baron() {
            multiplier *= 1.5;
        }
        multiplier
    }
}

/// State of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    /// Which side the team plays.
    pub side: Side,
    /// External team id.
    pub team_id: TeamId,
    /// Team name.
    pub name: String,
    /// Players ordered TOP, JUNGLE, MID, ADC, SUPPORT.
    pub players: Vec<PlayerState>,
    /// Outer and inner tower of each lane.
    pub towers: Vec<TowerState>,
    /// Current nexus health.
    pub nexus_health: f64,
    /// Nexus health when full.
    pub nexus_max_health: f64,
    /// Team buffs.
    pub buffs: TeamBuffs,
}

impl TeamState {
    /// Build a team from a validated roster.
    #[must_use]
    pub fn new(side: Side, roster: &Roster, rules: &RulesConfig) -> Self {
        let mut ordered: Vec<_> = roster.players.iter().collect();
        ordered.sort_by_key(|p| p.position);

        let players = ordered
            .into_iter()
            .zip(0u8..)
            .map(|(p, slot)| PlayerState::new(p, slot, rules.starting_gold))
            .collect();

        let towers = Lane::ALL
            .iter()
            .flat_map(|&lane| {
                [
                    TowerState {
                        lane,
                        tier: TowerTier::Outer,
                        health: rules.outer_tower_health,
                        max_health: rules.outer_tower_health,
                    },
                    TowerState {
                        lane,
                        tier: TowerTier::Inner,
                        health: rules.inner_tower_health,
                        max_health: rules.inner_tower_health,
                    },
                ]
            })
            .collect();

        Self {
            side,
            team_id: roster.team_id,
            name: roster.name.clone(),
            players,
            towers,
            nexus_health: rules.nexus_health,
            nexus_max_health: rules.nexus_health,
            buffs: TeamBuffs::default(),
        }
    }

    /// Get a player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Get a mutable player by id.
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Index of a player in `players`.
    #[must_use]
    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Player holding `position`.
    #[must_use]
    pub fn player_at(&self, position: Position) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.position == position)
    }

    /// Whether the nexus has fallen.
    #[must_use]
    pub fn nexus_destroyed(&self) -> bool {
        self.nexus_health <= 0.0
    }

    /// Sum of kills across the roster.
    #[must_use]
    pub fn total_kills(&self) -> u32 {
        self.players.iter().map(|p| p.kills).sum()
    }

    /// Number of towers still standing.
    #[must_use]
    pub fn towers_standing(&self) -> usize {
        self.towers.iter().filter(|t| !t.is_destroyed()).count()
    }

    /// The structure an attacker in `lane` hits next.
    #[must_use]
    pub fn front_structure(&self, lane: Lane) -> Structure {
        [TowerTier::Outer, TowerTier::Inner]
            .into_iter()
            .find(|&tier| {
                self.towers
                    .iter()
                    .any(|t| t.lane == lane && t.tier == tier && !t.is_destroyed())
            })
            .map_or(Structure::Nexus, |tier| Structure::Tower(lane, tier))
    }

    /// Damage the most forward standing structure of `lane`.
    pub fn damage_structure(&mut self, lane: Lane, amount: f64) -> StructureHit {
        let structure = self.front_structure(lane);
        let amount = amount.max(0.0);
        let (damage, destroyed) = match structure {
            Structure::Tower(lane, tier) => {
                let Some(tower) = self.towers.iter_mut().find(|t| t.lane == lane && t.tier == tier)
                else {
                    return StructureHit {
                        structure,
                        damage: 0.0,
                        destroyed: false,
                    };
                };
                let damage = amount.min(tower.health);
                tower.health -= damage;
                (damage, tower.is_destroyed())
            }
            Structure::Nexus => {
                let damage = amount.min(self.nexus_health);
                self.nexus_health -= damage;
                (damage, damage > 0.0 && self.nexus_destroyed())
            }
        };
        StructureHit {
            structure,
            damage,
            destroyed,
        }
    }

    /// Clear timed team buffs whose expiry turn is before `turn`.
    ///
    /// Returns the names of the buffs that expired.
    pub fn expire_buffs(&mut self, turn: u32) -> Vec<&'static str> {
        let mut expired = Vec::new();
        for (slot, name) in [
            (&mut self.buffs.grub_until, "voidgrub"),
            (&mut self.buffs.baron_until, "baron"),
            (&mut self.buffs.elder_until, "elder"),
        ] {
            if slot.is_some_and(|until| turn > until) {
                *slot = None;
                expired.push(name);
            }
        }
        expired
    }
}

/// Borrow the team on `side` and its opponent mutably at the same time.
pub fn split_sides(teams: &mut [TeamState; 2], side: Side) -> (&mut TeamState, &mut TeamState) {
    let [team1, team2] = teams;
    match side {
        Side::Team1 => (team1, team2),
        Side::Team2 => (team2, team1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sides() {
        let rules = RulesConfig::default();
        let mut teams = [
            TeamState::new(Side::Team1, &roster(1, 1), &rules),
            TeamState::new(Side::Team2, &roster(2, 10), &rules),
        ];
        let (own, enemy) = split_sides(&mut teams, Side::Team2);
        assert_eq!(own.side, Side::Team2);
        assert_eq!(enemy.side, Side::Team1);
    }

    fn roster(team_id: TeamId, first_id: PlayerId) -> Roster {
        Roster {
            team_id,
            name: format!("Team {team_id}"),
            players: Position::ALL
                .iter()
                .rev()
                .zip(first_id..)
                .map(|(&position, id)| RosterPlayer::new(id, format!("p{id}"), position, 75))
                .collect(),
        }
    }

    #[test]
    fn test_players_sorted_by_position() {
        let team = TeamState::new(Side::Team1, &roster(1, 10), &RulesConfig::default());
        let positions: Vec<_> = team.players.iter().map(|p| p.position).collect();
        assert_eq!(positions, Position::ALL.to_vec());
        assert_eq!(team.players[0].slot, 0);
        assert_eq!(team.towers.len(), 6);
    }

    #[test]
    fn test_roster_validation() {
        let mut r = roster(1, 1);
        assert!(r.validate().is_ok());

        r.players[0].position = Position::Mid;
        assert!(r.validate().is_err());

        let mut r = roster(1, 1);
        r.players[1].player_id = r.players[0].player_id;
        assert!(r.validate().unwrap_err().contains("twice"));

        let mut r = roster(1, 1);
        r.players.pop();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_structures_fall_in_order() {
        let rules = RulesConfig::default();
        let mut team = TeamState::new(Side::Team2, &roster(2, 1), &rules);

        assert_eq!(team.front_structure(Lane::Mid), Structure::Tower(Lane::Mid, TowerTier::Outer));
        let hit = team.damage_structure(Lane::Mid, 5000.0);
        assert!(hit.destroyed);
        assert!((hit.damage - rules.outer_tower_health).abs() < 1e-9);

        assert_eq!(team.front_structure(Lane::Mid), Structure::Tower(Lane::Mid, TowerTier::Inner));
        team.damage_structure(Lane::Mid, 5000.0);
        assert_eq!(team.front_structure(Lane::Mid), Structure::Nexus);
        assert_eq!(team.front_structure(Lane::Top), Structure::Tower(Lane::Top, TowerTier::Outer));

        let hit = team.damage_structure(Lane::Mid, 1e9);
        assert!(hit.destroyed);
        assert!(team.nexus_health.abs() < 1e-9);
        assert!(team.nexus_destroyed());

        let hit = team.damage_structure(Lane::Mid, 100.0);
        assert!(!hit.destroyed);
        assert!(team.nexus_health >= 0.0);
    }

    #[test]
    fn test_baron_expires_after_recorded_turn() {
        let mut team = TeamState::new(Side::Team1, &roster(1, 1), &RulesConfig::default());
        team.buffs.baron_until = Some(10);

        assert!(team.expire_buffs(10).is_empty());
        assert!(team.buffs.has_baron());

        assert_eq!(team.expire_buffs(11), vec!["baron"]);
        assert!(!team.buffs.has_baron());
        assert!(team.expire_buffs(12).is_empty());
    }

    #[test]
    fn test_siege_multiplier() {
        let mut buffs = TeamBuffs::default();
        assert!((buffs.siege_multiplier() - 1.0).abs() < 1e-9);
        buffs.grub_until = Some(3);
        buffs.baron_until = Some(3);
        assert!((buffs.siege_multiplier() - 1.875).abs() < 1e-9);
    }
}
