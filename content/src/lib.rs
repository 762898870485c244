#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Creature archetypes and the weapon table used to stock Skirmish rosters.
//!
//! Archetypes are plain data: a health dice triple, fixed combat statistics
//! and a list of weapon kinds. [`RosterBuilder`] turns them into fully
//! initialised [`Creature`] values, rolling health as it goes.

use std::{collections::BTreeMap, fmt, str::FromStr};

use rand::Rng;
use skirmish_core::{CombatStats, Creature, CreatureId, DamageDice, RangeClass, Roster, TeamId, Weapon};
use thiserror::Error;

/// Entries of the weapon table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponKind {
    /// 2d4+2, melee.
    Bite,
    /// 2d6+4, melee.
    Claws,
    /// 1d6+3, melee.
    ShortSword,
    /// 1d12+5, melee.
    GreatAxe,
    /// 1d8+3, ranged.
    Longbow,
}

impl WeaponKind {
    /// Display name of the weapon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bite => "Bite",
            Self::Claws => "Claws",
            Self::ShortSword => "Short sword",
            Self::GreatAxe => "Great axe",
            Self::Longbow => "Longbow",
        }
    }

    /// Damage formula of the weapon.
    #[must_use]
    pub const fn dice(self) -> DamageDice {
        match self {
            Self::Bite => DamageDice::new(2, 4, 2),
            Self::Claws => DamageDice::new(2, 6, 4),
            Self::ShortSword => DamageDice::new(1, 6, 3),
            Self::GreatAxe => DamageDice::new(1, 12, 5),
            Self::Longbow => DamageDice::new(1, 8, 3),
        }
    }

    /// Range class of the weapon.
    #[must_use]
    pub const fn range(self) -> RangeClass {
        match self {
            Self::Longbow => RangeClass::Ranged,
            Self::Bite | Self::Claws | Self::ShortSword | Self::GreatAxe => RangeClass::Melee,
        }
    }

    /// Builds a weapon value from the table entry.
    #[must_use]
    pub fn build(self) -> Weapon {
        Weapon::new(self.name(), self.dice(), self.range())
    }
}

/// Health formula written as `bonus` + `count`d`sides`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HealthDice {
    /// Flat health granted before any dice are rolled.
    pub bonus: i32,
    /// Number of dice rolled.
    pub count: u32,
    /// Faces on each die.
    pub sides: u32,
}

impl HealthDice {
    /// Rolls starting health.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> i32 {
        let sides = self.sides.max(1);
        (0..self.count).fold(self.bonus, |total, _| {
            let face = i32::try_from(rng.gen_range(1..=sides)).unwrap_or(i32::MAX);
            total.saturating_add(face)
        })
    }

    /// Inclusive range of possible starting health.
    #[must_use]
    pub fn bounds(&self) -> (i32, i32) {
        let count = i32::try_from(self.count).unwrap_or(i32::MAX);
        let sides = i32::try_from(self.sides.max(1)).unwrap_or(i32::MAX);
        (
            self.bonus.saturating_add(count),
            self.bonus.saturating_add(count.saturating_mul(sides)),
        )
    }
}

/// Creature templates available to rosters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Archetype {
    /// Fast biter with light armor.
    Wolf,
    /// Sturdy clawed brute.
    Bear,
    /// Heavily armored axe fighter.
    Barbarian,
    /// Archer carrying a short sword as a sidearm.
    Pathfinder,
}

impl Archetype {
    /// Every archetype in declaration order.
    pub const ALL: [Archetype; 4] = [
        Archetype::Wolf,
        Archetype::Bear,
        Archetype::Barbarian,
        Archetype::Pathfinder,
    ];

    /// Lowercase identifier used for names and parsing.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wolf => "wolf",
            Self::Bear => "bear",
            Self::Barbarian => "barbarian",
            Self::Pathfinder => "pathfinder",
        }
    }

    /// Formula used to roll starting health.
    #[must_use]
    pub const fn health(self) -> HealthDice {
        match self {
            Self::Wolf => HealthDice {
                bonus: 2,
                count: 2,
                sides: 8,
            },
            Self::Bear => HealthDice {
                bonus: 12,
                count: 4,
                sides: 10,
            },
            Self::Barbarian => HealthDice {
                bonus: 21,
                count: 2,
                sides: 12,
            },
            Self::Pathfinder => HealthDice {
                bonus: 16,
                count: 2,
                sides: 10,
            },
        }
    }

    /// Fixed combat statistics.
    #[must_use]
    pub const fn stats(self) -> CombatStats {
        match self {
            Self::Wolf => CombatStats {
                armor_class: 13,
                attack_bonus: 4,
                initiative_bonus: 2,
                speed: 8,
            },
            Self::Bear => CombatStats {
                armor_class: 11,
                attack_bonus: 6,
                initiative_bonus: 0,
                speed: 8,
            },
            Self::Barbarian => CombatStats {
                armor_class: 16,
                attack_bonus: 5,
                initiative_bonus: 2,
                speed: 8,
            },
            Self::Pathfinder => CombatStats {
                armor_class: 15,
                attack_bonus: 5,
                initiative_bonus: 3,
                speed: 6,
            },
        }
    }

    /// Weapons carried, in the order they are tried.
    #[must_use]
    pub const fn weapons(self) -> &'static [WeaponKind] {
        match self {
            Self::Wolf => &[WeaponKind::Bite],
            Self::Bear => &[WeaponKind::Claws],
            Self::Barbarian => &[WeaponKind::GreatAxe],
            Self::Pathfinder => &[WeaponKind::Longbow, WeaponKind::ShortSword],
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown archetype name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown archetype `{0}` (expected wolf, bear, barbarian or pathfinder)")]
pub struct UnknownArchetype(pub String);

impl FromStr for Archetype {
    type Err = UnknownArchetype;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|archetype| archetype.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownArchetype(trimmed.to_owned()))
    }
}

/// Line-up of the first team in the classic battle.
pub const DEFAULT_TEAM_A: [Archetype; 6] = [
    Archetype::Bear,
    Archetype::Bear,
    Archetype::Wolf,
    Archetype::Wolf,
    Archetype::Wolf,
    Archetype::Wolf,
];

/// Line-up of the second team in the classic battle.
pub const DEFAULT_TEAM_B: [Archetype; 4] = [
    Archetype::Barbarian,
    Archetype::Barbarian,
    Archetype::Pathfinder,
    Archetype::Pathfinder,
];

/// Allocates creature identifiers and names while building rosters.
///
/// Identifiers are unique across every roster built by the same builder.
/// Names are `<archetype><n>`, numbered per team and archetype from one.
#[derive(Debug, Default)]
pub struct RosterBuilder {
    next_id: u32,
    counters: BTreeMap<(TeamId, Archetype), u32>,
}

impl RosterBuilder {
    /// Creates a builder whose first creature receives identifier zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a single creature of the given archetype.
    pub fn creature<R: Rng>(&mut self, archetype: Archetype, team: TeamId, rng: &mut R) -> Creature {
        let id = CreatureId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let counter = self.counters.entry((team, archetype)).or_insert(0);
        *counter += 1;
        let name = format!("{}{}", archetype.name(), counter);

        let weapons = archetype
            .weapons()
            .iter()
            .map(|kind| kind.build())
            .collect();
        let health = archetype.health().roll(rng);

        Creature::new(id, name, team, archetype.stats(), health, weapons)
    }

    /// Creates a roster holding one creature per archetype, in order.
    pub fn roster<R: Rng>(&mut self, team: TeamId, line_up: &[Archetype], rng: &mut R) -> Roster {
        let creatures = line_up
            .iter()
            .map(|archetype| self.creature(*archetype, team, rng))
            .collect();
        Roster::new(team, creatures)
    }
}

/// Builds the classic beasts-versus-humans match-up.
pub fn default_teams<R: Rng>(rng: &mut R) -> (Roster, Roster) {
    let mut builder = RosterBuilder::new();
    let team_a = builder.roster(TeamId::A, &DEFAULT_TEAM_A, rng);
    let team_b = builder.roster(TeamId::B, &DEFAULT_TEAM_B, rng);
    (team_a, team_b)
}
