#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skirmish engine.
//!
//! This crate defines the vocabulary that connects the arena, the pure
//! systems, and the adapters. Creatures and weapons are plain values owned by
//! team [`Roster`]s, the arena mirrors creature positions on its occupancy
//! grid, and every step of a battle is reported by pushing [`Event`] values
//! into a caller supplied buffer. Adapters consume that buffer; nothing in the
//! core formats text for humans.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of faces on the die rolled for initiative and armor checks.
pub const D20: u32 = 20;

/// Identifies the side a creature fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamId {
    /// First team handed to the battle.
    A,
    /// Second team handed to the battle.
    B,
}

impl TeamId {
    /// Every team in the order rosters are processed.
    pub const ALL: [TeamId; 2] = [TeamId::A, TeamId::B];

    /// Team fighting against this one.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Short human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "team A",
            Self::B => "team B",
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unique identifier assigned to a creature for the lifetime of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(u32);

impl CreatureId {
    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Number of king moves separating two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Cell displaced by the provided offset, or `None` if it would leave the
    /// non-negative quadrant.
    #[must_use]
    pub fn offset(self, columns: i32, rows: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(columns)?;
        let row = self.row.checked_add_signed(rows)?;
        Some(Self::new(column, row))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Distance class a weapon can strike at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeClass {
    /// Requires the defender to stand on an adjacent cell.
    Melee,
    /// Usable at any distance.
    Ranged,
}

impl RangeClass {
    /// Reports whether a weapon of this class can strike across `distance` cells.
    #[must_use]
    pub const fn reaches(self, distance: u32) -> bool {
        match self {
            Self::Melee => distance <= 1,
            Self::Ranged => true,
        }
    }

    /// Class preferred for a strike across `distance` cells.
    #[must_use]
    pub const fn preferred_at(distance: u32) -> Self {
        if distance <= 1 {
            Self::Melee
        } else {
            Self::Ranged
        }
    }
}

/// Damage formula written as `count`d`sides` + `bonus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageDice {
    count: u32,
    sides: u32,
    bonus: i32,
}

impl DamageDice {
    /// Creates a damage formula.
    #[must_use]
    pub const fn new(count: u32, sides: u32, bonus: i32) -> Self {
        Self {
            count,
            sides,
            bonus,
        }
    }

    /// Number of dice rolled.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Faces on each die.
    #[must_use]
    pub const fn sides(&self) -> u32 {
        self.sides
    }

    /// Flat amount added to the dice total.
    #[must_use]
    pub const fn bonus(&self) -> i32 {
        self.bonus
    }

    /// Inclusive damage range once the wielder's attack bonus is added.
    #[must_use]
    pub fn bounds(&self, attack_bonus: i32) -> (i32, i32) {
        let count = i32::try_from(self.count).unwrap_or(i32::MAX);
        let sides = i32::try_from(self.sides.max(1)).unwrap_or(i32::MAX);
        let flat = self.bonus.saturating_add(attack_bonus);
        (
            count.saturating_add(flat),
            count.saturating_mul(sides).saturating_add(flat),
        )
    }
}

impl fmt::Display for DamageDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.bonus != 0 {
            write!(f, "{:+}", self.bonus)?;
        }
        Ok(())
    }
}

/// Weapon owned by a creature. Immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Weapon {
    name: String,
    dice: DamageDice,
    range: RangeClass,
}

impl Weapon {
    /// Creates a weapon from its display name, damage formula and range class.
    #[must_use]
    pub fn new(name: impl Into<String>, dice: DamageDice, range: RangeClass) -> Self {
        Self {
            name: name.into(),
            dice,
            range,
        }
    }

    /// Display name of the weapon.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Damage formula rolled on a hit.
    #[must_use]
    pub const fn dice(&self) -> DamageDice {
        self.dice
    }

    /// Range class of the weapon.
    #[must_use]
    pub const fn range(&self) -> RangeClass {
        self.range
    }

    /// Reports whether the weapon can strike across `distance` cells.
    #[must_use]
    pub const fn reaches(&self, distance: u32) -> bool {
        self.range.reaches(distance)
    }
}

/// Fixed combat statistics of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CombatStats {
    /// Minimum roll-plus-bonus required to land a hit on the creature.
    pub armor_class: i32,
    /// Bonus applied to damage rolls and, depending on the rule, to-hit rolls.
    pub attack_bonus: i32,
    /// Bonus added to the initiative roll.
    pub initiative_bonus: i32,
    /// Movement allowance carried by the archetype.
    pub speed: u32,
}

/// A combatant owned by exactly one team roster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Creature {
    id: CreatureId,
    name: String,
    team: TeamId,
    stats: CombatStats,
    health: i32,
    cell: CellCoord,
    weapons: Vec<Weapon>,
}

impl Creature {
    /// Creates a creature that has not been placed on a grid yet.
    #[must_use]
    pub fn new(
        id: CreatureId,
        name: impl Into<String>,
        team: TeamId,
        stats: CombatStats,
        health: i32,
        weapons: Vec<Weapon>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            stats,
            health,
            cell: CellCoord::default(),
            weapons,
        }
    }

    /// Identifier of the creature.
    #[must_use]
    pub const fn id(&self) -> CreatureId {
        self.id
    }

    /// Display name of the creature.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Team the creature fights for.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Fixed combat statistics.
    #[must_use]
    pub const fn stats(&self) -> CombatStats {
        self.stats
    }

    /// Current health. Never negative once the creature has died.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Cell the creature occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Weapons in the order they were handed to the creature.
    #[must_use]
    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    /// A creature is alive while its health stays above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Reports whether any owned weapon reaches across `distance` cells.
    #[must_use]
    pub fn can_reach(&self, distance: u32) -> bool {
        self.weapons.iter().any(|weapon| weapon.reaches(distance))
    }

    /// Reports whether the creature owns at least one ranged weapon.
    #[must_use]
    pub fn has_ranged_weapon(&self) -> bool {
        self.weapons
            .iter()
            .any(|weapon| weapon.range() == RangeClass::Ranged)
    }

    /// Mirrors the cell assigned by the arena.
    pub fn place(&mut self, cell: CellCoord) {
        self.cell = cell;
    }

    /// Subtracts `amount` from health and reports whether the creature died.
    ///
    /// Health is clamped to zero on death so that dead creatures always report
    /// exactly zero.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            self.health = 0;
        }
        was_alive && !self.is_alive()
    }
}

/// Ordered members of one team. Insertion order is creation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    team: TeamId,
    creatures: Vec<Creature>,
}

impl Roster {
    /// Creates a roster from creatures that all belong to `team`.
    #[must_use]
    pub fn new(team: TeamId, creatures: Vec<Creature>) -> Self {
        debug_assert!(
            creatures.iter().all(|creature| creature.team() == team),
            "roster members must belong to the roster's team"
        );
        Self { team, creatures }
    }

    /// Team represented by the roster.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Number of creatures still on the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    /// Reports whether the roster has no members left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Iterator over members in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    /// Iterator over members that are still alive, in roster order.
    pub fn living(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter().filter(|creature| creature.is_alive())
    }

    /// Mutable iterator over members in roster order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Creature> {
        self.creatures.iter_mut()
    }

    /// Position of the creature within the roster, if it is a member.
    #[must_use]
    pub fn index_of(&self, id: CreatureId) -> Option<usize> {
        self.creatures.iter().position(|creature| creature.id() == id)
    }

    /// Looks up a member by identifier.
    #[must_use]
    pub fn get(&self, id: CreatureId) -> Option<&Creature> {
        self.index_of(id).map(|index| &self.creatures[index])
    }

    /// Looks up a member by identifier for mutation.
    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        let index = self.index_of(id)?;
        self.creatures.get_mut(index)
    }

    /// Removes a member, preserving the order of the others.
    pub fn remove(&mut self, id: CreatureId) -> Option<Creature> {
        let index = self.index_of(id)?;
        Some(self.creatures.remove(index))
    }

    /// Removes every dead member and returns them in roster order.
    pub fn remove_dead(&mut self) -> Vec<Creature> {
        let (living, dead): (Vec<Creature>, Vec<Creature>) = std::mem::take(&mut self.creatures)
            .into_iter()
            .partition(Creature::is_alive);
        self.creatures = living;
        dead
    }
}

/// Outcome of asking the arena what a creature does with its turn.
///
/// A scheduled action is exactly one of these; a creature that moves never
/// attacks in the same action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Attack the provided enemy without moving.
    Attack {
        /// Enemy chosen as the target.
        target: CreatureId,
    },
    /// The creature stepped one cell toward its nearest enemy.
    Advance {
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// No enemy could be reached.
    Hold,
}

/// Result of a single attack once the resolver reached its final state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackResult {
    /// The armor check failed.
    Miss {
        /// Total of the d20 and the applied bonus.
        roll: i32,
    },
    /// The armor check passed but no owned weapon reaches the defender.
    NoWeapon,
    /// Damage was dealt.
    Hit {
        /// Name of the weapon used.
        weapon: String,
        /// Damage subtracted from the defender.
        damage: i32,
        /// Defender health after the hit.
        remaining_health: i32,
    },
}

/// Reason a battle ended without a winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawReason {
    /// The last members of both teams fell in the same sweep.
    MutualElimination,
    /// The configured number of rounds elapsed.
    RoundCap,
}

/// Progress of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleState {
    /// Both teams still field creatures.
    InProgress,
    /// The provided team eliminated its opponent.
    Won(TeamId),
    /// The battle ended without a winner.
    Draw(DrawReason),
}

impl BattleState {
    /// Reports whether the battle reached a final state.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// Winning team, if any.
    #[must_use]
    pub const fn winner(self) -> Option<TeamId> {
        match self {
            Self::Won(team) => Some(team),
            Self::InProgress | Self::Draw(_) => None,
        }
    }
}

/// Events broadcast while a battle is prepared and played.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// A creature was assigned its starting cell.
    CreaturePlaced {
        /// Creature that was placed.
        creature: CreatureId,
        /// Cell assigned to the creature.
        cell: CellCoord,
    },
    /// Initiative was rolled for a creature.
    InitiativeRolled {
        /// Creature the roll belongs to.
        creature: CreatureId,
        /// Roll plus initiative bonus.
        priority: i32,
    },
    /// A new round begins.
    RoundStarted {
        /// One-based round number.
        round: u32,
    },
    /// A creature stepped one cell toward an enemy.
    CreatureMoved {
        /// Creature that moved.
        creature: CreatureId,
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// A creature swings at an enemy.
    AttackAttempted {
        /// Creature making the attack.
        attacker: CreatureId,
        /// Creature being attacked.
        defender: CreatureId,
    },
    /// The attack finished resolving.
    AttackResolved {
        /// Creature that made the attack.
        attacker: CreatureId,
        /// Creature that was attacked.
        defender: CreatureId,
        /// What the attack achieved.
        result: AttackResult,
    },
    /// A creature's health reached zero.
    CreatureDied {
        /// Creature that died.
        creature: CreatureId,
    },
    /// The battle reached a final state.
    BattleEnded {
        /// Final state of the battle.
        state: BattleState,
        /// Round during which the battle ended.
        round: u32,
    },
}

/// Configuration problems detected before a battle starts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    /// A team was handed to the battle without any creatures.
    #[error("{0} has no creatures")]
    EmptyRoster(TeamId),
    /// The arena was configured with zero columns or rows.
    #[error("arena grid has no cells")]
    EmptyGrid,
    /// A wall was placed outside the arena grid.
    #[error("wall at {0} lies outside the arena")]
    WallOutOfBounds(CellCoord),
    /// The grid cannot hold every creature.
    #[error("arena has {available} free cells but {required} creatures need placing")]
    InsufficientCells {
        /// Number of creatures waiting for a cell.
        required: usize,
        /// Number of free cells on the grid.
        available: usize,
    },
    /// A creature handed to a prepared arena has no cell on it.
    #[error("creature {0:?} has not been placed in the arena")]
    Unplaced(CreatureId),
    /// A prepared arena holds creatures that belong to neither roster.
    #[error("arena holds {placed} creatures but the rosters field {rostered}")]
    StrayOccupants {
        /// Number of creatures placed on the arena.
        placed: usize,
        /// Number of creatures across both rosters.
        rostered: usize,
    },
    /// A roster was handed to the battle in the other team's slot.
    #[error("expected a roster for {expected} but received {found}")]
    TeamMismatch {
        /// Team the slot is reserved for.
        expected: TeamId,
        /// Team the roster belongs to.
        found: TeamId,
    },
}

/// Reasons a creature cannot be put on a particular cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The cell lies outside the grid.
    #[error("cell {0} lies outside the arena")]
    OutOfBounds(CellCoord),
    /// The cell holds a wall or another creature.
    #[error("cell {0} is not free")]
    Occupied(CellCoord),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> CombatStats {
        CombatStats {
            armor_class: 13,
            attack_bonus: 4,
            initiative_bonus: 2,
            speed: 8,
        }
    }

    fn creature(id: u32, team: TeamId, health: i32) -> Creature {
        Creature::new(
            CreatureId::new(id),
            format!("c{id}"),
            team,
            stats(),
            health,
            vec![Weapon::new("Bite", DamageDice::new(2, 4, 2), RangeClass::Melee)],
        )
    }

    #[test]
    fn chebyshev_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.chebyshev_distance(destination), 3);
        assert_eq!(destination.chebyshev_distance(origin), 3);
        assert_eq!(origin.chebyshev_distance(origin), 0);
    }

    #[test]
    fn offset_refuses_negative_coordinates() {
        assert_eq!(CellCoord::new(0, 2).offset(-1, 0), None);
        assert_eq!(
            CellCoord::new(1, 2).offset(-1, 1),
            Some(CellCoord::new(0, 3))
        );
    }

    #[test]
    fn opponent_swaps_teams() {
        assert_eq!(TeamId::A.opponent(), TeamId::B);
        assert_eq!(TeamId::B.opponent(), TeamId::A);
    }

    #[test]
    fn melee_reaches_only_adjacent_cells() {
        assert!(RangeClass::Melee.reaches(1));
        assert!(!RangeClass::Melee.reaches(2));
        assert!(RangeClass::Ranged.reaches(1));
        assert!(RangeClass::Ranged.reaches(9));
    }

    #[test]
    fn damage_bounds_include_attack_bonus() {
        let dice = DamageDice::new(2, 6, 4);
        assert_eq!(dice.bounds(6), (12, 22));
        assert_eq!(dice.to_string(), "2d6+4");
    }

    #[test]
    fn lethal_damage_clamps_health_to_zero() {
        let mut target = creature(1, TeamId::A, 10);
        assert!(!target.apply_damage(4));
        assert_eq!(target.health(), 6);
        assert!(target.apply_damage(15));
        assert_eq!(target.health(), 0);
        assert!(!target.is_alive());
        assert!(!target.apply_damage(3), "a dead creature cannot die twice");
    }

    #[test]
    fn roster_lookup_signals_missing_members() {
        let mut roster = Roster::new(
            TeamId::B,
            vec![creature(3, TeamId::B, 5), creature(4, TeamId::B, 5)],
        );
        assert_eq!(roster.index_of(CreatureId::new(4)), Some(1));
        assert_eq!(roster.index_of(CreatureId::new(9)), None);
        assert!(roster.remove(CreatureId::new(9)).is_none());
        assert!(roster.remove(CreatureId::new(3)).is_some());
        assert_eq!(roster.index_of(CreatureId::new(4)), Some(0));
    }

    #[test]
    fn remove_dead_keeps_living_members_in_order() {
        let mut roster = Roster::new(
            TeamId::A,
            vec![
                creature(1, TeamId::A, 5),
                creature(2, TeamId::A, 5),
                creature(3, TeamId::A, 5),
            ],
        );
        if let Some(victim) = roster.get_mut(CreatureId::new(2)) {
            let _ = victim.apply_damage(99);
        }

        let dead = roster.remove_dead();

        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id(), CreatureId::new(2));
        let remaining: Vec<_> = roster.iter().map(Creature::id).collect();
        assert_eq!(remaining, vec![CreatureId::new(1), CreatureId::new(3)]);
    }

    #[test]
    fn battle_ended_event_round_trips_through_bincode() {
        let event = Event::BattleEnded {
            state: BattleState::Draw(DrawReason::RoundCap),
            round: 200,
        };
        let bytes = bincode::serialize(&event).expect("serialize");
        let restored: Event = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, event);
    }
}
