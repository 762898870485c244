#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state for Skirmish battles.
//!
//! The [`Arena`] owns the occupancy grid and the mapping from each living
//! creature to the cell it stands on. Creatures themselves stay owned by
//! their team rosters; the arena mirrors their position and writes every
//! change back into the creature it was handed.

pub mod navigation;

use std::collections::BTreeMap;

use rand::Rng;
use skirmish_core::{
    Action, CellCoord, Creature, CreatureId, Event, PlacementError, Roster, SetupError,
};
use tracing::debug;

use crate::navigation::{shortest_path, Path};

/// Side length of the square arena used when nothing else is configured.
pub const DEFAULT_ARENA_SIZE: u32 = 10;

/// Dimensions and static walls of an arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    columns: u32,
    rows: u32,
    walls: Vec<CellCoord>,
}

impl ArenaConfig {
    /// Creates a configuration for a wall-free grid.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            walls: Vec::new(),
        }
    }

    /// Creates a configuration for a wall-free square grid.
    #[must_use]
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Adds permanently blocked cells to the configuration.
    #[must_use]
    pub fn with_walls(mut self, walls: impl IntoIterator<Item = CellCoord>) -> Self {
        self.walls.extend(walls);
        self
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cells blocked for the whole battle.
    #[must_use]
    pub fn walls(&self) -> &[CellCoord] {
        &self.walls
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::square(DEFAULT_ARENA_SIZE)
    }
}

/// Grid and creature positions for one battle.
#[derive(Clone, Debug)]
pub struct Arena {
    grid: OccupancyGrid,
    positions: BTreeMap<CreatureId, CellCoord>,
}

impl Arena {
    /// Builds an empty arena from its configuration.
    pub fn new(config: &ArenaConfig) -> Result<Self, SetupError> {
        if config.columns() == 0 || config.rows() == 0 {
            return Err(SetupError::EmptyGrid);
        }

        let mut grid = OccupancyGrid::new(config.columns(), config.rows());
        for &wall in config.walls() {
            if !grid.set_wall(wall) {
                return Err(SetupError::WallOutOfBounds(wall));
            }
        }

        Ok(Self {
            grid,
            positions: BTreeMap::new(),
        })
    }

    /// Places both teams on uniformly random free cells.
    ///
    /// Team A is placed first, each roster in order. Cells are drawn by
    /// rejection sampling, which only starts once the grid is known to hold
    /// enough free cells for every creature.
    pub fn spawn_teams<R: Rng>(
        &mut self,
        team_a: &mut Roster,
        team_b: &mut Roster,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) -> Result<(), SetupError> {
        let required = team_a.len() + team_b.len();
        let available = self.grid.free_count();
        if required > available {
            return Err(SetupError::InsufficientCells {
                required,
                available,
            });
        }

        let (columns, rows) = self.grid.dimensions();
        for creature in team_a.iter_mut().chain(team_b.iter_mut()) {
            loop {
                let cell = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
                if !self.grid.can_enter(cell) {
                    continue;
                }
                self.occupy(creature, cell);
                out.push(Event::CreaturePlaced {
                    creature: creature.id(),
                    cell,
                });
                break;
            }
        }

        debug!(creatures = required, "teams spawned");
        Ok(())
    }

    /// Puts a creature on a chosen cell.
    ///
    /// A creature that already stands in the arena leaves its previous cell.
    pub fn place(&mut self, creature: &mut Creature, cell: CellCoord) -> Result<(), PlacementError> {
        if self.grid.index(cell).is_none() {
            return Err(PlacementError::OutOfBounds(cell));
        }
        if !self.grid.can_enter(cell) {
            return Err(PlacementError::Occupied(cell));
        }
        if let Some(previous) = self.positions.get(&creature.id()).copied() {
            self.grid.vacate(previous);
        }
        self.occupy(creature, cell);
        Ok(())
    }

    /// Decides what `attacker` does with its action against `enemies`.
    ///
    /// The nearest living enemy is the one with the shortest path, the first
    /// in roster order winning ties. An attacker with no weapon reaching that
    /// distance steps one cell along the path and does not attack. Otherwise
    /// the attacker stays put and targets the nearest enemy, or, when it owns
    /// a ranged weapon, a uniformly random reachable enemy within reach.
    pub fn find_target<R: Rng>(
        &mut self,
        attacker: &mut Creature,
        enemies: &Roster,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) -> Action {
        let source = attacker.cell();
        let mut reachable: Vec<(CreatureId, u32)> = Vec::new();
        let mut nearest: Option<(CreatureId, Path)> = None;

        for enemy in enemies.living() {
            let Some(path) = self.path_between(source, enemy.cell()) else {
                continue;
            };
            reachable.push((enemy.id(), path.distance()));

            let closer = nearest
                .as_ref()
                .map_or(true, |(_, best)| path.distance() < best.distance());
            if closer {
                nearest = Some((enemy.id(), path));
            }
        }

        let Some((nearest_id, path)) = nearest else {
            debug!(creature = attacker.id().get(), "no reachable enemy");
            return Action::Hold;
        };

        if !attacker.can_reach(path.distance()) {
            return match path.first_step() {
                Some(step) if Some(step) != path.destination() => {
                    self.relocate(attacker, step);
                    out.push(Event::CreatureMoved {
                        creature: attacker.id(),
                        from: source,
                        to: step,
                    });
                    Action::Advance {
                        from: source,
                        to: step,
                    }
                }
                _ => Action::Hold,
            };
        }

        if attacker.has_ranged_weapon() {
            let in_reach: Vec<CreatureId> = reachable
                .iter()
                .filter(|(_, distance)| attacker.can_reach(*distance))
                .map(|(id, _)| *id)
                .collect();
            if !in_reach.is_empty() {
                let target = in_reach[rng.gen_range(0..in_reach.len())];
                return Action::Attack { target };
            }
        }

        Action::Attack { target: nearest_id }
    }

    /// Frees a cell, dropping the position of the creature that stood there.
    pub fn release_position(&mut self, cell: CellCoord) -> Option<CreatureId> {
        let occupant = self.grid.occupant(cell)?;
        self.grid.vacate(cell);
        let _ = self.positions.remove(&occupant);
        Some(occupant)
    }

    /// Shortest path between two cells, treating both endpoints as free.
    #[must_use]
    pub fn path_between(&self, from: CellCoord, to: CellCoord) -> Option<Path> {
        let (columns, rows) = self.grid.dimensions();
        shortest_path(columns, rows, from, to, |cell| {
            cell != from && cell != to && !self.grid.can_enter(cell)
        })
    }

    /// Cell currently held by a creature.
    #[must_use]
    pub fn position(&self, creature: CreatureId) -> Option<CellCoord> {
        self.positions.get(&creature).copied()
    }

    /// Creature standing on a cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<CreatureId> {
        self.grid.occupant(cell)
    }

    /// Reports whether a cell is a wall, holds a creature, or lies outside.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        !self.grid.can_enter(cell)
    }

    /// Dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.grid.dimensions()
    }

    /// Number of cells that are neither walls nor occupied.
    #[must_use]
    pub fn free_cell_count(&self) -> usize {
        self.grid.free_count()
    }

    /// Iterator over placed creatures and their cells, ordered by identifier.
    pub fn positions(&self) -> impl Iterator<Item = (CreatureId, CellCoord)> + '_ {
        self.positions.iter().map(|(id, cell)| (*id, *cell))
    }

    fn occupy(&mut self, creature: &mut Creature, cell: CellCoord) {
        self.grid.occupy(creature.id(), cell);
        let _ = self.positions.insert(creature.id(), cell);
        creature.place(cell);
    }

    fn relocate(&mut self, creature: &mut Creature, to: CellCoord) {
        let from = creature.cell();
        debug!(creature = creature.id().get(), %from, %to, "advancing");
        self.grid.vacate(from);
        self.occupy(creature, to);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Free,
    Wall,
    Occupied(CreatureId),
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl OccupancyGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![Cell::Free; capacity],
        }
    }

    fn set_wall(&mut self, cell: CellCoord) -> bool {
        match self.slot_mut(cell) {
            Some(slot) => {
                *slot = Cell::Wall;
                true
            }
            None => false,
        }
    }

    fn can_enter(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .is_some_and(|slot| *slot == Cell::Free)
    }

    fn occupant(&self, cell: CellCoord) -> Option<CreatureId> {
        match self.cells.get(self.index(cell)?) {
            Some(Cell::Occupied(id)) => Some(*id),
            _ => None,
        }
    }

    fn occupy(&mut self, creature: CreatureId, cell: CellCoord) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = Cell::Occupied(creature);
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(slot) = self.slot_mut(cell) {
            if matches!(slot, Cell::Occupied(_)) {
                *slot = Cell::Free;
            }
        }
    }

    fn free_count(&self) -> usize {
        self.cells.iter().filter(|slot| **slot == Cell::Free).count()
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut Cell> {
        let index = self.index(cell)?;
        self.cells.get_mut(index)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirmish_core::{CombatStats, DamageDice, RangeClass, TeamId, Weapon};

    fn bite() -> Weapon {
        Weapon::new("Bite", DamageDice::new(2, 4, 2), RangeClass::Melee)
    }

    fn bow() -> Weapon {
        Weapon::new("Longbow", DamageDice::new(1, 8, 3), RangeClass::Ranged)
    }

    fn creature(id: u32, team: TeamId, weapons: Vec<Weapon>) -> Creature {
        Creature::new(
            CreatureId::new(id),
            format!("creature{id}"),
            team,
            CombatStats {
                armor_class: 13,
                attack_bonus: 4,
                initiative_bonus: 2,
                speed: 8,
            },
            10,
            weapons,
        )
    }

    fn roster_of(team: TeamId, creatures: Vec<Creature>) -> Roster {
        Roster::new(team, creatures)
    }

    fn placed(arena: &mut Arena, mut creature: Creature, cell: CellCoord) -> Creature {
        arena.place(&mut creature, cell).expect("cell is free");
        creature
    }

    #[test]
    fn new_rejects_empty_grid_and_stray_walls() {
        assert_eq!(
            Arena::new(&ArenaConfig::new(0, 4)).err(),
            Some(SetupError::EmptyGrid)
        );
        let stray = CellCoord::new(3, 0);
        assert_eq!(
            Arena::new(&ArenaConfig::square(3).with_walls([stray])).err(),
            Some(SetupError::WallOutOfBounds(stray))
        );
    }

    #[test]
    fn spawn_assigns_distinct_free_cells() {
        let mut arena = Arena::new(&ArenaConfig::square(4).with_walls([CellCoord::new(0, 0)]))
            .expect("valid arena");
        let mut team_a = roster_of(
            TeamId::A,
            (0..5).map(|id| creature(id, TeamId::A, vec![bite()])).collect(),
        );
        let mut team_b = roster_of(
            TeamId::B,
            (5..10).map(|id| creature(id, TeamId::B, vec![bite()])).collect(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut events = Vec::new();

        arena
            .spawn_teams(&mut team_a, &mut team_b, &mut rng, &mut events)
            .expect("enough room");

        assert_eq!(events.len(), 10);
        let mut cells: Vec<CellCoord> = team_a.iter().chain(team_b.iter()).map(Creature::cell).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 10);
        assert!(!cells.contains(&CellCoord::new(0, 0)));
        for creature in team_a.iter().chain(team_b.iter()) {
            assert_eq!(arena.position(creature.id()), Some(creature.cell()));
            assert_eq!(arena.occupant(creature.cell()), Some(creature.id()));
        }
        assert_eq!(arena.free_cell_count(), 5);
    }

    #[test]
    fn spawn_fails_fast_when_grid_is_too_small() {
        let mut arena = Arena::new(&ArenaConfig::square(2)).expect("valid arena");
        let mut team_a = roster_of(
            TeamId::A,
            (0..3).map(|id| creature(id, TeamId::A, vec![bite()])).collect(),
        );
        let mut team_b = roster_of(
            TeamId::B,
            (3..5).map(|id| creature(id, TeamId::B, vec![bite()])).collect(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();

        let result = arena.spawn_teams(&mut team_a, &mut team_b, &mut rng, &mut events);

        assert_eq!(
            result,
            Err(SetupError::InsufficientCells {
                required: 5,
                available: 4,
            })
        );
        assert!(events.is_empty());
    }

    #[test]
    fn melee_attacker_advances_one_step_without_attacking() {
        let mut arena = Arena::new(&ArenaConfig::square(6)).expect("valid arena");
        let mut wolf = placed(&mut arena, creature(1, TeamId::A, vec![bite()]), CellCoord::new(0, 0));
        let enemy = placed(&mut arena, creature(2, TeamId::B, vec![bite()]), CellCoord::new(4, 0));
        let enemies = roster_of(TeamId::B, vec![enemy]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = Vec::new();

        let action = arena.find_target(&mut wolf, &enemies, &mut rng, &mut events);

        let Action::Advance { from, to } = action else {
            panic!("expected an advance, got {action:?}");
        };
        assert_eq!(from, CellCoord::new(0, 0));
        assert_eq!(from.chebyshev_distance(to), 1);
        assert_eq!(to.chebyshev_distance(CellCoord::new(4, 0)), 3);
        assert_eq!(wolf.cell(), to);
        assert_eq!(arena.occupant(to), Some(wolf.id()));
        assert_eq!(arena.occupant(from), None);
        assert_eq!(
            events,
            vec![Event::CreatureMoved {
                creature: wolf.id(),
                from,
                to,
            }]
        );
    }

    #[test]
    fn adjacent_melee_attacker_targets_nearest_enemy() {
        let mut arena = Arena::new(&ArenaConfig::square(6)).expect("valid arena");
        let mut wolf = placed(&mut arena, creature(1, TeamId::A, vec![bite()]), CellCoord::new(2, 2));
        let far = placed(&mut arena, creature(2, TeamId::B, vec![bite()]), CellCoord::new(5, 5));
        let near = placed(&mut arena, creature(3, TeamId::B, vec![bite()]), CellCoord::new(3, 3));
        let enemies = roster_of(TeamId::B, vec![far, near]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = Vec::new();

        let action = arena.find_target(&mut wolf, &enemies, &mut rng, &mut events);

        assert_eq!(
            action,
            Action::Attack {
                target: CreatureId::new(3)
            }
        );
        assert!(events.is_empty());
        assert_eq!(wolf.cell(), CellCoord::new(2, 2));
    }

    #[test]
    fn equal_distances_prefer_roster_order() {
        let mut arena = Arena::new(&ArenaConfig::square(5)).expect("valid arena");
        let mut wolf = placed(&mut arena, creature(1, TeamId::A, vec![bite()]), CellCoord::new(2, 2));
        let first = placed(&mut arena, creature(2, TeamId::B, vec![bite()]), CellCoord::new(3, 2));
        let second = placed(&mut arena, creature(3, TeamId::B, vec![bite()]), CellCoord::new(1, 2));
        let enemies = roster_of(TeamId::B, vec![first, second]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut events = Vec::new();

        let action = arena.find_target(&mut wolf, &enemies, &mut rng, &mut events);

        assert_eq!(
            action,
            Action::Attack {
                target: CreatureId::new(2)
            }
        );
    }

    #[test]
    fn ranged_attacker_fires_without_moving() {
        let mut arena = Arena::new(&ArenaConfig::square(10)).expect("valid arena");
        let mut archer = placed(
            &mut arena,
            creature(1, TeamId::B, vec![bow()]),
            CellCoord::new(0, 0),
        );
        let wolf = placed(&mut arena, creature(2, TeamId::A, vec![bite()]), CellCoord::new(9, 9));
        let enemies = roster_of(TeamId::A, vec![wolf]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut events = Vec::new();

        let action = arena.find_target(&mut archer, &enemies, &mut rng, &mut events);

        assert_eq!(
            action,
            Action::Attack {
                target: CreatureId::new(2)
            }
        );
        assert!(events.is_empty());
        assert_eq!(archer.cell(), CellCoord::new(0, 0));
    }

    #[test]
    fn walled_off_enemies_leave_attacker_holding() {
        let walls = [CellCoord::new(1, 0), CellCoord::new(1, 1), CellCoord::new(0, 1)];
        let mut arena =
            Arena::new(&ArenaConfig::square(4).with_walls(walls)).expect("valid arena");
        let mut wolf = placed(&mut arena, creature(1, TeamId::A, vec![bite()]), CellCoord::new(0, 0));
        let enemy = placed(&mut arena, creature(2, TeamId::B, vec![bite()]), CellCoord::new(3, 3));
        let enemies = roster_of(TeamId::B, vec![enemy]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut events = Vec::new();

        let action = arena.find_target(&mut wolf, &enemies, &mut rng, &mut events);

        assert_eq!(action, Action::Hold);
        assert!(events.is_empty());
        assert_eq!(
            arena.find_target(
                &mut wolf,
                &roster_of(TeamId::B, Vec::new()),
                &mut rng,
                &mut events
            ),
            Action::Hold
        );
    }

    #[test]
    fn dead_enemies_are_ignored() {
        let mut arena = Arena::new(&ArenaConfig::square(5)).expect("valid arena");
        let mut wolf = placed(&mut arena, creature(1, TeamId::A, vec![bite()]), CellCoord::new(0, 0));
        let mut corpse = placed(&mut arena, creature(2, TeamId::B, vec![bite()]), CellCoord::new(1, 1));
        let _ = corpse.apply_damage(100);
        let living = placed(&mut arena, creature(3, TeamId::B, vec![bite()]), CellCoord::new(1, 0));
        let enemies = roster_of(TeamId::B, vec![corpse, living]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut events = Vec::new();

        let action = arena.find_target(&mut wolf, &enemies, &mut rng, &mut events);

        assert_eq!(
            action,
            Action::Attack {
                target: CreatureId::new(3)
            }
        );
    }

    #[test]
    fn release_position_frees_the_cell() {
        let mut arena = Arena::new(&ArenaConfig::square(3)).expect("valid arena");
        let wolf = placed(&mut arena, creature(1, TeamId::A, vec![bite()]), CellCoord::new(1, 1));

        assert!(arena.is_blocked(wolf.cell()));
        assert_eq!(arena.release_position(wolf.cell()), Some(wolf.id()));
        assert!(!arena.is_blocked(wolf.cell()));
        assert_eq!(arena.position(wolf.id()), None);
        assert_eq!(arena.release_position(wolf.cell()), None);
    }

    #[test]
    fn place_rejects_taken_and_outside_cells() {
        let mut arena =
            Arena::new(&ArenaConfig::square(3).with_walls([CellCoord::new(0, 0)])).expect("valid arena");
        let mut wolf = creature(1, TeamId::A, vec![bite()]);

        assert_eq!(
            arena.place(&mut wolf, CellCoord::new(0, 0)),
            Err(PlacementError::Occupied(CellCoord::new(0, 0)))
        );
        assert_eq!(
            arena.place(&mut wolf, CellCoord::new(5, 0)),
            Err(PlacementError::OutOfBounds(CellCoord::new(5, 0)))
        );
        assert_eq!(arena.release_position(CellCoord::new(0, 0)), None);
        assert!(arena.is_blocked(CellCoord::new(0, 0)), "walls are never released");
    }

    #[test]
    fn placing_again_moves_the_creature() {
        let mut arena = Arena::new(&ArenaConfig::square(3)).expect("valid arena");
        let mut wolf = creature(1, TeamId::A, vec![bite()]);

        arena.place(&mut wolf, CellCoord::new(0, 0)).expect("free cell");
        arena.place(&mut wolf, CellCoord::new(2, 2)).expect("free cell");

        assert_eq!(arena.occupant(CellCoord::new(0, 0)), None);
        assert_eq!(arena.occupant(CellCoord::new(2, 2)), Some(wolf.id()));
        assert_eq!(arena.position(wolf.id()), Some(CellCoord::new(2, 2)));
        assert_eq!(wolf.cell(), CellCoord::new(2, 2));
        assert_eq!(arena.free_cell_count(), 8);
        assert_eq!(
            arena.positions().collect::<Vec<_>>(),
            vec![(wolf.id(), CellCoord::new(2, 2))]
        );
    }

    #[test]
    fn ranged_attacker_spreads_fire_over_reachable_enemies() {
        let walls = [CellCoord::new(4, 4), CellCoord::new(4, 5), CellCoord::new(5, 4)];
        let mut arena =
            Arena::new(&ArenaConfig::square(6).with_walls(walls)).expect("valid arena");
        let mut archer = placed(&mut arena, creature(1, TeamId::B, vec![bow()]), CellCoord::new(0, 0));
        let near = placed(&mut arena, creature(2, TeamId::A, vec![bite()]), CellCoord::new(2, 2));
        let far = placed(&mut arena, creature(3, TeamId::A, vec![bite()]), CellCoord::new(5, 0));
        let enclosed = placed(&mut arena, creature(4, TeamId::A, vec![bite()]), CellCoord::new(5, 5));
        let mut corpse = placed(&mut arena, creature(5, TeamId::A, vec![bite()]), CellCoord::new(0, 3));
        let _ = corpse.apply_damage(100);
        let enemies = roster_of(TeamId::A, vec![near, far, enclosed, corpse]);
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut events = Vec::new();

        let mut picked = BTreeMap::new();
        for _ in 0..64 {
            let action = arena.find_target(&mut archer, &enemies, &mut rng, &mut events);
            let Action::Attack { target } = action else {
                panic!("archer should always fire, got {action:?}");
            };
            *picked.entry(target.get()).or_insert(0_u32) += 1;
        }

        assert!(events.is_empty());
        assert_eq!(archer.cell(), CellCoord::new(0, 0));
        assert_eq!(picked.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert!(picked[&3] > 0, "a farther enemy is chosen too");
    }
}
