//! Shortest path search used by the arena for target acquisition.

use std::collections::VecDeque;

use skirmish_core::CellCoord;

/// Offsets `(column, row)` of the eight neighbours, in expansion order.
///
/// Breadth-first search breaks ties between equally short paths by this order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Cells visited by a shortest path, source first and destination last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Number of unit steps between source and destination.
    #[must_use]
    pub fn distance(&self) -> u32 {
        u32::try_from(self.cells.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Cell entered by the first step, or `None` for a zero-length path.
    #[must_use]
    pub fn first_step(&self) -> Option<CellCoord> {
        self.cells.get(1).copied()
    }

    /// Final cell of the path.
    #[must_use]
    pub fn destination(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Every cell of the path in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }
}

/// Finds a minimum-length 8-directional path between two cells.
///
/// Every move costs one step, so the first time the breadth-first search
/// discovers the destination it has found a shortest path. Returns `None`
/// when the grid is empty, either endpoint lies outside it or is blocked, or
/// the destination cannot be reached. The predicate is only read.
pub fn shortest_path<F>(
    columns: u32,
    rows: u32,
    source: CellCoord,
    destination: CellCoord,
    mut is_blocked: F,
) -> Option<Path>
where
    F: FnMut(CellCoord) -> bool,
{
    let width = usize::try_from(columns).ok()?;
    let height = usize::try_from(rows).ok()?;
    let cell_count = width.checked_mul(height)?;
    if cell_count == 0 {
        return None;
    }

    let source_index = index(columns, rows, source)?;
    let _ = index(columns, rows, destination)?;

    if is_blocked(source) || is_blocked(destination) {
        return None;
    }

    if source == destination {
        return Some(Path {
            cells: vec![source],
        });
    }

    let mut parents: Vec<Option<usize>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    visited[source_index] = true;

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(cell) = queue.pop_front() {
        let Some(current_index) = index(columns, rows, cell) else {
            continue;
        };

        for neighbor in neighbors(cell, columns, rows) {
            let Some(neighbor_index) = index(columns, rows, neighbor) else {
                continue;
            };

            if visited[neighbor_index] || is_blocked(neighbor) {
                continue;
            }

            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(current_index);

            if neighbor == destination {
                return reconstruct(&parents, width, neighbor_index);
            }

            queue.push_back(neighbor);
        }
    }

    None
}

fn reconstruct(parents: &[Option<usize>], width: usize, destination: usize) -> Option<Path> {
    let mut cells = vec![coord(width, destination)?];
    let mut current = destination;
    while let Some(parent) = parents.get(current).copied().flatten() {
        cells.push(coord(width, parent)?);
        current = parent;
    }
    cells.reverse();
    Some(Path { cells })
}

fn neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    NEIGHBOR_OFFSETS
        .into_iter()
        .filter_map(move |(column, row)| cell.offset(column, row))
        .filter(move |neighbor| neighbor.column() < columns && neighbor.row() < rows)
}

fn index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() >= columns || cell.row() >= rows {
        return None;
    }
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    let width = usize::try_from(columns).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn coord(width: usize, index: usize) -> Option<CellCoord> {
    let column = u32::try_from(index % width).ok()?;
    let row = u32::try_from(index / width).ok()?;
    Some(CellCoord::new(column, row))
}
