//! Static wall layout stored as a dense grid of solid cells.

use ant_colony_core::{CellCoord, WallQuery};
use glam::Vec2;

/// Dense grid recording which cells are solid.
///
/// Cells outside the grid are never blocked; agents that leave the grid are
/// brought back by the arena bounds check instead.
#[derive(Clone, Debug)]
pub struct WallGrid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    solid: Vec<bool>,
}

impl WallGrid {
    /// Creates an empty wall grid.
    #[must_use]
    pub(crate) fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cell_size,
            solid: vec![false; capacity],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Marks the provided cell as solid. Returns `false` when the cell lies
    /// outside the grid.
    pub(crate) fn set_solid(&mut self, cell: CellCoord) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.solid[index] = true;
                true
            }
            None => false,
        }
    }

    /// Reports whether the provided cell is solid.
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.index(cell).map_or(false, |index| self.solid[index])
    }

    /// Iterates over every solid cell in row-major order.
    pub fn solid_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns.max(1) as usize;
        self.solid
            .iter()
            .enumerate()
            .filter(|(_, solid)| **solid)
            .map(move |(index, _)| {
                CellCoord::new((index % columns) as i32, (index / columns) as i32)
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(row as usize * self.columns as usize + column as usize)
    }
}

impl WallQuery for WallGrid {
    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn cell_coordinates(&self, position: Vec2) -> CellCoord {
        CellCoord::from_position(position, self.cell_size)
    }

    fn is_blocked(&self, position: Vec2) -> bool {
        self.is_solid(self.cell_coordinates(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_cells_block_positions_inside_them() {
        let mut walls = WallGrid::new(8, 8, 4.0);
        assert!(walls.set_solid(CellCoord::new(2, 3)));

        assert!(walls.is_blocked(Vec2::new(8.0, 12.0)));
        assert!(walls.is_blocked(Vec2::new(11.9, 15.9)));
        assert!(!walls.is_blocked(Vec2::new(12.0, 12.0)));
        assert_eq!(walls.solid_cells().collect::<Vec<_>>(), vec![CellCoord::new(2, 3)]);
    }

    #[test]
    fn cells_outside_the_grid_are_open_and_cannot_be_placed() {
        let mut walls = WallGrid::new(4, 4, 1.0);
        assert!(!walls.set_solid(CellCoord::new(-1, 0)));
        assert!(!walls.set_solid(CellCoord::new(4, 0)));
        assert!(!walls.is_blocked(Vec2::new(-3.0, 2.0)));
        assert!(!walls.is_blocked(Vec2::new(2.0, 99.0)));
    }
}
