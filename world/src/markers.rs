//! Pheromone marker grid shared by every agent of the colony.

use ant_colony_core::{CellCoord, MarkerCell, MarkerDeposit, MarkerField, MarkerKind};
use glam::Vec2;

/// Intensities below this value are cleared during evaporation.
pub const EVAPORATION_FLOOR: f32 = 0.01;

/// Dense grid of marker cells.
#[derive(Clone, Debug)]
pub struct MarkerGrid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    cells: Vec<MarkerCell>,
}

impl MarkerGrid {
    pub(crate) fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cell_size,
            cells: vec![MarkerCell::default(); capacity],
        }
    }

    /// Cell containing the provided world-space position.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<&MarkerCell> {
        let cell = CellCoord::from_position(position, self.cell_size);
        self.index(cell).map(|index| &self.cells[index])
    }

    /// Decays every non-permanent intensity by `factor`.
    pub(crate) fn evaporate(&mut self, factor: f32) {
        for cell in &mut self.cells {
            cell.evaporate(factor, EVAPORATION_FLOOR);
        }
    }

    /// Flags or clears the permanent marker of `kind` for every cell whose
    /// centre lies within `radius` of `position`, and for the cell containing
    /// `position` itself.
    pub(crate) fn mark_permanent(
        &mut self,
        position: Vec2,
        radius: f32,
        kind: MarkerKind,
        permanent: bool,
    ) {
        let min = CellCoord::from_position(position - Vec2::splat(radius), self.cell_size);
        let max = CellCoord::from_position(position + Vec2::splat(radius), self.cell_size);
        let centre = CellCoord::from_position(position, self.cell_size);
        for row in min.row().max(0)..=max.row() {
            for column in min.column().max(0)..=max.column() {
                let cell = CellCoord::new(column, row);
                let within = cell.center(self.cell_size).distance(position) <= radius;
                if !within && cell != centre {
                    continue;
                }
                if let Some(index) = self.index(cell) {
                    self.cells[index].set_permanent(kind, permanent);
                }
            }
        }
    }

    /// Iterates over every cell that carries intensity or a permanent flag.
    pub fn active_cells(&self) -> impl Iterator<Item = (CellCoord, &MarkerCell)> + '_ {
        let columns = self.columns.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(index, cell)| {
                (
                    CellCoord::new((index % columns) as i32, (index / columns) as i32),
                    cell,
                )
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

impl MarkerField for MarkerGrid {
    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn cell(&self, column: u32, row: u32) -> Option<&MarkerCell> {
        let index = self.index(CellCoord::new(column as i32, row as i32))?;
        self.cells.get(index)
    }

    fn cell_mut(&mut self, column: u32, row: u32) -> Option<&mut MarkerCell> {
        let index = self.index(CellCoord::new(column as i32, row as i32))?;
        self.cells.get_mut(index)
    }

    fn deposit(&mut self, deposit: MarkerDeposit) {
        let cell = CellCoord::from_position(deposit.position(), self.cell_size);
        if let Some(index) = self.index(cell) {
            self.cells[index].reinforce(deposit.kind(), deposit.intensity());
        }
    }
}
