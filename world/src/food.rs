//! Food sources and the spatial hash agents query for pickups.

use ant_colony_core::{CellCoord, FoodId, FoodQuery, FoodSpot};
use glam::Vec2;

/// Finite food source registered with the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodSource {
    id: FoodId,
    position: Vec2,
    radius: f32,
    quantity: u32,
}

impl FoodSource {
    /// Identifier assigned when the source was placed.
    #[must_use]
    pub const fn id(&self) -> FoodId {
        self.id
    }

    /// Centre of the source.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Pickup radius around the centre.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Units still available for pickup.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Reports whether every unit has been taken.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.quantity == 0
    }

    fn spot(&self) -> FoodSpot {
        FoodSpot {
            id: self.id,
            position: self.position,
            radius: self.radius,
        }
    }
}

/// Spatial hash of live food sources.
///
/// Each source is registered in every bucket its bounding square overlaps, so
/// a lookup only needs the bucket containing the queried position.
#[derive(Clone, Debug)]
pub struct FoodGrid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    buckets: Vec<Vec<FoodSpot>>,
    sources: Vec<FoodSource>,
    next_id: u32,
}

impl FoodGrid {
    pub(crate) fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cell_size,
            buckets: vec![Vec::new(); capacity],
            sources: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a new source and returns its identifier.
    pub(crate) fn insert(&mut self, position: Vec2, radius: f32, quantity: u32) -> FoodId {
        let id = FoodId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let source = FoodSource {
            id,
            position,
            radius,
            quantity,
        };
        self.sources.push(source);

        let spot = source.spot();
        for index in self.covered_buckets(position, radius) {
            self.buckets[index].push(spot);
        }
        id
    }

    /// Every registered source that has not been retired yet.
    #[must_use]
    pub fn sources(&self) -> &[FoodSource] {
        &self.sources
    }

    /// Looks up a source by identifier.
    #[must_use]
    pub fn source(&self, id: FoodId) -> Option<&FoodSource> {
        self.sources.iter().find(|source| source.id == id)
    }

    /// Removes depleted sources from the registry and returns them.
    pub(crate) fn retire_depleted(&mut self) -> Vec<FoodSource> {
        let mut retired = Vec::new();
        self.sources.retain(|source| {
            if source.is_depleted() {
                retired.push(*source);
                false
            } else {
                true
            }
        });
        retired
    }

    fn covered_buckets(&self, position: Vec2, radius: f32) -> Vec<usize> {
        let min = CellCoord::from_position(position - Vec2::splat(radius), self.cell_size);
        let max = CellCoord::from_position(position + Vec2::splat(radius), self.cell_size);
        let mut indices = Vec::new();
        for row in min.row().max(0)..=max.row() {
            for column in min.column().max(0)..=max.column() {
                if let Some(index) = self.index(CellCoord::new(column, row)) {
                    indices.push(index);
                }
            }
        }
        indices
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

impl FoodQuery for FoodGrid {
    fn food_near(&self, position: Vec2) -> &[FoodSpot] {
        match self.index(CellCoord::from_position(position, self.cell_size)) {
            Some(index) => &self.buckets[index],
            None => &[],
        }
    }

    fn pick(&mut self, food: FoodId) -> bool {
        let Some(source) = self.sources.iter_mut().find(|source| source.id == food) else {
            return false;
        };
        if source.quantity == 0 {
            return false;
        }
        source.quantity -= 1;
        if source.quantity == 0 {
            for bucket in &mut self.buckets {
                bucket.retain(|spot| spot.id != food);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_are_found_from_every_overlapped_bucket() {
        let mut grid = FoodGrid::new(10, 10, 20.0);
        let id = grid.insert(Vec2::new(40.0, 40.0), 5.0, 3);

        for probe in [
            Vec2::new(36.0, 36.0),
            Vec2::new(44.0, 36.0),
            Vec2::new(36.0, 44.0),
            Vec2::new(44.0, 44.0),
        ] {
            let near = grid.food_near(probe);
            assert_eq!(near.len(), 1);
            assert_eq!(near[0].id, id);
        }
        assert!(grid.food_near(Vec2::new(100.0, 100.0)).is_empty());
        assert!(grid.food_near(Vec2::new(-5.0, 40.0)).is_empty());
    }

    #[test]
    fn picking_decrements_until_the_source_disappears() {
        let mut grid = FoodGrid::new(4, 4, 20.0);
        let id = grid.insert(Vec2::new(30.0, 30.0), 4.0, 2);

        assert!(grid.pick(id));
        assert_eq!(grid.source(id).map(FoodSource::quantity), Some(1));
        assert!(grid.pick(id));
        assert!(!grid.pick(id));
        assert_eq!(grid.source(id).map(FoodSource::quantity), Some(0));
        assert!(grid.food_near(Vec2::new(30.0, 30.0)).is_empty());

        let retired = grid.retire_depleted();
        assert_eq!(retired.len(), 1);
        assert!(grid.sources().is_empty());
        assert!(grid.retire_depleted().is_empty());
    }

    #[test]
    fn picking_unknown_food_fails() {
        let mut grid = FoodGrid::new(2, 2, 10.0);
        assert!(!grid.pick(FoodId::new(9)));
    }
}
