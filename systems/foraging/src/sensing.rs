//! Randomised forward-biased sampling of the marker grid.

use ant_colony_core::{MarkerField, MarkerKind, RandomSource};
use glam::Vec2;

use crate::tuning::SensingTuning;

/// Outcome of one sensing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sensed {
    /// No qualifying sample carried any intensity.
    Nothing,
    /// A permanent cell of the sensed kind was found; sampling stopped there.
    Permanent {
        /// Unit vector from the agent toward the sampled point.
        direction: Vec2,
    },
    /// Strongest trail seen among the qualifying samples.
    Trail {
        /// Unit vector from the agent toward the sampled point.
        direction: Vec2,
        /// Column of the winning cell.
        column: u32,
        /// Row of the winning cell.
        row: u32,
    },
}

/// Square block of marker cells a sensing pass draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Region {
    min_column: u32,
    max_column: u32,
    min_row: u32,
    max_row: u32,
}

impl Region {
    /// Cells within `radius` of `position`, keeping a one-cell margin away
    /// from the grid edges. `None` when nothing remains after clipping.
    fn around(position: Vec2, radius: f32, cell_size: f32, dimensions: (u32, u32)) -> Option<Self> {
        if !position.is_finite() || !(cell_size > 0.0) {
            return None;
        }
        let radius_cells = (radius / cell_size) as i64;
        let column = (position.x / cell_size) as i64;
        let row = (position.y / cell_size) as i64;

        let min_column = (column - radius_cells).max(1);
        let min_row = (row - radius_cells).max(1);
        let max_column = (column + radius_cells).min(i64::from(dimensions.0) - 2);
        let max_row = (row + radius_cells).min(i64::from(dimensions.1) - 2);
        if min_column > max_column || min_row > max_row {
            return None;
        }

        Some(Self {
            min_column: u32::try_from(min_column).ok()?,
            max_column: u32::try_from(max_column).ok()?,
            min_row: u32::try_from(min_row).ok()?,
            max_row: u32::try_from(max_row).ok()?,
        })
    }
}

/// Draws up to `tuning.sample_count` cells around `position` and reports the
/// direction worth following for markers of `kind`.
///
/// Only samples closer than `max_distance` whose direction lines up with
/// `heading` beyond `alignment_threshold` qualify. A permanent cell ends the
/// pass at once. Every other qualifying sample ends it with probability
/// `liberty`, keeping whatever was found before.
pub fn sense<M, R>(
    markers: &M,
    position: Vec2,
    heading: Vec2,
    kind: MarkerKind,
    tuning: &SensingTuning,
    liberty: f32,
    rng: &mut R,
) -> Sensed
where
    M: MarkerField + ?Sized,
    R: RandomSource + ?Sized,
{
    let cell_size = markers.cell_size();
    let Some(region) = Region::around(
        position,
        tuning.search_radius,
        cell_size,
        markers.dimensions(),
    ) else {
        return Sensed::Nothing;
    };

    let mut best = Sensed::Nothing;
    let mut max_intensity = 0.0;
    for _ in 0..tuning.sample_count {
        let column = rng.index_in(region.min_column, region.max_column);
        let row = rng.index_in(region.min_row, region.max_row);
        let jitter = Vec2::new(rng.unit(), rng.unit());
        let sample = cell_size * (Vec2::new(column as f32, row as f32) + jitter);

        let offset = sample - position;
        let length = offset.length();
        if !(length > 0.0) || length >= tuning.max_distance {
            continue;
        }
        let direction = offset / length;
        if direction.dot(heading) <= tuning.alignment_threshold {
            continue;
        }
        let Some(cell) = markers.cell(column, row) else {
            continue;
        };

        if cell.is_permanent(kind) {
            best = Sensed::Permanent { direction };
            break;
        }
        let intensity = cell.intensity(kind);
        if intensity > max_intensity {
            max_intensity = intensity;
            best = Sensed::Trail {
                direction,
                column,
                row,
            };
        }
        if rng.chance(liberty) {
            break;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_clipped_to_the_interior_of_the_grid() {
        let region = Region::around(Vec2::new(6.0, 70.0), 32.0, 4.0, (20, 20));
        assert_eq!(
            region,
            Some(Region {
                min_column: 1,
                max_column: 9,
                min_row: 9,
                max_row: 18,
            })
        );
    }

    #[test]
    fn tiny_grids_have_no_region() {
        assert_eq!(Region::around(Vec2::new(2.0, 2.0), 32.0, 4.0, (2, 2)), None);
        assert_eq!(Region::around(Vec2::new(2.0, 2.0), 32.0, 0.0, (20, 20)), None);
        assert_eq!(
            Region::around(Vec2::new(f32::NAN, 2.0), 32.0, 4.0, (20, 20)),
            None
        );
    }

    #[test]
    fn far_outside_positions_have_no_region() {
        assert_eq!(
            Region::around(Vec2::new(400.0, 40.0), 32.0, 4.0, (20, 20)),
            None
        );
    }
}
