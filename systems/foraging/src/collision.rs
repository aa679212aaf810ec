//! Wall surface normals and deflection.

use ant_colony_core::WallQuery;
use glam::Vec2;

/// Axis-aligned normal of the wall an agent at `origin` runs into while
/// travelling along `direction`.
///
/// Walks one step of a grid traversal from the agent's cell: whichever axis
/// boundary is reached first is the one crossed, and the normal opposes the
/// step on that axis. A zero direction component never reaches its boundary.
/// Returns `None` for zero-length or non-finite directions.
#[must_use]
pub fn wall_normal<W>(walls: &W, origin: Vec2, direction: Vec2) -> Option<Vec2>
where
    W: WallQuery + ?Sized,
{
    if !direction.is_finite() || !origin.is_finite() || direction == Vec2::ZERO {
        return None;
    }

    let cell_size = walls.cell_size();
    let cell = walls.cell_coordinates(origin);
    let step_x: f32 = if direction.x >= 0.0 { 1.0 } else { -1.0 };
    let step_y: f32 = if direction.y >= 0.0 { 1.0 } else { -1.0 };

    let t_x = boundary_distance(cell.column(), step_x, cell_size, origin.x, direction.x);
    let t_y = boundary_distance(cell.row(), step_y, cell_size, origin.y, direction.y);

    if t_x < t_y {
        Some(Vec2::new(-step_x, 0.0))
    } else {
        Some(Vec2::new(0.0, -step_y))
    }
}

fn boundary_distance(index: i32, step: f32, cell_size: f32, origin: f32, component: f32) -> f32 {
    if component == 0.0 {
        return f32::INFINITY;
    }
    let boundary_index = if step > 0.0 { index + 1 } else { index };
    (boundary_index as f32 * cell_size - origin) / component
}

/// Replaces each velocity component lying along `normal` with `factor` times
/// the normal's sign, then renormalises.
#[must_use]
pub fn deflect(velocity: Vec2, normal: Vec2, factor: f32) -> Vec2 {
    let x = if normal.x != 0.0 {
        factor * normal.x
    } else {
        velocity.x
    };
    let y = if normal.y != 0.0 {
        factor * normal.y
    } else {
        velocity.y
    };
    Vec2::new(x, y).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ant_colony_core::CellCoord;

    struct OpenGrid {
        cell_size: f32,
    }

    impl WallQuery for OpenGrid {
        fn cell_size(&self) -> f32 {
            self.cell_size
        }

        fn cell_coordinates(&self, position: Vec2) -> CellCoord {
            CellCoord::from_position(position, self.cell_size)
        }

        fn is_blocked(&self, _position: Vec2) -> bool {
            false
        }
    }

    const GRID: OpenGrid = OpenGrid { cell_size: 10.0 };

    #[test]
    fn horizontal_travel_hits_a_vertical_wall() {
        let normal = wall_normal(&GRID, Vec2::new(98.0, 50.0), Vec2::new(1.0, 0.0));
        assert_eq!(normal, Some(Vec2::new(-1.0, 0.0)));

        let normal = wall_normal(&GRID, Vec2::new(91.0, 50.0), Vec2::new(-1.0, 0.0));
        assert_eq!(normal, Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn vertical_travel_hits_a_horizontal_wall() {
        let normal = wall_normal(&GRID, Vec2::new(55.0, 58.0), Vec2::new(0.0, 1.0));
        assert_eq!(normal, Some(Vec2::new(0.0, -1.0)));

        let normal = wall_normal(&GRID, Vec2::new(55.0, 51.0), Vec2::new(0.0, -1.0));
        assert_eq!(normal, Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn diagonal_travel_picks_the_nearer_boundary() {
        let direction = Vec2::new(1.0, 1.0).normalize();
        let near_right = wall_normal(&GRID, Vec2::new(59.0, 52.0), direction);
        assert_eq!(near_right, Some(Vec2::new(-1.0, 0.0)));

        let near_bottom = wall_normal(&GRID, Vec2::new(52.0, 59.0), direction);
        assert_eq!(near_bottom, Some(Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn negative_cells_use_floor_indices() {
        let normal = wall_normal(&GRID, Vec2::new(-2.0, 5.0), Vec2::new(-1.0, 0.1));
        assert_eq!(normal, Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn degenerate_directions_have_no_normal() {
        assert_eq!(wall_normal(&GRID, Vec2::new(5.0, 5.0), Vec2::ZERO), None);
        assert_eq!(
            wall_normal(&GRID, Vec2::new(5.0, 5.0), Vec2::new(f32::NAN, 1.0)),
            None
        );
    }

    #[test]
    fn deflection_yields_a_unit_vector() {
        for (velocity, normal) in [
            (Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0)),
            (Vec2::new(0.6, 0.8), Vec2::new(-1.0, 0.0)),
            (Vec2::new(-0.8, -0.6), Vec2::new(0.0, 1.0)),
        ] {
            let deflected = deflect(velocity, normal, 0.1);
            assert!((deflected.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn deflection_flips_the_normal_axis_and_keeps_the_other() {
        let deflected = deflect(Vec2::new(0.6, 0.8), Vec2::new(-1.0, 0.0), 0.1);
        let expected = Vec2::new(-0.1, 0.8).normalize();
        assert!((deflected - expected).length() < 1e-6);

        let head_on = deflect(Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), 0.1);
        assert!((head_on - Vec2::new(-1.0, 0.0)).length() < 1e-6);
    }
}
