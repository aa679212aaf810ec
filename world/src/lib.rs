#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the ant colony simulation.
//!
//! The world owns the arena, the colony, the wall layout, the food registry
//! and the pheromone marker grid. Adapters mutate it exclusively through
//! [`apply`] and read it through the [`query`] module. Agents borrow the grids
//! for one update at a time through [`surroundings`].

use std::time::Duration;

use ant_colony_core::{
    Arena, CellCoord, Colony, Command, Event, MarkerKind, PlacementError, Surroundings,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

mod food;
mod markers;
mod walls;

pub use food::{FoodGrid, FoodSource};
pub use markers::{MarkerGrid, EVAPORATION_FLOOR};
pub use walls::WallGrid;

/// Dimensions and constants used to build a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Horizontal extent of the arena in world units.
    pub width: f32,
    /// Vertical extent of the arena in world units.
    pub height: f32,
    /// Side length of a wall cell.
    pub wall_cell_size: f32,
    /// Side length of a marker cell.
    pub marker_cell_size: f32,
    /// Side length of a food spatial-hash bucket.
    pub food_cell_size: f32,
    /// Centre of the colony.
    pub colony_position: Vec2,
    /// Arrival radius of the colony.
    pub colony_radius: f32,
    /// Exponential evaporation rate of marker intensities, per second.
    pub evaporation_rate: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            wall_cell_size: 4.0,
            marker_cell_size: 4.0,
            food_cell_size: 20.0,
            colony_position: Vec2::new(800.0, 450.0),
            colony_radius: 20.0,
            evaporation_rate: 0.1,
        }
    }
}

/// Reasons a [`WorldConfig`] cannot produce a world.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    /// Arena width or height was not a positive finite number.
    #[error("arena must have a positive finite size, got {width} x {height}")]
    EmptyArena {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// A grid cell size was not a positive finite number.
    #[error("{grid} cell size must be positive and finite, got {size}")]
    InvalidCellSize {
        /// Grid the size belongs to.
        grid: &'static str,
        /// Requested size.
        size: f32,
    },
    /// The colony centre lies outside the arena.
    #[error("colony at ({x}, {y}) lies outside the arena")]
    ColonyOutsideArena {
        /// Requested horizontal position.
        x: f32,
        /// Requested vertical position.
        y: f32,
    },
    /// The colony radius was not a positive finite number.
    #[error("colony radius must be positive and finite, got {0}")]
    InvalidColonyRadius(f32),
    /// The evaporation rate was negative or not finite.
    #[error("evaporation rate must be a non-negative finite number, got {0}")]
    InvalidEvaporationRate(f32),
}

/// Represents the authoritative ant colony world state.
#[derive(Debug)]
pub struct World {
    arena: Arena,
    colony: Colony,
    walls: WallGrid,
    food: FoodGrid,
    markers: MarkerGrid,
    evaporation_rate: f32,
    tick_index: u64,
    elapsed: Duration,
}

impl World {
    /// Creates a new world from the provided configuration.
    ///
    /// The cells covering the colony are permanently marked as leading home.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        validate(config)?;

        let arena = Arena::new(config.width, config.height);
        let colony = Colony::new(config.colony_position, config.colony_radius);
        let mut markers = MarkerGrid::new(
            grid_extent(config.width, config.marker_cell_size),
            grid_extent(config.height, config.marker_cell_size),
            config.marker_cell_size,
        );
        markers.mark_permanent(
            colony.position(),
            colony.radius(),
            MarkerKind::ToHome,
            true,
        );

        Ok(Self {
            arena,
            colony,
            walls: WallGrid::new(
                grid_extent(config.width, config.wall_cell_size),
                grid_extent(config.height, config.wall_cell_size),
                config.wall_cell_size,
            ),
            food: FoodGrid::new(
                grid_extent(config.width, config.food_cell_size),
                grid_extent(config.height, config.food_cell_size),
                config.food_cell_size,
            ),
            markers,
            evaporation_rate: config.evaporation_rate,
            tick_index: 0,
            elapsed: Duration::ZERO,
        })
    }

    fn place_wall(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> bool {
        if self.walls.set_solid(cell) {
            out_events.push(Event::WallPlaced { cell });
            true
        } else {
            false
        }
    }

    fn retire_depleted_food(&mut self, out_events: &mut Vec<Event>) {
        let retired = self.food.retire_depleted();
        if retired.is_empty() {
            return;
        }

        for source in &retired {
            self.markers.mark_permanent(
                source.position(),
                source.radius(),
                MarkerKind::ToFood,
                false,
            );
            debug!(food = source.id().get(), "food source depleted");
            out_events.push(Event::FoodDepleted { food: source.id() });
        }

        // Overlapping live sources may have lost flags to the clearing above.
        for source in self.food.sources() {
            self.markers.mark_permanent(
                source.position(),
                source.radius(),
                MarkerKind::ToFood,
                true,
            );
        }
    }
}

fn validate(config: &WorldConfig) -> Result<(), WorldError> {
    if !is_positive(config.width) || !is_positive(config.height) {
        return Err(WorldError::EmptyArena {
            width: config.width,
            height: config.height,
        });
    }
    for (grid, size) in [
        ("wall", config.wall_cell_size),
        ("marker", config.marker_cell_size),
        ("food", config.food_cell_size),
    ] {
        if !is_positive(size) {
            return Err(WorldError::InvalidCellSize { grid, size });
        }
    }
    let arena = Arena::new(config.width, config.height);
    if !arena.contains(config.colony_position) {
        return Err(WorldError::ColonyOutsideArena {
            x: config.colony_position.x,
            y: config.colony_position.y,
        });
    }
    if !is_positive(config.colony_radius) {
        return Err(WorldError::InvalidColonyRadius(config.colony_radius));
    }
    if !(config.evaporation_rate >= 0.0) || !config.evaporation_rate.is_finite() {
        return Err(WorldError::InvalidEvaporationRate(config.evaporation_rate));
    }
    Ok(())
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn grid_extent(length: f32, cell_size: f32) -> u32 {
    (length / cell_size).ceil().max(1.0) as u32
}

/// Splits the world into the collaborators an agent needs for one update.
#[must_use]
pub fn surroundings(world: &mut World) -> Surroundings<'_, WallGrid, FoodGrid, MarkerGrid> {
    Surroundings {
        walls: &world.walls,
        food: &mut world.food,
        markers: &mut world.markers,
        colony: world.colony,
        arena: world.arena,
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceWall { cell } => {
            if !world.place_wall(cell, out_events) {
                reject(PlacementError::OutOfBounds, out_events);
            }
        }
        Command::PlaceWallRect {
            origin,
            columns,
            rows,
        } => {
            let mut placed = false;
            for row in 0..rows {
                for column in 0..columns {
                    let cell = CellCoord::new(
                        origin.column().saturating_add(column as i32),
                        origin.row().saturating_add(row as i32),
                    );
                    placed |= world.place_wall(cell, out_events);
                }
            }
            if !placed {
                reject(PlacementError::OutOfBounds, out_events);
            }
        }
        Command::PlaceFood {
            position,
            radius,
            quantity,
        } => {
            if !is_positive(radius) {
                reject(PlacementError::InvalidRadius, out_events);
            } else if quantity == 0 {
                reject(PlacementError::EmptyQuantity, out_events);
            } else if !world.arena.contains(position) {
                reject(PlacementError::OutOfBounds, out_events);
            } else {
                let food = world.food.insert(position, radius, quantity);
                world
                    .markers
                    .mark_permanent(position, radius, MarkerKind::ToFood, true);
                out_events.push(Event::FoodPlaced {
                    food,
                    position,
                    quantity,
                });
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            let factor = (-world.evaporation_rate * dt.as_secs_f32()).exp();
            world.markers.evaporate(factor);
            world.retire_depleted_food(out_events);
        }
    }
}

fn reject(reason: PlacementError, out_events: &mut Vec<Event>) {
    debug!(?reason, "placement rejected");
    out_events.push(Event::PlacementRejected { reason });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{FoodGrid, FoodSource, MarkerGrid, WallGrid, World};
    use ant_colony_core::{Arena, Colony};

    /// Bounds agents must remain within.
    #[must_use]
    pub fn arena(world: &World) -> Arena {
        world.arena
    }

    /// Colony agents return food to.
    #[must_use]
    pub fn colony(world: &World) -> Colony {
        world.colony
    }

    /// Provides read-only access to the wall layout.
    #[must_use]
    pub fn walls(world: &World) -> &WallGrid {
        &world.walls
    }

    /// Provides read-only access to the food registry.
    #[must_use]
    pub fn food(world: &World) -> &FoodGrid {
        &world.food
    }

    /// Every food source that has not been retired yet.
    #[must_use]
    pub fn food_sources(world: &World) -> &[FoodSource] {
        world.food.sources()
    }

    /// Provides read-only access to the pheromone marker grid.
    #[must_use]
    pub fn markers(world: &World) -> &MarkerGrid {
        &world.markers
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Total simulated time applied so far.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ant_colony_core::{FoodQuery, MarkerDeposit, MarkerField};

    fn small_config() -> WorldConfig {
        WorldConfig {
            width: 200.0,
            height: 100.0,
            wall_cell_size: 10.0,
            marker_cell_size: 4.0,
            food_cell_size: 20.0,
            colony_position: Vec2::new(100.0, 50.0),
            colony_radius: 8.0,
            evaporation_rate: 0.5,
        }
    }

    #[test]
    fn new_world_marks_colony_as_permanent_home() {
        let world = World::new(&small_config()).expect("valid config");
        let cell = query::markers(&world)
            .cell_at(Vec2::new(100.0, 50.0))
            .copied()
            .unwrap_or_default();
        assert!(cell.is_permanent(MarkerKind::ToHome));
        assert!(!cell.is_permanent(MarkerKind::ToFood));
        assert_eq!(query::markers(&world).dimensions(), (50, 25));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut config = small_config();
        config.marker_cell_size = 0.0;
        assert_eq!(
            World::new(&config).err(),
            Some(WorldError::InvalidCellSize {
                grid: "marker",
                size: 0.0
            })
        );

        let mut config = small_config();
        config.colony_position = Vec2::new(300.0, 10.0);
        assert!(matches!(
            World::new(&config),
            Err(WorldError::ColonyOutsideArena { .. })
        ));

        let mut config = small_config();
        config.height = f32::NAN;
        assert!(matches!(
            World::new(&config),
            Err(WorldError::EmptyArena { .. })
        ));

        let mut config = small_config();
        config.colony_radius = -1.0;
        assert_eq!(
            World::new(&config).err(),
            Some(WorldError::InvalidColonyRadius(-1.0))
        );
    }

    #[test]
    fn wall_placement_reports_outcome() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceWall {
                cell: CellCoord::new(3, 4),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceWall {
                cell: CellCoord::new(-1, 4),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::WallPlaced {
                    cell: CellCoord::new(3, 4)
                },
                Event::PlacementRejected {
                    reason: PlacementError::OutOfBounds
                },
            ]
        );
        assert!(query::walls(&world).is_solid(CellCoord::new(3, 4)));
    }

    #[test]
    fn wall_rectangles_clip_to_the_grid() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceWallRect {
                origin: CellCoord::new(18, 8),
                columns: 4,
                rows: 3,
            },
            &mut events,
        );

        assert_eq!(events.len(), 4);
        assert_eq!(query::walls(&world).solid_cells().count(), 4);

        events.clear();
        apply(
            &mut world,
            Command::PlaceWallRect {
                origin: CellCoord::new(40, 40),
                columns: 2,
                rows: 2,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                reason: PlacementError::OutOfBounds
            }]
        );
    }

    #[test]
    fn food_placement_validates_and_marks_permanent_cells() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();

        for (radius, quantity, position) in [
            (0.0, 5, Vec2::new(20.0, 20.0)),
            (3.0, 0, Vec2::new(20.0, 20.0)),
            (3.0, 5, Vec2::new(-20.0, 20.0)),
        ] {
            apply(
                &mut world,
                Command::PlaceFood {
                    position,
                    radius,
                    quantity,
                },
                &mut events,
            );
        }
        assert_eq!(
            events,
            vec![
                Event::PlacementRejected {
                    reason: PlacementError::InvalidRadius
                },
                Event::PlacementRejected {
                    reason: PlacementError::EmptyQuantity
                },
                Event::PlacementRejected {
                    reason: PlacementError::OutOfBounds
                },
            ]
        );

        events.clear();
        apply(
            &mut world,
            Command::PlaceFood {
                position: Vec2::new(20.0, 20.0),
                radius: 3.0,
                quantity: 5,
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::FoodPlaced { quantity: 5, .. }]
        ));
        assert_eq!(query::food_sources(&world).len(), 1);
        assert!(query::markers(&world)
            .cell_at(Vec2::new(20.0, 20.0))
            .is_some_and(|cell| cell.is_permanent(MarkerKind::ToFood)));
    }

    #[test]
    fn tick_advances_time_and_evaporates_trails() {
        let mut world = World::new(&small_config()).expect("valid config");
        let trail = Vec2::new(30.0, 30.0);
        surroundings(&mut world)
            .markers
            .deposit(MarkerDeposit::new(trail, MarkerKind::ToFood, 100.0));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_secs(2)
            }]
        );
        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(query::elapsed(&world), Duration::from_secs(2));
        let intensity = query::markers(&world)
            .cell_at(trail)
            .map_or(0.0, |cell| cell.intensity(MarkerKind::ToFood));
        let expected = 100.0 * (-1.0f32).exp();
        assert!((intensity - expected).abs() < 1e-3);
    }

    #[test]
    fn depleted_food_is_retired_once_on_the_next_tick() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();
        let position = Vec2::new(40.0, 40.0);
        apply(
            &mut world,
            Command::PlaceFood {
                position,
                radius: 3.0,
                quantity: 1,
            },
            &mut events,
        );
        let food = query::food_sources(&world)[0].id();

        assert!(surroundings(&mut world).food.pick(food));

        events.clear();
        let tick = Command::Tick {
            dt: Duration::from_millis(16),
        };
        apply(&mut world, tick.clone(), &mut events);
        apply(&mut world, tick, &mut events);

        let depleted: Vec<&Event> = events
            .iter()
            .filter(|event| matches!(event, Event::FoodDepleted { .. }))
            .collect();
        assert_eq!(depleted, vec![&Event::FoodDepleted { food }]);
        assert!(query::food_sources(&world).is_empty());
        assert!(query::markers(&world)
            .cell_at(position)
            .is_some_and(|cell| !cell.is_permanent(MarkerKind::ToFood)));
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: WorldConfig =
            toml::from_str("width = 320.0\ncolony_position = [10.0, 12.0]\n").expect("parse");
        assert_eq!(config.width, 320.0);
        assert_eq!(config.colony_position, Vec2::new(10.0, 12.0));
        assert_eq!(config.height, WorldConfig::default().height);
    }
}
