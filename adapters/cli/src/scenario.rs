//! TOML scenario files describing a complete simulation run.

use std::{fs, path::Path};

use ant_colony_core::{CellCoord, Command};
use ant_colony_system_nest::NestConfig;
use ant_colony_world::WorldConfig;
use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Everything needed to set up and run one simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Scenario {
    pub(crate) world: WorldConfig,
    pub(crate) nest: NestConfig,
    pub(crate) run: RunConfig,
    pub(crate) food: Vec<FoodPlacement>,
    pub(crate) walls: Vec<WallRect>,
}

/// Length and pacing of the run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RunConfig {
    pub(crate) ticks: u64,
    /// Seconds per tick.
    pub(crate) dt: f32,
    /// Ticks between progress lines; zero disables them.
    pub(crate) report_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 3_600,
            dt: 1.0 / 60.0,
            report_every: 600,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct FoodPlacement {
    pub(crate) position: Vec2,
    #[serde(default = "default_food_radius")]
    pub(crate) radius: f32,
    pub(crate) quantity: u32,
}

fn default_food_radius() -> f32 {
    20.0
}

/// Block of wall cells given in wall-grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct WallRect {
    pub(crate) column: i32,
    pub(crate) row: i32,
    #[serde(default = "one")]
    pub(crate) columns: u32,
    #[serde(default = "one")]
    pub(crate) rows: u32,
}

fn one() -> u32 {
    1
}

impl Scenario {
    /// Reads and parses the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    /// Built-in scenario used when no file is given: two food sources on
    /// either side of the colony and a wall between the colony and one of them.
    pub(crate) fn demo() -> Self {
        let world = WorldConfig::default();
        let colony = world.colony_position;
        let wall_column = ((colony.x + 200.0) / world.wall_cell_size) as i32;
        let wall_row = ((colony.y - 120.0) / world.wall_cell_size) as i32;
        Self {
            world,
            food: vec![
                FoodPlacement {
                    position: colony + Vec2::new(450.0, 0.0),
                    radius: 20.0,
                    quantity: 1_000,
                },
                FoodPlacement {
                    position: colony + Vec2::new(-350.0, -200.0),
                    radius: 20.0,
                    quantity: 1_000,
                },
            ],
            walls: vec![WallRect {
                column: wall_column,
                row: wall_row,
                columns: 4,
                rows: 60,
            }],
            ..Self::default()
        }
    }

    /// Commands that place the scenario's walls and food.
    pub(crate) fn setup_commands(&self) -> Vec<Command> {
        let walls = self.walls.iter().map(|rect| Command::PlaceWallRect {
            origin: CellCoord::new(rect.column, rect.row),
            columns: rect.columns,
            rows: rect.rows,
        });
        let food = self.food.iter().map(|food| Command::PlaceFood {
            position: food.position,
            radius: food.radius,
            quantity: food.quantity,
        });
        walls.chain(food).collect()
    }
}
