#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for ant colony adapters.
//!
//! [`capture`] projects the world and the agents into a [`Scene`] made of
//! plain geometry: one quad per ant, discs for food and the colony, and tiles
//! for walls and pheromone trails. Capturing never mutates the simulation.

use anyhow::Result as AnyResult;
use ant_colony_core::{MarkerField, MarkerKind, Phase, WallQuery};
use ant_colony_system_foraging::Agent;
use ant_colony_world::{query, World};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Colors used for every element of a scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Clear color behind the arena.
    pub background: Color,
    /// Ant body color.
    pub ant: Color,
    /// Food discs and carried food.
    pub food: Color,
    /// Colony disc.
    pub colony: Color,
    /// Wall tiles.
    pub wall: Color,
    /// Trails leading toward food.
    pub to_food: Color,
    /// Trails leading toward the colony.
    pub to_home: Color,
    /// Intensity drawn fully opaque; weaker trails fade out linearly.
    pub marker_saturation: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x12, 0x12, 0x12),
            ant: Color::from_rgb_u8(0xff, 0xff, 0xff),
            food: Color::from_rgb_u8(0x42, 0xb9, 0x4a),
            colony: Color::from_rgb_u8(0x8c, 0x4a, 0x2f),
            wall: Color::from_rgb_u8(0x5c, 0x5c, 0x66),
            to_food: Color::from_rgb_u8(0x3a, 0xd0, 0x5b),
            to_home: Color::from_rgb_u8(0xd0, 0x3a, 0x3a),
            marker_saturation: 1000.0,
        }
    }
}

/// Dimensions of the quad drawn for each ant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AntGeometry {
    width: f32,
    length: f32,
    food_offset: f32,
    food_radius: f32,
}

impl AntGeometry {
    /// Creates a new ant geometry.
    ///
    /// `width` and `length` are half extents across and along the heading.
    /// Carried food is drawn `food_offset * length` ahead of the ant.
    pub fn new(
        width: f32,
        length: f32,
        food_offset: f32,
        food_radius: f32,
    ) -> Result<Self, RenderingError> {
        for (name, value) in [
            ("width", width),
            ("length", length),
            ("food_radius", food_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(RenderingError::InvalidDimension { name, value });
            }
        }
        if !food_offset.is_finite() {
            return Err(RenderingError::InvalidDimension {
                name: "food_offset",
                value: food_offset,
            });
        }
        Ok(Self {
            width,
            length,
            food_offset,
            food_radius,
        })
    }

    /// Corners of the quad for an ant at `position` heading along `direction`.
    ///
    /// The quad spans `position ± width·n ± length·d` where `n` is the left
    /// normal of `direction`.
    #[must_use]
    pub fn corners(&self, position: Vec2, direction: Vec2) -> [Vec2; 4] {
        let normal = direction.perp();
        let across = self.width * normal;
        let along = self.length * direction;
        [
            position - across + along,
            position + across + along,
            position + across - along,
            position - across - along,
        ]
    }

    /// Centre of the food dot carried by a returning ant.
    #[must_use]
    pub fn carried_food(&self, position: Vec2, direction: Vec2) -> Vec2 {
        position + self.food_offset * self.length * direction
    }
}

impl Default for AntGeometry {
    fn default() -> Self {
        Self {
            width: 3.0,
            length: 4.7,
            food_offset: 0.65,
            food_radius: 2.0,
        }
    }
}

/// Quad describing a single ant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AntSprite {
    /// Quad corners in drawing order.
    pub corners: [Vec2; 4],
    /// Body color.
    pub color: Color,
    /// Food dot drawn for returning ants.
    pub carried_food: Option<Disc>,
}

/// Filled circle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    /// Centre in world units.
    pub center: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Axis-aligned filled square.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Top-left corner in world units.
    pub origin: Vec2,
    /// Side length in world units.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

/// Scene description combining the arena and its inhabitants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Arena width in world units.
    pub width: f32,
    /// Arena height in world units.
    pub height: f32,
    /// Clear color behind the arena.
    pub background: Color,
    /// Pheromone trail tiles, drawn first.
    pub markers: Vec<Tile>,
    /// Wall tiles.
    pub walls: Vec<Tile>,
    /// Live food sources.
    pub food: Vec<Disc>,
    /// Colony disc.
    pub colony: Disc,
    /// Ants in spawn order.
    pub ants: Vec<AntSprite>,
}

/// Projects the world and its agents into a scene.
#[must_use]
pub fn capture(
    world: &World,
    agents: &[Agent],
    geometry: &AntGeometry,
    palette: &Palette,
) -> Scene {
    let arena = query::arena(world);
    let colony = query::colony(world);

    let wall_size = query::walls(world).cell_size();
    let walls = query::walls(world)
        .solid_cells()
        .map(|cell| Tile {
            origin: Vec2::new(cell.column() as f32, cell.row() as f32) * wall_size,
            size: wall_size,
            color: palette.wall,
        })
        .collect();

    let marker_size = query::markers(world).cell_size();
    let markers = query::markers(world)
        .active_cells()
        .filter_map(|(cell, state)| {
            let to_food = state.intensity(MarkerKind::ToFood);
            let to_home = state.intensity(MarkerKind::ToHome);
            let (intensity, color) = if to_food >= to_home {
                (to_food, palette.to_food)
            } else {
                (to_home, palette.to_home)
            };
            if intensity <= 0.0 {
                return None;
            }
            let alpha = intensity / palette.marker_saturation.max(f32::EPSILON);
            Some(Tile {
                origin: Vec2::new(cell.column() as f32, cell.row() as f32) * marker_size,
                size: marker_size,
                color: color.with_alpha(alpha),
            })
        })
        .collect();

    let food = query::food_sources(world)
        .iter()
        .filter(|source| !source.is_depleted())
        .map(|source| Disc {
            center: source.position(),
            radius: source.radius(),
            color: palette.food,
        })
        .collect();

    let ants = agents
        .iter()
        .map(|agent| sprite(agent, geometry, palette))
        .collect();

    Scene {
        width: arena.width(),
        height: arena.height(),
        background: palette.background,
        markers,
        walls,
        food,
        colony: Disc {
            center: colony.position(),
            radius: colony.radius(),
            color: palette.colony,
        },
        ants,
    }
}

fn sprite(agent: &Agent, geometry: &AntGeometry, palette: &Palette) -> AntSprite {
    let position = agent.position();
    let direction = agent.heading().vector();
    let carried_food = (agent.phase() == Phase::ReturningToColony).then(|| Disc {
        center: geometry.carried_food(position, direction),
        radius: geometry.food_radius,
        color: palette.food,
    });
    AntSprite {
        corners: geometry.corners(position, direction),
        color: palette.ant,
        carried_food,
    }
}

/// Backend capable of presenting captured scenes.
pub trait RenderingBackend {
    /// Presents a single scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// A dimension was not usable for drawing.
    #[error("{name} must be a positive finite number (received {value})")]
    InvalidDimension {
        /// Name of the rejected dimension.
        name: &'static str,
        /// Provided value that failed validation.
        value: f32,
    },
}
