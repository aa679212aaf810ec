#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the ant colony workspace.
//!
//! This crate defines the value types exchanged between the authoritative
//! world, the foraging agents and the adapters, together with the collaborator
//! traits agents consume: [`WallQuery`], [`FoodQuery`], [`MarkerField`] and
//! [`RandomSource`]. Adapters submit [`Command`] values to the world, which
//! answers with [`Event`] values; agents append their own events (pickups,
//! deliveries, stuck recoveries) to the same stream.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod random;

pub use random::RandomSource;

/// Leg of the foraging cycle an agent is currently walking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Searching for food, following trails that lead toward food.
    ForagingTowardFood,
    /// Carrying food back, following trails that lead toward the colony.
    ReturningToColony,
}

impl Phase {
    /// Marker kind the agent senses while walking this leg.
    ///
    /// Agents follow the markers associated with where they are headed.
    #[must_use]
    pub const fn sensed_marker(self) -> MarkerKind {
        match self {
            Self::ForagingTowardFood => MarkerKind::ToFood,
            Self::ReturningToColony => MarkerKind::ToHome,
        }
    }

    /// Marker kind the agent deposits while walking this leg.
    ///
    /// A forager lays a path back home and a returning agent lays a path
    /// toward the food it just left, so the deposit is always the opposite of
    /// the sensed kind.
    #[must_use]
    pub const fn deposited_marker(self) -> MarkerKind {
        self.sensed_marker().opposite()
    }
}

/// Tag carried by a pheromone marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Followed by agents searching for food.
    ToFood,
    /// Followed by agents returning to the colony.
    ToHome,
}

impl MarkerKind {
    /// Every marker kind in storage order.
    pub const ALL: [MarkerKind; 2] = [MarkerKind::ToFood, MarkerKind::ToHome];

    /// Storage slot used by per-kind arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::ToFood => 0,
            Self::ToHome => 1,
        }
    }

    /// The other marker kind.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::ToFood => Self::ToHome,
            Self::ToHome => Self::ToFood,
        }
    }
}

/// Immutable marker record emitted by an agent toward the marker grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerDeposit {
    position: Vec2,
    kind: MarkerKind,
    intensity: f32,
}

impl MarkerDeposit {
    /// Creates a new deposit record.
    #[must_use]
    pub const fn new(position: Vec2, kind: MarkerKind, intensity: f32) -> Self {
        Self {
            position,
            kind,
            intensity,
        }
    }

    /// World-space location of the deposit.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Kind of trail the deposit reinforces.
    #[must_use]
    pub const fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Intensity carried by the deposit.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }
}

/// Per-kind pheromone state stored in a single marker-grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerCell {
    intensity: [f32; 2],
    permanent: [bool; 2],
}

impl MarkerCell {
    /// Current intensity of the given kind.
    #[must_use]
    pub const fn intensity(&self, kind: MarkerKind) -> f32 {
        self.intensity[kind.index()]
    }

    /// Reports whether the cell permanently marks a food source or the colony.
    #[must_use]
    pub const fn is_permanent(&self, kind: MarkerKind) -> bool {
        self.permanent[kind.index()]
    }

    /// Keeps the stronger of the stored and the provided intensity.
    pub fn reinforce(&mut self, kind: MarkerKind, intensity: f32) {
        let slot = &mut self.intensity[kind.index()];
        if intensity.is_finite() && intensity > *slot {
            *slot = intensity;
        }
    }

    /// Multiplies the intensity of the given kind by `factor`.
    pub fn scale(&mut self, kind: MarkerKind, factor: f32) {
        self.intensity[kind.index()] *= factor;
    }

    /// Flags or clears the permanent marker of the given kind.
    pub fn set_permanent(&mut self, kind: MarkerKind, permanent: bool) {
        self.permanent[kind.index()] = permanent;
    }

    /// Applies evaporation to every non-permanent intensity.
    ///
    /// Values that fall below `floor` are cleared to zero.
    pub fn evaporate(&mut self, factor: f32, floor: f32) {
        for kind in MarkerKind::ALL {
            if self.is_permanent(kind) {
                continue;
            }
            let slot = &mut self.intensity[kind.index()];
            *slot *= factor;
            if *slot < floor {
                *slot = 0.0;
            }
        }
    }

    /// Returns `true` when no kind carries intensity or a permanent flag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        MarkerKind::ALL
            .iter()
            .all(|kind| self.intensity(*kind) <= 0.0 && !self.is_permanent(*kind))
    }
}

/// Location of a single grid cell expressed as signed column and row indices.
///
/// Positions left of or above the grid origin map to negative indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Maps a world-space position onto a grid with square cells of `cell_size`.
    #[must_use]
    pub fn from_position(position: Vec2, cell_size: f32) -> Self {
        Self {
            column: (position.x / cell_size).floor() as i32,
            row: (position.y / cell_size).floor() as i32,
        }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// World-space centre of the cell on a grid with square cells of `cell_size`.
    #[must_use]
    pub fn center(&self, cell_size: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * cell_size,
            (self.row as f32 + 0.5) * cell_size,
        )
    }
}

/// Unique identifier assigned to a food source by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FoodId(u32);

impl FoodId {
    /// Creates a new food identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an agent by its nest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable view of a food source reported by [`FoodQuery::food_near`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodSpot {
    /// Identifier used to pick from the source.
    pub id: FoodId,
    /// Centre of the source.
    pub position: Vec2,
    /// Pickup radius around the centre.
    pub radius: f32,
}

impl FoodSpot {
    /// Reports whether `point` lies strictly inside the pickup radius.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.position) < self.radius
    }
}

/// Home colony that agents return food to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    position: Vec2,
    radius: f32,
}

impl Colony {
    /// Creates a colony centred on `position`.
    #[must_use]
    pub const fn new(position: Vec2, radius: f32) -> Self {
        Self { position, radius }
    }

    /// Centre of the colony.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Arrival radius around the centre.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Reports whether `point` lies strictly inside the arrival radius.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.position) < self.radius
    }
}

/// Rectangular arena spanning `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    width: f32,
    height: f32,
}

impl Arena {
    /// Creates a new arena description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the arena.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the arena.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether `point` lies inside the closed arena rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Replaces every out-of-range coordinate of `point` with the matching
    /// coordinate of `fallback`.
    ///
    /// Non-finite coordinates count as out of range. Applying the snap twice
    /// yields the same point as applying it once when `fallback` lies inside
    /// the arena.
    #[must_use]
    pub fn snap(&self, point: Vec2, fallback: Vec2) -> Vec2 {
        let x = if (0.0..=self.width).contains(&point.x) {
            point.x
        } else {
            fallback.x
        };
        let y = if (0.0..=self.height).contains(&point.y) {
            point.y
        } else {
            fallback.y
        };
        Vec2::new(x, y)
    }
}

/// Read-only wall grid queried during locomotion.
pub trait WallQuery {
    /// Side length of a wall cell in world units.
    fn cell_size(&self) -> f32;

    /// Grid cell containing `position`.
    fn cell_coordinates(&self, position: Vec2) -> CellCoord;

    /// Reports whether `position` falls inside a wall cell.
    fn is_blocked(&self, position: Vec2) -> bool;
}

/// Food registry queried by foraging agents.
pub trait FoodQuery {
    /// Live food sources registered near `position`.
    fn food_near(&self, position: Vec2) -> &[FoodSpot];

    /// Takes one unit from the source. Returns `false` when nothing was left.
    fn pick(&mut self, food: FoodId) -> bool;
}

/// Pheromone marker grid sensed and written by agents.
pub trait MarkerField {
    /// Side length of a marker cell in world units.
    fn cell_size(&self) -> f32;

    /// Width and height of the grid measured in cells.
    fn dimensions(&self) -> (u32, u32);

    /// Cell at the provided column and row, if it lies inside the grid.
    fn cell(&self, column: u32, row: u32) -> Option<&MarkerCell>;

    /// Mutable access to the cell at the provided column and row.
    fn cell_mut(&mut self, column: u32, row: u32) -> Option<&mut MarkerCell>;

    /// Hands a deposit record over to the grid.
    fn deposit(&mut self, deposit: MarkerDeposit);
}

/// Collaborators an agent reads and writes during a single update.
///
/// Walls are borrowed immutably while food and markers are borrowed mutably,
/// mirroring the access each operation needs.
#[derive(Debug)]
pub struct Surroundings<'a, W, F, M> {
    /// Static wall layout.
    pub walls: &'a W,
    /// Food registry, mutated on pickup.
    pub food: &'a mut F,
    /// Marker grid, appended to and decayed in place.
    pub markers: &'a mut M,
    /// Colony used for bounds recovery and arrival checks.
    pub colony: Colony,
    /// Bounds agents must remain within.
    pub arena: Arena,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Turns a single wall cell solid.
    PlaceWall {
        /// Cell that becomes solid.
        cell: CellCoord,
    },
    /// Turns a rectangular block of wall cells solid.
    PlaceWallRect {
        /// Top-left cell of the block.
        origin: CellCoord,
        /// Number of columns covered by the block.
        columns: u32,
        /// Number of rows covered by the block.
        rows: u32,
    },
    /// Registers a new food source.
    PlaceFood {
        /// Centre of the source.
        position: Vec2,
        /// Pickup radius around the centre.
        radius: f32,
        /// Number of units available for pickup.
        quantity: u32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world and by agents.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a wall cell became solid.
    WallPlaced {
        /// Cell that became solid.
        cell: CellCoord,
    },
    /// Confirms that a food source was registered.
    FoodPlaced {
        /// Identifier assigned to the source.
        food: FoodId,
        /// Centre of the source.
        position: Vec2,
        /// Units available for pickup.
        quantity: u32,
    },
    /// Reports that a food source ran out and was retired.
    FoodDepleted {
        /// Identifier of the retired source.
        food: FoodId,
    },
    /// Reports that a placement command was rejected.
    PlacementRejected {
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a foraging agent picked a unit of food.
    FoodPicked {
        /// Agent that picked the food.
        agent: AgentId,
        /// Source the unit was taken from.
        food: FoodId,
    },
    /// Reports that a returning agent reached the colony.
    FoodDelivered {
        /// Agent that delivered the food.
        agent: AgentId,
    },
    /// Reports that a stuck agent was relocated to the colony.
    AgentRecovered {
        /// Agent that was relocated.
        agent: AgentId,
    },
}

/// Reasons a placement command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested location lies outside the arena or grid.
    OutOfBounds,
    /// The food radius was not a positive finite number.
    InvalidRadius,
    /// The food quantity was zero.
    EmptyQuantity,
}
