#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-agent foraging core.
//!
//! An [`Agent`] walks the arena along a smoothed [`Heading`], slides off walls
//! using an axis-aligned surface normal, senses pheromone markers in a
//! forward-facing region and deposits markers whose intensity decays with the
//! age of its current leg. Agents never own world resources: every update
//! borrows the walls, food and markers through
//! [`ant_colony_core::Surroundings`] and draws randomness from an injected
//! [`ant_colony_core::RandomSource`].

mod agent;
mod collision;
mod heading;
mod sensing;
mod trigger;
mod tuning;

pub use agent::{random_angle, Agent};
pub use collision::{deflect, wall_normal};
pub use heading::{Heading, DEFAULT_TURN_RATE};
pub use sensing::{sense, Sensed};
pub use trigger::{Boundary, PeriodicTrigger};
pub use tuning::{AntTuning, DepositTuning, SensingTuning, StuckRecovery};
