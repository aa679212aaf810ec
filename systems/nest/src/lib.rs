#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scheduler that owns and advances the agents of one colony.

use ant_colony_core::{AgentId, Colony, Event};
use ant_colony_system_foraging::{random_angle, Agent, AntTuning};
use ant_colony_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration parameters required to construct a nest.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestConfig {
    /// Number of agents spawned at the colony.
    pub ant_count: u32,
    /// Seed of the random source shared by every agent of the nest.
    pub seed: u64,
    /// Behavioural constants handed to every agent.
    pub tuning: AntTuning,
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            ant_count: 512,
            seed: 0x5eed_a17c_0105,
            tuning: AntTuning::default(),
        }
    }
}

/// Owns the agents of a colony and advances them whenever time passes.
#[derive(Debug)]
pub struct Nest {
    agents: Vec<Agent>,
    rng: ChaCha8Rng,
    picked: u64,
    delivered: u64,
    recovered: u64,
}

impl Nest {
    /// Spawns `config.ant_count` agents at the colony, each facing a uniformly
    /// random direction.
    #[must_use]
    pub fn new(config: &NestConfig, colony: Colony) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let agents = (0..config.ant_count)
            .map(|index| {
                let angle = random_angle(&mut rng);
                Agent::new(
                    AgentId::new(index),
                    colony.position(),
                    angle,
                    config.tuning,
                    &mut rng,
                )
            })
            .collect();

        Self {
            agents,
            rng,
            picked: 0,
            delivered: 0,
            recovered: 0,
        }
    }

    /// Advances every agent by the time reported in `events`.
    ///
    /// Agents are updated in spawn order and each one is checked against the
    /// colony right after its own update. Agent events are appended to `out`.
    pub fn handle(&mut self, events: &[Event], world: &mut World, out: &mut Vec<Event>) {
        let mut advanced = false;
        let mut dt = 0.0;
        for event in events {
            if let Event::TimeAdvanced { dt: step } = event {
                advanced = true;
                dt += step.as_secs_f32();
            }
        }
        if !advanced {
            return;
        }

        let colony = query::colony(world);
        let mut surroundings = world::surroundings(world);
        let first = out.len();
        for agent in &mut self.agents {
            agent.update(dt, &mut surroundings, &mut self.rng, out);
            agent.check_colony(&colony, out);
        }

        for event in &out[first..] {
            match event {
                Event::FoodPicked { .. } => self.picked += 1,
                Event::FoodDelivered { .. } => self.delivered += 1,
                Event::AgentRecovered { .. } => self.recovered += 1,
                _ => {}
            }
        }
        if out.len() > first {
            debug!(
                picked = self.picked,
                delivered = self.delivered,
                recovered = self.recovered,
                "nest activity"
            );
        }
    }

    /// Agents of the nest in spawn order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Units of food picked up so far.
    #[must_use]
    pub const fn picked(&self) -> u64 {
        self.picked
    }

    /// Units of food brought back to the colony so far.
    #[must_use]
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Number of times a stuck agent was relocated to the colony.
    #[must_use]
    pub const fn recovered(&self) -> u64 {
        self.recovered
    }
}

#[cfg(test)]
mod tests {
    use std::{f32::consts::TAU, time::Duration};

    use super::*;
    use ant_colony_core::Phase;
    use ant_colony_world::WorldConfig;

    fn world() -> World {
        World::new(&WorldConfig::default()).expect("default config is valid")
    }

    #[test]
    fn spawns_every_agent_at_the_colony() {
        let world = world();
        let colony = query::colony(&world);
        let nest = Nest::new(
            &NestConfig {
                ant_count: 32,
                ..NestConfig::default()
            },
            colony,
        );

        assert_eq!(nest.agents().len(), 32);
        for (index, agent) in nest.agents().iter().enumerate() {
            assert_eq!(agent.id(), AgentId::new(index as u32));
            assert_eq!(agent.position(), colony.position());
            assert_eq!(agent.phase(), Phase::ForagingTowardFood);
            let angle = agent.heading().current_angle();
            assert!((0.0..TAU).contains(&angle));
        }
    }

    #[test]
    fn agents_stay_put_without_time_passing() {
        let mut world = world();
        let colony = query::colony(&world);
        let mut nest = Nest::new(
            &NestConfig {
                ant_count: 4,
                ..NestConfig::default()
            },
            colony,
        );
        let mut out = Vec::new();

        nest.handle(
            &[Event::FoodDepleted {
                food: ant_colony_core::FoodId::new(0),
            }],
            &mut world,
            &mut out,
        );

        assert!(out.is_empty());
        assert!(nest
            .agents()
            .iter()
            .all(|agent| agent.position() == colony.position()));
    }

    #[test]
    fn time_advanced_events_move_every_agent() {
        let mut world = world();
        let colony = query::colony(&world);
        let mut nest = Nest::new(
            &NestConfig {
                ant_count: 8,
                ..NestConfig::default()
            },
            colony,
        );
        let mut out = Vec::new();

        nest.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(100),
            }],
            &mut world,
            &mut out,
        );

        for agent in nest.agents() {
            let travelled = agent.position().distance(colony.position());
            assert!((travelled - 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn seeds_control_spawn_angles() {
        let world = world();
        let colony = query::colony(&world);
        let angles = |seed| {
            Nest::new(
                &NestConfig {
                    ant_count: 8,
                    seed,
                    ..NestConfig::default()
                },
                colony,
            )
            .agents()
            .iter()
            .map(|agent| agent.heading().current_angle())
            .collect::<Vec<_>>()
        };

        assert_eq!(angles(1), angles(1));
        assert_ne!(angles(1), angles(2));
    }
}
