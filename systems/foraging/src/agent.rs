use std::f32::consts::{PI, TAU};

use ant_colony_core::{
    AgentId, Colony, Event, FoodQuery, MarkerDeposit, MarkerField, Phase, RandomSource,
    Surroundings, WallQuery,
};
use glam::Vec2;
use tracing::{debug, trace};

use crate::{
    collision::{deflect, wall_normal},
    heading::{angle_of, Heading},
    sensing::{sense, Sensed},
    trigger::{Boundary, PeriodicTrigger},
    tuning::{AntTuning, StuckRecovery},
};

/// A single foraging ant.
///
/// Each tick the agent moves and resolves wall contact, checks for food while
/// foraging, periodically senses markers and periodically deposits one.
/// Arrival at the colony is evaluated separately through
/// [`Agent::check_colony`] by whoever schedules the agents.
#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    position: Vec2,
    heading: Heading,
    phase: Phase,
    direction_timer: PeriodicTrigger,
    marker_timer: PeriodicTrigger,
    markers_since_transition: f32,
    liberty_coefficient: f32,
    consecutive_wall_hits: u32,
    tuning: AntTuning,
}

impl Agent {
    /// Creates a foraging agent at `position` facing `angle`.
    ///
    /// Both periodic timers start at a random fraction of their period so a
    /// freshly spawned colony does not sense and deposit in lockstep. The
    /// liberty coefficient is drawn once from the tuning's range.
    pub fn new<R>(id: AgentId, position: Vec2, angle: f32, tuning: AntTuning, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let direction_offset = rng.unit() * tuning.direction_update_period;
        let marker_offset = rng.unit() * tuning.marker_period;
        let liberty_coefficient = rng.between(tuning.liberty_min, tuning.liberty_max);

        Self {
            id,
            position,
            heading: Heading::with_turn_rate(angle, tuning.turn_rate),
            phase: Phase::ForagingTowardFood,
            direction_timer: PeriodicTrigger::with_offset(
                tuning.direction_update_period,
                Boundary::Exclusive,
                direction_offset,
            ),
            marker_timer: PeriodicTrigger::with_offset(
                tuning.marker_period,
                Boundary::Inclusive,
                marker_offset,
            ),
            markers_since_transition: 0.0,
            liberty_coefficient,
            consecutive_wall_hits: 0,
            tuning,
        }
    }

    /// Identifier assigned by the nest.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// World-space location.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Smoothed travel direction.
    #[must_use]
    pub const fn heading(&self) -> &Heading {
        &self.heading
    }

    /// Current leg of the foraging cycle.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Age of the current leg, advanced by one marker period per deposit.
    #[must_use]
    pub const fn markers_since_transition(&self) -> f32 {
        self.markers_since_transition
    }

    /// Probability of abandoning a sensing pass on any qualifying sample.
    #[must_use]
    pub const fn liberty_coefficient(&self) -> f32 {
        self.liberty_coefficient
    }

    /// Number of consecutive ticks whose intended move was blocked.
    #[must_use]
    pub const fn consecutive_wall_hits(&self) -> u32 {
        self.consecutive_wall_hits
    }

    /// Constants the agent was created with.
    #[must_use]
    pub const fn tuning(&self) -> &AntTuning {
        &self.tuning
    }

    /// Advances the agent by `dt` seconds.
    ///
    /// Negative and non-finite durations are treated as zero.
    pub fn update<W, F, M, R>(
        &mut self,
        dt: f32,
        world: &mut Surroundings<'_, W, F, M>,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) where
        W: WallQuery,
        F: FoodQuery,
        M: MarkerField,
        R: RandomSource + ?Sized,
    {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.update_position(dt, world, out);
        self.check_food(&mut *world.food, out);

        if self.direction_timer.advance(dt) {
            self.find_marker(&mut *world.markers, rng);
            self.heading
                .nudge(rng.symmetric(self.tuning.direction_noise_range));
        }

        if self.marker_timer.advance(dt) {
            let _ = self.add_marker(&mut *world.markers);
        }

        self.heading.update(dt);
    }

    /// Moves the agent along its heading, deflecting off walls.
    ///
    /// A blocked move snaps the heading onto the deflected direction and the
    /// agent still slides along it this tick. An agent blocked on two
    /// consecutive ticks is relocated to the colony under
    /// [`StuckRecovery::RelocateToColony`]. Coordinates leaving the arena are
    /// replaced by the colony's.
    pub fn update_position<W, F, M>(
        &mut self,
        dt: f32,
        world: &Surroundings<'_, W, F, M>,
        out: &mut Vec<Event>,
    ) where
        W: WallQuery,
    {
        let step = dt * self.tuning.move_speed;
        let mut velocity = self.heading.vector();
        let candidate = self.position + step * velocity;

        if world.walls.is_blocked(candidate) {
            self.consecutive_wall_hits = self.consecutive_wall_hits.saturating_add(1);
            if let Some(normal) = wall_normal(world.walls, self.position, velocity) {
                velocity = deflect(velocity, normal, self.tuning.wall_deflection);
                self.heading.set_now(velocity);
            }
        } else {
            self.consecutive_wall_hits = 0;
        }

        let colony = world.colony.position();
        if self.consecutive_wall_hits > 1
            && self.tuning.stuck_recovery == StuckRecovery::RelocateToColony
        {
            debug!(
                agent = self.id.get(),
                x = self.position.x,
                y = self.position.y,
                "stuck agent relocated to colony"
            );
            self.position = colony;
            out.push(Event::AgentRecovered { agent: self.id });
            return;
        }

        self.position = world.arena.snap(self.position + step * velocity, colony);
    }

    /// Picks food from the first source whose radius contains the agent.
    ///
    /// Only evaluated while foraging. A successful pickup turns the agent
    /// around and starts the return leg.
    pub fn check_food<F>(&mut self, food: &mut F, out: &mut Vec<Event>)
    where
        F: FoodQuery + ?Sized,
    {
        if self.phase != Phase::ForagingTowardFood {
            return;
        }

        let position = self.position;
        let Some(spot) = food
            .food_near(position)
            .iter()
            .find(|spot| spot.contains(position))
            .copied()
        else {
            return;
        };
        if !food.pick(spot.id) {
            return;
        }

        self.phase = Phase::ReturningToColony;
        self.heading.add_now(PI);
        self.markers_since_transition = 0.0;
        trace!(agent = self.id.get(), food = spot.id.get(), "picked food");
        out.push(Event::FoodPicked {
            agent: self.id,
            food: spot.id,
        });
    }

    /// Handles arrival at the colony.
    ///
    /// A returning agent inside the colony radius delivers its food and turns
    /// around. Any agent inside the radius restarts its leg age.
    pub fn check_colony(&mut self, colony: &Colony, out: &mut Vec<Event>) {
        if !colony.contains(self.position) {
            return;
        }

        if self.phase == Phase::ReturningToColony {
            self.phase = Phase::ForagingTowardFood;
            self.heading.add_now(PI);
            trace!(agent = self.id.get(), "delivered food");
            out.push(Event::FoodDelivered { agent: self.id });
        }
        self.markers_since_transition = 0.0;
    }

    /// Samples nearby markers and steers toward the best one.
    ///
    /// Permanent cells set the target straight away. Following a trail may
    /// weaken it slightly. The heading is untouched when nothing qualifies.
    pub fn find_marker<M, R>(&mut self, markers: &mut M, rng: &mut R)
    where
        M: MarkerField + ?Sized,
        R: RandomSource + ?Sized,
    {
        let kind = self.phase.sensed_marker();
        let sensing = &self.tuning.sensing;
        match sense(
            &*markers,
            self.position,
            self.heading.vector(),
            kind,
            sensing,
            self.liberty_coefficient,
            rng,
        ) {
            Sensed::Nothing => {}
            Sensed::Permanent { direction } => self.heading.assign(angle_of(direction)),
            Sensed::Trail {
                direction,
                column,
                row,
            } => {
                if rng.chance(sensing.consumption_probability) {
                    if let Some(cell) = markers.cell_mut(column, row) {
                        cell.scale(kind, sensing.consumption_factor);
                    }
                }
                self.heading.assign(angle_of(direction));
            }
        }
    }

    /// Deposits a marker of the kind opposite to the current phase.
    ///
    /// Intensity decays exponentially with the leg age, which grows by one
    /// marker period per deposit.
    pub fn add_marker<M>(&mut self, markers: &mut M) -> MarkerDeposit
    where
        M: MarkerField + ?Sized,
    {
        self.markers_since_transition += self.tuning.marker_period;
        let deposit = MarkerDeposit::new(
            self.position,
            self.phase.deposited_marker(),
            self.tuning
                .deposit
                .intensity_after(self.markers_since_transition),
        );
        markers.deposit(deposit);
        deposit
    }
}

/// Uniformly random starting angle in `[0, 2π)`.
pub fn random_angle<R>(rng: &mut R) -> f32
where
    R: RandomSource + ?Sized,
{
    rng.between(0.0, TAU)
}
