use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::heading::DEFAULT_TURN_RATE;

/// Behavioural constants shared by every agent of a colony.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntTuning {
    /// Travel speed in world units per second.
    pub move_speed: f32,
    /// Heading smoothing rate; larger values turn toward the target faster.
    pub turn_rate: f32,
    /// Seconds between pheromone sensing passes. Fires once strictly exceeded.
    pub direction_update_period: f32,
    /// Seconds between marker deposits. Fires as soon as reached.
    pub marker_period: f32,
    /// Half-width of the uniform angular noise added after every sensing pass.
    pub direction_noise_range: f32,
    /// Pheromone sampling parameters.
    pub sensing: SensingTuning,
    /// Deposit intensity curve.
    pub deposit: DepositTuning,
    /// Magnitude kept along the wall normal when deflecting off a wall.
    pub wall_deflection: f32,
    /// Lower bound of the per-agent liberty coefficient.
    pub liberty_min: f32,
    /// Upper bound of the per-agent liberty coefficient.
    pub liberty_max: f32,
    /// What happens to an agent blocked on consecutive ticks.
    pub stuck_recovery: StuckRecovery,
}

impl Default for AntTuning {
    fn default() -> Self {
        Self {
            move_speed: 50.0,
            turn_rate: DEFAULT_TURN_RATE,
            direction_update_period: 0.125,
            marker_period: 0.125,
            direction_noise_range: 0.1 * PI,
            sensing: SensingTuning::default(),
            deposit: DepositTuning::default(),
            wall_deflection: 0.1,
            liberty_min: 0.0001,
            liberty_max: 0.001,
            stuck_recovery: StuckRecovery::default(),
        }
    }
}

/// Parameters of the randomised forward-biased marker search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensingTuning {
    /// Radius of the square search region around the agent, in world units.
    pub search_radius: f32,
    /// Cells sampled per sensing pass.
    pub sample_count: u32,
    /// Samples at or beyond this distance are ignored.
    pub max_distance: f32,
    /// Minimum cosine between the heading and a sample direction.
    pub alignment_threshold: f32,
    /// Probability that following a trail weakens it.
    pub consumption_probability: f32,
    /// Factor applied to a trail when it is weakened.
    pub consumption_factor: f32,
}

impl Default for SensingTuning {
    fn default() -> Self {
        Self {
            search_radius: 32.0,
            sample_count: 64,
            max_distance: 40.0,
            alignment_threshold: 0.3,
            consumption_probability: 0.3,
            consumption_factor: 0.99,
        }
    }
}

/// Exponential decay of deposit intensity over the current leg.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositTuning {
    /// Intensity of a deposit made right after a phase transition.
    pub base_intensity: f32,
    /// Decay constant applied to the leg age.
    pub decay_constant: f32,
}

impl DepositTuning {
    /// Intensity of a deposit made `age` seconds into the current leg.
    #[must_use]
    pub fn intensity_after(&self, age: f32) -> f32 {
        self.base_intensity * (-self.decay_constant * age).exp()
    }
}

impl Default for DepositTuning {
    fn default() -> Self {
        Self {
            base_intensity: 1000.0,
            decay_constant: 0.01,
        }
    }
}

/// Policy applied when an agent is blocked on two consecutive ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuckRecovery {
    /// Moves the agent onto the colony centre.
    #[default]
    RelocateToColony,
    /// Keeps deflecting and sliding without relocating.
    KeepSliding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_intensity_decreases_with_leg_age() {
        let deposit = DepositTuning::default();
        assert_eq!(deposit.intensity_after(0.0), 1000.0);

        let mut previous = deposit.intensity_after(0.0);
        for step in 1..200 {
            let current = deposit.intensity_after(step as f32 * 0.125);
            assert!(current < previous);
            previous = current;
        }
    }

    #[test]
    fn partial_tuning_files_keep_defaults() {
        let tuning: AntTuning = toml::from_str(
            r#"
            move_speed = 80.0
            stuck_recovery = "keep_sliding"

            [sensing]
            sample_count = 16
            "#,
        )
        .expect("parse tuning");

        assert_eq!(tuning.move_speed, 80.0);
        assert_eq!(tuning.stuck_recovery, StuckRecovery::KeepSliding);
        assert_eq!(tuning.sensing.sample_count, 16);
        assert_eq!(tuning.sensing.max_distance, 40.0);
        assert_eq!(tuning.marker_period, 0.125);
    }
}
