#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless ant colony simulation.

mod scenario;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use ant_colony_core::{Command, Event};
use ant_colony_rendering::{capture, AntGeometry, Palette, RenderingBackend, Scene};
use ant_colony_system_nest::Nest;
use ant_colony_world::{self as world, query, World};
use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

/// Runs a foraging simulation and reports how much food reached the colony.
#[derive(Debug, Parser)]
#[command(name = "ant-colony", version, about)]
struct Cli {
    /// TOML scenario to run; the built-in demo is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the nest seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the number of ants.
    #[arg(long)]
    ants: Option<u32>,
    /// Overrides the number of ticks to simulate.
    #[arg(short, long)]
    ticks: Option<u64>,
    /// Overrides the tick length in seconds.
    #[arg(long)]
    dt: Option<f32>,
    /// Writes the final scene as JSON to this path.
    #[arg(long)]
    scene: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn apply_overrides(&self, scenario: &mut Scenario) {
        if let Some(seed) = self.seed {
            scenario.nest.seed = seed;
        }
        if let Some(ants) = self.ants {
            scenario.nest.ant_count = ants;
        }
        if let Some(ticks) = self.ticks {
            scenario.run.ticks = ticks;
        }
        if let Some(dt) = self.dt {
            scenario.run.dt = dt;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .with_context(|| format!("invalid log filter '{}'", cli.log_level))?;
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut scenario = match &cli.config {
        Some(path) => Scenario::load(path)?,
        None => Scenario::demo(),
    };
    cli.apply_overrides(&mut scenario);

    let (world, nest) = simulate(&scenario)?;
    let remaining: u64 = query::food_sources(&world)
        .iter()
        .map(|source| u64::from(source.quantity()))
        .sum();
    info!(
        ticks = query::tick_index(&world),
        elapsed = query::elapsed(&world).as_secs_f32(),
        picked = nest.picked(),
        delivered = nest.delivered(),
        recovered = nest.recovered(),
        remaining,
        "simulation finished"
    );

    if let Some(path) = &cli.scene {
        let scene = capture(
            &world,
            nest.agents(),
            &AntGeometry::default(),
            &Palette::default(),
        );
        JsonSceneWriter::new(path).present(&scene)?;
        info!(path = %path.display(), "scene written");
    }
    Ok(())
}

/// Builds the world described by `scenario` and runs it to completion.
fn simulate(scenario: &Scenario) -> Result<(World, Nest)> {
    let dt = scenario.run.dt;
    ensure!(
        dt.is_finite() && dt > 0.0,
        "tick length must be positive, got {dt}"
    );
    let step = Duration::from_secs_f32(dt);

    let mut world = World::new(&scenario.world).context("invalid world configuration")?;
    let mut events = Vec::new();
    for command in scenario.setup_commands() {
        world::apply(&mut world, command, &mut events);
    }
    for event in events.drain(..) {
        if let Event::PlacementRejected { reason } = event {
            warn!(?reason, "scenario placement rejected");
        }
    }

    let mut nest = Nest::new(&scenario.nest, query::colony(&world));
    info!(
        ants = nest.agents().len(),
        ticks = scenario.run.ticks,
        dt,
        seed = scenario.nest.seed,
        "simulation started"
    );

    let mut agent_events = Vec::new();
    for tick in 1..=scenario.run.ticks {
        events.clear();
        agent_events.clear();
        world::apply(&mut world, Command::Tick { dt: step }, &mut events);
        nest.handle(&events, &mut world, &mut agent_events);

        if scenario.run.report_every > 0 && tick % scenario.run.report_every == 0 {
            info!(
                tick,
                picked = nest.picked(),
                delivered = nest.delivered(),
                food_sources = query::food_sources(&world).len(),
                "progress"
            );
        }
    }
    Ok((world, nest))
}

/// Presents scenes by serialising them to a JSON file.
#[derive(Debug)]
struct JsonSceneWriter {
    path: PathBuf,
}

impl JsonSceneWriter {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RenderingBackend for JsonSceneWriter {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let json = serde_json::to_string_pretty(scene).context("failed to serialise scene")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write scene to {}", self.path.display()))
    }
}
