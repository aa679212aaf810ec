use std::time::Duration;

use ant_colony_core::{AgentId, Command, Event};
use ant_colony_system_nest::{Nest, NestConfig};
use ant_colony_world::{self as world, query, World, WorldConfig};
use glam::Vec2;

fn tick(world: &mut World, nest: &mut Nest) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_micros(16_667),
        },
        &mut events,
    );
    let mut agent_events = Vec::new();
    nest.handle(&events, world, &mut agent_events);
    agent_events
}

#[test]
fn food_inside_the_colony_is_picked_and_delivered_in_one_tick() {
    let config = WorldConfig::default();
    let mut world = World::new(&config).expect("default config is valid");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceFood {
            position: config.colony_position,
            radius: 30.0,
            quantity: 3,
        },
        &mut events,
    );
    let mut nest = Nest::new(
        &NestConfig {
            ant_count: 1,
            ..NestConfig::default()
        },
        query::colony(&world),
    );

    let agent_events = tick(&mut world, &mut nest);

    assert!(matches!(
        agent_events.as_slice(),
        [
            Event::FoodPicked { agent, .. },
            Event::FoodDelivered { agent: delivered },
        ] if *agent == AgentId::new(0) && *delivered == AgentId::new(0)
    ));
    assert_eq!(nest.picked(), 1);
    assert_eq!(nest.delivered(), 1);
    assert_eq!(query::food_sources(&world)[0].quantity(), 2);
}

#[test]
fn exhausted_food_is_retired_by_the_world() {
    let config = WorldConfig::default();
    let mut world = World::new(&config).expect("default config is valid");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceFood {
            position: config.colony_position + Vec2::new(2.0, 0.0),
            radius: 30.0,
            quantity: 2,
        },
        &mut events,
    );
    let mut nest = Nest::new(
        &NestConfig {
            ant_count: 2,
            ..NestConfig::default()
        },
        query::colony(&world),
    );

    let _ = tick(&mut world, &mut nest);
    assert_eq!(nest.picked(), 2);
    assert_eq!(query::food_sources(&world)[0].quantity(), 0);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_micros(16_667),
        },
        &mut events,
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::FoodDepleted { .. })));
    assert!(query::food_sources(&world).is_empty());
}
