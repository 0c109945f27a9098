use std::time::Duration;

use outbreak_core::{Aabb, AgentKind, Command, Event, Health, MoveInput, Obstacle, WorldPoint};
use outbreak_system_combat::{Battlefield, Combat, HARMFUL_OBSTACLE_DAMAGE};
use outbreak_world::{self as world, query, World};

fn tick(millis: u64) -> Command {
    Command::Tick {
        dt: Duration::from_millis(millis),
    }
}

fn step(world: &mut World, combat: &mut Combat, command: Command, log: &mut Vec<Event>) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    log.extend(events.iter().cloned());

    let agents = query::agent_view(world);
    let player = query::player(world);
    let projectiles = query::projectiles(world);
    let hazards = query::hazards(world);
    let mut commands = Vec::new();
    combat.handle(
        &events,
        Battlefield {
            agents: &agents,
            player: &player,
            projectiles: &projectiles,
            hazards: &hazards,
            obstacles: query::obstacles(world),
        },
        query::clock(world),
        &mut commands,
    );

    for command in commands {
        let mut generated = Vec::new();
        world::apply(world, command, &mut generated);
        log.extend(generated);
    }
}

fn spawn(world: &mut World, kind: AgentKind, x: f32, y: f32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnAgent {
            kind,
            position: WorldPoint::new(x, y),
            speed_multiplier: 1.0,
        },
        &mut events,
    );
    assert!(matches!(events.as_slice(), [Event::AgentSpawned { .. }]));
}

#[test]
fn contact_damage_respects_invulnerability() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    spawn(&mut world, AgentKind::Walker, 20.0, 0.0);

    for _ in 0..10 {
        step(&mut world, &mut combat, tick(50), &mut log);
    }

    let hits: Vec<_> = log
        .iter()
        .filter_map(|event| match event {
            Event::PlayerDamaged { remaining } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![Health::new(90)]);

    for _ in 0..11 {
        step(&mut world, &mut combat, tick(50), &mut log);
    }
    assert_eq!(query::player(&world).health, Health::new(80));
}

#[test]
fn two_projectile_hits_destroy_a_walker() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    spawn(&mut world, AgentKind::Walker, 200.0, 0.0);

    for _ in 0..2 {
        step(
            &mut world,
            &mut combat,
            Command::FireProjectile {
                toward: WorldPoint::new(200.0, 0.0),
            },
            &mut log,
        );
        for _ in 0..15 {
            step(&mut world, &mut combat, tick(16), &mut log);
        }
    }

    let damaged = log
        .iter()
        .filter(|event| matches!(event, Event::AgentDamaged { .. }))
        .count();
    let destroyed = log
        .iter()
        .filter(|event| matches!(event, Event::AgentDestroyed { kind: AgentKind::Walker, .. }))
        .count();
    assert_eq!(damaged, 1);
    assert_eq!(destroyed, 1);
    assert!(query::agent_view(&world).is_empty());
    assert!(query::projectiles(&world).is_empty());
}

#[test]
fn boss_lobs_hazard_after_cooldown() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    spawn(&mut world, AgentKind::Boss, 300.0, 0.0);

    for _ in 0..29 {
        step(&mut world, &mut combat, tick(100), &mut log);
    }
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::HazardCreated { .. })));

    step(&mut world, &mut combat, tick(100), &mut log);
    assert!(log.iter().any(|event| matches!(
        event,
        Event::HazardCreated { center, .. } if *center == WorldPoint::ORIGIN
    )));

    step(&mut world, &mut combat, tick(100), &mut log);
    assert_eq!(query::player(&world).health, Health::new(95));
}

#[test]
fn boss_out_of_range_holds_fire() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    spawn(&mut world, AgentKind::Boss, 600.0, 0.0);

    for _ in 0..100 {
        step(&mut world, &mut combat, tick(100), &mut log);
    }

    assert!(query::hazards(&world).is_empty());
}

#[test]
fn stalker_bursts_only_once_awake() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    spawn(&mut world, AgentKind::Stalker, 100.0, 0.0);

    for _ in 0..29 {
        step(&mut world, &mut combat, tick(100), &mut log);
    }
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::AgentDetonated { .. })));

    step(&mut world, &mut combat, tick(100), &mut log);

    assert!(log
        .iter()
        .any(|event| matches!(event, Event::AgentDetonated { .. })));
    let view = query::agent_view(&world);
    assert_eq!(view.len(), 8);
    assert!(view.iter().all(|agent| agent.kind == AgentKind::Walker));
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::AgentDestroyed { .. })));
}

#[test]
fn harmful_ground_burns_the_player() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena {
            obstacles: vec![Obstacle::harmful(Aabb::from_corner(-50.0, -50.0, 100.0, 100.0))],
            reference: WorldPoint::ORIGIN,
            settings: Default::default(),
        },
        &mut events,
    );

    step(&mut world, &mut combat, tick(16), &mut log);

    assert!(log.contains(&Event::PlayerDamaged {
        remaining: Health::new(100 - HARMFUL_OBSTACLE_DAMAGE),
    }));
}

#[test]
fn player_walks_onto_harmful_ground_and_burns() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena {
            obstacles: vec![Obstacle::harmful(Aabb::from_corner(20.0, -50.0, 100.0, 100.0))],
            reference: WorldPoint::ORIGIN,
            settings: Default::default(),
        },
        &mut events,
    );
    let right = MoveInput {
        right: true,
        ..MoveInput::default()
    };

    for _ in 0..40 {
        step(&mut world, &mut combat, Command::MovePlayer { input: right }, &mut log);
        step(&mut world, &mut combat, tick(16), &mut log);
    }

    assert!(!log.contains(&Event::PlayerBlocked));
    assert!(query::player(&world).position().x() > 135.0, "player crossed the tile");
    assert_eq!(
        query::player(&world).health,
        Health::new(100 - HARMFUL_OBSTACLE_DAMAGE)
    );
}

#[test]
fn brood_is_not_placed_inside_walls() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena {
            obstacles: vec![Obstacle::solid(Aabb::from_corner(100.0, -5.0, 60.0, 200.0))],
            reference: WorldPoint::ORIGIN,
            settings: Default::default(),
        },
        &mut events,
    );
    spawn(&mut world, AgentKind::Stalker, 130.0, -40.0);

    for _ in 0..30 {
        step(&mut world, &mut combat, tick(100), &mut log);
    }

    assert!(log
        .iter()
        .any(|event| matches!(event, Event::AgentDetonated { .. })));
    let view = query::agent_view(&world);
    assert_eq!(view.len(), 5, "three ring slots fall inside the wall");
    for agent in view.iter() {
        assert!(query::obstacles(&world)
            .iter()
            .all(|obstacle| !agent.bounds.overlaps(obstacle.bounds())));
    }
}

#[test]
fn dead_player_takes_no_further_commands() {
    let mut world = World::new();
    let mut combat = Combat::new();
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::DamagePlayer { amount: 500 }, &mut events);
    assert!(events.contains(&Event::PlayerDied));
    spawn(&mut world, AgentKind::Walker, 10.0, 0.0);

    for _ in 0..100 {
        step(&mut world, &mut combat, tick(100), &mut log);
    }

    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::PlayerDamaged { .. })));
}
