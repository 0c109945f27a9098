use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use outbreak_core::{Aabb, AgentKind, Command, Event, GridSettings, WorldPoint};
use outbreak_system_arena::{generate_maze, MazeSettings};
use outbreak_system_spawning::{Config, Spawning, SPAWN_RING_INNER, SPAWN_RING_OUTER};
use outbreak_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SEED: u64 = 0x4d59_5df4_d0f3_3173;

fn advance(spawning: &mut Spawning, world: &World, dt: Duration) -> Vec<Command> {
    let mut commands = Vec::new();
    spawning.handle(
        &[Event::TimeAdvanced { dt }],
        &query::player(world),
        query::obstacles(world),
        &mut commands,
    );
    commands
}

#[test]
fn emits_one_batch_per_elapsed_interval() {
    let world = World::with_player_at(WorldPoint::new(100.0, -50.0));
    let mut spawning = Spawning::new(Config::new(SEED));

    assert!(advance(&mut spawning, &world, Duration::from_millis(2999)).is_empty());

    let commands = advance(&mut spawning, &world, Duration::from_millis(6001));
    assert_eq!(commands.len(), 6, "three intervals of two agents");

    for command in &commands {
        match command {
            Command::SpawnAgent {
                kind,
                position,
                speed_multiplier,
            } => {
                assert_ne!(*kind, AgentKind::Boss);
                let distance = position.distance_to(WorldPoint::new(100.0, -50.0));
                assert!((SPAWN_RING_INNER - 1e-2..=SPAWN_RING_OUTER + 1e-2).contains(&distance));
                assert!((speed_multiplier - 1.0).abs() < f32::EPSILON);
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn difficulty_ramps_every_thirty_seconds() {
    let world = World::new();
    let mut spawning = Spawning::new(Config::new(SEED));

    let _ = advance(&mut spawning, &world, Duration::from_secs(30));

    let encounter = spawning.encounter();
    assert_eq!(encounter.spawn_interval(), Duration::from_millis(2800));
    assert!((encounter.speed_multiplier() - 1.1).abs() < 1e-5);

    let commands = advance(&mut spawning, &world, Duration::from_millis(2800));
    assert!(commands.iter().all(|command| matches!(
        command,
        Command::SpawnAgent { speed_multiplier, .. } if (speed_multiplier - 1.1).abs() < 1e-5
    )));
}

#[test]
fn kills_advance_waves_and_grow_batches() {
    let world = World::new();
    let mut spawning = Spawning::new(Config::new(SEED));
    let kills: Vec<Event> = (0..10)
        .map(|index| Event::AgentDestroyed {
            agent: outbreak_core::AgentId::new(index),
            kind: AgentKind::Walker,
            position: WorldPoint::ORIGIN,
        })
        .collect();

    let mut commands = Vec::new();
    spawning.handle(&kills, &query::player(&world), &[], &mut commands);
    assert!(commands.is_empty(), "kills alone never spawn");
    assert_eq!(spawning.encounter().wave(), 2);

    let commands = advance(&mut spawning, &world, Duration::from_millis(3000));
    assert_eq!(commands.len(), 3);
}

#[test]
fn boss_spawns_once_at_configured_wave() {
    let world = World::new();
    let mut spawning = Spawning::new(Config::new(SEED).with_boss_wave(Some(1)));

    let mut bosses = 0;
    for _ in 0..20 {
        bosses += advance(&mut spawning, &world, Duration::from_millis(3000))
            .iter()
            .filter(|command| matches!(command, Command::SpawnAgent { kind: AgentKind::Boss, .. }))
            .count();
    }

    assert_eq!(bosses, 1);
    assert!(spawning.encounter().boss_spawned());
}

#[test]
fn dead_player_halts_spawning() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::DamagePlayer { amount: 1_000 }, &mut events);
    let mut spawning = Spawning::new(Config::new(SEED));

    assert!(advance(&mut spawning, &world, Duration::from_secs(60)).is_empty());
}

#[test]
fn spawns_never_land_inside_maze_tiles() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let obstacles = generate_maze(WorldPoint::ORIGIN, &MazeSettings::default(), &mut rng)
        .expect("valid maze settings");
    assert!(!obstacles.is_empty());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena {
            obstacles,
            reference: WorldPoint::ORIGIN,
            settings: GridSettings::default(),
        },
        &mut events,
    );

    let mut spawning = Spawning::new(Config::new(SEED));
    let mut spawned = 0;
    for _ in 0..200 {
        for command in advance(&mut spawning, &world, Duration::from_millis(3000)) {
            if let Command::SpawnAgent { kind, position, .. } = command {
                let bounds = Aabb::square(position, kind.size());
                assert!(
                    query::obstacles(&world)
                        .iter()
                        .all(|obstacle| !bounds.overlaps(obstacle.bounds())),
                    "{kind:?} spawned inside a tile at {position:?}"
                );
                spawned += 1;
            }
        }
    }

    assert!(spawned > 300, "only {spawned} agents placed");
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(!first.spawns.is_empty());
    assert_eq!(first.fingerprint(), second.fingerprint());
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(SEED));
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        process_spawning(&mut world, &mut spawning, events, &mut log);
    }

    let agents = query::agent_view(&world)
        .into_vec()
        .into_iter()
        .map(|snapshot| AgentState {
            kind: snapshot.kind,
            position: (
                snapshot.position().x().to_bits(),
                snapshot.position().y().to_bits(),
            ),
        })
        .collect();

    ReplayOutcome {
        agents,
        spawns: log,
    }
}

fn process_spawning(
    world: &mut World,
    spawning: &mut Spawning,
    pending_events: Vec<Event>,
    log: &mut Vec<SpawnRecord>,
) {
    let mut events = pending_events;

    loop {
        if events.is_empty() {
            break;
        }

        let player = query::player(world);
        let mut commands = Vec::new();
        spawning.handle(&events, &player, query::obstacles(world), &mut commands);

        if commands.is_empty() {
            break;
        }

        events.clear();

        for command in commands {
            if let Command::SpawnAgent { kind, position, .. } = &command {
                log.push(SpawnRecord {
                    kind: *kind,
                    position: (position.x().to_bits(), position.y().to_bits()),
                });
            }
            let mut generated_events = Vec::new();
            world::apply(world, command, &mut generated_events);
            events.extend(generated_events);
        }
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    for _ in 0..40 {
        commands.push(Command::Tick {
            dt: Duration::from_millis(750),
        });
    }
    commands.push(Command::Tick {
        dt: Duration::from_secs(5),
    });
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SpawnRecord {
    kind: AgentKind,
    position: (u32, u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct AgentState {
    kind: AgentKind,
    position: (u32, u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReplayOutcome {
    agents: Vec<AgentState>,
    spawns: Vec<SpawnRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.agents.hash(&mut hasher);
        self.spawns.hash(&mut hasher);
        hasher.finish()
    }
}
