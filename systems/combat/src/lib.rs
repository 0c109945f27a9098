#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves hits, contact damage and special attacks.

use std::{collections::BTreeMap, f32::consts::TAU, time::Duration};

use outbreak_core::{
    Aabb, AgentId, AgentKind, AgentSnapshot, AgentView, Command, Event, HazardSnapshot, Obstacle,
    PlayerSnapshot, ProjectileSnapshot, WorldPoint,
};
use tracing::debug;

/// Damage dealt per tick while the player overlaps a harmful obstacle.
pub const HARMFUL_OBSTACLE_DAMAGE: u32 = 5;

/// Read-only state the combat system inspects every tick.
#[derive(Clone, Copy, Debug)]
pub struct Battlefield<'a> {
    /// Agents currently in the arena.
    pub agents: &'a AgentView,
    /// The player's state.
    pub player: &'a PlayerSnapshot,
    /// Projectiles in flight, ordered by identifier.
    pub projectiles: &'a [ProjectileSnapshot],
    /// Active toxic hazards, ordered by identifier.
    pub hazards: &'a [HazardSnapshot],
    /// Static obstacles of the arena.
    pub obstacles: &'a [Obstacle],
}

/// Combat system that queues damage, detonation and hazard commands.
#[derive(Debug, Default)]
pub struct Combat {
    last_ranged_attack: BTreeMap<AgentId, Duration>,
    pending_damage: BTreeMap<AgentId, u32>,
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a combat system with no attack history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits combat commands for the tick announced in `events`.
    ///
    /// Projectile hits are resolved first, so an agent destroyed by a hit
    /// neither detonates nor attacks in the same tick. The player receives at
    /// most one damage command per tick because the first hit grants
    /// invulnerability.
    pub fn handle(
        &mut self,
        events: &[Event],
        battlefield: Battlefield<'_>,
        now: Duration,
        out: &mut Vec<Command>,
    ) {
        let mut advanced = false;
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => advanced = true,
                Event::AgentDestroyed { agent, .. } | Event::AgentDetonated { agent, .. } => {
                    let _ = self.last_ranged_attack.remove(agent);
                }
                _ => {}
            }
        }

        if !advanced {
            return;
        }

        self.scratch.clear();
        self.pending_damage.clear();

        self.resolve_projectile_hits(battlefield);
        if !battlefield.player.is_dead() {
            self.trigger_specials(battlefield, now);
            self.damage_player(battlefield);
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    /// Simulated time of the most recent ranged attack by `agent`.
    #[must_use]
    pub fn last_ranged_attack(&self, agent: AgentId) -> Option<Duration> {
        self.last_ranged_attack.get(&agent).copied()
    }

    fn resolve_projectile_hits(&mut self, battlefield: Battlefield<'_>) {
        for projectile in battlefield.projectiles {
            let struck = battlefield.agents.iter().find(|agent| {
                !self.is_doomed(agent)
                    && projectile.position.distance_to(agent.position()) < agent.kind.size()
            });
            let Some(agent) = struck else {
                continue;
            };

            *self.pending_damage.entry(agent.id).or_default() += projectile.damage;
            self.scratch.push(Command::ResolveProjectileHit {
                projectile: projectile.id,
                agent: agent.id,
            });
        }
    }

    fn trigger_specials(&mut self, battlefield: Battlefield<'_>, now: Duration) {
        let target = battlefield.player.position();
        for agent in battlefield.agents.iter() {
            if self.is_doomed(agent) {
                continue;
            }
            let profile = agent.kind.profile();
            let distance = agent.position().distance_to(target);

            if let Some(detonation) = profile.detonation {
                let awake = now.saturating_sub(agent.spawned_at) >= profile.dormant_for;
                if awake && distance < detonation.trigger_radius {
                    debug!(agent = agent.id.get(), brood = detonation.brood, "agent bursting");
                    let _ = self.pending_damage.insert(agent.id, agent.health.get());
                    self.scratch.push(Command::DetonateAgent { agent: agent.id });
                    push_brood(
                        agent.position(),
                        detonation.brood,
                        detonation.brood_radius,
                        battlefield.obstacles,
                        &mut self.scratch,
                    );
                    continue;
                }
            }

            if let Some(ranged) = profile.ranged_attack {
                let last = *self
                    .last_ranged_attack
                    .entry(agent.id)
                    .or_insert(agent.spawned_at);
                if distance <= ranged.range && now.saturating_sub(last) >= ranged.cooldown {
                    let _ = self.last_ranged_attack.insert(agent.id, now);
                    self.scratch.push(Command::CreateHazard { center: target });
                }
            }
        }
    }

    fn damage_player(&mut self, battlefield: Battlefield<'_>) {
        let player = battlefield.player;
        if player.invulnerable {
            return;
        }

        let contact = battlefield
            .agents
            .iter()
            .find(|agent| !self.is_doomed(agent) && agent.bounds.overlaps(&player.bounds))
            .map(|agent| agent.kind.profile().contact_damage);
        let burning = battlefield
            .obstacles
            .iter()
            .any(|obstacle| obstacle.is_harmful() && obstacle.bounds().overlaps(&player.bounds))
            .then_some(HARMFUL_OBSTACLE_DAMAGE);
        let poisoned = battlefield
            .hazards
            .iter()
            .find(|hazard| hazard.center.distance_to(player.position()) <= hazard.radius)
            .map(|hazard| hazard.damage);

        if let Some(amount) = contact.or(burning).or(poisoned) {
            self.scratch.push(Command::DamagePlayer { amount });
        }
    }

    fn is_doomed(&self, agent: &AgentSnapshot) -> bool {
        self.pending_damage
            .get(&agent.id)
            .map_or(false, |damage| *damage >= agent.health.get())
    }
}

/// Queues brood walkers on a ring, skipping slots that would start inside an
/// obstacle.
fn push_brood(
    center: WorldPoint,
    brood: u32,
    radius: f32,
    obstacles: &[Obstacle],
    out: &mut Vec<Command>,
) {
    if brood == 0 {
        return;
    }
    for index in 0..brood {
        let angle = TAU * index as f32 / brood as f32;
        let position = center + WorldPoint::new(angle.cos(), angle.sin()) * radius;
        let bounds = Aabb::square(position, AgentKind::Walker.size());
        if obstacles
            .iter()
            .any(|obstacle| bounds.overlaps(obstacle.bounds()))
        {
            continue;
        }
        out.push(Command::SpawnAgent {
            kind: AgentKind::Walker,
            position,
            speed_multiplier: 1.0,
        });
    }
}
