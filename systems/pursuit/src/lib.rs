#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuit system that steers every awake agent towards the player.

mod controller;

use std::{collections::BTreeMap, time::Duration};

use outbreak_core::{AgentId, AgentView, Command, Event, PlayerSnapshot};
use outbreak_navigation::PathFinder;
use tracing::debug;

pub use controller::{
    PursuitBody, PursuitController, PursuitMode, PursuitOutcome, Terrain, REPLAN_COOLDOWN,
};

/// Pure system that reacts to world events and emits steering commands.
#[derive(Debug, Default)]
pub struct Pursuit {
    controllers: BTreeMap<AgentId, PursuitController>,
    finder: PathFinder,
    searches: u64,
}

impl Pursuit {
    /// Consumes world events and immutable views to emit steering commands.
    ///
    /// Every agent is evaluated against the same player snapshot, so the
    /// order in which agents are processed never changes their decisions.
    pub fn handle(
        &mut self,
        events: &[Event],
        agents: &AgentView,
        player: &PlayerSnapshot,
        terrain: Terrain<'_>,
        now: Duration,
        out: &mut Vec<Command>,
    ) {
        let mut advanced = false;
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => advanced = true,
                Event::AgentDestroyed { agent, .. } | Event::AgentDetonated { agent, .. } => {
                    let _ = self.controllers.remove(agent);
                }
                Event::ArenaConfigured { .. } => {
                    for controller in self.controllers.values_mut() {
                        controller.forget_path();
                    }
                }
                _ => {}
            }
        }

        if !advanced || player.is_dead() {
            return;
        }

        self.controllers.retain(|id, _| agents.get(*id).is_some());

        let target = player.position();
        for agent in agents.iter() {
            let dormant_for = agent.kind.profile().dormant_for;
            if now.saturating_sub(agent.spawned_at) < dormant_for {
                continue;
            }

            let controller = self
                .controllers
                .entry(agent.id)
                .or_insert_with(|| PursuitController::new(agent.spawned_at));
            let mut body = PursuitBody::from(agent);
            let outcome = controller.update(&mut body, target, terrain, &mut self.finder, now);

            if outcome.replanned {
                self.searches += 1;
                debug!(
                    agent = agent.id.get(),
                    waypoints = controller.path().map_or(0, |path| path.len()),
                    expanded = self.finder.last_expanded(),
                    "pursuit replanned"
                );
            }

            if outcome.moved || body.facing != agent.facing {
                out.push(Command::SteerAgent {
                    agent: agent.id,
                    destination: body.position(),
                    facing: body.facing,
                });
            }
        }
    }

    /// Total number of path searches run so far.
    #[must_use]
    pub const fn searches(&self) -> u64 {
        self.searches
    }

    /// Controller state for an agent that has been evaluated at least once.
    #[must_use]
    pub fn controller(&self, agent: AgentId) -> Option<&PursuitController> {
        self.controllers.get(&agent)
    }
}
