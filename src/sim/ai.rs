//! Enemy agents and the AI controller
//!
//! Each archetype maps to a behavior set through a strategy table rather
//! than a subclass hierarchy. Physics integration runs every tick for every
//! active agent; the decision step (retargeting, waypoint advance, ambush
//! activation) runs only when an agent's per-archetype decision deadline
//! passes, since force recomputation is the expensive part, not
//! integration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ArchetypeTable;

use super::rng::SeqRng;
use super::steering::{
    ARRIVAL_RADIUS, Steering, WANDER_JITTER, WeightedSteering, accumulate, truncate,
};

/// Separation radius for pack archetypes
const SEPARATION_RADIUS: f32 = 48.0;
/// Blend weight of separation against the primary behavior
const SEPARATION_WEIGHT: f32 = 0.8;

/// Enemy archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// Continuously re-seeks the player, spreading out from packmates
    Chaser,
    /// Cycles through waypoints
    Patrol,
    /// Wanders on a forward-projected circle
    Zigzag,
    /// Inert until the player comes close, then pursues at high speed
    Ambush,
}

/// Ambush two-state machine; the transition is one-shot per spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbushPhase {
    Dormant,
    Active,
}

/// Per-archetype mutable state
#[derive(Debug, Clone, PartialEq)]
pub enum ArchetypeState {
    Chaser,
    Patrol { waypoints: Vec<Vec2>, current: usize },
    Zigzag { wander_theta: f32 },
    Ambush { phase: AmbushPhase },
}

/// A kinematic agent driven by weighted steering forces
#[derive(Debug, Clone)]
pub struct SteeringAgent {
    pub id: u32,
    pub archetype: Archetype,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current speed ceiling; zero while an Ambush is dormant
    pub max_speed: f32,
    pub max_force: f32,
    pub health: f32,
    pub active: bool,
    /// Behavior set rebuilt by the decision step
    pub behaviors: Vec<WeightedSteering>,
    pub state: ArchetypeState,
    next_decision_ms: f64,
}

impl SteeringAgent {
    /// Apply damage; returns true when this kills the agent. A dead agent
    /// is marked inactive and dropped from the simulation on the next
    /// sweep.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.active {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.active = false;
            log::debug!("Agent {} ({:?}) died", self.id, self.archetype);
            return true;
        }
        false
    }

    /// Deactivate and zero for pool reuse
    pub fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.max_speed = 0.0;
        self.health = 0.0;
        self.active = false;
        self.behaviors.clear();
        self.next_decision_ms = 0.0;
    }
}

/// Owns every live agent plus an independent RNG stream (never shared with
/// the procedural generator)
pub struct EnemyAiController {
    table: ArchetypeTable,
    agents: Vec<SteeringAgent>,
    rng: SeqRng,
    next_id: u32,
    scratch: Vec<Vec2>,
}

impl EnemyAiController {
    pub fn new(table: ArchetypeTable, seed: u64) -> Self {
        Self {
            table,
            agents: Vec::new(),
            rng: SeqRng::new(seed),
            next_id: 1,
            scratch: Vec::new(),
        }
    }

    /// Create an agent from the archetype's factory parameters
    pub fn spawn(&mut self, archetype: Archetype, pos: Vec2) -> u32 {
        let params = *self.table.params(archetype);
        let id = self.next_id;
        self.next_id += 1;

        let (max_speed, state) = match archetype {
            Archetype::Chaser => (params.max_speed, ArchetypeState::Chaser),
            Archetype::Patrol => {
                // Ping-pong leg across the lanes at spawn height
                let waypoints = vec![
                    pos - Vec2::new(params.patrol_span, 0.0),
                    pos + Vec2::new(params.patrol_span, 0.0),
                ];
                (params.max_speed, ArchetypeState::Patrol {
                    waypoints,
                    current: 0,
                })
            }
            Archetype::Zigzag => {
                let theta = self.rng.next_f32() * std::f32::consts::TAU;
                (params.max_speed, ArchetypeState::Zigzag {
                    wander_theta: theta,
                })
            }
            // Dormant until the activation check flips the phase
            Archetype::Ambush => (0.0, ArchetypeState::Ambush {
                phase: AmbushPhase::Dormant,
            }),
        };

        self.agents.push(SteeringAgent {
            id,
            archetype,
            pos,
            vel: Vec2::ZERO,
            max_speed,
            max_force: params.max_force,
            health: params.health,
            active: true,
            behaviors: Vec::new(),
            state,
            next_decision_ms: 0.0,
        });
        id
    }

    /// Physics integration: every tick, every active agent. Velocity is
    /// clamped to `max_speed` after each step.
    pub fn integrate(&mut self, dt: f32) {
        let mut neighbors = std::mem::take(&mut self.scratch);
        neighbors.clear();
        neighbors.extend(self.agents.iter().filter(|a| a.active).map(|a| a.pos));

        for agent in self.agents.iter_mut().filter(|a| a.active) {
            let force = accumulate(
                &agent.behaviors,
                agent.pos,
                agent.vel,
                agent.max_speed,
                agent.max_force,
                &neighbors,
            );
            agent.vel = truncate(agent.vel + force * dt, agent.max_speed);
            agent.pos += agent.vel * dt;
        }
        self.scratch = neighbors;
    }

    /// Decision step: rebuild behavior sets for agents whose deadline has
    /// passed. Runs the ambush activation check.
    pub fn decide(&mut self, now_ms: f64, player_pos: Vec2, player_vel: Vec2) {
        for agent in self.agents.iter_mut().filter(|a| a.active) {
            if now_ms < agent.next_decision_ms {
                continue;
            }
            let params = self.table.params(agent.archetype);
            agent.next_decision_ms = now_ms + params.ai_update_interval_ms;

            agent.behaviors.clear();
            match &mut agent.state {
                ArchetypeState::Chaser => {
                    agent.behaviors.push(WeightedSteering {
                        steering: Steering::Seek { target: player_pos },
                        weight: 1.0,
                    });
                    agent.behaviors.push(WeightedSteering {
                        steering: Steering::Separation {
                            radius: SEPARATION_RADIUS,
                        },
                        weight: SEPARATION_WEIGHT,
                    });
                }
                ArchetypeState::Patrol { waypoints, current } => {
                    if agent.pos.distance(waypoints[*current]) < ARRIVAL_RADIUS {
                        *current = (*current + 1) % waypoints.len();
                    }
                    agent.behaviors.push(WeightedSteering {
                        steering: Steering::Seek {
                            target: waypoints[*current],
                        },
                        weight: 1.0,
                    });
                }
                ArchetypeState::Zigzag { wander_theta } => {
                    *wander_theta += (self.rng.next_f32() * 2.0 - 1.0) * WANDER_JITTER;
                    agent.behaviors.push(WeightedSteering {
                        steering: Steering::Wander {
                            theta: *wander_theta,
                        },
                        weight: 1.0,
                    });
                }
                ArchetypeState::Ambush { phase } => {
                    if *phase == AmbushPhase::Dormant
                        && agent.pos.distance(player_pos) <= params.activation_radius
                    {
                        *phase = AmbushPhase::Active;
                        agent.max_speed = params.max_speed;
                        log::debug!("Ambush {} activated", agent.id);
                    }
                    if *phase == AmbushPhase::Active {
                        agent.behaviors.push(WeightedSteering {
                            steering: Steering::Pursue {
                                target: player_pos,
                                target_vel: player_vel,
                            },
                            weight: 1.0,
                        });
                    }
                }
            }
        }
    }

    /// Damage an agent by id; returns true if this killed it
    pub fn damage(&mut self, id: u32, amount: f32) -> bool {
        match self.agents.iter_mut().find(|a| a.id == id) {
            Some(agent) => agent.take_damage(amount),
            None => false,
        }
    }

    /// Drop agents killed since the last sweep
    pub fn sweep_dead(&mut self) {
        self.agents.retain(|a| a.active);
    }

    /// Drop agents the player has left behind
    pub fn despawn_behind(&mut self, min_distance: f32) {
        self.agents.retain(|a| a.pos.y >= min_distance);
    }

    pub fn agents(&self) -> &[SteeringAgent] {
        &self.agents
    }

    pub fn agent(&self, id: u32) -> Option<&SteeringAgent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Clear every agent (run reset)
    pub fn reset(&mut self, seed: u64) {
        self.agents.clear();
        self.rng.set_seed(seed);
        self.next_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;

    fn controller() -> EnemyAiController {
        EnemyAiController::new(SimConfig::default().archetypes, 77)
    }

    #[test]
    fn test_chaser_closes_on_player() {
        let mut ai = controller();
        let id = ai.spawn(Archetype::Chaser, Vec2::new(0.0, 100.0));
        let player = Vec2::new(0.0, 0.0);

        ai.decide(0.0, player, Vec2::ZERO);
        let start = ai.agent(id).unwrap().pos;
        for _ in 0..60 {
            ai.integrate(1.0 / 60.0);
        }
        let end = ai.agent(id).unwrap().pos;
        assert!(end.distance(player) < start.distance(player));
    }

    #[test]
    fn test_velocity_clamped_to_max_speed() {
        let mut ai = controller();
        let id = ai.spawn(Archetype::Chaser, Vec2::new(500.0, 500.0));
        ai.decide(0.0, Vec2::ZERO, Vec2::ZERO);
        for _ in 0..300 {
            ai.integrate(1.0 / 60.0);
            let agent = ai.agent(id).unwrap();
            assert!(agent.vel.length() <= agent.max_speed * 1.001);
        }
    }

    #[test]
    fn test_patrol_advances_waypoints_cyclically() {
        let mut ai = controller();
        let spawn_pos = Vec2::new(0.0, 200.0);
        let id = ai.spawn(Archetype::Patrol, spawn_pos);
        let span = SimConfig::default().archetypes.patrol.patrol_span;
        let left = spawn_pos - Vec2::new(span, 0.0);
        let right = spawn_pos + Vec2::new(span, 0.0);
        let far_player = Vec2::new(0.0, -1000.0);

        // First decision seeks the left leg
        ai.decide(0.0, far_player, Vec2::ZERO);
        assert_eq!(
            ai.agent(id).unwrap().behaviors[0].steering,
            Steering::Seek { target: left }
        );

        // Arriving at the waypoint advances to the right leg
        ai.agents[0].pos = left;
        ai.decide(400.0, far_player, Vec2::ZERO);
        assert_eq!(
            ai.agent(id).unwrap().behaviors[0].steering,
            Steering::Seek { target: right }
        );

        // And cyclically back to the left leg
        ai.agents[0].pos = right;
        ai.decide(800.0, far_player, Vec2::ZERO);
        assert_eq!(
            ai.agent(id).unwrap().behaviors[0].steering,
            Steering::Seek { target: left }
        );
    }

    #[test]
    fn test_ambush_dormant_until_player_in_radius() {
        let config = SimConfig::default();
        let radius = config.archetypes.ambush.activation_radius;
        let mut ai = controller();
        let id = ai.spawn(Archetype::Ambush, Vec2::ZERO);

        // Player outside the activation radius: stays inert
        ai.decide(0.0, Vec2::new(0.0, radius + 50.0), Vec2::ZERO);
        assert_eq!(ai.agent(id).unwrap().max_speed, 0.0);
        ai.integrate(1.0 / 60.0);
        assert_eq!(ai.agent(id).unwrap().pos, Vec2::ZERO);

        // Player inside: activates on the first decision tick after entry
        ai.decide(1000.0, Vec2::new(0.0, radius - 1.0), Vec2::ZERO);
        let agent = ai.agent(id).unwrap();
        assert!(agent.max_speed > 0.0);
        assert_eq!(agent.state, ArchetypeState::Ambush {
            phase: AmbushPhase::Active
        });
    }

    #[test]
    fn test_ambush_activation_is_irreversible() {
        let config = SimConfig::default();
        let radius = config.archetypes.ambush.activation_radius;
        let mut ai = controller();
        let id = ai.spawn(Archetype::Ambush, Vec2::ZERO);

        ai.decide(0.0, Vec2::new(0.0, radius - 1.0), Vec2::ZERO);
        assert!(ai.agent(id).unwrap().max_speed > 0.0);

        // Player leaves the radius; the ambush keeps pursuing
        ai.decide(1000.0, Vec2::new(0.0, radius * 10.0), Vec2::ZERO);
        let agent = ai.agent(id).unwrap();
        assert!(agent.max_speed > 0.0);
        assert!(!agent.behaviors.is_empty());
    }

    #[test]
    fn test_decisions_respect_the_update_interval() {
        let mut ai = controller();
        let id = ai.spawn(Archetype::Chaser, Vec2::new(0.0, 300.0));
        let first_target = Vec2::new(-50.0, 0.0);
        let second_target = Vec2::new(50.0, 0.0);

        ai.decide(0.0, first_target, Vec2::ZERO);
        // Well inside the 200ms chaser interval: no retarget
        ai.decide(10.0, second_target, Vec2::ZERO);
        assert_eq!(
            ai.agent(id).unwrap().behaviors[0].steering,
            Steering::Seek {
                target: first_target
            }
        );

        // Past the deadline the new target lands
        ai.decide(250.0, second_target, Vec2::ZERO);
        assert_eq!(
            ai.agent(id).unwrap().behaviors[0].steering,
            Steering::Seek {
                target: second_target
            }
        );
    }

    #[test]
    fn test_damage_kills_and_sweep_removes() {
        let mut ai = controller();
        let id = ai.spawn(Archetype::Chaser, Vec2::ZERO);

        assert!(!ai.damage(id, 0.4));
        assert!(ai.damage(id, 0.7));
        // Dead but still present until the sweep
        assert!(ai.agent(id).is_some());
        assert!(!ai.agent(id).unwrap().active);

        ai.sweep_dead();
        assert!(ai.agent(id).is_none());
    }

    #[test]
    fn test_despawn_behind() {
        let mut ai = controller();
        let behind = ai.spawn(Archetype::Chaser, Vec2::new(0.0, 100.0));
        let ahead = ai.spawn(Archetype::Chaser, Vec2::new(0.0, 900.0));
        ai.despawn_behind(500.0);
        assert!(ai.agent(behind).is_none());
        assert!(ai.agent(ahead).is_some());
    }

    #[test]
    fn test_agent_reset_for_pool_reuse() {
        let mut ai = controller();
        let id = ai.spawn(Archetype::Chaser, Vec2::new(10.0, 10.0));
        ai.decide(0.0, Vec2::ZERO, Vec2::ZERO);
        ai.integrate(1.0 / 60.0);

        let agent = ai.agents.iter_mut().find(|a| a.id == id).unwrap();
        agent.reset();
        assert!(!agent.active);
        assert_eq!(agent.vel, Vec2::ZERO);
        assert!(agent.behaviors.is_empty());
    }
}
