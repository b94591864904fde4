//! Behavior-tree AI controller.

use behavior_tree::Behavior;
use game_core::{AiConfig, MovementIntent, RngOracle, Steering, Vec3, flatten, is_in_front};

use super::platform::PlatformPlanner;
use super::steering::Avoidance;
use super::tree::{TargetTree, target_selection};
use super::{AiBlackboard, Goal, Intent};
use crate::api::{DecisionContext, DecisionPolicy};

/// Per-agent AI controller.
///
/// Each tick runs in two steps:
///
/// 1. **Target selection**: the blackboard is refreshed from the arena and
///    the priority tree picks a [`Goal`].
/// 2. **Steering**: the goal becomes a desired direction, which is refined
///    by obstacle avoidance and optionally overridden by a platform jump.
///    Stochastic gates then decide bites, jumps, barks and zoomies.
///
/// All randomness comes from the arena's [`RngOracle`], so a seeded match
/// replays exactly.
pub struct AiController {
    tree: TargetTree,
    blackboard: AiBlackboard,
    avoidance: Avoidance,
    platforms: PlatformPlanner,
    last_goal: Option<&'static str>,
}

impl AiController {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            tree: target_selection(config),
            blackboard: AiBlackboard::default(),
            avoidance: Avoidance::new(config),
            platforms: PlatformPlanner::new(),
            last_goal: None,
        }
    }

    pub fn blackboard(&self) -> &AiBlackboard {
        &self.blackboard
    }

    pub fn avoidance(&self) -> &Avoidance {
        &self.avoidance
    }

    /// Forgets per-life state after a respawn.
    pub fn reset(&mut self) {
        self.avoidance.reset();
        self.platforms.reset();
        self.last_goal = None;
    }

    fn idle(&self, ai: &AiConfig, dt: f32, rng: &mut dyn RngOracle) -> Steering {
        let mut steering = Steering::idle();
        if rng.chance(ai.idle_turn_chance) {
            steering.face = Some(rng.angle());
        }
        steering.jump = rng.chance(ai.idle_jump_rate * dt);
        steering.bark = rng.chance(ai.idle_bark_rate * dt);
        steering
    }
}

impl std::fmt::Debug for AiController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiController")
            .field("blackboard", &self.blackboard)
            .field("avoidance", &self.avoidance)
            .field("platforms", &self.platforms)
            .field("last_goal", &self.last_goal)
            .finish_non_exhaustive()
    }
}

impl DecisionPolicy for AiController {
    fn select_target(&mut self, ctx: &DecisionContext<'_>, _rng: &mut dyn RngOracle) -> Goal {
        self.blackboard.refresh(ctx);
        self.tree.tick(&mut self.blackboard);
        let goal = self.blackboard.take_goal().unwrap_or(Goal::Idle);

        if self.last_goal != Some(goal.label()) {
            tracing::debug!(
                agent = %ctx.agent.id,
                goal = goal.label(),
                bones = ctx.agent.resource_count(),
                "goal changed"
            );
            self.last_goal = Some(goal.label());
        }
        goal
    }

    fn steer(&mut self, ctx: &DecisionContext<'_>, goal: &Goal, rng: &mut dyn RngOracle) -> MovementIntent {
        let agent = ctx.agent;
        let ai = &ctx.config.ai;
        let dt = ctx.dt;

        if *goal == Goal::Idle {
            return MovementIntent::Steer(self.idle(ai, dt, rng));
        }

        let target = goal.target_agent().and_then(|id| self.blackboard.rival(id).copied());
        let desired = match goal {
            Goal::Flee { destination, .. } => flatten(*destination - agent.position),
            Goal::HuntBone { position, .. } => flatten(*position - agent.position),
            _ => target.map_or(Vec3::ZERO, |t| flatten(t.position - agent.position)),
        };

        let mut steering = Steering::idle();
        steering.speed = goal.speed(ai);
        steering.direction = self
            .avoidance
            .refine(desired, agent.position, agent.size(), &ctx.world, ai, rng);

        let intent = goal.intent();
        let target_height = target.map(|t| t.position.y);
        if let Some(plan) = self
            .platforms
            .plan(agent, intent, target_height, &ctx.world, ctx.config, dt, rng)
        {
            steering.direction = plan.direction;
            steering.jump |= plan.jump;
        }

        let can_bite = !agent.is_biting() && !agent.in_knockback();
        if can_bite {
            if let Some(t) = target {
                let range = goal.bite_range(ai) * agent.size();
                if t.distance <= range && rng.chance(ai.pursue_attack_chance) {
                    steering.attack = true;
                }
            }
        }
        if can_bite && !steering.attack && matches!(intent, Intent::Flee | Intent::Hunt) {
            let forward = agent.forward();
            let facing_dot = ctx.config.combat.facing_dot;
            let threat_ahead = self.blackboard.rivals.iter().any(|r| {
                r.distance <= ai.threat_distance && is_in_front(agent.position, forward, r.position, facing_dot)
            });
            if threat_ahead && rng.chance(ai.defensive_attack_chance) {
                steering.attack = true;
            }
        }

        let bite_incoming = self
            .blackboard
            .rivals
            .iter()
            .any(|r| r.is_biting && r.distance <= ai.threat_distance);
        if bite_incoming && rng.chance(ai.defensive_jump_rate * dt) {
            steering.jump = true;
        }

        steering.bark = rng.chance(ai.active_bark_rate * dt);
        steering.zoomies = rng.chance(ai.zoomies_rate * dt);
        MovementIntent::Steer(steering)
    }
}
