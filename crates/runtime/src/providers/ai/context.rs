//! AI blackboard.
//!
//! The [`AiBlackboard`] is the context the target-selection tree runs
//! against. It is refreshed from the arena once per tick and owns plain
//! copies of what the rules need, so the tree itself carries no lifetimes.
//! The chosen [`Goal`] is written back into it by the winning leaf.

use game_core::{AgentId, BoneId, Vec3, flatten, horizontal_distance};

use super::Goal;
use crate::api::DecisionContext;

/// Snapshot of one rival for this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RivalInfo {
    pub id: AgentId,
    pub position: Vec3,
    pub forward: Vec3,
    pub resource_count: u32,
    pub is_jumping: bool,
    pub is_biting: bool,
    /// Other agents within pack radius of this rival.
    pub pack_pressure: usize,
    /// Horizontal distance from the deciding agent.
    pub distance: f32,
}

impl RivalInfo {
    /// Whether the rival is turned away from `from`.
    pub fn facing_away_from(&self, from: Vec3) -> bool {
        let to_me = flatten(from - self.position).normalize_or_zero();
        self.forward.dot(to_me) < 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneInfo {
    pub id: BoneId,
    pub position: Vec3,
    pub distance: f32,
}

/// Per-agent decision context.
#[derive(Clone, Debug, Default)]
pub struct AiBlackboard {
    pub agent: AgentId,
    pub position: Vec3,
    pub resource_count: u32,
    pub revenge: Option<AgentId>,
    pub rivals: Vec<RivalInfo>,
    pub bones: Vec<BoneInfo>,
    pub(super) goal: Option<Goal>,
}

impl AiBlackboard {
    /// Rebuilds the snapshot in place, reusing allocations.
    pub fn refresh(&mut self, ctx: &DecisionContext<'_>) {
        let me = ctx.agent;
        self.agent = me.id;
        self.position = me.position;
        self.resource_count = me.resource_count();
        self.revenge = me.revenge_target();
        self.goal = None;

        let pack_radius = ctx.config.ai.pack_radius;
        let living: Vec<(AgentId, Vec3)> = ctx
            .agents
            .iter()
            .zip(ctx.active.iter())
            .filter(|(agent, active)| **active && !agent.is_dying())
            .map(|(agent, _)| (agent.id, agent.position))
            .collect();

        self.rivals.clear();
        self.rivals.extend(ctx.rivals().map(|rival| {
            let pack_pressure = living
                .iter()
                .filter(|(id, pos)| *id != rival.id && horizontal_distance(*pos, rival.position) <= pack_radius)
                .count();
            RivalInfo {
                id: rival.id,
                position: rival.position,
                forward: rival.forward(),
                resource_count: rival.resource_count(),
                is_jumping: rival.is_jumping,
                is_biting: rival.is_biting(),
                pack_pressure,
                distance: horizontal_distance(me.position, rival.position),
            }
        }));

        self.bones.clear();
        self.bones.extend(ctx.bones.iter().filter(|b| b.is_collectible()).map(|b| BoneInfo {
            id: b.id,
            position: b.position,
            distance: horizontal_distance(me.position, b.position),
        }));
    }

    pub fn rival(&self, id: AgentId) -> Option<&RivalInfo> {
        self.rivals.iter().find(|r| r.id == id)
    }

    pub fn nearest_rival(&self) -> Option<&RivalInfo> {
        self.rivals.iter().min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Rival holding the most bones; the nearer one wins ties.
    pub fn leader(&self) -> Option<&RivalInfo> {
        self.rivals.iter().min_by(|a, b| {
            b.resource_count
                .cmp(&a.resource_count)
                .then(a.distance.total_cmp(&b.distance))
        })
    }

    /// Weakest rival within `max_distance` holding at most `ratio` times our
    /// count.
    pub fn weakest_viable(&self, max_distance: f32, ratio: f32) -> Option<&RivalInfo> {
        let ceiling = self.resource_count as f32 * ratio;
        self.rivals
            .iter()
            .filter(|r| r.distance <= max_distance && r.resource_count as f32 <= ceiling)
            .min_by(|a, b| {
                a.resource_count
                    .cmp(&b.resource_count)
                    .then(a.distance.total_cmp(&b.distance))
            })
    }

    pub fn nearest_bone(&self, max_distance: f32) -> Option<&BoneInfo> {
        self.bones
            .iter()
            .filter(|b| b.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Best bone to flee toward along `away`: alignment times proximity.
    pub fn best_escape_bone(&self, away: Vec3, radius: f32) -> Option<(BoneInfo, f32)> {
        self.bones
            .iter()
            .filter(|b| b.distance > f32::EPSILON && b.distance <= radius)
            .map(|b| {
                let dir = flatten(b.position - self.position).normalize_or_zero();
                let score = away.dot(dir) * (1.0 - b.distance / radius);
                (*b, score)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.goal = Some(goal);
    }

    pub fn goal(&self) -> Option<&Goal> {
        self.goal.as_ref()
    }

    pub fn take_goal(&mut self) -> Option<Goal> {
        self.goal.take()
    }
}
