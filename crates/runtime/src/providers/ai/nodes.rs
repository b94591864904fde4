//! Leaf nodes of the target-selection tree.
//!
//! Each rule is a condition and an action fused into one node: on `Success`
//! it has written its [`Goal`] into the blackboard. Rules read the
//! blackboard only; none of them touches the world. Single predicates are
//! plain functions wrapped by closure leaves in the tree.

use behavior_tree::{Behavior, Status};
use game_core::{Vec3, flatten};

use super::{AiBlackboard, Goal};

/// Pursues the last attacker while the grudge lasts.
pub struct RevengeOnAttacker {
    pub distance: f32,
    pub min_bones: u32,
}

impl Behavior<AiBlackboard> for RevengeOnAttacker {
    fn tick(&self, ctx: &mut AiBlackboard) -> Status {
        let Some(attacker) = ctx.revenge else {
            return Status::Failure;
        };
        if ctx.resource_count < self.min_bones {
            return Status::Failure;
        }
        match ctx.rival(attacker) {
            Some(rival) if rival.distance <= self.distance => {
                ctx.set_goal(Goal::Revenge { target: attacker });
                Status::Success
            }
            _ => Status::Failure,
        }
    }
}

/// Goes after the leader when it is exposed or running away with the game.
pub struct TargetLeader {
    pub distance: f32,
    pub dominance_ratio: f32,
    pub flank_bonus: f32,
    pub pack_size: usize,
    pub min_safe_bones: u32,
}

impl Behavior<AiBlackboard> for TargetLeader {
    fn tick(&self, ctx: &mut AiBlackboard) -> Status {
        let Some(leader) = ctx.leader().copied() else {
            return Status::Failure;
        };
        if leader.resource_count == 0 {
            return Status::Failure;
        }

        let flanking = leader.facing_away_from(ctx.position);
        let vulnerable = flanking || leader.is_jumping || leader.pack_pressure >= self.pack_size;
        let effective = if flanking {
            leader.distance * self.flank_bonus
        } else {
            leader.distance
        };
        if effective > self.distance {
            return Status::Failure;
        }

        let safe = ctx.resource_count >= self.min_safe_bones;
        let dominant = leader.resource_count as f32 > ctx.resource_count as f32 * self.dominance_ratio;
        if !(safe && vulnerable) && !dominant {
            return Status::Failure;
        }

        ctx.set_goal(Goal::Leader {
            target: leader.id,
            sneaking: !vulnerable,
            flanking,
        });
        Status::Success
    }
}

/// The nearest rival is close and clearly stronger.
pub fn is_threatened(ctx: &AiBlackboard, distance: f32, strength_ratio: f32) -> bool {
    threat(ctx, distance, strength_ratio).is_some()
}

fn threat(ctx: &AiBlackboard, distance: f32, strength_ratio: f32) -> Option<(game_core::AgentId, Vec3)> {
    let nearest = ctx.nearest_rival()?;
    let stronger = (ctx.resource_count as f32) < nearest.resource_count as f32 * strength_ratio;
    (nearest.distance <= distance && stronger).then_some((nearest.id, nearest.position))
}

fn away_from(ctx: &AiBlackboard, threat: Vec3) -> Vec3 {
    let away = flatten(ctx.position - threat).normalize_or_zero();
    if away == Vec3::ZERO { Vec3::Z } else { away }
}

/// Escape score of the best bone along the away vector, zero if none
/// clears `min_score`. Used as the utility of [`FleeTowardBone`].
pub fn escape_bone_score(ctx: &AiBlackboard, radius: f32, min_score: f32) -> f32 {
    let Some(nearest) = ctx.nearest_rival() else {
        return 0.0;
    };
    let away = away_from(ctx, nearest.position);
    match ctx.best_escape_bone(away, radius) {
        Some((_, score)) if score > min_score => score,
        _ => 0.0,
    }
}

/// Flees toward the best-aligned nearby bone.
pub struct FleeTowardBone {
    pub distance: f32,
    pub strength_ratio: f32,
    pub radius: f32,
}

impl Behavior<AiBlackboard> for FleeTowardBone {
    fn tick(&self, ctx: &mut AiBlackboard) -> Status {
        let Some((threat_id, threat_pos)) = threat(ctx, self.distance, self.strength_ratio) else {
            return Status::Failure;
        };
        let away = away_from(ctx, threat_pos);
        let Some((bone, _)) = ctx.best_escape_bone(away, self.radius) else {
            return Status::Failure;
        };
        ctx.set_goal(Goal::Flee {
            threat: threat_id,
            destination: bone.position,
            via_bone: Some(bone.id),
        });
        Status::Success
    }
}

/// Flees straight away from the threat.
pub struct FleeDirect {
    pub distance: f32,
    pub strength_ratio: f32,
    pub run_distance: f32,
}

impl Behavior<AiBlackboard> for FleeDirect {
    fn tick(&self, ctx: &mut AiBlackboard) -> Status {
        let Some((threat_id, threat_pos)) = threat(ctx, self.distance, self.strength_ratio) else {
            return Status::Failure;
        };
        let destination = ctx.position + away_from(ctx, threat_pos) * self.run_distance;
        ctx.set_goal(Goal::Flee {
            threat: threat_id,
            destination,
            via_bone: None,
        });
        Status::Success
    }
}

/// Picks on the weakest nearby rival once we hold a safe number of bones.
pub struct AttackWeakest {
    pub distance: f32,
    pub ratio: f32,
    pub min_safe_bones: u32,
}

impl Behavior<AiBlackboard> for AttackWeakest {
    fn tick(&self, ctx: &mut AiBlackboard) -> Status {
        if ctx.resource_count < self.min_safe_bones {
            return Status::Failure;
        }
        match ctx.weakest_viable(self.distance, self.ratio) {
            Some(rival) => {
                let target = rival.id;
                ctx.set_goal(Goal::AttackWeakest { target });
                Status::Success
            }
            None => Status::Failure,
        }
    }
}

/// Walks to the nearest bone unless a stronger rival is too close.
pub struct HuntBone {
    pub radius: f32,
    pub danger_radius: f32,
}

impl Behavior<AiBlackboard> for HuntBone {
    fn tick(&self, ctx: &mut AiBlackboard) -> Status {
        let danger = ctx
            .rivals
            .iter()
            .any(|r| r.distance <= self.danger_radius && r.resource_count > ctx.resource_count);
        if danger {
            return Status::Failure;
        }
        match ctx.nearest_bone(self.radius).copied() {
            Some(bone) => {
                ctx.set_goal(Goal::HuntBone {
                    bone: bone.id,
                    position: bone.position,
                });
                Status::Success
            }
            None => Status::Failure,
        }
    }
}
