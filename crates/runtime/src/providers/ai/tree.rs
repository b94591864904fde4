//! Target-selection tree.
//!
//! A priority selector: the first rule that applies decides the goal.
//!
//! ```text
//! Selector
//! ├── RevengeOnAttacker
//! ├── TargetLeader
//! ├── Sequence
//! │   ├── is_threatened    (condition)
//! │   └── Utility
//! │       ├── FleeTowardBone   (score: escape alignment × proximity)
//! │       └── FleeDirect       (score: acceptance threshold)
//! ├── AttackWeakest
//! ├── HuntBone
//! └── Idle               (action)
//! ```

use behavior_tree::Behavior;
use behavior_tree::builder::{action, condition, score, selector, sequence, utility};
use game_core::AiConfig;

use super::nodes::{
    AttackWeakest, FleeDirect, FleeTowardBone, HuntBone, RevengeOnAttacker, TargetLeader, escape_bone_score,
    is_threatened,
};
use super::{AiBlackboard, Goal};

pub type TargetTree = Box<dyn Behavior<AiBlackboard>>;

/// Builds the tree with thresholds copied out of `config`.
pub fn target_selection(config: &AiConfig) -> TargetTree {
    let flee_radius = config.flee_bone_radius;
    let flee_min = config.flee_bone_min_score;
    let flee_distance = config.flee_distance;
    let flee_ratio = config.flee_strength_ratio;

    selector(vec![
        Box::new(RevengeOnAttacker {
            distance: config.revenge_distance,
            min_bones: config.revenge_min_bones,
        }),
        Box::new(TargetLeader {
            distance: config.leader_attack_distance,
            dominance_ratio: config.leader_dominance_ratio,
            flank_bonus: config.flank_bonus,
            pack_size: config.pack_size,
            min_safe_bones: config.min_safe_bones,
        }),
        sequence(vec![
            condition(move |ctx: &AiBlackboard| is_threatened(ctx, flee_distance, flee_ratio)),
            utility(vec![
                (
                    Box::new(FleeTowardBone {
                        distance: config.flee_distance,
                        strength_ratio: config.flee_strength_ratio,
                        radius: flee_radius,
                    }),
                    score(move |ctx: &AiBlackboard| escape_bone_score(ctx, flee_radius, flee_min)),
                ),
                (
                    Box::new(FleeDirect {
                        distance: config.flee_distance,
                        strength_ratio: config.flee_strength_ratio,
                        run_distance: config.flee_run_distance,
                    }),
                    score(move |_: &AiBlackboard| flee_min.max(f32::EPSILON)),
                ),
            ]),
        ]),
        Box::new(AttackWeakest {
            distance: config.chase_distance,
            ratio: config.weak_ratio,
            min_safe_bones: config.min_safe_bones,
        }),
        Box::new(HuntBone {
            radius: config.hunt_radius,
            danger_radius: config.hunt_danger_radius,
        }),
        action(|ctx: &mut AiBlackboard| {
            ctx.set_goal(Goal::Idle);
            true
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::context::{BoneInfo, RivalInfo};
    use game_core::{AgentId, BoneId, Vec3};

    fn rival(id: u32, position: Vec3, bones: u32, forward: Vec3) -> RivalInfo {
        RivalInfo {
            id: AgentId(id),
            position,
            forward,
            resource_count: bones,
            is_jumping: false,
            is_biting: false,
            pack_pressure: 0,
            distance: Vec3::new(position.x, 0.0, position.z).length(),
        }
    }

    fn bone(id: u32, position: Vec3) -> BoneInfo {
        BoneInfo {
            id: BoneId(id),
            position,
            distance: Vec3::new(position.x, 0.0, position.z).length(),
        }
    }

    fn board(bones_held: u32, rivals: Vec<RivalInfo>, bones: Vec<BoneInfo>) -> AiBlackboard {
        AiBlackboard {
            agent: AgentId(0),
            position: Vec3::ZERO,
            resource_count: bones_held,
            rivals,
            bones,
            ..AiBlackboard::default()
        }
    }

    fn decide(ctx: &mut AiBlackboard) -> Goal {
        let tree = target_selection(&AiConfig::default());
        assert!(tree.tick(ctx).is_success());
        ctx.take_goal().unwrap_or(Goal::Idle)
    }

    #[test]
    fn revenge_beats_everything() {
        // facing us, far stronger: would otherwise flee
        let mut ctx = board(5, vec![rival(3, Vec3::new(4.0, 0.0, 0.0), 40, -Vec3::X)], vec![]);
        ctx.revenge = Some(AgentId(3));
        assert_eq!(decide(&mut ctx), Goal::Revenge { target: AgentId(3) });
    }

    #[test]
    fn revenge_needs_safe_bones() {
        let mut ctx = board(1, vec![rival(3, Vec3::new(30.0, 0.0, 0.0), 1, -Vec3::X)], vec![]);
        ctx.revenge = Some(AgentId(3));
        assert_ne!(decide(&mut ctx).label(), "revenge");
    }

    #[test]
    fn dominant_leader_is_chased_while_sneaking() {
        // leader faces us, so not vulnerable, but hugely ahead
        let mut ctx = board(2, vec![rival(1, Vec3::new(0.0, 0.0, 15.0), 30, -Vec3::Z)], vec![]);
        let goal = decide(&mut ctx);
        assert_eq!(
            goal,
            Goal::Leader {
                target: AgentId(1),
                sneaking: true,
                flanking: false
            }
        );
    }

    #[test]
    fn flanked_leader_counts_as_closer() {
        // 25 away is beyond the leader distance, 25 * 0.7 is not
        let mut ctx = board(4, vec![rival(1, Vec3::new(0.0, 0.0, 25.0), 6, Vec3::Z)], vec![]);
        match decide(&mut ctx) {
            Goal::Leader { flanking, sneaking, .. } => {
                assert!(flanking);
                assert!(!sneaking);
            }
            other => panic!("expected leader goal, got {other:?}"),
        }
    }

    #[test]
    fn flee_prefers_aligned_bone() {
        // threat to the +x side, one bone behind us (-x), one toward the threat
        let mut ctx = board(
            2,
            vec![rival(1, Vec3::new(3.0, 0.0, 0.0), 3, -Vec3::X)],
            vec![bone(7, Vec3::new(-3.0, 0.0, 0.0)), bone(8, Vec3::new(2.0, 0.0, 0.0))],
        );
        match decide(&mut ctx) {
            Goal::Flee { via_bone, threat, .. } => {
                assert_eq!(threat, AgentId(1));
                assert_eq!(via_bone, Some(BoneId(7)));
            }
            other => panic!("expected flee, got {other:?}"),
        }
    }

    #[test]
    fn flee_direct_without_good_bone() {
        let mut ctx = board(2, vec![rival(1, Vec3::new(3.0, 0.0, 0.0), 3, -Vec3::X)], vec![]);
        match decide(&mut ctx) {
            Goal::Flee { destination, via_bone, .. } => {
                assert_eq!(via_bone, None);
                assert!(destination.x < -9.0);
            }
            other => panic!("expected flee, got {other:?}"),
        }
    }

    #[test]
    fn weak_rival_is_attacked_when_safe() {
        let mut ctx = board(
            5,
            vec![rival(2, Vec3::new(5.0, 0.0, 0.0), 6, -Vec3::X), rival(3, Vec3::new(30.0, 0.0, 0.0), 1, -Vec3::X)],
            vec![bone(1, Vec3::new(1.0, 0.0, 0.0))],
        );
        // rival 3 is the weakest but outside chase distance; rival 2 (6 <= 6.0) qualifies
        assert_eq!(decide(&mut ctx), Goal::AttackWeakest { target: AgentId(2) });
    }

    #[test]
    fn hunts_nearest_bone_and_idles_without_one() {
        let mut ctx = board(0, vec![], vec![bone(1, Vec3::new(6.0, 0.0, 0.0)), bone(2, Vec3::new(2.0, 0.0, 0.0))]);
        assert_eq!(
            decide(&mut ctx),
            Goal::HuntBone {
                bone: BoneId(2),
                position: Vec3::new(2.0, 0.0, 0.0)
            }
        );

        let mut empty = board(0, vec![], vec![]);
        assert_eq!(decide(&mut empty), Goal::Idle);
    }

    #[test]
    fn hunting_is_skipped_near_stronger_rival() {
        // stronger rival inside the danger radius, but neither worth fleeing
        // from (20 >= 25 * 0.8) nor weak enough to attack (25 > 20 * 1.2)
        let mut ctx = board(
            20,
            vec![rival(1, Vec3::new(0.0, 0.0, 4.0), 25, -Vec3::Z)],
            vec![bone(1, Vec3::new(2.0, 0.0, 0.0))],
        );
        assert_eq!(decide(&mut ctx), Goal::Idle);
    }

    #[test]
    fn danger_radius_is_measured_from_the_hunter() {
        // the stronger rival sits next to the bone but well away from us
        let mut ctx = board(
            20,
            vec![rival(1, Vec3::new(8.0, 0.0, 3.0), 25, -Vec3::X)],
            vec![bone(1, Vec3::new(8.0, 0.0, 0.0))],
        );
        assert_eq!(
            decide(&mut ctx),
            Goal::HuntBone {
                bone: BoneId(1),
                position: Vec3::new(8.0, 0.0, 0.0)
            }
        );
    }

    #[test]
    fn threat_condition_gates_the_flee_branch() {
        let ai = AiConfig::default();
        let near = board(2, vec![rival(1, Vec3::new(3.0, 0.0, 0.0), 3, -Vec3::X)], vec![]);
        assert!(is_threatened(&near, ai.flee_distance, ai.flee_strength_ratio));
        let far = board(2, vec![rival(1, Vec3::new(12.0, 0.0, 0.0), 3, -Vec3::X)], vec![]);
        assert!(!is_threatened(&far, ai.flee_distance, ai.flee_strength_ratio));
    }
}
