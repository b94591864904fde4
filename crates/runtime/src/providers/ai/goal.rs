//! Goal definition.
//!
//! A goal is the single objective an AI agent commits to for one tick. The
//! tree in [`super::tree`] picks it; the controller then steers toward it.

use game_core::{AgentId, AiConfig, BoneId, Vec3};

/// What the agent is after this tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Goal {
    /// Chase down whoever bit us last.
    Revenge { target: AgentId },

    /// Go after the agent holding the most bones.
    Leader {
        target: AgentId,
        /// Slow approach while the leader is not yet vulnerable.
        sneaking: bool,
        /// Approaching from behind.
        flanking: bool,
    },

    /// Run from a stronger rival, optionally toward a bone.
    Flee {
        threat: AgentId,
        destination: Vec3,
        via_bone: Option<BoneId>,
    },

    /// Pick on a rival no stronger than us.
    AttackWeakest { target: AgentId },

    /// Walk to the nearest safe bone.
    HuntBone { bone: BoneId, position: Vec3 },

    Idle,
}

/// Coarse movement mode derived from a goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum Intent {
    Pursue,
    Flee,
    Hunt,
    Idle,
}

impl Goal {
    pub fn intent(&self) -> Intent {
        match self {
            Goal::Revenge { .. } | Goal::Leader { .. } | Goal::AttackWeakest { .. } => Intent::Pursue,
            Goal::Flee { .. } => Intent::Flee,
            Goal::HuntBone { .. } => Intent::Hunt,
            Goal::Idle => Intent::Idle,
        }
    }

    /// Rival being chased, if any.
    pub fn target_agent(&self) -> Option<AgentId> {
        match self {
            Goal::Revenge { target } | Goal::Leader { target, .. } | Goal::AttackWeakest { target } => {
                Some(*target)
            }
            _ => None,
        }
    }

    pub fn speed(&self, config: &AiConfig) -> f32 {
        match self {
            Goal::Leader { sneaking: true, .. } => config.sneak_speed,
            Goal::Revenge { .. } | Goal::Leader { .. } | Goal::AttackWeakest { .. } => config.pursue_speed,
            Goal::Flee { .. } => config.flee_speed,
            Goal::HuntBone { .. } => config.hunt_speed,
            Goal::Idle => config.idle_speed,
        }
    }

    /// Horizontal distance at which a pursuing agent starts biting.
    pub fn bite_range(&self, config: &AiConfig) -> f32 {
        match self {
            Goal::Revenge { .. } => config.revenge_bite_range,
            _ => config.bite_range,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Goal::Revenge { .. } => "revenge",
            Goal::Leader { .. } => "leader",
            Goal::Flee { .. } => "flee",
            Goal::AttackWeakest { .. } => "attack-weakest",
            Goal::HuntBone { .. } => "hunt-bone",
            Goal::Idle => "idle",
        }
    }
}
