//! Behavior-tree AI for arena agents.
//!
//! 1. **Target selection**: a priority [`tree`] over the [`AiBlackboard`]
//!    picks one [`Goal`]: revenge, leader, flee, weakest rival, bone, idle.
//! 2. **Steering**: [`AiController`] turns the goal into a heading, bends it
//!    around obstacles ([`steering`]) and decides platform jumps
//!    ([`platform`]).

pub mod context;
pub mod goal;
pub mod nodes;
pub mod platform;
pub mod provider;
pub mod steering;
pub mod tree;

pub use context::{AiBlackboard, BoneInfo, RivalInfo};
pub use goal::{Goal, Intent};
pub use platform::{PlatformMove, PlatformPlanner, PlatformSighting, scan_platforms};
pub use provider::AiController;
pub use steering::{Avoidance, Deviation, PositionHistory};
pub use tree::{TargetTree, target_selection};
