//! Small behavior tree for frame-driven agent decisions.
//!
//! The whole tree is re-evaluated from the root every simulation frame and
//! every node answers immediately, so there is no `Running` state and no
//! per-node memory. Long-lived decisions (cooldowns, deviation windows) are
//! kept on the context instead.
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`Status`]: Success or Failure
//! - Composite nodes: [`Sequence`], [`Selector`], [`UtilitySelector`]
//! - Closure leaves: [`Condition`], [`Action`]

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod leaf;
pub mod status;

pub use behavior::Behavior;
pub use composite::{Selector, Sequence, UtilitySelector};
pub use leaf::{Action, Condition};
pub use status::Status;
