//! Core behavior trait.

use crate::Status;

/// A behavior tree node evaluated against a context (the blackboard).
///
/// Nodes may read the context and write intermediate results into it; a
/// target-selection leaf, for example, records the chosen goal before
/// returning `Success`.
pub trait Behavior<C>: Send + Sync {
    fn tick(&self, ctx: &mut C) -> Status;
}

impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}
