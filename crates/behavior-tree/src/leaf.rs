//! Closure-backed leaf nodes.
//!
//! For tree steps too small to deserve a named node: a bare predicate
//! gating a branch, or a fallback that only writes a value.

use core::marker::PhantomData;

use crate::{Behavior, Status};

/// Succeeds when the predicate holds. Never mutates the context.
pub struct Condition<C, F> {
    predicate: F,
    _ctx: PhantomData<fn(&C)>,
}

impl<C, F> Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            _ctx: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    fn tick(&self, ctx: &mut C) -> Status {
        Status::from_bool((self.predicate)(ctx))
    }
}

/// Runs the closure; `true` means the action committed.
pub struct Action<C, F> {
    run: F,
    _ctx: PhantomData<fn(&mut C)>,
}

impl<C, F> Action<C, F>
where
    F: Fn(&mut C) -> bool + Send + Sync,
{
    pub fn new(run: F) -> Self {
        Self {
            run,
            _ctx: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Action<C, F>
where
    F: Fn(&mut C) -> bool + Send + Sync,
{
    fn tick(&self, ctx: &mut C) -> Status {
        Status::from_bool((self.run)(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pack {
        bones: u32,
        barks: u32,
    }

    #[test]
    fn condition_reads_without_writing() {
        let has_bones = Condition::new(|p: &Pack| p.bones > 0);
        let mut pack = Pack { bones: 2, barks: 0 };
        assert_eq!(has_bones.tick(&mut pack), Status::Success);
        pack.bones = 0;
        assert_eq!(has_bones.tick(&mut pack), Status::Failure);
    }

    #[test]
    fn action_reports_commit() {
        let bark = Action::new(|p: &mut Pack| {
            p.barks += 1;
            p.barks <= 2
        });
        let mut pack = Pack { bones: 0, barks: 0 };
        assert!(bark.tick(&mut pack).is_success());
        assert!(bark.tick(&mut pack).is_success());
        assert!(bark.tick(&mut pack).is_failure());
        assert_eq!(pack.barks, 3);
    }
}
