//! Builder functions so trees read top-down instead of as nested
//! `Box::new(...)` calls.

use crate::{Action, Behavior, Condition, Selector, Sequence, UtilitySelector};
use crate::composite::Scorer;

#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Selector::new(children))
}

#[inline]
pub fn utility<C: 'static>(options: Vec<(Box<dyn Behavior<C>>, Scorer<C>)>) -> Box<dyn Behavior<C>> {
    Box::new(UtilitySelector::new(options))
}

/// Leaf from a predicate.
#[inline]
pub fn condition<C: 'static>(predicate: impl Fn(&C) -> bool + Send + Sync + 'static) -> Box<dyn Behavior<C>> {
    Box::new(Condition::new(predicate))
}

/// Leaf from a mutating closure.
#[inline]
pub fn action<C: 'static>(run: impl Fn(&mut C) -> bool + Send + Sync + 'static) -> Box<dyn Behavior<C>> {
    Box::new(Action::new(run))
}

/// Scorer boxed for [`utility`].
#[inline]
pub fn score<C>(f: impl Fn(&C) -> f32 + Send + Sync + 'static) -> Scorer<C> {
    Box::new(f)
}
