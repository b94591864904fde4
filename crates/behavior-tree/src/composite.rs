//! Composite behavior nodes.
//!
//! [`Sequence`] is AND, [`Selector`] is OR in priority order, and
//! [`UtilitySelector`] runs whichever child currently scores best.

use crate::{Behavior, Status};

/// Desirability of a utility option; `<= 0.0` means "not an option".
pub type Scorer<C> = Box<dyn Fn(&C) -> f32 + Send + Sync>;

/// Runs children left to right, stopping at the first failure.
pub struct Sequence<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Sequence<C> {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(!children.is_empty(), "Sequence must have at least one child");
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_failure() {
                return Status::Failure;
            }
        }
        Status::Success
    }
}

/// Runs children left to right, stopping at the first success.
///
/// Child order is priority order: the first rule that applies wins.
pub struct Selector<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Selector<C> {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(!children.is_empty(), "Selector must have at least one child");
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}

/// Scores every option against the context and runs the best one.
///
/// Ties go to the earlier option. If no option scores above zero the node
/// fails without running anything.
pub struct UtilitySelector<C> {
    options: Vec<(Box<dyn Behavior<C>>, Scorer<C>)>,
}

impl<C> UtilitySelector<C> {
    /// # Panics
    ///
    /// Panics if `options` is empty.
    pub fn new(options: Vec<(Box<dyn Behavior<C>>, Scorer<C>)>) -> Self {
        assert!(!options.is_empty(), "UtilitySelector must have at least one option");
        Self { options }
    }
}

impl<C> Behavior<C> for UtilitySelector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let mut best: Option<(usize, f32)> = None;
        for (index, (_, scorer)) in self.options.iter().enumerate() {
            let score = scorer(ctx);
            if score > 0.0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        match best {
            Some((index, _)) => self.options[index].0.tick(ctx),
            None => Status::Failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{action, condition, score};

    #[derive(Default)]
    struct Yard {
        bones: i32,
        threat: f32,
        log: Vec<&'static str>,
    }

    fn record(tag: &'static str, outcome: bool) -> Box<dyn Behavior<Yard>> {
        action(move |y: &mut Yard| {
            y.log.push(tag);
            outcome
        })
    }

    #[test]
    fn sequence_stops_at_first_failure() {
        let seq = Sequence::new(vec![record("a", true), record("b", false), record("c", true)]);
        let mut yard = Yard::default();
        assert_eq!(seq.tick(&mut yard), Status::Failure);
        assert_eq!(yard.log, ["a", "b"]);
    }

    #[test]
    fn sequence_passes_when_all_pass() {
        let seq = Sequence::new(vec![condition(|y: &Yard| y.bones >= 0), record("eat", true)]);
        let mut yard = Yard::default();
        assert!(seq.tick(&mut yard).is_success());
        assert_eq!(yard.log, ["eat"]);
    }

    #[test]
    fn selector_takes_first_applicable_rule() {
        let sel = Selector::new(vec![record("flee", false), record("hunt", true), record("idle", true)]);
        let mut yard = Yard::default();
        assert_eq!(sel.tick(&mut yard), Status::Success);
        assert_eq!(yard.log, ["flee", "hunt"]);
    }

    #[test]
    fn selector_fails_when_nothing_applies() {
        let sel = Selector::new(vec![record("x", false), record("y", false)]);
        let mut yard = Yard::default();
        assert_eq!(sel.tick(&mut yard), Status::Failure);
    }

    #[test]
    fn utility_runs_highest_score_only() {
        let util = UtilitySelector::new(vec![
            (record("run", true), score(|y: &Yard| y.threat)),
            (record("dig", true), score(|y: &Yard| y.bones as f32 * 0.1)),
        ]);
        let mut yard = Yard { bones: 3, threat: 0.8, ..Yard::default() };
        assert!(util.tick(&mut yard).is_success());
        yard.threat = 0.1;
        assert!(util.tick(&mut yard).is_success());
        assert_eq!(yard.log, ["run", "dig"]);
    }

    #[test]
    fn utility_fails_without_positive_score() {
        let util = UtilitySelector::new(vec![(record("run", true), score(|_: &Yard| 0.0))]);
        let mut yard = Yard::default();
        assert_eq!(util.tick(&mut yard), Status::Failure);
        assert!(yard.log.is_empty());
    }

    #[test]
    fn utility_ties_prefer_earlier_option() {
        let util = UtilitySelector::new(vec![
            (record("first", true), score(|_: &Yard| 0.5)),
            (record("second", true), score(|_: &Yard| 0.5)),
        ]);
        let mut yard = Yard::default();
        util.tick(&mut yard);
        assert_eq!(yard.log, ["first"]);
    }
}
