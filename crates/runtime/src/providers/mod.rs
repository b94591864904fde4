//! Decision policy implementations.

pub mod ai;

use game_core::{MovementIntent, RngOracle};

pub use ai::AiController;

use crate::api::{DecisionContext, DecisionPolicy, PlayerPolicy};
use ai::Goal;

/// Policy attached to one agent slot.
#[derive(Debug)]
pub enum Policy {
    Player(PlayerPolicy),
    Ai(Box<AiController>),
}

impl Policy {
    pub fn is_ai(&self) -> bool {
        matches!(self, Policy::Ai(_))
    }

    /// Selects a goal and steers toward it.
    pub fn decide(&mut self, ctx: &DecisionContext<'_>, rng: &mut dyn RngOracle) -> (Goal, MovementIntent) {
        let policy: &mut dyn DecisionPolicy = match self {
            Policy::Player(player) => player,
            Policy::Ai(ai) => ai.as_mut(),
        };
        let goal = policy.select_target(ctx, rng);
        let intent = policy.steer(ctx, &goal, rng);
        (goal, intent)
    }

    /// Clears per-life state.
    pub fn reset(&mut self) {
        if let Policy::Ai(ai) = self {
            ai.reset();
        }
    }
}
