//! Decision policies: where each agent's per-tick intent comes from.
//!
//! Player and AI agents share one [`game_core::Agent`] type; what differs is
//! the [`DecisionPolicy`] driving it. The arena hands every policy the same
//! read-only [`DecisionContext`].
use game_core::{Agent, Bone, GameConfig, InputState, MovementIntent, RngOracle, WorldView};

use crate::providers::ai::Goal;

/// Read-only view of the tick, as seen by one agent.
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    pub agent: &'a Agent,
    /// Every registered agent, active or not, in registration order.
    pub agents: &'a [Agent],
    /// Parallel to `agents`: whether the agent is in the active set.
    pub active: &'a [bool],
    pub bones: &'a [Bone],
    pub world: WorldView<'a>,
    pub input: InputState,
    pub config: &'a GameConfig,
    pub dt: f32,
}

impl<'a> DecisionContext<'a> {
    /// Active, living agents other than the deciding one.
    pub fn rivals(&self) -> impl Iterator<Item = &'a Agent> {
        let me = self.agent.id;
        self.agents
            .iter()
            .zip(self.active.iter())
            .filter(move |(agent, active)| **active && agent.id != me && !agent.is_dying())
            .map(|(agent, _)| agent)
    }
}

/// Capability set shared by player and AI control.
pub trait DecisionPolicy {
    /// Chooses what the agent is after this tick.
    fn select_target(&mut self, ctx: &DecisionContext<'_>, rng: &mut dyn RngOracle) -> Goal;

    /// Turns the chosen goal into this tick's movement intent.
    fn steer(&mut self, ctx: &DecisionContext<'_>, goal: &Goal, rng: &mut dyn RngOracle) -> MovementIntent;
}

/// Forwards the sampled keyboard state unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerPolicy;

impl DecisionPolicy for PlayerPolicy {
    fn select_target(&mut self, _ctx: &DecisionContext<'_>, _rng: &mut dyn RngOracle) -> Goal {
        Goal::Idle
    }

    fn steer(&mut self, ctx: &DecisionContext<'_>, _goal: &Goal, _rng: &mut dyn RngOracle) -> MovementIntent {
        MovementIntent::Input(ctx.input)
    }
}
