//! Arena events.
//!
//! The arena queues one [`ArenaEvent`] per notable interaction during a tick.
//! Consumers drain the queue after each update; nothing is retained once
//! drained.
use game_core::{AgentId, BiteOutcome, BoneId, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    BoneCollected {
        agent: AgentId,
        bone: BoneId,
        resource_count: u32,
    },
    Bitten {
        attacker: AgentId,
        victim: AgentId,
        outcome: BiteOutcome,
    },
    /// Victim entered its death animation.
    Defeated { agent: AgentId, by: AgentId },
    /// Death animation finished; the agent left the active set.
    Removed { agent: AgentId, respawn_at: f32 },
    Respawned { agent: AgentId, position: Vec3 },
    /// Cosmetic scent mark, never solid.
    TerritoryMarked { agent: AgentId, position: Vec3 },
    Winner { agent: AgentId },
}
