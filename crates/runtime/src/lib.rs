//! Arena orchestration on top of `game-core`.
//!
//! The runtime owns a match: it registers agents, runs the per-tick pipeline
//! (respawns, bone upkeep, decisions, movement, pickups, bites, removals)
//! and reports what happened as [`ArenaEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`arena`] hosts the simulation loop and its builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] describes everything a tick can report
//! - [`providers`] holds the decision policies that drive agents
pub mod api;
pub mod arena;
pub mod events;
pub mod providers;

pub use api::{
    AgentView, AudioCue, BoneView, Cue, DecisionContext, DecisionPolicy, LeaderboardEntry, NullAudio,
    PlayerPolicy, RecordingAudio, Result, RuntimeError,
};
pub use arena::{Arena, ArenaBuilder, SpawnPoint, SpawnSource};
pub use events::ArenaEvent;
pub use providers::{AiController, Policy};
pub use providers::ai::{Goal, Intent};
