//! Public runtime API surface.
//!
//! Types exposed to consumers of the runtime crate: errors, the audio sink,
//! decision policies and render views.

pub mod audio;
pub mod errors;
pub mod providers;
pub mod views;

pub use audio::{AudioCue, Cue, NullAudio, RecordingAudio};
pub use errors::{Result, RuntimeError};
pub use providers::{DecisionContext, DecisionPolicy, PlayerPolicy};
pub use views::{AgentView, BoneView, LeaderboardEntry};
