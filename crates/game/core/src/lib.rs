//! Arena simulation rules shared by the runtime and tools.
//!
//! `game-core` defines the canonical rules: stage geometry and collision
//! queries, agent kinematics, bone pickups and bite resolution. It performs
//! no I/O and never logs; every random roll goes through an injected
//! [`RngOracle`] and every tunable lives in [`GameConfig`].
pub mod agent;
pub mod bone;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod geometry;
pub mod input;

pub use agent::{Agent, AgentId, HitVolume, ResourceLoss, Revenge, TickEffects, Timers, size_for};
pub use bone::{Bone, BoneId, BonePhase, eject_velocity};
pub use combat::{BiteOutcome, apply_bite, drop_count, is_in_front, resolve_bite, roll_drop_fraction};
pub use config::{AgentConfig, AiConfig, ArenaConfig, CombatConfig, GameConfig, PhysicsConfig};
pub use env::{
    AgentBody, CollisionOracle, GroundHit, Obstacle, ObstacleId, ObstacleKind, ObstacleRole,
    ObstacleSpec, PcgRng, RayHit, RngOracle, ScriptedRng, Stage, WorldView, boundary_specs,
};
pub use error::{ConfigError, ErrorSeverity, GameError, StageError};
pub use geometry::{Aabb, facing_of, flatten, forward, horizontal_distance, rotate_y};
pub use input::{Command, InputState, Keys, MovementIntent, Steering};

pub use glam::Vec3;
