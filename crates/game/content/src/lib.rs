//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for the arena's data files:
//! - Rule tunables (TOML, every field optional)
//! - Stage layouts (RON obstacle lists)
//!
//! Builtin copies of both ship inside the crate so a client runs without a
//! data directory.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, ObstacleRon, StageLoader, StageRon};
