//! Content loaders for reading game data from files.
//!
//! Each loader parses one file format into `game-core` types and wraps
//! failures with the offending path.

pub mod config;
pub mod factory;
pub mod stage;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use stage::{ObstacleRon, StageLoader, StageRon};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
