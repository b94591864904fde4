//! Content factory for loading a data directory.

use std::path::{Path, PathBuf};

use game_core::{GameConfig, Stage};

use crate::loaders::{ConfigLoader, LoadResult, StageLoader};

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── stages/
///     ├── yard.ron
///     └── ...
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load `stages/<name>.ron`, sized for `config`.
    pub fn load_stage(&self, name: &str, config: &GameConfig) -> LoadResult<Stage> {
        let path = self.data_dir.join("stages").join(format!("{name}.ron"));
        StageLoader::load(&path, config.arena.half_extent, config.physics.landing_tolerance)
    }
}
