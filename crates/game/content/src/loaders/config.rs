//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

const BUILTIN: &str = include_str!("../../data/config.toml");

/// Loader for game configuration from TOML files.
///
/// Sections and fields missing from the file keep their defaults, so a file
/// may override a single tunable.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig =
            toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        tracing::debug!(
            half_extent = config.arena.half_extent,
            target_bones = config.arena.target_bones,
            "config loaded"
        );
        Ok(config)
    }

    /// The rule set shipped with the crate.
    pub fn builtin() -> LoadResult<GameConfig> {
        Self::parse(BUILTIN).context("Invalid builtin config")
    }
}
