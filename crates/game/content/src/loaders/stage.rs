//! Stage layout loader.
//!
//! Stage files list obstacles; the four boundary walls are added from the
//! config's arena size unless the file opts out.
//!
//! ```ron
//! (
//!     name: "yard",
//!     obstacles: [
//!         (name: "shed", center: (10.0, 1.5, -4.0), size: (4.0, 3.0, 4.0)),
//!         (name: "flower-bed", center: (0.0, 0.05, 8.0), size: (3.0, 0.1, 1.0), role: Marker),
//!     ],
//! )
//! ```

use std::path::Path;

use anyhow::Context;
use game_core::{ObstacleRole, ObstacleSpec, Stage, Vec3, boundary_specs};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const YARD: &str = include_str!("../../data/stages/yard.ron");

/// One obstacle as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRon {
    pub name: String,
    pub center: (f32, f32, f32),
    pub size: (f32, f32, f32),
    #[serde(default)]
    pub role: ObstacleRole,
}

impl ObstacleRon {
    fn into_spec(self) -> ObstacleSpec {
        let (cx, cy, cz) = self.center;
        let (sx, sy, sz) = self.size;
        ObstacleSpec::new(self.name, Vec3::new(cx, cy, cz), Vec3::new(sx, sy, sz)).with_role(self.role)
    }
}

/// Stage file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRon {
    pub name: String,
    /// Add boundary walls sized from the arena config.
    #[serde(default = "default_boundary")]
    pub boundary: bool,
    pub obstacles: Vec<ObstacleRon>,
}

fn default_boundary() -> bool {
    true
}

/// Loader for stage layouts from RON files.
pub struct StageLoader;

impl StageLoader {
    /// Load a stage from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON stage file
    /// * `half_extent` - Arena half size used for the boundary walls
    /// * `landing_tolerance` - Ground snap tolerance of the stage
    pub fn load(path: &Path, half_extent: f32, landing_tolerance: f32) -> LoadResult<Stage> {
        let content = read_file(path)?;
        Self::parse(&content, half_extent, landing_tolerance)
            .with_context(|| format!("Invalid stage {}", path.display()))
    }

    pub fn parse(content: &str, half_extent: f32, landing_tolerance: f32) -> LoadResult<Stage> {
        let data: StageRon =
            ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse stage RON: {}", e))?;
        let name = data.name.clone();
        let stage = Self::build(data, half_extent, landing_tolerance)?;
        tracing::debug!(stage = %name, obstacles = stage.obstacles().len(), "stage loaded");
        Ok(stage)
    }

    /// Classify parsed data into a [`Stage`].
    pub fn build(data: StageRon, half_extent: f32, landing_tolerance: f32) -> LoadResult<Stage> {
        let mut specs = if data.boundary {
            boundary_specs(half_extent)
        } else {
            Vec::new()
        };
        specs.extend(data.obstacles.into_iter().map(ObstacleRon::into_spec));
        Ok(Stage::new(specs, landing_tolerance)?)
    }

    /// Builtin stage by name.
    pub fn builtin(name: &str, half_extent: f32, landing_tolerance: f32) -> LoadResult<Stage> {
        match name {
            "park" => Ok(Stage::park(half_extent, landing_tolerance)),
            "yard" => Self::parse(YARD, half_extent, landing_tolerance),
            other => anyhow::bail!("Unknown builtin stage '{}'", other),
        }
    }
}
