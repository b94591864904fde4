//! Client configuration read from the process environment.

use std::env;
use std::path::PathBuf;

/// Opponents fit in the `u8` color index after the player's slot 0.
pub const MAX_AI_COUNT: usize = u8::MAX as usize;

/// Where the stage comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageSource {
    /// The runtime's default park.
    Default,
    /// A layout shipped with `game-content`.
    Builtin(String),
    /// A RON file on disk.
    File(PathBuf),
}

impl StageSource {
    /// Values ending in `.ron` are paths, anything else a builtin name.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Self::Default
        } else if value.ends_with(".ron") {
            Self::File(PathBuf::from(value))
        } else {
            Self::Builtin(value.to_owned())
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// TOML rule set; builtin when unset.
    pub config_path: Option<PathBuf>,
    pub stage: StageSource,
    /// Drawn at random when unset.
    pub seed: Option<u64>,
    pub ai_count: usize,
    pub max_ticks: u64,
    pub fps: u32,
    /// Pace frames at wall-clock speed instead of running flat out.
    pub realtime: bool,
    /// File logging is enabled when set.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            stage: StageSource::Default,
            seed: None,
            ai_count: 5,
            max_ticks: 60 * 60 * 10,
            fps: 60,
            realtime: false,
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TOPDOG_CONFIG` - Rule set TOML path (default: builtin)
    /// - `TOPDOG_STAGE` - Builtin stage name or `.ron` path (default: park)
    /// - `TOPDOG_SEED` - Match seed (default: random)
    /// - `TOPDOG_AI_COUNT` - AI opponents (default: 5, at most 255)
    /// - `TOPDOG_MAX_TICKS` - Tick budget (default: 36000)
    /// - `TOPDOG_FPS` - Frames per simulated second (default: 60)
    /// - `TOPDOG_REALTIME` - Pace frames in real time (default: false)
    /// - `TOPDOG_LOG_DIR` - Directory for `topdog.log` (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = read_env_path("TOPDOG_CONFIG") {
            config.config_path = Some(path);
        }
        if let Ok(stage) = env::var("TOPDOG_STAGE") {
            config.stage = StageSource::parse(&stage);
        }
        if let Some(seed) = read_env::<u64>("TOPDOG_SEED") {
            config.seed = Some(seed);
        }
        if let Some(count) = read_env::<usize>("TOPDOG_AI_COUNT") {
            config.ai_count = count.min(MAX_AI_COUNT);
        }
        if let Some(ticks) = read_env::<u64>("TOPDOG_MAX_TICKS") {
            config.max_ticks = ticks.max(1);
        }
        if let Some(fps) = read_env::<u32>("TOPDOG_FPS") {
            config.fps = fps.clamp(1, 1000);
        }
        if let Some(realtime) = read_env_bool("TOPDOG_REALTIME") {
            config.realtime = realtime;
        }
        if let Some(dir) = read_env_path("TOPDOG_LOG_DIR") {
            config.log_dir = Some(dir);
        }

        config
    }

    /// Fixed simulation step.
    pub fn dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_env_path(key: &str) -> Option<PathBuf> {
    let value = env::var_os(key)?;
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
