//! Character state shared by player and AI agents.
//!
//! An [`Agent`] owns its kinematics, progression and status timers. Size is
//! always derived from the resource count; nothing sets it directly.
//! Every operation except the death countdown is a no-op on a dying agent.
mod body;
mod tick;

pub use body::HitVolume;
pub use tick::TickEffects;

use core::f32::consts::PI;

use glam::Vec3;

use crate::config::AgentConfig;
use crate::geometry::{flatten, forward};

/// Stable agent identity; survives death and respawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Countdown timers, in seconds. Each is clamped at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timers {
    pub bite: f32,
    pub hit_flash: f32,
    pub knockback: f32,
    pub dying: f32,
    pub bark_cooldown: f32,
    pub zoomies: f32,
    pub zoomies_cooldown: f32,
    pub marking: f32,
    pub marking_cooldown: f32,
}

/// Most recent attacker, remembered by AI agents for a while.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Revenge {
    pub attacker: AgentId,
    pub remaining: f32,
}

/// Result of [`Agent::lose_resources`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceLoss {
    /// The agent died; `dropped` is what it held.
    Died { dropped: u32 },
    /// The agent survives with fewer resources.
    Reduced { dropped: u32, remaining: u32 },
    /// Dying agents ignore hits.
    Ignored,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub color_index: u8,
    pub is_ai: bool,

    pub position: Vec3,
    /// Facing angle in radians; forward is `(sin, 0, cos)`.
    pub rotation: f32,
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    pub is_moving: bool,
    pub knockback_velocity: Vec3,
    pub timers: Timers,
    pub revenge: Option<Revenge>,
    /// Visual-only animation clock.
    pub anim_phase: f32,

    resource_count: u32,
    size: f32,
    has_won: bool,
    dying: bool,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>, color_index: u8, is_ai: bool, config: &AgentConfig) -> Self {
        Self {
            id,
            name: name.into(),
            color_index,
            is_ai,
            position: Vec3::ZERO,
            rotation: 0.0,
            vertical_velocity: 0.0,
            is_jumping: false,
            is_moving: false,
            knockback_velocity: Vec3::ZERO,
            timers: Timers::default(),
            revenge: None,
            anim_phase: 0.0,
            resource_count: 0,
            size: config.min_size,
            has_won: false,
            dying: false,
        }
    }

    /// Moves the agent to a spawn point.
    pub fn place(&mut self, position: Vec3, rotation: f32) {
        self.position = position;
        self.rotation = rotation;
    }

    pub fn resource_count(&self) -> u32 {
        self.resource_count
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn is_dying(&self) -> bool {
        self.dying
    }

    /// Dying and the death animation has finished.
    pub fn ready_for_removal(&self) -> bool {
        self.dying && self.timers.dying <= 0.0
    }

    pub fn is_biting(&self) -> bool {
        self.timers.bite > 0.0
    }

    pub fn is_zooming(&self) -> bool {
        self.timers.zoomies > 0.0
    }

    pub fn is_marking(&self) -> bool {
        self.timers.marking > 0.0
    }

    pub fn in_knockback(&self) -> bool {
        self.timers.knockback > 0.0
    }

    pub fn is_hit_flashing(&self) -> bool {
        self.timers.hit_flash > 0.0
    }

    /// Can be bitten and can pick up bones.
    pub fn is_interactive(&self) -> bool {
        !self.dying && !self.is_hit_flashing() && !self.in_knockback()
    }

    pub fn forward(&self) -> Vec3 {
        forward(self.rotation)
    }

    /// Attacker still remembered for revenge.
    pub fn revenge_target(&self) -> Option<AgentId> {
        self.revenge.filter(|r| r.remaining > 0.0).map(|r| r.attacker)
    }

    /// Adds one resource. Returns `true` when this pickup wins the match.
    pub fn collect_resource(&mut self, config: &AgentConfig) -> bool {
        if self.dying || self.has_won {
            return false;
        }
        self.resource_count = (self.resource_count + 1).min(config.win_threshold);
        self.refresh_size(config);
        if self.resource_count >= config.win_threshold {
            self.has_won = true;
        }
        self.has_won
    }

    /// Drops every resource and starts dying. Returns how many were held.
    pub fn lose_all_resources(&mut self, config: &AgentConfig) -> ResourceLoss {
        if self.dying {
            return ResourceLoss::Ignored;
        }
        let dropped = self.resource_count;
        self.start_dying(config);
        ResourceLoss::Died { dropped }
    }

    /// Drops `count` resources. An agent left with nothing (or holding
    /// nothing to begin with) dies instead.
    pub fn lose_resources(&mut self, count: u32, config: &AgentConfig) -> ResourceLoss {
        if self.dying {
            return ResourceLoss::Ignored;
        }
        if self.resource_count == 0 || count >= self.resource_count {
            return self.lose_all_resources(config);
        }
        self.resource_count -= count;
        self.refresh_size(config);
        self.timers.hit_flash = config.hit_flash_duration;
        ResourceLoss::Reduced {
            dropped: count,
            remaining: self.resource_count,
        }
    }

    /// Pushes the agent away from `attacker_position`.
    ///
    /// AI agents also remember the attacker for revenge.
    pub fn apply_knockback(
        &mut self,
        attacker: AgentId,
        attacker_position: Vec3,
        multiplier: f32,
        config: &AgentConfig,
    ) {
        if self.dying {
            return;
        }
        let away = flatten(self.position - attacker_position).normalize_or_zero();
        let away = if away == Vec3::ZERO {
            forward(self.rotation + PI)
        } else {
            away
        };
        self.knockback_velocity = away * config.knockback_speed * multiplier;
        self.timers.knockback = config.knockback_duration;
        self.timers.hit_flash = config.hit_flash_duration;
        self.timers.bite = 0.0;
        if self.is_ai {
            self.revenge = Some(Revenge {
                attacker,
                remaining: config.revenge_duration,
            });
        }
    }

    /// Ends the current bite window early.
    pub fn close_bite(&mut self) {
        self.timers.bite = 0.0;
    }

    /// Restores spawn defaults. Identity is kept; the caller places the
    /// agent.
    pub fn respawn(&mut self, config: &AgentConfig) {
        self.vertical_velocity = 0.0;
        self.is_jumping = false;
        self.is_moving = false;
        self.knockback_velocity = Vec3::ZERO;
        self.timers = Timers::default();
        self.revenge = None;
        self.anim_phase = 0.0;
        self.resource_count = 0;
        self.has_won = false;
        self.dying = false;
        self.refresh_size(config);
    }

    fn start_dying(&mut self, config: &AgentConfig) {
        self.resource_count = 0;
        self.refresh_size(config);
        self.dying = true;
        self.timers.dying = config.dying_duration;
        self.timers.bite = 0.0;
        self.is_moving = false;
    }

    fn refresh_size(&mut self, config: &AgentConfig) {
        self.size = size_for(self.resource_count, config);
    }
}

/// Size for a resource count: linear growth clamped to the size range.
pub fn size_for(resource_count: u32, config: &AgentConfig) -> f32 {
    (config.min_size + resource_count as f32 * config.growth_rate).clamp(config.min_size, config.max_size)
}
