//! Game configuration constants and tunable parameters.
//!
//! Every number the simulation depends on lives here, grouped by the
//! subsystem that reads it. Defaults are the canonical rule set; files loaded
//! through `game-content` override individual fields (every section is
//! `#[serde(default)]`).

use crate::error::ConfigError;

/// Root configuration handed to the arena and every agent.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub agent: AgentConfig,
    pub combat: CombatConfig,
    pub arena: ArenaConfig,
    pub ai: AiConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks cross-field invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;
        if agent.min_size <= 0.0 {
            return Err(ConfigError::NonPositive { field: "agent.min_size" });
        }
        if agent.max_size < agent.min_size {
            return Err(ConfigError::InvertedRange {
                field: "agent.size",
                min: agent.min_size,
                max: agent.max_size,
            });
        }
        if agent.win_threshold == 0 {
            return Err(ConfigError::NonPositive { field: "agent.win_threshold" });
        }
        if agent.base_speed <= 0.0 {
            return Err(ConfigError::NonPositive { field: "agent.base_speed" });
        }

        let combat = &self.combat;
        if combat.min_drop_fraction < 0.0 || combat.max_drop_fraction > 1.0 {
            return Err(ConfigError::OutOfUnitRange { field: "combat.drop_fraction" });
        }
        if combat.max_drop_fraction < combat.min_drop_fraction {
            return Err(ConfigError::InvertedRange {
                field: "combat.drop_fraction",
                min: combat.min_drop_fraction,
                max: combat.max_drop_fraction,
            });
        }
        if combat.explosion_cap == 0 {
            return Err(ConfigError::NonPositive { field: "combat.explosion_cap" });
        }

        let arena = &self.arena;
        if arena.half_extent <= arena.bound_margin {
            return Err(ConfigError::NonPositive { field: "arena.half_extent" });
        }
        if arena.grid_cell_size <= 0.0 {
            return Err(ConfigError::NonPositive { field: "arena.grid_cell_size" });
        }
        if arena.spawn_grid_step <= 0.0 {
            return Err(ConfigError::NonPositive { field: "arena.spawn_grid_step" });
        }

        if self.physics.max_dt <= 0.0 {
            return Err(ConfigError::NonPositive { field: "physics.max_dt" });
        }
        if !(0.0..=1.0).contains(&self.physics.knockback_damping) {
            return Err(ConfigError::OutOfUnitRange { field: "physics.knockback_damping" });
        }

        let ai = &self.ai;
        if ai.history_len < 2 {
            return Err(ConfigError::NonPositive { field: "ai.history_len" });
        }
        for (field, p) in [
            ("ai.pursue_attack_chance", ai.pursue_attack_chance),
            ("ai.defensive_attack_chance", ai.defensive_attack_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::OutOfUnitRange { field });
            }
        }

        Ok(())
    }

    /// Interior bound for agent x/z coordinates.
    pub fn interior_bound(&self) -> f32 {
        self.arena.half_extent - self.arena.bound_margin
    }
}

/// Integration constants. Per-frame quantities assume a 60 Hz reference
/// frame and are scaled by `dt * 60`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_force: f32,
    /// Band within which an agent counts as standing on a surface.
    pub landing_tolerance: f32,
    /// Per-tick multiplier applied to knockback velocity.
    pub knockback_damping: f32,
    /// Clearance added to the horizontal extents of a moving box.
    pub collision_margin: f32,
    /// Upper bound on a single tick's dt, in seconds.
    pub max_dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.015,
            jump_force: 0.35,
            landing_tolerance: 0.15,
            knockback_damping: 0.9,
            collision_margin: 0.1,
            max_dt: 0.1,
        }
    }
}

/// Character tunables: growth, speeds, ability timers, body proportions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub min_size: f32,
    pub max_size: f32,
    pub growth_rate: f32,
    pub win_threshold: u32,

    /// Units per reference frame at size 1.
    pub base_speed: f32,
    pub ai_speed_multiplier: f32,
    pub zoomies_multiplier: f32,

    pub bite_duration: f32,
    pub hit_flash_duration: f32,
    pub knockback_duration: f32,
    /// Units per second before the combat multiplier.
    pub knockback_speed: f32,
    pub dying_duration: f32,
    pub revenge_duration: f32,

    pub bark_cooldown: f32,
    pub zoomies_duration: f32,
    pub zoomies_cooldown: f32,
    pub marking_duration: f32,
    pub marking_cooldown: f32,

    /// Body footprint (x and z) per unit of size.
    pub body_width: f32,
    /// Body height per unit of size.
    pub body_height: f32,
    pub bite_width: f32,
    pub bite_height: f32,
    pub bite_depth: f32,
    /// Forward offset of the bite volume beyond the body, per unit of size.
    pub bite_lunge: f32,

    /// Sink speed of the death animation, units per second.
    pub dying_sink_rate: f32,
    /// Spin speed of the death animation, radians per second.
    pub dying_spin_rate: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            min_size: 1.0,
            max_size: 3.0,
            growth_rate: 0.02,
            win_threshold: 100,
            base_speed: 0.12,
            ai_speed_multiplier: 0.9,
            zoomies_multiplier: 1.8,
            bite_duration: 0.3,
            hit_flash_duration: 0.5,
            knockback_duration: 0.35,
            knockback_speed: 2.0,
            dying_duration: 1.2,
            revenge_duration: 5.0,
            bark_cooldown: 1.0,
            zoomies_duration: 2.0,
            zoomies_cooldown: 8.0,
            marking_duration: 1.5,
            marking_cooldown: 6.0,
            body_width: 0.8,
            body_height: 0.9,
            bite_width: 0.6,
            bite_height: 0.5,
            bite_depth: 0.7,
            bite_lunge: 0.3,
            dying_sink_rate: 0.6,
            dying_spin_rate: 6.0,
        }
    }
}

/// Bite resolution policy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub min_drop_fraction: f32,
    pub max_drop_fraction: f32,
    pub max_drop_per_hit: u32,
    /// Upper bound on ejected bones per combat event.
    pub explosion_cap: u32,
    pub knockback_multiplier: f32,
    /// Minimum cosine between attacker forward and the direction to the victim.
    pub facing_dot: f32,
    /// Seconds between removal of a defeated agent and its respawn.
    pub respawn_delay: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            min_drop_fraction: 0.25,
            max_drop_fraction: 0.40,
            max_drop_per_hit: 15,
            explosion_cap: 20,
            knockback_multiplier: 7.0,
            facing_dot: 0.2,
            respawn_delay: 3.0,
        }
    }
}

/// Stage-wide population, spawning and bone physics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    /// Distance from the origin to the boundary walls.
    pub half_extent: f32,
    /// Gap kept between agents and the boundary.
    pub bound_margin: f32,

    pub target_bones: usize,
    pub bone_pickup_radius: f32,
    pub bone_clearance: f32,
    pub bone_spawn_attempts: u32,
    pub ground_spawn_weight: f32,
    pub platform_spawn_weight: f32,
    /// Inset from platform edges for platform-top spawns.
    pub platform_spawn_inset: f32,

    pub bone_lifespan: f32,
    pub bone_gravity: f32,
    pub bone_restitution: f32,
    /// Seconds an ejected bone stays uncollectible.
    pub ejected_grace: f32,
    pub eject_speed_min: f32,
    pub eject_speed_max: f32,
    pub eject_lift: f32,

    pub spawn_clearance: f32,
    pub spawn_agent_distance: f32,
    pub spawn_attempts: u32,
    pub spawn_grid_step: f32,

    pub grid_cell_size: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: 40.0,
            bound_margin: 1.5,
            target_bones: 40,
            bone_pickup_radius: 0.6,
            bone_clearance: 1.0,
            bone_spawn_attempts: 20,
            ground_spawn_weight: 1.0,
            platform_spawn_weight: 3.0,
            platform_spawn_inset: 0.5,
            bone_lifespan: 12.0,
            bone_gravity: 9.8,
            bone_restitution: 0.5,
            ejected_grace: 0.6,
            eject_speed_min: 2.0,
            eject_speed_max: 5.0,
            eject_lift: 4.0,
            spawn_clearance: 2.0,
            spawn_agent_distance: 6.0,
            spawn_attempts: 50,
            spawn_grid_step: 2.0,
            grid_cell_size: 4.0,
        }
    }
}

/// Decision-policy thresholds. Only the priority order of the rules is
/// fixed; every number here is a tunable default.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiConfig {
    // ===== target selection =====
    pub revenge_distance: f32,
    pub revenge_min_bones: u32,
    pub leader_attack_distance: f32,
    /// Leader is pursued regardless of safety once it holds this many times our count.
    pub leader_dominance_ratio: f32,
    /// Effective-distance factor when approaching the leader from behind.
    pub flank_bonus: f32,
    pub pack_radius: f32,
    pub pack_size: usize,
    pub flee_distance: f32,
    /// Flee when our count is below this fraction of the rival's.
    pub flee_strength_ratio: f32,
    pub flee_bone_radius: f32,
    pub flee_bone_min_score: f32,
    pub flee_run_distance: f32,
    pub chase_distance: f32,
    /// Rivals with at most this multiple of our count are fair game.
    pub weak_ratio: f32,
    pub min_safe_bones: u32,
    pub hunt_radius: f32,
    /// Hunting is skipped while a stronger rival stands this close to the agent.
    pub hunt_danger_radius: f32,

    // ===== attack ranges, per unit of own size =====
    pub bite_range: f32,
    pub revenge_bite_range: f32,

    // ===== speed multipliers =====
    pub pursue_speed: f32,
    pub hunt_speed: f32,
    pub flee_speed: f32,
    pub sneak_speed: f32,
    pub idle_speed: f32,

    // ===== stuck detection =====
    pub history_len: usize,
    pub history_sample_ticks: u32,
    pub stuck_path_length: f32,
    pub oscillation_area: f32,

    // ===== obstacle probing =====
    pub probe_distance: f32,
    pub near_obstacle_distance: f32,
    pub stuck_blend: f32,
    pub near_blend: f32,
    pub deviation_ticks: u32,
    /// Relative weight of heading preservation in the probe score.
    pub deviation_weight: f32,
    pub probe_heights: Vec<f32>,
    pub probe_offsets: Vec<f32>,

    // ===== platform reasoning =====
    pub platform_scan_radius: f32,
    pub platform_rays: usize,
    pub platform_jump_distance: f32,
    pub platform_height_gap: f32,
    pub platform_min_separation: f32,
    pub pursue_platform_cooldown: f32,
    pub flee_platform_cooldown: f32,
    pub hunt_platform_cooldown: f32,
    pub hunt_platform_chance: f32,

    // ===== stochastic gates =====
    pub pursue_attack_chance: f32,
    pub defensive_attack_chance: f32,
    pub idle_turn_chance: f32,
    /// Per-second rates, scaled by dt.
    pub idle_jump_rate: f32,
    pub defensive_jump_rate: f32,
    pub idle_bark_rate: f32,
    pub active_bark_rate: f32,
    pub zoomies_rate: f32,
    pub threat_distance: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            revenge_distance: 15.0,
            revenge_min_bones: 3,
            leader_attack_distance: 20.0,
            leader_dominance_ratio: 2.0,
            flank_bonus: 0.7,
            pack_radius: 3.0,
            pack_size: 2,
            flee_distance: 10.0,
            flee_strength_ratio: 0.8,
            flee_bone_radius: 12.0,
            flee_bone_min_score: 0.3,
            flee_run_distance: 10.0,
            chase_distance: 15.0,
            weak_ratio: 1.2,
            min_safe_bones: 2,
            hunt_radius: 40.0,
            hunt_danger_radius: 5.0,
            bite_range: 1.4,
            revenge_bite_range: 1.8,
            pursue_speed: 1.0,
            hunt_speed: 0.9,
            flee_speed: 1.1,
            sneak_speed: 0.6,
            idle_speed: 0.4,
            history_len: 5,
            history_sample_ticks: 10,
            stuck_path_length: 0.5,
            oscillation_area: 1.0,
            probe_distance: 6.0,
            near_obstacle_distance: 2.0,
            stuck_blend: 0.8,
            near_blend: 0.5,
            deviation_ticks: 30,
            deviation_weight: 0.5,
            probe_heights: vec![0.3, 0.8],
            probe_offsets: vec![-0.4, 0.0, 0.4],
            platform_scan_radius: 8.0,
            platform_rays: 8,
            platform_jump_distance: 2.0,
            platform_height_gap: 1.0,
            platform_min_separation: 4.0,
            pursue_platform_cooldown: 3.0,
            flee_platform_cooldown: 2.0,
            hunt_platform_cooldown: 5.0,
            hunt_platform_chance: 0.3,
            pursue_attack_chance: 0.95,
            defensive_attack_chance: 0.8,
            idle_turn_chance: 0.02,
            idle_jump_rate: 0.2,
            defensive_jump_rate: 1.5,
            idle_bark_rate: 0.05,
            active_bark_rate: 0.3,
            zoomies_rate: 0.02,
            threat_distance: 2.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_size_range_is_rejected() {
        let mut config = GameConfig::default();
        config.agent.max_size = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { field: "agent.size", .. })
        ));
    }

    #[test]
    fn drop_fraction_must_stay_in_unit_range() {
        let mut config = GameConfig::default();
        config.combat.max_drop_fraction = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange { field: "combat.drop_fraction" })
        );
    }

    #[test]
    fn interior_bound_subtracts_margin() {
        let config = GameConfig::default();
        assert!((config.interior_bound() - 38.5).abs() < f32::EPSILON);
    }
}
