use glam::Vec3;

use crate::agent::{Agent, ResourceLoss};
use crate::config::{AgentConfig, CombatConfig};
use crate::env::RngOracle;
use crate::geometry::flatten;

// ============================================================================
// Outcome
// ============================================================================

/// What a landed bite does to its victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BiteOutcome {
    /// Victim dies holding nothing afterwards.
    Fatal {
        /// Bones the victim held.
        dropped: u32,
        /// Pickups spawned, bounded by the explosion cap.
        ejected: u32,
    },
    /// Victim survives with fewer bones.
    Partial { dropped: u32, ejected: u32 },
}

impl BiteOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    pub fn dropped(&self) -> u32 {
        match *self {
            Self::Fatal { dropped, .. } | Self::Partial { dropped, .. } => dropped,
        }
    }

    pub fn ejected(&self) -> u32 {
        match *self {
            Self::Fatal { ejected, .. } | Self::Partial { ejected, .. } => ejected,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Decides the outcome of a bite between agents holding the given counts.
///
/// # Rules
///
/// ```text
/// victim == 0           -> fatal, nothing dropped
/// attacker >= victim    -> fatal, everything dropped
/// otherwise             -> partial, ceil(victim * fraction) dropped
/// ```
///
/// Partial drops are capped at `max_drop_per_hit` and never take the last
/// bone.
pub fn resolve_bite(attacker: u32, victim: u32, drop_fraction: f32, config: &CombatConfig) -> BiteOutcome {
    let cap = config.explosion_cap;
    if victim == 0 {
        return BiteOutcome::Fatal { dropped: 0, ejected: 0 };
    }
    if attacker >= victim {
        return BiteOutcome::Fatal {
            dropped: victim,
            ejected: victim.min(cap),
        };
    }
    let dropped = drop_count(victim, drop_fraction, config);
    BiteOutcome::Partial {
        dropped,
        ejected: dropped.min(cap),
    }
}

/// Partial drop: `ceil(victim * fraction)`, at least one, capped.
///
/// The victim always keeps one bone, so a victim holding one or none
/// drops zero.
///
/// The fraction is rounded to basis points first so that values like
/// `0.3` do not pick up an extra bone from binary representation error.
pub fn drop_count(victim: u32, drop_fraction: f32, config: &CombatConfig) -> u32 {
    let basis = (drop_fraction.clamp(0.0, 1.0) * 10_000.0).round() as u64;
    let raw = (u64::from(victim) * basis).div_ceil(10_000) as u32;
    raw.max(1)
        .min(config.max_drop_per_hit)
        .min(victim.saturating_sub(1))
}

/// Draws the partial-drop fraction from the configured range.
pub fn roll_drop_fraction(rng: &mut (impl RngOracle + ?Sized), config: &CombatConfig) -> f32 {
    rng.range_f32(config.min_drop_fraction, config.max_drop_fraction)
}

/// Whether `target` lies ahead of an attacker facing `forward`.
pub fn is_in_front(attacker: Vec3, forward: Vec3, target: Vec3, min_dot: f32) -> bool {
    let to_target = flatten(target - attacker).normalize_or_zero();
    if to_target == Vec3::ZERO {
        return true;
    }
    flatten(forward).normalize_or_zero().dot(to_target) >= min_dot
}

/// Applies a resolved bite: knockback from the attacker, then the loss.
pub fn apply_bite(
    attacker: &Agent,
    victim: &mut Agent,
    drop_fraction: f32,
    combat: &CombatConfig,
    agent: &AgentConfig,
) -> BiteOutcome {
    let outcome = resolve_bite(attacker.resource_count(), victim.resource_count(), drop_fraction, combat);
    victim.apply_knockback(attacker.id, attacker.position, combat.knockback_multiplier, agent);
    match outcome {
        BiteOutcome::Fatal { .. } => {
            victim.lose_all_resources(agent);
        }
        BiteOutcome::Partial { dropped, .. } => {
            let loss = victim.lose_resources(dropped, agent);
            debug_assert!(matches!(loss, ResourceLoss::Reduced { .. }));
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;

    fn agent_with(id: u32, bones: u32, config: &AgentConfig) -> Agent {
        let mut agent = Agent::new(AgentId(id), format!("dog-{id}"), 0, true, config);
        for _ in 0..bones {
            agent.collect_resource(config);
        }
        agent
    }

    #[test]
    fn empty_victim_dies_without_drop() {
        let cfg = CombatConfig::default();
        assert_eq!(resolve_bite(0, 0, 0.3, &cfg), BiteOutcome::Fatal { dropped: 0, ejected: 0 });
        assert_eq!(resolve_bite(5, 0, 0.3, &cfg), BiteOutcome::Fatal { dropped: 0, ejected: 0 });
    }

    #[test]
    fn stronger_attacker_is_fatal_and_capped() {
        let cfg = CombatConfig::default();
        assert_eq!(resolve_bite(10, 5, 0.3, &cfg), BiteOutcome::Fatal { dropped: 5, ejected: 5 });
        assert_eq!(resolve_bite(7, 7, 0.3, &cfg), BiteOutcome::Fatal { dropped: 7, ejected: 7 });
        let big = resolve_bite(90, 60, 0.3, &cfg);
        assert_eq!(big, BiteOutcome::Fatal { dropped: 60, ejected: cfg.explosion_cap });
    }

    #[test]
    fn weaker_attacker_takes_a_rounded_up_share() {
        let cfg = CombatConfig::default();
        assert_eq!(resolve_bite(3, 20, 0.3, &cfg), BiteOutcome::Partial { dropped: 6, ejected: 6 });
        // ceil(7 * 0.25) = 2
        assert_eq!(drop_count(7, 0.25, &cfg), 2);
        assert_eq!(drop_count(90, 0.4, &cfg), cfg.max_drop_per_hit);
        // never takes the last bone
        assert_eq!(drop_count(2, 0.4, &cfg), 1);
        assert_eq!(drop_count(1, 0.4, &cfg), 0);
        assert_eq!(drop_count(0, 0.4, &cfg), 0);
    }

    #[test]
    fn facing_gate() {
        let forward = Vec3::Z;
        assert!(is_in_front(Vec3::ZERO, forward, Vec3::new(0.0, 0.0, 1.0), 0.2));
        assert!(!is_in_front(Vec3::ZERO, forward, Vec3::new(0.0, 0.0, -1.0), 0.2));
        assert!(!is_in_front(Vec3::ZERO, forward, Vec3::new(1.0, 0.0, 0.0), 0.2));
    }

    #[test]
    fn partial_bite_leaves_victim_alive() {
        let agent_cfg = AgentConfig::default();
        let combat = CombatConfig::default();
        let attacker = agent_with(0, 3, &agent_cfg);
        let mut victim = agent_with(1, 20, &agent_cfg);
        victim.position = Vec3::new(0.0, 0.0, 1.0);

        let outcome = apply_bite(&attacker, &mut victim, 0.3, &combat, &agent_cfg);
        assert_eq!(outcome, BiteOutcome::Partial { dropped: 6, ejected: 6 });
        assert_eq!(victim.resource_count(), 14);
        assert!(!victim.is_dying());
        assert!(victim.is_hit_flashing());
        assert!(victim.in_knockback());
        assert_eq!(victim.revenge_target(), Some(AgentId(0)));
    }

    #[test]
    fn fatal_bite_empties_victim() {
        let agent_cfg = AgentConfig::default();
        let combat = CombatConfig::default();
        let attacker = agent_with(0, 10, &agent_cfg);
        let mut victim = agent_with(1, 5, &agent_cfg);

        let outcome = apply_bite(&attacker, &mut victim, 0.3, &combat, &agent_cfg);
        assert_eq!(outcome.ejected(), 5);
        assert_eq!(victim.resource_count(), 0);
        assert!(victim.is_dying());
    }
}
