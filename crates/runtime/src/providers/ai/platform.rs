//! Platform reasoning: when climbing onto something helps.
//!
//! Nearby platforms are found with a horizontal ray fan from just above the
//! agent's feet. A platform is worth a jump when the current goal benefits
//! from height: reaching a target standing above us, escaping a threat, or
//! occasionally checking a platform top for bones.

use core::f32::consts::TAU;

use game_core::{
    Agent, AiConfig, CollisionOracle, GameConfig, ObstacleId, ObstacleKind, RngOracle, Vec3, forward,
};

use super::Intent;

/// Ray origin height above the agent's feet.
const SCAN_LIFT: f32 = 0.3;

/// A platform edge seen by the scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformSighting {
    pub obstacle: ObstacleId,
    pub direction: Vec3,
    pub distance: f32,
    pub top: f32,
}

/// Casts `platform_rays` evenly spaced rays and keeps platforms whose top is
/// above the agent, nearest first.
pub fn scan_platforms(
    world: &(impl CollisionOracle + ?Sized),
    position: Vec3,
    config: &AiConfig,
) -> Vec<PlatformSighting> {
    let origin = position + Vec3::Y * SCAN_LIFT;
    let rays = config.platform_rays.max(1);
    let mut sightings: Vec<PlatformSighting> = (0..rays)
        .filter_map(|i| {
            let direction = forward(i as f32 * TAU / rays as f32);
            let hit = world.query_ray_hit(origin, direction, config.platform_scan_radius)?;
            (hit.kind == ObstacleKind::Platform && hit.top > position.y).then_some(PlatformSighting {
                obstacle: hit.obstacle,
                direction,
                distance: hit.distance,
                top: hit.top,
            })
        })
        .collect();
    sightings.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    sightings
}

/// Highest climb a standing jump can make, from the physics constants.
pub fn max_jump_height(config: &GameConfig) -> f32 {
    let physics = &config.physics;
    if physics.gravity <= 0.0 {
        return f32::INFINITY;
    }
    physics.jump_force * physics.jump_force / (2.0 * physics.gravity)
}

/// Heading override produced by the planner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformMove {
    pub direction: Vec3,
    pub jump: bool,
}

/// Per-agent platform jump bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct PlatformPlanner {
    cooldown: f32,
    last_jump: Option<Vec3>,
}

impl PlatformPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decides whether to head for a platform this tick.
    ///
    /// `target_height` is the feet height of the pursued rival, if any.
    #[allow(clippy::too_many_arguments)]
    pub fn plan(
        &mut self,
        agent: &Agent,
        intent: Intent,
        target_height: Option<f32>,
        world: &(impl CollisionOracle + ?Sized),
        config: &GameConfig,
        dt: f32,
        rng: &mut (impl RngOracle + ?Sized),
    ) -> Option<PlatformMove> {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown > 0.0 || agent.is_jumping {
            return None;
        }
        let ai = &config.ai;
        if let Some(last) = self.last_jump {
            if last.distance(agent.position) < ai.platform_min_separation {
                return None;
            }
        }

        let (wanted, steer_from_afar, cooldown) = match intent {
            Intent::Pursue => (
                target_height.is_some_and(|h| h > agent.position.y + ai.platform_height_gap),
                true,
                ai.pursue_platform_cooldown,
            ),
            Intent::Flee => (true, false, ai.flee_platform_cooldown),
            Intent::Hunt => (rng.chance(ai.hunt_platform_chance * dt), false, ai.hunt_platform_cooldown),
            Intent::Idle => (false, false, 0.0),
        };
        if !wanted {
            return None;
        }

        let reach = max_jump_height(config);
        let sighting = scan_platforms(world, agent.position, ai)
            .into_iter()
            .find(|s| s.top - agent.position.y <= reach)?;

        if sighting.distance <= ai.platform_jump_distance {
            self.cooldown = cooldown;
            self.last_jump = Some(agent.position);
            tracing::debug!(agent = %agent.id, %intent, top = sighting.top, "platform jump");
            return Some(PlatformMove {
                direction: sighting.direction,
                jump: true,
            });
        }
        steer_from_afar.then_some(PlatformMove {
            direction: sighting.direction,
            jump: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{AgentConfig, AgentId, ObstacleSpec, ScriptedRng, Stage, boundary_specs};

    fn deck_stage() -> Stage {
        let mut specs = boundary_specs(40.0);
        // 4 x 1 x 4 deck whose near edge is 1.5 in front of the origin
        specs.push(ObstacleSpec::grounded("deck", 0.0, 3.5, Vec3::new(4.0, 1.0, 4.0)));
        Stage::new(specs, 0.15).unwrap()
    }

    fn agent_at(position: Vec3) -> Agent {
        let mut agent = Agent::new(AgentId(1), "rex", 0, true, &AgentConfig::default());
        agent.place(position, 0.0);
        agent
    }

    #[test]
    fn scan_finds_deck_ahead() {
        let stage = deck_stage();
        let sightings = scan_platforms(&stage, Vec3::ZERO, &AiConfig::default());
        let first = sightings.first().copied().unwrap();
        assert!((first.distance - 1.5).abs() < 1e-3);
        assert!((first.top - 1.0).abs() < 1e-4);
        assert!(first.direction.z > 0.99);
    }

    #[test]
    fn fleeing_agent_jumps_onto_nearby_deck_once() {
        let stage = deck_stage();
        let config = GameConfig::default();
        let agent = agent_at(Vec3::ZERO);
        let mut planner = PlatformPlanner::new();
        let mut rng = ScriptedRng::constant(0.5);

        let plan = planner.plan(&agent, Intent::Flee, None, &stage, &config, 1.0 / 60.0, &mut rng);
        assert_eq!(plan.map(|p| p.jump), Some(true));
        assert!(planner.cooldown() > 0.0);

        let again = planner.plan(&agent, Intent::Flee, None, &stage, &config, 1.0 / 60.0, &mut rng);
        assert_eq!(again, None);
    }

    #[test]
    fn pursuer_climbs_only_for_higher_target() {
        let stage = deck_stage();
        let config = GameConfig::default();
        let agent = agent_at(Vec3::ZERO);
        let mut rng = ScriptedRng::constant(0.5);

        let mut planner = PlatformPlanner::new();
        let level = planner.plan(&agent, Intent::Pursue, Some(0.5), &stage, &config, 0.016, &mut rng);
        assert_eq!(level, None);

        let above = planner.plan(&agent, Intent::Pursue, Some(1.5), &stage, &config, 0.016, &mut rng);
        assert!(above.is_some());
    }

    #[test]
    fn idle_agent_never_plans() {
        let stage = deck_stage();
        let config = GameConfig::default();
        let mut planner = PlatformPlanner::new();
        let mut rng = ScriptedRng::constant(0.0);
        let agent = agent_at(Vec3::ZERO);
        assert_eq!(planner.plan(&agent, Intent::Idle, None, &stage, &config, 0.016, &mut rng), None);
    }
}
