//! Spawn placement for agents and bones.
//!
//! Agent spawns walk a fallback chain and never fail:
//!
//! 1. rejection sampling against obstacle clearance and living agents
//! 2. a grid sweep over the interior
//! 3. the grid point that best satisfies both margins
//! 4. the origin
//!
//! Bone spawns pick ground or platform-top points by weight and fall back
//! to the origin after a bounded number of attempts.

use game_core::{CollisionOracle, GameConfig, Obstacle, RngOracle, Stage, Vec3, horizontal_distance};

/// How a spawn point was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum SpawnSource {
    Random,
    Grid,
    Furthest,
    Origin,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub source: SpawnSource,
}

// Above anything a stage can hold.
const SKY: f32 = 1.0e4;

/// Height of the highest walkable surface at `(x, z)`.
pub fn surface_height(stage: &Stage, x: f32, z: f32) -> f32 {
    stage.query_ground_height(Vec3::new(x, SKY, z)).height
}

fn on_surface(stage: &Stage, x: f32, z: f32) -> Vec3 {
    Vec3::new(x, surface_height(stage, x, z), z)
}

fn nearest_agent(point: Vec3, occupied: &[Vec3]) -> f32 {
    occupied
        .iter()
        .map(|p| horizontal_distance(point, *p))
        .fold(f32::INFINITY, f32::min)
}

fn grid_points(bound: f32, step: f32) -> impl Iterator<Item = (f32, f32)> {
    let count = ((bound * 2.0) / step).floor() as i32;
    (0..=count).flat_map(move |iz| (0..=count).map(move |ix| (-bound + ix as f32 * step, -bound + iz as f32 * step)))
}

/// Finds a spawn point clear of obstacles and away from `occupied`.
pub fn find_safe_spawn(
    stage: &Stage,
    occupied: &[Vec3],
    config: &GameConfig,
    rng: &mut (impl RngOracle + ?Sized),
) -> SpawnPoint {
    let arena = &config.arena;
    let bound = config.interior_bound();
    let acceptable = |point: Vec3| {
        stage.clearance_at(point, None) >= arena.spawn_clearance
            && nearest_agent(point, occupied) >= arena.spawn_agent_distance
    };

    for _ in 0..arena.spawn_attempts {
        let x = rng.range_f32(-bound, bound);
        let z = rng.range_f32(-bound, bound);
        let point = on_surface(stage, x, z);
        if acceptable(point) {
            return SpawnPoint {
                position: point,
                source: SpawnSource::Random,
            };
        }
    }

    if let Some(point) = grid_points(bound, arena.spawn_grid_step)
        .map(|(x, z)| on_surface(stage, x, z))
        .find(|p| acceptable(*p))
    {
        tracing::warn!(?point, "random spawn attempts exhausted, using grid search");
        return SpawnPoint {
            position: point,
            source: SpawnSource::Grid,
        };
    }

    // Best effort: the point whose tighter margin is the least violated,
    // ignoring points inside obstacles.
    let furthest = grid_points(bound, arena.spawn_grid_step)
        .map(|(x, z)| on_surface(stage, x, z))
        .filter_map(|p| {
            let clearance = stage.clearance_at(p, None);
            if clearance <= 0.0 {
                return None;
            }
            let score = (clearance / arena.spawn_clearance).min(nearest_agent(p, occupied) / arena.spawn_agent_distance);
            Some((p, score))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((point, _)) = furthest {
        tracing::warn!(?point, "no spawn point satisfies margins, using furthest point");
        return SpawnPoint {
            position: point,
            source: SpawnSource::Furthest,
        };
    }

    let origin = on_surface(stage, 0.0, 0.0);
    tracing::warn!(?origin, "no free spawn point, falling back to origin");
    SpawnPoint {
        position: origin,
        source: SpawnSource::Origin,
    }
}

fn platform_point(platform: &Obstacle, inset: f32, rng: &mut (impl RngOracle + ?Sized)) -> Vec3 {
    let b = platform.bounds;
    let (x0, x1) = inset_range(b.min.x, b.max.x, inset);
    let (z0, z1) = inset_range(b.min.z, b.max.z, inset);
    Vec3::new(rng.range_f32(x0, x1), platform.top(), rng.range_f32(z0, z1))
}

fn inset_range(min: f32, max: f32, inset: f32) -> (f32, f32) {
    if max - min > inset * 2.0 {
        (min + inset, max - inset)
    } else {
        let mid = (min + max) * 0.5;
        (mid, mid)
    }
}

/// Picks a location for a new population bone.
pub fn find_bone_spawn(stage: &Stage, config: &GameConfig, rng: &mut (impl RngOracle + ?Sized)) -> SpawnPoint {
    let arena = &config.arena;
    let bound = config.interior_bound();
    let platforms: Vec<&Obstacle> = stage.platforms().collect();
    let platform_weight = if platforms.is_empty() {
        0.0
    } else {
        arena.platform_spawn_weight
    };
    let total = arena.ground_spawn_weight + platform_weight;

    for _ in 0..arena.bone_spawn_attempts {
        let on_platform = total > 0.0 && rng.next_f32() * total < platform_weight;
        let point = if on_platform {
            let index = rng.range_u32(0, platforms.len() as u32 - 1) as usize;
            platform_point(platforms[index], arena.platform_spawn_inset, rng)
        } else {
            on_surface(stage, rng.range_f32(-bound, bound), rng.range_f32(-bound, bound))
        };
        if stage.clearance_at(point, None) >= arena.bone_clearance {
            return SpawnPoint {
                position: point,
                source: SpawnSource::Random,
            };
        }
    }

    let origin = on_surface(stage, 0.0, 0.0);
    tracing::warn!(?origin, "bone spawn attempts exhausted, placing at origin");
    SpawnPoint {
        position: origin,
        source: SpawnSource::Origin,
    }
}
