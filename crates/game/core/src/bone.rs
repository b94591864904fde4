//! Bone pickups.
//!
//! Population bones are placed settled and never expire. Bones knocked out
//! of a bitten agent are ejected: they fly under gravity, bounce off the
//! arena bound, settle where they land and expire after their lifespan.
use glam::Vec3;

use crate::config::ArenaConfig;
use crate::env::{CollisionOracle, RngOracle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoneId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonePhase {
    Settled,
    Ejected,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    pub id: BoneId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub spin: f32,
    pub rotation: f32,
    pub phase: BonePhase,
    pub collected: bool,
    /// Simulation time the bone appeared.
    pub spawned_at: f32,
    /// Seconds until expiry; `None` for permanent bones.
    pub lifespan: Option<f32>,
    /// Remaining uncollectible time after ejection.
    pub grace: f32,
}

impl Bone {
    /// Permanent, immediately collectible bone.
    pub fn settled(id: BoneId, position: Vec3, now: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            spin: 0.0,
            rotation: 0.0,
            phase: BonePhase::Settled,
            collected: false,
            spawned_at: now,
            lifespan: None,
            grace: 0.0,
        }
    }

    /// Bone flung out of a bitten agent.
    pub fn ejected(id: BoneId, origin: Vec3, velocity: Vec3, spin: f32, now: f32, config: &ArenaConfig) -> Self {
        Self {
            id,
            position: origin,
            velocity,
            spin,
            rotation: 0.0,
            phase: BonePhase::Ejected,
            collected: false,
            spawned_at: now,
            lifespan: Some(config.bone_lifespan),
            grace: config.ejected_grace,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.lifespan.is_none()
    }

    pub fn is_expired(&self, now: f32) -> bool {
        self.lifespan.is_some_and(|life| now - self.spawned_at >= life)
    }

    pub fn is_collectible(&self) -> bool {
        !self.collected && self.phase == BonePhase::Settled && self.grace <= 0.0
    }

    /// Counts toward the maintained population.
    pub fn counts_toward_population(&self, now: f32) -> bool {
        !self.collected && self.is_permanent() && !self.is_expired(now)
    }

    /// Advances flight physics. Returns `true` on the tick the bone lands.
    pub fn tick(&mut self, dt: f32, world: &impl CollisionOracle, bound: f32, config: &ArenaConfig) -> bool {
        self.grace = (self.grace - dt).max(0.0);
        if self.phase != BonePhase::Ejected {
            return false;
        }

        let previous_y = self.position.y;
        self.velocity.y -= config.bone_gravity * dt;
        self.position += self.velocity * dt;
        self.rotation += self.spin * dt;

        if self.position.x.abs() > bound {
            self.position.x = self.position.x.clamp(-bound, bound);
            self.velocity.x = -self.velocity.x * config.bone_restitution;
        }
        if self.position.z.abs() > bound {
            self.position.z = self.position.z.clamp(-bound, bound);
            self.velocity.z = -self.velocity.z * config.bone_restitution;
        }

        let probe = Vec3::new(self.position.x, previous_y, self.position.z);
        let ground = world.query_ground_height(probe);
        if self.velocity.y <= 0.0 && self.position.y <= ground.height {
            self.position.y = ground.height;
            self.velocity = Vec3::ZERO;
            self.spin = 0.0;
            self.phase = BonePhase::Settled;
            return true;
        }
        false
    }
}

/// Random outward velocity for one ejected bone.
pub fn eject_velocity(rng: &mut (impl RngOracle + ?Sized), config: &ArenaConfig) -> Vec3 {
    let (sin, cos) = rng.angle().sin_cos();
    let speed = rng.range_f32(config.eject_speed_min, config.eject_speed_max);
    let lift = config.eject_lift * rng.range_f32(0.75, 1.25);
    Vec3::new(sin * speed, lift, cos * speed)
}
