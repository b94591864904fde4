//! Body and bite volumes, scaled by the agent's current size.
use glam::Vec3;

use super::Agent;
use crate::config::AgentConfig;
use crate::env::AgentBody;
use crate::geometry::Aabb;

/// Forward-facing bite prism. Recomputed on every call to [`Agent::bite`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitVolume {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: f32,
    /// Axis-aligned box enclosing the rotated prism.
    pub bounds: Aabb,
}

impl HitVolume {
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.bounds.intersects(other)
    }
}

impl Agent {
    /// Solid body box standing on the agent's position.
    pub fn body_box(&self, config: &AgentConfig) -> Aabb {
        self.body_box_at(self.position, config)
    }

    pub fn body_box_at(&self, position: Vec3, config: &AgentConfig) -> Aabb {
        let width = config.body_width * self.size();
        Aabb::from_base(position, width, config.body_height * self.size(), width)
    }

    pub fn agent_body(&self, config: &AgentConfig) -> AgentBody {
        AgentBody {
            id: self.id,
            bounds: self.body_box(config),
        }
    }

    /// Bite prism in front of the agent, pushed out by the lunge distance.
    pub fn bite(&self, config: &AgentConfig) -> HitVolume {
        let size = self.size();
        let half_extents = Vec3::new(config.bite_width, config.bite_height, config.bite_depth) * size * 0.5;
        let reach = config.body_width * size * 0.5 + half_extents.z + config.bite_lunge * size;
        let center = self.position + self.forward() * reach + Vec3::Y * (config.body_height * size * 0.5);
        HitVolume {
            center,
            half_extents,
            rotation: self.rotation,
            bounds: Aabb::rotated_about_y(center, half_extents, self.rotation),
        }
    }
}
