//! Axis-aligned volumes and horizontal-plane helpers.
//!
//! The world is y-up. All AI distances and facing math happen on the XZ
//! plane; a facing angle `θ` points along `(sin θ, 0, cos θ)`.

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box standing on `base` (its bottom face centered on the point).
    pub fn from_base(base: Vec3, width: f32, height: f32, depth: f32) -> Self {
        Self {
            min: Vec3::new(base.x - width * 0.5, base.y, base.z - depth * 0.5),
            max: Vec3::new(base.x + width * 0.5, base.y + height, base.z + depth * 0.5),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Component-wise open-interval intersection on all three axes.
    ///
    /// Touching faces do not count, so an agent standing exactly on a
    /// platform top does not overlap the platform.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Grows the x and z extents by `margin` on every side.
    pub fn expand_horizontal(&self, margin: f32) -> Aabb {
        Aabb {
            min: Vec3::new(self.min.x - margin, self.min.y, self.min.z - margin),
            max: Vec3::new(self.max.x + margin, self.max.y, self.max.z + margin),
        }
    }

    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.contains_xz(point) && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Horizontal distance from `point` to the box footprint (0 inside).
    pub fn distance_xz(&self, point: Vec3) -> f32 {
        let dx = (self.min.x - point.x).max(point.x - self.max.x).max(0.0);
        let dz = (self.min.z - point.z).max(point.z - self.max.z).max(0.0);
        (dx * dx + dz * dz).sqrt()
    }

    /// Squared 3D distance from `point` to the closest point of the box.
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        let closest = point.clamp(self.min, self.max);
        closest.distance_squared(point)
    }

    /// Slab ray cast. Returns the entry distance along `direction` (which
    /// must be normalized), `0.0` when the origin is inside the box.
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let lo = self.min[axis];
            let hi = self.max[axis];
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                core::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    /// Smallest axis-aligned box enclosing a box of half extents `half`
    /// centered on `center` and rotated by `angle` about the vertical axis.
    pub fn rotated_about_y(center: Vec3, half: Vec3, angle: f32) -> Aabb {
        let (sin, cos) = angle.sin_cos();
        let extent_x = half.x * cos.abs() + half.z * sin.abs();
        let extent_z = half.x * sin.abs() + half.z * cos.abs();
        let half = Vec3::new(extent_x, half.y, extent_z);
        Aabb {
            min: center - half,
            max: center + half,
        }
    }
}

/// Unit forward vector for a facing angle.
#[inline]
pub fn forward(angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(sin, 0.0, cos)
}

/// Facing angle that points along `direction` on the XZ plane.
#[inline]
pub fn facing_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Projects onto the XZ plane.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal-only distance between two points.
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(a - b).length()
}

/// Rotates a horizontal direction about the y axis.
#[inline]
pub fn rotate_y(direction: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        direction.x * cos + direction.z * sin,
        direction.y,
        -direction.x * sin + direction.z * cos,
    )
}
