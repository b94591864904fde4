//! Static stage geometry and the collision oracle.
//!
//! A [`Stage`] is immutable after construction. Every obstacle is classified
//! once from its extents; the classification decides whether it blocks
//! movement and whether agents can stand on it.

use glam::Vec3;

use crate::agent::AgentId;
use crate::error::StageError;
use crate::geometry::Aabb;

/// Read-only collision queries shared by agent movement and AI probing.
pub trait CollisionOracle {
    /// True if `candidate` intersects any solid obstacle or any agent body
    /// other than `exclude`.
    fn query_box_overlap(&self, candidate: &Aabb, exclude: Option<AgentId>) -> bool;

    /// Highest walkable surface at or below `point` (within the landing band).
    fn query_ground_height(&self, point: Vec3) -> GroundHit;

    /// First solid obstacle along a normalized horizontal or 3D ray.
    fn query_ray_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Distance to the first obstacle along the ray, `max_distance` if clear.
    fn query_ray_clearance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> f32 {
        self.query_ray_hit(origin, direction, max_distance)
            .map_or(max_distance, |hit| hit.distance)
    }
}

/// Result of a ground-height query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundHit {
    /// Whether the query point rests on the surface (within tolerance).
    pub supported: bool,
    /// Height of the highest surface at or below the query point.
    pub height: f32,
    /// Platform the surface belongs to; `None` for the ground plane.
    pub platform: Option<ObstacleId>,
}

/// Result of a ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub obstacle: ObstacleId,
    pub kind: ObstacleKind,
    /// Top face height of the obstacle that was hit.
    pub top: f32,
}

/// Index of an obstacle within its stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u32);

/// Placement hint attached to an obstacle definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObstacleRole {
    /// Classified from extents.
    #[default]
    Auto,
    /// Arena boundary wall: always solid, never walkable.
    Boundary,
    /// Visual-only marker: never solid.
    Marker,
}

/// Collision class derived from an obstacle's extents and role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObstacleKind {
    /// Vertical extent exceeds twice the larger horizontal extent.
    Wall,
    /// All three extents within a factor of two of each other.
    Block,
    /// Footprint area exceeds vertical extent. Solid and walkable.
    Platform,
    /// Solid geometry matching no other rule.
    Prop,
    /// Arena boundary.
    Boundary,
    /// Cosmetic, never solid.
    Marker,
}

impl ObstacleKind {
    /// Classifies an object of the given extents.
    ///
    /// Rules are tried in order: wall, block, platform, prop.
    pub fn classify(size: Vec3, role: ObstacleRole) -> Self {
        match role {
            ObstacleRole::Boundary => return Self::Boundary,
            ObstacleRole::Marker => return Self::Marker,
            ObstacleRole::Auto => {}
        }

        let horizontal = size.x.max(size.z);
        if size.y > 2.0 * horizontal {
            return Self::Wall;
        }

        let largest = size.max_element();
        let smallest = size.min_element();
        if largest < 2.0 * smallest {
            return Self::Block;
        }

        if size.x * size.z > size.y {
            return Self::Platform;
        }

        Self::Prop
    }

    pub fn is_solid(self) -> bool {
        !matches!(self, Self::Marker)
    }

    pub fn is_walkable(self) -> bool {
        matches!(self, Self::Platform)
    }
}

/// Declarative obstacle, as authored in a stage file.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleSpec {
    pub name: String,
    pub center: Vec3,
    pub size: Vec3,
    pub role: ObstacleRole,
}

impl ObstacleSpec {
    pub fn new(name: impl Into<String>, center: Vec3, size: Vec3) -> Self {
        Self {
            name: name.into(),
            center,
            size,
            role: ObstacleRole::Auto,
        }
    }

    /// Obstacle resting on the ground plane.
    pub fn grounded(name: impl Into<String>, x: f32, z: f32, size: Vec3) -> Self {
        Self::new(name, Vec3::new(x, size.y * 0.5, z), size)
    }

    pub fn with_role(mut self, role: ObstacleRole) -> Self {
        self.role = role;
        self
    }
}

/// Classified obstacle held by a [`Stage`].
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub name: String,
    pub bounds: Aabb,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn top(&self) -> f32 {
        self.bounds.max.y
    }
}

/// Immutable world geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    obstacles: Vec<Obstacle>,
    landing_tolerance: f32,
}

impl Stage {
    /// Validates and classifies every obstacle.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] for obstacles with non-positive or non-finite
    /// extents.
    pub fn new(specs: Vec<ObstacleSpec>, landing_tolerance: f32) -> Result<Self, StageError> {
        let mut obstacles = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            if !spec.center.is_finite() || !spec.size.is_finite() {
                return Err(StageError::NonFinite { name: spec.name });
            }
            if spec.size.min_element() <= 0.0 {
                return Err(StageError::DegenerateObstacle {
                    size: spec.size.to_array(),
                    name: spec.name,
                });
            }
            let kind = ObstacleKind::classify(spec.size, spec.role);
            obstacles.push(Obstacle {
                id: ObstacleId(index as u32),
                name: spec.name,
                bounds: Aabb::from_center_size(spec.center, spec.size),
                kind,
            });
        }
        Ok(Self {
            obstacles,
            landing_tolerance,
        })
    }

    /// Stage with only the four boundary walls.
    pub fn empty(half_extent: f32, landing_tolerance: f32) -> Self {
        Self::from_trusted(boundary_walls(half_extent), landing_tolerance)
    }

    /// Builtin park layout: boundary, rocks, trees, platforms and a marker.
    pub fn park(half_extent: f32, landing_tolerance: f32) -> Self {
        let mut specs = boundary_walls(half_extent);
        let s = half_extent / 40.0;
        specs.extend([
            ObstacleSpec::grounded("rock-north", 8.0 * s, -14.0 * s, Vec3::new(2.0, 1.6, 2.2)),
            ObstacleSpec::grounded("rock-west", -18.0 * s, 4.0 * s, Vec3::new(2.4, 1.8, 1.6)),
            ObstacleSpec::grounded("rock-south", 4.0 * s, 20.0 * s, Vec3::new(1.8, 1.4, 1.8)),
            ObstacleSpec::grounded("tree-1", -10.0 * s, -22.0 * s, Vec3::new(0.8, 6.0, 0.8)),
            ObstacleSpec::grounded("tree-2", 22.0 * s, 10.0 * s, Vec3::new(0.8, 6.5, 0.8)),
            ObstacleSpec::grounded("tree-3", -25.0 * s, 25.0 * s, Vec3::new(0.9, 5.5, 0.9)),
            ObstacleSpec::grounded("tree-4", 27.0 * s, -27.0 * s, Vec3::new(0.8, 6.0, 0.8)),
            ObstacleSpec::grounded("deck-east", 18.0 * s, -6.0 * s, Vec3::new(8.0, 1.5, 6.0)),
            ObstacleSpec::grounded("deck-west", -16.0 * s, -12.0 * s, Vec3::new(6.0, 2.0, 6.0)),
            ObstacleSpec::grounded("stage-center", 0.0, 0.0, Vec3::new(6.0, 1.0, 6.0)),
            ObstacleSpec::grounded("hydrant-sign", -3.0 * s, 12.0 * s, Vec3::new(0.5, 0.5, 0.1))
                .with_role(ObstacleRole::Marker),
        ]);
        Self::from_trusted(specs, landing_tolerance)
    }

    // Builtin layouts are known to be well formed.
    fn from_trusted(specs: Vec<ObstacleSpec>, landing_tolerance: f32) -> Self {
        let obstacles = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| Obstacle {
                id: ObstacleId(index as u32),
                bounds: Aabb::from_center_size(spec.center, spec.size),
                kind: ObstacleKind::classify(spec.size, spec.role),
                name: spec.name,
            })
            .collect();
        Self {
            obstacles,
            landing_tolerance,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id.0 as usize)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.kind.is_walkable())
    }

    pub fn solids(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.kind.is_solid())
    }

    pub fn landing_tolerance(&self) -> f32 {
        self.landing_tolerance
    }

    /// Horizontal clearance from `point` to the nearest solid obstacle that
    /// reaches above `point.y`.
    pub fn clearance_at(&self, point: Vec3, ignore: Option<ObstacleId>) -> f32 {
        self.solids()
            .filter(|o| Some(o.id) != ignore && o.top() > point.y + self.landing_tolerance)
            .filter(|o| o.kind != ObstacleKind::Boundary)
            .map(|o| o.bounds.distance_xz(point))
            .fold(f32::INFINITY, f32::min)
    }

    fn overlaps_static(&self, candidate: &Aabb) -> bool {
        self.solids().any(|o| o.bounds.intersects(candidate))
    }
}

impl CollisionOracle for Stage {
    fn query_box_overlap(&self, candidate: &Aabb, _exclude: Option<AgentId>) -> bool {
        self.overlaps_static(candidate)
    }

    fn query_ground_height(&self, point: Vec3) -> GroundHit {
        let ceiling = point.y + self.landing_tolerance;
        let mut best = GroundHit {
            supported: false,
            height: 0.0,
            platform: None,
        };
        for platform in self.platforms() {
            let top = platform.top();
            if top <= ceiling && top > best.height && platform.bounds.contains_xz(point) {
                best.height = top;
                best.platform = Some(platform.id);
            }
        }
        best.supported = point.y - best.height <= self.landing_tolerance;
        best
    }

    fn query_ray_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.solids()
            .filter_map(|o| {
                o.bounds
                    .ray_distance(origin, direction, max_distance)
                    .map(|distance| RayHit {
                        distance,
                        obstacle: o.id,
                        kind: o.kind,
                        top: o.top(),
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Solid volume of an agent for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentBody {
    pub id: AgentId,
    pub bounds: Aabb,
}

/// Per-tick collision snapshot: static stage plus live agent bodies.
///
/// Built by the arena once per tick; bodies are refreshed as each agent
/// moves so later agents collide with earlier post-move positions.
#[derive(Clone, Copy, Debug)]
pub struct WorldView<'a> {
    pub stage: &'a Stage,
    pub bodies: &'a [AgentBody],
}

impl<'a> WorldView<'a> {
    pub fn new(stage: &'a Stage, bodies: &'a [AgentBody]) -> Self {
        Self { stage, bodies }
    }
}

impl CollisionOracle for WorldView<'_> {
    fn query_box_overlap(&self, candidate: &Aabb, exclude: Option<AgentId>) -> bool {
        if self.stage.overlaps_static(candidate) {
            return true;
        }
        self.bodies
            .iter()
            .filter(|body| Some(body.id) != exclude)
            .any(|body| body.bounds.intersects(candidate))
    }

    fn query_ground_height(&self, point: Vec3) -> GroundHit {
        self.stage.query_ground_height(point)
    }

    fn query_ray_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.stage.query_ray_hit(origin, direction, max_distance)
    }
}

fn boundary_walls(half_extent: f32) -> Vec<ObstacleSpec> {
    const HEIGHT: f32 = 4.0;
    const THICKNESS: f32 = 1.0;
    let span = half_extent * 2.0 + THICKNESS * 2.0;
    let offset = half_extent + THICKNESS * 0.5;
    [
        ("wall-north", Vec3::new(0.0, HEIGHT * 0.5, -offset), Vec3::new(span, HEIGHT, THICKNESS)),
        ("wall-south", Vec3::new(0.0, HEIGHT * 0.5, offset), Vec3::new(span, HEIGHT, THICKNESS)),
        ("wall-west", Vec3::new(-offset, HEIGHT * 0.5, 0.0), Vec3::new(THICKNESS, HEIGHT, span)),
        ("wall-east", Vec3::new(offset, HEIGHT * 0.5, 0.0), Vec3::new(THICKNESS, HEIGHT, span)),
    ]
    .into_iter()
    .map(|(name, center, size)| ObstacleSpec::new(name, center, size).with_role(ObstacleRole::Boundary))
    .collect()
}

/// Boundary walls for a stage of the given half extent, for layouts that
/// only list interior obstacles.
pub fn boundary_specs(half_extent: f32) -> Vec<ObstacleSpec> {
    boundary_walls(half_extent)
}
