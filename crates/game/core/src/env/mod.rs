//! Read-only world services.
//!
//! The stage answers collision queries through [`CollisionOracle`]; random
//! rolls go through [`RngOracle`]. Simulation code depends on the traits so
//! tests can substitute scripted implementations.
mod rng;
mod stage;

pub use rng::{PcgRng, RngOracle, ScriptedRng};
pub use stage::{
    AgentBody, CollisionOracle, GroundHit, Obstacle, ObstacleId, ObstacleKind, ObstacleRole,
    ObstacleSpec, RayHit, Stage, WorldView, boundary_specs,
};
