//! Read-only snapshots for renderers, name tags and summaries.
use game_core::{AgentId, BoneId, BonePhase, Vec3};
use serde::{Deserialize, Serialize};

/// Everything a renderer or name-tag overlay needs about one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub name: String,
    pub color_index: u8,
    pub is_ai: bool,
    pub position: Vec3,
    pub rotation: f32,
    pub size: f32,
    pub resource_count: u32,
    pub has_won: bool,
    pub is_dying: bool,
    pub is_jumping: bool,
    pub is_biting: bool,
    pub is_moving: bool,
    pub hit_flash: bool,
    pub anim_phase: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneView {
    pub id: BoneId,
    pub position: Vec3,
    pub rotation: f32,
    pub phase: BonePhase,
    pub collectible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: AgentId,
    pub name: String,
    pub resource_count: u32,
    pub active: bool,
}
