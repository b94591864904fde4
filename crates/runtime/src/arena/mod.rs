//! Authoritative arena simulation.
//!
//! The [`Arena`] owns every agent, bone and policy and advances them with
//! [`Arena::update`]. One update runs, in order:
//!
//! 1. due respawns
//! 2. bone purge and replenishment
//! 3. ejected bone physics
//! 4. every active agent: decide, then move (registration order)
//! 5. pickups
//! 6. bites
//! 7. removal of agents whose death animation finished
//!
//! Pickups and bites only run after every agent has moved, so they always
//! see this tick's positions. Once an agent wins, updates become no-ops.

mod combat;
mod pickup;
mod respawn;
mod spawn;

pub use combat::{find_victim, pair_mut};
pub use pickup::BoneGrid;
pub use respawn::{PendingRespawn, RespawnQueue};
pub use spawn::{SpawnPoint, SpawnSource, find_bone_spawn, find_safe_spawn, surface_height};

use game_core::{
    Agent, AgentBody, AgentId, Bone, BoneId, Command, GameConfig, InputState, PcgRng, RngOracle, Stage,
    TickEffects, Vec3, WorldView, apply_bite, eject_velocity, roll_drop_fraction,
};
use tracing::{debug, info};

use crate::api::{AgentView, AudioCue, BoneView, DecisionContext, LeaderboardEntry, NullAudio, PlayerPolicy, Result, RuntimeError};
use crate::events::ArenaEvent;
use crate::providers::{AiController, Policy};

/// Spin range of ejected bones, radians per second.
const EJECT_SPIN: f32 = 8.0;

/// Builder for [`Arena`].
pub struct ArenaBuilder {
    config: GameConfig,
    stage: Option<Stage>,
    rng: Option<Box<dyn RngOracle + Send>>,
    audio: Option<Box<dyn AudioCue>>,
}

impl ArenaBuilder {
    fn new() -> Self {
        Self {
            config: GameConfig::default(),
            stage: None,
            rng: None,
            audio: None,
        }
    }

    /// Override the rule set.
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom stage instead of the builtin park.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Seed the default PCG generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(Box::new(PcgRng::new(seed)));
        self
    }

    /// Inject a random source.
    pub fn rng(mut self, rng: impl RngOracle + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Inject an audio sink (default: [`NullAudio`]).
    pub fn audio(mut self, audio: impl AudioCue + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Validates the configuration and seeds the bone population.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Config`] when the configuration is invalid.
    pub fn build(self) -> Result<Arena> {
        self.config.validate()?;
        let stage = self.stage.unwrap_or_else(|| {
            Stage::park(self.config.arena.half_extent, self.config.physics.landing_tolerance)
        });
        let grid = BoneGrid::new(self.config.arena.half_extent, self.config.arena.grid_cell_size);

        let mut arena = Arena {
            stage,
            agents: Vec::new(),
            policies: Vec::new(),
            active: Vec::new(),
            bodies: Vec::new(),
            bones: Vec::new(),
            grid,
            rng: self.rng.unwrap_or_else(|| Box::new(PcgRng::default())),
            audio: self.audio.unwrap_or_else(|| Box::new(NullAudio)),
            events: Vec::new(),
            respawns: RespawnQueue::new(),
            winner: None,
            time: 0.0,
            tick: 0,
            next_bone_id: 0,
            config: self.config,
        };
        arena.replenish_bones();
        info!(
            obstacles = arena.stage.obstacles().len(),
            bones = arena.bones.len(),
            "arena ready"
        );
        Ok(arena)
    }
}

/// The match: stage, agents, bones and the tick that drives them.
pub struct Arena {
    config: GameConfig,
    stage: Stage,
    agents: Vec<Agent>,
    /// Parallel to `agents`.
    policies: Vec<Policy>,
    /// Parallel to `agents`: false while waiting to respawn.
    active: Vec<bool>,
    bodies: Vec<AgentBody>,
    bones: Vec<Bone>,
    grid: BoneGrid,
    rng: Box<dyn RngOracle + Send>,
    audio: Box<dyn AudioCue>,
    events: Vec<ArenaEvent>,
    respawns: RespawnQueue,
    winner: Option<AgentId>,
    time: f32,
    tick: u64,
    next_bone_id: u32,
}

impl Arena {
    pub fn builder() -> ArenaBuilder {
        ArenaBuilder::new()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a keyboard-driven agent.
    ///
    /// # Errors
    ///
    /// Rejects empty and duplicate names.
    pub fn add_player(&mut self, name: impl Into<String>, color_index: u8) -> Result<AgentId> {
        self.add_agent(name.into(), color_index, Policy::Player(PlayerPolicy))
    }

    /// Registers an AI-driven agent.
    ///
    /// # Errors
    ///
    /// Rejects empty and duplicate names.
    pub fn add_ai(&mut self, name: impl Into<String>, color_index: u8) -> Result<AgentId> {
        let controller = AiController::new(&self.config.ai);
        self.add_agent(name.into(), color_index, Policy::Ai(Box::new(controller)))
    }

    fn add_agent(&mut self, name: String, color_index: u8, policy: Policy) -> Result<AgentId> {
        let name = name.trim().to_owned();
        if name.is_empty() {
            return Err(RuntimeError::EmptyAgentName);
        }
        if self.agents.iter().any(|a| a.name == name) {
            return Err(RuntimeError::DuplicateAgentName { name });
        }

        let id = AgentId(self.agents.len() as u32);
        let mut agent = Agent::new(id, name, color_index, policy.is_ai(), &self.config.agent);
        let spawn = self.safe_spawn(None);
        agent.place(spawn.position, self.rng.angle());
        info!(agent = %id, name = %agent.name, ai = agent.is_ai, position = ?spawn.position, "agent joined");

        self.agents.push(agent);
        self.policies.push(policy);
        self.active.push(true);
        Ok(id)
    }

    fn safe_spawn(&mut self, exclude: Option<AgentId>) -> SpawnPoint {
        let occupied: Vec<Vec3> = self
            .agents
            .iter()
            .zip(&self.active)
            .filter(|(agent, active)| **active && !agent.is_dying() && Some(agent.id) != exclude)
            .map(|(agent, _)| agent.position)
            .collect();
        find_safe_spawn(&self.stage, &occupied, &self.config, self.rng.as_mut())
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances the match by `dt` seconds of input-driven play.
    ///
    /// `dt` is clamped to `physics.max_dt`. Does nothing once a winner
    /// exists.
    pub fn update(&mut self, dt: f32, input: &InputState) {
        if self.winner.is_some() {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.physics.max_dt)
        } else {
            0.0
        };
        self.time += dt;
        self.tick += 1;

        self.process_respawns();
        self.replenish_bones();
        self.tick_bones(dt);
        self.tick_agents(dt, input);
        if self.resolve_pickups() {
            return;
        }
        self.resolve_combat();
        self.sweep_lifecycle();
    }

    fn process_respawns(&mut self) {
        for id in self.respawns.pop_ready(self.time) {
            let index = id.0 as usize;
            if index >= self.agents.len() || self.active[index] {
                continue;
            }
            self.agents[index].respawn(&self.config.agent);
            let spawn = self.safe_spawn(Some(id));
            let rotation = self.rng.angle();
            self.agents[index].place(spawn.position, rotation);
            self.policies[index].reset();
            self.active[index] = true;
            info!(agent = %id, position = ?spawn.position, source = %spawn.source, "agent respawned");
            self.events.push(ArenaEvent::Respawned {
                agent: id,
                position: spawn.position,
            });
        }
    }

    fn replenish_bones(&mut self) {
        let now = self.time;
        self.bones.retain(|b| !b.collected && !b.is_expired(now));

        let population = self.bones.iter().filter(|b| b.counts_toward_population(now)).count();
        let deficit = self.config.arena.target_bones.saturating_sub(population);
        for _ in 0..deficit {
            let spawn = find_bone_spawn(&self.stage, &self.config, self.rng.as_mut());
            let id = self.next_bone();
            self.bones.push(Bone::settled(id, spawn.position, now));
        }
    }

    fn next_bone(&mut self) -> BoneId {
        let id = BoneId(self.next_bone_id);
        self.next_bone_id = self.next_bone_id.wrapping_add(1);
        id
    }

    fn tick_bones(&mut self, dt: f32) {
        let bound = self.config.interior_bound();
        for bone in &mut self.bones {
            bone.tick(dt, &self.stage, bound, &self.config.arena);
        }
    }

    fn rebuild_bodies(&mut self) {
        self.bodies.clear();
        let agent_cfg = &self.config.agent;
        self.bodies.extend(
            self.agents
                .iter()
                .zip(&self.active)
                .filter(|(agent, active)| **active && !agent.is_dying())
                .map(|(agent, _)| agent.agent_body(agent_cfg)),
        );
    }

    fn tick_agents(&mut self, dt: f32, input: &InputState) {
        self.rebuild_bodies();

        for index in 0..self.agents.len() {
            if !self.active[index] {
                continue;
            }

            let (goal, intent) = {
                let ctx = DecisionContext {
                    agent: &self.agents[index],
                    agents: &self.agents,
                    active: &self.active,
                    bones: &self.bones,
                    world: WorldView::new(&self.stage, &self.bodies),
                    input: *input,
                    config: &self.config,
                    dt,
                };
                self.policies[index].decide(&ctx, self.rng.as_mut())
            };

            let world = WorldView::new(&self.stage, &self.bodies);
            let agent = &mut self.agents[index];
            let effects = agent.apply_tick(Command::from(intent), dt, &world, &self.config);
            if effects.contains(TickEffects::BLOCKED) {
                debug!(agent = %agent.id, goal = goal.label(), "movement blocked");
            }

            let body = agent.agent_body(&self.config.agent);
            let (id, position) = (agent.id, agent.position);
            if let Some(slot) = self.bodies.iter_mut().find(|b| b.id == id) {
                *slot = body;
            }

            if effects.contains(TickEffects::BITE_STARTED) {
                self.audio.play_bite();
            }
            if effects.contains(TickEffects::BARKED) {
                self.audio.play_bark();
            }
            if effects.contains(TickEffects::MARKED) {
                self.events.push(ArenaEvent::TerritoryMarked { agent: id, position });
            }
        }
    }

    /// Returns `true` when a pickup decided the match.
    fn resolve_pickups(&mut self) -> bool {
        self.grid.rebuild(&self.bones);
        let radius = self.config.arena.bone_pickup_radius;
        let agent_cfg = &self.config.agent;

        for index in 0..self.agents.len() {
            if !self.active[index] || !self.agents[index].is_interactive() {
                continue;
            }
            let body = self.agents[index].body_box(agent_cfg);
            let reach = body.size().x.max(body.size().z) * 0.5 + radius;
            let candidates: Vec<usize> = self.grid.query(self.agents[index].position, reach).collect();

            for bone_index in candidates {
                let bone = &mut self.bones[bone_index];
                if !bone.is_collectible() || !pickup::touches(&body, bone.position, radius) {
                    continue;
                }
                bone.collected = true;
                let bone_id = bone.id;

                let agent = &mut self.agents[index];
                let won = agent.collect_resource(agent_cfg);
                self.events.push(ArenaEvent::BoneCollected {
                    agent: agent.id,
                    bone: bone_id,
                    resource_count: agent.resource_count(),
                });
                if won {
                    let id = agent.id;
                    info!(agent = %id, name = %agent.name, "winner declared");
                    self.winner = Some(id);
                    self.events.push(ArenaEvent::Winner { agent: id });
                    return true;
                }
            }
        }
        false
    }

    fn resolve_combat(&mut self) {
        for attacker_index in 0..self.agents.len() {
            let Some(victim_index) = find_victim(attacker_index, &self.agents, &self.active, &self.config) else {
                continue;
            };
            let Some((attacker, victim)) = pair_mut(&mut self.agents, attacker_index, victim_index) else {
                continue;
            };

            let fraction = roll_drop_fraction(self.rng.as_mut(), &self.config.combat);
            let outcome = apply_bite(attacker, victim, fraction, &self.config.combat, &self.config.agent);
            attacker.close_bite();
            self.audio.play_yelp();

            let (attacker_id, victim_id) = (attacker.id, victim.id);
            let origin = victim.position + Vec3::Y * (self.config.agent.body_height * victim.size());
            for _ in 0..outcome.ejected() {
                let id = BoneId(self.next_bone_id);
                self.next_bone_id = self.next_bone_id.wrapping_add(1);
                let velocity = eject_velocity(self.rng.as_mut(), &self.config.arena);
                let spin = self.rng.range_f32(-EJECT_SPIN, EJECT_SPIN);
                self.bones
                    .push(Bone::ejected(id, origin, velocity, spin, self.time, &self.config.arena));
            }

            debug!(attacker = %attacker_id, victim = %victim_id, ?outcome, "bite landed");
            self.events.push(ArenaEvent::Bitten {
                attacker: attacker_id,
                victim: victim_id,
                outcome,
            });
            if outcome.is_fatal() {
                info!(agent = %victim_id, by = %attacker_id, dropped = outcome.dropped(), "agent defeated");
                self.events.push(ArenaEvent::Defeated {
                    agent: victim_id,
                    by: attacker_id,
                });
            }
        }
    }

    fn sweep_lifecycle(&mut self) {
        for index in 0..self.agents.len() {
            if !self.active[index] || !self.agents[index].ready_for_removal() {
                continue;
            }
            self.active[index] = false;
            let id = self.agents[index].id;
            self.bodies.retain(|b| b.id != id);
            let respawn_at = self.time + self.config.combat.respawn_delay;
            self.respawns.schedule(id, respawn_at);
            info!(agent = %id, respawn_at, "agent removed");
            self.events.push(ArenaEvent::Removed { agent: id, respawn_at });
        }
    }

    /// Clears bones and respawns every agent in place of a new match.
    pub fn reset(&mut self) {
        self.bones.clear();
        self.events.clear();
        self.respawns.clear();
        self.winner = None;
        self.time = 0.0;
        self.tick = 0;

        for index in 0..self.agents.len() {
            self.active[index] = false;
        }
        for index in 0..self.agents.len() {
            self.agents[index].respawn(&self.config.agent);
            let spawn = self.safe_spawn(None);
            let rotation = self.rng.angle();
            self.agents[index].place(spawn.position, rotation);
            self.policies[index].reset();
            self.active[index] = true;
        }
        self.replenish_bones();
        info!(agents = self.agents.len(), bones = self.bones.len(), "arena reset");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<ArenaEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn winner(&self) -> Option<AgentId> {
        self.winner
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0 as usize)
    }

    /// Direct access for scripted setups and tools.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.0 as usize)
    }

    pub fn is_active(&self, id: AgentId) -> bool {
        self.active.get(id.0 as usize).copied().unwrap_or(false)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Adds a settled bone, e.g. for scripted scenarios.
    pub fn place_bone(&mut self, position: Vec3) -> BoneId {
        let id = self.next_bone();
        self.bones.push(Bone::settled(id, position, self.time));
        id
    }

    pub fn respawn_queue(&self) -> &RespawnQueue {
        &self.respawns
    }

    /// Render snapshot of every active agent.
    pub fn agent_views(&self) -> Vec<AgentView> {
        self.agents
            .iter()
            .zip(&self.active)
            .filter(|(_, active)| **active)
            .map(|(agent, _)| AgentView {
                id: agent.id,
                name: agent.name.clone(),
                color_index: agent.color_index,
                is_ai: agent.is_ai,
                position: agent.position,
                rotation: agent.rotation,
                size: agent.size(),
                resource_count: agent.resource_count(),
                has_won: agent.has_won(),
                is_dying: agent.is_dying(),
                is_jumping: agent.is_jumping,
                is_biting: agent.is_biting(),
                is_moving: agent.is_moving,
                hit_flash: agent.is_hit_flashing(),
                anim_phase: agent.anim_phase,
            })
            .collect()
    }

    pub fn bone_views(&self) -> Vec<BoneView> {
        self.bones
            .iter()
            .filter(|b| !b.collected)
            .map(|b| BoneView {
                id: b.id,
                position: b.position,
                rotation: b.rotation,
                phase: b.phase,
                collectible: b.is_collectible(),
            })
            .collect()
    }

    /// Every agent, most bones first; ties keep registration order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .agents
            .iter()
            .zip(&self.active)
            .map(|(agent, active)| LeaderboardEntry {
                id: agent.id,
                name: agent.name.clone(),
                resource_count: agent.resource_count(),
                active: *active,
            })
            .collect();
        entries.sort_by(|a, b| b.resource_count.cmp(&a.resource_count).then(a.id.cmp(&b.id)));
        entries
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("agents", &self.agents.len())
            .field("bones", &self.bones.len())
            .field("time", &self.time)
            .field("tick", &self.tick)
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Cue, RecordingAudio};
    use game_core::{Keys, ScriptedRng};

    fn open_arena() -> Arena {
        let config = GameConfig::default();
        let stage = Stage::empty(config.arena.half_extent, config.physics.landing_tolerance);
        let mut config = config;
        config.arena.target_bones = 0;
        Arena::builder().config(config).stage(stage).seed(5).build().unwrap()
    }

    #[test]
    fn names_must_be_unique_and_non_empty() {
        let mut arena = open_arena();
        assert_eq!(arena.add_player("rex", 0), Ok(AgentId(0)));
        assert_eq!(
            arena.add_ai("rex", 1),
            Err(RuntimeError::DuplicateAgentName { name: "rex".into() })
        );
        assert_eq!(arena.add_ai("  ", 1), Err(RuntimeError::EmptyAgentName));
        assert_eq!(arena.add_ai("fido", 1), Ok(AgentId(1)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = GameConfig::default();
        config.agent.win_threshold = 0;
        assert!(matches!(
            Arena::builder().config(config).build(),
            Err(RuntimeError::Config(_))
        ));
    }

    #[test]
    fn population_is_replenished_to_target() {
        let arena = Arena::builder().seed(9).build().unwrap();
        assert_eq!(arena.bones().len(), arena.config().arena.target_bones);
    }

    #[test]
    fn dt_is_clamped() {
        let mut arena = open_arena();
        arena.update(5.0, &InputState::new());
        assert!((arena.time() - arena.config().physics.max_dt).abs() < 1e-6);
    }

    #[test]
    fn player_walks_and_picks_up_bone() {
        let mut arena = open_arena();
        let id = arena.add_player("rex", 0).unwrap();
        arena.agent_mut(id).unwrap().place(Vec3::ZERO, 0.0);
        arena.place_bone(Vec3::new(0.0, 0.0, 1.0));

        let input = InputState::from_keys(Keys::BACK);
        for _ in 0..20 {
            arena.update(1.0 / 60.0, &input);
        }
        assert_eq!(arena.agent(id).unwrap().resource_count(), 1);
        let events = arena.drain_events();
        assert!(events.iter().any(|e| matches!(e, ArenaEvent::BoneCollected { agent, .. } if *agent == id)));
        assert!(arena.drain_events().is_empty());
    }

    #[test]
    fn bite_and_bark_reach_audio_sink() {
        let config = GameConfig::default();
        let stage = Stage::empty(config.arena.half_extent, config.physics.landing_tolerance);
        let audio = RecordingAudio::new();
        let mut arena = Arena::builder()
            .config(config)
            .stage(stage)
            .rng(ScriptedRng::constant(0.5))
            .audio(audio.clone())
            .build()
            .unwrap();
        let id = arena.add_player("rex", 0).unwrap();
        arena.agent_mut(id).unwrap().place(Vec3::ZERO, 0.0);

        arena.update(1.0 / 60.0, &InputState::from_keys(Keys::BITE | Keys::BARK));
        assert_eq!(audio.count(Cue::Bite), 1);
        assert_eq!(audio.count(Cue::Bark), 1);
        assert_eq!(audio.count(Cue::Yelp), 0);
    }

    #[test]
    fn leaderboard_sorts_by_bones() {
        let mut arena = open_arena();
        let a = arena.add_player("rex", 0).unwrap();
        let b = arena.add_ai("fido", 1).unwrap();
        let agent_cfg = arena.config().agent.clone();
        for _ in 0..3 {
            arena.agent_mut(b).unwrap().collect_resource(&agent_cfg);
        }
        let board = arena.leaderboard();
        assert_eq!(board[0].id, b);
        assert_eq!(board[1].id, a);
        assert_eq!(board[0].resource_count, 3);
    }
}
