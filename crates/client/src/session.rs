//! Match assembly and the frame loop.

use std::time::Duration;

use anyhow::{Context, Result, ensure};
use game_content::{ConfigLoader, StageLoader};
use game_core::{AgentId, GameConfig, InputState, Stage};
use runtime::{Arena, ArenaEvent, LeaderboardEntry};
use serde::Serialize;

use crate::config::{ClientConfig, MAX_AI_COUNT, StageSource};

const AI_NAMES: [&str; 8] = ["Rex", "Biscuit", "Luna", "Ziggy", "Pepper", "Moose", "Olive", "Tank"];
const PLAYER_NAME: &str = "You";

/// End-of-match report printed by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub seed: u64,
    pub ticks: u64,
    pub elapsed: f32,
    pub winner: Option<String>,
    pub defeats: usize,
    pub bones_collected: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
}

pub struct Session {
    arena: Arena,
    config: ClientConfig,
    seed: u64,
    player: AgentId,
    defeats: usize,
    bones_collected: usize,
}

impl Session {
    /// Loads content and registers the player plus `ai_count` opponents.
    pub fn new(config: ClientConfig) -> Result<Self> {
        ensure!(
            config.ai_count <= MAX_AI_COUNT,
            "at most {MAX_AI_COUNT} AI opponents are supported, got {}",
            config.ai_count
        );
        let rules = match &config.config_path {
            Some(path) => ConfigLoader::load(path)?,
            None => ConfigLoader::builtin()?,
        };
        let stage = load_stage(&config.stage, &rules)?;
        let seed = config.seed.unwrap_or_else(rand::random);

        let mut builder = Arena::builder().config(rules).seed(seed);
        if let Some(stage) = stage {
            builder = builder.stage(stage);
        }
        let mut arena = builder.build().context("Failed to build arena")?;

        let player = arena.add_player(PLAYER_NAME, 0)?;
        for index in 0..config.ai_count {
            let name = match AI_NAMES.get(index) {
                Some(name) => (*name).to_owned(),
                None => format!("{} {}", AI_NAMES[index % AI_NAMES.len()], index / AI_NAMES.len() + 1),
            };
            let color = u8::try_from(index + 1).context("AI color index out of range")?;
            arena.add_ai(name, color)?;
        }

        tracing::info!(seed, ai = config.ai_count, "session ready");
        Ok(Self {
            arena,
            config,
            seed,
            player,
            defeats: 0,
            bones_collected: 0,
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn player(&self) -> AgentId {
        self.player
    }

    /// Advances one frame and tallies its events.
    pub fn step(&mut self, input: &InputState) {
        self.arena.update(self.config.dt(), input);
        for event in self.arena.drain_events() {
            match event {
                ArenaEvent::BoneCollected { .. } => self.bones_collected += 1,
                ArenaEvent::Defeated { .. } => self.defeats += 1,
                _ => {}
            }
        }
    }

    fn finished(&self) -> bool {
        self.arena.winner().is_some() || self.arena.tick_count() >= self.config.max_ticks
    }

    /// Runs flat out until the match ends.
    pub fn run(&mut self) -> Summary {
        let input = InputState::new();
        while !self.finished() {
            self.step(&input);
        }
        self.summary()
    }

    /// Runs with frames paced at `fps` wall-clock frames per second.
    pub async fn run_realtime(&mut self) -> Summary {
        let input = InputState::new();
        let mut interval = tokio::time::interval(Duration::from_secs_f32(self.config.dt()));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        while !self.finished() {
            interval.tick().await;
            self.step(&input);
            if self.arena.tick_count() % u64::from(self.config.fps) == 0 {
                if let Some(leader) = self.arena.leaderboard().first() {
                    tracing::info!(leader = %leader.name, bones = leader.resource_count, "standings");
                }
            }
        }
        self.summary()
    }

    pub fn summary(&self) -> Summary {
        let winner = self
            .arena
            .winner()
            .and_then(|id| self.arena.agent(id))
            .map(|agent| agent.name.clone());
        Summary {
            seed: self.seed,
            ticks: self.arena.tick_count(),
            elapsed: self.arena.time(),
            winner,
            defeats: self.defeats,
            bones_collected: self.bones_collected,
            leaderboard: self.arena.leaderboard(),
        }
    }
}

fn load_stage(source: &StageSource, rules: &GameConfig) -> Result<Option<Stage>> {
    let (half, tolerance) = (rules.arena.half_extent, rules.physics.landing_tolerance);
    let stage = match source {
        StageSource::Default => return Ok(None),
        StageSource::Builtin(name) => StageLoader::builtin(name, half, tolerance)?,
        StageSource::File(path) => StageLoader::load(path, half, tolerance)?,
    };
    Ok(Some(stage))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(ai_count: usize, stage: StageSource) -> ClientConfig {
        ClientConfig {
            stage,
            seed: Some(42),
            ai_count,
            max_ticks: 120,
            ..ClientConfig::default()
        }
    }

    #[test]
    fn session_stops_at_tick_budget() {
        let mut session = Session::new(short(3, StageSource::Default)).unwrap();
        let summary = session.run();
        assert!(summary.winner.is_some() || summary.ticks == 120);
        assert_eq!(summary.leaderboard.len(), 4);
        assert_eq!(summary.seed, 42);
        assert!(serde_json::to_string(&summary).unwrap().contains("\"leaderboard\""));
    }

    #[test]
    fn names_beyond_the_list_get_suffixes() {
        let session = Session::new(short(10, StageSource::Builtin("yard".into()))).unwrap();
        let names: Vec<&str> = session.arena().agents().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names.len(), 11);
        assert!(names.contains(&"Rex 2"));
        assert!(names.contains(&"Biscuit 2"));
    }

    #[test]
    fn too_many_opponents_are_rejected() {
        let Err(err) = Session::new(short(MAX_AI_COUNT + 1, StageSource::Default)) else {
            panic!("oversized roster accepted");
        };
        assert!(err.to_string().contains("at most 255"));
    }

    #[test]
    fn unknown_builtin_stage_fails() {
        assert!(Session::new(short(1, StageSource::Builtin("moon".into()))).is_err());
    }
}
