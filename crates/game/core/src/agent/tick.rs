//! Per-tick integration of a single agent.
//!
//! Steps run in a fixed order:
//!
//! 1. death countdown (skips everything else)
//! 2. hit flash
//! 3. cooldowns and ability windows
//! 4. voluntary movement with collision rejection, then jump start
//! 5. gravity and landing
//! 6. knockback (bypasses collision)
//! 7. bite window
//! 8. arena bounds clamp
//! 9. animation clock
use bitflags::bitflags;
use glam::Vec3;

use super::Agent;
use crate::config::GameConfig;
use crate::env::CollisionOracle;
use crate::geometry::facing_of;
use crate::input::Command;

/// Movement speeds and gravity are tuned per 60 Hz frame.
const FRAME_RATE: f32 = 60.0;

/// Lift applied to collision probes so resting on a surface is not contact.
const PROBE_LIFT: f32 = 0.01;

bitflags! {
    /// Notable things that happened during one [`Agent::apply_tick`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TickEffects: u8 {
        const JUMPED = 1 << 0;
        const BITE_STARTED = 1 << 1;
        const BARKED = 1 << 2;
        const ZOOMIES_STARTED = 1 << 3;
        const MARKED = 1 << 4;
        const LANDED = 1 << 5;
        const BLOCKED = 1 << 6;
    }
}

#[inline]
fn count_down(timer: &mut f32, dt: f32) {
    *timer = (*timer - dt).max(0.0);
}

impl Agent {
    /// Advances the agent by `dt` seconds.
    ///
    /// Blocked movement is silent: the agent simply stays put and reports
    /// [`TickEffects::BLOCKED`].
    pub fn apply_tick(
        &mut self,
        command: Command,
        dt: f32,
        world: &impl CollisionOracle,
        config: &GameConfig,
    ) -> TickEffects {
        let agent_cfg = &config.agent;
        let mut effects = TickEffects::empty();

        if self.is_dying() {
            count_down(&mut self.timers.dying, dt);
            self.position.y -= agent_cfg.dying_sink_rate * dt;
            self.rotation += agent_cfg.dying_spin_rate * dt;
            return effects;
        }

        count_down(&mut self.timers.hit_flash, dt);

        self.tick_cooldowns(dt);
        effects |= self.start_abilities(&command, config);

        effects |= self.resolve_movement(&command, dt, world, config);
        if command.jump && !self.is_jumping && !self.in_knockback() {
            let ground = world.query_ground_height(self.position);
            if ground.supported {
                self.vertical_velocity = config.physics.jump_force;
                self.is_jumping = true;
                effects |= TickEffects::JUMPED;
            }
        }

        effects |= self.resolve_vertical(dt, world, config);

        if self.in_knockback() {
            self.position += self.knockback_velocity * dt;
            self.knockback_velocity *= config.physics.knockback_damping;
            count_down(&mut self.timers.knockback, dt);
        }

        if command.bite && !self.is_biting() && !self.in_knockback() {
            self.timers.bite = agent_cfg.bite_duration;
            effects |= TickEffects::BITE_STARTED;
        } else {
            count_down(&mut self.timers.bite, dt);
        }

        let bound = config.interior_bound();
        self.position.x = self.position.x.clamp(-bound, bound);
        self.position.z = self.position.z.clamp(-bound, bound);

        let rate = if self.is_biting() {
            3.0
        } else if self.is_moving {
            2.0
        } else {
            1.0
        };
        self.anim_phase = (self.anim_phase + dt * rate) % core::f32::consts::TAU;

        effects
    }

    fn tick_cooldowns(&mut self, dt: f32) {
        let timers = &mut self.timers;
        count_down(&mut timers.bark_cooldown, dt);
        count_down(&mut timers.zoomies_cooldown, dt);
        count_down(&mut timers.marking_cooldown, dt);
        count_down(&mut timers.zoomies, dt);
        count_down(&mut timers.marking, dt);
        if let Some(revenge) = self.revenge.as_mut() {
            count_down(&mut revenge.remaining, dt);
            if revenge.remaining <= 0.0 {
                self.revenge = None;
            }
        }
    }

    fn start_abilities(&mut self, command: &Command, config: &GameConfig) -> TickEffects {
        let cfg = &config.agent;
        let mut effects = TickEffects::empty();

        if command.bark && self.timers.bark_cooldown <= 0.0 {
            self.timers.bark_cooldown = cfg.bark_cooldown;
            effects |= TickEffects::BARKED;
        }
        // Cooldowns start when the window opens and include its duration.
        if command.zoomies && !self.is_zooming() && self.timers.zoomies_cooldown <= 0.0 {
            self.timers.zoomies = cfg.zoomies_duration;
            self.timers.zoomies_cooldown = cfg.zoomies_duration + cfg.zoomies_cooldown;
            effects |= TickEffects::ZOOMIES_STARTED;
        }
        if command.marking
            && !self.is_marking()
            && !self.is_jumping
            && self.timers.marking_cooldown <= 0.0
        {
            self.timers.marking = cfg.marking_duration;
            self.timers.marking_cooldown = cfg.marking_duration + cfg.marking_cooldown;
            effects |= TickEffects::MARKED;
        }
        effects
    }

    fn resolve_movement(
        &mut self,
        command: &Command,
        dt: f32,
        world: &impl CollisionOracle,
        config: &GameConfig,
    ) -> TickEffects {
        let direction = Vec3::new(command.direction.x, 0.0, command.direction.z).normalize_or_zero();
        if self.in_knockback() || self.is_marking() || direction == Vec3::ZERO {
            self.is_moving = false;
            if let Some(face) = command.face {
                self.rotation = face;
            }
            return TickEffects::empty();
        }

        self.rotation = facing_of(direction);

        let displacement = direction * self.effective_speed(config) * command.speed * dt * FRAME_RATE;
        let target = self.position + displacement;

        let margin = config.physics.collision_margin;
        let lift = Vec3::Y * PROBE_LIFT;
        let probe = |at: Vec3| {
            self.body_box_at(at, &config.agent)
                .expand_horizontal(margin)
                .translate(lift)
        };

        let blocked = world.query_box_overlap(&probe(target), Some(self.id));
        // An agent already embedded (pushed in by knockback) may walk out.
        let embedded = blocked && world.query_box_overlap(&probe(self.position), Some(self.id));

        if blocked && !embedded {
            self.is_moving = false;
            return TickEffects::BLOCKED;
        }

        self.position = target;
        self.is_moving = true;
        TickEffects::empty()
    }

    fn resolve_vertical(&mut self, dt: f32, world: &impl CollisionOracle, config: &GameConfig) -> TickEffects {
        let physics = &config.physics;
        let ground = world.query_ground_height(self.position);

        if !self.is_jumping {
            if ground.supported {
                self.position.y = ground.height;
                return TickEffects::empty();
            }
            self.is_jumping = true;
            self.vertical_velocity = 0.0;
        }

        self.vertical_velocity -= physics.gravity * dt * FRAME_RATE;
        let next_y = self.position.y + self.vertical_velocity * dt * FRAME_RATE;

        if self.vertical_velocity <= 0.0 && next_y <= ground.height {
            self.position.y = ground.height;
            self.vertical_velocity = 0.0;
            self.is_jumping = false;
            return TickEffects::LANDED;
        }

        self.position.y = next_y;
        TickEffects::empty()
    }

    /// Units per frame before the command's own multiplier.
    pub fn effective_speed(&self, config: &GameConfig) -> f32 {
        let cfg = &config.agent;
        let mut speed = cfg.base_speed;
        if self.is_ai {
            speed *= cfg.ai_speed_multiplier;
        }
        if self.is_zooming() {
            speed *= cfg.zoomies_multiplier;
        }
        speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use crate::env::{ObstacleSpec, Stage};
    use crate::input::{InputState, MovementIntent};

    const DT: f32 = 1.0 / 60.0;

    fn stage_with_rock() -> Stage {
        let mut specs = crate::env::boundary_specs(40.0);
        specs.push(ObstacleSpec::grounded("rock", 0.0, -1.5, glam::Vec3::new(2.0, 1.6, 2.0)));
        specs.push(ObstacleSpec::grounded("deck", 10.0, 0.0, glam::Vec3::new(6.0, 1.0, 6.0)));
        Stage::new(specs, 0.15).unwrap_or_else(|e| panic!("{e}"))
    }

    fn walk(keys: &[&str]) -> Command {
        Command::from(MovementIntent::Input(InputState::from_pressed(keys.iter().copied())))
    }

    #[test]
    fn blocked_move_is_idempotent() {
        let config = GameConfig::default();
        let stage = stage_with_rock();
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);

        // rock face at z = -0.5; body half width 0.4 plus margin 0.1
        agent.position = glam::Vec3::new(0.0, 0.0, 0.05);
        let start = agent.position;
        for _ in 0..10 {
            let effects = agent.apply_tick(walk(&["w"]), DT, &stage, &config);
            assert!(effects.contains(TickEffects::BLOCKED));
            assert_eq!(agent.position, start);
            assert!(!agent.is_moving);
        }
    }

    #[test]
    fn free_move_advances_by_speed() {
        let config = GameConfig::default();
        let stage = Stage::empty(40.0, 0.15);
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);
        agent.apply_tick(walk(&["d"]), DT, &stage, &config);
        assert!((agent.position.x - config.agent.base_speed).abs() < 1e-5);
        assert!(agent.is_moving);
        assert!((agent.forward().x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn jump_arcs_and_lands_on_ground() {
        let config = GameConfig::default();
        let stage = Stage::empty(40.0, 0.15);
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);

        let effects = agent.apply_tick(walk(&[" "]), DT, &stage, &config);
        assert!(effects.contains(TickEffects::JUMPED));
        assert!(agent.position.y > 0.0);

        let mut landed = false;
        for _ in 0..200 {
            if agent.apply_tick(Command::default(), DT, &stage, &config).contains(TickEffects::LANDED) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(agent.position.y, 0.0);
        assert!(!agent.is_jumping);
    }

    #[test]
    fn walking_off_a_platform_falls() {
        let config = GameConfig::default();
        let stage = stage_with_rock();
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);
        agent.position = glam::Vec3::new(12.9, 1.0, 0.0);

        agent.apply_tick(Command::default(), DT, &stage, &config);
        assert_eq!(agent.position.y, 1.0);
        assert!(!agent.is_jumping);

        for _ in 0..5 {
            agent.apply_tick(walk(&["d"]), DT, &stage, &config);
        }
        assert!(agent.is_jumping || agent.position.y == 0.0);
        for _ in 0..120 {
            agent.apply_tick(Command::default(), DT, &stage, &config);
        }
        assert_eq!(agent.position.y, 0.0);
    }

    #[test]
    fn knockback_bypasses_collision_and_decays() {
        let config = GameConfig::default();
        let stage = stage_with_rock();
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);
        agent.position = glam::Vec3::new(0.0, 0.0, 1.0);
        agent.apply_knockback(AgentId(1), glam::Vec3::new(0.0, 0.0, 3.0), 7.0, &config.agent);

        let before = agent.knockback_velocity.length();
        agent.apply_tick(walk(&["s"]), DT, &stage, &config);
        assert!(agent.position.z < 1.0);
        assert!(agent.knockback_velocity.length() < before);
        assert!(!agent.is_moving);
    }

    #[test]
    fn bite_window_opens_once_and_counts_down() {
        let config = GameConfig::default();
        let stage = Stage::empty(40.0, 0.15);
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);

        let effects = agent.apply_tick(walk(&["b"]), DT, &stage, &config);
        assert!(effects.contains(TickEffects::BITE_STARTED));
        assert_eq!(agent.timers.bite, config.agent.bite_duration);

        let effects = agent.apply_tick(walk(&["b"]), DT, &stage, &config);
        assert!(!effects.contains(TickEffects::BITE_STARTED));
        assert!(agent.timers.bite < config.agent.bite_duration);
    }

    #[test]
    fn no_bite_during_knockback() {
        let config = GameConfig::default();
        let stage = Stage::empty(40.0, 0.15);
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);
        agent.apply_knockback(AgentId(1), glam::Vec3::X, 7.0, &config.agent);
        let effects = agent.apply_tick(walk(&["b"]), DT, &stage, &config);
        assert!(!effects.contains(TickEffects::BITE_STARTED));
    }

    #[test]
    fn dying_only_counts_down() {
        let config = GameConfig::default();
        let stage = Stage::empty(40.0, 0.15);
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);
        agent.lose_all_resources(&config.agent);
        let x = agent.position.x;
        let effects = agent.apply_tick(walk(&["d", "b"]), DT, &stage, &config);
        assert!(effects.is_empty());
        assert_eq!(agent.position.x, x);
        assert!(agent.position.y < 0.0);
        assert!(!agent.ready_for_removal());

        for _ in 0..200 {
            agent.apply_tick(Command::default(), DT, &stage, &config);
        }
        assert!(agent.ready_for_removal());
    }

    #[test]
    fn position_is_clamped_to_interior() {
        let config = GameConfig::default();
        let stage = Stage::empty(40.0, 0.15);
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);
        agent.position = glam::Vec3::new(50.0, 0.0, -50.0);
        agent.apply_tick(Command::default(), DT, &stage, &config);
        let bound = config.interior_bound();
        assert_eq!(agent.position.x, bound);
        assert_eq!(agent.position.z, -bound);
    }

    #[test]
    fn bark_respects_cooldown_and_zoomies_speed_up() {
        let config = GameConfig::default();
        let stage = Stage::empty(40.0, 0.15);
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);

        assert!(agent.apply_tick(walk(&["r"]), DT, &stage, &config).contains(TickEffects::BARKED));
        assert!(!agent.apply_tick(walk(&["r"]), DT, &stage, &config).contains(TickEffects::BARKED));

        let normal = agent.effective_speed(&config);
        assert!(agent.apply_tick(walk(&["z"]), DT, &stage, &config).contains(TickEffects::ZOOMIES_STARTED));
        assert!(agent.effective_speed(&config) > normal);
    }

    #[test]
    fn marking_holds_still() {
        let config = GameConfig::default();
        let stage = Stage::empty(40.0, 0.15);
        let mut agent = Agent::new(AgentId(0), "rex", 0, false, &config.agent);
        assert!(agent.apply_tick(walk(&["m"]), DT, &stage, &config).contains(TickEffects::MARKED));
        agent.apply_tick(walk(&["d"]), DT, &stage, &config);
        assert_eq!(agent.position.x, 0.0);
    }
}
