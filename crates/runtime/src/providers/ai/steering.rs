//! Obstacle avoidance and stuck recovery.
//!
//! The controller computes a straight-line desired direction; this module
//! bends it around whatever the probes see. Two signals trigger a
//! deviation:
//!
//! - the probe fan reports an obstacle closer than the near threshold, or
//! - the position history shows the agent going nowhere.
//!
//! Once chosen, a deviation is blended into the desired heading for a fixed
//! number of ticks so the agent commits to the detour instead of jittering.

use core::f32::consts::PI;

use arrayvec::ArrayVec;
use game_core::{AiConfig, CollisionOracle, RngOracle, Vec3, flatten, rotate_y};

/// Upper bound on the configurable history length.
pub const MAX_HISTORY: usize = 16;

/// Fan of candidate headings, in degrees off the desired one. Each non-zero
/// entry is tried on both sides.
const FAN_DEGREES: [f32; 5] = [30.0, 60.0, 90.0, 135.0, 180.0];

// ===== position history =====

/// Fixed-size ring of sampled positions.
#[derive(Clone, Debug)]
pub struct PositionHistory {
    samples: ArrayVec<Vec3, MAX_HISTORY>,
    capacity: usize,
    ticks_since_sample: u32,
}

impl PositionHistory {
    pub fn new(len: usize) -> Self {
        Self {
            samples: ArrayVec::new(),
            capacity: len.clamp(2, MAX_HISTORY),
            ticks_since_sample: 0,
        }
    }

    /// Counts a tick and stores `position` every `sample_ticks` ticks.
    /// Returns whether a sample was taken.
    pub fn record(&mut self, position: Vec3, sample_ticks: u32) -> bool {
        self.ticks_since_sample += 1;
        if self.ticks_since_sample < sample_ticks.max(1) {
            return false;
        }
        self.ticks_since_sample = 0;
        self.push(position);
        true
    }

    pub fn push(&mut self, position: Vec3) {
        if self.samples.len() >= self.capacity {
            self.samples.remove(0);
        }
        self.samples.push(flatten(position));
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.ticks_since_sample = 0;
    }

    /// Total horizontal distance walked across the samples.
    pub fn path_length(&self) -> f32 {
        self.samples.windows(2).map(|w| (w[1] - w[0]).length()).sum()
    }

    /// Horizontal extent of the sampled positions.
    fn extent(&self) -> Vec3 {
        let (min, max) = self.samples.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        flatten(max - min)
    }

    fn reverses_direction(&self) -> bool {
        self.samples
            .windows(3)
            .any(|w| (w[1] - w[0]).dot(w[2] - w[1]) < 0.0)
    }

    /// True when a full history shows either almost no travel or travel
    /// confined to a small box while reversing or not getting anywhere.
    pub fn is_stuck(&self, config: &AiConfig) -> bool {
        if !self.is_full() {
            return false;
        }
        if self.path_length() < config.stuck_path_length {
            return true;
        }
        let extent = self.extent();
        let area = extent.x * extent.z;
        area <= config.oscillation_area
            && (self.reverses_direction() || extent.length() < config.stuck_path_length)
    }
}

// ===== probing =====

/// Shortest obstacle clearance along `direction` across the configured probe
/// heights and lateral offsets, scaled by the agent's size.
pub fn probe_clearance(
    world: &(impl CollisionOracle + ?Sized),
    position: Vec3,
    size: f32,
    direction: Vec3,
    config: &AiConfig,
) -> f32 {
    let lateral = Vec3::new(direction.z, 0.0, -direction.x);
    let mut clearance = config.probe_distance;
    for &height in &config.probe_heights {
        for &offset in &config.probe_offsets {
            let origin = position + Vec3::Y * (height * size) + lateral * (offset * size);
            clearance = clearance.min(world.query_ray_clearance(origin, direction, config.probe_distance));
        }
    }
    clearance
}

/// Best heading from the fan around `desired`. Clearance is rewarded, large
/// turns are penalised. The side tried first in each pair is random so ties
/// do not always break the same way.
pub fn best_heading(
    world: &(impl CollisionOracle + ?Sized),
    position: Vec3,
    size: f32,
    desired: Vec3,
    skip_straight: bool,
    config: &AiConfig,
    rng: &mut (impl RngOracle + ?Sized),
) -> Option<(Vec3, f32)> {
    let mut angles: ArrayVec<f32, 11> = ArrayVec::new();
    if !skip_straight {
        angles.push(0.0);
    }
    for degrees in FAN_DEGREES {
        let radians = degrees.to_radians();
        if degrees >= 180.0 {
            angles.push(radians);
        } else if rng.chance(0.5) {
            angles.push(radians);
            angles.push(-radians);
        } else {
            angles.push(-radians);
            angles.push(radians);
        }
    }

    let mut best: Option<(Vec3, f32)> = None;
    for angle in angles {
        let heading = rotate_y(desired, angle).normalize_or_zero();
        let clearance = probe_clearance(world, position, size, heading, config);
        let score = clearance / config.probe_distance * (1.0 - config.deviation_weight * angle.abs() / PI);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((heading, score));
        }
    }
    best
}

// ===== deviation =====

/// Temporary heading override.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deviation {
    pub direction: Vec3,
    /// Weight of `direction` against the desired heading.
    pub blend: f32,
    pub remaining: u32,
}

impl Deviation {
    pub fn apply(&self, desired: Vec3) -> Vec3 {
        let blended = desired.lerp(self.direction, self.blend).normalize_or_zero();
        if blended == Vec3::ZERO { self.direction } else { blended }
    }
}

/// Per-agent avoidance state.
#[derive(Clone, Debug)]
pub struct Avoidance {
    history: PositionHistory,
    deviation: Option<Deviation>,
}

impl Avoidance {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            history: PositionHistory::new(config.history_len),
            deviation: None,
        }
    }

    pub fn deviation(&self) -> Option<&Deviation> {
        self.deviation.as_ref()
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.deviation = None;
    }

    /// Bends `desired` around obstacles. A zero `desired` is returned as is.
    pub fn refine(
        &mut self,
        desired: Vec3,
        position: Vec3,
        size: f32,
        world: &(impl CollisionOracle + ?Sized),
        config: &AiConfig,
        rng: &mut (impl RngOracle + ?Sized),
    ) -> Vec3 {
        let desired = flatten(desired).normalize_or_zero();
        if desired == Vec3::ZERO {
            return desired;
        }

        self.history.record(position, config.history_sample_ticks);
        let stuck = self.history.is_stuck(config);

        if !stuck {
            if let Some(deviation) = self.deviation.as_mut() {
                if deviation.remaining > 0 {
                    deviation.remaining -= 1;
                    return deviation.apply(desired);
                }
            }
            self.deviation = None;
        }

        let ahead = probe_clearance(world, position, size, desired, config);
        let near = ahead < config.near_obstacle_distance;
        if !stuck && !near {
            return desired;
        }

        let Some((heading, _)) = best_heading(world, position, size, desired, stuck, config, rng) else {
            return desired;
        };
        let deviation = Deviation {
            direction: heading,
            blend: if stuck { config.stuck_blend } else { config.near_blend },
            remaining: config.deviation_ticks,
        };
        if stuck {
            tracing::debug!(?position, ?heading, "stuck, deviating");
            self.history.clear();
        }
        self.deviation = Some(deviation);
        deviation.apply(desired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ObstacleSpec, ScriptedRng, Stage, boundary_specs};

    fn walled_stage() -> Stage {
        let mut specs = boundary_specs(40.0);
        specs.push(ObstacleSpec::new("fence", Vec3::new(0.0, 1.5, 2.0), Vec3::new(6.0, 3.0, 1.0)));
        Stage::new(specs, 0.15).unwrap()
    }

    #[test]
    fn stationary_history_is_stuck() {
        let config = AiConfig::default();
        let mut history = PositionHistory::new(config.history_len);
        for _ in 0..config.history_len {
            history.push(Vec3::new(1.0, 0.0, 1.0));
        }
        assert!(history.is_stuck(&config));
    }

    #[test]
    fn oscillation_is_stuck_but_progress_is_not() {
        let config = AiConfig::default();
        let mut wobble = PositionHistory::new(config.history_len);
        for i in 0..config.history_len {
            wobble.push(Vec3::new(if i % 2 == 0 { 0.0 } else { 0.4 }, 0.0, 0.0));
        }
        assert!(wobble.path_length() > config.stuck_path_length);
        assert!(wobble.is_stuck(&config));

        let mut walk = PositionHistory::new(config.history_len);
        for i in 0..config.history_len {
            walk.push(Vec3::new(i as f32, 0.0, 0.0));
        }
        assert!(!walk.is_stuck(&config));
    }

    #[test]
    fn partial_history_is_never_stuck() {
        let config = AiConfig::default();
        let mut history = PositionHistory::new(config.history_len);
        history.push(Vec3::ZERO);
        history.push(Vec3::ZERO);
        assert!(!history.is_stuck(&config));
    }

    #[test]
    fn history_samples_on_interval_and_evicts_oldest() {
        let mut history = PositionHistory::new(3);
        let taken = (0..9).filter(|i| history.record(Vec3::new(*i as f32, 0.0, 0.0), 3)).count();
        assert_eq!(taken, 3);
        for i in 0..5 {
            history.push(Vec3::new(i as f32, 0.0, 0.0));
        }
        assert_eq!(history.len(), 3);
        assert!((history.path_length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn probe_sees_obstacle_ahead() {
        let stage = walled_stage();
        let config = AiConfig::default();
        let ahead = probe_clearance(&stage, Vec3::ZERO, 1.0, Vec3::Z, &config);
        assert!((ahead - 1.5).abs() < 1e-3);
        let side = probe_clearance(&stage, Vec3::ZERO, 1.0, Vec3::X, &config);
        assert!((side - config.probe_distance).abs() < 1e-3);
    }

    #[test]
    fn near_obstacle_bends_heading() {
        let stage = walled_stage();
        let config = AiConfig::default();
        let mut avoidance = Avoidance::new(&config);
        let mut rng = ScriptedRng::constant(0.3);

        let heading = avoidance.refine(Vec3::Z, Vec3::ZERO, 1.0, &stage, &config, &mut rng);
        assert!(heading.x.abs() > 0.5);
        assert!((heading.length() - 1.0).abs() < 1e-4);
        let deviation = avoidance.deviation().copied().unwrap();
        assert_eq!(deviation.blend, config.near_blend);
        assert_eq!(deviation.remaining, config.deviation_ticks);
    }

    #[test]
    fn open_field_keeps_heading() {
        let stage = Stage::empty(40.0, 0.15);
        let config = AiConfig::default();
        let mut avoidance = Avoidance::new(&config);
        let mut rng = ScriptedRng::constant(0.3);
        let heading = avoidance.refine(Vec3::new(1.0, 0.0, 1.0), Vec3::ZERO, 1.0, &stage, &config, &mut rng);
        assert!((heading - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < 1e-5);
        assert!(avoidance.deviation().is_none());
    }

    #[test]
    fn stuck_agent_deviates_and_forgets_history() {
        let stage = Stage::empty(40.0, 0.15);
        let mut config = AiConfig::default();
        config.history_sample_ticks = 1;
        let mut avoidance = Avoidance::new(&config);
        let mut rng = ScriptedRng::constant(0.7);

        let mut heading = Vec3::Z;
        for _ in 0..config.history_len {
            heading = avoidance.refine(Vec3::Z, Vec3::ZERO, 1.0, &stage, &config, &mut rng);
        }
        assert!(heading.dot(Vec3::Z) < 0.99);
        assert_eq!(avoidance.deviation().map(|d| d.blend), Some(config.stuck_blend));
        assert!(avoidance.history().is_empty());
    }
}
