//! Player key state and the movement intents agents consume.
use bitflags::bitflags;
use glam::Vec3;

bitflags! {
    /// Pressed keys sampled once per frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Keys: u16 {
        const FORWARD = 1 << 0;
        const BACK = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const JUMP = 1 << 4;
        const BITE = 1 << 5;
        const BARK = 1 << 6;
        const ZOOMIES = 1 << 7;
        const MARKING = 1 << 8;
        /// Hydrant placement, handled outside the simulation.
        const HYDRANT = 1 << 9;

        const MOVEMENT = Self::FORWARD.bits() | Self::BACK.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Keys {
    /// Maps a browser-style key identifier. Movement keys have two aliases.
    pub fn from_identifier(key: &str) -> Option<Keys> {
        let key = match key {
            "w" | "W" | "ArrowUp" => Keys::FORWARD,
            "s" | "S" | "ArrowDown" => Keys::BACK,
            "a" | "A" | "ArrowLeft" => Keys::LEFT,
            "d" | "D" | "ArrowRight" => Keys::RIGHT,
            " " | "Space" => Keys::JUMP,
            "b" | "B" => Keys::BITE,
            "r" | "R" => Keys::BARK,
            "z" | "Z" => Keys::ZOOMIES,
            "m" | "M" => Keys::MARKING,
            "h" | "H" => Keys::HYDRANT,
            _ => return None,
        };
        Some(key)
    }
}

/// Snapshot of the player's keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputState {
    keys: Keys,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: Keys) -> Self {
        Self { keys }
    }

    /// Builds a state from the identifiers currently held down.
    pub fn from_pressed<'a>(pressed: impl IntoIterator<Item = &'a str>) -> Self {
        let mut state = Self::default();
        for key in pressed {
            state.set(key, true);
        }
        state
    }

    /// Records a key transition. Unknown identifiers are ignored.
    pub fn set(&mut self, key: &str, pressed: bool) {
        if let Some(flag) = Keys::from_identifier(key) {
            self.keys.set(flag, pressed);
        }
    }

    pub fn keys(&self) -> Keys {
        self.keys
    }

    pub fn is_pressed(&self, key: Keys) -> bool {
        self.keys.contains(key)
    }

    /// Whether the hydrant key is down; the collaborator owning hydrants
    /// polls this.
    pub fn hydrant_requested(&self) -> bool {
        self.keys.contains(Keys::HYDRANT)
    }

    /// Normalized horizontal direction of the movement keys (zero if none or
    /// if opposite keys cancel).
    pub fn direction(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.keys.contains(Keys::FORWARD) {
            dir.z -= 1.0;
        }
        if self.keys.contains(Keys::BACK) {
            dir.z += 1.0;
        }
        if self.keys.contains(Keys::LEFT) {
            dir.x -= 1.0;
        }
        if self.keys.contains(Keys::RIGHT) {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Resolved AI steering for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Steering {
    /// Normalized horizontal direction, zero to stand still.
    pub direction: Vec3,
    /// Multiplier on the agent's effective speed.
    pub speed: f32,
    pub attack: bool,
    pub jump: bool,
    pub bark: bool,
    pub zoomies: bool,
    /// Facing to adopt when not moving (idle turns).
    pub face: Option<f32>,
}

impl Steering {
    pub fn toward(direction: Vec3, speed: f32) -> Self {
        Self {
            direction: Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero(),
            speed,
            ..Self::default()
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }
}

/// What drives an agent this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MovementIntent {
    Input(InputState),
    Steer(Steering),
    #[default]
    Idle,
}

/// Flattened per-tick command consumed by [`crate::Agent::apply_tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Command {
    pub direction: Vec3,
    pub speed: f32,
    pub bite: bool,
    pub jump: bool,
    pub bark: bool,
    pub zoomies: bool,
    pub marking: bool,
    pub face: Option<f32>,
}

impl From<MovementIntent> for Command {
    fn from(intent: MovementIntent) -> Self {
        match intent {
            MovementIntent::Input(input) => Command {
                direction: input.direction(),
                speed: 1.0,
                bite: input.is_pressed(Keys::BITE),
                jump: input.is_pressed(Keys::JUMP),
                bark: input.is_pressed(Keys::BARK),
                zoomies: input.is_pressed(Keys::ZOOMIES),
                marking: input.is_pressed(Keys::MARKING),
                face: None,
            },
            MovementIntent::Steer(steering) => Command {
                direction: steering.direction,
                speed: steering.speed,
                bite: steering.attack,
                jump: steering.jump,
                bark: steering.bark,
                zoomies: steering.zoomies,
                marking: false,
                face: steering.face,
            },
            MovementIntent::Idle => Command::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_same_direction() {
        let wasd = InputState::from_pressed(["w", "d"]);
        let arrows = InputState::from_pressed(["ArrowUp", "ArrowRight"]);
        assert_eq!(wasd, arrows);
        let dir = wasd.direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x > 0.0 && dir.z < 0.0);
    }

    #[test]
    fn opposite_keys_cancel() {
        let input = InputState::from_pressed(["a", "d"]);
        assert_eq!(input.direction(), Vec3::ZERO);
    }

    #[test]
    fn release_clears_key_and_unknown_is_ignored() {
        let mut input = InputState::from_pressed(["b", " ", "q"]);
        assert!(input.is_pressed(Keys::BITE | Keys::JUMP));
        input.set("b", false);
        assert!(!input.is_pressed(Keys::BITE));
        assert_eq!(input.keys(), Keys::JUMP);
    }

    #[test]
    fn input_intent_becomes_command() {
        let command = Command::from(MovementIntent::Input(InputState::from_pressed(["s", "r", "m"])));
        assert_eq!(command.direction, Vec3::Z);
        assert!(command.bark && command.marking && !command.bite);
        assert_eq!(command.speed, 1.0);
    }
}
