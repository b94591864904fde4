//! Audio cue sink.
//!
//! The arena calls into an injected [`AudioCue`] when a bite starts, a bark
//! goes off or a victim yelps. Implementations must return immediately.
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

pub trait AudioCue: Send {
    fn play_bite(&mut self);
    fn play_bark(&mut self);
    fn play_yelp(&mut self);
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioCue for NullAudio {
    fn play_bite(&mut self) {}
    fn play_bark(&mut self) {}
    fn play_yelp(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Bite,
    Bark,
    Yelp,
}

/// Records cues into a shared log so callers can inspect them after handing
/// the sink to an arena.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    log: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the cues played so far.
    pub fn cues(&self) -> Vec<Cue> {
        match self.log.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.cues().iter().filter(|c| **c == cue).count()
    }

    fn push(&self, cue: Cue) {
        match self.log.lock() {
            Ok(mut log) => log.push(cue),
            Err(poisoned) => poisoned.into_inner().push(cue),
        }
    }
}

impl AudioCue for RecordingAudio {
    fn play_bite(&mut self) {
        self.push(Cue::Bite);
    }

    fn play_bark(&mut self) {
        self.push(Cue::Bark);
    }

    fn play_yelp(&mut self) {
        self.push(Cue::Yelp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_is_shared_between_clones() {
        let handle = RecordingAudio::new();
        let mut sink: Box<dyn AudioCue> = Box::new(handle.clone());
        sink.play_bite();
        sink.play_yelp();
        sink.play_yelp();
        assert_eq!(handle.cues(), [Cue::Bite, Cue::Yelp, Cue::Yelp]);
        assert_eq!(handle.count(Cue::Yelp), 2);
    }
}
