//! Fade-in of the results panel.
//!
//! Replayed whenever the controller's render generation moves on, so a
//! second identical result still visibly refreshes.

use std::time::Duration;

use iced::time::Instant;

pub const REVEAL_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy)]
pub struct Reveal {
    generation: u64,
    started: Option<Instant>,
    opacity: f32,
}

impl Default for Reveal {
    fn default() -> Self {
        Reveal {
            generation: 0,
            started: None,
            opacity: 1.0,
        }
    }
}

impl Reveal {
    /// Restart the fade if `generation` has not been shown yet
    pub fn replay_if_new(&mut self, generation: u64, now: Instant) -> bool {
        if generation == self.generation {
            return false;
        }
        self.generation = generation;
        self.started = Some(now);
        self.opacity = 0.0;
        true
    }

    pub fn tick(&mut self, now: Instant) {
        let Some(started) = self.started else {
            return;
        };
        let progress = now.saturating_duration_since(started).as_secs_f32() / REVEAL_DURATION.as_secs_f32();
        self.opacity = progress.clamp(0.0, 1.0);
        if self.opacity >= 1.0 {
            self.started = None;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.started.is_some()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}
