//! Welcome overlay timing.
//!
//! The overlay is fully opaque for the hold period, then fades out linearly
//! and is removed once fully transparent.

use std::time::Duration;

use iced::time::Instant;

/// Length of the fade-out after the hold period
pub const FADE_DURATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct Welcome {
    shown_at: Instant,
    hold: Duration,
    opacity: f32,
}

impl Welcome {
    pub fn new(shown_at: Instant, hold_seconds: u64) -> Self {
        Welcome {
            shown_at,
            hold: Duration::from_secs(hold_seconds),
            opacity: 1.0,
        }
    }

    /// Opacity as of the last tick
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Advance to `now`. Returns false once the overlay has fully faded.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.opacity = opacity_at(now.saturating_duration_since(self.shown_at), self.hold);
        self.opacity > 0.0
    }
}

/// Opacity after `elapsed`, given the hold period
fn opacity_at(elapsed: Duration, hold: Duration) -> f32 {
    if elapsed <= hold {
        return 1.0;
    }
    let fading = (elapsed - hold).as_secs_f32() / FADE_DURATION.as_secs_f32();
    (1.0 - fading).clamp(0.0, 1.0)
}
