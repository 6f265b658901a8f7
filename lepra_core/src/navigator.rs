//! Section navigator: a bounded index into the ordered section list.

use serde::{Deserialize, Serialize};

use crate::errors::{ScreenError, ScreenResult};

/// Current step of the form.
///
/// Invariant: `current < total`, and `total >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionNavigator {
    current: usize,
    total: usize,
}

impl SectionNavigator {
    /// Start at the first of `total` sections
    pub fn new(total: usize) -> ScreenResult<Self> {
        if total == 0 {
            return Err(ScreenError::invalid_input(
                "total",
                "0",
                "Navigator needs at least one section",
            ));
        }
        Ok(SectionNavigator { current: 0, total })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.total
    }

    /// Move back one section. No-op at the first section.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Move forward one section without validating. No-op at the last section.
    pub fn step_forward(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Width of the progress bar: `(current + 1) / total * 100`
    pub fn progress_percent(&self) -> f32 {
        (self.current + 1) as f32 / self.total as f32 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sections_rejected() {
        assert!(SectionNavigator::new(0).is_err());
    }

    #[test]
    fn test_retreat_at_start_is_noop() {
        let mut nav = SectionNavigator::new(4).unwrap();
        assert!(!nav.retreat());
        assert_eq!(nav.current(), 0);
        assert_eq!(nav.progress_percent(), 25.0);
    }

    #[test]
    fn test_step_forward_stops_at_last() {
        let mut nav = SectionNavigator::new(3).unwrap();
        assert!(nav.step_forward());
        assert!(nav.step_forward());
        assert!(nav.is_last());
        assert!(!nav.step_forward());
        assert_eq!(nav.current(), 2);
        assert_eq!(nav.progress_percent(), 100.0);
    }

    #[test]
    fn test_progress_tracks_every_move() {
        let mut nav = SectionNavigator::new(6).unwrap();
        for expected in 1..=6 {
            let percent = expected as f32 / 6.0 * 100.0;
            assert_eq!(nav.progress_percent(), percent);
            nav.step_forward();
        }
        nav.retreat();
        assert_eq!(nav.current(), 4);
        assert_eq!(nav.progress_percent(), 5.0 / 6.0 * 100.0);
    }

    #[test]
    fn test_single_section_is_first_and_last() {
        let nav = SectionNavigator::new(1).unwrap();
        assert!(nav.is_first());
        assert!(nav.is_last());
        assert_eq!(nav.progress_percent(), 100.0);
    }
}
