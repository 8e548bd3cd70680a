//! Playback state machine
//!
//! Pure navigation state over a precomputed run: which step is current, how
//! many there are, whether auto-advance is on and at what speed. The timer
//! that drives auto-advance lives in [`crate::timer`]; this module only
//! decides what a step or a tick means.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Auto-advance speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    #[default]
    Medium,
    Slow,
}

impl Speed {
    /// Time between two automatic steps
    pub fn period(self) -> Duration {
        match self {
            Speed::Fast => Duration::from_millis(300),
            Speed::Medium => Duration::from_millis(500),
            Speed::Slow => Duration::from_millis(1000),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Speed::Fast => "fast",
            Speed::Medium => "medium",
            Speed::Slow => "slow",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown speed name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown speed '{0}' (expected fast, medium or slow)")]
pub struct ParseSpeedError(String);

impl FromStr for Speed {
    type Err = ParseSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Speed::Fast),
            "medium" => Ok(Speed::Medium),
            "slow" => Ok(Speed::Slow),
            other => Err(ParseSpeedError(other.to_string())),
        }
    }
}

/// Coarse playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No results loaded
    Idle,
    /// Results loaded, not auto-advancing
    Ready,
    /// Auto-advancing on the timer
    Playing,
}

/// What a timer tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Moved to the next step
    Advanced,
    /// Already at the last step; playback stopped
    Finished,
    /// Not playing; nothing happened
    Ignored,
}

/// Navigation state over the loaded steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    loaded: bool,
    current_step: usize,
    total_steps: usize,
    playing: bool,
    speed: Speed,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(Speed::default())
    }
}

impl PlaybackState {
    pub fn new(speed: Speed) -> Self {
        Self {
            loaded: false,
            current_step: 0,
            total_steps: 0,
            playing: false,
            speed,
        }
    }

    /// Enter `Ready` on a fresh result: step 0, not playing
    pub fn load(&mut self, total_steps: usize) {
        self.loaded = true;
        self.total_steps = total_steps;
        self.current_step = 0;
        self.playing = false;
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (self.loaded, self.playing) {
            (false, _) => PlaybackPhase::Idle,
            (true, false) => PlaybackPhase::Ready,
            (true, true) => PlaybackPhase::Playing,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Index of the last step, if there is one
    pub fn last_step(&self) -> Option<usize> {
        self.total_steps.checked_sub(1)
    }

    /// Whether the "previous" control is enabled
    pub fn can_step_back(&self) -> bool {
        self.loaded && self.current_step > 0
    }

    /// Whether the "next" control is enabled
    pub fn can_step_forward(&self) -> bool {
        self.loaded && self.last_step().is_some_and(|last| self.current_step < last)
    }

    /// Move by `delta`. Targets outside `[0, total_steps - 1]` are rejected
    /// and leave the state untouched.
    pub fn change_step(&mut self, delta: isize) -> bool {
        if !self.loaded {
            return false;
        }
        let Some(target) = self.current_step.checked_add_signed(delta) else {
            return false;
        };
        if target >= self.total_steps {
            return false;
        }
        self.current_step = target;
        true
    }

    /// `Ready -> Playing`. Returns false when nothing is loaded or already playing.
    pub fn start(&mut self) -> bool {
        if !self.loaded || self.playing {
            return false;
        }
        self.playing = true;
        true
    }

    /// `Playing -> Ready`. Returns false when not playing.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.playing, false)
    }

    /// Apply one timer tick
    pub fn tick(&mut self) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Ignored;
        }
        if self.can_step_forward() && self.change_step(1) {
            TickOutcome::Advanced
        } else {
            self.playing = false;
            TickOutcome::Finished
        }
    }

    /// 1-based label such as `3 / 8`
    pub fn position_label(&self) -> String {
        if self.total_steps == 0 {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.current_step + 1, self.total_steps)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(total: usize) -> PlaybackState {
        let mut state = PlaybackState::default();
        state.load(total);
        state
    }

    #[test]
    fn test_speed_periods() {
        assert_eq!(Speed::Fast.period(), Duration::from_millis(300));
        assert_eq!(Speed::Medium.period(), Duration::from_millis(500));
        assert_eq!(Speed::Slow.period(), Duration::from_millis(1000));
        assert_eq!("SLOW".parse::<Speed>().unwrap(), Speed::Slow);
        assert!("warp".parse::<Speed>().is_err());
    }

    #[test]
    fn test_idle_rejects_everything() {
        let mut state = PlaybackState::default();
        assert_eq!(state.phase(), PlaybackPhase::Idle);
        assert!(!state.change_step(1));
        assert!(!state.start());
        assert!(!state.can_step_back());
        assert!(!state.can_step_forward());
        assert_eq!(state.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_load_enters_ready_at_zero() {
        let mut state = loaded(8);
        state.change_step(3);
        state.start();
        state.load(5);
        assert_eq!(state.phase(), PlaybackPhase::Ready);
        assert_eq!(state.current_step(), 0);
        assert_eq!(state.total_steps(), 5);
    }

    #[test]
    fn test_controls_disabled_at_bounds() {
        let n = 8;
        let mut state = loaded(n);
        for index in 0..n {
            assert_eq!(state.current_step(), index);
            assert_eq!(!state.can_step_back(), index == 0);
            assert_eq!(!state.can_step_forward(), index == n - 1);
            state.change_step(1);
        }
    }

    #[test]
    fn test_change_step_never_leaves_range() {
        let mut state = loaded(4);
        assert!(!state.change_step(-1));
        assert_eq!(state.current_step(), 0);
        assert!(state.change_step(3));
        assert!(!state.change_step(1));
        assert_eq!(state.current_step(), 3);
        assert!(!state.change_step(isize::MIN));
        assert!(!state.change_step(isize::MAX));
        assert!(state.change_step(-2));
        assert_eq!(state.current_step(), 1);
    }

    #[test]
    fn test_single_and_empty_runs() {
        let mut state = loaded(1);
        assert!(!state.can_step_back());
        assert!(!state.can_step_forward());
        assert_eq!(state.position_label(), "1 / 1");

        let mut empty = loaded(0);
        assert!(!empty.change_step(0));
        assert_eq!(empty.position_label(), "0 / 0");
        assert!(empty.start());
        assert_eq!(empty.tick(), TickOutcome::Finished);
        assert!(state.start());
        assert_eq!(state.tick(), TickOutcome::Finished);
    }

    #[test]
    fn test_tick_runs_to_end_then_stops() {
        let mut state = loaded(3);
        assert!(state.start());
        assert!(!state.start());
        assert_eq!(state.tick(), TickOutcome::Advanced);
        assert_eq!(state.tick(), TickOutcome::Advanced);
        assert_eq!(state.current_step(), 2);
        assert_eq!(state.tick(), TickOutcome::Finished);
        assert_eq!(state.phase(), PlaybackPhase::Ready);
        assert_eq!(state.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_speed_change_keeps_position() {
        let mut state = loaded(6);
        state.change_step(4);
        state.start();
        state.set_speed(Speed::Fast);
        assert_eq!(state.current_step(), 4);
        assert!(state.is_playing());
        assert!(state.stop());
        assert!(!state.stop());
    }
}
