//! Playback clock
//!
//! Simulation time is measured in samples: at speed 1 and the default time
//! scale the clock moves one trajectory sample per wall-clock second.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Simulation samples advanced per wall-clock millisecond at speed 1
pub const DEFAULT_TIME_SCALE: f64 = 0.001;

/// Playback state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Time advances every frame
    #[default]
    Running,
    /// Time is frozen; scrubbing still works
    Paused,
}

impl PlaybackState {
    /// The other state
    pub fn toggled(self) -> Self {
        match self {
            PlaybackState::Running => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Running,
        }
    }
}

/// How negative speed factors are handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeSpeed {
    /// Negative speeds are stored as zero
    #[default]
    Clamp,
    /// Time runs backwards and wraps from below zero to the last sample
    Rewind,
}

/// Shared simulation clock
///
/// `current_time` stays within `[0, max_time - 1]`. While running it grows
/// by `elapsed_ms * speed * time_scale` per frame and jumps back to `0` as
/// soon as it reaches `max_time - 1`.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    current_time: f64,
    sample_index: usize,
    speed: f64,
    time_scale: f64,
    max_time: usize,
    state: PlaybackState,
    negative_speed: NegativeSpeed,
}

impl PlaybackClock {
    /// Create a running clock for sequences of at most `max_time` samples
    pub fn new(max_time: usize) -> Self {
        Self {
            current_time: 0.0,
            sample_index: 0,
            speed: 1.0,
            time_scale: DEFAULT_TIME_SCALE,
            max_time,
            state: PlaybackState::Running,
            negative_speed: NegativeSpeed::default(),
        }
    }

    /// Set the initial speed factor
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.set_speed(speed);
        self
    }

    /// Set samples per millisecond at speed 1
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        if time_scale.is_finite() && time_scale >= 0.0 {
            self.time_scale = time_scale;
        } else {
            warn!(time_scale, "ignoring invalid time scale");
        }
        self
    }

    /// Set the negative speed policy
    pub fn with_negative_speed(mut self, policy: NegativeSpeed) -> Self {
        self.negative_speed = policy;
        self
    }

    /// Start paused
    pub fn paused(mut self) -> Self {
        self.state = PlaybackState::Paused;
        self
    }

    // === Frame Update ===

    /// Advance by a wall-clock delta
    ///
    /// Does nothing while paused. Returns `true` when the clock looped.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        if self.state == PlaybackState::Paused {
            return false;
        }

        let elapsed_ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms
        } else {
            0.0
        };

        let last = self.last_time();
        let delta = elapsed_ms * self.speed * self.time_scale;
        let mut next = self.current_time + delta;
        let mut wrapped = false;

        // A standing clock only loops when it is not rewinding
        let forward = delta > 0.0 || (delta == 0.0 && self.speed >= 0.0);
        if delta < 0.0 && next < 0.0 {
            next = last;
            wrapped = true;
        } else if forward && next >= last {
            next = 0.0;
            wrapped = true;
        }

        if wrapped {
            debug!(from = self.current_time, to = next, "playback looped");
        }
        self.set_current(next);
        wrapped
    }

    // === User Input ===

    /// Scrub to an absolute time, clamped to `[0, max_time - 1]`
    ///
    /// Allowed in both states and never changes the state.
    pub fn set_time(&mut self, time: f64) {
        if !time.is_finite() {
            warn!(time, "ignoring non-finite scrub target");
            return;
        }
        let clamped = time.clamp(0.0, self.last_time());
        if clamped != time {
            trace!(requested = time, clamped, "scrub target clamped");
        }
        self.set_current(clamped);
    }

    /// Replace the speed factor
    ///
    /// Zero keeps the clock running without moving it. Negative values follow
    /// the [`NegativeSpeed`] policy.
    pub fn set_speed(&mut self, speed: f64) {
        if !speed.is_finite() {
            warn!(speed, "ignoring non-finite speed");
            return;
        }
        self.speed = match self.negative_speed {
            NegativeSpeed::Clamp if speed < 0.0 => {
                debug!(speed, "negative speed clamped to zero");
                0.0
            }
            _ => speed,
        };
    }

    /// Flip between running and paused, returning the new state
    pub fn toggle(&mut self) -> PlaybackState {
        self.state = self.state.toggled();
        debug!(state = ?self.state, "playback toggled");
        self.state
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Resume playback
    pub fn resume(&mut self) {
        self.state = PlaybackState::Running;
    }

    /// Change the sequence bound, pulling the current time back into range
    pub fn set_max_time(&mut self, max_time: usize) {
        self.max_time = max_time;
        let clamped = self.current_time.clamp(0.0, self.last_time());
        self.set_current(clamped);
    }

    // === Queries ===

    /// Integer sample selected by the current time
    pub fn sample_index(&self) -> usize {
        self.sample_index
    }

    /// Sample index for a sequence of `len` samples, `None` when empty
    ///
    /// Each sequence wraps on its own length, so short sequences loop
    /// independently of the longest one.
    pub fn resolve_index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.sample_index % len)
    }

    /// Current simulation time
    pub fn time(&self) -> f64 {
        self.current_time
    }

    /// Current speed factor
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Samples per millisecond at speed 1
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Length of the longest sequence
    pub fn max_time(&self) -> usize {
        self.max_time
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if paused
    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    /// Negative speed policy
    pub fn negative_speed(&self) -> NegativeSpeed {
        self.negative_speed
    }

    /// Largest reachable time
    fn last_time(&self) -> f64 {
        self.max_time.saturating_sub(1) as f64
    }

    fn set_current(&mut self, time: f64) {
        self.current_time = time;
        self.sample_index = time.floor() as usize;
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(0)
    }
}
