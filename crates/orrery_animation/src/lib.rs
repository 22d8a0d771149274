//! Orrery Animation
//!
//! Time-driven playback for trajectory data.
//!
//! # Features
//!
//! - **Playback Clock**: advances simulation time from wall-clock deltas,
//!   loops back to the start, pauses, scrubs and changes speed
//! - **Sample Index**: maps simulation time onto discrete trajectory samples,
//!   wrapping independently for sequences of different lengths
//! - **Frame Timer**: turns monotonically increasing frame timestamps into
//!   per-frame elapsed time

pub mod clock;
pub mod timer;

pub use clock::{NegativeSpeed, PlaybackClock, PlaybackState, DEFAULT_TIME_SCALE};
pub use timer::FrameTimer;
