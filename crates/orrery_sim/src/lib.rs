//! # Orrery Sim
//!
//! Trajectory-driven solar system on top of the orrery scene graph and
//! playback clock.
//!
//! # Features
//!
//! - **Configuration**: `orrery.toml` with playback, camera, data and body
//!   sections, defaulting to the built-in solar system preset
//! - **Trajectory Sources**: whitespace tables on disk or samples in memory
//! - **Per-Body Update**: orbit carriers follow the clock's sample, spin
//!   nodes turn every frame, paused or not
//! - **Orbit Camera**: drag to orbit, optionally following a body
//! - **Render Submission**: orbit lines and bodies handed to any [`Renderer`]
//!
//! # Example
//!
//! ```rust
//! use orrery_sim::{BodyConfig, ControlEvent, MemorySource, Orrery, SimConfig};
//! use orrery_core::Vec3;
//!
//! let config = SimConfig {
//!     bodies: vec![BodyConfig::new("earth")],
//!     ..SimConfig::default()
//! };
//! let source = MemorySource::new().with("earth", vec![Vec3::ZERO, Vec3::ONE, Vec3::UP]);
//! let mut orrery = Orrery::new(&config, &source).unwrap();
//!
//! let report = orrery.step(1000.0, [ControlEvent::SetSpeed(1.0)]);
//! assert_eq!(report.sample_index, 1);
//! ```

pub mod body;
pub mod camera;
pub mod config;
mod error;
pub mod input;
pub mod orrery;
pub mod render;
pub mod scene;
pub mod source;
pub mod state;

pub use body::Body;
pub use camera::{CameraView, OrbitCamera};
pub use config::{
    preset_bodies, BodyConfig, CameraConfig, DataConfig, PlaybackConfig, SimConfig, CONFIG_FILE,
};
pub use error::{Result, SimError};
pub use input::{ControlEvent, InputQueue, ParseEventError};
pub use orrery::{BodySnapshot, FrameReport, Orrery, SceneSnapshot};
pub use render::{DrawBody, OrbitLine, RecordingRenderer, RenderCommand, RenderError, Renderer};
pub use scene::{SolarScene, ROOT_NAME};
pub use source::{parse_trajectory, FileSource, MemorySource, PositionSource};
pub use state::SimulationState;
