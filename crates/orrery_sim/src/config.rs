//! Simulation configuration (`orrery.toml`)
//!
//! Every section and field is optional. A missing `[[bodies]]` list falls
//! back to the built-in solar system preset.

use crate::scene::{ORBIT_SUFFIX, ROOT_NAME};
use crate::{Result, SimError};
use orrery_animation::{NegativeSpeed, DEFAULT_TIME_SCALE};
use orrery_core::{Color, Vec3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default config file name
pub const CONFIG_FILE: &str = "orrery.toml";

/// Top-level configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SimConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default = "preset_bodies")]
    pub bodies: Vec<BodyConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            camera: CameraConfig::default(),
            data: DataConfig::default(),
            bodies: preset_bodies(),
        }
    }
}

/// Clock settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Samples per wall-clock millisecond at speed 1
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Initial speed factor
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Negative speed handling
    #[serde(default)]
    pub negative_speed: NegativeSpeed,
    /// Start in the paused state
    #[serde(default)]
    pub start_paused: bool,
}

fn default_time_scale() -> f64 {
    DEFAULT_TIME_SCALE
}

fn default_speed() -> f64 {
    1.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            speed: default_speed(),
            negative_speed: NegativeSpeed::default(),
            start_paused: false,
        }
    }
}

/// Orbit camera settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CameraConfig {
    /// Distance from the target
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Radians per dragged pixel
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Vertical field of view
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Body followed by the camera
    #[serde(default)]
    pub track: Option<String>,
}

fn default_radius() -> f32 {
    200.0
}

fn default_sensitivity() -> f32 {
    0.005
}

fn default_fov() -> f32 {
    60.0
}

fn default_near() -> f32 {
    1.0
}

fn default_far() -> f32 {
    2000.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            sensitivity: default_sensitivity(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            track: None,
        }
    }
}

/// Trajectory data location
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DataConfig {
    /// Directory holding trajectory files, relative to the config file
    #[serde(default = "default_data_dir")]
    pub dir: String,
    /// Multiplier applied to every coordinate (AU to scene units)
    #[serde(default = "default_data_scale")]
    pub scale: f64,
}

fn default_data_dir() -> String {
    "Dados".to_string()
}

fn default_data_scale() -> f64 {
    149.6
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            scale: default_data_scale(),
        }
    }
}

/// One celestial body
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BodyConfig {
    pub name: String,
    /// Uniform scale of the body mesh
    #[serde(default = "default_body_scale")]
    pub scale: f32,
    /// Spin applied every frame, in radians
    #[serde(default = "default_spin")]
    pub spin: f32,
    /// Spin axis
    #[serde(default = "default_spin_axis")]
    pub spin_axis: [f32; 3],
    /// Orbit line color; no line is drawn without one
    #[serde(default)]
    pub orbit_color: Option<Color>,
    /// Texture path
    #[serde(default)]
    pub texture: Option<String>,
    /// Trajectory file name inside the data directory
    #[serde(default)]
    pub trajectory: Option<String>,
    /// Body whose orbit carrier this body's carrier hangs under
    #[serde(default)]
    pub parent: Option<String>,
}

fn default_body_scale() -> f32 {
    1.0
}

fn default_spin() -> f32 {
    0.05
}

fn default_spin_axis() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

impl BodyConfig {
    /// Body with default scale and spin and no data
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: default_body_scale(),
            spin: default_spin(),
            spin_axis: default_spin_axis(),
            orbit_color: None,
            texture: None,
            trajectory: None,
            parent: None,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_orbit_color(mut self, color: Color) -> Self {
        self.orbit_color = Some(color);
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn with_trajectory(mut self, file: impl Into<String>) -> Self {
        self.trajectory = Some(file.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Spin axis as a vector
    pub fn axis(&self) -> Vec3 {
        Vec3::new(self.spin_axis[0], self.spin_axis[1], self.spin_axis[2])
    }
}

/// Sun, planets, Pluto, the Moon and Voyager 1
pub fn preset_bodies() -> Vec<BodyConfig> {
    let planet = |name: &str, file: &str, scale: f32, color: [f32; 4]| {
        BodyConfig::new(name)
            .with_scale(scale)
            .with_texture(format!("Texturas/{}.jpg", name))
            .with_trajectory(file)
            .with_orbit_color(Color::from(color))
    };

    vec![
        BodyConfig::new("sun")
            .with_scale(2.0)
            .with_spin(0.005)
            .with_texture("Texturas/sun.jpg"),
        planet("earth", "Earth.txt", 0.25, [0.6, 0.3, 0.1, 1.0]),
        planet("moon", "Moon.txt", 0.05, [0.7, 0.5, 0.3, 1.0]).with_spin(-0.01),
        planet("venus", "Venus.txt", 0.22, [0.6, 0.1, 0.3, 1.0]),
        planet("mercury", "Mercury.txt", 0.13, [0.3, 0.1, 0.4, 1.0]),
        planet("mars", "Mars.txt", 0.17, [0.2, 0.5, 0.2, 1.0]),
        planet("jupiter", "Jupiter.txt", 0.9, [0.6, 0.1, 0.5, 1.0]),
        planet("saturn", "Saturn.txt", 0.6, [0.5, 0.7, 0.2, 1.0]),
        planet("uranus", "Uranus.txt", 0.35, [0.3, 0.6, 0.6, 1.0]),
        planet("neptune", "Neptune.txt", 0.3, [0.7, 0.7, 0.2, 1.0]),
        planet("pluto", "Pluto.txt", 0.2, [0.1, 0.5, 0.1, 1.0]),
        planet("voyager1", "Voyager-1.txt", 0.3, [0.7, 0.2, 0.3, 1.0]),
    ]
}

impl SimConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), bodies = config.bodies.len(), "loaded config");
        Ok(config)
    }

    /// Load `orrery.toml` from a directory, or the defaults if it has none
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            debug!(dir = %dir.display(), "no {} found, using defaults", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configs the simulation cannot be built from
    pub fn validate(&self) -> Result<()> {
        let p = &self.playback;
        if !p.time_scale.is_finite() || p.time_scale < 0.0 {
            return Err(SimError::Config(format!(
                "playback.time_scale must be a non-negative number, got {}",
                p.time_scale
            )));
        }
        if !p.speed.is_finite() {
            return Err(SimError::Config("playback.speed must be finite".into()));
        }

        let c = &self.camera;
        if !(c.radius > 0.0) {
            return Err(SimError::Config(format!(
                "camera.radius must be positive, got {}",
                c.radius
            )));
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(SimError::Config(format!(
                "camera.fov_degrees must be within (0, 180), got {}",
                c.fov_degrees
            )));
        }
        if !(c.near > 0.0 && c.far > c.near) {
            return Err(SimError::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                c.near, c.far
            )));
        }

        if !self.data.scale.is_finite() {
            return Err(SimError::Config("data.scale must be finite".into()));
        }

        let mut seen = FxHashSet::default();
        for body in &self.bodies {
            if body.name.is_empty() {
                return Err(SimError::Config("body names must not be empty".into()));
            }
            if !body.scale.is_finite() || !body.spin.is_finite() {
                return Err(SimError::Config(format!(
                    "body '{}' has a non-finite scale or spin",
                    body.name
                )));
            }
            if let Some(parent) = &body.parent {
                // Parents must come first so carriers can be built in order
                if !seen.contains(parent.as_str()) {
                    return Err(SimError::UnknownParent {
                        body: body.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            if !seen.insert(body.name.as_str()) {
                return Err(SimError::DuplicateBody(body.name.clone()));
            }
        }

        // Generated node names must stay unique in the scene graph
        for body in &self.bodies {
            let generated = body
                .name
                .strip_suffix(ORBIT_SUFFIX)
                .is_some_and(|owner| seen.contains(owner));
            if body.name == ROOT_NAME || generated {
                return Err(SimError::Config(format!(
                    "body name '{}' collides with a generated node name",
                    body.name
                )));
            }
        }

        if let Some(track) = &c.track {
            if !seen.contains(track.as_str()) {
                return Err(SimError::Config(format!(
                    "camera.track names unknown body '{}'",
                    track
                )));
            }
        }

        Ok(())
    }

    /// Find a body by name
    pub fn body(&self, name: &str) -> Option<&BodyConfig> {
        self.bodies.iter().find(|b| b.name == name)
    }
}
