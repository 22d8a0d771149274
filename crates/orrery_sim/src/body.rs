//! Celestial bodies and their per-frame update

use orrery_animation::PlaybackClock;
use orrery_core::{Color, Mat4, Vec3};
use orrery_scene::{NodeId, SceneGraph};
use tracing::warn;

/// A body in the scene
///
/// The orbit carrier is translated to the body's current sample; the spin
/// node below it carries the mesh and turns a little every frame.
#[derive(Clone, Debug)]
pub struct Body {
    pub(crate) name: String,
    pub(crate) orbit_node: NodeId,
    pub(crate) spin_node: NodeId,
    pub(crate) positions: Vec<Vec3>,
    pub(crate) spin_step: Mat4,
    pub(crate) orbit_color: Option<Color>,
}

impl Body {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node translated to the orbital position
    pub fn orbit_node(&self) -> NodeId {
        self.orbit_node
    }

    /// Node carrying the mesh and spin
    pub fn spin_node(&self) -> NodeId {
        self.spin_node
    }

    /// Position samples
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Orbit line color, if an orbit line is drawn
    pub fn orbit_color(&self) -> Option<Color> {
        self.orbit_color
    }

    /// Sample selected by the clock, `None` when there is no data
    pub fn position_at(&self, clock: &PlaybackClock) -> Option<Vec3> {
        clock
            .resolve_index(self.positions.len())
            .map(|index| self.positions[index])
    }

    /// Move the orbit carrier to the current sample
    ///
    /// Bodies without samples are skipped and keep their last transform.
    pub fn sync_position(&self, graph: &mut SceneGraph, clock: &PlaybackClock) -> Option<Vec3> {
        let position = self.position_at(clock)?;
        if let Err(err) = graph.set_local(self.orbit_node, Mat4::from_translation(position)) {
            warn!(body = %self.name, %err, "orbit carrier missing");
            return None;
        }
        Some(position)
    }

    /// Compose one spin step onto the spin node
    ///
    /// Runs every frame, paused or not.
    pub fn spin(&self, graph: &mut SceneGraph) {
        match graph.local_mut(self.spin_node) {
            Some(local) => *local = self.spin_step.mul(local),
            None => warn!(body = %self.name, "spin node missing"),
        }
    }
}
