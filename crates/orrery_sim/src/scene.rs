//! Solar system scene assembly
//!
//! Each configured body becomes two nodes: an orbit carrier named
//! `{name}_orbit` parented to the root (or to its parent body's carrier),
//! and a spin node named after the body holding the scale and mesh.
//!
//! ```text
//! solar_system
//! ├── sun_orbit
//! │   └── sun
//! ├── earth_orbit
//! │   ├── earth
//! │   └── moon_orbit      (when moon.parent = "earth")
//! │       └── moon
//! └── ...
//! ```

use crate::body::Body;
use crate::config::{BodyConfig, SimConfig};
use crate::source::PositionSource;
use crate::{Result, SimError};
use indexmap::IndexMap;
use orrery_animation::PlaybackClock;
use orrery_core::{Color, Mat4, Vec3};
use orrery_scene::{Material, MeshHandle, Node, NodeId, Renderable, SceneGraph};
use tracing::{debug, trace, warn};

/// Name of the scene root
pub const ROOT_NAME: &str = "solar_system";

/// Suffix of generated orbit carrier names
pub const ORBIT_SUFFIX: &str = "_orbit";

/// The scene graph plus the bodies living in it
#[derive(Debug)]
pub struct SolarScene {
    graph: SceneGraph,
    root: NodeId,
    bodies: IndexMap<String, Body>,
}

impl SolarScene {
    /// Build the hierarchy for `config`, loading samples from `source`
    ///
    /// A body whose samples fail to load is kept with an empty sequence.
    pub fn build<S: PositionSource + ?Sized>(config: &SimConfig, source: &S) -> Result<Self> {
        let mut graph = SceneGraph::new();
        let root = graph.spawn(Node::new().with_name(ROOT_NAME));
        let mut bodies = IndexMap::with_capacity(config.bodies.len());

        for body_config in &config.bodies {
            if bodies.contains_key(&body_config.name) {
                return Err(SimError::DuplicateBody(body_config.name.clone()));
            }
            let parent = match &body_config.parent {
                Some(parent) => bodies
                    .get(parent)
                    .map(|b: &Body| b.orbit_node)
                    .ok_or_else(|| SimError::UnknownParent {
                        body: body_config.name.clone(),
                        parent: parent.clone(),
                    })?,
                None => root,
            };

            let positions = source.load(body_config).unwrap_or_else(|err| {
                warn!(body = %body_config.name, %err, "trajectory unavailable, body will stay put");
                Vec::new()
            });
            let body = spawn_body(&mut graph, parent, body_config, positions)?;
            bodies.insert(body_config.name.clone(), body);
        }

        debug!(bodies = bodies.len(), nodes = graph.len(), "built solar scene");
        Ok(Self {
            graph,
            root,
            bodies,
        })
    }

    /// Length of the longest sequence
    pub fn max_time(&self) -> usize {
        self.bodies
            .values()
            .map(|b| b.positions.len())
            .max()
            .unwrap_or(0)
    }

    /// Move carriers to the clock's sample and spin every body
    ///
    /// Returns how many bodies had data for this frame.
    pub fn update_bodies(&mut self, clock: &PlaybackClock) -> usize {
        let mut updated = 0;
        for body in self.bodies.values() {
            if body.sync_position(&mut self.graph, clock).is_some() {
                updated += 1;
            } else {
                trace!(body = %body.name, "no samples, position unchanged");
            }
            body.spin(&mut self.graph);
        }
        updated
    }

    /// Recompute every world transform from the root
    pub fn propagate(&mut self) -> usize {
        self.graph.propagate_all(None)
    }

    /// World position of a body's carrier, if the body has samples
    pub fn tracked_position(&self, name: &str) -> Option<Vec3> {
        let body = self.bodies.get(name)?;
        if body.positions.is_empty() {
            return None;
        }
        self.graph.world_position(body.orbit_node)
    }

    /// World transform of the space a body's samples are expressed in
    pub fn orbit_space(&self, body: &Body) -> Mat4 {
        self.graph
            .parent(body.orbit_node)
            .and_then(|p| self.graph.world(p))
            .unwrap_or(Mat4::IDENTITY)
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains_key(name)
    }

    /// Bodies in configuration order
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.values()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

fn spawn_body(
    graph: &mut SceneGraph,
    parent: NodeId,
    config: &BodyConfig,
    positions: Vec<Vec3>,
) -> Result<Body> {
    let orbit_name = format!("{}{}", config.name, ORBIT_SUFFIX);
    let orbit_node = graph.spawn_under(parent, Node::new().with_name(orbit_name))?;

    let material = match &config.texture {
        Some(texture) => Material::textured(texture.clone()),
        None => Material::flat(config.orbit_color.unwrap_or(Color::WHITE)),
    };
    let spin_node = graph.spawn_under(
        orbit_node,
        Node::new()
            .with_name(config.name.clone())
            .with_local(Mat4::uniform_scale(config.scale))
            .with_renderable(Renderable::new(MeshHandle::SPHERE, material)),
    )?;

    trace!(body = %config.name, samples = positions.len(), "spawned body");
    Ok(Body {
        name: config.name.clone(),
        orbit_node,
        spin_node,
        positions,
        spin_step: Mat4::rotation_axis(config.axis(), config.spin),
        orbit_color: config.orbit_color,
    })
}
