//! # Orrery Scene
//!
//! Transform hierarchy for the orrery.
//!
//! Nodes live in a [`SceneGraph`] arena and are addressed by [`NodeId`]
//! handles. Every node owns a local transform; world transforms are derived
//! by [`SceneGraph::propagate`], which walks a subtree once and composes
//! `ancestor × local` on the way down.
//!
//! ```rust
//! use orrery_core::{Mat4, Vec3};
//! use orrery_scene::{Node, SceneGraph};
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.spawn(Node::new().with_name("solar_system"));
//! let carrier = graph
//!     .spawn_under(root, Node::new().with_local(Mat4::translation(10.0, 0.0, 0.0)))
//!     .unwrap();
//! let body = graph
//!     .spawn_under(carrier, Node::new().with_local(Mat4::uniform_scale(0.25)))
//!     .unwrap();
//!
//! graph.propagate(root, None).unwrap();
//! assert_eq!(graph.world_position(body), Some(Vec3::new(10.0, 0.0, 0.0)));
//! ```

mod error;
mod graph;
mod node;

pub use error::{Result, SceneError};
pub use graph::SceneGraph;
pub use node::{Material, MeshHandle, Node, NodeId, Renderable};
