//! Scene nodes and their render payload

use orrery_core::{Color, Mat4};
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`](crate::SceneGraph)
    pub struct NodeId;
}

/// Opaque mesh handle resolved by the renderer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

impl MeshHandle {
    /// The shared unit sphere every body is drawn with
    pub const SPHERE: MeshHandle = MeshHandle(1);
}

/// Per-body material parameters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    /// Texture path, if the body is textured
    pub texture: Option<String>,
    /// Flat color used when there is no texture
    pub color: Color,
}

impl Material {
    /// Textured material
    pub fn textured(path: impl Into<String>) -> Self {
        Self {
            texture: Some(path.into()),
            color: Color::WHITE,
        }
    }

    /// Untextured material
    pub fn flat(color: Color) -> Self {
        Self {
            texture: None,
            color,
        }
    }
}

/// Payload consumed by the renderer, ignored by the hierarchy
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Renderable {
    pub mesh: MeshHandle,
    pub material: Material,
}

impl Renderable {
    pub fn new(mesh: MeshHandle, material: Material) -> Self {
        Self { mesh, material }
    }
}

/// A transform hierarchy element
///
/// `local` is authored by the owner. `world`, `parent` and `children` are
/// maintained by the graph and are read-only from outside.
#[derive(Clone, Debug, Default)]
pub struct Node {
    /// Optional name for lookups and diagnostics
    pub name: Option<String>,
    /// Transform relative to the parent
    pub local: Mat4,
    /// Render payload
    pub renderable: Option<Renderable>,
    pub(crate) world: Mat4,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
}

impl Node {
    /// Create a node with identity transforms
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the node name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the local transform
    pub fn with_local(mut self, local: Mat4) -> Self {
        self.local = local;
        self
    }

    /// Attach a render payload
    pub fn with_renderable(mut self, renderable: Renderable) -> Self {
        self.renderable = Some(renderable);
        self
    }

    /// World transform as of the last propagation
    pub fn world(&self) -> &Mat4 {
        &self.world
    }

    /// Parent handle, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check if this is a root node
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
