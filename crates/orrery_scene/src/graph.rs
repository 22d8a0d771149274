//! Arena-backed transform hierarchy

use crate::{Node, NodeId, Renderable, Result, SceneError};
use orrery_core::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

/// Owns every node and keeps parent/child links bidirectionally consistent
///
/// A node appears in `parent.children` exactly when its `parent` points to
/// that parent, and roots are exactly the nodes without a parent.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    /// Parentless nodes in attach order
    roots: Vec<NodeId>,
    /// Name index for lookups
    names: FxHashMap<String, NodeId>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            names: FxHashMap::default(),
        }
    }

    // === Node Lifecycle ===

    /// Insert a node as a new root
    pub fn spawn(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        node.world = node.local;

        let name = node.name.clone();
        let id = self.nodes.insert(node);
        if let Some(name) = name {
            if let Some(previous) = self.names.insert(name, id) {
                warn!(?previous, node = ?id, "node name reused, lookup now finds the newer node");
            }
        }
        self.roots.push(id);
        id
    }

    /// Insert a node as the last child of `parent`
    pub fn spawn_under(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.spawn(node);
        self.attach(id, Some(parent))?;
        Ok(id)
    }

    /// Remove a node together with its whole subtree
    pub fn despawn(&mut self, node: NodeId) -> Result<usize> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::NodeNotFound(node));
        }
        self.unlink(node);

        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(id) {
                if let Some(name) = &n.name {
                    if self.names.get(name) == Some(&id) {
                        self.names.remove(name);
                    }
                }
                stack.extend(n.children);
                removed += 1;
            }
        }

        debug!(?node, removed, "despawned subtree");
        Ok(removed)
    }

    // === Hierarchy Edits ===

    /// Move `child` under `parent`, or make it a root when `parent` is `None`
    ///
    /// The child is first removed from its previous parent, then appended to
    /// the end of the new parent's children. Attaching a node under itself or
    /// one of its descendants fails with [`SceneError::InvalidHierarchy`] and
    /// leaves the graph untouched.
    pub fn attach(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::NodeNotFound(parent));
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(SceneError::InvalidHierarchy { child, parent });
            }
        }

        self.unlink(child);
        match parent {
            Some(parent) => {
                self.nodes[parent].children.push(child);
                self.nodes[child].parent = Some(parent);
            }
            None => self.roots.push(child),
        }

        trace!(?child, ?parent, "attached");
        Ok(())
    }

    /// Make `child` a root. Detaching a root is a no-op.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        self.attach(child, None)
    }

    /// Remove `child` from its parent's children, or from the root list
    fn unlink(&mut self, child: NodeId) {
        match self.nodes[child].parent.take() {
            Some(old) => {
                if let Some(parent) = self.nodes.get_mut(old) {
                    parent.children.retain(|c| *c != child);
                }
            }
            None => self.roots.retain(|r| *r != child),
        }
    }

    /// Check whether `ancestor` is `node` or lies on its parent chain
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    // === Transform Propagation ===

    /// Recompute world transforms for `node` and its subtree
    ///
    /// `node.world` becomes `ancestor × node.local` (or `node.local` without
    /// an ancestor), and every descendant receives its parent's fresh world
    /// transform. Children are visited in insertion order. Returns the
    /// number of nodes updated.
    pub fn propagate(&mut self, node: NodeId, ancestor: Option<&Mat4>) -> Result<usize> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::NodeNotFound(node));
        }
        Ok(self.propagate_from(node, ancestor.copied()))
    }

    /// Propagate every root, each starting from `base`
    pub fn propagate_all(&mut self, base: Option<&Mat4>) -> usize {
        let mut updated = 0;
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            updated += self.propagate_from(root, base.copied());
        }
        updated
    }

    fn propagate_from(&mut self, node: NodeId, ancestor: Option<Mat4>) -> usize {
        let mut updated = 0;
        let mut stack: Vec<(NodeId, Option<Mat4>)> = vec![(node, ancestor)];

        while let Some((id, ancestor)) = stack.pop() {
            let Some(n) = self.nodes.get_mut(id) else {
                continue;
            };
            n.world = match ancestor {
                Some(ancestor) => ancestor.mul(&n.local),
                None => n.local,
            };
            let world = n.world;
            // Reversed so the first child is popped first
            stack.extend(n.children.iter().rev().map(|c| (*c, Some(world))));
            updated += 1;
        }

        trace!(?node, updated, "propagated world transforms");
        updated
    }

    // === Accessors ===

    /// Get a node
    pub fn get(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node)
    }

    /// Get a node mutably (links stay graph-owned)
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node)
    }

    /// Check if a handle is live
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Local transform of a node
    pub fn local(&self, node: NodeId) -> Option<Mat4> {
        self.nodes.get(node).map(|n| n.local)
    }

    /// Mutable local transform of a node
    pub fn local_mut(&mut self, node: NodeId) -> Option<&mut Mat4> {
        self.nodes.get_mut(node).map(|n| &mut n.local)
    }

    /// Replace the local transform of a node
    pub fn set_local(&mut self, node: NodeId, local: Mat4) -> Result<()> {
        let n = self
            .nodes
            .get_mut(node)
            .ok_or(SceneError::NodeNotFound(node))?;
        n.local = local;
        Ok(())
    }

    /// World transform as of the last propagation
    pub fn world(&self, node: NodeId) -> Option<Mat4> {
        self.nodes.get(node).map(|n| n.world)
    }

    /// World-space origin of a node
    pub fn world_position(&self, node: NodeId) -> Option<Vec3> {
        self.nodes.get(node).map(|n| n.world.translation_part())
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// Children of a node in insertion order (empty for unknown handles)
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(|n| n.children()).unwrap_or(&[])
    }

    /// Parentless nodes
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Find a node by name
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Iterate over all nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter()
    }

    /// Nodes carrying a render payload, with their world transforms
    pub fn renderables(&self) -> impl Iterator<Item = (NodeId, &Renderable, &Mat4)> + '_ {
        self.nodes
            .iter()
            .filter_map(|(id, n)| n.renderable.as_ref().map(|r| (id, r, &n.world)))
    }

    /// Node count
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Verify that parent and child links agree everywhere
    pub fn is_consistent(&self) -> bool {
        let links_agree = self.nodes.iter().all(|(id, n)| {
            let listed_once = match n.parent {
                Some(p) => self
                    .nodes
                    .get(p)
                    .map(|p| p.children.iter().filter(|c| **c == id).count() == 1)
                    .unwrap_or(false),
                None => self.roots.iter().filter(|r| **r == id).count() == 1,
            };
            let children_point_back = n
                .children
                .iter()
                .all(|c| self.nodes.get(*c).and_then(|c| c.parent) == Some(id));
            listed_once && children_point_back
        });
        links_agree && self.roots.iter().all(|r| self.parent(*r).is_none() && self.contains(*r))
    }
}
