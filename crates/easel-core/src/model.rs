//! Core document model for Easel scenes.
//!
//! The document is a flat arena of nodes keyed by [`NodeId`], plus an
//! explicit list of root ids. Hierarchy lives in the `parent` / `children`
//! id fields on each node — relationship pointers, not ownership. The
//! arena is the sole owner of node lifetime: a node exists between a
//! Create and a Delete event (see `tree`), never merely because some
//! children list mentions its id.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Geometry ────────────────────────────────────────────────────────────

/// Position, size, and rotation of a node, in absolute canvas units.
///
/// Serialized flattened into the node's wire shape, so hosts see
/// `{ "id": ..., "x": ..., "y": ..., "width": ..., "height": ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
}

impl Geometry {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this geometry intersects with a rectangle (AABB overlap).
    pub fn intersects_rect(&self, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
        self.x < rx + rw
            && self.x + self.width > rx
            && self.y < ry + rh
            && self.y + self.height > ry
    }
}

// ─── Node kinds ──────────────────────────────────────────────────────────

/// The type tag of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Container with explicit size; the only kind that commonly enables
    /// auto-layout, though the engine does not restrict it.
    Frame,
    /// Plain vector shape (rectangle, ellipse, polygon — the engine does
    /// not distinguish; paint data is the host's concern).
    Shape,
    /// Text block.
    Text,
    /// Bitmap placement.
    Image,
    /// Logical grouping of siblings.
    Group,
    /// Placed instance of a reusable component.
    #[serde(rename = "component-instance")]
    Instance,
}

// ─── Auto-layout configuration ───────────────────────────────────────────

/// Main-axis direction of an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Row,
    Column,
}

/// Main-axis distribution of children within an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Cross-axis placement of children within an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

/// Auto-layout configuration carried by a container node.
///
/// When `enabled`, the layout solver arranges the container's children
/// along `direction`; otherwise children keep their free-form geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoLayout {
    pub enabled: bool,
    pub direction: Direction,
    /// Space between consecutive children along the main axis.
    pub gap: f32,
    /// Uniform inset from all four container edges.
    pub padding: f32,
    pub justify: Justify,
    pub align: Align,
}

// ─── Per-child layout hints ──────────────────────────────────────────────

/// Main-axis sizing mode for a child of an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sizing {
    /// The child keeps its own main-axis size.
    #[default]
    Fixed,
    /// The child's main-axis size is derived from remaining space.
    Fill,
}

/// Layout hints a child contributes to its auto-layout parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChildLayout {
    #[serde(rename = "sizeAlongMain")]
    pub sizing: Sizing,
    /// Share of remaining main-axis space relative to sibling fill
    /// children.
    #[serde(rename = "flexGrow")]
    pub grow: f32,
    /// Overrides the container's cross-axis alignment for this child.
    pub align_self: Option<Align>,
    /// Lower bound applied when the cross axis is stretched.
    pub min_size: Option<f32>,
    /// Upper bound applied when the cross axis is stretched.
    pub max_size: Option<f32>,
}

impl Default for ChildLayout {
    fn default() -> Self {
        Self {
            sizing: Sizing::Fixed,
            grow: 1.0,
            align_self: None,
            min_size: None,
            max_size: None,
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A single node in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Opaque stable identifier, supplied by the caller at creation.
    pub id: NodeId,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Display name shown in the host's layer panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub geometry: Geometry,

    /// The containing node, absent for roots.
    #[serde(default, rename = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    /// Ordered child ids. Order is document z-order: later ids paint on top.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub children: SmallVec<[NodeId; 4]>,

    /// Auto-layout configuration; absent means free-form children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_layout: Option<AutoLayout>,

    /// Hints this node contributes when its parent runs auto-layout.
    #[serde(default)]
    pub layout_child: ChildLayout,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, geometry: Geometry) -> Self {
        Self {
            id,
            kind,
            name: None,
            geometry,
            parent: None,
            children: SmallVec::new(),
            auto_layout: None,
            layout_child: ChildLayout::default(),
        }
    }

    /// Whether this node arranges its children via auto-layout.
    pub fn layout_enabled(&self) -> bool {
        self.auto_layout.is_some_and(|l| l.enabled)
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// The full document: every node keyed by id, plus the list of root ids.
///
/// Two bookkeeping invariants hold after every applied event:
/// a node is in `roots` exactly when its `parent` is absent, and for
/// every node with parent P, `P.children` contains the node's id and
/// vice versa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: HashMap<NodeId, Node>,
    pub roots: Vec<NodeId>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Ordered child ids of a node; empty if the id does not resolve.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Check if `ancestor_id` is a parent/grandparent/etc. of `descendant_id`.
    pub fn is_ancestor_of(&self, ancestor_id: NodeId, descendant_id: NodeId) -> bool {
        if ancestor_id == descendant_id {
            return false;
        }
        let mut current = self.parent_of(descendant_id);
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// All ids below `id`, preorder, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children_of(id).iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.children_of(cur).iter().rev().copied());
        }
        out
    }

    /// Audit the parent/child bookkeeping. Returns one message per
    /// violation; an empty result means the document is consistent.
    pub fn consistency_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (&id, node) in &self.nodes {
            match node.parent {
                Some(pid) => {
                    if self.roots.contains(&id) {
                        errors.push(format!("{id} has a parent but is listed as a root"));
                    }
                    match self.nodes.get(&pid) {
                        Some(parent) if parent.children.contains(&id) => {}
                        Some(_) => {
                            errors.push(format!("{id} points at parent {pid}, which does not list it"))
                        }
                        None => errors.push(format!("{id} points at missing parent {pid}")),
                    }
                }
                None => {
                    if !self.roots.contains(&id) {
                        errors.push(format!("{id} has no parent but is not listed as a root"));
                    }
                }
            }

            for &child in &node.children {
                match self.nodes.get(&child) {
                    Some(c) if c.parent == Some(id) => {}
                    Some(_) => errors.push(format!(
                        "{id} lists child {child}, which points at a different parent"
                    )),
                    None => errors.push(format!("{id} lists missing child {child}")),
                }
            }
        }

        for &root in &self.roots {
            if !self.nodes.contains_key(&root) {
                errors.push(format!("root list mentions missing node {root}"));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;

    fn doc_with_chain() -> Document {
        // a ─ b ─ c, plus a detached sibling root d
        let mut doc = Document::new();
        let (a, b, c, d) = (
            NodeId::intern("chain_a"),
            NodeId::intern("chain_b"),
            NodeId::intern("chain_c"),
            NodeId::intern("chain_d"),
        );
        let mut na = Node::new(a, NodeKind::Frame, Geometry::new(0.0, 0.0, 100.0, 100.0));
        let mut nb = Node::new(b, NodeKind::Group, Geometry::new(0.0, 0.0, 50.0, 50.0));
        let mut nc = Node::new(c, NodeKind::Shape, Geometry::new(0.0, 0.0, 10.0, 10.0));
        let nd = Node::new(d, NodeKind::Shape, Geometry::new(0.0, 0.0, 10.0, 10.0));
        na.children.push(b);
        nb.parent = Some(a);
        nb.children.push(c);
        nc.parent = Some(b);
        doc.nodes.insert(a, na);
        doc.nodes.insert(b, nb);
        doc.nodes.insert(c, nc);
        doc.nodes.insert(d, nd);
        doc.roots = vec![a, d];
        doc
    }

    #[test]
    fn ancestry_walks_the_parent_chain() {
        let doc = doc_with_chain();
        let (a, b, c, d) = (
            NodeId::intern("chain_a"),
            NodeId::intern("chain_b"),
            NodeId::intern("chain_c"),
            NodeId::intern("chain_d"),
        );
        assert!(doc.is_ancestor_of(a, c));
        assert!(doc.is_ancestor_of(b, c));
        assert!(!doc.is_ancestor_of(c, a));
        assert!(!doc.is_ancestor_of(a, a), "a node is not its own ancestor");
        assert!(!doc.is_ancestor_of(d, c), "sibling roots are unrelated");
    }

    #[test]
    fn descendants_covers_the_subtree() {
        let doc = doc_with_chain();
        let a = NodeId::intern("chain_a");
        let below = doc.descendants(a);
        assert_eq!(below, vec![NodeId::intern("chain_b"), NodeId::intern("chain_c")]);
    }

    #[test]
    fn consistent_document_audits_clean() {
        let doc = doc_with_chain();
        assert_eq!(doc.consistency_errors(), Vec::<String>::new());
    }

    #[test]
    fn audit_flags_one_sided_links() {
        let mut doc = doc_with_chain();
        // Break the b → c link on the parent side only.
        let b = NodeId::intern("chain_b");
        doc.nodes.get_mut(&b).unwrap().children.clear();
        assert!(!doc.consistency_errors().is_empty());
    }

    #[test]
    fn geometry_containment_and_overlap() {
        let g = Geometry::new(10.0, 10.0, 100.0, 50.0);
        assert!(g.contains(10.0, 10.0));
        assert!(g.contains(110.0, 60.0));
        assert!(!g.contains(9.0, 10.0));
        assert!(g.intersects_rect(0.0, 0.0, 20.0, 20.0));
        assert!(!g.intersects_rect(200.0, 200.0, 5.0, 5.0));
        assert_eq!(g.center(), (60.0, 35.0));
    }
}
