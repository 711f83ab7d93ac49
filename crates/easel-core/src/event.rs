//! Document events and the field-mask patch type.
//!
//! Events are the only way the document changes. Hosts build them from
//! user actions or remote changes and commit them through
//! [`Document::apply`](crate::model::Document::apply) (lenient) or
//! [`Document::try_apply`](crate::model::Document::try_apply) (typed
//! rejections). The serde shapes below are the host-agnostic wire forms:
//! camelCase keys, the node's geometry flattened alongside its id.

use crate::id::NodeId;
use crate::model::{AutoLayout, ChildLayout, Geometry, Node};
use serde::{Deserialize, Serialize};

// ─── Field-mask patch ────────────────────────────────────────────────────

/// A partial update of node fields. Unset fields leave the node untouched.
///
/// This is the explicit, per-field-optional replacement for an untyped
/// "shallow merge" object: the set of mutable fields is closed and checked
/// at compile time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodePatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub name: Option<String>,
    pub auto_layout: Option<AutoLayout>,
    pub layout_child: Option<ChildLayout>,
}

impl NodePatch {
    /// A patch that sets nothing.
    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.rotation.is_none()
            && self.name.is_none()
            && self.auto_layout.is_none()
            && self.layout_child.is_none()
    }

    /// Patch carrying a full geometry — the usual wrapper around transform
    /// and layout output.
    pub fn from_geometry(geo: Geometry) -> Self {
        Self {
            x: Some(geo.x),
            y: Some(geo.y),
            width: Some(geo.width),
            height: Some(geo.height),
            rotation: Some(geo.rotation),
            ..Self::default()
        }
    }

    /// Merge the set fields onto `node`, leaving the rest untouched.
    pub fn apply_to(&self, node: &mut Node) {
        if let Some(x) = self.x {
            node.geometry.x = x;
        }
        if let Some(y) = self.y {
            node.geometry.y = y;
        }
        if let Some(width) = self.width {
            node.geometry.width = width;
        }
        if let Some(height) = self.height {
            node.geometry.height = height;
        }
        if let Some(rotation) = self.rotation {
            node.geometry.rotation = rotation;
        }
        if let Some(ref name) = self.name {
            node.name = Some(name.clone());
        }
        if let Some(auto_layout) = self.auto_layout {
            node.auto_layout = Some(auto_layout);
        }
        if let Some(layout_child) = self.layout_child {
            node.layout_child = layout_child;
        }
    }
}

// ─── Events ──────────────────────────────────────────────────────────────

/// The four document operations, in their host-agnostic wire shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DocEvent {
    /// Insert a new node, optionally at a position within the parent's
    /// children (append when absent or out of range).
    Create {
        node: Box<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },

    /// Patch fields on an existing node.
    Update { id: NodeId, updates: NodePatch },

    /// Remove a node together with its entire subtree.
    Delete { id: NodeId },

    /// Move a node under a new parent, or to the root list when
    /// `parent_id` is absent. The node is appended to its new sibling
    /// list.
    Reparent {
        id: NodeId,
        #[serde(default, rename = "parentId", skip_serializing_if = "Option::is_none")]
        parent_id: Option<NodeId>,
    },
}

impl DocEvent {
    /// Convenience constructor for the geometry-update hot path.
    pub fn update_geometry(id: NodeId, geo: Geometry) -> Self {
        Self::Update {
            id,
            updates: NodePatch::from_geometry(geo),
        }
    }
}
