//! Hit testing: point → node lookup.
//!
//! Walks the document front-to-back (later siblings paint on top, children
//! above their parents) to find which node sits under a canvas position.
//! Also resolves resize-grip hits around a selected node's bounds.

use easel_core::transform::Handle;
use easel_core::{Document, Geometry, NodeId};

/// Find the topmost node at position (px, py).
/// Returns `None` if no node is hit (background).
pub fn hit_test(doc: &Document, px: f32, py: f32) -> Option<NodeId> {
    for &root in doc.roots.iter().rev() {
        if let Some(hit) = hit_test_node(doc, root, px, py) {
            return Some(hit);
        }
    }
    None
}

fn hit_test_node(doc: &Document, id: NodeId, px: f32, py: f32) -> Option<NodeId> {
    // Check children in reverse (topmost first).
    for &child in doc.children_of(id).iter().rev() {
        if let Some(hit) = hit_test_node(doc, child, px, py) {
            return Some(hit);
        }
    }

    let node = doc.get(id)?;
    if node.geometry.contains(px, py) {
        return Some(id);
    }
    None
}

/// Find all nodes whose geometry intersects the given rectangle.
/// Used for marquee (box) selection.
pub fn hit_test_rect(doc: &Document, rx: f32, ry: f32, rw: f32, rh: f32) -> Vec<NodeId> {
    let mut result = Vec::new();
    for &root in &doc.roots {
        collect_intersecting(doc, root, rx, ry, rw, rh, &mut result);
    }
    result
}

fn collect_intersecting(
    doc: &Document,
    id: NodeId,
    rx: f32,
    ry: f32,
    rw: f32,
    rh: f32,
    out: &mut Vec<NodeId>,
) {
    if let Some(node) = doc.get(id) {
        if node.geometry.intersects_rect(rx, ry, rw, rh) {
            out.push(id);
        }
        for &child in doc.children_of(id) {
            collect_intersecting(doc, child, rx, ry, rw, rh, out);
        }
    }
}

/// Resolve which resize grip, if any, sits under the pointer for a node's
/// bounds. Grips are squares of `2 * tolerance` centered on the four
/// corners and edge midpoints; corners win over edges where they overlap.
pub fn grip_at(geo: Geometry, px: f32, py: f32, tolerance: f32) -> Option<Handle> {
    let near = |a: f32, b: f32| (a - b).abs() <= tolerance;
    let (left, right) = (geo.x, geo.x + geo.width);
    let (top, bottom) = (geo.y, geo.y + geo.height);
    let (mid_x, mid_y) = geo.center();

    if near(px, left) && near(py, top) {
        return Some(Handle::TopLeft);
    }
    if near(px, right) && near(py, top) {
        return Some(Handle::TopRight);
    }
    if near(px, left) && near(py, bottom) {
        return Some(Handle::BottomLeft);
    }
    if near(px, right) && near(py, bottom) {
        return Some(Handle::BottomRight);
    }
    if near(px, mid_x) && near(py, top) {
        return Some(Handle::Top);
    }
    if near(px, mid_x) && near(py, bottom) {
        return Some(Handle::Bottom);
    }
    if near(px, left) && near(py, mid_y) {
        return Some(Handle::Left);
    }
    if near(px, right) && near(py, mid_y) {
        return Some(Handle::Right);
    }
    None
}
