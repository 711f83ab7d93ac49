//! The event dispatcher: applies document events while keeping the
//! parent/child bookkeeping consistent.
//!
//! Two entry points:
//!
//! - [`Document::try_apply`] reports every rejected event as a typed
//!   [`ApplyError`], for hosts that want to observe failures.
//! - [`Document::apply`] is the lenient wrapper: an invalid event is a
//!   no-op, never a panic, and the reason is reported through the `log`
//!   facade.
//!
//! Events apply fully or not at all; there is no partial application
//! within a single event.

use crate::event::{DocEvent, NodePatch};
use crate::id::NodeId;
use crate::model::{Document, Node};
use std::fmt;

// ─── Rejection reasons ───────────────────────────────────────────────────

/// Why an event was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyError {
    /// Create with an id that is already present.
    DuplicateId(NodeId),
    /// The event referenced an id that does not resolve.
    NotFound(NodeId),
    /// Update carried a patch with no fields set.
    EmptyPatch(NodeId),
    /// Reparent would make a node an ancestor of itself.
    WouldCreateCycle(NodeId),
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "node {id} already exists"),
            Self::NotFound(id) => write!(f, "node {id} not found"),
            Self::EmptyPatch(id) => write!(f, "empty patch for node {id}"),
            Self::WouldCreateCycle(id) => {
                write!(f, "reparenting {id} would create a cycle")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

// ─── Dispatcher ──────────────────────────────────────────────────────────

impl Document {
    /// Apply an event leniently: invalid events are silently dropped and
    /// the reason is logged. This is the behavioral contract hosts rely
    /// on for liveness — a malformed remote event must never take the
    /// editor down.
    pub fn apply(&mut self, event: DocEvent) {
        if let Err(reason) = self.try_apply(event) {
            log::debug!("event ignored: {reason}");
        }
    }

    /// Apply an event, reporting rejections as typed values.
    pub fn try_apply(&mut self, event: DocEvent) -> Result<(), ApplyError> {
        match event {
            DocEvent::Create { node, index } => self.create(*node, index),
            DocEvent::Update { id, updates } => self.update(id, &updates),
            DocEvent::Delete { id } => self.delete(id),
            DocEvent::Reparent { id, parent_id } => self.reparent(id, parent_id),
        }
    }

    fn create(&mut self, mut node: Node, index: Option<usize>) -> Result<(), ApplyError> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(ApplyError::DuplicateId(id));
        }

        // Normalize: a freshly created node owns no children yet.
        node.children.clear();

        if let Some(pid) = node.parent {
            if let Some(parent) = self.nodes.get_mut(&pid) {
                let at = index
                    .filter(|&i| i <= parent.children.len())
                    .unwrap_or(parent.children.len());
                parent.children.insert(at, id);
            } else {
                // Dangling parent reference: the node becomes a root.
                // Kept for parity with hosts that replay creates out of
                // order; the warning makes the fallback observable.
                log::warn!("create {id}: parent {pid} does not resolve, node becomes a root");
                node.parent = None;
                self.roots.push(id);
            }
        } else {
            self.roots.push(id);
        }

        self.nodes.insert(id, node);
        Ok(())
    }

    fn update(&mut self, id: NodeId, patch: &NodePatch) -> Result<(), ApplyError> {
        let node = self.nodes.get_mut(&id).ok_or(ApplyError::NotFound(id))?;
        if patch.is_empty() {
            return Err(ApplyError::EmptyPatch(id));
        }
        patch.apply_to(node);
        Ok(())
    }

    fn delete(&mut self, id: NodeId) -> Result<(), ApplyError> {
        if !self.nodes.contains_key(&id) {
            return Err(ApplyError::NotFound(id));
        }
        self.detach(id);

        // Remove the whole subtree. Removal order within it is
        // unobservable, so a simple stack walk suffices.
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
            }
        }
        Ok(())
    }

    fn reparent(&mut self, id: NodeId, parent_id: Option<NodeId>) -> Result<(), ApplyError> {
        if !self.nodes.contains_key(&id) {
            return Err(ApplyError::NotFound(id));
        }
        if let Some(pid) = parent_id {
            if !self.nodes.contains_key(&pid) {
                return Err(ApplyError::NotFound(pid));
            }
            // A node must not end up inside its own subtree.
            if pid == id || self.is_ancestor_of(id, pid) {
                return Err(ApplyError::WouldCreateCycle(id));
            }
        }

        self.detach(id);
        match parent_id {
            Some(pid) => {
                if let Some(parent) = self.nodes.get_mut(&pid) {
                    parent.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent_id;
        }
        Ok(())
    }

    /// Unlink `id` from its parent's children or from the root list.
    fn detach(&mut self, id: NodeId) {
        match self.parent_of(id) {
            Some(pid) => {
                if let Some(parent) = self.nodes.get_mut(&pid) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }
}
