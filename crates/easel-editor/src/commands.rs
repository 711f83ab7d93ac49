//! Undo/Redo command stack.
//!
//! Every committed event is wrapped in a reversible `Command` that can be
//! undone. Commands are pushed to a stack; undo pops and applies the
//! inverse events.
//!
//! Drag gestures use **document-snapshot batching**: the full document is
//! captured at the start and end of the gesture, so undo/redo replaces the
//! whole document in a single step (no per-mutation inverse chain).

use easel_core::{DocEvent, Document, Node, NodeId, NodePatch};

/// A command that captures both a forward event and its inverse.
/// May hold a single event or a snapshot pair (from drag gestures).
#[derive(Debug, Clone)]
pub enum Command {
    /// Single event with its inverse (for non-batch operations).
    Single {
        forward: Box<DocEvent>,
        inverse: Vec<DocEvent>,
        description: String,
    },
    /// Snapshot-based batch: the document before and after a gesture.
    Snapshot {
        before: Document,
        after: Document,
        description: String,
    },
}

/// Manages undo/redo stacks with batch grouping for drag gestures.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Document snapshot captured at the start of a batch.
    batch_snapshot: Option<Document>,
    /// Whether any events were committed during the current batch.
    batch_dirty: bool,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Start a batch group. Captures the current document as a snapshot
    /// for undo. All events until `end_batch()` are applied live but
    /// tracked as one atomic undo step.
    pub fn begin_batch(&mut self, doc: &Document) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(doc.clone());
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes, if anything
    /// changed, push one snapshot command to the undo stack.
    pub fn end_batch(&mut self, doc: &Document) {
        if self.batch_depth == 0 {
            log::warn!("end_batch without a matching begin_batch");
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            let before = self.batch_snapshot.take();
            if self.batch_dirty
                && let Some(before) = before
                && before != *doc
            {
                self.undo_stack.push(Command::Snapshot {
                    before,
                    after: doc.clone(),
                    description: "canvas edit".to_string(),
                });
                if self.undo_stack.len() > self.max_depth {
                    self.undo_stack.remove(0);
                }
                self.redo_stack.clear();
            }
            self.batch_dirty = false;
        }
    }

    /// Commit an event to the document and push it to the undo stack.
    pub fn execute(&mut self, doc: &mut Document, event: DocEvent, description: &str) {
        if self.batch_depth > 0 {
            // Inside a batch: apply the event live but don't track it.
            // The snapshot at end_batch() captures the cumulative effect.
            doc.apply(event);
            self.batch_dirty = true;
            return;
        }

        let inverse = compute_inverse(doc, &event);
        doc.apply(event.clone());

        self.undo_stack.push(Command::Single {
            forward: Box::new(event),
            inverse,
            description: description.to_string(),
        });
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }

        // Clear redo stack on new action
        self.redo_stack.clear();
    }

    /// Undo the last command (or batch snapshot). Returns its description.
    pub fn undo(&mut self, doc: &mut Document) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        let desc = match &cmd {
            Command::Single {
                inverse,
                description,
                ..
            } => {
                for event in inverse {
                    doc.apply(event.clone());
                }
                description.clone()
            }
            Command::Snapshot {
                before,
                description,
                ..
            } => {
                *doc = before.clone();
                description.clone()
            }
        };
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the last undone command (or batch snapshot).
    pub fn redo(&mut self, doc: &mut Document) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        let desc = match &cmd {
            Command::Single {
                forward,
                description,
                ..
            } => {
                doc.apply((**forward).clone());
                description.clone()
            }
            Command::Snapshot {
                after, description, ..
            } => {
                *doc = after.clone();
                description.clone()
            }
        };
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

/// Compute the inverse events needed to undo `event` against the current
/// document state. An event that will not apply gets an empty inverse.
fn compute_inverse(doc: &Document, event: &DocEvent) -> Vec<DocEvent> {
    match event {
        DocEvent::Create { node, .. } => vec![DocEvent::Delete { id: node.id }],
        DocEvent::Update { id, updates } => match doc.get(*id) {
            Some(node) => vec![DocEvent::Update {
                id: *id,
                updates: capture_patch(node, updates),
            }],
            None => vec![],
        },
        DocEvent::Delete { id } => recreate_events(doc, *id),
        DocEvent::Reparent { id, .. } => {
            if doc.contains(*id) {
                vec![DocEvent::Reparent {
                    id: *id,
                    parent_id: doc.parent_of(*id),
                }]
            } else {
                vec![]
            }
        }
    }
}

/// Capture the current values of exactly the fields `updates` will touch.
///
/// A patch cannot clear optional fields, so an absent name comes back as
/// an empty string and absent auto-layout as a disabled configuration —
/// behaviorally equivalent, not bit-identical.
fn capture_patch(node: &Node, updates: &NodePatch) -> NodePatch {
    NodePatch {
        x: updates.x.map(|_| node.geometry.x),
        y: updates.y.map(|_| node.geometry.y),
        width: updates.width.map(|_| node.geometry.width),
        height: updates.height.map(|_| node.geometry.height),
        rotation: updates.rotation.map(|_| node.geometry.rotation),
        name: updates
            .name
            .as_ref()
            .map(|_| node.name.clone().unwrap_or_default()),
        auto_layout: updates
            .auto_layout
            .map(|_| node.auto_layout.unwrap_or_default()),
        layout_child: updates.layout_child.map(|_| node.layout_child),
    }
}

/// Create events that rebuild `id`'s subtree as it currently stands:
/// the node itself back into its sibling slot, then every descendant in
/// preorder so children lists regrow in their original order. Root
/// z-order is append-only on rebuild.
fn recreate_events(doc: &Document, id: NodeId) -> Vec<DocEvent> {
    let Some(node) = doc.get(id) else {
        return vec![];
    };
    let index = match node.parent {
        Some(pid) => doc.children_of(pid).iter().position(|c| *c == id),
        None => None,
    };
    let mut events = vec![DocEvent::Create {
        node: Box::new(node.clone()),
        index,
    }];
    for child in doc.descendants(id) {
        if let Some(n) = doc.get(child) {
            events.push(DocEvent::Create {
                node: Box::new(n.clone()),
                index: None,
            });
        }
    }
    events
}
