//! Tool system for canvas interactions.
//!
//! Each tool translates user input events into document events that the
//! host commits via `Document::apply`. Tools read the document but never
//! mutate it — committing, undo tracking, and auto-layout reflow after a
//! commit all stay with the caller.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Select Tool          | Frame/Shape Tool  |
//! |----------|----------------------|-------------------|
//! | **Shift** | Axis-constrain drag / toggle selection | Square constraint |

use crate::hit::{grip_at, hit_test, hit_test_rect};
use crate::input::{InputEvent, Modifiers};
use easel_core::transform::{self, Handle, MIN_SIZE, ResizeMode};
use easel_core::{DocEvent, Document, Geometry, Node, NodeId, NodeKind, NodePatch, compute_layout};
use smallvec::SmallVec;

/// Pointer distance within which a resize grip catches the press.
const GRIP_TOLERANCE: f32 = 4.0;

/// Nominal box for freshly placed text nodes; the host's text measurement
/// replaces it after the first edit.
const TEXT_PLACEHOLDER: (f32, f32) = (96.0, 24.0);

/// The active tool determines how input events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Frame,
    Shape,
    Text,
}

/// Trait for tools that handle input and produce document events.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle an input event, returning zero or more events to commit.
    fn handle(&mut self, event: &InputEvent, doc: &Document) -> Vec<DocEvent>;
}

/// Recompute an auto-layout container's children and wrap the result as
/// Update events, in child order. Hosts call this after committing any
/// event that structurally changed the container or its geometry; the
/// returned events are committed like any other.
pub fn reflow(doc: &Document, container: NodeId) -> Vec<DocEvent> {
    let Some(node) = doc.get(container) else {
        return Vec::new();
    };
    let result = compute_layout(node, doc);
    node.children
        .iter()
        .filter_map(|id| result.children.get(id).map(|geo| DocEvent::update_geometry(*id, *geo)))
        .collect()
}

// ─── Select Tool ─────────────────────────────────────────────────────────

/// Drag state of the select tool between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy)]
enum Drag {
    /// Moving the current selection.
    Move { last: (f32, f32) },
    /// Dragging one resize grip of a single selected node.
    Resize {
        id: NodeId,
        handle: Handle,
        last: (f32, f32),
    },
}

pub struct SelectTool {
    /// Currently selected node(s).
    pub selected: SmallVec<[NodeId; 4]>,
    drag: Option<Drag>,
    /// Marquee (rubber-band) selection state.
    /// Set when pointer-down hits empty space. `(start_x, start_y)`.
    pub marquee_start: Option<(f32, f32)>,
    /// Current marquee rectangle (normalized: x, y, w, h). Updated during drag.
    pub marquee_rect: Option<(f32, f32, f32, f32)>,
}

impl Default for SelectTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectTool {
    pub fn new() -> Self {
        Self {
            selected: SmallVec::new(),
            drag: None,
            marquee_start: None,
            marquee_rect: None,
        }
    }

    /// Get the first selected node.
    pub fn first_selected(&self) -> Option<NodeId> {
        self.selected.first().copied()
    }

    /// Normalize a drag rectangle from start + current positions.
    fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
        let rx = x1.min(x2);
        let ry = y1.min(y2);
        let rw = (x2 - x1).abs();
        let rh = (y2 - y1).abs();
        (rx, ry, rw, rh)
    }

    fn on_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        modifiers: Modifiers,
        doc: &Document,
    ) -> Vec<DocEvent> {
        self.marquee_start = None;
        self.marquee_rect = None;

        // A single selected node exposes its grips first: pressing one
        // starts a resize rather than re-running selection.
        if self.selected.len() == 1
            && let Some(id) = self.first_selected()
            && let Some(node) = doc.get(id)
            && let Some(handle) = grip_at(node.geometry, x, y, GRIP_TOLERANCE)
        {
            self.drag = Some(Drag::Resize {
                id,
                handle,
                last: (x, y),
            });
            return vec![];
        }

        if let Some(hit_id) = hit_test(doc, x, y) {
            // Shift+click: toggle node in/out of selection
            if modifiers.shift {
                if let Some(pos) = self.selected.iter().position(|id| *id == hit_id) {
                    self.selected.remove(pos);
                } else {
                    self.selected.push(hit_id);
                }
            } else if !self.selected.contains(&hit_id) {
                // Click on unselected node: replace selection
                self.selected = SmallVec::from_slice(&[hit_id]);
            }
            // If clicking on already-selected node, keep selection (for drag)

            self.drag = Some(Drag::Move { last: (x, y) });
            vec![]
        } else {
            // Click on empty space: start marquee
            if !modifiers.shift {
                self.selected.clear();
            }
            self.drag = None;
            self.marquee_start = Some((x, y));
            self.marquee_rect = Some((x, y, 0.0, 0.0));
            vec![]
        }
    }

    fn on_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        modifiers: Modifiers,
        doc: &Document,
    ) -> Vec<DocEvent> {
        if let Some((sx, sy)) = self.marquee_start {
            self.marquee_rect = Some(Self::normalize_rect(sx, sy, x, y));
            // No document events — the host re-renders the marquee only.
            return vec![];
        }

        match self.drag {
            Some(Drag::Move { last }) => {
                let mut dx = x - last.0;
                let mut dy = y - last.1;
                self.drag = Some(Drag::Move { last: (x, y) });

                // Shift: constrain to dominant axis
                if modifiers.shift {
                    if dx.abs() > dy.abs() {
                        dy = 0.0;
                    } else {
                        dx = 0.0;
                    }
                }

                self.selected
                    .iter()
                    .filter_map(|id| {
                        let node = doc.get(*id)?;
                        let moved = transform::translate(node.geometry, dx, dy);
                        Some(DocEvent::update_geometry(*id, moved))
                    })
                    .collect()
            }
            Some(Drag::Resize { id, handle, last }) => {
                let dx = x - last.0;
                let dy = y - last.1;
                self.drag = Some(Drag::Resize {
                    id,
                    handle,
                    last: (x, y),
                });

                let Some(node) = doc.get(id) else {
                    return vec![];
                };
                let old = node.geometry;
                let new = transform::resize(old, handle, dx, dy, MIN_SIZE);
                let mut events = vec![DocEvent::update_geometry(id, new)];

                // Corner grips carry proportional-scale intent: the whole
                // subtree follows the container's bounds change.
                if handle.resize_mode() == ResizeMode::Scale {
                    for child in doc.descendants(id) {
                        if let Some(child_node) = doc.get(child) {
                            let scaled = transform::scale_from_bounds(
                                child_node.geometry,
                                old,
                                new,
                                MIN_SIZE,
                            );
                            events.push(DocEvent::update_geometry(child, scaled));
                        }
                    }
                }
                events
            }
            None => vec![],
        }
    }

    fn on_pointer_up(&mut self, doc: &Document) -> Vec<DocEvent> {
        if let Some((rx, ry, rw, rh)) = self.marquee_rect.take() {
            self.marquee_start = None;
            let hits = hit_test_rect(doc, rx, ry, rw, rh);
            for id in hits {
                if !self.selected.contains(&id) {
                    self.selected.push(id);
                }
            }
        }
        self.drag = None;
        vec![]
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, event: &InputEvent, doc: &Document) -> Vec<DocEvent> {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                self.on_pointer_down(*x, *y, *modifiers, doc)
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                self.on_pointer_move(*x, *y, *modifiers, doc)
            }
            InputEvent::PointerUp { .. } => self.on_pointer_up(doc),
            InputEvent::Key { key, .. } if key == "Delete" || key == "Backspace" => {
                let events = self
                    .selected
                    .drain(..)
                    .map(|id| DocEvent::Delete { id })
                    .collect();
                self.drag = None;
                events
            }
            InputEvent::Key { .. } => vec![],
        }
    }
}

// ─── Drawing tools (frame / shape) ───────────────────────────────────────

/// Shared drag-to-draw behavior: pointer-down creates the node, dragging
/// resizes it, shift constrains to a square.
struct DrawState {
    drawing: bool,
    start_x: f32,
    start_y: f32,
    current_id: Option<NodeId>,
}

impl DrawState {
    fn new() -> Self {
        Self {
            drawing: false,
            start_x: 0.0,
            start_y: 0.0,
            current_id: None,
        }
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        kind: NodeKind,
        id_prefix: &str,
        parent: Option<NodeId>,
    ) -> Vec<DocEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.drawing = true;
                self.start_x = *x;
                self.start_y = *y;
                let id = NodeId::with_prefix(id_prefix);
                self.current_id = Some(id);

                let mut node = Node::new(id, kind, Geometry::new(*x, *y, MIN_SIZE, MIN_SIZE));
                node.parent = parent;
                vec![DocEvent::Create {
                    node: Box::new(node),
                    index: None,
                }]
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                if self.drawing
                    && let Some(id) = self.current_id
                {
                    let mut w = (x - self.start_x).abs().max(MIN_SIZE);
                    let mut h = (y - self.start_y).abs().max(MIN_SIZE);

                    // Shift: constrain to square
                    if modifiers.shift {
                        let side = w.max(h);
                        w = side;
                        h = side;
                    }

                    return vec![DocEvent::Update {
                        id,
                        updates: NodePatch {
                            width: Some(w),
                            height: Some(h),
                            ..NodePatch::default()
                        },
                    }];
                }
                vec![]
            }
            InputEvent::PointerUp { .. } => {
                self.drawing = false;
                self.current_id = None;
                vec![]
            }
            InputEvent::Key { .. } => vec![],
        }
    }
}

pub struct FrameTool {
    state: DrawState,
    /// Container new frames are created under; `None` draws at the root.
    pub parent: Option<NodeId>,
}

impl Default for FrameTool {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTool {
    pub fn new() -> Self {
        Self {
            state: DrawState::new(),
            parent: None,
        }
    }
}

impl Tool for FrameTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Frame
    }

    fn handle(&mut self, event: &InputEvent, _doc: &Document) -> Vec<DocEvent> {
        self.state.handle(event, NodeKind::Frame, "frame", self.parent)
    }
}

pub struct ShapeTool {
    state: DrawState,
    pub parent: Option<NodeId>,
}

impl Default for ShapeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTool {
    pub fn new() -> Self {
        Self {
            state: DrawState::new(),
            parent: None,
        }
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Shape
    }

    fn handle(&mut self, event: &InputEvent, _doc: &Document) -> Vec<DocEvent> {
        self.state.handle(event, NodeKind::Shape, "shape", self.parent)
    }
}

// ─── Text Tool ───────────────────────────────────────────────────────────

pub struct TextTool {
    placed: bool,
    pub parent: Option<NodeId>,
}

impl Default for TextTool {
    fn default() -> Self {
        Self::new()
    }
}

impl TextTool {
    pub fn new() -> Self {
        Self {
            placed: false,
            parent: None,
        }
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn handle(&mut self, event: &InputEvent, _doc: &Document) -> Vec<DocEvent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                if self.placed {
                    return vec![];
                }
                self.placed = true;
                let id = NodeId::with_prefix("text");
                let (w, h) = TEXT_PLACEHOLDER;
                let mut node = Node::new(id, NodeKind::Text, Geometry::new(*x, *y, w, h));
                node.parent = self.parent;
                vec![DocEvent::Create {
                    node: Box::new(node),
                    index: None,
                }]
            }
            InputEvent::PointerUp { .. } => {
                self.placed = false;
                vec![]
            }
            _ => vec![],
        }
    }
}
