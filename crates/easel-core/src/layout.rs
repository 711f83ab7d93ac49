//! Auto-layout: flex-style arrangement of a container's children.
//!
//! [`compute_layout`] is pure — it reads the document and returns the
//! geometry every child would take, without mutating anything. Hosts run
//! it speculatively during drags for live preview and commit the result
//! afterwards as Update events. Containers without auto-layout pass
//! through untouched: the result carries no child geometry.

use crate::id::NodeId;
use crate::model::{Align, Direction, Document, Geometry, Justify, Node, Sizing};
use std::collections::HashMap;

/// Output of a layout pass over one container.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    /// The container geometry the pass was computed against.
    pub container: Geometry,
    /// Computed geometry per child id, in absolute canvas coordinates.
    pub children: HashMap<NodeId, Geometry>,
}

/// Arrange `container`'s children along its auto-layout axis.
///
/// Children are measured with their current geometry from `doc`; fill
/// children split the remaining main-axis space by their grow weight.
/// Ids in the container's child list that do not resolve are skipped.
pub fn compute_layout(container: &Node, doc: &Document) -> LayoutResult {
    let mut result = LayoutResult {
        container: container.geometry,
        children: HashMap::new(),
    };
    let Some(layout) = container.auto_layout.filter(|l| l.enabled) else {
        return result;
    };
    let children: Vec<&Node> = container
        .children
        .iter()
        .filter_map(|id| doc.get(*id))
        .collect();
    if children.is_empty() {
        return result;
    }

    let n = children.len();
    let geo = container.geometry;
    let (main_size, cross_size) = match layout.direction {
        Direction::Row => (geo.width, geo.height),
        Direction::Column => (geo.height, geo.width),
    };
    let pad = layout.padding;
    let gap = layout.gap;
    let inner_main = (main_size - 2.0 * pad - gap * (n - 1) as f32).max(0.0);
    let inner_cross = (cross_size - 2.0 * pad).max(0.0);

    // Pass 1: partition into fixed and fill children along the main axis.
    let mut fixed_total = 0.0;
    let mut total_grow = 0.0;
    for child in &children {
        match child.layout_child.sizing {
            Sizing::Fixed => fixed_total += main_of(child.geometry, layout.direction),
            Sizing::Fill => total_grow += child.layout_child.grow,
        }
    }
    // Never negative: overflowing fixed children sit flush rather than
    // pulling fill children to negative sizes.
    let remaining = (inner_main - fixed_total).max(0.0);

    // Main-axis cursor. For space-between the configured gap is replaced
    // by an even split of the remaining space; a single child keeps the
    // configured gap (no division by zero).
    let (main_start, cross_start) = match layout.direction {
        Direction::Row => (geo.x, geo.y),
        Direction::Column => (geo.y, geo.x),
    };
    let mut cursor = main_start + pad;
    let mut step_gap = gap;
    match layout.justify {
        Justify::Start => {}
        Justify::Center => cursor += remaining / 2.0,
        Justify::End => cursor += remaining,
        Justify::SpaceBetween => {
            if n > 1 {
                step_gap = remaining / (n - 1) as f32;
            }
        }
    }

    // Pass 2: size and place each child in order.
    for child in &children {
        let hints = child.layout_child;

        let child_main = match hints.sizing {
            Sizing::Fill if total_grow > 0.0 => remaining * (hints.grow / total_grow),
            _ => main_of(child.geometry, layout.direction),
        };

        let align = hints.align_self.unwrap_or(layout.align);
        let own_cross = cross_of(child.geometry, layout.direction);
        let (child_cross, cross_offset) = match align {
            Align::Stretch => {
                let mut stretched = inner_cross;
                if let Some(min) = hints.min_size {
                    stretched = stretched.max(min);
                }
                if let Some(max) = hints.max_size {
                    stretched = stretched.min(max);
                }
                (stretched, 0.0)
            }
            Align::Start => (own_cross, 0.0),
            Align::Center => (own_cross, (inner_cross - own_cross) / 2.0),
            Align::End => (own_cross, inner_cross - own_cross),
        };
        let cross_pos = cross_start + pad + cross_offset;

        let placed = match layout.direction {
            Direction::Row => Geometry {
                x: cursor,
                y: cross_pos,
                width: child_main,
                height: child_cross,
                rotation: child.geometry.rotation,
            },
            Direction::Column => Geometry {
                x: cross_pos,
                y: cursor,
                width: child_cross,
                height: child_main,
                rotation: child.geometry.rotation,
            },
        };
        result.children.insert(child.id, placed);
        cursor += child_main + step_gap;
    }

    result
}

fn main_of(geo: Geometry, direction: Direction) -> f32 {
    match direction {
        Direction::Row => geo.width,
        Direction::Column => geo.height,
    }
}

fn cross_of(geo: Geometry, direction: Direction) -> f32 {
    match direction {
        Direction::Row => geo.height,
        Direction::Column => geo.width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DocEvent;
    use crate::model::{AutoLayout, ChildLayout, NodeKind};

    fn frame(name: &str, geo: Geometry, layout: AutoLayout) -> Node {
        let mut node = Node::new(NodeId::intern(name), NodeKind::Frame, geo);
        node.auto_layout = Some(layout);
        node
    }

    fn add_child(doc: &mut Document, name: &str, parent: &str, geo: Geometry) -> NodeId {
        let id = NodeId::intern(name);
        let mut node = Node::new(id, NodeKind::Shape, geo);
        node.parent = Some(NodeId::intern(parent));
        doc.apply(DocEvent::Create {
            node: Box::new(node),
            index: None,
        });
        id
    }

    fn row(gap: f32, padding: f32, justify: Justify, align: Align) -> AutoLayout {
        AutoLayout {
            enabled: true,
            direction: Direction::Row,
            gap,
            padding,
            justify,
            align,
        }
    }

    #[test]
    fn disabled_layout_is_a_pass_through() {
        let mut doc = Document::new();
        let container = Node::new(
            NodeId::intern("l_off"),
            NodeKind::Frame,
            Geometry::new(0.0, 0.0, 200.0, 200.0),
        );
        doc.apply(DocEvent::Create {
            node: Box::new(container.clone()),
            index: None,
        });
        add_child(&mut doc, "l_off_c", "l_off", Geometry::new(5.0, 5.0, 10.0, 10.0));

        let result = compute_layout(doc.get(NodeId::intern("l_off")).unwrap(), &doc);
        assert!(result.children.is_empty());
    }

    #[test]
    fn no_children_yields_empty_result() {
        let mut doc = Document::new();
        let container = frame(
            "l_empty",
            Geometry::new(0.0, 0.0, 100.0, 100.0),
            row(0.0, 0.0, Justify::Start, Align::Start),
        );
        doc.apply(DocEvent::Create {
            node: Box::new(container),
            index: None,
        });
        let result = compute_layout(doc.get(NodeId::intern("l_empty")).unwrap(), &doc);
        assert!(result.children.is_empty());
    }

    #[test]
    fn fill_children_split_remaining_space_evenly() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_fill",
                Geometry::new(0.0, 0.0, 300.0, 100.0),
                row(0.0, 0.0, Justify::Start, Align::Start),
            )),
            index: None,
        });
        for name in ["l_fill_a", "l_fill_b"] {
            let id = add_child(&mut doc, name, "l_fill", Geometry::new(0.0, 0.0, 10.0, 40.0));
            doc.get_mut(id).unwrap().layout_child = ChildLayout {
                sizing: Sizing::Fill,
                grow: 1.0,
                ..ChildLayout::default()
            };
        }

        let result = compute_layout(doc.get(NodeId::intern("l_fill")).unwrap(), &doc);
        let a = result.children[&NodeId::intern("l_fill_a")];
        let b = result.children[&NodeId::intern("l_fill_b")];
        assert_eq!(a.width, 150.0);
        assert_eq!(b.width, 150.0);
        assert_eq!(a.x, 0.0);
        assert_eq!(b.x, 150.0);
    }

    #[test]
    fn grow_weights_bias_the_split() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_grow",
                Geometry::new(0.0, 0.0, 300.0, 100.0),
                row(0.0, 0.0, Justify::Start, Align::Start),
            )),
            index: None,
        });
        let a = add_child(&mut doc, "l_grow_a", "l_grow", Geometry::new(0.0, 0.0, 10.0, 40.0));
        let b = add_child(&mut doc, "l_grow_b", "l_grow", Geometry::new(0.0, 0.0, 10.0, 40.0));
        doc.get_mut(a).unwrap().layout_child = ChildLayout {
            sizing: Sizing::Fill,
            grow: 2.0,
            ..ChildLayout::default()
        };
        doc.get_mut(b).unwrap().layout_child = ChildLayout {
            sizing: Sizing::Fill,
            grow: 1.0,
            ..ChildLayout::default()
        };

        let result = compute_layout(doc.get(NodeId::intern("l_grow")).unwrap(), &doc);
        assert_eq!(result.children[&a].width, 200.0);
        assert_eq!(result.children[&b].width, 100.0);
    }

    #[test]
    fn zero_total_grow_skips_distribution() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_zg",
                Geometry::new(0.0, 0.0, 300.0, 100.0),
                row(0.0, 0.0, Justify::Start, Align::Start),
            )),
            index: None,
        });
        let a = add_child(&mut doc, "l_zg_a", "l_zg", Geometry::new(0.0, 0.0, 40.0, 40.0));
        doc.get_mut(a).unwrap().layout_child = ChildLayout {
            sizing: Sizing::Fill,
            grow: 0.0,
            ..ChildLayout::default()
        };

        let result = compute_layout(doc.get(NodeId::intern("l_zg")).unwrap(), &doc);
        assert_eq!(
            result.children[&a].width, 40.0,
            "with no grow weight the child keeps its own size"
        );
    }

    #[test]
    fn space_between_spreads_children_to_the_edges() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_sb",
                Geometry::new(0.0, 0.0, 400.0, 100.0),
                row(0.0, 0.0, Justify::SpaceBetween, Align::Start),
            )),
            index: None,
        });
        for name in ["l_sb_a", "l_sb_b", "l_sb_c"] {
            add_child(&mut doc, name, "l_sb", Geometry::new(0.0, 0.0, 50.0, 40.0));
        }

        let result = compute_layout(doc.get(NodeId::intern("l_sb")).unwrap(), &doc);
        let a = result.children[&NodeId::intern("l_sb_a")];
        let b = result.children[&NodeId::intern("l_sb_b")];
        let c = result.children[&NodeId::intern("l_sb_c")];

        assert_eq!(a.x, 0.0);
        assert_eq!(c.x + c.width, 400.0, "last child's right edge is flush");
        let gap_ab = b.x - (a.x + a.width);
        let gap_bc = c.x - (b.x + b.width);
        assert_eq!(gap_ab, 125.0);
        assert_eq!(gap_bc, 125.0);
    }

    #[test]
    fn space_between_single_child_keeps_configured_gap() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_sb1",
                Geometry::new(0.0, 0.0, 400.0, 100.0),
                row(10.0, 0.0, Justify::SpaceBetween, Align::Start),
            )),
            index: None,
        });
        add_child(&mut doc, "l_sb1_a", "l_sb1", Geometry::new(0.0, 0.0, 50.0, 40.0));

        let result = compute_layout(doc.get(NodeId::intern("l_sb1")).unwrap(), &doc);
        assert_eq!(result.children[&NodeId::intern("l_sb1_a")].x, 0.0);
    }

    #[test]
    fn center_and_end_shift_the_cursor() {
        for (justify, expected_x) in [(Justify::Center, 150.0), (Justify::End, 300.0)] {
            let mut doc = Document::new();
            doc.apply(DocEvent::Create {
                node: Box::new(frame(
                    "l_just",
                    Geometry::new(0.0, 0.0, 400.0, 100.0),
                    row(0.0, 0.0, justify, Align::Start),
                )),
                index: None,
            });
            add_child(&mut doc, "l_just_a", "l_just", Geometry::new(0.0, 0.0, 100.0, 40.0));

            let result = compute_layout(doc.get(NodeId::intern("l_just")).unwrap(), &doc);
            assert_eq!(
                result.children[&NodeId::intern("l_just_a")].x,
                expected_x,
                "{justify:?}"
            );
        }
    }

    #[test]
    fn stretch_clamps_to_child_bounds() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_st",
                Geometry::new(0.0, 0.0, 300.0, 200.0),
                row(0.0, 10.0, Justify::Start, Align::Stretch),
            )),
            index: None,
        });
        let a = add_child(&mut doc, "l_st_a", "l_st", Geometry::new(0.0, 0.0, 50.0, 40.0));
        let b = add_child(&mut doc, "l_st_b", "l_st", Geometry::new(0.0, 0.0, 50.0, 40.0));
        doc.get_mut(b).unwrap().layout_child.max_size = Some(100.0);

        let result = compute_layout(doc.get(NodeId::intern("l_st")).unwrap(), &doc);
        assert_eq!(result.children[&a].height, 180.0, "stretched to inner cross");
        assert_eq!(result.children[&b].height, 100.0, "capped by maxSize");
    }

    #[test]
    fn align_self_overrides_container_alignment() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_as",
                Geometry::new(0.0, 0.0, 300.0, 200.0),
                row(0.0, 0.0, Justify::Start, Align::Start),
            )),
            index: None,
        });
        let a = add_child(&mut doc, "l_as_a", "l_as", Geometry::new(0.0, 0.0, 50.0, 40.0));
        let b = add_child(&mut doc, "l_as_b", "l_as", Geometry::new(0.0, 0.0, 50.0, 40.0));
        doc.get_mut(b).unwrap().layout_child.align_self = Some(Align::End);

        let result = compute_layout(doc.get(NodeId::intern("l_as")).unwrap(), &doc);
        assert_eq!(result.children[&a].y, 0.0);
        assert_eq!(result.children[&b].y, 160.0, "end-aligned on the cross axis");
    }

    #[test]
    fn column_direction_swaps_axes() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_col",
                Geometry::new(0.0, 0.0, 200.0, 300.0),
                AutoLayout {
                    enabled: true,
                    direction: Direction::Column,
                    gap: 10.0,
                    padding: 20.0,
                    justify: Justify::Start,
                    align: Align::Start,
                },
            )),
            index: None,
        });
        add_child(&mut doc, "l_col_a", "l_col", Geometry::new(0.0, 0.0, 50.0, 40.0));
        add_child(&mut doc, "l_col_b", "l_col", Geometry::new(0.0, 0.0, 50.0, 30.0));

        let result = compute_layout(doc.get(NodeId::intern("l_col")).unwrap(), &doc);
        let a = result.children[&NodeId::intern("l_col_a")];
        let b = result.children[&NodeId::intern("l_col_b")];
        assert_eq!(a.y, 20.0);
        assert_eq!(b.y, 70.0, "first height + gap below");
        assert_eq!(a.x, 20.0);
        assert_eq!(b.x, 20.0);
    }

    #[test]
    fn container_offset_shifts_children() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_off2",
                Geometry::new(100.0, 50.0, 300.0, 100.0),
                row(0.0, 10.0, Justify::Start, Align::Start),
            )),
            index: None,
        });
        add_child(&mut doc, "l_off2_a", "l_off2", Geometry::new(0.0, 0.0, 40.0, 40.0));

        let result = compute_layout(doc.get(NodeId::intern("l_off2")).unwrap(), &doc);
        let a = result.children[&NodeId::intern("l_off2_a")];
        assert_eq!(a.x, 110.0, "container origin + padding");
        assert_eq!(a.y, 60.0);
    }

    #[test]
    fn negative_remaining_space_clamps_to_zero() {
        let mut doc = Document::new();
        doc.apply(DocEvent::Create {
            node: Box::new(frame(
                "l_neg",
                Geometry::new(0.0, 0.0, 60.0, 100.0),
                row(0.0, 0.0, Justify::End, Align::Start),
            )),
            index: None,
        });
        add_child(&mut doc, "l_neg_a", "l_neg", Geometry::new(0.0, 0.0, 100.0, 40.0));

        let result = compute_layout(doc.get(NodeId::intern("l_neg")).unwrap(), &doc);
        assert_eq!(
            result.children[&NodeId::intern("l_neg_a")].x,
            0.0,
            "end justify with overflow does not shift backwards"
        );
    }
}
