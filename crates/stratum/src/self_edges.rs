//! Self-loops.
//!
//! A self-loop cannot be ranked or ordered, so it is parked on its node at the start of the
//! pipeline. Once nodes are ordered, a placeholder the size of the loop's label is inserted
//! right after the node, and after positioning the loop is drawn around that placeholder.

use crate::error::{Error, Result};
use crate::util::add_dummy_node;
use crate::{Dummy, LayoutGraph, NodeLabel, Point, SelfEdge};

/// Removes every self-loop and stores it on its node.
pub fn remove(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if e.v != e.w {
            continue;
        }
        let Some(label) = g.take_edge(&e) else {
            continue;
        };
        if let Some(node) = g.node_mut(&e.v) {
            node.self_edges.push(SelfEdge { edge: e, label });
        }
    }
}

/// Inserts one placeholder per stored self-loop directly after its node, shifting the rest of
/// the layer to the right.
pub fn insert(g: &mut LayoutGraph) {
    for layer in crate::util::build_layer_matrix(g) {
        let mut order_shift = 0usize;
        for (i, v) in layer.iter().enumerate() {
            let Some(node) = g.node_mut(v) else {
                continue;
            };
            node.order = Some(i + order_shift);
            let rank = node.rank;
            let self_edges = std::mem::take(&mut node.self_edges);

            for SelfEdge { edge, label } in self_edges {
                order_shift += 1;
                let placeholder = NodeLabel {
                    width: label.width,
                    height: label.height,
                    rank,
                    order: Some(i + order_shift),
                    ..Default::default()
                };
                add_dummy_node(
                    g,
                    Dummy::SelfEdge {
                        edge,
                        label: Box::new(label),
                    },
                    placeholder,
                    "_se",
                );
            }
        }
    }
}

/// Restores every self-loop as a five-point curve that leaves the node's right side and loops
/// through its placeholder.
pub fn position(g: &mut LayoutGraph) -> Result<()> {
    let placeholders: Vec<String> = g
        .node_labels()
        .filter(|(_, n)| matches!(n.dummy, Some(Dummy::SelfEdge { .. })))
        .map(|(v, _)| v.to_string())
        .collect();

    for v in placeholders {
        let Some(NodeLabel {
            x: dummy_x,
            y: dummy_y,
            dummy: Some(Dummy::SelfEdge { edge, label }),
            ..
        }) = g.node(&v).cloned()
        else {
            continue;
        };
        let missing = |node: &str| Error::MissingPosition {
            node: node.to_string(),
        };
        let owner = g.node(&edge.v).ok_or_else(|| Error::MissingNode {
            node: edge.v.clone(),
        })?;
        let (Some(owner_x), Some(y)) = (owner.x, owner.y) else {
            return Err(missing(&edge.v));
        };
        let dummy_x = dummy_x.ok_or_else(|| missing(&v))?;

        let x = owner_x + owner.width / 2.0;
        let dx = dummy_x - x;
        let dy = owner.height / 2.0;

        let mut label = *label;
        label.points = vec![
            Point { x: x + 2.0 * dx / 3.0, y: y - dy },
            Point { x: x + 5.0 * dx / 6.0, y: y - dy },
            Point { x: x + dx, y },
            Point { x: x + 5.0 * dx / 6.0, y: y + dy },
            Point { x: x + 2.0 * dx / 3.0, y: y + dy },
        ];
        label.x = Some(dummy_x);
        label.y = dummy_y;

        g.remove_node(&v);
        g.set_edge_key(&edge, label);
    }
    Ok(())
}
