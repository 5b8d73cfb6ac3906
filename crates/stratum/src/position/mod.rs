//! Coordinate assignment.
//!
//! `y` follows from the rank: each rank is as tall as its tallest node and ranks are
//! `ranksep` apart. `x` comes from the Brandes-Köpf heuristic in [`bk`]. Subgraph nodes are
//! left alone; their extent is derived from their border nodes later on.

pub mod bk;

use crate::error::{Error, Result};
use crate::util::{as_non_compound_graph, build_layer_matrix};
use crate::LayoutGraph;

pub fn position(g: &mut LayoutGraph) -> Result<()> {
    for (v, node) in g.node_labels() {
        if node.rank.is_none() && !g.has_children(v) {
            return Err(Error::MissingRank { node: v.to_string() });
        }
    }

    let mut flat = as_non_compound_graph(g);
    position_y(&mut flat);
    let xs = bk::position_x(&flat);

    for (v, node) in flat.node_labels() {
        if let Some(label) = g.node_mut(v) {
            label.y = node.y;
            if let Some(&x) = xs.get(v) {
                label.x = Some(x);
            }
        }
    }
    Ok(())
}

/// Places every rank below the previous one, centering nodes vertically within their rank.
pub fn position_y(g: &mut LayoutGraph) {
    let ranksep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in build_layer_matrix(g) {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v).map(|n| n.height))
            .fold(0.0f64, f64::max);
        for v in &layer {
            if let Some(node) = g.node_mut(v) {
                node.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + ranksep;
    }
}
