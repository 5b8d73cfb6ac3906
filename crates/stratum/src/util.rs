//! Small helpers shared by the layout stages.

use crate::error::{Error, Result};
use crate::graphlib::{Graph, GraphOptions};
use crate::{BorderType, Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point};
use rustc_hash::FxHashMap;
use std::time::Instant;

/// Inserts a dummy node under a fresh `prefix<n>` id and returns the id.
pub fn add_dummy_node(g: &mut LayoutGraph, dummy: Dummy, mut label: NodeLabel, prefix: &str) -> String {
    label.dummy = Some(dummy);
    let id = unique_id(g, prefix);
    g.set_node(id.clone(), label);
    id
}

/// Returns `prefix<n>` for the next value of the graph's id counter that names no node yet.
pub fn unique_id(g: &mut LayoutGraph, prefix: &str) -> String {
    loop {
        let label = g.graph_mut();
        label.next_dummy_id += 1;
        let id = format!("{prefix}{}", label.next_dummy_id);
        if !g.has_node(&id) {
            return id;
        }
    }
}

/// Adds a zero-sized border node. `position` places it at a given rank and order.
pub fn add_border_node(
    g: &mut LayoutGraph,
    side: BorderType,
    prefix: &str,
    position: Option<(i32, usize)>,
) -> String {
    let mut label = NodeLabel::default();
    if let Some((rank, order)) = position {
        label.rank = Some(rank);
        label.order = Some(order);
    }
    add_dummy_node(g, Dummy::Border(side), label, prefix)
}

/// Collapses multi-edges into one edge per node pair.
///
/// Weights are summed and `minlen` is the largest of the merged edges (at least 1).
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        simplified.set_node(v, label.clone());
    }
    for (e, label) in g.edge_labels() {
        let merged = match simplified.edge(&e.v, &e.w, None) {
            Some(prev) => EdgeLabel {
                weight: prev.weight + label.weight,
                minlen: prev.minlen.max(label.minlen),
                ..Default::default()
            },
            None => EdgeLabel {
                weight: label.weight,
                minlen: label.minlen.max(1),
                ..Default::default()
            },
        };
        simplified.set_edge_with_label(e.v.clone(), e.w.clone(), merged);
    }
    simplified
}

/// Copy of `g` without subgraph nodes or hierarchy.
pub fn as_non_compound_graph(g: &LayoutGraph) -> LayoutGraph {
    let mut out: LayoutGraph = Graph::new(GraphOptions {
        multigraph: g.is_multigraph(),
        ..Default::default()
    });
    out.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        if !g.has_children(v) {
            out.set_node(v, label.clone());
        }
    }
    for (e, label) in g.edge_labels() {
        out.set_edge_key(e, label.clone());
    }
    out
}

/// Summed edge weight from every node to each of its successors.
pub fn successor_weights(g: &LayoutGraph) -> FxHashMap<String, FxHashMap<String, f64>> {
    g.nodes()
        .map(|v| {
            let mut sucs: FxHashMap<String, f64> = FxHashMap::default();
            for e in g.out_edges(v, None) {
                let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
                *sucs.entry(e.w).or_insert(0.0) += weight;
            }
            (v.to_string(), sucs)
        })
        .collect()
}

/// Summed edge weight from each predecessor of every node.
pub fn predecessor_weights(g: &LayoutGraph) -> FxHashMap<String, FxHashMap<String, f64>> {
    g.nodes()
        .map(|v| {
            let mut preds: FxHashMap<String, f64> = FxHashMap::default();
            for e in g.in_edges(v, None) {
                let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
                *preds.entry(e.v).or_insert(0.0) += weight;
            }
            (v.to_string(), preds)
        })
        .collect()
}

/// An axis-aligned rectangle given by its center and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Rectangle of a positioned node.
    pub fn of_node(id: &str, node: &NodeLabel) -> Result<Self> {
        let center = node.center().ok_or_else(|| Error::MissingPosition {
            node: id.to_string(),
        })?;
        Ok(Self {
            x: center.x,
            y: center.y,
            width: node.width,
            height: node.height,
        })
    }
}

/// Point where the segment from `point` to the center of `rect` crosses the rectangle border.
pub fn intersect_rect(rect: Rect, point: Point) -> Result<Point> {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    if dx == 0.0 && dy == 0.0 {
        return Err(Error::PointInsideRect {
            x: point.x,
            y: point.y,
        });
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        // Top or bottom side.
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        // Left or right side.
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Ok(Point {
        x: rect.x + sx,
        y: rect.y + sy,
    })
}

/// Node ids per rank, each rank sorted by `order`. Nodes without a rank are skipped.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let Some(max) = max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<(usize, &str)>> = vec![Vec::new(); (max.max(-1) + 1) as usize];
    for (v, node) in g.node_labels() {
        let Some(rank) = node.rank.and_then(|r| usize::try_from(r).ok()) else {
            continue;
        };
        layers[rank].push((node.order.unwrap_or(usize::MAX), v));
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, v)| v.to_string()).collect()
        })
        .collect()
}

/// Shifts ranks so the smallest is 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let Some(min) = g.node_labels().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    for (_, node) in g.node_labels_mut() {
        if let Some(rank) = node.rank.as_mut() {
            *rank -= min;
        }
    }
}

/// Removes empty ranks, keeping those that are a multiple of the nesting rank factor.
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let Some(offset) = g.node_labels().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    let mut layers: Vec<Vec<String>> = Vec::new();
    for (v, node) in g.node_labels() {
        let Some(rank) = node.rank else {
            continue;
        };
        let ix = (rank - offset) as usize;
        if layers.len() <= ix {
            layers.resize_with(ix + 1, Vec::new);
        }
        layers[ix].push(v.to_string());
    }

    let factor = g.graph().node_rank_factor;
    let mut delta = 0;
    for (i, vs) in layers.iter().enumerate() {
        let keep = factor.is_some_and(|f| f != 0 && i as i32 % f == 0);
        if vs.is_empty() && !keep {
            delta -= 1;
        } else if delta != 0 {
            for v in vs {
                if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
                    *rank += delta;
                }
            }
        }
    }
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    g.node_labels().filter_map(|(_, n)| n.rank).max()
}

/// Runs `f` inside a `debug` span named after the stage and logs its duration.
pub fn time<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let _span = tracing::debug_span!("stage", name).entered();
    let start = Instant::now();
    let out = f();
    tracing::debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "{name} finished"
    );
    out
}
