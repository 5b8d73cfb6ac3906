//! Crossing minimization.
//!
//! Assigns every non-subgraph node an `order` within its rank. Starting from a depth-first
//! initial order, ranks are swept alternately downward (barycenters from the rank above) and
//! upward (barycenters from the rank below), with the tie-break bias flipping every two
//! sweeps. Subgraphs are kept contiguous by sorting them recursively and by the constraints
//! collected in [`add_subgraph_constraints`]. The layering with the fewest crossings wins.

mod barycenter;
mod constraints;
mod cross_count;
mod init_order;
mod layer_graph;
mod resolve_conflicts;
mod sort;
mod sort_subgraph;
mod types;

pub use barycenter::barycenter;
pub use constraints::add_subgraph_constraints;
pub use cross_count::cross_count;
pub use init_order::init_order;
pub use layer_graph::build_layer_graph;
pub use resolve_conflicts::resolve_conflicts;
pub use sort::sort;
pub use sort_subgraph::sort_subgraph;
pub use types::{
    BarycenterEntry, ConstraintGraph, LayerEdge, LayerGraph, LayerGraphLabel, LayerNode,
    Relationship, ResolvedEntry, SortResult,
};

use crate::util::{build_layer_matrix, max_rank};
use crate::LayoutGraph;

/// Sweeps without improvement after which ordering stops.
const PATIENCE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderOptions {
    /// Keep the initial depth-first order and skip the sweeps.
    pub disable_optimal_order_heuristic: bool,
    /// Upper bound on the number of sweeps.
    pub max_iterations: usize,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            disable_optimal_order_heuristic: false,
            max_iterations: 64,
        }
    }
}

pub fn order(g: &mut LayoutGraph) {
    order_with(g, OrderOptions::default());
}

pub fn order_with(g: &mut LayoutGraph, options: OrderOptions) {
    let max_rank = max_rank(g).unwrap_or(0);
    let mut down: Vec<LayerGraph> = (1..=max_rank)
        .map(|rank| build_layer_graph(g, rank, Relationship::InEdges))
        .collect();
    let mut up: Vec<LayerGraph> = (0..max_rank)
        .rev()
        .map(|rank| build_layer_graph(g, rank, Relationship::OutEdges))
        .collect();

    let layering = init_order(g);
    assign_order(g, &layering);
    if options.disable_optimal_order_heuristic {
        return;
    }

    let mut best_cc = f64::INFINITY;
    let mut best: Option<Vec<Vec<String>>> = None;
    let mut last_best = 0usize;
    let mut i = 0usize;
    while last_best < PATIENCE && i < options.max_iterations {
        let layer_graphs = if i % 2 == 1 { &mut down } else { &mut up };
        sweep_layer_graphs(g, layer_graphs, i % 4 >= 2);

        let layering = build_layer_matrix(g);
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            last_best = 0;
            best_cc = cc;
            best = Some(layering);
        }
        last_best += 1;
        i += 1;
    }
    tracing::trace!(sweeps = i, crossings = best_cc, "order: done");

    if let Some(best) = best {
        assign_order(g, &best);
    }
}

fn sweep_layer_graphs(g: &mut LayoutGraph, layer_graphs: &mut [LayerGraph], bias_right: bool) {
    let mut cg = ConstraintGraph::default();
    for lg in layer_graphs {
        // Neighbor orders may have changed since the layer graph was built.
        for (v, node) in lg.node_labels_mut() {
            node.order = g.node(v).and_then(|n| n.order);
        }

        let root = lg.graph().root.clone();
        let sorted = sort_subgraph(lg, &root, &cg, bias_right);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(node) = lg.node_mut(v) {
                node.order = Some(i);
            }
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
        add_subgraph_constraints(lg, &mut cg, &sorted.vs);
    }
}

fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
    }
}
