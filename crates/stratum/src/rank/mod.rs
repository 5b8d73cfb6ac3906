//! Rank assignment.
//!
//! Gives every node an integer `rank` such that `rank(w) - rank(v) >= minlen` holds for every
//! edge `v -> w`. The algorithm is picked by the graph label's `ranker`:
//!
//! - [`Ranker::NetworkSimplex`]: minimal total weighted edge length.
//! - [`Ranker::TightTree`]: longest path, then a feasible tree of tight edges.
//! - [`Ranker::LongestPath`]: fastest, with the longest edges.
//!
//! Ranks are not normalized; the smallest rank may be negative. The graph must be acyclic and
//! must not be compound. Disconnected graphs are ranked one connected component at a time.

pub mod feasible_tree;
pub mod network_simplex;
pub mod tree;
pub mod util;

pub use feasible_tree::feasible_tree;
pub use network_simplex::network_simplex;
pub use util::{longest_path, slack};

use crate::graphlib::{Graph, alg};
use crate::{LayoutGraph, Ranker};
use rustc_hash::FxHashSet;

pub fn rank(g: &mut LayoutGraph) {
    let components = alg::components(g);
    if components.len() <= 1 {
        rank_connected(g);
        return;
    }

    tracing::debug!(components = components.len(), "rank: ranking components separately");
    for nodes in components {
        let mut sub = induced_subgraph(g, &nodes);
        rank_connected(&mut sub);
        for (v, label) in sub.node_labels() {
            if let Some(node) = g.node_mut(v) {
                node.rank = label.rank;
            }
        }
    }
}

fn rank_connected(g: &mut LayoutGraph) {
    match g.graph().ranker {
        Ranker::NetworkSimplex => network_simplex(g),
        Ranker::TightTree => {
            longest_path(g);
            feasible_tree(g);
        }
        Ranker::LongestPath => longest_path(g),
    }
}

fn induced_subgraph(g: &LayoutGraph, nodes: &[String]) -> LayoutGraph {
    let members: FxHashSet<&str> = nodes.iter().map(String::as_str).collect();
    let mut sub: LayoutGraph = Graph::new(g.options());
    sub.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        if members.contains(v) {
            sub.set_node(v, label.clone());
        }
    }
    for (e, label) in g.edge_labels() {
        if members.contains(e.v.as_str()) && members.contains(e.w.as_str()) {
            sub.set_edge_key(e, label.clone());
        }
    }
    sub
}
