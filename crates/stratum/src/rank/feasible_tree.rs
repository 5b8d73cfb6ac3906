//! Feasible spanning tree of tight edges.
//!
//! Starting from the first node, the tree greedily absorbs every node reachable through tight
//! edges. When it stops growing, the incident edge with the smallest slack is made tight by
//! shifting the ranks of all tree nodes, and the tree grows again. The graph must be acyclic,
//! connected and already ranked so that every edge respects its `minlen` (see
//! [`longest_path`](super::util::longest_path)).

use super::tree::{TightTree, TreeEdgeLabel, TreeNodeLabel};
use super::util::slack;
use crate::graphlib::{EdgeKey, GraphOptions};
use crate::LayoutGraph;

/// Returns an undirected tree spanning `g` in which every edge is tight, adjusting the ranks
/// of `g` to make it so.
pub fn feasible_tree(g: &mut LayoutGraph) -> TightTree {
    let mut t = TightTree::new(GraphOptions {
        directed: false,
        ..Default::default()
    });

    let Some(start) = g.nodes().next().map(str::to_string) else {
        return t;
    };
    let size = g.node_count();
    t.set_node(start, TreeNodeLabel::default());

    while tight_tree(&mut t, g) < size {
        match find_min_slack_edge(&t, g) {
            Some(e) => {
                let delta = if t.has_node(&e.v) {
                    slack(g, &e)
                } else {
                    -slack(g, &e)
                };
                shift_ranks(&t, g, delta);
            }
            None => {
                // Disconnected input: seed the next component so the loop terminates.
                let Some(next) = g.nodes().find(|v| !t.has_node(v)).map(str::to_string) else {
                    break;
                };
                tracing::debug!(node = %next, "feasible tree: graph is disconnected");
                t.set_node(next, TreeNodeLabel::default());
            }
        }
    }

    t
}

/// Grows `t` along tight edges and returns its node count.
fn tight_tree(t: &mut TightTree, g: &LayoutGraph) -> usize {
    let roots = t.node_ids();
    for root in roots {
        // Frames of a depth-first walk: a node and its incident edges still to look at.
        let mut stack: Vec<(String, std::vec::IntoIter<EdgeKey>)> =
            vec![(root.clone(), g.node_edges(&root, None).into_iter())];
        while let Some((v, edges)) = stack.last_mut() {
            let Some(e) = edges.next() else {
                stack.pop();
                continue;
            };
            let w = e.other(v).to_string();
            if t.has_node(&w) || slack(g, &e) != 0 {
                continue;
            }
            t.set_node(w.as_str(), TreeNodeLabel::default());
            t.set_edge_with_label(v.as_str(), w.as_str(), TreeEdgeLabel::default());
            let next = g.node_edges(&w, None).into_iter();
            stack.push((w, next));
        }
    }
    t.node_count()
}

/// First edge, in graph edge order, with exactly one endpoint in the tree and minimal slack.
fn find_min_slack_edge(t: &TightTree, g: &LayoutGraph) -> Option<EdgeKey> {
    let mut best: Option<(i32, &EdgeKey)> = None;
    for e in g.edges() {
        if t.has_node(&e.v) == t.has_node(&e.w) {
            continue;
        }
        let s = slack(g, e);
        if best.is_none_or(|(min, _)| s < min) {
            best = Some((s, e));
        }
    }
    best.map(|(_, e)| e.clone())
}

fn shift_ranks(t: &TightTree, g: &mut LayoutGraph, delta: i32) {
    for v in t.nodes() {
        if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
            *rank += delta;
        }
    }
}
