//! Network simplex ranking.
//!
//! Minimizes `sum(weight * length)` over all edges, following Gansner et al., "A Technique for
//! Drawing Directed Graphs". Starting from a feasible tree of tight edges, each pivot replaces
//! a tree edge whose cut value is negative with the non-tree edge of minimum slack crossing the
//! same cut, until every cut value is non-negative.
//!
//! Tie-breaking is deterministic: the leaving edge is the tree edge with the lowest cut value
//! (first in tree edge order on ties) and the entering edge is the candidate with the lowest
//! slack (first in graph edge order on ties).

use super::feasible_tree::feasible_tree;
use super::tree::{TightTree, TreeEdgeLabel, TreeNodeLabel};
use super::util::{longest_path, slack};
use crate::graphlib::{EdgeKey, alg};
use crate::util::simplify;
use crate::LayoutGraph;
use rustc_hash::FxHashSet;

/// Ranks `g` in place. The graph must be acyclic and connected.
pub fn network_simplex(g: &mut LayoutGraph) {
    let mut simple = simplify(g);
    longest_path(&mut simple);
    let mut t = feasible_tree(&mut simple);
    init_low_lim_values(&mut t, None);
    init_cut_values(&mut t, &simple);

    let mut pivots = 0usize;
    while let Some(e) = leave_edge(&t) {
        let Some(f) = enter_edge(&t, &simple, &e) else {
            tracing::warn!(edge = %e, "network simplex: no entering edge for a negative cut");
            break;
        };
        exchange_edges(&mut t, &mut simple, &e, &f);
        pivots += 1;
    }
    tracing::trace!(pivots, "network simplex: converged");

    for (v, label) in simple.node_labels() {
        if let Some(node) = g.node_mut(v) {
            node.rank = label.rank;
        }
    }
}

/// Numbers the tree in postorder from `root` (the first tree node by default): `lim` is the
/// node's own number and `low` the smallest number in its subtree. Also records each node's
/// tree parent.
pub fn init_low_lim_values(t: &mut TightTree, root: Option<&str>) {
    let Some(root) = root
        .map(str::to_string)
        .or_else(|| t.nodes().next().map(str::to_string))
    else {
        return;
    };

    struct Frame {
        v: String,
        parent: Option<String>,
        low: usize,
        neighbors: std::vec::IntoIter<String>,
    }

    let neighbors = |t: &TightTree, v: &str| -> std::vec::IntoIter<String> {
        t.neighbors(v)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into_iter()
    };

    let mut next_lim = 1usize;
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut numbered: Vec<(String, TreeNodeLabel)> = Vec::with_capacity(t.node_count());

    visited.insert(root.clone());
    let mut stack = vec![Frame {
        neighbors: neighbors(t, &root),
        v: root,
        parent: None,
        low: next_lim,
    }];
    while let Some(frame) = stack.last_mut() {
        match frame.neighbors.find(|w| !visited.contains(w)) {
            Some(w) => {
                visited.insert(w.clone());
                let parent = Some(frame.v.clone());
                stack.push(Frame {
                    neighbors: neighbors(t, &w),
                    v: w,
                    parent,
                    low: next_lim,
                });
            }
            None => {
                let Some(done) = stack.pop() else {
                    break;
                };
                let label = TreeNodeLabel {
                    low: done.low,
                    lim: next_lim,
                    parent: done.parent,
                };
                next_lim += 1;
                numbered.push((done.v, label));
            }
        }
    }

    for (v, label) in numbered {
        t.set_node(v, label);
    }
}

/// Computes the cut value of every tree edge, children before parents.
pub fn init_cut_values(t: &mut TightTree, g: &LayoutGraph) {
    let roots = t.node_ids();
    let roots: Vec<&str> = roots.iter().map(String::as_str).collect();
    let mut vs = alg::postorder(t, &roots);
    // The last node is the root, which has no parent edge.
    vs.pop();
    for v in vs {
        assign_cut_value(t, g, &v);
    }
}

fn assign_cut_value(t: &mut TightTree, g: &LayoutGraph, child: &str) {
    let Some(parent) = t.node(child).and_then(|n| n.parent.clone()) else {
        return;
    };
    let cutvalue = calc_cut_value(t, g, child);
    if let Some(edge) = t.edge_mut(child, &parent, None) {
        edge.cutvalue = cutvalue;
    }
}

/// Cut value of the tree edge between `child` and its tree parent.
///
/// The cut splits the tree into the child's subtree and the rest. The value is the weight of
/// graph edges going the same way as the tree edge minus the weight of those going the other
/// way, computed incrementally from the cut values of the child's own tree edges.
pub fn calc_cut_value(t: &TightTree, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = t.node(child).and_then(|n| n.parent.as_deref()) else {
        return 0.0;
    };

    let (child_is_tail, graph_edge) = match g.edge(child, parent, None) {
        Some(label) => (true, label),
        None => match g.edge(parent, child, None) {
            Some(label) => (false, label),
            None => return 0.0,
        },
    };

    let mut cut_value = graph_edge.weight;
    for e in g.node_edges(child, None) {
        let is_out_edge = e.v == child;
        let other = if is_out_edge { &e.w } else { &e.v };
        if other == parent {
            continue;
        }
        let points_to_head = is_out_edge == child_is_tail;
        let other_weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
        cut_value += if points_to_head {
            other_weight
        } else {
            -other_weight
        };
        if let Some(tree_edge) = t.edge(child, other, None) {
            let other_cut_value = tree_edge.cutvalue;
            cut_value += if points_to_head {
                -other_cut_value
            } else {
                other_cut_value
            };
        }
    }
    cut_value
}

/// The tree edge with the lowest negative cut value, if any. Ties keep the first such edge.
///
/// This is the most negative edge, not the first negative one in iteration order.
pub fn leave_edge(t: &TightTree) -> Option<EdgeKey> {
    let mut best: Option<(&EdgeKey, f64)> = None;
    for (e, label) in t.edge_labels() {
        if label.cutvalue >= 0.0 {
            continue;
        }
        if best.is_none_or(|(_, min)| label.cutvalue < min) {
            best = Some((e, label.cutvalue));
        }
    }
    best.map(|(e, _)| e.clone())
}

/// The graph edge of minimum slack that crosses the cut of the leaving tree edge `edge` in the
/// opposite direction.
pub fn enter_edge(t: &TightTree, g: &LayoutGraph, edge: &EdgeKey) -> Option<EdgeKey> {
    let (v, w) = if g.has_edge(&edge.v, &edge.w, None) {
        (edge.v.as_str(), edge.w.as_str())
    } else {
        (edge.w.as_str(), edge.v.as_str())
    };
    let v_label = t.node(v)?;
    let w_label = t.node(w)?;

    // The tail side is the subtree hanging below the leaving edge.
    let (tail_label, flip) = if v_label.lim > w_label.lim {
        (w_label, true)
    } else {
        (v_label, false)
    };

    let mut best: Option<(i32, &EdgeKey)> = None;
    for e in g.edges() {
        let (Some(ev), Some(ew)) = (t.node(&e.v), t.node(&e.w)) else {
            continue;
        };
        if flip != is_descendant(ev, tail_label) || flip == is_descendant(ew, tail_label) {
            continue;
        }
        let s = slack(g, e);
        if best.is_none_or(|(min, _)| s < min) {
            best = Some((s, e));
        }
    }
    best.map(|(_, e)| e.clone())
}

/// Replaces tree edge `e` with graph edge `f`, then renumbers the tree, recomputes cut values
/// and re-derives ranks from the tree.
pub fn exchange_edges(t: &mut TightTree, g: &mut LayoutGraph, e: &EdgeKey, f: &EdgeKey) {
    t.remove_edge(&e.v, &e.w, None);
    t.set_edge_with_label(f.v.as_str(), f.w.as_str(), TreeEdgeLabel::default());
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

/// Re-ranks every node from its tree parent so all tree edges are tight.
fn update_ranks(t: &TightTree, g: &mut LayoutGraph) {
    let Some(root) = t.nodes().next() else {
        return;
    };
    let vs = alg::preorder(t, &[root]);
    for v in vs.iter().skip(1) {
        let Some(parent) = t.node(v).and_then(|n| n.parent.as_deref()) else {
            continue;
        };
        let delta = match g.edge(v, parent, None) {
            Some(edge) => -edge.minlen,
            None => g.edge(parent, v, None).map_or(0, |edge| edge.minlen),
        };
        let parent_rank = g.node(parent).and_then(|n| n.rank).unwrap_or(0);
        if let Some(node) = g.node_mut(v) {
            node.rank = Some(parent_rank + delta);
        }
    }
}

fn is_descendant(v: &TreeNodeLabel, root: &TreeNodeLabel) -> bool {
    root.low <= v.lim && v.lim <= root.lim
}
