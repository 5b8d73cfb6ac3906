//! Longest-path ranking and slack.

use crate::graphlib::{EdgeKey, alg};
use crate::LayoutGraph;
use rustc_hash::FxHashMap;

/// Ranks every node as low as its successors allow: a sink gets rank 0 and every other node
/// gets `min(rank(w) - minlen)` over its out-edges.
///
/// Ranks are non-positive and every edge satisfies its `minlen`, but many edges end up longer
/// than needed. The graph must be acyclic.
pub fn longest_path(g: &mut LayoutGraph) {
    let sources = g.sources();
    // In a DAG every successor of `v` precedes `v` in postorder.
    let order = alg::postorder(g, &sources);

    let mut ranks: FxHashMap<String, i32> = FxHashMap::default();
    for v in order {
        let rank = g
            .out_edges(&v, None)
            .iter()
            .filter_map(|e| {
                let minlen = g.edge_by_key(e).map_or(1, |l| l.minlen);
                ranks.get(e.w.as_str()).map(|r| r - minlen)
            })
            .min()
            .unwrap_or(0);
        ranks.insert(v, rank);
    }

    for (v, rank) in ranks {
        if let Some(label) = g.node_mut(&v) {
            label.rank = Some(rank);
        }
    }
}

/// Amount by which an edge is longer than its `minlen`. A tight edge has zero slack.
///
/// Missing ranks count as 0.
pub fn slack(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    let rank = |v: &str| g.node(v).and_then(|n| n.rank).unwrap_or(0);
    let minlen = g.edge_by_key(e).map_or(1, |l| l.minlen);
    rank(&e.w) - rank(&e.v) - minlen
}
