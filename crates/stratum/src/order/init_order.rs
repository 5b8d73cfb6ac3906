use crate::LayoutGraph;
use rustc_hash::FxHashSet;

/// Initial order: a depth-first walk along successors, starting from the leaf nodes sorted
/// by rank, appends each node to its rank as it is first reached.
///
/// Subgraph nodes are skipped. Returns one vector of node ids per rank.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut simple: Vec<(&str, i32)> = g
        .node_labels()
        .filter(|(v, _)| !g.has_children(v))
        .filter_map(|(v, n)| Some((v, n.rank?)))
        .collect();
    let Some(max_rank) = simple.iter().map(|(_, r)| *r).max() else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];

    // Stable, so nodes of one rank keep their insertion order.
    simple.sort_by_key(|(_, rank)| *rank);

    let mut visited: FxHashSet<&str> = FxHashSet::default();
    for (start, _) in simple {
        if !visited.insert(start) {
            continue;
        }
        place(g, &mut layers, start);
        let mut stack: Vec<std::vec::IntoIter<&str>> = vec![g.successors(start).into_iter()];
        while let Some(next) = stack.last_mut() {
            match next.find(|w| !visited.contains(w)) {
                Some(w) => {
                    visited.insert(w);
                    place(g, &mut layers, w);
                    stack.push(g.successors(w).into_iter());
                }
                None => {
                    stack.pop();
                }
            }
        }
    }
    layers
}

fn place(g: &LayoutGraph, layers: &mut [Vec<String>], v: &str) {
    let Some(rank) = g.node(v).and_then(|n| n.rank) else {
        return;
    };
    if let Some(layer) = usize::try_from(rank).ok().and_then(|r| layers.get_mut(r)) {
        layer.push(v.to_string());
    }
}
