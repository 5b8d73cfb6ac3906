//! Moves the dummy nodes of long edges into the right subgraphs.
//!
//! A dummy chain runs from the edge's tail to its head. Walking it rank by rank, each dummy is
//! parented to the deepest subgraph on the hierarchy path between the two endpoints that
//! still covers the dummy's rank: first climbing from the tail towards their lowest common
//! ancestor, then descending towards the head.

use crate::LayoutGraph;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy)]
struct PostorderNum {
    low: usize,
    lim: usize,
}

/// Path through the hierarchy from `v` up to the lowest common ancestor and down to `w`.
/// `None` stands for the hierarchy root.
struct HierarchyPath {
    path: Vec<Option<String>>,
    lca: Option<String>,
}

pub fn parent_dummy_chains(g: &mut LayoutGraph) {
    let nums = postorder(g);
    let chains = g.graph().dummy_chains.clone();

    for start in chains {
        let Some(edge) = g
            .node(&start)
            .and_then(|n| n.dummy.as_ref())
            .and_then(|d| d.edge())
            .cloned()
        else {
            continue;
        };
        let HierarchyPath { path, lca } = find_path(g, &nums, &edge.v, &edge.w);
        let Some(last) = path.len().checked_sub(1) else {
            continue;
        };

        let mut path_ix = 0usize;
        let mut ascending = true;
        let mut v = start;
        while v != edge.w {
            let Some(rank) = g.node(&v).and_then(|n| n.rank) else {
                break;
            };

            if ascending {
                while path[path_ix] != lca
                    && path[path_ix]
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.max_rank)
                        .is_some_and(|max| max < rank)
                {
                    path_ix += 1;
                }
                if path[path_ix] == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while path_ix < last
                    && path[path_ix + 1]
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.min_rank)
                        .is_some_and(|min| min <= rank)
                {
                    path_ix += 1;
                }
            }

            match &path[path_ix] {
                Some(parent) => {
                    g.set_parent(v.clone(), parent.clone());
                }
                None => {
                    g.clear_parent(&v);
                }
            }

            let Some(next) = g.successors(&v).first().map(|s| s.to_string()) else {
                break;
            };
            v = next;
        }
    }
}

fn find_path(
    g: &LayoutGraph,
    nums: &FxHashMap<String, PostorderNum>,
    v: &str,
    w: &str,
) -> HierarchyPath {
    let (low, lim) = match (nums.get(v), nums.get(w)) {
        (Some(a), Some(b)) => (a.low.min(b.low), a.lim.max(b.lim)),
        _ => (usize::MAX, 0),
    };

    // Climb from `v` until reaching an ancestor whose subtree also holds `w`.
    let mut v_path: Vec<Option<String>> = Vec::new();
    let mut parent = Some(v);
    let lca = loop {
        parent = parent.and_then(|p| g.parent(p));
        v_path.push(parent.map(str::to_string));
        match parent.and_then(|p| nums.get(p)) {
            Some(num) if !(num.low > low || lim > num.lim) => break parent.map(str::to_string),
            Some(_) => continue,
            None => break parent.map(str::to_string),
        }
    };

    let mut w_path: Vec<Option<String>> = Vec::new();
    let mut current = g.parent(w);
    while current != lca.as_deref() {
        let Some(p) = current else {
            break;
        };
        w_path.push(Some(p.to_string()));
        current = g.parent(p);
    }

    v_path.extend(w_path.into_iter().rev());
    HierarchyPath { path: v_path, lca }
}

/// Post-order `low`/`lim` numbers over the hierarchy: a node's subtree holds exactly the nodes
/// whose `lim` lies in `low..=lim`.
fn postorder(g: &LayoutGraph) -> FxHashMap<String, PostorderNum> {
    let mut nums = FxHashMap::default();
    let mut lim = 0usize;

    for root in g.children_root() {
        let mut stack: Vec<(&str, usize, std::vec::IntoIter<&str>)> =
            vec![(root, lim, g.children(root).into_iter())];
        while let Some((v, low, children)) = stack.last_mut() {
            match children.next() {
                Some(child) => {
                    stack.push((child, lim, g.children(child).into_iter()));
                }
                None => {
                    nums.insert(v.to_string(), PostorderNum { low: *low, lim });
                    lim += 1;
                    stack.pop();
                }
            }
        }
    }
    nums
}
