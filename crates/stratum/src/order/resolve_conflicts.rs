//! Reconciles barycenters with subgraph ordering constraints.
//!
//! Based on Forster, "A Fast and Simple Heuristic for Constrained Two-Level Crossing
//! Reduction". Whenever the barycenters would put an entry before one it is constrained to
//! follow, the two are merged into a single entry that keeps the constrained order and
//! aggregates barycenter and weight.

use super::types::{BarycenterEntry, ConstraintGraph, ResolvedEntry};
use rustc_hash::FxHashMap;

struct Node {
    vs: Vec<String>,
    i: usize,
    barycenter: Option<f64>,
    weight: Option<f64>,
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    merged: bool,
}

pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &ConstraintGraph) -> Vec<ResolvedEntry> {
    let mut nodes: Vec<Node> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| Node {
            vs: vec![entry.v.clone()],
            i,
            barycenter: entry.barycenter,
            weight: entry.barycenter.and(entry.weight),
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            merged: false,
        })
        .collect();
    let index: FxHashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.v.as_str(), i))
        .collect();

    for e in cg.edges() {
        if let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) {
            nodes[w].indegree += 1;
            nodes[v].outs.push(w);
        }
    }

    let mut sources: Vec<usize> = (0..nodes.len()).filter(|&i| nodes[i].indegree == 0).collect();
    let mut visited: Vec<usize> = Vec::with_capacity(nodes.len());

    while let Some(v) = sources.pop() {
        visited.push(v);

        let ins = std::mem::take(&mut nodes[v].ins);
        for &u in ins.iter().rev() {
            if nodes[u].merged {
                continue;
            }
            let out_of_order = match (nodes[u].barycenter, nodes[v].barycenter) {
                (Some(ub), Some(vb)) => ub >= vb,
                _ => true,
            };
            if out_of_order {
                merge(&mut nodes, v, u);
            }
        }

        let outs = nodes[v].outs.clone();
        for w in outs {
            nodes[w].ins.push(v);
            nodes[w].indegree -= 1;
            if nodes[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    visited
        .into_iter()
        .filter_map(|v| {
            let node = &mut nodes[v];
            (!node.merged).then(|| ResolvedEntry {
                vs: std::mem::take(&mut node.vs),
                i: node.i,
                barycenter: node.barycenter,
                weight: node.weight,
            })
        })
        .collect()
}

/// Folds `source` into `target`, placing the source's nodes first.
///
/// An aggregate without any weight has no barycenter.
fn merge(nodes: &mut [Node], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for ix in [target, source] {
        if let (Some(b), Some(w)) = (nodes[ix].barycenter, nodes[ix].weight) {
            if w != 0.0 {
                sum += b * w;
                weight += w;
            }
        }
    }

    let mut vs = std::mem::take(&mut nodes[source].vs);
    vs.append(&mut nodes[target].vs);
    let i = nodes[source].i.min(nodes[target].i);
    nodes[source].merged = true;

    let t = &mut nodes[target];
    t.vs = vs;
    t.i = i;
    if weight != 0.0 {
        t.barycenter = Some(sum / weight);
        t.weight = Some(weight);
    } else {
        t.barycenter = None;
        t.weight = None;
    }
}
