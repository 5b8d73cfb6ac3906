//! Break cycles by reversing a feedback arc set (FAS).
//!
//! Reversed edges keep their label, are flagged with `reversed` and remember their original
//! name in `forward_name`, so [`undo`] can put them back.

use crate::graphlib::EdgeKey;
use crate::{Acyclicer, EdgeLabel, LayoutGraph};
use rustc_hash::FxHashMap;

pub fn run(g: &mut LayoutGraph) {
    let fas = match g.graph().acyclicer {
        Acyclicer::Greedy => {
            let scale = greedy_weight_scale(g);
            crate::greedy_fas::greedy_fas_with_weight(g, |label| greedy_weight(label, scale))
        }
        Acyclicer::Dfs => dfs_fas(g),
    };
    tracing::trace!(reversed = fas.len(), "acyclic: breaking cycles");

    for e in fas.into_iter().filter(|e| e.v != e.w) {
        let Some(mut label) = g.take_edge(&e) else {
            continue;
        };
        label.forward_name = e.name.clone();
        label.reversed = true;

        let name = unique_rev_name(g, &e.w, &e.v);
        g.set_edge_named(e.w, e.v, Some(name), Some(label));
    }
}

pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if !g.edge_by_key(&e).is_some_and(|l| l.reversed) {
            continue;
        }
        let Some(mut label) = g.take_edge(&e) else {
            continue;
        };
        let forward_name = label.forward_name.take();
        label.reversed = false;
        g.set_edge_named(e.w, e.v, forward_name, Some(label));
    }
}

/// Upper bound on the heaviest scaled weight, which also bounds the number of buckets.
const MAX_SCALED_WEIGHT: f64 = 1024.0;

/// Factor that lifts the lightest positive weight to 1, so fractional weights keep their
/// relative order once rounded.
fn greedy_weight_scale(g: &LayoutGraph) -> f64 {
    let (min, max) = g
        .edge_labels()
        .map(|(_, l)| l.weight)
        .filter(|w| w.is_finite() && *w > 0.0)
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), w| (lo.min(w), hi.max(w)));
    if !min.is_finite() || min >= 1.0 {
        return 1.0;
    }
    (1.0 / min).min(MAX_SCALED_WEIGHT / max).max(1.0)
}

fn greedy_weight(label: &EdgeLabel, scale: f64) -> i64 {
    if label.weight.is_finite() {
        (label.weight * scale).round() as i64
    } else {
        0
    }
}

fn unique_rev_name(g: &LayoutGraph, v: &str, w: &str) -> String {
    let mut i = 1usize;
    loop {
        let candidate = format!("rev{i}");
        if !g.has_edge(v, w, Some(&candidate)) {
            return candidate;
        }
        i += 1;
    }
}

/// Back edges of a depth-first search that visits roots in node insertion order.
fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let ids: Vec<&str> = g.nodes().collect();
    let index: FxHashMap<&str, usize> = ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();
    let mut visited = vec![false; ids.len()];
    let mut on_stack = vec![false; ids.len()];
    let mut fas: Vec<EdgeKey> = Vec::new();

    for root in 0..ids.len() {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        on_stack[root] = true;
        let mut stack: Vec<(usize, std::vec::IntoIter<EdgeKey>)> =
            vec![(root, g.out_edges(ids[root], None).into_iter())];

        while let Some((v, edges)) = stack.last_mut() {
            let Some(e) = edges.next() else {
                on_stack[*v] = false;
                stack.pop();
                continue;
            };
            let Some(&w) = index.get(e.w.as_str()) else {
                continue;
            };
            if on_stack[w] {
                fas.push(e);
            } else if !visited[w] {
                visited[w] = true;
                on_stack[w] = true;
                stack.push((w, g.out_edges(ids[w], None).into_iter()));
            }
        }
    }
    fas
}
