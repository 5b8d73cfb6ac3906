use super::barycenter::barycenter;
use super::resolve_conflicts::resolve_conflicts;
use super::sort::sort;
use super::types::{BarycenterEntry, ConstraintGraph, LayerGraph, SortResult};
use rustc_hash::FxHashMap;

/// Orders the children of `v` in the layer graph, recursing into nested subgraphs first.
///
/// A subgraph's result is wrapped by its left and right border nodes, and its barycenter is
/// pulled toward the order of the borders' predecessors when they have any.
pub fn sort_subgraph(g: &LayerGraph, v: &str, cg: &ConstraintGraph, bias_right: bool) -> SortResult {
    let node = g.node(v);
    let borders = node.and_then(|n| Some((n.border_left.clone()?, n.border_right.clone()?)));

    let movable: Vec<String> = g
        .children(v)
        .into_iter()
        .filter(|w| {
            borders
                .as_ref()
                .is_none_or(|(bl, br)| *w != bl.as_str() && *w != br.as_str())
        })
        .map(str::to_string)
        .collect();

    let mut entries = barycenter(g, &movable);
    let mut subgraphs: FxHashMap<String, SortResult> = FxHashMap::default();
    for entry in &mut entries {
        if !g.has_children(&entry.v) {
            continue;
        }
        let result = sort_subgraph(g, &entry.v, cg, bias_right);
        if let (Some(b), Some(w)) = (result.barycenter, result.weight) {
            merge_barycenters(entry, b, w);
        }
        subgraphs.insert(entry.v.clone(), result);
    }

    let mut resolved = resolve_conflicts(&entries, cg);
    for entry in &mut resolved {
        entry.vs = std::mem::take(&mut entry.vs)
            .into_iter()
            .flat_map(|w| match subgraphs.remove(&w) {
                Some(sub) => sub.vs,
                None => vec![w],
            })
            .collect();
    }

    let mut result = sort(resolved, bias_right);

    if let Some((bl, br)) = borders {
        let bl_pred = g.predecessors(&bl).first().and_then(|u| g.node(u)).and_then(|n| n.order);
        let br_pred = g.predecessors(&br).first().and_then(|u| g.node(u)).and_then(|n| n.order);
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl);
        vs.append(&mut result.vs);
        vs.push(br);
        result.vs = vs;

        if let (Some(bl_order), Some(br_order)) = (bl_pred, br_pred) {
            let b = result.barycenter.unwrap_or(0.0);
            let w = result.weight.unwrap_or(0.0);
            result.barycenter = Some((b * w + bl_order as f64 + br_order as f64) / (w + 2.0));
            result.weight = Some(w + 2.0);
        }
    }

    result
}

fn merge_barycenters(target: &mut BarycenterEntry, barycenter: f64, weight: f64) {
    match (target.barycenter, target.weight) {
        (Some(b), Some(w)) => {
            target.barycenter = Some((b * w + barycenter * weight) / (w + weight));
            target.weight = Some(w + weight);
        }
        _ => {
            target.barycenter = Some(barycenter);
            target.weight = Some(weight);
        }
    }
}
