use super::types::{BarycenterEntry, LayerGraph};

/// Weighted mean order of the in-neighbors of each node in `movable`. Nodes without
/// in-neighbors get no barycenter.
pub fn barycenter(g: &LayerGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let in_edges = g.in_edges(v, None);
            if in_edges.is_empty() {
                return BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: None,
                };
            }
            let (sum, weight) = in_edges.iter().fold((0.0, 0.0), |(sum, weight), e| {
                let edge_weight = g.edge_by_key(e).map_or(0.0, |l| l.weight);
                let order = g.node(&e.v).and_then(|n| n.order).unwrap_or(0) as f64;
                (sum + edge_weight * order, weight + edge_weight)
            });
            BarycenterEntry {
                v: v.clone(),
                barycenter: Some(sum / weight),
                weight: Some(weight),
            }
        })
        .collect()
}
