use super::types::{LayerEdge, LayerGraph, LayerGraphLabel, LayerNode, Relationship};
use crate::graphlib::GraphOptions;
use crate::LayoutGraph;

/// Builds the layer graph of `rank`.
///
/// It holds every node on the rank and every subgraph spanning it, parented as in `g` with
/// top-level nodes moved under a fresh root. Each node also pulls in its neighbors through
/// `relationship`; parallel edges to the same neighbor collapse into one edge with the summed
/// weight. Subgraph nodes carry their border nodes for this rank.
pub fn build_layer_graph(g: &LayoutGraph, rank: i32, relationship: Relationship) -> LayerGraph {
    let root = root_id(g);
    let mut lg = LayerGraph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    lg.set_graph(LayerGraphLabel { root: root.clone() });
    lg.set_node(root.as_str(), LayerNode::default());

    for (v, node) in g.node_labels() {
        let spans = node.min_rank.zip(node.max_rank);
        let on_rank = node.rank == Some(rank)
            || spans.is_some_and(|(lo, hi)| lo <= rank && rank <= hi);
        if !on_rank {
            continue;
        }

        let label = match spans {
            Some(_) => LayerNode {
                order: node.order,
                border_left: border_at(&node.border_left, rank),
                border_right: border_at(&node.border_right, rank),
            },
            None => LayerNode {
                order: node.order,
                ..Default::default()
            },
        };
        lg.set_node(v, label);
        let parent = g.parent(v).unwrap_or(root.as_str());
        if !lg.has_node(parent) {
            let order = g.node(parent).and_then(|n| n.order);
            lg.set_node(parent, LayerNode {
                order,
                ..Default::default()
            });
        }
        lg.set_parent(v, parent);

        let incident = match relationship {
            Relationship::InEdges => g.in_edges(v, None),
            Relationship::OutEdges => g.out_edges(v, None),
        };
        for e in incident {
            let u = e.other(v);
            let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
            let prev = lg.edge(u, v, None).map_or(0.0, |l| l.weight);
            if !lg.has_node(u) {
                let order = g.node(u).and_then(|n| n.order);
                lg.set_node(u, LayerNode {
                    order,
                    ..Default::default()
                });
            }
            lg.set_edge_with_label(u, v, LayerEdge {
                weight: weight + prev,
            });
        }
    }
    lg
}

fn border_at(borders: &[Option<String>], rank: i32) -> Option<String> {
    usize::try_from(rank)
        .ok()
        .and_then(|r| borders.get(r).cloned().flatten())
}

fn root_id(g: &LayoutGraph) -> String {
    (1usize..)
        .map(|i| format!("_root{i}"))
        .find(|id| !g.has_node(id))
        .unwrap_or_default()
}
