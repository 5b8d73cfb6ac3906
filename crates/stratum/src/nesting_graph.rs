//! Nesting graph for compound layouts.
//!
//! Ranking only sees a flat graph, so before it runs every subgraph gets a top and a bottom
//! border node, linked to the subgraph's children by heavy "nesting" edges that pull the
//! subgraph together vertically. A single root node is connected to every top-level node, which
//! also makes the graph connected. `minlen` of the original edges is stretched by
//! `node_rank_factor` so that real nodes never share a rank with border nodes; the extra empty
//! ranks are removed again by [`crate::util::remove_empty_ranks`].
//!
//! Gansner et al. describe the same idea for clusters in "A Technique for Drawing Directed
//! Graphs"; the border-node construction follows Sander, "Layout of Compound Directed Graphs".

use crate::util::{add_border_node, add_dummy_node};
use crate::{BorderType, Dummy, EdgeLabel, LayoutGraph, NodeLabel};
use rustc_hash::FxHashMap;

pub fn run(g: &mut LayoutGraph) {
    let root = add_dummy_node(g, Dummy::Root, NodeLabel::default(), "_root");
    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1) - 1;
    let node_sep = 2 * height + 1;

    g.graph_mut().nesting_root = Some(root.clone());

    for (_, label) in g.edge_labels_mut() {
        label.minlen *= node_sep;
    }

    // Heavier than every original edge together.
    let weight = g.edge_labels().map(|(_, l)| l.weight).sum::<f64>() + 1.0;

    let ctx = Nesting {
        root: &root,
        node_sep,
        weight,
        height,
        depths: &depths,
    };
    let top_level: Vec<String> = g.children_root().into_iter().map(str::to_string).collect();
    for child in &top_level {
        ctx.dfs(g, child);
    }

    g.graph_mut().node_rank_factor = Some(node_sep);
    tracing::trace!(height, node_sep, "nesting graph: built");
}

/// Removes the nesting root and every nesting edge.
pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }
    for e in g.edge_keys() {
        if g.edge_by_key(&e).is_some_and(|l| l.nesting_edge) {
            g.remove_edge_key(&e);
        }
    }
}

struct Nesting<'a> {
    root: &'a str,
    node_sep: i32,
    weight: f64,
    height: i32,
    depths: &'a FxHashMap<String, i32>,
}

impl Nesting<'_> {
    fn dfs(&self, g: &mut LayoutGraph, v: &str) {
        let children: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();
        if children.is_empty() {
            if v != self.root {
                g.set_edge_with_label(self.root, v, self.root_edge(self.node_sep));
            }
            return;
        }

        let top = add_border_node(g, BorderType::Top, "_bt", None);
        let bottom = add_border_node(g, BorderType::Bottom, "_bb", None);
        g.set_parent(top.clone(), v);
        g.set_parent(bottom.clone(), v);
        if let Some(label) = g.node_mut(v) {
            label.border_top = Some(top.clone());
            label.border_bottom = Some(bottom.clone());
        }

        let depth = self.depths.get(v).copied().unwrap_or(1);
        for child in &children {
            self.dfs(g, child);

            let (child_top, child_bottom) = match g.node(child) {
                Some(NodeLabel {
                    border_top: Some(t),
                    border_bottom: Some(b),
                    ..
                }) => (t.clone(), b.clone()),
                _ => (child.clone(), child.clone()),
            };
            let is_subgraph = child_top != *child;
            let this_weight = if is_subgraph { self.weight } else { 2.0 * self.weight };
            let minlen = if child_top != child_bottom {
                1
            } else {
                self.height - depth + 1
            };
            let nesting = EdgeLabel {
                weight: this_weight,
                minlen,
                nesting_edge: true,
                ..Default::default()
            };
            g.set_edge_with_label(top.clone(), child_top, nesting.clone());
            g.set_edge_with_label(child_bottom, bottom.clone(), nesting);
        }

        if g.parent(v).is_none() {
            g.set_edge_with_label(self.root, top, self.root_edge(self.height + depth));
        }
    }

    fn root_edge(&self, minlen: i32) -> EdgeLabel {
        EdgeLabel {
            weight: 0.0,
            minlen,
            ..Default::default()
        }
    }
}

/// Depth of every node in the hierarchy; top-level nodes have depth 1.
fn tree_depths(g: &LayoutGraph) -> FxHashMap<String, i32> {
    let mut depths = FxHashMap::default();
    let mut stack: Vec<(&str, i32)> = g.children_root().into_iter().map(|v| (v, 1)).collect();
    while let Some((v, depth)) = stack.pop() {
        depths.insert(v.to_string(), depth);
        stack.extend(g.children(v).into_iter().map(|c| (c, depth + 1)));
    }
    depths
}
