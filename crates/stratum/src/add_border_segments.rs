//! Left and right border chains for subgraphs.
//!
//! Every subgraph with a rank span gets one left and one right border node per rank, parented
//! to the subgraph and chained top to bottom. Ordering keeps each subgraph between its chains,
//! and their final positions give the subgraph's width.

use crate::util::add_dummy_node;
use crate::{BorderType, Dummy, EdgeLabel, LayoutGraph, NodeLabel};

pub fn add_border_segments(g: &mut LayoutGraph) {
    let roots: Vec<String> = g.children_root().into_iter().map(str::to_string).collect();
    for v in &roots {
        dfs(g, v);
    }
}

fn dfs(g: &mut LayoutGraph, v: &str) {
    let children: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();
    for child in &children {
        dfs(g, child);
    }

    let Some((min_rank, max_rank)) = g.node(v).and_then(|n| Some((n.min_rank?, n.max_rank?)))
    else {
        return;
    };
    if let Some(node) = g.node_mut(v) {
        let len = usize::try_from(max_rank + 1).unwrap_or(0);
        node.border_left = vec![None; len];
        node.border_right = vec![None; len];
    }
    for rank in min_rank..=max_rank {
        add_border_node(g, BorderType::Left, "_bl", v, rank);
        add_border_node(g, BorderType::Right, "_br", v, rank);
    }
}

fn add_border_node(g: &mut LayoutGraph, side: BorderType, prefix: &str, sg: &str, rank: i32) {
    let Ok(ix) = usize::try_from(rank) else {
        return;
    };
    let label = NodeLabel {
        rank: Some(rank),
        ..Default::default()
    };
    let curr = add_dummy_node(g, Dummy::Border(side), label, prefix);
    g.set_parent(curr.clone(), sg);

    let Some(node) = g.node_mut(sg) else {
        return;
    };
    let chain = match side {
        BorderType::Left => &mut node.border_left,
        _ => &mut node.border_right,
    };
    let prev = ix.checked_sub(1).and_then(|p| chain.get(p).cloned().flatten());
    if let Some(slot) = chain.get_mut(ix) {
        *slot = Some(curr.clone());
    }
    if let Some(prev) = prev {
        g.set_edge_with_label(prev, curr, EdgeLabel::with_weight(1.0));
    }
}
