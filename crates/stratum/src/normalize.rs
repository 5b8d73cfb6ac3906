//! Break edges that span more than one rank into chains of unit-length edges.
//!
//! Every intermediate rank gets a zero-sized [`Dummy::Edge`] node. If the edge has a label, the
//! dummy on its `label_rank` becomes a [`Dummy::EdgeLabel`] node sized like the label. The first
//! dummy of each chain is recorded in `dummy_chains` so [`undo`] can collapse the chain into the
//! original edge's points.

use crate::error::{Error, Result};
use crate::graphlib::EdgeKey;
use crate::util::add_dummy_node;
use crate::{Dummy, EdgeLabel, LayoutGraph, NodeLabel};

pub fn run(g: &mut LayoutGraph) -> Result<()> {
    g.graph_mut().dummy_chains.clear();
    for e in g.edge_keys() {
        normalize_edge(g, e)?;
    }
    Ok(())
}

fn rank_of(g: &LayoutGraph, v: &str) -> Result<i32> {
    g.node(v)
        .and_then(|n| n.rank)
        .ok_or_else(|| Error::MissingRank { node: v.to_string() })
}

fn normalize_edge(g: &mut LayoutGraph, e: EdgeKey) -> Result<()> {
    let v_rank = rank_of(g, &e.v)?;
    let w_rank = rank_of(g, &e.w)?;
    if w_rank <= v_rank + 1 {
        return Ok(());
    }

    let Some(mut label) = g.take_edge(&e) else {
        return Ok(());
    };
    label.points.clear();
    let label = Box::new(label);
    let link = || EdgeLabel::with_weight(label.weight);

    let mut prev = e.v.clone();
    for rank in v_rank + 1..w_rank {
        let (dummy, size) = if label.label_rank == Some(rank) {
            let dummy = Dummy::EdgeLabel {
                edge: e.clone(),
                label: label.clone(),
            };
            (dummy, (label.width, label.height))
        } else {
            let dummy = Dummy::Edge {
                edge: e.clone(),
                label: label.clone(),
            };
            (dummy, (0.0, 0.0))
        };
        let node = NodeLabel {
            rank: Some(rank),
            ..NodeLabel::sized(size.0, size.1)
        };
        let id = add_dummy_node(g, dummy, node, "_d");

        g.set_edge_named(prev.as_str(), id.as_str(), e.name.as_deref(), Some(link()));
        if rank == v_rank + 1 {
            g.graph_mut().dummy_chains.push(id.clone());
        }
        prev = id;
    }
    g.set_edge_named(prev, e.w.as_str(), e.name.as_deref(), Some(link()));
    Ok(())
}

/// Removes every dummy chain and restores the original edge, whose `points` become the dummy
/// positions in chain order. The label dummy also supplies the edge label's position and size.
pub fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for start in chains {
        let Some((edge, mut label)) = g
            .node(&start)
            .and_then(|n| n.dummy.as_ref())
            .and_then(|d| Some((d.edge()?.clone(), d.edge_label()?.clone())))
        else {
            continue;
        };

        let mut v = start;
        loop {
            let Some(node) = g.node(&v) else {
                break;
            };
            if !matches!(node.dummy, Some(Dummy::Edge { .. } | Dummy::EdgeLabel { .. })) {
                break;
            }
            if let Some(p) = node.center() {
                label.points.push(p);
                if matches!(node.dummy, Some(Dummy::EdgeLabel { .. })) {
                    label.x = Some(p.x);
                    label.y = Some(p.y);
                    label.width = node.width;
                    label.height = node.height;
                }
            }
            let next = g.successors(&v).first().map(|w| w.to_string());
            g.remove_node(&v);
            match next {
                Some(w) => v = w,
                None => break,
            }
        }

        g.set_edge_key(&edge, label);
    }
}

