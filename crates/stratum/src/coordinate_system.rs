//! Rank direction handling.
//!
//! The stages in between always lay out top to bottom. For horizontal directions node and label
//! sizes are swapped beforehand, and afterwards the axes are flipped back into place.

use crate::{LayoutGraph, RankDir};

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        std::mem::swap(&mut node.width, &mut node.height);
        // Self-loops are parked on their node during ordering.
        for se in &mut node.self_edges {
            std::mem::swap(&mut se.label.width, &mut se.label.height);
        }
    }
    for (_, label) in g.edge_labels_mut() {
        std::mem::swap(&mut label.width, &mut label.height);
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        node.y = node.y.map(|y| -y);
    }
    for (_, label) in g.edge_labels_mut() {
        for p in &mut label.points {
            p.y = -p.y;
        }
        label.y = label.y.map(|y| -y);
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        std::mem::swap(&mut node.x, &mut node.y);
    }
    for (_, label) in g.edge_labels_mut() {
        for p in &mut label.points {
            std::mem::swap(&mut p.x, &mut p.y);
        }
        std::mem::swap(&mut label.x, &mut label.y);
    }
}
