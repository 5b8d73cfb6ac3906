//! The full layout pipeline.
//!
//! [`layout`] copies the caller's graph into a private compound multigraph, runs every stage on
//! the copy and writes the results back, so the caller never sees dummy nodes or the
//! intermediate edge bookkeeping.

use crate::error::Result;
use crate::graphlib::{EdgeKey, Graph, GraphOptions};
use crate::order::OrderOptions;
use crate::util::{self, Rect, time};
use crate::{
    Dummy, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel, Point, acyclic,
    add_border_segments, coordinate_system, nesting_graph, normalize, order,
    parent_dummy_chains, position, rank, self_edges,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Keep the initial depth-first node order instead of minimizing crossings.
    pub disable_optimal_order_heuristic: bool,
}

/// Lays out `g` in place with default options.
///
/// Nodes receive `x`, `y` and `rank`; subgraph nodes also receive `width` and `height`.
/// Edges receive `points` and, when labelled, `x`/`y`. The graph label receives the drawing's
/// `width` and `height`.
pub fn layout(g: &mut LayoutGraph) -> Result<()> {
    layout_with(g, LayoutOptions::default())
}

pub fn layout_with(g: &mut LayoutGraph, options: LayoutOptions) -> Result<()> {
    time("layout", || -> Result<()> {
        let mut layout_graph = time("  buildLayoutGraph", || build_layout_graph(g));
        time("  runLayout", || run_layout(&mut layout_graph, options))?;
        time("  updateInputGraph", || update_input_graph(g, &layout_graph));
        Ok(())
    })
}

fn run_layout(g: &mut LayoutGraph, options: LayoutOptions) -> Result<()> {
    time("    makeSpaceForEdgeLabels", || make_space_for_edge_labels(g));
    time("    removeSelfEdges", || self_edges::remove(g));
    time("    acyclic", || acyclic::run(g));
    time("    nestingGraph.run", || nesting_graph::run(g));
    time("    rank", || rank_non_compound(g));
    time("    injectEdgeLabelProxies", || inject_edge_label_proxies(g));
    time("    removeEmptyRanks", || util::remove_empty_ranks(g));
    time("    nestingGraph.cleanup", || nesting_graph::cleanup(g));
    time("    normalizeRanks", || util::normalize_ranks(g));
    time("    assignRankMinMax", || assign_rank_min_max(g));
    time("    removeEdgeLabelProxies", || remove_edge_label_proxies(g));
    time("    normalize.run", || normalize::run(g))?;
    time("    parentDummyChains", || {
        parent_dummy_chains::parent_dummy_chains(g)
    });
    time("    addBorderSegments", || {
        add_border_segments::add_border_segments(g)
    });
    let order_options = OrderOptions {
        disable_optimal_order_heuristic: options.disable_optimal_order_heuristic,
        ..Default::default()
    };
    time("    order", || order::order_with(g, order_options));
    time("    insertSelfEdges", || self_edges::insert(g));
    time("    adjustCoordinateSystem", || coordinate_system::adjust(g));
    time("    position", || position::position(g))?;
    time("    positionSelfEdges", || self_edges::position(g))?;
    time("    removeBorderNodes", || remove_border_nodes(g));
    time("    normalize.undo", || normalize::undo(g));
    time("    fixupEdgeLabelCoords", || fixup_edge_label_coords(g));
    time("    undoCoordinateSystem", || coordinate_system::undo(g));
    time("    translateGraph", || translate_graph(g));
    time("    assignNodeIntersects", || assign_node_intersects(g))?;
    time("    reversePoints", || reverse_points_for_reversed_edges(g));
    time("    acyclic.undo", || acyclic::undo(g));
    Ok(())
}

/// Copies the input into a compound multigraph holding only the attributes layout reads.
pub fn build_layout_graph(input: &LayoutGraph) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });

    let config = input.graph();
    g.set_graph(GraphLabel {
        rankdir: config.rankdir,
        align: config.align,
        ranker: config.ranker,
        acyclicer: config.acyclicer,
        nodesep: config.nodesep,
        edgesep: config.edgesep,
        ranksep: config.ranksep,
        marginx: config.marginx,
        marginy: config.marginy,
        ..Default::default()
    });

    for (v, node) in input.node_labels() {
        g.set_node(v, NodeLabel::sized(node.width, node.height));
    }
    for v in input.nodes() {
        if let Some(parent) = input.parent(v) {
            g.set_parent(v, parent);
        }
    }
    for (e, edge) in input.edge_labels() {
        g.set_edge_key(
            e,
            EdgeLabel {
                width: edge.width,
                height: edge.height,
                labelpos: edge.labelpos,
                labeloffset: edge.labeloffset,
                minlen: edge.minlen,
                weight: edge.weight,
                ..Default::default()
            },
        );
    }
    g
}

/// Copies coordinates and sizes from the laid out graph back onto the caller's labels.
pub fn update_input_graph(input: &mut LayoutGraph, layout_graph: &LayoutGraph) {
    for (v, label) in input.node_labels_mut() {
        let Some(laid_out) = layout_graph.node(v) else {
            continue;
        };
        label.x = laid_out.x;
        label.y = laid_out.y;
        label.rank = laid_out.rank;
        if layout_graph.has_children(v) {
            label.width = laid_out.width;
            label.height = laid_out.height;
        }
    }

    for (e, label) in input.edge_labels_mut() {
        let Some(laid_out) = layout_graph.edge_by_key(e) else {
            continue;
        };
        label.points = laid_out.points.clone();
        if laid_out.x.is_some() {
            label.x = laid_out.x;
            label.y = laid_out.y;
        }
    }

    let graph = input.graph_mut();
    graph.width = layout_graph.graph().width;
    graph.height = layout_graph.graph().height;
}

/// Ranks a flat copy of `g` and writes the ranks back.
fn rank_non_compound(g: &mut LayoutGraph) {
    let mut flat = util::as_non_compound_graph(g);
    rank::rank(&mut flat);
    for (v, node) in flat.node_labels() {
        if let Some(label) = g.node_mut(v) {
            label.rank = node.rank;
        }
    }
}

/// Doubles every `minlen` so a label can get a rank of its own between the endpoints, and halves
/// `ranksep` to compensate. Labels beside the edge are widened by `labeloffset`.
fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    let graph = g.graph_mut();
    graph.ranksep /= 2.0;
    let horizontal = graph.rankdir.is_horizontal();

    for (_, edge) in g.edge_labels_mut() {
        edge.minlen *= 2;
        if edge.labelpos != LabelPos::C {
            if horizontal {
                edge.height += edge.labeloffset;
            } else {
                edge.width += edge.labeloffset;
            }
        }
    }
}

/// Adds a proxy node halfway along every labelled edge so that empty-rank removal keeps the
/// label's rank.
fn inject_edge_label_proxies(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if !g.edge_by_key(&e).is_some_and(EdgeLabel::has_label) {
            continue;
        }
        let (Some(v_rank), Some(w_rank)) = (
            g.node(&e.v).and_then(|n| n.rank),
            g.node(&e.w).and_then(|n| n.rank),
        ) else {
            continue;
        };
        let label = NodeLabel {
            rank: Some((w_rank - v_rank) / 2 + v_rank),
            ..Default::default()
        };
        util::add_dummy_node(g, Dummy::EdgeProxy { edge: e }, label, "_ep");
    }
}

fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    let proxies: Vec<(String, EdgeKey, Option<i32>)> = g
        .node_labels()
        .filter_map(|(v, n)| match &n.dummy {
            Some(Dummy::EdgeProxy { edge }) => Some((v.to_string(), edge.clone(), n.rank)),
            _ => None,
        })
        .collect();
    for (v, edge, rank) in proxies {
        if let Some(label) = g.edge_mut_by_key(&edge) {
            label.label_rank = rank;
        }
        g.remove_node(&v);
    }
}

/// Records each subgraph's rank span from its top and bottom border nodes.
fn assign_rank_min_max(g: &mut LayoutGraph) {
    let spans: Vec<(String, Option<i32>, Option<i32>)> = g
        .node_labels()
        .filter_map(|(v, n)| {
            let top = n.border_top.as_deref()?;
            let bottom = n.border_bottom.as_deref()?;
            Some((
                v.to_string(),
                g.node(top).and_then(|t| t.rank),
                g.node(bottom).and_then(|b| b.rank),
            ))
        })
        .collect();

    let mut max_rank = 0;
    for (v, min, max) in spans {
        if let Some(node) = g.node_mut(&v) {
            node.min_rank = min;
            node.max_rank = max;
        }
        max_rank = max_rank.max(max.unwrap_or(0));
    }
    g.graph_mut().max_rank = Some(max_rank);
}

/// Sizes every subgraph from its border nodes, then drops the border nodes.
fn remove_border_nodes(g: &mut LayoutGraph) {
    let subgraphs: Vec<String> = g
        .nodes()
        .filter(|v| g.has_children(v))
        .map(str::to_string)
        .collect();

    for v in subgraphs {
        let Some(node) = g.node(&v) else {
            continue;
        };
        let center_of = |id: Option<&String>| id.and_then(|id| g.node(id)).and_then(NodeLabel::center);
        let top = center_of(node.border_top.as_ref());
        let bottom = center_of(node.border_bottom.as_ref());
        let left = center_of(node.border_left.iter().flatten().last());
        let right = center_of(node.border_right.iter().flatten().last());
        let (Some(t), Some(b), Some(l), Some(r)) = (top, bottom, left, right) else {
            continue;
        };

        if let Some(node) = g.node_mut(&v) {
            node.width = (r.x - l.x).abs();
            node.height = (b.y - t.y).abs();
            node.x = Some(l.x + node.width / 2.0);
            node.y = Some(t.y + node.height / 2.0);
        }
    }

    let borders: Vec<String> = g
        .node_labels()
        .filter(|(_, n)| n.border_type().is_some())
        .map(|(v, _)| v.to_string())
        .collect();
    for v in borders {
        g.remove_node(&v);
    }
}

/// Moves side labels off the edge by `labeloffset` and gives back the width added for it.
fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    for (_, edge) in g.edge_labels_mut() {
        let Some(x) = edge.x else {
            continue;
        };
        match edge.labelpos {
            LabelPos::L => {
                edge.width -= edge.labeloffset;
                edge.x = Some(x - edge.width / 2.0 - edge.labeloffset);
            }
            LabelPos::R => {
                edge.width -= edge.labeloffset;
                edge.x = Some(x + edge.width / 2.0 + edge.labeloffset);
            }
            LabelPos::C => {}
        }
    }
}

/// Shifts the drawing so its top-left corner sits at the margins and records its size.
fn translate_graph(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut max_x = 0.0f64;
    let mut min_y = f64::INFINITY;
    let mut max_y = 0.0f64;
    let mut extend = |x: f64, y: f64, w: f64, h: f64| {
        min_x = min_x.min(x - w / 2.0);
        max_x = max_x.max(x + w / 2.0);
        min_y = min_y.min(y - h / 2.0);
        max_y = max_y.max(y + h / 2.0);
    };

    for (_, node) in g.node_labels() {
        if let Some(c) = node.center() {
            extend(c.x, c.y, node.width, node.height);
        }
    }
    for (_, edge) in g.edge_labels() {
        if let (Some(x), Some(y)) = (edge.x, edge.y) {
            extend(x, y, edge.width, edge.height);
        }
    }
    if !min_x.is_finite() {
        min_x = 0.0;
    }
    if !min_y.is_finite() {
        min_y = 0.0;
    }

    let graph = g.graph_mut();
    let (margin_x, margin_y) = (graph.marginx, graph.marginy);
    min_x -= margin_x;
    min_y -= margin_y;
    graph.width = Some(max_x - min_x + margin_x);
    graph.height = Some(max_y - min_y + margin_y);

    for (_, node) in g.node_labels_mut() {
        node.x = node.x.map(|x| x - min_x);
        node.y = node.y.map(|y| y - min_y);
    }
    for (_, edge) in g.edge_labels_mut() {
        for p in &mut edge.points {
            p.x -= min_x;
            p.y -= min_y;
        }
        edge.x = edge.x.map(|x| x - min_x);
        edge.y = edge.y.map(|y| y - min_y);
    }
}

/// Clips both ends of every edge to the border of its endpoint nodes. An edge without bend
/// points runs straight between the two node centers.
fn assign_node_intersects(g: &mut LayoutGraph) -> Result<()> {
    for e in g.edge_keys() {
        let rect_v = g
            .node(&e.v)
            .map(|n| Rect::of_node(&e.v, n))
            .transpose()?;
        let rect_w = g
            .node(&e.w)
            .map(|n| Rect::of_node(&e.w, n))
            .transpose()?;
        let (Some(rect_v), Some(rect_w)) = (rect_v, rect_w) else {
            continue;
        };
        let Some(edge) = g.edge_mut_by_key(&e) else {
            continue;
        };

        let (towards_v, towards_w) = match (edge.points.first(), edge.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (center(rect_w), center(rect_v)),
        };
        let start = util::intersect_rect(rect_v, towards_v)?;
        let end = util::intersect_rect(rect_w, towards_w)?;
        edge.points.insert(0, start);
        edge.points.push(end);
    }
    Ok(())
}

fn center(rect: Rect) -> Point {
    Point {
        x: rect.x,
        y: rect.y,
    }
}

fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    for (_, edge) in g.edge_labels_mut() {
        if edge.reversed {
            edge.points.reverse();
        }
    }
}
