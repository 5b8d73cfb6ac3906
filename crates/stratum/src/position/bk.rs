//! Horizontal coordinate assignment after Brandes and Köpf, "Fast and Simple Horizontal
//! Coordinate Assignment".
//!
//! Four alignments are computed, one per combination of vertical direction (neighbors from
//! the rank above or below) and horizontal direction (layers scanned left to right or right
//! to left). Each alignment groups nodes into vertical blocks and compacts the blocks
//! horizontally. The four results are shifted onto the narrowest one and then balanced.
//!
//! Compaction departs from the paper: blocks form a separation graph that is swept twice, once
//! pushing every block to its smallest feasible coordinate and once pulling it back toward the
//! largest coordinate that keeps every separation.

use crate::util::build_layer_matrix;
use crate::{Align, BorderType, Dummy, LabelPos, LayoutGraph, NodeLabel};
use rustc_hash::{FxHashMap, FxHashSet};

/// Unordered pairs of nodes whose connecting segment should not be aligned, keyed by the
/// smaller id.
pub type Conflicts = FxHashMap<String, FxHashSet<String>>;

/// x coordinate per node.
pub type Xs<'a> = FxHashMap<&'a str, f64>;

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts
        .entry(v.to_string())
        .or_default()
        .insert(w.to_string());
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.get(v).is_some_and(|ws| ws.contains(w))
}

fn merge_conflicts(into: &mut Conflicts, from: Conflicts) {
    for (v, ws) in from {
        into.entry(v).or_default().extend(ws);
    }
}

fn is_dummy(g: &LayoutGraph, v: &str) -> bool {
    g.node(v).is_some_and(NodeLabel::is_dummy)
}

fn order_of(g: &LayoutGraph, v: &str) -> usize {
    g.node(v).and_then(|n| n.order).unwrap_or(0)
}

/// Type-1 conflicts: a segment with at most one dummy endpoint crossing an inner segment
/// (dummy to dummy). Inner segments win, so the other segment is marked.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    for pair in layering.windows(2) {
        let (prev_layer, layer) = (&pair[0], &pair[1]);
        // Order of the previous-layer end of the last inner segment seen.
        let mut k0 = 0usize;
        // Next node of this layer still to be checked.
        let mut scan_pos = 0usize;

        for (i, v) in layer.iter().enumerate() {
            let w = find_other_inner_segment_node(g, v);
            let k1 = w.map_or(prev_layer.len(), |w| order_of(g, w));
            if w.is_none() && i + 1 != layer.len() {
                continue;
            }

            for scan_node in &layer[scan_pos..=i] {
                let scan_is_dummy = is_dummy(g, scan_node);
                for u in g.predecessors(scan_node) {
                    let u_pos = order_of(g, u);
                    if (u_pos < k0 || k1 < u_pos) && !(is_dummy(g, u) && scan_is_dummy) {
                        add_conflict(&mut conflicts, u, scan_node);
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }
    conflicts
}

/// Type-2 conflicts: two inner segments crossing. Segments crossing a subgraph border are
/// marked.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    let scan = |conflicts: &mut Conflicts,
                south: &[String],
                range: std::ops::Range<usize>,
                prev_north_border: Option<usize>,
                next_north_border: usize| {
        for v in &south[range] {
            if !is_dummy(g, v) {
                continue;
            }
            for u in g.predecessors(v) {
                if !is_dummy(g, u) {
                    continue;
                }
                let order = order_of(g, u);
                let before = prev_north_border.is_some_and(|p| order < p);
                if before || order > next_north_border {
                    add_conflict(conflicts, u, v);
                }
            }
        }
    };

    for pair in layering.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        let mut prev_north_pos: Option<usize> = None;
        let mut south_pos = 0usize;

        for (lookahead, v) in south.iter().enumerate() {
            let is_border = g
                .node(v)
                .is_some_and(|n| matches!(n.dummy, Some(Dummy::Border(_))));
            if !is_border {
                continue;
            }
            let Some(&pred) = g.predecessors(v).first() else {
                continue;
            };
            let next_north_pos = order_of(g, pred);
            scan(&mut conflicts, south, south_pos..lookahead, prev_north_pos, next_north_pos);
            south_pos = lookahead;
            prev_north_pos = Some(next_north_pos);
            // Everything past the border is checked against it as well.
            scan(
                &mut conflicts,
                south,
                south_pos..south.len(),
                prev_north_pos,
                north.len(),
            );
        }
    }
    conflicts
}

fn find_other_inner_segment_node<'g>(g: &'g LayoutGraph, v: &str) -> Option<&'g str> {
    if !is_dummy(g, v) {
        return None;
    }
    g.predecessors(v).into_iter().find(|u| is_dummy(g, u))
}

/// Vertical blocks of one alignment. `root` maps a node to the top node of its block and
/// `align` maps it to the next node down the block, wrapping around at the bottom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment<'a> {
    pub root: FxHashMap<&'a str, &'a str>,
    pub align: FxHashMap<&'a str, &'a str>,
}

/// Aligns each node with one of its median neighbors, as given by `neighbors`, unless the
/// segment is in conflict or would cross a block formed earlier in the layer.
pub fn vertical_alignment<'a>(
    layering: &'a [Vec<String>],
    conflicts: &Conflicts,
    neighbors: impl Fn(&str) -> Vec<&'a str>,
) -> Alignment<'a> {
    let mut root: FxHashMap<&'a str, &'a str> = FxHashMap::default();
    let mut align: FxHashMap<&'a str, &'a str> = FxHashMap::default();
    // Positions follow `layering`, which may be a mirrored copy of the graph's own order.
    let mut pos: FxHashMap<&'a str, usize> = FxHashMap::default();

    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v, v);
            align.insert(v, v);
            pos.insert(v, order);
        }
    }

    for layer in layering {
        let mut prev_idx: Option<usize> = None;
        for v in layer {
            let v = v.as_str();
            let mut ws = neighbors(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w).copied().unwrap_or(0));

            let mp = (ws.len() - 1) as f64 / 2.0;
            for &w in &ws[mp.floor() as usize..=mp.ceil() as usize] {
                let w_pos = pos.get(w).copied().unwrap_or(0);
                if align.get(v) == Some(&v)
                    && prev_idx.is_none_or(|p| p < w_pos)
                    && !has_conflict(conflicts, v, w)
                {
                    let w_root = root.get(w).copied().unwrap_or(w);
                    align.insert(w, v);
                    align.insert(v, w_root);
                    root.insert(v, w_root);
                    prev_idx = Some(w_pos);
                }
            }
        }
    }

    Alignment { root, align }
}

/// Minimal separation graph between blocks: nodes are block roots, adjacent blocks are
/// joined by the largest separation any of their members require.
struct BlockGraph<'a> {
    ids: Vec<&'a str>,
    index: FxHashMap<&'a str, usize>,
    ins: Vec<Vec<(usize, f64)>>,
    outs: Vec<Vec<(usize, f64)>>,
}

impl<'a> BlockGraph<'a> {
    fn build(
        g: &LayoutGraph,
        layering: &'a [Vec<String>],
        root: &FxHashMap<&'a str, &'a str>,
        reverse_sep: bool,
    ) -> Self {
        let mut bg = BlockGraph {
            ids: Vec::new(),
            index: FxHashMap::default(),
            ins: Vec::new(),
            outs: Vec::new(),
        };
        let sep = Separation::new(g, reverse_sep);

        for layer in layering {
            let mut prev: Option<&'a str> = None;
            for v in layer {
                let v = v.as_str();
                let v_root = bg.ensure(root.get(v).copied().unwrap_or(v));
                if let Some(u) = prev {
                    let u_root = bg.ensure(root.get(u).copied().unwrap_or(u));
                    bg.raise_edge(u_root, v_root, sep.between(v, u));
                }
                prev = Some(v);
            }
        }
        bg
    }

    fn ensure(&mut self, v: &'a str) -> usize {
        if let Some(&ix) = self.index.get(v) {
            return ix;
        }
        let ix = self.ids.len();
        self.ids.push(v);
        self.index.insert(v, ix);
        self.ins.push(Vec::new());
        self.outs.push(Vec::new());
        ix
    }

    fn raise_edge(&mut self, u: usize, v: usize, sep: f64) {
        if let Some(edge) = self.outs[u].iter_mut().find(|(w, _)| *w == v) {
            edge.1 = edge.1.max(sep);
            if let Some(back) = self.ins[v].iter_mut().find(|(w, _)| *w == u) {
                back.1 = edge.1;
            }
            return;
        }
        let sep = sep.max(0.0);
        self.outs[u].push((v, sep));
        self.ins[v].push((u, sep));
    }

    /// Visits every block after all blocks reachable through `next`, calling `settle` on it.
    fn iterate(&self, next: impl Fn(usize) -> Vec<usize>, mut settle: impl FnMut(usize)) {
        let mut stack: Vec<usize> = (0..self.ids.len()).collect();
        let mut visited = vec![false; self.ids.len()];
        while let Some(elem) = stack.pop() {
            if visited[elem] {
                settle(elem);
            } else {
                visited[elem] = true;
                stack.push(elem);
                stack.extend(next(elem));
            }
        }
    }
}

/// Compacts the blocks of one alignment and returns the x coordinate of every node.
///
/// `reverse_sep` is set for right-to-left alignments, whose layers arrive mirrored.
pub fn horizontal_compaction<'a>(
    g: &LayoutGraph,
    layering: &'a [Vec<String>],
    alignment: &Alignment<'a>,
    reverse_sep: bool,
) -> Xs<'a> {
    let bg = BlockGraph::build(g, layering, &alignment.root, reverse_sep);
    let mut block_xs = vec![0.0f64; bg.ids.len()];
    let skip_border = if reverse_sep {
        BorderType::Left
    } else {
        BorderType::Right
    };

    bg.iterate(
        |v| bg.ins[v].iter().map(|(u, _)| *u).collect(),
        |v| {
            block_xs[v] = bg.ins[v]
                .iter()
                .fold(0.0, |acc: f64, &(u, sep)| acc.max(block_xs[u] + sep));
        },
    );
    bg.iterate(
        |v| bg.outs[v].iter().map(|(w, _)| *w).collect(),
        |v| {
            let min = bg.outs[v]
                .iter()
                .fold(f64::INFINITY, |acc: f64, &(w, sep)| acc.min(block_xs[w] - sep));
            let border = g.node(bg.ids[v]).and_then(NodeLabel::border_type);
            if min.is_finite() && border != Some(skip_border) {
                block_xs[v] = block_xs[v].max(min);
            }
        },
    );

    let mut xs: Xs<'a> = FxHashMap::default();
    for layer in layering {
        for v in layer {
            let v = v.as_str();
            let root = alignment.root.get(v).copied().unwrap_or(v);
            let x = bg.index.get(root).map_or(0.0, |&ix| block_xs[ix]);
            xs.insert(v, x);
        }
    }
    xs
}

/// Required distance between the centers of two neighboring nodes.
struct Separation<'g> {
    g: &'g LayoutGraph,
    nodesep: f64,
    edgesep: f64,
    reverse_sep: bool,
}

impl<'g> Separation<'g> {
    fn new(g: &'g LayoutGraph, reverse_sep: bool) -> Self {
        let label = g.graph();
        Self {
            g,
            nodesep: label.nodesep,
            edgesep: label.edgesep,
            reverse_sep,
        }
    }

    fn between(&self, v: &str, w: &str) -> f64 {
        let empty = NodeLabel::default();
        let v_label = self.g.node(v).unwrap_or(&empty);
        let w_label = self.g.node(w).unwrap_or(&empty);

        let mut sum = v_label.width / 2.0;
        let delta = match v_label.labelpos() {
            Some(LabelPos::L) => -v_label.width / 2.0,
            Some(LabelPos::R) => v_label.width / 2.0,
            _ => 0.0,
        };
        sum += if self.reverse_sep { delta } else { -delta };

        sum += self.gap(v_label) / 2.0;
        sum += self.gap(w_label) / 2.0;

        sum += w_label.width / 2.0;
        let delta = match w_label.labelpos() {
            Some(LabelPos::L) => w_label.width / 2.0,
            Some(LabelPos::R) => -w_label.width / 2.0,
            _ => 0.0,
        };
        sum += if self.reverse_sep { delta } else { -delta };
        sum
    }

    fn gap(&self, node: &NodeLabel) -> f64 {
        if node.is_dummy() {
            self.edgesep
        } else {
            self.nodesep
        }
    }
}

/// The alignment whose nodes span the smallest width, first one on ties.
pub fn find_smallest_width_alignment(
    g: &LayoutGraph,
    xss: &FxHashMap<Align, Xs<'_>>,
) -> Option<Align> {
    let mut best: Option<(Align, f64)> = None;
    for align in Align::ALL {
        let Some(xs) = xss.get(&align) else {
            continue;
        };
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for (v, &x) in xs {
            let half_width = g.node(v).map_or(0.0, |n| n.width / 2.0);
            max = max.max(x + half_width);
            min = min.min(x - half_width);
        }
        let width = max - min;
        if best.is_none_or(|(_, w)| width < w) {
            best = Some((align, width));
        }
    }
    best.map(|(align, _)| align)
}

/// Shifts every alignment onto `align_to`: left alignments share its minimum coordinate and
/// right alignments its maximum.
pub fn align_coordinates(xss: &mut FxHashMap<Align, Xs<'_>>, align_to: Align) {
    let Some((to_min, to_max)) = xss.get(&align_to).and_then(|xs| min_max(xs)) else {
        tracing::warn!(align = %align_to, "position: reference alignment is empty");
        return;
    };

    for align in Align::ALL {
        if align == align_to {
            continue;
        }
        let Some(xs) = xss.get_mut(&align) else {
            continue;
        };
        let Some((min, max)) = min_max(xs) else {
            tracing::warn!(align = %align, "position: alignment is empty");
            continue;
        };
        let delta = if align.is_left() {
            to_min - min
        } else {
            to_max - max
        };
        if delta != 0.0 {
            for x in xs.values_mut() {
                *x += delta;
            }
        }
    }
}

fn min_max(xs: &Xs<'_>) -> Option<(f64, f64)> {
    xs.values().fold(None, |acc, &x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })
}

/// Final x per node: the forced alignment when `align` is given, otherwise the mean of the
/// two middle candidates.
pub fn balance<'a>(xss: &FxHashMap<Align, Xs<'a>>, align: Option<Align>) -> Xs<'a> {
    let Some(ul) = xss.get(&Align::UL) else {
        return FxHashMap::default();
    };
    ul.keys()
        .map(|&v| {
            if let Some(forced) = align {
                let x = xss.get(&forced).and_then(|xs| xs.get(v)).copied();
                return (v, x.unwrap_or(0.0));
            }
            let mut candidates: Vec<f64> = Align::ALL
                .iter()
                .filter_map(|a| xss.get(a).and_then(|xs| xs.get(v)).copied())
                .collect();
            candidates.sort_by(f64::total_cmp);
            let x = match candidates.len() {
                0 => 0.0,
                1 => candidates[0],
                2 => (candidates[0] + candidates[1]) / 2.0,
                _ => (candidates[1] + candidates[2]) / 2.0,
            };
            (v, x)
        })
        .collect()
}

/// Computes the x coordinate of every node of the non-compound graph `g`.
pub fn position_x(g: &LayoutGraph) -> FxHashMap<String, f64> {
    let layering = build_layer_matrix(g);
    let mut conflicts = find_type1_conflicts(g, &layering);
    merge_conflicts(&mut conflicts, find_type2_conflicts(g, &layering));

    let variants: Vec<(Align, Vec<Vec<String>>)> = Align::ALL
        .into_iter()
        .map(|align| {
            let mut adjusted = layering.clone();
            if !align.is_up() {
                adjusted.reverse();
            }
            if !align.is_left() {
                for layer in &mut adjusted {
                    layer.reverse();
                }
            }
            (align, adjusted)
        })
        .collect();

    let mut xss: FxHashMap<Align, Xs<'_>> = FxHashMap::default();
    for (align, adjusted) in &variants {
        let alignment = if align.is_up() {
            vertical_alignment(adjusted, &conflicts, |v| g.predecessors(v))
        } else {
            vertical_alignment(adjusted, &conflicts, |v| g.successors(v))
        };
        let mut xs = horizontal_compaction(g, adjusted, &alignment, !align.is_left());
        if !align.is_left() {
            for x in xs.values_mut() {
                *x = -*x;
            }
        }
        xss.insert(*align, xs);
    }

    if let Some(smallest) = find_smallest_width_alignment(g, &xss) {
        align_coordinates(&mut xss, smallest);
    }
    balance(&xss, g.graph().align)
        .into_iter()
        .map(|(v, x)| (v.to_string(), x))
        .collect()
}
