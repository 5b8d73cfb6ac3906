//! Greedy feedback arc set selection (Eades, Lin and Smyth), adapted to weighted edges.
//!
//! Used by [`acyclic`](crate::acyclic) when the graph label selects [`Acyclicer::Greedy`].
//!
//! [`Acyclicer::Greedy`]: crate::Acyclicer::Greedy

use crate::data::bucket_queue::BucketQueue;
use crate::graphlib::{EdgeKey, Graph};
use rustc_hash::FxHashMap;

/// Feedback arc set where every edge weighs 1.
pub fn greedy_fas<N, E, G>(g: &Graph<N, E, G>) -> Vec<EdgeKey>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    greedy_fas_with_weight(g, |_| 1)
}

/// Returns edges of `g` whose reversal makes it acyclic, preferring light edges.
///
/// Parallel edges are aggregated by summing their weights, and an aggregate below 1 counts as 1.
/// When an aggregated pair is chosen, every edge between the two nodes is returned. Self-loops
/// are ignored.
pub fn greedy_fas_with_weight<N, E, G>(
    g: &Graph<N, E, G>,
    weight_fn: impl Fn(&E) -> i64,
) -> Vec<EdgeKey>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let mut state = State::build(g, weight_fn);
    let picked = state.run();

    picked
        .into_iter()
        .flat_map(|(v, w)| g.out_edges(state.ids[v], Some(state.ids[w])))
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Pair {
    v: usize,
    w: usize,
    weight: i64,
}

struct State<'a> {
    ids: Vec<&'a str>,
    arcs: Vec<Pair>,
    in_arcs: Vec<Vec<usize>>,
    out_arcs: Vec<Vec<usize>>,
    alive: Vec<bool>,
    remaining: usize,
    queue: BucketQueue,
}

impl<'a> State<'a> {
    fn build<N, E, G>(g: &'a Graph<N, E, G>, weight_fn: impl Fn(&E) -> i64) -> Self
    where
        N: Default + 'static,
        E: Default + 'static,
        G: Default,
    {
        let ids: Vec<&str> = g.nodes().collect();
        let index: FxHashMap<&str, usize> = ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();

        let mut arcs: Vec<Pair> = Vec::new();
        let mut arc_of: FxHashMap<(usize, usize), usize> = FxHashMap::default();
        let mut in_arcs: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        let mut out_arcs: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        for (key, label) in g.edge_labels() {
            let (Some(&v), Some(&w)) = (index.get(key.v.as_str()), index.get(key.w.as_str()))
            else {
                continue;
            };
            if v == w {
                continue;
            }
            let weight = weight_fn(label);
            let arc = *arc_of.entry((v, w)).or_insert_with(|| {
                arcs.push(Pair { v, w, weight: 0 });
                out_arcs[v].push(arcs.len() - 1);
                in_arcs[w].push(arcs.len() - 1);
                arcs.len() - 1
            });
            arcs[arc].weight += weight;
        }

        // A live arc must weigh at least 1, otherwise its tail would look like a sink.
        let mut in_w: Vec<i64> = vec![0; ids.len()];
        let mut out_w: Vec<i64> = vec![0; ids.len()];
        for arc in &mut arcs {
            arc.weight = arc.weight.max(1);
            out_w[arc.v] += arc.weight;
            in_w[arc.w] += arc.weight;
        }

        let max_in = in_w.iter().copied().max().unwrap_or(0).max(0);
        let max_out = out_w.iter().copied().max().unwrap_or(0).max(0);
        let mut queue = BucketQueue::new((max_out + max_in + 3) as usize, max_in + 1);
        for v in 0..ids.len() {
            let item = queue.push(in_w[v], out_w[v]);
            queue.assign(item);
        }

        Self {
            remaining: ids.len(),
            alive: vec![true; ids.len()],
            ids,
            arcs,
            in_arcs,
            out_arcs,
            queue,
        }
    }

    fn run(&mut self) -> Vec<(usize, usize)> {
        let sinks = 0;
        let sources = self.queue.bucket_count() - 1;
        let mut picked: Vec<(usize, usize)> = Vec::new();

        while self.remaining > 0 {
            while let Some(v) = self.queue.dequeue_back(sinks) {
                self.remove_node(v, None);
            }
            while let Some(v) = self.queue.dequeue_back(sources) {
                self.remove_node(v, None);
            }
            if self.remaining == 0 {
                break;
            }
            let Some(v) = (1..sources)
                .rev()
                .find_map(|bucket| self.queue.dequeue_back(bucket))
            else {
                break;
            };
            self.remove_node(v, Some(&mut picked));
        }
        picked
    }

    /// Drops `v` from the working graph, updating and re-bucketing its live neighbors.
    /// When `picked` is given, the incoming arcs of `v` are recorded as feedback arcs.
    fn remove_node(&mut self, v: usize, mut picked: Option<&mut Vec<(usize, usize)>>) {
        if !self.alive[v] {
            return;
        }
        self.alive[v] = false;
        self.remaining -= 1;

        for &arc in &self.in_arcs[v] {
            let Pair { v: u, weight, .. } = self.arcs[arc];
            if !self.alive[u] {
                continue;
            }
            if let Some(picked) = picked.as_deref_mut() {
                picked.push((u, v));
            }
            self.queue.add_out_weight(u, -weight);
            self.queue.assign(u);
        }
        for &arc in &self.out_arcs[v] {
            let Pair { w, weight, .. } = self.arcs[arc];
            if !self.alive[w] {
                continue;
            }
            self.queue.add_in_weight(w, -weight);
            self.queue.assign(w);
        }
    }
}
