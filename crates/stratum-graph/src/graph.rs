//! The [`Graph`] container.
//!
//! Nodes and edges live in slot vectors so removal is cheap and iteration keeps insertion order.
//! Removed slots are tombstoned and compacted once they outnumber the live entries.

pub mod alg;
mod edge_key;
mod entries;
mod options;

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry};
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;
type LabelFn<T> = Arc<dyn Fn() -> T + Send + Sync>;

const COMPACT_MIN_TOMBSTONES: usize = 64;
const DEDUP_LINEAR_LIMIT: usize = 16;

#[derive(Clone)]
pub struct Graph<N, E, G> {
    options: GraphOptions,

    graph_label: G,
    default_node_label: LabelFn<N>,
    default_edge_label: LabelFn<E>,

    nodes: Vec<Option<NodeEntry<N>>>,
    node_index: HashMap<String, usize>,

    edges: Vec<Option<EdgeEntry<E>>>,
    edge_index: HashMap<EdgeKey, usize>,

    parent: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,
}

impl<N, E, G> Default for Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<N, E, G> fmt::Debug for Graph<N, E, G>
where
    N: fmt::Debug,
    E: fmt::Debug,
    G: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("graph", &self.graph_label)
            .field(
                "nodes",
                &self
                    .nodes
                    .iter()
                    .flatten()
                    .map(|n| (&n.id, &n.label))
                    .collect::<Vec<_>>(),
            )
            .field(
                "edges",
                &self
                    .edges
                    .iter()
                    .flatten()
                    .map(|e| (&e.key, &e.label))
                    .collect::<Vec<_>>(),
            )
            .field("parent", &self.parent)
            .finish()
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Arc::new(N::default),
            default_edge_label: Arc::new(E::default),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            parent: HashMap::default(),
            children: HashMap::default(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Arc::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Arc::new(f);
        self
    }

    // ---- nodes ----

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Inserts `id` with `label`, replacing the label if the node already exists.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(id.as_str()) {
            if let Some(entry) = self.nodes[ix].as_mut() {
                entry.label = label;
            }
            return self;
        }
        self.insert_node(id, label);
        self
    }

    /// Inserts `id` with the default node label unless it already exists.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.node_index.contains_key(id.as_str()) {
            let label = (self.default_node_label)();
            self.insert_node(id, label);
        }
        self
    }

    fn insert_node(&mut self, id: String, label: N) {
        let ix = self.nodes.len();
        self.node_index.insert(id.clone(), ix);
        self.nodes.push(Some(NodeEntry {
            id,
            label,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }));
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.entry(id).map(|n| &n.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let ix = *self.node_index.get(id)?;
        self.nodes[ix].as_mut().map(|n| &mut n.label)
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().flatten().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes().map(str::to_string).collect()
    }

    pub fn node_labels(&self) -> impl Iterator<Item = (&str, &N)> {
        self.nodes.iter().flatten().map(|n| (n.id.as_str(), &n.label))
    }

    pub fn node_labels_mut(&mut self) -> impl Iterator<Item = (&str, &mut N)> {
        self.nodes
            .iter_mut()
            .flatten()
            .map(|n| (n.id.as_str(), &mut n.label))
    }

    /// Nodes without incoming edges.
    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.in_edges.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Nodes without outgoing edges.
    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.out_edges.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Removes `id` together with its incident edges. Children are moved to the root.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(ix) = self.node_index.remove(id) else {
            return false;
        };
        let Some(entry) = self.nodes[ix].take() else {
            return false;
        };

        let mut incident: Vec<usize> = entry.in_edges;
        incident.extend(entry.out_edges);
        for edge_ix in incident {
            self.remove_edge_at(edge_ix);
        }

        if self.options.compound {
            self.detach_from_parent(id);
            if let Some(children) = self.children.remove(id) {
                for child in children {
                    self.parent.remove(&child);
                }
            }
        }

        self.maybe_compact();
        true
    }

    // ---- edges ----

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Edge keys in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().flatten().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges().cloned().collect()
    }

    pub fn edge_labels(&self) -> impl Iterator<Item = (&EdgeKey, &E)> {
        self.edges.iter().flatten().map(|e| (&e.key, &e.label))
    }

    pub fn edge_labels_mut(&mut self) -> impl Iterator<Item = (&EdgeKey, &mut E)> {
        self.edges
            .iter_mut()
            .flatten()
            .map(|e| (&e.key, &mut e.label))
    }

    /// Creates the edge `v -> w` with the default label unless it already exists.
    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    /// Creates or updates an edge. Missing endpoints are created with the default node label.
    ///
    /// `label: None` keeps the label of an existing edge and uses the default label for a new
    /// one. The name is ignored on simple graphs.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let key = self.canonical_key(v.into(), w.into(), name.map(Into::into));
        if let Some(&ix) = self.edge_index.get(&key) {
            if let (Some(label), Some(entry)) = (label, self.edges[ix].as_mut()) {
                entry.label = label;
            }
            return self;
        }

        self.ensure_node(key.v.clone());
        self.ensure_node(key.w.clone());
        let label = label.unwrap_or_else(|| (self.default_edge_label)());

        let ix = self.edges.len();
        if let Some(&v_ix) = self.node_index.get(key.v.as_str()) {
            if let Some(n) = self.nodes[v_ix].as_mut() {
                n.out_edges.push(ix);
            }
        }
        if let Some(&w_ix) = self.node_index.get(key.w.as_str()) {
            if let Some(n) = self.nodes[w_ix].as_mut() {
                n.in_edges.push(ix);
            }
        }
        self.edge_index.insert(key.clone(), ix);
        self.edges.push(Some(EdgeEntry { key, label }));
        self
    }

    pub fn set_edge_key(&mut self, key: &EdgeKey, label: E) -> &mut Self {
        self.set_edge_named(key.v.clone(), key.w.clone(), key.name.clone(), Some(label))
    }

    /// Connects consecutive nodes of `path` with default-labelled edges.
    pub fn set_path(&mut self, path: &[&str]) -> &mut Self {
        for pair in path.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_index.contains_key(&self.key_view(v, w, name))
    }

    pub fn has_edge_key(&self, key: &EdgeKey) -> bool {
        self.has_edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let ix = *self.edge_index.get(&self.key_view(v, w, name))?;
        self.edges[ix].as_ref().map(|e| &e.label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let ix = *self.edge_index.get(&self.key_view(v, w, name))?;
        self.edges[ix].as_mut().map(|e| &mut e.label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> bool {
        let Some(ix) = self.edge_index.get(&self.key_view(v, w, name)).copied() else {
            return false;
        };
        self.remove_edge_at(ix);
        self.maybe_compact();
        true
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> bool {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    /// Removes the edge and returns its label.
    pub fn take_edge(&mut self, key: &EdgeKey) -> Option<E> {
        let ix = self
            .edge_index
            .get(&self.key_view(&key.v, &key.w, key.name.as_deref()))
            .copied()?;
        let label = self.remove_edge_at(ix);
        self.maybe_compact();
        label
    }

    // ---- adjacency ----

    /// Incoming edges of `v`, optionally restricted to those whose tail is `u`.
    ///
    /// Undirected graphs report every incident edge.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        if !self.options.directed {
            return self.node_edges(v, u);
        }
        let Some(entry) = self.entry(v) else {
            return Vec::new();
        };
        self.collect_edges(&entry.in_edges, |k| u.is_none_or(|u| k.v == u))
    }

    /// Outgoing edges of `v`, optionally restricted to those whose head is `w`.
    ///
    /// Undirected graphs report every incident edge.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        if !self.options.directed {
            return self.node_edges(v, w);
        }
        let Some(entry) = self.entry(v) else {
            return Vec::new();
        };
        self.collect_edges(&entry.out_edges, |k| w.is_none_or(|w| k.w == w))
    }

    /// Incoming edges followed by outgoing edges of `v`, optionally restricted to those whose
    /// other endpoint is `w`.
    pub fn node_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(entry) = self.entry(v) else {
            return Vec::new();
        };
        let mut out = self.collect_edges(&entry.in_edges, |k| w.is_none_or(|w| k.v == w));
        out.extend(self.collect_edges(&entry.out_edges, |k| w.is_none_or(|w| k.w == w)));
        out
    }

    pub fn in_degree(&self, v: &str) -> usize {
        self.entry(v).map_or(0, |n| n.in_edges.len())
    }

    pub fn out_degree(&self, v: &str) -> usize {
        self.entry(v).map_or(0, |n| n.out_edges.len())
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(entry) = self.entry(v) else {
            return Vec::new();
        };
        self.distinct_endpoints(entry.in_edges.iter(), |k| k.v.as_str())
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(entry) = self.entry(v) else {
            return Vec::new();
        };
        self.distinct_endpoints(entry.out_edges.iter(), |k| k.w.as_str())
    }

    /// Predecessors followed by successors, without duplicates.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let Some(entry) = self.entry(v) else {
            return Vec::new();
        };
        let incident = entry.in_edges.iter().chain(entry.out_edges.iter());
        self.distinct_endpoints(incident, |k| k.other(v))
    }

    // ---- hierarchy ----

    /// Sets the parent of `child`. Both nodes are created if missing. No-op on non-compound
    /// graphs.
    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        if !self.options.compound {
            return self;
        }
        let child = child.into();
        let parent = parent.into();
        self.ensure_node(child.clone());
        self.ensure_node(parent.clone());
        self.detach_from_parent(&child);
        self.children
            .entry(parent.clone())
            .or_default()
            .push(child.clone());
        self.parent.insert(child, parent);
        self
    }

    /// Moves `child` back to the root of the hierarchy.
    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if self.options.compound {
            self.detach_from_parent(child);
        }
        self
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        self.parent.get(child).map(String::as_str)
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        self.children
            .get(parent)
            .map(|c| c.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Nodes without a parent, in insertion order. Every node on a non-compound graph.
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes()
            .filter(|v| !self.parent.contains_key(*v))
            .collect()
    }

    pub fn has_children(&self, v: &str) -> bool {
        self.children.get(v).is_some_and(|c| !c.is_empty())
    }

    // ---- internals ----

    fn entry(&self, id: &str) -> Option<&NodeEntry<N>> {
        let ix = *self.node_index.get(id)?;
        self.nodes[ix].as_ref()
    }

    fn canonical_key(&self, v: String, w: String, name: Option<String>) -> EdgeKey {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKey { v, w, name }
    }

    fn key_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn collect_edges(&self, slots: &[usize], keep: impl Fn(&EdgeKey) -> bool) -> Vec<EdgeKey> {
        slots
            .iter()
            .filter_map(|&ix| self.edges[ix].as_ref())
            .filter(|e| keep(&e.key))
            .map(|e| e.key.clone())
            .collect()
    }

    fn distinct_endpoints<'a>(
        &'a self,
        slots: impl Iterator<Item = &'a usize>,
        endpoint: impl Fn(&'a EdgeKey) -> &'a str,
    ) -> Vec<&'a str> {
        let mut out: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::default();
        for &ix in slots {
            let Some(e) = self.edges[ix].as_ref() else {
                continue;
            };
            let other = endpoint(&e.key);
            if out.len() < DEDUP_LINEAR_LIMIT {
                if !out.contains(&other) {
                    out.push(other);
                }
                continue;
            }
            if seen.is_empty() {
                seen.extend(out.iter().copied());
            }
            if seen.insert(other) {
                out.push(other);
            }
        }
        out
    }

    fn detach_from_parent(&mut self, child: &str) {
        if let Some(old) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(&old) {
                siblings.retain(|c| c != child);
            }
        }
    }

    /// Unlinks the edge in slot `ix` from both endpoints. Does not compact.
    fn remove_edge_at(&mut self, ix: usize) -> Option<E> {
        let entry = self.edges.get_mut(ix)?.take()?;
        self.edge_index.remove(&entry.key);
        if let Some(&v_ix) = self.node_index.get(entry.key.v.as_str()) {
            if let Some(n) = self.nodes[v_ix].as_mut() {
                n.out_edges.retain(|&e| e != ix);
            }
        }
        if let Some(&w_ix) = self.node_index.get(entry.key.w.as_str()) {
            if let Some(n) = self.nodes[w_ix].as_mut() {
                n.in_edges.retain(|&e| e != ix);
            }
        }
        Some(entry.label)
    }

    fn maybe_compact(&mut self) {
        let dead_edges = self.edges.len() - self.edge_index.len();
        if dead_edges >= COMPACT_MIN_TOMBSTONES && dead_edges > self.edge_index.len() {
            self.compact_edges();
        }
        let dead_nodes = self.nodes.len() - self.node_index.len();
        if dead_nodes >= COMPACT_MIN_TOMBSTONES && dead_nodes > self.node_index.len() {
            self.compact_nodes();
        }
    }

    fn compact_edges(&mut self) {
        let mut remap = vec![usize::MAX; self.edges.len()];
        let mut kept: Vec<Option<EdgeEntry<E>>> = Vec::with_capacity(self.edge_index.len());
        for (old, slot) in std::mem::take(&mut self.edges).into_iter().enumerate() {
            if let Some(entry) = slot {
                remap[old] = kept.len();
                if let Some(ix) = self.edge_index.get_mut(&entry.key) {
                    *ix = kept.len();
                }
                kept.push(Some(entry));
            }
        }
        self.edges = kept;
        for node in self.nodes.iter_mut().flatten() {
            for e in node.in_edges.iter_mut().chain(node.out_edges.iter_mut()) {
                *e = remap[*e];
            }
        }
    }

    fn compact_nodes(&mut self) {
        let mut kept: Vec<Option<NodeEntry<N>>> = Vec::with_capacity(self.node_index.len());
        for entry in std::mem::take(&mut self.nodes).into_iter().flatten() {
            if let Some(ix) = self.node_index.get_mut(entry.id.as_str()) {
                *ix = kept.len();
            }
            kept.push(Some(entry));
        }
        self.nodes = kept;
    }
}
