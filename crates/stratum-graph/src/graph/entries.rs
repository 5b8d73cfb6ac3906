//! Internal storage entries for [`Graph`](super::Graph).

use super::EdgeKey;

#[derive(Debug, Clone)]
pub(in crate::graph) struct NodeEntry<N> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) label: N,
    /// Slots of incoming edges, in insertion order.
    pub(in crate::graph) in_edges: Vec<usize>,
    /// Slots of outgoing edges, in insertion order.
    pub(in crate::graph) out_edges: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeEntry<E> {
    pub(in crate::graph) key: EdgeKey,
    pub(in crate::graph) label: E,
}
