//! Labels of the spanning tree built by the feasible-tree and network simplex rankers.

use crate::graphlib::Graph;

pub type TightTree = Graph<TreeNodeLabel, TreeEdgeLabel, ()>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNodeLabel {
    /// Smallest postorder number in this node's subtree.
    pub low: usize,
    /// Postorder number of this node.
    pub lim: usize,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeEdgeLabel {
    pub cutvalue: f64,
}
