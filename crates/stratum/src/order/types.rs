use crate::graphlib::Graph;

/// Which edges of a rank feed the barycenters: `InEdges` looks at the rank above, `OutEdges`
/// at the rank below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    InEdges,
    OutEdges,
}

/// Graph of one rank plus the neighboring nodes its barycenters are computed from.
///
/// Edges always point from the neighboring rank into this rank, and the hierarchy mirrors the
/// subgraphs spanning the rank under a synthetic root.
pub type LayerGraph = Graph<LayerNode, LayerEdge, LayerGraphLabel>;

/// Sibling ordering constraints between subgraphs, learned from previous sweeps.
pub type ConstraintGraph = Graph<(), (), ()>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGraphLabel {
    pub root: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerNode {
    pub order: Option<usize>,
    /// For subgraphs: the left border node at this rank.
    pub border_left: Option<String>,
    /// For subgraphs: the right border node at this rank.
    pub border_right: Option<String>,
}

impl LayerNode {
    pub fn at(order: usize) -> Self {
        Self {
            order: Some(order),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerEdge {
    pub weight: f64,
}

impl Default for LayerEdge {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

/// A movable node and the weighted mean order of its neighbors in the adjacent rank.
#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// A run of nodes that must stay together, as produced by conflict resolution.
///
/// `i` is the smallest original index among the merged entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub vs: Vec<String>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}
