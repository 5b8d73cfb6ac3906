//! Graph configuration options.

/// Fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// When false, `v -> w` and `w -> v` name the same edge.
    pub directed: bool,
    /// Allows several edges between one pair of nodes, told apart by name.
    pub multigraph: bool,
    /// Enables the parent/child hierarchy.
    pub compound: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            directed: true,
            multigraph: false,
            compound: false,
        }
    }
}
