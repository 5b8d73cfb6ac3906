#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot intersect a rectangle from its own center ({x}, {y})")]
    PointInsideRect { x: f64, y: f64 },
    #[error("node `{node}` has no rank")]
    MissingRank { node: String },
    #[error("node `{node}` is not in the graph")]
    MissingNode { node: String },
    #[error("node `{node}` has no position")]
    MissingPosition { node: String },
}

pub type Result<T> = std::result::Result<T, Error>;
