//! Layered graph layout.
//!
//! Assigns every node of a directed (optionally compound) graph a rank, an order within its
//! rank, and `x`/`y` coordinates, and every edge a polyline. The stages can be driven one by one
//! (each module exposes its own entry points) or all at once through [`layout()`].

pub use stratum_graph as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acyclic;
pub mod add_border_segments;
pub mod coordinate_system;
pub mod data;
pub mod error;
pub mod greedy_fas;
pub mod layout;
mod model;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

pub use error::{Error, Result};
pub use layout::{LayoutOptions, layout, layout_with};
pub use model::{
    Acyclicer, Align, BorderType, Dummy, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel,
    Point, RankDir, Ranker, SelfEdge,
};
