//! Graph container APIs used by `stratum`.
//!
//! A string-keyed directed graph with optional multi-edge and compound (parent/child) support.
//! Nodes and edges keep their insertion order, which the layout stages rely on for
//! deterministic tie-breaking.

mod graph;

pub use graph::{EdgeKey, Graph, GraphOptions, alg};
