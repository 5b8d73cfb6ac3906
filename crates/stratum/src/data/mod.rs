//! Supporting data structures for the feedback arc set heuristic.

pub mod bucket_queue;
pub mod list;
