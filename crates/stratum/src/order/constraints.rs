use super::types::{ConstraintGraph, LayerGraph};
use rustc_hash::FxHashMap;

/// Records, for the freshly sorted rank `vs`, which sibling subgraph came first.
///
/// Walking up from each node, the first ancestor level where the node's ancestor differs from
/// the previously seen ancestor at that level yields the constraint `previous -> current`.
pub fn add_subgraph_constraints(g: &LayerGraph, cg: &mut ConstraintGraph, vs: &[String]) {
    let mut prev: FxHashMap<&str, &str> = FxHashMap::default();
    let mut root_prev: Option<&str> = None;

    for v in vs {
        let mut child = g.parent(v);
        while let Some(c) = child {
            let parent = g.parent(c);
            let prev_child = match parent {
                Some(p) => prev.insert(p, c),
                None => root_prev.replace(c),
            };
            if let Some(pc) = prev_child.filter(|pc| *pc != c) {
                cg.set_edge(pc, c);
                break;
            }
            child = parent;
        }
    }
}
