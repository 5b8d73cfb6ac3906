//! Traversal and cycle helpers over [`Graph`].
//!
//! Directed graphs are walked along successors; undirected graphs along neighbors.

use super::Graph;
use rustc_hash::{FxHashMap, FxHashSet};

fn navigate<'a, N, E, G>(g: &'a Graph<N, E, G>, v: &str) -> Vec<&'a str>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    if g.is_directed() {
        g.successors(v)
    } else {
        g.neighbors(v)
    }
}

/// Depth-first preorder starting from each of `roots` in turn.
pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    depth_first(g, roots, false)
}

/// Depth-first postorder starting from each of `roots` in turn.
pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    depth_first(g, roots, true)
}

fn depth_first<N, E, G>(g: &Graph<N, E, G>, roots: &[&str], post: bool) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut out: Vec<String> = Vec::new();

    for &root in roots {
        if !g.has_node(root) || visited.contains(root) {
            continue;
        }
        // Each frame holds a node and the neighbors it still has to visit.
        let mut stack: Vec<(&str, std::vec::IntoIter<&str>)> = Vec::new();
        visited.insert(root);
        if !post {
            out.push(root.to_string());
        }
        stack.push((root, navigate(g, root).into_iter()));
        while let Some((v, next)) = stack.last_mut() {
            match next.find(|w| !visited.contains(w)) {
                Some(w) => {
                    visited.insert(w);
                    if !post {
                        out.push(w.to_string());
                    }
                    let rest = navigate(g, w).into_iter();
                    stack.push((w, rest));
                }
                None => {
                    if post {
                        out.push(v.to_string());
                    }
                    stack.pop();
                }
            }
        }
    }
    out
}

/// Weakly connected components, each listed in discovery order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        if !visited.insert(start) {
            continue;
        }
        let mut component: Vec<String> = Vec::new();
        let mut stack: Vec<&str> = vec![start];
        while let Some(v) = stack.pop() {
            component.push(v.to_string());
            let mut adjacent = g.successors(v);
            adjacent.extend(g.predecessors(v));
            for w in adjacent {
                if visited.insert(w) {
                    stack.push(w);
                }
            }
        }
        out.push(component);
    }
    out
}

/// Strongly connected components (Tarjan).
pub fn tarjan<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    struct State<'a> {
        index: usize,
        stack: Vec<&'a str>,
        on_stack: FxHashSet<&'a str>,
        lowlink: FxHashMap<&'a str, usize>,
        indices: FxHashMap<&'a str, usize>,
        out: Vec<Vec<String>>,
    }

    fn connect<'a, N, E, G>(g: &'a Graph<N, E, G>, v: &'a str, st: &mut State<'a>)
    where
        N: Default + 'static,
        E: Default + 'static,
        G: Default,
    {
        st.indices.insert(v, st.index);
        st.lowlink.insert(v, st.index);
        st.index += 1;
        st.stack.push(v);
        st.on_stack.insert(v);

        for w in g.successors(v) {
            if !st.indices.contains_key(w) {
                connect(g, w, st);
                let low = st.lowlink[v].min(st.lowlink[w]);
                st.lowlink.insert(v, low);
            } else if st.on_stack.contains(w) {
                let low = st.lowlink[v].min(st.indices[w]);
                st.lowlink.insert(v, low);
            }
        }

        if st.lowlink[v] == st.indices[v] {
            let mut component: Vec<String> = Vec::new();
            while let Some(w) = st.stack.pop() {
                st.on_stack.remove(w);
                component.push(w.to_string());
                if w == v {
                    break;
                }
            }
            st.out.push(component);
        }
    }

    let mut st = State {
        index: 0,
        stack: Vec::new(),
        on_stack: FxHashSet::default(),
        lowlink: FxHashMap::default(),
        indices: FxHashMap::default(),
        out: Vec::new(),
    };
    for v in g.nodes() {
        if !st.indices.contains_key(v) {
            connect(g, v, &mut st);
        }
    }
    st.out
}

/// Strongly connected components that contain a cycle, including single-node self-loops.
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    tarjan(g)
        .into_iter()
        .filter(|c| c.len() > 1 || !g.out_edges(&c[0], Some(&c[0])).is_empty())
        .collect()
}

pub fn is_acyclic<N, E, G>(g: &Graph<N, E, G>) -> bool
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    find_cycles(g).is_empty()
}
