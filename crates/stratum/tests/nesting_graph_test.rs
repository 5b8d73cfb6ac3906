use stratum::graphlib::{Graph, GraphOptions};
use stratum::util::as_non_compound_graph;
use stratum::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, nesting_graph, rank};

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    })
}

fn root_of(g: &LayoutGraph) -> String {
    g.graph().nesting_root.clone().expect("nesting root")
}

/// Ranks a flat copy of `g` and returns it.
fn ranked_copy(g: &LayoutGraph) -> LayoutGraph {
    let mut flat = as_non_compound_graph(g);
    rank::rank(&mut flat);
    flat
}

fn rank_of(g: &LayoutGraph, v: &str) -> i32 {
    g.node(v).and_then(|n| n.rank).expect("node is ranked")
}

#[test]
fn connects_a_disconnected_graph_through_the_root() {
    let mut g = new_graph();
    g.ensure_node("a");
    g.ensure_node("b");

    nesting_graph::run(&mut g);
    let root = root_of(&g);

    assert!(matches!(g.node(&root).and_then(|n| n.dummy.as_ref()), Some(Dummy::Root)));
    assert_eq!(g.successors(&root), vec!["a", "b"]);
    let edge = g.edge(&root, "a", None).expect("root edge");
    assert_eq!((edge.weight, edge.minlen), (0.0, 1));
    assert_eq!(g.graph().node_rank_factor, Some(1));
}

#[test]
fn adds_border_nodes_around_a_subgraph() {
    let mut g = new_graph();
    g.set_parent("a", "sg1");

    nesting_graph::run(&mut g);
    let sg = g.node("sg1").cloned().expect("subgraph");
    let top = sg.border_top.expect("top border");
    let bottom = sg.border_bottom.expect("bottom border");

    assert_eq!(g.parent(&top), Some("sg1"));
    assert_eq!(g.parent(&bottom), Some("sg1"));
    assert!(g.node(&top).is_some_and(|n| n.border_type().is_some()));

    let down = g.edge(&top, "a", None).expect("top to child");
    let up = g.edge("a", &bottom, None).expect("child to bottom");
    assert!(down.nesting_edge && up.nesting_edge);
    // No original edges, so the nesting weight is 1 and leaves count twice.
    assert_eq!(down.weight, 2.0);

    let flat = ranked_copy(&g);
    assert!(rank_of(&flat, &top) < rank_of(&flat, "a"));
    assert!(rank_of(&flat, "a") < rank_of(&flat, &bottom));
}

#[test]
fn stretches_minlen_by_the_rank_factor() {
    let mut g = new_graph();
    g.set_parent("a", "sg1");
    g.set_edge_with_label("a", "b", EdgeLabel::with_minlen(2));

    nesting_graph::run(&mut g);
    // One level of nesting: factor 2 * 1 + 1.
    assert_eq!(g.graph().node_rank_factor, Some(3));
    assert_eq!(g.edge("a", "b", None).map(|e| e.minlen), Some(6));
}

#[test]
fn nesting_edges_outweigh_every_original_edge() {
    let mut g = new_graph();
    g.set_parent("a", "sg1");
    g.set_parent("b", "sg1");
    g.set_edge_with_label("a", "x", EdgeLabel::with_weight(10.0));
    g.set_edge_with_label("b", "x", EdgeLabel::with_weight(5.0));

    nesting_graph::run(&mut g);
    let top = g.node("sg1").and_then(|n| n.border_top.clone()).unwrap();
    assert_eq!(g.edge(&top, "a", None).map(|e| e.weight), Some(32.0));
}

#[test]
fn nested_subgraphs_stay_inside_their_parent() {
    let mut g = new_graph();
    g.set_parent("sg2", "sg1");
    g.set_parent("a", "sg2");
    g.set_node("b", NodeLabel::default());
    g.set_edge("a", "b");

    nesting_graph::run(&mut g);
    let label = |v: &str| g.node(v).cloned().expect("subgraph");
    let (sg1, sg2) = (label("sg1"), label("sg2"));
    let (top1, bottom1) = (sg1.border_top.unwrap(), sg1.border_bottom.unwrap());
    let (top2, bottom2) = (sg2.border_top.unwrap(), sg2.border_bottom.unwrap());

    assert!(g.edge(&top1, &top2, None).is_some_and(|e| e.nesting_edge));
    assert!(g.edge(&bottom2, &bottom1, None).is_some_and(|e| e.nesting_edge));

    let flat = ranked_copy(&g);
    assert!(rank_of(&flat, &top1) < rank_of(&flat, &top2));
    assert!(rank_of(&flat, &top2) < rank_of(&flat, "a"));
    assert!(rank_of(&flat, "a") < rank_of(&flat, &bottom2));
    assert!(rank_of(&flat, &bottom2) < rank_of(&flat, &bottom1));
}

#[test]
fn cleanup_removes_the_root_and_nesting_edges() {
    let mut g = new_graph();
    g.set_parent("a", "sg1");
    g.set_edge("a", "b");

    nesting_graph::run(&mut g);
    let root = root_of(&g);
    nesting_graph::cleanup(&mut g);

    assert!(!g.has_node(&root));
    assert_eq!(g.graph().nesting_root, None);
    assert!(g.edge_labels().all(|(_, l)| !l.nesting_edge));
    assert!(g.has_edge("a", "b", None));
}
