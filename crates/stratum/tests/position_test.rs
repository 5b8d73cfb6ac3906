use stratum::graphlib::{Graph, GraphOptions};
use stratum::position::{position, position_y};
use stratum::{Error, GraphLabel, LayoutGraph, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel {
        ranksep: 50.0,
        nodesep: 50.0,
        edgesep: 10.0,
        ..Default::default()
    });
    g
}

fn node(rank: i32, order: usize, width: f64, height: f64) -> NodeLabel {
    NodeLabel {
        width,
        height,
        rank: Some(rank),
        order: Some(order),
        ..Default::default()
    }
}

#[test]
fn ranks_stack_by_their_tallest_node() {
    let mut g = new_graph();
    g.set_node("a", node(0, 0, 10.0, 100.0));
    g.set_node("b", node(0, 1, 10.0, 60.0));
    g.set_node("c", node(1, 0, 10.0, 80.0));

    position_y(&mut g);
    assert_eq!(g.node("a").and_then(|n| n.y), Some(50.0));
    assert_eq!(g.node("b").and_then(|n| n.y), Some(50.0));
    assert_eq!(g.node("c").and_then(|n| n.y), Some(100.0 + 50.0 + 40.0));
}

#[test]
fn empty_ranks_still_add_separation() {
    let mut g = new_graph();
    g.set_node("a", node(0, 0, 10.0, 20.0));
    g.set_node("b", node(2, 0, 10.0, 20.0));

    position_y(&mut g);
    assert_eq!(g.node("b").and_then(|n| n.y), Some(20.0 + 50.0 + 50.0 + 10.0));
}

#[test]
fn positions_every_node() {
    let mut g = new_graph();
    g.set_node("a", node(0, 0, 50.0, 100.0));
    g.set_node("b", node(1, 0, 75.0, 80.0));
    g.set_node("c", node(1, 1, 40.0, 20.0));
    g.set_edge("a", "b");
    g.set_edge("a", "c");

    position(&mut g).unwrap();
    for v in ["a", "b", "c"] {
        let n = g.node(v).cloned().unwrap_or_default();
        assert!(n.x.is_some() && n.y.is_some(), "{v} not positioned");
    }
    let x = |v: &str| g.node(v).and_then(|n| n.x).unwrap_or_default();
    assert_eq!(x("c") - x("b"), 37.5 + 50.0 + 20.0);
    assert_eq!(g.node("b").and_then(|n| n.y), Some(190.0));
}

#[test]
fn subgraph_nodes_are_not_positioned() {
    let mut g = new_graph();
    g.set_node("a", node(0, 0, 10.0, 10.0));
    g.set_node("sg", NodeLabel::default());
    g.set_parent("a", "sg");

    position(&mut g).unwrap();
    assert!(g.node("a").and_then(|n| n.x).is_some());
    assert_eq!(g.node("sg").and_then(|n| n.x), None);
}

#[test]
fn unranked_node_is_an_error() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel::default());

    let err = position(&mut g).unwrap_err();
    assert!(matches!(err, Error::MissingRank { ref node } if node == "a"));
}
