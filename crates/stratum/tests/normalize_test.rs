use stratum::graphlib::{EdgeKey, Graph, GraphOptions};
use stratum::{Dummy, EdgeLabel, Error, LayoutGraph, NodeLabel, Point, normalize};

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    })
}

fn ranked(rank: i32) -> NodeLabel {
    NodeLabel {
        rank: Some(rank),
        ..Default::default()
    }
}

#[test]
fn leaves_short_edges_alone() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(1));
    g.set_edge("a", "b");

    normalize::run(&mut g).unwrap();
    assert_eq!(g.node_count(), 2);
    assert!(g.has_edge("a", "b", None));
    assert!(g.graph().dummy_chains.is_empty());
}

#[test]
fn splits_a_long_edge_into_unit_segments() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(3));
    g.set_edge_with_label("a", "b", EdgeLabel::with_weight(2.0));

    normalize::run(&mut g).unwrap();

    assert!(!g.has_edge("a", "b", None));
    assert_eq!(g.graph().dummy_chains, vec!["_d1".to_string()]);
    assert_eq!(g.successors("a"), vec!["_d1"]);
    assert_eq!(g.successors("_d1"), vec!["_d2"]);
    assert_eq!(g.successors("_d2"), vec!["b"]);
    assert_eq!(g.node("_d1").and_then(|n| n.rank), Some(1));
    assert_eq!(g.node("_d2").and_then(|n| n.rank), Some(2));
    for e in g.edge_keys() {
        assert_eq!(g.edge_by_key(&e).map(|l| l.weight), Some(2.0));
    }
    assert!(matches!(
        g.node("_d1").and_then(|n| n.dummy.as_ref()),
        Some(Dummy::Edge { edge, .. }) if *edge == EdgeKey::unnamed("a", "b")
    ));
}

#[test]
fn keeps_the_edge_name_on_every_segment() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_edge_named("a", "b", Some("x"), None);

    normalize::run(&mut g).unwrap();
    assert!(g.has_edge("a", "_d1", Some("x")));
    assert!(g.has_edge("_d1", "b", Some("x")));
}

#[test]
fn puts_the_label_on_its_rank() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(4));
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            width: 20.0,
            height: 10.0,
            label_rank: Some(2),
            ..Default::default()
        },
    );

    normalize::run(&mut g).unwrap();

    let label_dummy = g
        .node_labels()
        .find(|(_, n)| matches!(n.dummy, Some(Dummy::EdgeLabel { .. })))
        .map(|(_, n)| n.clone())
        .expect("label dummy");
    assert_eq!(label_dummy.rank, Some(2));
    assert_eq!((label_dummy.width, label_dummy.height), (20.0, 10.0));

    let plain: Vec<_> = g
        .node_labels()
        .filter(|(_, n)| matches!(n.dummy, Some(Dummy::Edge { .. })))
        .map(|(_, n)| (n.width, n.height))
        .collect();
    assert_eq!(plain, vec![(0.0, 0.0), (0.0, 0.0)]);
}

#[test]
fn fails_on_an_unranked_endpoint() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_edge("a", "b");

    assert!(matches!(
        normalize::run(&mut g),
        Err(Error::MissingRank { node }) if node == "b"
    ));
}

#[test]
fn undo_turns_the_chain_back_into_points() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(3));
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            width: 20.0,
            height: 10.0,
            label_rank: Some(2),
            minlen: 3,
            ..Default::default()
        },
    );

    normalize::run(&mut g).unwrap();
    for (i, v) in ["_d1", "_d2"].into_iter().enumerate() {
        let node = g.node_mut(v).unwrap();
        node.x = Some(5.0 * (i + 1) as f64);
        node.y = Some(10.0 * (i + 1) as f64);
    }
    normalize::undo(&mut g);

    assert_eq!(g.node_count(), 2);
    let label = g.edge("a", "b", None).expect("edge is restored");
    assert_eq!(
        label.points,
        vec![Point { x: 5.0, y: 10.0 }, Point { x: 10.0, y: 20.0 }]
    );
    assert_eq!((label.x, label.y), (Some(10.0), Some(20.0)));
    assert_eq!((label.width, label.height), (20.0, 10.0));
    assert_eq!(label.minlen, 3);
    assert!(g.graph().dummy_chains.is_empty());
}
