use stratum::graphlib::{Graph, GraphOptions};
use stratum::{BorderType, LayoutGraph, NodeLabel, add_border_segments::add_border_segments};

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    })
}

fn subgraph(min_rank: i32, max_rank: i32) -> NodeLabel {
    NodeLabel {
        min_rank: Some(min_rank),
        max_rank: Some(max_rank),
        ..Default::default()
    }
}

#[test]
fn leaves_plain_nodes_alone() {
    let mut g = new_graph();
    g.set_node(
        "a",
        NodeLabel {
            rank: Some(0),
            ..Default::default()
        },
    );

    add_border_segments(&mut g);
    assert_eq!(g.node_count(), 1);
}

#[test]
fn adds_one_border_pair_per_rank() {
    let mut g = new_graph();
    g.set_node("sg", subgraph(1, 2));
    g.set_parent("a", "sg");

    add_border_segments(&mut g);
    let sg = g.node("sg").cloned().unwrap();
    assert_eq!(sg.border_left.len(), 3);
    assert_eq!(sg.border_left[0], None);
    assert_eq!(sg.border_right[0], None);

    for rank in 1..=2 {
        for (side, chain) in [
            (BorderType::Left, &sg.border_left),
            (BorderType::Right, &sg.border_right),
        ] {
            let v = chain[rank].clone().expect("border node");
            let node = g.node(&v).unwrap();
            assert_eq!(node.rank, Some(rank as i32));
            assert_eq!(node.border_type(), Some(side));
            assert_eq!((node.width, node.height), (0.0, 0.0));
            assert_eq!(g.parent(&v), Some("sg"));
        }
    }
}

#[test]
fn chains_borders_from_rank_to_rank() {
    let mut g = new_graph();
    g.set_node("sg", subgraph(0, 2));
    g.set_parent("a", "sg");

    add_border_segments(&mut g);
    let sg = g.node("sg").cloned().unwrap();
    for chain in [&sg.border_left, &sg.border_right] {
        let ids: Vec<String> = chain.iter().flatten().cloned().collect();
        assert_eq!(ids.len(), 3);
        for pair in ids.windows(2) {
            let edge = g.edge(&pair[0], &pair[1], None).expect("chain edge");
            assert_eq!(edge.weight, 1.0);
        }
    }
}

#[test]
fn handles_nested_subgraphs() {
    let mut g = new_graph();
    g.set_node("sg1", subgraph(0, 3));
    g.set_node("sg2", subgraph(1, 2));
    g.set_parent("sg2", "sg1");
    g.set_parent("a", "sg2");

    add_border_segments(&mut g);
    let inner = g.node("sg2").cloned().unwrap();
    let outer = g.node("sg1").cloned().unwrap();
    assert_eq!(inner.border_left.iter().flatten().count(), 2);
    assert_eq!(outer.border_left.iter().flatten().count(), 4);

    let inner_left = inner.border_left[1].clone().unwrap();
    assert_eq!(g.parent(&inner_left), Some("sg2"));
}
