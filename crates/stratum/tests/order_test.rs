use stratum::graphlib::{Graph, GraphOptions};
use stratum::order::{self, OrderOptions, cross_count, init_order};
use stratum::util::build_layer_matrix;
use stratum::{EdgeLabel, LayoutGraph, NodeLabel};

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

fn layers(vs: &[&[&str]]) -> Vec<Vec<String>> {
    vs.iter()
        .map(|layer| layer.iter().map(|v| v.to_string()).collect())
        .collect()
}

#[test]
fn cross_count_is_zero_for_trivial_layerings() {
    let g = new_graph();
    assert_eq!(cross_count(&g, &[]), 0.0);
    assert_eq!(cross_count(&g, &layers(&[&["a", "b"]])), 0.0);
}

#[test]
fn cross_count_of_parallel_edges_is_zero() {
    let mut g = new_graph();
    g.set_edge("a1", "b1");
    g.set_edge("a2", "b2");
    assert_eq!(cross_count(&g, &layers(&[&["a1", "a2"], &["b1", "b2"]])), 0.0);
}

#[test]
fn cross_count_finds_a_crossing() {
    let mut g = new_graph();
    g.set_edge("a1", "b2");
    g.set_edge("a2", "b1");
    assert_eq!(cross_count(&g, &layers(&[&["a1", "a2"], &["b1", "b2"]])), 1.0);
}

#[test]
fn cross_count_multiplies_weights() {
    let mut g = new_graph();
    g.set_edge_with_label("a1", "b2", EdgeLabel::with_weight(2.0));
    g.set_edge_with_label("a2", "b1", EdgeLabel::with_weight(3.0));
    assert_eq!(cross_count(&g, &layers(&[&["a1", "a2"], &["b1", "b2"]])), 6.0);
}

#[test]
fn cross_count_sums_over_layer_pairs() {
    let mut g = new_graph();
    g.set_path(&["a1", "b1", "c1"]);
    g.set_path(&["a2", "b2", "c2"]);
    let layering = layers(&[&["a1", "a2"], &["b2", "b1"], &["c1", "c2"]]);
    assert_eq!(cross_count(&g, &layering), 2.0);
}

#[test]
fn cross_count_ignores_shared_endpoints() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    g.set_path(&["d", "e", "c"]);
    g.set_path(&["a", "f", "i"]);
    g.set_edge("a", "e");

    let layering = layers(&[&["a", "d"], &["b", "e", "f"], &["c", "i"]]);
    assert_eq!(cross_count(&g, &layering), 1.0);
    let layering = layers(&[&["d", "a"], &["e", "b", "f"], &["c", "i"]]);
    assert_eq!(cross_count(&g, &layering), 0.0);
}

#[test]
fn init_order_follows_a_depth_first_walk() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(1));
    g.set_node("c", ranked(2));
    g.set_node("d", ranked(2));
    g.set_node("e", ranked(1));
    g.set_path(&["a", "b", "c"]);
    g.set_edge("b", "d");
    g.set_edge("a", "e");

    assert_eq!(init_order(&g), layers(&[&["a"], &["b", "e"], &["c", "d"]]));
}

#[test]
fn init_order_skips_subgraphs() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("sg1", NodeLabel::default());
    g.set_parent("a", "sg1");

    assert_eq!(init_order(&g), layers(&[&["a"]]));
}

#[test]
fn init_order_of_unranked_graph_is_empty() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel::default());
    assert!(init_order(&g).is_empty());
}

/// `b -> e` and `c -> d` cross in the depth-first order.
fn crossing_graph() -> LayoutGraph {
    let mut g = new_graph();
    for v in ["a", "b", "c"] {
        g.set_node(v, ranked(0));
    }
    for v in ["d", "e"] {
        g.set_node(v, ranked(1));
    }
    g.set_edge("a", "d");
    g.set_edge("b", "e");
    g.set_edge("c", "d");
    g
}

#[test]
fn order_removes_avoidable_crossings() {
    let mut g = crossing_graph();
    order::order(&mut g);

    let layering = build_layer_matrix(&g);
    assert_eq!(cross_count(&g, &layering), 0.0);
    assert_eq!(layering, layers(&[&["a", "c", "b"], &["d", "e"]]));
}

#[test]
fn disabling_the_heuristic_keeps_the_initial_order() {
    let mut g = crossing_graph();
    order::order_with(
        &mut g,
        OrderOptions {
            disable_optimal_order_heuristic: true,
            ..Default::default()
        },
    );

    let layering = build_layer_matrix(&g);
    assert_eq!(layering, layers(&[&["a", "b", "c"], &["d", "e"]]));
    assert_eq!(cross_count(&g, &layering), 1.0);
}

#[test]
fn order_adds_no_crossings_to_a_tree() {
    let mut g = new_graph();
    g.set_node("a", ranked(1));
    for v in ["b", "e"] {
        g.set_node(v, ranked(2));
    }
    for v in ["c", "d", "f"] {
        g.set_node(v, ranked(3));
    }
    g.set_path(&["a", "b", "c"]);
    g.set_edge("b", "d");
    g.set_path(&["a", "e", "f"]);

    order::order(&mut g);
    let layering = build_layer_matrix(&g);
    assert_eq!(cross_count(&g, &layering), 0.0);
}

#[test]
fn order_assigns_a_permutation_per_rank() {
    let mut g = crossing_graph();
    order::order(&mut g);

    let mut orders: Vec<(i32, usize)> = g
        .node_labels()
        .filter_map(|(_, n)| Some((n.rank?, n.order?)))
        .collect();
    orders.sort();
    assert_eq!(orders, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
}
