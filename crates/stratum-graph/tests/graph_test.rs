use stratum_graph::{EdgeKey, Graph, GraphOptions};

fn multigraph() -> Graph<i32, i32, ()> {
    Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    })
}

#[test]
fn set_edge_creates_missing_endpoints_with_default_labels() {
    let mut g: Graph<i32, i32, ()> = Graph::default();
    g.set_default_node_label(|| 7);
    g.set_edge("a", "b");

    assert_eq!(g.node_ids(), vec!["a", "b"]);
    assert_eq!(g.node("a"), Some(&7));
    assert_eq!(g.edge("a", "b", None), Some(&0));
}

#[test]
fn set_edge_named_keeps_the_existing_label_when_none_is_given() {
    let mut g = multigraph();
    g.set_edge_with_label("a", "b", 3);
    g.set_edge_named("a", "b", None::<String>, None);
    assert_eq!(g.edge("a", "b", None), Some(&3));

    g.set_edge_named("a", "b", None::<String>, Some(4));
    assert_eq!(g.edge("a", "b", None), Some(&4));
}

#[test]
fn simple_graphs_ignore_edge_names() {
    let mut g: Graph<(), i32, ()> = Graph::default();
    g.set_edge_named("a", "b", Some("x"), Some(1));
    g.set_edge_named("a", "b", Some("y"), Some(2));

    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edge("a", "b", None), Some(&2));
}

#[test]
fn multigraph_edges_are_identified_by_name() {
    let mut g = multigraph();
    g.set_edge_named("a", "b", Some("x"), Some(1));
    g.set_edge_named("a", "b", Some("y"), Some(2));
    g.set_edge_with_label("a", "b", 3);

    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.edge("a", "b", Some("x")), Some(&1));
    assert_eq!(g.edge("a", "b", Some("y")), Some(&2));
    assert_eq!(g.edge("a", "b", None), Some(&3));
    assert_eq!(g.successors("a"), vec!["b"]);
    assert_eq!(g.out_edges("a", None).len(), 3);
}

#[test]
fn edges_keep_insertion_order_after_removals() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_path(&["a", "b", "c", "d"]);
    assert!(g.remove_edge("b", "c", None));
    g.set_edge("b", "c");

    let keys: Vec<(String, String)> = g.edges().map(|e| (e.v.clone(), e.w.clone())).collect();
    assert_eq!(
        keys,
        vec![
            ("a".to_string(), "b".to_string()),
            ("c".to_string(), "d".to_string()),
            ("b".to_string(), "c".to_string()),
        ]
    );
}

#[test]
fn remove_node_removes_incident_edges() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("b", "b");

    assert!(g.remove_node("b"));
    assert!(!g.remove_node("b"));
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 0);
    assert!(g.successors("a").is_empty());
    assert!(g.predecessors("c").is_empty());
}

#[test]
fn take_edge_returns_the_label() {
    let mut g = multigraph();
    g.set_edge_named("a", "b", Some("n"), Some(9));
    let key = EdgeKey::new("a", "b", Some("n"));

    assert_eq!(g.take_edge(&key), Some(9));
    assert_eq!(g.take_edge(&key), None);
    assert!(g.has_node("a"));
}

#[test]
fn neighbor_queries_return_empty_for_isolated_and_unknown_nodes() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.ensure_node("a");

    assert!(g.in_edges("a", None).is_empty());
    assert!(g.out_edges("a", None).is_empty());
    assert!(g.successors("missing").is_empty());
    assert!(g.neighbors("missing").is_empty());
}

#[test]
fn node_edges_lists_in_edges_before_out_edges() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_edge("b", "c");
    g.set_edge("a", "b");

    let edges = g.node_edges("b", None);
    assert_eq!(edges[0], EdgeKey::unnamed("a", "b"));
    assert_eq!(edges[1], EdgeKey::unnamed("b", "c"));
    assert_eq!(g.node_edges("b", Some("c")), vec![EdgeKey::unnamed("b", "c")]);
}

#[test]
fn sources_and_sinks() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_path(&["a", "b", "c"]);
    g.ensure_node("d");

    assert_eq!(g.sources(), vec!["a", "d"]);
    assert_eq!(g.sinks(), vec!["c", "d"]);
}

#[test]
fn hierarchy_moves_children_between_parents() {
    let mut g = multigraph();
    g.set_parent("a", "sg1");
    g.set_parent("b", "sg1");
    g.set_parent("a", "sg2");

    assert_eq!(g.parent("a"), Some("sg2"));
    assert_eq!(g.children("sg1"), vec!["b"]);
    assert_eq!(g.children("sg2"), vec!["a"]);
    assert_eq!(g.children_root(), vec!["sg1", "sg2"]);

    g.clear_parent("a");
    assert_eq!(g.parent("a"), None);
    assert!(g.children("sg2").is_empty());
}

#[test]
fn removing_a_parent_moves_children_to_the_root() {
    let mut g = multigraph();
    g.set_parent("a", "sg");
    g.remove_node("sg");

    assert_eq!(g.parent("a"), None);
    assert_eq!(g.children_root(), vec!["a"]);
}

#[test]
fn set_parent_is_ignored_on_non_compound_graphs() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_parent("a", "sg");
    assert!(!g.has_node("a"));
    assert_eq!(g.parent("a"), None);
}

#[test]
fn many_removals_keep_lookups_consistent() {
    let mut g: Graph<usize, usize, ()> = Graph::default();
    for i in 0..300 {
        g.set_node(format!("n{i}"), i);
    }
    for i in 0..299 {
        g.set_edge_with_label(format!("n{i}"), format!("n{}", i + 1), i);
    }
    for i in (0..300).filter(|i| i % 3 != 0) {
        g.remove_node(&format!("n{i}"));
    }

    assert_eq!(g.node_count(), 100);
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.node("n297"), Some(&297));
    g.set_edge("n0", "n3");
    assert_eq!(g.successors("n0"), vec!["n3"]);
    assert_eq!(g.predecessors("n3"), vec!["n0"]);
}
