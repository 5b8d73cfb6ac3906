use stratum_graph::{Graph, GraphOptions, alg};

fn sorted(mut components: Vec<Vec<String>>) -> Vec<Vec<String>> {
    for c in &mut components {
        c.sort();
    }
    components.sort();
    components
}

#[test]
fn preorder_and_postorder_follow_successors() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "d");

    assert_eq!(alg::preorder(&g, &["a"]), vec!["a", "b", "c", "d"]);
    assert_eq!(alg::postorder(&g, &["a"]), vec!["c", "b", "d", "a"]);
}

#[test]
fn traversals_on_undirected_graphs_use_neighbors() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    g.set_edge("a", "b");
    g.set_edge("b", "c");

    assert_eq!(alg::postorder(&g, &["c"]), vec!["a", "b", "c"]);
    assert_eq!(alg::preorder(&g, &["c"]), vec!["c", "b", "a"]);
}

#[test]
fn traversals_skip_already_visited_roots() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_path(&["a", "b"]);
    g.ensure_node("c");

    assert_eq!(alg::preorder(&g, &["a", "b", "c"]), vec!["a", "b", "c"]);
}

#[test]
fn components_ignore_edge_direction() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_edge("a", "b");
    g.set_edge("c", "b");
    g.ensure_node("d");

    assert_eq!(
        sorted(alg::components(&g)),
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string()],
        ]
    );
}

#[test]
fn find_cycles_reports_cycles_and_self_loops() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_path(&["a", "b", "c", "a"]);
    g.set_edge("d", "e");
    g.set_edge_named("f", "f", Some("loop"), None);

    assert_eq!(
        sorted(alg::find_cycles(&g)),
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["f".to_string()],
        ]
    );
    assert!(!alg::is_acyclic(&g));
}

#[test]
fn a_dag_has_no_cycles() {
    let mut g: Graph<(), (), ()> = Graph::default();
    g.set_path(&["a", "b", "d"]);
    g.set_path(&["a", "c", "d"]);
    assert!(alg::is_acyclic(&g));
}
