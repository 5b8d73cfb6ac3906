use stratum::graphlib::{EdgeKey, Graph, GraphOptions, alg};
use stratum::{Acyclicer, EdgeLabel, GraphLabel, LayoutGraph, acyclic};

fn new_graph(acyclicer: Acyclicer) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel {
        acyclicer,
        ..Default::default()
    });
    g
}

fn sorted_edges(g: &LayoutGraph) -> Vec<(String, String, Option<String>)> {
    let mut edges: Vec<_> = g
        .edges()
        .map(|e| (e.v.clone(), e.w.clone(), e.name.clone()))
        .collect();
    edges.sort();
    edges
}

#[test]
fn leaves_an_acyclic_graph_alone() {
    for acyclicer in [Acyclicer::Greedy, Acyclicer::Dfs] {
        let mut g = new_graph(acyclicer);
        g.set_path(&["a", "b", "d"]);
        g.set_path(&["a", "c", "d"]);
        let before = sorted_edges(&g);

        acyclic::run(&mut g);
        assert_eq!(sorted_edges(&g), before);
    }
}

#[test]
fn breaks_cycles() {
    for acyclicer in [Acyclicer::Greedy, Acyclicer::Dfs] {
        let mut g = new_graph(acyclicer);
        g.set_path(&["a", "b", "c", "d", "a"]);

        acyclic::run(&mut g);
        assert!(alg::is_acyclic(&g));
        assert_eq!(g.edge_count(), 4);
    }
}

#[test]
fn dfs_reverses_the_back_edge() {
    let mut g = new_graph(Acyclicer::Dfs);
    g.set_path(&["a", "b", "c", "a"]);

    acyclic::run(&mut g);
    let reversed = g
        .edge("a", "c", Some("rev1"))
        .expect("back edge is reversed under a fresh name");
    assert!(reversed.reversed);
    assert_eq!(reversed.forward_name, None);
    assert!(!g.has_edge("c", "a", None));
}

#[test]
fn reversed_edges_keep_their_label() {
    let mut g = new_graph(Acyclicer::Dfs);
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            minlen: 2,
            weight: 3.0,
            ..Default::default()
        },
    );
    g.set_edge_named(
        "b",
        "a",
        Some("foo"),
        Some(EdgeLabel {
            minlen: 4,
            weight: 5.0,
            ..Default::default()
        }),
    );

    acyclic::run(&mut g);
    let rev = g
        .edge_labels()
        .find(|(e, _)| e.v == "a" && e.w == "b" && e.name.is_some())
        .map(|(_, l)| l.clone())
        .expect("reversed edge");
    assert_eq!(rev.minlen, 4);
    assert_eq!(rev.weight, 5.0);
    assert_eq!(rev.forward_name.as_deref(), Some("foo"));
}

#[test]
fn greedy_reverses_the_lightest_cut() {
    let mut g = new_graph(Acyclicer::Greedy);
    g.set_edge_with_label("a", "b", EdgeLabel::with_weight(2.0));
    g.set_path(&["b", "c", "d"]);
    g.set_edge_with_label("d", "a", EdgeLabel::with_weight(1.0));
    g.set_edge_with_label("c", "a", EdgeLabel::with_weight(2.0));

    acyclic::run(&mut g);
    assert!(alg::is_acyclic(&g));
    assert_eq!(g.edge_count(), 5);
    assert!(g.edge("c", "b", Some("rev1")).is_some_and(|l| l.reversed));
}

#[test]
fn leaves_self_loops_in_place() {
    for acyclicer in [Acyclicer::Greedy, Acyclicer::Dfs] {
        let mut g = new_graph(acyclicer);
        g.set_edge("a", "a");
        acyclic::run(&mut g);
        assert_eq!(sorted_edges(&g), vec![("a".into(), "a".into(), None)]);
    }
}

#[test]
fn undo_restores_the_original_edges() {
    for acyclicer in [Acyclicer::Greedy, Acyclicer::Dfs] {
        let mut g = new_graph(acyclicer);
        g.set_edge_with_label(
            "a",
            "b",
            EdgeLabel {
                minlen: 2,
                weight: 3.0,
                ..Default::default()
            },
        );
        g.set_path(&["b", "c", "a"]);
        g.set_edge_named("c", "a", Some("named"), None);
        let before = sorted_edges(&g);

        acyclic::run(&mut g);
        acyclic::undo(&mut g);

        assert_eq!(sorted_edges(&g), before);
        assert!(g.edge_labels().all(|(_, l)| !l.reversed));
        let ab = g.edge_by_key(&EdgeKey::unnamed("a", "b")).expect("a -> b");
        assert_eq!((ab.minlen, ab.weight), (2, 3.0));
    }
}

fn weighted(g: &mut LayoutGraph, v: &str, w: &str, name: Option<&str>, weight: f64) {
    g.set_edge_named(v, w, name, Some(EdgeLabel::with_weight(weight)));
}

fn acyclic_apart_from_self_loops(g: &LayoutGraph) -> bool {
    let mut g = g.clone();
    for e in g.edge_keys().into_iter().filter(|e| e.v == e.w) {
        g.remove_edge_key(&e);
    }
    alg::is_acyclic(&g)
}

fn two_cycle(g: &mut LayoutGraph) {
    g.set_path(&["a", "b", "a"]);
}

fn self_loop_beside_a_two_cycle(g: &mut LayoutGraph) {
    g.set_edge("a", "a");
    g.set_path(&["a", "b", "a"]);
}

fn parallel_edges(g: &mut LayoutGraph) {
    weighted(g, "a", "b", Some("x"), 1.0);
    weighted(g, "a", "b", Some("y"), 2.0);
    weighted(g, "b", "a", Some("z"), 1.0);
    weighted(g, "b", "a", None, 1.0);
}

fn fractional_weights(g: &mut LayoutGraph) {
    weighted(g, "a", "b", None, 0.4);
    weighted(g, "b", "c", None, 0.4);
    weighted(g, "c", "a", None, 0.1);
}

fn zero_weights(g: &mut LayoutGraph) {
    weighted(g, "a", "b", None, 0.0);
    weighted(g, "b", "c", None, 0.0);
    weighted(g, "c", "a", None, 0.0);
}

fn interlocking_cycles(g: &mut LayoutGraph) {
    g.set_path(&["a", "b", "c", "a"]);
    g.set_path(&["c", "d", "b"]);
    weighted(g, "d", "e", None, 0.25);
    weighted(g, "e", "d", None, 0.75);
}

#[test]
fn every_cycle_shape_is_broken_and_restored() {
    let shapes = [
        ("two-cycle", two_cycle as fn(&mut LayoutGraph)),
        ("self-loop beside a two-cycle", self_loop_beside_a_two_cycle),
        ("parallel edges", parallel_edges),
        ("fractional weights", fractional_weights),
        ("zero weights", zero_weights),
        ("interlocking cycles", interlocking_cycles),
    ];

    for acyclicer in [Acyclicer::Greedy, Acyclicer::Dfs] {
        for (name, build) in shapes {
            let mut g = new_graph(acyclicer);
            build(&mut g);
            let before = sorted_edges(&g);

            acyclic::run(&mut g);
            assert!(
                acyclic_apart_from_self_loops(&g),
                "{name} ({acyclicer:?}) still has a cycle"
            );
            assert_eq!(g.edge_count(), before.len(), "{name} ({acyclicer:?})");

            acyclic::undo(&mut g);
            assert_eq!(sorted_edges(&g), before, "{name} ({acyclicer:?})");
            assert!(g.edge_labels().all(|(_, l)| !l.reversed));
        }
    }
}

#[test]
fn greedy_reverses_the_lightest_fractional_edge() {
    let mut g = new_graph(Acyclicer::Greedy);
    fractional_weights(&mut g);

    acyclic::run(&mut g);
    assert!(alg::is_acyclic(&g));
    assert!(!g.has_edge("c", "a", None));
    assert!(g.edge("a", "c", Some("rev1")).is_some_and(|l| l.reversed && l.weight == 0.1));
}
