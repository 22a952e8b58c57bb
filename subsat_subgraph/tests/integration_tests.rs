use std::sync::OnceLock;

use lazy_static::lazy_static;
use petgraph::graph::{DiGraph, NodeIndex};
use rstest::rstest;

use subsat_subgraph::{
    MapView, MatchError, MatchOutcome, MatchRules, SatMatcher, count_subisomorphisms,
    decide_subisomorphic, degrees_compatible, enumerate_subisomorphisms, find_subisomorphism,
    verify_mapping,
};

fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn digraph(nodes: usize, edges: &[(u32, u32)]) -> DiGraph<(), ()> {
    let mut graph = DiGraph::new();
    for _ in 0..nodes {
        graph.add_node(());
    }
    for &(a, b) in edges {
        graph.add_edge(a.into(), b.into(), ());
    }
    graph
}

/// Directed cycle 0 -> 1 -> .. -> n-1 -> 0.
fn cycle(n: u32) -> DiGraph<(), ()> {
    let edges: Vec<(u32, u32)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    digraph(n as usize, &edges)
}

/// Directed path 0 -> 1 -> .. -> n-1.
fn path(n: u32) -> DiGraph<(), ()> {
    let edges: Vec<(u32, u32)> = (0..n - 1).map(|i| (i, i + 1)).collect();
    digraph(n as usize, &edges)
}

/// Complete digraph: every ordered pair of distinct vertices.
fn complete(n: u32) -> DiGraph<(), ()> {
    let edges: Vec<(u32, u32)> = (0..n)
        .flat_map(|a| (0..n).filter(move |&b| b != a).map(move |b| (a, b)))
        .collect();
    digraph(n as usize, &edges)
}

fn forward_indices(embedding: &subsat_subgraph::Embedding) -> Vec<usize> {
    embedding
        .forward()
        .iter()
        .map(|slot| slot.expect("embedding must be total").index())
        .collect()
}

lazy_static! {
    static ref SINGLE_EDGE: DiGraph<(), ()> = path(2);
    static ref TRIANGLE: DiGraph<(), ()> = cycle(3);
    static ref SQUARE: DiGraph<(), ()> = cycle(4);
}

#[test]
fn triangle_does_not_embed_into_square() {
    init_test_logger();
    let rules = MatchRules::new();
    assert_eq!(decide_subisomorphic(&*TRIANGLE, &*SQUARE, &rules), Some(false));
    assert_eq!(count_subisomorphisms(&*TRIANGLE, &*SQUARE, &rules), 0);
}

#[test]
fn edge_into_triangle_yields_the_three_rotations() {
    init_test_logger();
    let rules = MatchRules::new();

    let mut maps: Vec<Vec<usize>> = enumerate_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules)
        .map(|embedding| forward_indices(&embedding))
        .collect();
    maps.sort();

    assert_eq!(maps, vec![vec![0, 1], vec![1, 2], vec![2, 0]]);
    assert_eq!(count_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules), 3);
}

#[rstest]
#[case::path3_in_square(path(3), cycle(4), 4)]
#[case::triangle_rotations(cycle(3), cycle(3), 3)]
#[case::square_in_octagon(cycle(4), cycle(8), 0)]
#[case::edge_in_k3(path(2), complete(3), 6)]
#[case::two_cycle_in_square(complete(2), cycle(4), 0)]
#[case::two_cycle_in_k3(complete(2), complete(3), 6)]
#[case::path3_in_path3(path(3), path(3), 1)]
#[case::edge_in_path3(path(2), path(3), 2)]
#[case::k3_in_k4(complete(3), complete(4), 24)]
#[case::pattern_larger_than_target(path(3), path(2), 0)]
fn embedding_counts(
    #[case] pattern: DiGraph<(), ()>,
    #[case] target: DiGraph<(), ()>,
    #[case] expected: usize,
) {
    init_test_logger();
    let rules = MatchRules::new();
    assert_eq!(count_subisomorphisms(&pattern, &target, &rules), expected);
    assert_eq!(
        decide_subisomorphic(&pattern, &target, &rules),
        Some(expected > 0)
    );
}

#[test]
fn every_embedding_round_trips_through_the_verifier() {
    init_test_logger();
    let pattern = complete(3);
    let target = complete(4);
    let rules = MatchRules::new();

    let embeddings: Vec<_> = enumerate_subisomorphisms(&pattern, &target, &rules).collect();
    assert_eq!(embeddings.len(), 24);

    for embedding in &embeddings {
        assert!(verify_mapping(&pattern, &target, &rules, embedding.as_forward()));
        assert!(verify_mapping(&pattern, &target, &rules, embedding.as_inverse()));

        // The two directions describe the same bijection.
        for (p, t) in embedding.pairs() {
            assert_eq!(embedding.pattern_of(t), Some(p));
        }
        assert_eq!(embedding.len(), pattern.node_count());
    }

    // No mapping is yielded twice.
    let mut seen: Vec<Vec<usize>> = embeddings.iter().map(forward_indices).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 24);
}

#[test]
fn vertex_colours_pin_the_image() {
    init_test_logger();
    let rules = MatchRules::new().with_vertex_colours(&[1, 2], &[1, 2, 3]);

    let embeddings: Vec<_> = enumerate_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules).collect();
    assert_eq!(embeddings.len(), 1);
    assert_eq!(forward_indices(&embeddings[0]), vec![0, 1]);
}

#[test]
fn missing_vertex_colour_is_infeasible_before_any_solve() {
    init_test_logger();
    // Colour 9 exists nowhere in the target.
    let rules = MatchRules::new().with_vertex_colours(&[9, 2], &[1, 2, 3]);

    let matcher = SatMatcher::new(&*SINGLE_EDGE, &*TRIANGLE, rules);
    assert_eq!(
        matcher.status(),
        Err(&MatchError::NoVertexCandidate { pattern: 0 })
    );
    assert_eq!(matcher.solver_stats().solves, 0);

    assert_eq!(
        decide_subisomorphic(&*SINGLE_EDGE, &*TRIANGLE, &rules),
        Some(false)
    );
    assert_eq!(count_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules), 0);
}

#[test]
fn infeasible_session_keeps_returning_the_stored_error() {
    init_test_logger();
    let rules = MatchRules::new().with_vertex_colours(&[9, 2], &[1, 2, 3]);
    let mut matcher = SatMatcher::new(&*SINGLE_EDGE, &*TRIANGLE, rules);

    let expected = MatchError::NoVertexCandidate { pattern: 0 };
    assert_eq!(matcher.solve(), Err(expected.clone()));
    assert_eq!(matcher.solve(), Err(expected.clone()));
    assert!(expected.is_infeasible());
    assert_eq!(matcher.solver_stats().solves, 0);
}

#[test]
fn edge_colours_select_the_matching_edge() {
    init_test_logger();
    let rules = MatchRules::new().with_edge_colours(&[6], &[5, 6, 7]);

    let embeddings: Vec<_> = enumerate_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules).collect();
    assert_eq!(embeddings.len(), 1);
    assert_eq!(forward_indices(&embeddings[0]), vec![1, 2]);
}

#[test]
fn no_compatible_edge_is_reported_at_construction() {
    init_test_logger();
    let no_edges = digraph(2, &[]);
    let matcher = SatMatcher::new(&*SINGLE_EDGE, &no_edges, MatchRules::new());

    assert_eq!(
        matcher.status(),
        Err(&MatchError::NoEdgeCandidate { pattern_edge: 0 })
    );
    assert_eq!(
        count_subisomorphisms(&*SINGLE_EDGE, &no_edges, &MatchRules::new()),
        0
    );
}

#[test]
fn node_predicate_excludes_targets() {
    init_test_logger();
    let ban_zero: &subsat_subgraph::NodeCompat<(), ()> = &|_, _, _, t| t.index() != 0;
    let rules = MatchRules::new().with_node_compat(ban_zero);

    let embeddings: Vec<_> = enumerate_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules).collect();
    assert_eq!(embeddings.len(), 1);
    assert_eq!(forward_indices(&embeddings[0]), vec![1, 2]);
}

#[test]
fn edge_predicate_excludes_target_edges() {
    init_test_logger();
    let only_last: &subsat_subgraph::EdgeCompat<(), ()> = &|_, _, _, te| te.index() == 2;
    let rules = MatchRules::new().with_edge_compat(only_last);

    let embeddings: Vec<_> = enumerate_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules).collect();
    assert_eq!(embeddings.len(), 1);
    assert_eq!(forward_indices(&embeddings[0]), vec![2, 0]);
}

#[test]
fn degree_pruning_preserves_the_count() {
    init_test_logger();
    let rules: MatchRules<'_, (), ()> =
        MatchRules::new().with_node_compat(&degrees_compatible::<(), ()>);
    assert_eq!(count_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules), 3);
    assert_eq!(count_subisomorphisms(&*TRIANGLE, &*SQUARE, &rules), 0);
}

#[test]
fn assumptions_pin_a_mapping() {
    init_test_logger();
    let mut matcher = SatMatcher::new(&*SINGLE_EDGE, &*TRIANGLE, MatchRules::new());
    let a = NodeIndex::new(0);
    let b = NodeIndex::new(1);

    let pinned = matcher.mapping_lit(a, NodeIndex::new(1));
    let outcome = matcher.solve_with(&[pinned]).unwrap();
    let embedding = outcome.into_embedding().expect("a -> 1 extends to a match");
    assert_eq!(forward_indices(&embedding), vec![1, 2]);

    // 1 -> 0 is not a triangle edge, so pinning both endpoints fails.
    let impossible = [
        matcher.mapping_lit(a, NodeIndex::new(1)),
        matcher.mapping_lit(b, NodeIndex::new(0)),
    ];
    assert_eq!(
        matcher.solve_with(&impossible).unwrap(),
        MatchOutcome::NoMatch
    );

    // Assumption-driven unsat does not poison the session.
    assert!(matcher.solve().unwrap().found());
}

#[test]
fn propagation_budget_reports_inconclusive() {
    init_test_logger();
    let rules = MatchRules::new().with_propagation_budget(0);

    assert_eq!(
        find_subisomorphism(&*SINGLE_EDGE, &*TRIANGLE, &rules),
        MatchOutcome::Inconclusive
    );
    assert_eq!(decide_subisomorphic(&*SINGLE_EDGE, &*TRIANGLE, &rules), None);

    let mut embeddings = enumerate_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &rules);
    assert_eq!(embeddings.by_ref().count(), 0);
    assert!(!embeddings.is_exhaustive());
}

#[test]
fn unbudgeted_enumeration_is_exhaustive() {
    init_test_logger();
    let mut embeddings = enumerate_subisomorphisms(&*SINGLE_EDGE, &*TRIANGLE, &MatchRules::new());
    assert_eq!(embeddings.by_ref().count(), 3);
    assert!(embeddings.is_exhaustive());
}

#[test]
fn empty_pattern_embeds_vacuously() {
    init_test_logger();
    let empty = digraph(0, &[]);
    let rules = MatchRules::new();

    assert_eq!(decide_subisomorphic(&empty, &*TRIANGLE, &rules), Some(true));

    let embeddings: Vec<_> = enumerate_subisomorphisms(&empty, &*TRIANGLE, &rules).collect();
    assert_eq!(embeddings.len(), 1);
    assert!(embeddings[0].is_empty());
}

#[test]
fn self_loop_requires_a_self_loop() {
    init_test_logger();
    let loop_pattern = digraph(1, &[(0, 0)]);
    let rules = MatchRules::new();

    // The triangle has no self-loop; construction still succeeds (each
    // endpoint pair is compatible in isolation) but the bijection oracle
    // rejects every candidate at solve time.
    assert_eq!(
        decide_subisomorphic(&loop_pattern, &*TRIANGLE, &rules),
        Some(false)
    );

    let mut with_loop = cycle(3);
    with_loop.add_edge(NodeIndex::new(0), NodeIndex::new(0), ());
    let embeddings: Vec<_> = enumerate_subisomorphisms(&loop_pattern, &with_loop, &rules).collect();
    assert_eq!(embeddings.len(), 1);
    assert_eq!(forward_indices(&embeddings[0]), vec![0]);
}

#[test]
fn wrong_length_view_is_rejected_eagerly_and_not_stored() {
    init_test_logger();
    let mut matcher = SatMatcher::new(&*SINGLE_EDGE, &*TRIANGLE, MatchRules::new());

    let short: Vec<Option<NodeIndex>> = vec![Some(NodeIndex::new(0))];
    assert_eq!(
        matcher.block(MapView::Forward(&short)),
        Err(MatchError::MapLength {
            expected: 2,
            got: 1
        })
    );
    assert!(
        !MatchError::MapLength {
            expected: 2,
            got: 1
        }
        .is_infeasible()
    );

    // The bad call leaves the session fully usable.
    assert!(matcher.solve().unwrap().found());
}

#[test]
fn blocking_through_the_inverse_view_enumerates_everything() {
    init_test_logger();
    let mut matcher = SatMatcher::new(&*SINGLE_EDGE, &*TRIANGLE, MatchRules::new());

    let mut maps: Vec<Vec<usize>> = Vec::new();
    while let MatchOutcome::Found(embedding) = matcher.solve().unwrap() {
        maps.push(forward_indices(&embedding));
        matcher.block(embedding.as_inverse()).unwrap();
    }
    maps.sort();

    assert_eq!(maps, vec![vec![0, 1], vec![1, 2], vec![2, 0]]);
}
