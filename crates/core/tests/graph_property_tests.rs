use common::types::DirectedEdge;
use proptest::prelude::*;
use proptest::strategy::Strategy;
use rescue_core::{CorridorGraph, WeightMatrix};

const NUM_NODES_STRATEGY: std::ops::Range<usize> = 2usize..10;

fn edges_strategy() -> impl Strategy<Value = (usize, Vec<DirectedEdge>)> {
    NUM_NODES_STRATEGY.prop_flat_map(|num_nodes| {
        let edge_generator = (0usize..num_nodes, 0usize..num_nodes, -20i64..20)
            .prop_map(|(from, to, weight)| DirectedEdge::new(from, to, weight));
        let edges_generator = prop::collection::vec(edge_generator, 0..50);

        (proptest::strategy::Just(num_nodes), edges_generator)
    })
}

/// A square matrix plus a corridor drawn from its vertices (start and end always included).
fn corridor_strategy() -> impl Strategy<Value = (WeightMatrix, Vec<usize>)> {
    NUM_NODES_STRATEGY.prop_flat_map(|dim| {
        let rows = prop::collection::vec(prop::collection::vec(-20i64..20, dim), dim);
        let picks = prop::collection::vec(any::<bool>(), dim - 2);

        (rows, picks).prop_map(move |(rows, picks)| {
            let mut corridor = vec![0];
            corridor.extend(
                picks
                    .iter()
                    .enumerate()
                    .filter(|(_, keep)| **keep)
                    .map(|(i, _)| i + 1),
            );
            corridor.push(dim - 1);
            (WeightMatrix::new(rows).unwrap(), corridor)
        })
    })
}

proptest! {
    /// Property: node_pointers should be monotonic
    #[test]
    fn node_pointers_monotonic((num_nodes, mut edges) in edges_strategy()) {
        let csr = CorridorGraph::from_edges(num_nodes, &mut edges);
        for i in 0..csr.num_nodes {
            prop_assert!(csr.node_pointers[i] <= csr.node_pointers[i + 1]);
        }
    }

    /// Property: edge arrays stay the same length as the edge count
    #[test]
    fn edge_arrays_length_consistent((num_nodes, mut edges) in edges_strategy()) {
        let size = edges.len();
        let csr = CorridorGraph::from_edges(num_nodes, &mut edges);
        prop_assert_eq!(csr.edge_targets.len(), size);
        prop_assert_eq!(csr.edge_weights.len(), size);
        prop_assert_eq!(csr.edge_source_by_index.len(), size);
        // In CSR, the last node pointer equals the total number of edges.
        prop_assert_eq!(csr.node_pointers[csr.num_nodes], size);
    }

    /// Property: every stored edge round-trips through `edge()` in source-sorted order
    #[test]
    fn edges_stored_in_stable_source_order((num_nodes, mut edges) in edges_strategy()) {
        let mut sorted_edges = edges.clone();
        sorted_edges.sort_by_key(|e| e.from);

        let csr = CorridorGraph::from_edges(num_nodes, &mut edges);

        let stored: Vec<DirectedEdge> =
            (0..csr.num_edges()).map(|i| csr.edge(i).unwrap()).collect();
        prop_assert_eq!(stored, sorted_edges);
    }

    /// Property: corridor graphs are complete digraphs over the corridor without self-loops
    #[test]
    fn corridor_graph_is_complete((matrix, corridor) in corridor_strategy()) {
        let graph = CorridorGraph::from_matrix(&matrix, &corridor).unwrap();
        let k = corridor.len();

        prop_assert_eq!(graph.num_nodes, matrix.dim());
        prop_assert_eq!(graph.num_edges(), k * (k - 1));

        for v in 0..graph.num_nodes {
            let targets: Vec<usize> =
                graph.out_edges(v).map(|i| graph.edge_targets[i]).collect();
            if corridor.contains(&v) {
                let expected: Vec<usize> =
                    corridor.iter().copied().filter(|&w| w != v).collect();
                prop_assert_eq!(targets, expected);
            } else {
                prop_assert!(targets.is_empty());
            }
        }

        for i in 0..graph.num_edges() {
            let edge = graph.edge(i).unwrap();
            prop_assert_eq!(edge.weight, matrix.weight(edge.from, edge.to));
        }
    }
}
