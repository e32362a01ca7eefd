use tracing::debug;

use crate::{repr::macros::impl_common_graph_ops, testing::test_graph_ops};

use super::*;

/// A directed sparse graph storing **both outgoing and incoming neighborhoods**.
///
/// - Outgoing adjacency is stored in `out_nbs`.
/// - Incoming adjacency is stored in `in_nbs` (the reverse store): row `v` holds `(u, w)` for
///   every edge `(u, v, w)`.
/// - Enables `in_neighbors_of` and `in_degree_of` in `O(deg(v))`.
///
/// Every mutation updates both stores with the same committed weight.
#[derive(Debug, Clone)]
pub struct DirectedSparseGraph {
    idmap: IdMap,
    out_nbs: AdjacencyStore,
    in_nbs: AdjacencyStore,
    config: GraphConfig,
    num_edges: NumEdges,
}

impl_common_graph_ops!(DirectedSparseGraph => out_nbs; out_nbs, in_nbs);

impl DirectedSparseGraph {
    /// Returns the reverse store holding the incoming edges of every node
    pub fn reverse_store(&self) -> &AdjacencyStore {
        &self.in_nbs
    }
}

impl Default for DirectedSparseGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNew for DirectedSparseGraph {
    /// The configuration is always marked as directed
    fn with_config(config: GraphConfig) -> Self {
        Self {
            idmap: IdMap::new(),
            out_nbs: AdjacencyStore::new(),
            in_nbs: AdjacencyStore::new(),
            config: config.directed(true),
            num_edges: 0,
        }
    }

    fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }
}

impl DirectedWeightedAdjacency for DirectedSparseGraph {
    fn reverse_adjacency(&self) -> &AdjacencyStore {
        &self.in_nbs
    }
}

impl GraphEdgeEditing for DirectedSparseGraph {
    fn add_edge_by_index(&mut self, u: Node, v: Node, weight: Weight, reduction: Option<Reduction>) {
        if u == v && !self.config.self_loops {
            debug!(id = &self.idmap[u], "ignoring self loop");
            return;
        }

        let weight = self.config.effective_weight(weight);
        let (weight, is_new) =
            self.out_nbs
                .write_edge(u, v, weight, reduction, false, &self.idmap);

        // The reverse store holds the same entry set, so the reduction already applied
        let is_new_in = self.in_nbs.set_weight(v, u, weight);
        debug_assert_eq!(is_new, is_new_in);

        if is_new {
            self.num_edges += 1;
        }
    }
}

test_graph_ops!(
    test_directed_sparse,
    DirectedSparseGraph,
    GraphConfig::default().directed(true),
    (
        GraphNew,
        WeightedAdjacency,
        GraphEdgeEditing,
        DirectedWeightedAdjacency
    )
);

test_graph_ops!(
    test_directed_sparse_loops,
    DirectedSparseGraph,
    GraphConfig::default().directed(true).self_loops(true),
    (
        GraphNew,
        WeightedAdjacency,
        GraphEdgeEditing,
        DirectedWeightedAdjacency
    )
);
