use tracing::debug;

use crate::{repr::macros::impl_common_graph_ops, testing::test_graph_ops};

use super::*;

/// A sparse graph addressed by string identifiers.
///
/// Stores a single adjacency store. If the graph is undirected, every edge is mirrored into the
/// rows of both endpoints and counted once.
///
/// ```
/// use idgraphs::prelude::*;
///
/// let mut graph = SparseGraph::new();
/// graph.add_edge("a", "b", 0.5).unwrap();
/// graph.add_edge("b", "c", 1.0).unwrap();
///
/// assert_eq!(graph.number_of_nodes(), 3);
/// assert_eq!(graph.number_of_edges(), 2);
/// assert_eq!(graph.get_edge("b", "a").unwrap(), 0.5);
/// assert_eq!(graph.get_edge("a", "c").unwrap(), 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SparseGraph {
    idmap: IdMap,
    out_nbs: AdjacencyStore,
    config: GraphConfig,
    num_edges: NumEdges,
}

impl_common_graph_ops!(SparseGraph => out_nbs; out_nbs);

impl GraphNew for SparseGraph {
    fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }
}

impl GraphEdgeEditing for SparseGraph {
    fn add_edge_by_index(&mut self, u: Node, v: Node, weight: Weight, reduction: Option<Reduction>) {
        if u == v && !self.config.self_loops {
            debug!(id = &self.idmap[u], "ignoring self loop");
            return;
        }

        let weight = self.config.effective_weight(weight);
        let (_, is_new) = self.out_nbs.write_edge(
            u,
            v,
            weight,
            reduction,
            !self.config.directed,
            &self.idmap,
        );

        if is_new {
            self.num_edges += 1;
        }
    }
}

test_graph_ops!(
    test_sparse_undirected,
    SparseGraph,
    GraphConfig::default(),
    (GraphNew, WeightedAdjacency, GraphEdgeEditing)
);

test_graph_ops!(
    test_sparse_directed,
    SparseGraph,
    GraphConfig::default().directed(true).self_loops(true),
    (GraphNew, WeightedAdjacency, GraphEdgeEditing)
);

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::testing::WarningCounter;

    fn four_node_graph() -> SparseGraph {
        let mut graph = SparseGraph::new();
        graph
            .add_edges([("1", "3", 0.4), ("1", "2", 1.0), ("3", "4", 0.1)], None)
            .unwrap();
        graph
    }

    #[test]
    fn mirrored_edges() {
        let graph = four_node_graph();
        assert_eq!(graph.number_of_nodes(), 4);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.number_of_entries(), 6);
        assert_eq!(graph.idmap().ids(), &["1", "3", "2", "4"]);

        assert_eq!(graph.get_edge("1", "3").unwrap(), 0.4);
        assert_eq!(graph.get_edge("3", "1").unwrap(), 0.4);
        assert_eq!(graph.get_edge("2", "1").unwrap(), 1.0);
        assert_eq!(graph.get_edge("2", "4").unwrap(), 0.0);
        assert!(matches!(
            graph.get_edge("1", "9"),
            Err(GraphError::UnknownId(id)) if id == "9"
        ));
    }

    #[test]
    fn normalized_edges_yield_each_edge_once() {
        let graph = four_node_graph();
        let edges = graph.ordered_edges(true).collect_vec();
        assert_eq!(
            edges,
            vec![
                WeightedEdge(Edge(0, 1), 0.4),
                WeightedEdge(Edge(0, 2), 1.0),
                WeightedEdge(Edge(1, 3), 0.1),
            ]
        );
    }

    #[test]
    fn reduction_policies() {
        let mut graph = SparseGraph::new();
        graph.add_edge("a", "b", 1.0).unwrap();

        graph.add_edge_with("a", "b", 3.0, Some(Reduction::Min)).unwrap();
        assert_eq!(graph.get_edge("a", "b").unwrap(), 1.0);

        graph.add_edge_with("b", "a", 3.0, Some(Reduction::Max)).unwrap();
        assert_eq!(graph.get_edge("a", "b").unwrap(), 3.0);

        assert_eq!(graph.number_of_edges(), 1);
    }

    /// Without a reduction, the latest write wins (and a warning is logged)
    #[test]
    fn overwrite_without_reduction_keeps_latest_weight() {
        let mut graph = SparseGraph::new();
        graph.add_edge("a", "b", 1.0).unwrap();
        graph.add_edge("a", "b", 3.0).unwrap();
        assert_eq!(graph.get_edge("a", "b").unwrap(), 3.0);
        assert_eq!(graph.get_edge("b", "a").unwrap(), 3.0);

        graph.add_edge("b", "a", 0.5).unwrap();
        assert_eq!(graph.get_edge("a", "b").unwrap(), 0.5);
        assert_eq!(graph.number_of_edges(), 1);
    }

    #[test]
    fn conflicting_overwrite_warns_once() {
        let warnings = WarningCounter::default();
        let mut graph = SparseGraph::new();

        warnings.capture(|| graph.add_edge("a", "b", 1.0).unwrap());
        assert_eq!(warnings.count(), 0);

        warnings.capture(|| graph.add_edge("a", "b", 3.0).unwrap());
        assert_eq!(warnings.count(), 1);
        assert_eq!(graph.get_edge("b", "a").unwrap(), 3.0);

        // rewriting the stored weight is not a conflict
        warnings.capture(|| graph.add_edge("b", "a", 3.0).unwrap());
        assert_eq!(warnings.count(), 1);

        // a reduction resolves the conflict silently
        warnings.capture(|| {
            graph
                .add_edge_with("a", "b", 5.0, Some(Reduction::Max))
                .unwrap()
        });
        assert_eq!(warnings.count(), 1);
        assert_eq!(graph.get_edge("a", "b").unwrap(), 5.0);
    }

    #[test]
    fn self_loops_are_ignored_unless_allowed() {
        let mut graph = SparseGraph::new();
        graph.add_edge("a", "a", 1.0).unwrap();
        assert!(graph.contains_id("a"));
        assert!(graph.has_no_edges());
        assert_eq!(graph.get_edge("a", "a").unwrap(), 0.0);

        let mut graph = SparseGraph::with_config(GraphConfig::default().self_loops(true));
        graph.add_edge("a", "a", 2.0).unwrap();
        assert_eq!(graph.number_of_edges(), 1);
        assert_eq!(graph.number_of_entries(), 1);
        assert_eq!(graph.get_edge("a", "a").unwrap(), 2.0);
    }

    #[test]
    fn unweighted_graph_stores_unit_weights() {
        let mut graph = SparseGraph::with_config(GraphConfig::default().weighted(false));
        graph.add_edge("a", "b", 0.3).unwrap();
        assert_eq!(graph.get_edge("a", "b").unwrap(), UNIT_WEIGHT);
        assert!(!graph.is_weighted());
    }

    #[test]
    fn add_ids_is_not_rolled_back() {
        let mut graph = SparseGraph::new();
        assert!(matches!(
            graph.add_ids(["a", "b", "a", "c"]),
            Err(GraphError::DuplicateId(id)) if id == "a"
        ));
        assert_eq!(graph.idmap().ids(), &["a", "b"]);
        assert_eq!(graph.construct_row(1), vec![0.0, 0.0]);
    }

    #[test]
    fn rows_and_dense_matrix() {
        let graph = four_node_graph();
        assert_eq!(graph.construct_row(0), vec![0.0, 0.4, 1.0, 0.0]);
        assert_eq!(graph.row_of("4").unwrap(), vec![0.0, 0.1, 0.0, 0.0]);

        let rows = graph.rows_of(["4", "1"]).unwrap();
        assert_eq!(rows.shape(), (2, 4));
        assert_eq!(rows.row(0), graph.construct_row(3).as_slice());
        assert_eq!(rows.row(1), graph.construct_row(0).as_slice());
        assert!(matches!(
            graph.rows_of(["1", "x"]),
            Err(GraphError::UnknownId(_))
        ));

        let dense = graph.to_dense_matrix(0.0);
        assert!(dense.is_square());
        assert!(dense.is_symmetric());
        assert_eq!(dense[(0, 1)], 0.4);

        let filled = graph.to_dense_matrix(-1.0);
        assert_eq!(filled[(0, 3)], -1.0);
        assert_eq!(filled[(0, 0)], -1.0);
    }

    #[test]
    fn from_dense_matrix() {
        let matrix = DenseMatrix::from_rows(vec![
            vec![0.0, 0.5, 0.0],
            vec![0.5, 0.0, 0.2],
            vec![0.0, 0.2, 0.0],
        ])
        .unwrap();

        let graph =
            SparseGraph::from_dense_with(GraphConfig::default(), &matrix, Some(["x", "y", "z"].as_slice()))
                .unwrap();
        assert_eq!(graph.number_of_edges(), 2);
        assert_eq!(graph.get_edge("z", "y").unwrap(), 0.2);
        assert_eq!(graph.to_dense_matrix(0.0), matrix);

        let graph = SparseGraph::from_dense(&matrix, None::<&[&str]>).unwrap();
        assert!(graph.is_directed());
        assert_eq!(graph.idmap().ids(), &["0", "1", "2"]);
        assert_eq!(graph.number_of_edges(), 4);

        let ragged = DenseMatrix::new(2, 3, 0.0);
        assert!(matches!(
            SparseGraph::from_dense(&ragged, None::<&[&str]>),
            Err(GraphError::InvalidArgument(_))
        ));
        assert!(matches!(
            SparseGraph::from_dense(&matrix, Some(["a"].as_slice())),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn equality_ignores_node_order() {
        let mut lhs = SparseGraph::new();
        lhs.add_edge("a", "b", 0.5).unwrap();
        lhs.add_edge("b", "c", 0.7).unwrap();

        let mut rhs = SparseGraph::new();
        rhs.add_id("c").unwrap();
        rhs.add_edge("c", "b", 0.7).unwrap();
        rhs.add_edge("b", "a", 0.5).unwrap();
        assert_eq!(lhs, rhs);

        rhs.add_edge("a", "b", 0.6).unwrap();
        assert_ne!(lhs, rhs);
    }
}
