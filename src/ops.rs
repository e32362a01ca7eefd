/*!
# Graph Operations

Capability traits implemented by all graph representations of this crate:

- [`GraphConfigured`]: the fixed construction-time configuration,
- [`GraphNodeOrder`] / [`GraphEdgeOrder`]: sizes and the identifier map,
- [`WeightedAdjacency`]: neighborhood queries, row/matrix materialization,
- [`DirectedWeightedAdjacency`]: in-neighborhoods of directed graphs,
- [`GraphNew`], [`GraphIdEditing`], [`GraphEdgeEditing`]: construction and mutation.

Readers, writers and algorithms are written against these traits rather than against a concrete
representation.
*/

use std::ops::Range;

use itertools::Itertools;

use crate::{prelude::*, repr::dense::DenseMatrix};

/// Access to the configuration a graph was constructed with
pub trait GraphConfigured {
    /// Returns the configuration of the graph
    fn config(&self) -> GraphConfig;

    /// Returns *true* if edges carry individual weights
    fn is_weighted(&self) -> bool {
        self.config().weighted
    }

    /// Returns *true* if edges are directed
    fn is_directed(&self) -> bool {
        self.config().directed
    }

    /// Returns *true* if edges are undirected
    fn is_undirected(&self) -> bool {
        !self.is_directed()
    }

    /// Returns *true* if edges `(u, u)` are stored
    fn allows_self_loops(&self) -> bool {
        self.config().self_loops
    }
}

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the identifier map of the graph
    fn idmap(&self) -> &IdMap;

    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes {
        self.idmap().number_of_nodes()
    }

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.idmap().len()
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a range over all node indices
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns the identifier of a node
    /// ** Panics if `u >= n` **
    fn id_of(&self, u: Node) -> &str {
        &self.idmap()[u]
    }

    /// Returns the index of an identifier.
    ///
    /// # Errors
    /// Fails with [`GraphError::UnknownId`] if the identifier is not a node of the graph.
    fn index_of(&self, id: &str) -> Result<Node> {
        self.idmap().index_of(id)
    }

    /// Returns *true* if the identifier is a node of the graph
    fn contains_id(&self, id: &str) -> bool {
        self.idmap().contains(id)
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of logical edges.
    /// An undirected edge `{u, v}` is counted once although it is stored in both directions.
    fn number_of_edges(&self) -> NumEdges;

    /// Returns the number of stored adjacency entries, ie. the sum of all neighborhood sizes
    fn number_of_entries(&self) -> usize;

    /// Returns *true* if the graph has no edges
    fn has_no_edges(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Traits pertaining getters for weighted neighborhoods & edges
pub trait WeightedAdjacency: GraphNodeOrder + Sized {
    /// Returns the (outgoing) adjacency store of the graph
    fn adjacency(&self) -> &AdjacencyStore;

    /// Returns an iterator over `(neighbor, weight)` pairs of a given vertex in insertion order.
    /// ** Panics if `u >= n` **
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = (Node, Weight)> + '_ {
        self.adjacency().row(u).neighbors()
    }

    /// Returns the number of (outgoing) neighbors of `u`
    /// ** Panics if `u >= n` **
    fn degree_of(&self, u: Node) -> NumNodes {
        self.adjacency().row(u).len()
    }

    /// Returns the weight of edge `(u, v)` if it exists
    /// ** Panics if `u >= n` **
    fn weight_of(&self, u: Node, v: Node) -> Option<Weight> {
        self.adjacency().row(u).weight_to(v)
    }

    /// Returns *true* if the edge `(u, v)` exists
    /// ** Panics if `u >= n` **
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.weight_of(u, v).is_some()
    }

    /// Returns the weight of the edge between two identifiers or `0` if they are not connected.
    ///
    /// # Errors
    /// Fails with [`GraphError::UnknownId`] if either identifier is not a node of the graph.
    fn get_edge(&self, id1: &str, id2: &str) -> Result<Weight> {
        let u = self.index_of(id1)?;
        let v = self.index_of(id2)?;
        Ok(self.weight_of(u, v).unwrap_or(NO_EDGE))
    }

    /// Returns an iterator over outgoing edges of a given vertex.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    /// ** Panics if `u >= n` **
    fn edges_of(&self, u: Node, only_normalized: bool) -> impl Iterator<Item = WeightedEdge> + '_ {
        self.neighbors_of(u)
            .map(move |(v, w)| WeightedEdge(Edge(u, v), w))
            .filter(move |e| !only_normalized || e.edge().is_normalized())
    }

    /// Returns an iterator over all edges in the graph.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered, which
    /// yields every undirected edge exactly once.
    fn edges(&self, only_normalized: bool) -> impl Iterator<Item = WeightedEdge> + '_ {
        self.vertices()
            .flat_map(move |u| self.edges_of(u, only_normalized))
    }

    /// Returns an iterator over all edges in the graph sorted by endpoints
    fn ordered_edges(&self, only_normalized: bool) -> impl Iterator<Item = WeightedEdge> + '_ {
        self.vertices().flat_map(move |u| {
            self.edges_of(u, only_normalized)
                .sorted_by_key(|e| e.edge())
        })
    }

    /// Returns the dense adjacency row of `u`: a vector of length `n` with neighbor weights at
    /// their indices and `0` elsewhere.
    /// ** Panics if `u >= n` **
    fn construct_row(&self, u: Node) -> Vec<Weight> {
        let mut row = vec![NO_EDGE; self.len()];
        for (v, w) in self.neighbors_of(u) {
            row[v as usize] = w;
        }
        row
    }

    /// Returns the dense adjacency row of an identifier.
    ///
    /// # Errors
    /// Fails with [`GraphError::UnknownId`] if the identifier is not a node of the graph.
    fn row_of(&self, id: &str) -> Result<Vec<Weight>> {
        Ok(self.construct_row(self.index_of(id)?))
    }

    /// Returns a matrix whose `i`-th row is the dense adjacency row of `ids[i]`.
    ///
    /// # Errors
    /// Fails with [`GraphError::UnknownId`] if any identifier is not a node of the graph.
    fn rows_of<I, S>(&self, ids: I) -> Result<DenseMatrix>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let indices = self.idmap().indices_of(ids)?;
        let mut matrix = DenseMatrix::new(indices.len(), self.len(), NO_EDGE);
        for (i, &u) in indices.iter().enumerate() {
            for (v, w) in self.neighbors_of(u) {
                matrix[(i, v as usize)] = w;
            }
        }
        Ok(matrix)
    }

    /// Returns the full `n x n` adjacency matrix with `default` at missing entries.
    /// Requires `O(n^2)` memory and should be avoided for large graphs.
    fn to_dense_matrix(&self, default: Weight) -> DenseMatrix {
        let mut matrix = DenseMatrix::new(self.len(), self.len(), default);
        for WeightedEdge(Edge(u, v), w) in self.edges(false) {
            matrix[(u as usize, v as usize)] = w;
        }
        matrix
    }
}

/// Getters for in-neighborhoods of directed graphs
pub trait DirectedWeightedAdjacency: WeightedAdjacency {
    /// Returns the reverse adjacency store: row `v` holds all `(u, w)` with an edge `(u, v, w)`
    fn reverse_adjacency(&self) -> &AdjacencyStore;

    /// Returns an iterator over `(predecessor, weight)` pairs of a given vertex.
    /// ** Panics if `v >= n` **
    fn in_neighbors_of(&self, v: Node) -> impl Iterator<Item = (Node, Weight)> + '_ {
        self.reverse_adjacency().row(v).neighbors()
    }

    /// Returns the number of incoming edges of `v`
    /// ** Panics if `v >= n` **
    fn in_degree_of(&self, v: Node) -> NumNodes {
        self.reverse_adjacency().row(v).len()
    }

    /// Returns the number of outgoing edges of `u`
    /// ** Panics if `u >= n` **
    fn out_degree_of(&self, u: Node) -> NumNodes {
        self.degree_of(u)
    }
}

/// Trait to create a new empty graph
pub trait GraphNew: Sized {
    /// Creates an empty graph with the given configuration
    fn with_config(config: GraphConfig) -> Self;

    /// Creates an empty graph with the default configuration of the representation
    fn new() -> Self;
}

/// Adding nodes to a graph
pub trait GraphIdEditing: GraphNodeOrder {
    /// Adds a new node and allocates its adjacency rows.
    ///
    /// # Errors
    /// Fails with [`GraphError::DuplicateId`] if the identifier already exists.
    fn add_id(&mut self, id: &str) -> Result<Node>;

    /// Adds nodes one by one. Each addition is independent: if an identifier fails, the
    /// previously added ones remain in the graph.
    ///
    /// # Errors
    /// Fails with [`GraphError::DuplicateId`] at the first identifier that already exists.
    fn add_ids<I, S>(&mut self, ids: I) -> Result<Vec<Node>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter().map(|id| self.add_id(id.as_ref())).collect()
    }

    /// Returns the index of `id`, adding it first if it is not yet a node of the graph
    fn ensure_id(&mut self, id: &str) -> Result<Node> {
        match self.idmap().get(id) {
            Some(u) => Ok(u),
            None => self.add_id(id),
        }
    }
}

/// Adding and updating weighted edges
pub trait GraphEdgeEditing: GraphIdEditing {
    /// Writes edge `(u, v)` with the given weight.
    ///
    /// - Self loops are silently ignored unless the graph allows them.
    /// - If the edge already exists with a different weight, `reduction` decides the stored
    ///   weight; without a reduction the new weight overwrites the old one and a warning is logged.
    /// - Undirected graphs store the edge in both directions.
    ///
    /// ** Panics if `u >= n` or `v >= n` **
    fn add_edge_by_index(&mut self, u: Node, v: Node, weight: Weight, reduction: Option<Reduction>);

    /// Adds or updates an edge between two identifiers using a reduction policy.
    /// Unknown identifiers are added to the graph first.
    ///
    /// # Errors
    /// Only fails if an identifier cannot be added which cannot happen for unknown identifiers.
    fn add_edge_with(
        &mut self,
        id1: &str,
        id2: &str,
        weight: Weight,
        reduction: Option<Reduction>,
    ) -> Result<Edge> {
        let u = self.ensure_id(id1)?;
        let v = self.ensure_id(id2)?;
        self.add_edge_by_index(u, v, weight, reduction);
        Ok(Edge(u, v))
    }

    /// Adds or updates an edge between two identifiers where the latest weight wins.
    /// Unknown identifiers are added to the graph first.
    fn add_edge(&mut self, id1: &str, id2: &str, weight: Weight) -> Result<Edge> {
        self.add_edge_with(id1, id2, weight, None)
    }

    /// Adds all edges of an iterator of `(id1, id2, weight)` triples
    fn add_edges<I, S>(&mut self, edges: I, reduction: Option<Reduction>) -> Result<()>
    where
        I: IntoIterator<Item = (S, S, Weight)>,
        S: AsRef<str>,
    {
        for (id1, id2, weight) in edges {
            self.add_edge_with(id1.as_ref(), id2.as_ref(), weight, reduction)?;
        }
        Ok(())
    }
}

/// Creating a graph from a square adjacency matrix
pub trait GraphFromDense: Sized {
    /// Creates a graph with the given configuration where every nonzero entry `(i, j)` of the
    /// matrix becomes an edge between `ids[i]` and `ids[j]`. Without `ids`, nodes are named
    /// `"0", "1", ...` in row order.
    ///
    /// # Errors
    /// Fails with [`GraphError::InvalidArgument`] if the matrix is not square or the number of
    /// identifiers does not match, and with [`GraphError::DuplicateId`] for repeated identifiers.
    fn from_dense_with<S: AsRef<str>>(
        config: GraphConfig,
        matrix: &DenseMatrix,
        ids: Option<&[S]>,
    ) -> Result<Self>;

    /// Same as [`GraphFromDense::from_dense_with`] for a weighted, directed graph
    fn from_dense<S: AsRef<str>>(matrix: &DenseMatrix, ids: Option<&[S]>) -> Result<Self> {
        Self::from_dense_with(
            GraphConfig::default().weighted(true).directed(true),
            matrix,
            ids,
        )
    }
}

impl<G> GraphFromDense for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn from_dense_with<S: AsRef<str>>(
        config: GraphConfig,
        matrix: &DenseMatrix,
        ids: Option<&[S]>,
    ) -> Result<Self> {
        if !matrix.is_square() {
            return Err(GraphError::invalid(format!(
                "adjacency matrix must be square, found shape {:?}",
                matrix.shape()
            )));
        }

        let mut graph = Self::with_config(config);
        match ids {
            Some(ids) if ids.len() != matrix.rows() => {
                return Err(GraphError::invalid(format!(
                    "expected {} identifiers, found {}",
                    matrix.rows(),
                    ids.len()
                )));
            }
            Some(ids) => {
                graph.add_ids(ids)?;
            }
            None => {
                graph.add_ids((0..matrix.rows()).map(|i| i.to_string()))?;
            }
        }

        for (i, row) in matrix.iter_rows().enumerate() {
            for (j, &w) in row.iter().enumerate() {
                if w != NO_EDGE {
                    graph.add_edge_by_index(i as Node, j as Node, w, None);
                }
            }
        }

        Ok(graph)
    }
}
