/*!
# Subgraph Algorithms

Provides the [`Subgraph`] trait for extracting node-induced subgraphs addressed by identifiers.
The result is always an independent deep copy of the selected part of the source graph.
*/

use super::*;

/// A trait for creating induced subgraphs from a graph.
pub trait Subgraph: Sized {
    /// Creates an **induced subgraph** of type `GO` containing exactly the nodes `ids` (in the
    /// given order) and every edge of `self` whose both endpoints are among them.
    /// Weights are copied verbatim; the configuration of `self` is carried over.
    ///
    /// # Errors
    /// Fails with [`GraphError::UnknownId`] if any identifier is not a node of `self`
    /// (before anything is built) and with [`GraphError::DuplicateId`] if an identifier is
    /// requested twice.
    fn induced_subgraph_as<GO, I, S>(&self, ids: I) -> Result<GO>
    where
        GO: GraphNew + GraphEdgeEditing + GraphConfigured,
        I: IntoIterator<Item = S>,
        S: AsRef<str>;

    /// Creates an induced subgraph of the same type as `Self`.
    ///
    /// This is shorthand for [`Subgraph::induced_subgraph_as`] where the output graph type
    /// matches the input.
    fn induced_subgraph<I, S>(&self, ids: I) -> Result<Self>
    where
        Self: GraphNew + GraphEdgeEditing + GraphConfigured,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.induced_subgraph_as(ids)
    }
}

impl<G> Subgraph for G
where
    G: WeightedAdjacency + GraphConfigured,
{
    fn induced_subgraph_as<GO, I, S>(&self, ids: I) -> Result<GO>
    where
        GO: GraphNew + GraphEdgeEditing + GraphConfigured,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vertices = self.idmap().indices_of(ids)?;

        let mut graph = GO::with_config(self.config());
        let mut mapping = vec![INVALID_NODE; self.len()];
        for &old in &vertices {
            mapping[old as usize] = graph.add_id(self.id_of(old))?;
        }

        for &u in &vertices {
            let new_u = mapping[u as usize];
            for (v, w) in self.neighbors_of(u) {
                let new_v = mapping[v as usize];
                if new_v == INVALID_NODE {
                    continue;
                }

                // undirected targets mirror every write, so each pair is written once
                if graph.is_directed() || Edge(new_u, new_v).is_normalized() {
                    graph.add_edge_by_index(new_u, new_v, w, None);
                }
            }
        }

        debug!(
            nodes = graph.number_of_nodes(),
            source_nodes = self.number_of_nodes(),
            "built induced subgraph"
        );

        Ok(graph)
    }
}
