/*!
# Graph Representations

All graphs of this crate pair an [`IdMap`] with one or two [`AdjacencyStore`]s:

- [`SparseGraph`] stores a single (outgoing) adjacency store. Undirected graphs mirror every edge
  into both endpoints' rows.
- [`DirectedSparseGraph`] additionally stores a reverse adjacency store holding the incoming edges
  of every node, kept in lockstep with every mutation.

Both representations are configured once at construction by a [`GraphConfig`].
Conflicting writes to an existing edge are resolved by an optional [`Reduction`].
*/

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

mod directed;
mod neighborhood;
mod sparse;

pub mod dense;
pub mod digest;

pub use dense::DenseMatrix;
pub use directed::*;
pub use neighborhood::*;
pub use sparse::*;

/// Construction-time configuration of a graph.
///
/// Use the Builder-Pattern to deviate from the default of a weighted, undirected graph without
/// self loops:
/// ```
/// use idgraphs::prelude::*;
///
/// let config = GraphConfig::default().weighted(false).self_loops(true);
/// assert!(!config.weighted && !config.directed && config.self_loops);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// If *false*, every edge carries weight `1`
    pub weighted: bool,
    /// If *false*, every edge is stored in both directions
    pub directed: bool,
    /// If *false*, edges `(u, u)` are silently dropped
    pub self_loops: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            weighted: true,
            directed: false,
            self_loops: false,
        }
    }
}

impl GraphConfig {
    /// Updates whether edges carry weights
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Updates whether edges are directed
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Updates whether self loops are stored
    pub fn self_loops(mut self, self_loops: bool) -> Self {
        self.self_loops = self_loops;
        self
    }

    /// Returns the weight that is actually stored for a requested weight
    pub fn effective_weight(&self, weight: Weight) -> Weight {
        if self.weighted { weight } else { UNIT_WEIGHT }
    }
}

/// Rule to resolve a write to an existing edge with a different weight.
///
/// Used as `Option<Reduction>` where `None` means that the latest write wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Keep the smaller weight
    Min,
    /// Keep the larger weight
    Max,
}

impl Reduction {
    /// Reduces an existing and a new weight to the weight that is stored
    pub fn reduce(self, old: Weight, new: Weight) -> Weight {
        match self {
            Reduction::Min => old.min(new),
            Reduction::Max => old.max(new),
        }
    }

    /// Parses an optional reduction where `"none"` and `""` map to `None`
    pub fn parse_optional(s: &str) -> Result<Option<Self>> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

impl FromStr for Reduction {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "min" => Ok(Reduction::Min),
            "max" => Ok(Reduction::Max),
            _ => Err(GraphError::invalid(format!("unknown reduction type {s:?}"))),
        }
    }
}

pub(crate) mod macros {
    /// Implements all read-only operations and node insertion for a struct with fields
    /// `idmap`, `config`, `num_edges` and the adjacency store `$nbs`.
    /// Every store listed in `$stores` receives a new row when a node is added.
    macro_rules! impl_common_graph_ops {
        ($struct:ident => $nbs:ident; $($stores:ident),+) => {
            impl GraphConfigured for $struct {
                fn config(&self) -> GraphConfig {
                    self.config
                }
            }

            impl GraphNodeOrder for $struct {
                fn idmap(&self) -> &IdMap {
                    &self.idmap
                }
            }

            impl GraphEdgeOrder for $struct {
                fn number_of_edges(&self) -> NumEdges {
                    self.num_edges
                }

                fn number_of_entries(&self) -> usize {
                    self.$nbs.number_of_entries()
                }
            }

            impl WeightedAdjacency for $struct {
                fn adjacency(&self) -> &AdjacencyStore {
                    &self.$nbs
                }
            }

            impl GraphIdEditing for $struct {
                fn add_id(&mut self, id: &str) -> Result<Node> {
                    let u = self.idmap.add_id(id)?;
                    $(
                        self.$stores.push_row();
                    )+
                    Ok(u)
                }
            }

            /// Two graphs are equal if they share the configuration, the set of identifiers and
            /// the weighted edges between them, regardless of node order
            impl PartialEq for $struct {
                fn eq(&self, other: &Self) -> bool {
                    self.config == other.config
                        && self.idmap == other.idmap
                        && self.number_of_entries() == other.number_of_entries()
                        && self.edges(false).all(|WeightedEdge(Edge(u, v), w)| {
                            match (
                                other.idmap.get(self.id_of(u)),
                                other.idmap.get(self.id_of(v)),
                            ) {
                                (Some(ou), Some(ov)) => other.weight_of(ou, ov) == Some(w),
                                _ => false,
                            }
                        })
                }
            }
        };
    }

    pub(crate) use impl_common_graph_ops;
}
