/*!
`idgraphs` is a sparse graph library for graphs whose nodes are addressed by **string identifiers**,
such as gene or protein networks.

# Representation

Every graph pairs an [`IdMap`](crate::idmap::IdMap) with adjacency storage:

- The **IdMap** assigns every identifier a dense index `0..n` in insertion order.
  Nodes are represented as `u32` indices internally, edges as tuple-struct `Edge(Node, Node)`.
- The **AdjacencyStore** holds one insertion-ordered, weighted neighborhood per node.

### Directed vs Undirected

- In an **undirected** graph, every edge `{u, v}` is stored in the rows of both endpoints and
  counted once.
- In a **directed** graph, `(u, v)` and `(v, u)` are distinct. The
  [`DirectedSparseGraph`](crate::repr::DirectedSparseGraph) additionally maintains the reverse
  adjacency for in-neighbor queries.

Writing an edge that already exists is resolved by an optional [`Reduction`](crate::repr::Reduction)
(keep the minimum or the maximum weight); without one, the latest weight wins and a warning is logged.

# Design

Readers, writers and algorithms are provided as configurable structs using the *Builder* pattern.
The most common functionality is additionally implemented via traits on the graphs themselves,
making it usable with default settings.

# Usage

- [`prelude`] includes identifiers, nodes, edges, errors, basic graph operations and all graph
  representations,
- [`algo`] includes the induced subgraph extraction,
- [`io`] includes readers and writers for edge lists, dense matrices, binary archives and
  Cytoscape exchange streams,
- [`utils`] includes a worker pool for batch work around graphs.

Lower level access is available in submodules, eg. [`repr::digest`] computes a `Sha256`-hash of a
graph that is independent of insertion order.

In most use-cases, `use idgraphs::{prelude::*, algo::*, io::*};` suffices.

```
use idgraphs::{prelude::*, algo::*};

let mut graph = SparseGraph::new();
graph.add_edge("1", "3", 0.4).unwrap();
graph.add_edge("4", "2", 0.3).unwrap();
graph.add_edge("3", "5", 0.1).unwrap();

assert_eq!(graph.number_of_nodes(), 5);
assert_eq!(graph.get_edge("3", "1").unwrap(), 0.4);

let sub = graph.induced_subgraph(["1", "3", "5"]).unwrap();
assert_eq!(sub.number_of_edges(), 2);
```
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod idmap;
pub mod io;
pub mod node;
pub mod ops;
pub mod repr;
pub(crate) mod testing;
pub mod utils;

/// `idgraphs::prelude` includes definitions for identifiers, nodes, edges and errors, all basic
/// graph operation traits as well as all implemented representations.
pub mod prelude {
    pub use super::{edge::*, error::*, idmap::*, node::*, ops::*, repr::*};
}
