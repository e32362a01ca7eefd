/*!
# Node Representation

Every node of a graph is addressed twice: by an opaque string identifier chosen by the user, and by
a dense index `0..n` assigned in insertion order by the graph's [`IdMap`](crate::idmap::IdMap).

We choose `Node = u32` for the dense index as biological and social networks rarely exceed `2^32`
nodes. This saves space in the adjacency lists as compared to `usize`.
*/

/// Dense node index in the range `0..n`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// Edge weights are stored as double precision floats
pub type Weight = f64;

/// Weight reported for a pair of nodes that is not connected
pub const NO_EDGE: Weight = 0.0;

/// Weight every edge carries in an unweighted graph
pub const UNIT_WEIGHT: Weight = 1.0;
