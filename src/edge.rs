use std::fmt::{Debug, Display};

use crate::node::{Node, Weight};

/// An edge is defined by two nodes/endpoints.
/// Is is up to the graph whether an Edge is directed or not.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = u32;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Normalizes the edge such that the endpoint with smaller value comes first
    pub fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    /// Returns true if the endpoint with smaller index comes first
    pub fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }

    /// Attaches a weight to the edge
    pub fn with_weight(self, weight: Weight) -> WeightedEdge {
        WeightedEdge(self, weight)
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

/// An [`Edge`] together with its weight.
///
/// Weights are floats, so `WeightedEdge` only implements `PartialEq`.
#[derive(Copy, Clone, PartialEq)]
pub struct WeightedEdge(pub Edge, pub Weight);

impl WeightedEdge {
    /// Returns the unweighted edge
    pub fn edge(&self) -> Edge {
        self.0
    }

    /// Returns the weight of the edge
    pub fn weight(&self) -> Weight {
        self.1
    }

    /// Returns the source endpoint
    pub fn source(&self) -> Node {
        self.0.0
    }

    /// Returns the target endpoint
    pub fn target(&self) -> Node {
        self.0.1
    }
}

impl Display for WeightedEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{};{})", self.0.0, self.0.1, self.1)
    }
}

impl Debug for WeightedEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl From<(Node, Node, Weight)> for WeightedEdge {
    fn from(value: (Node, Node, Weight)) -> Self {
        WeightedEdge(Edge(value.0, value.1), value.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_and_reverse() {
        let e = Edge(4, 1);
        assert!(!e.is_normalized());
        assert_eq!(e.normalized(), Edge(1, 4));
        assert_eq!(e.reverse(), Edge(1, 4));
        assert!(Edge(2, 2).is_loop());
    }

    #[test]
    fn weighted_edge_accessors() {
        let e = Edge(0, 3).with_weight(0.25);
        assert_eq!(e.source(), 0);
        assert_eq!(e.target(), 3);
        assert_eq!(e.weight(), 0.25);
        assert_eq!(format!("{e}"), "(0,3;0.25)");
    }
}
