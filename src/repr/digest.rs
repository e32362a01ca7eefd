/*!
# Graph Hash Digests

[`GraphDigest`] fingerprints a graph by its content rather than by its insertion order: two graphs
with the same configuration, identifiers and weighted edges hash to the same value, regardless of
the order in which they were built. Edges are hashed by identifier, not by index, after sorting.

## Example
```
use idgraphs::{prelude::*, repr::digest::GraphDigest};

let mut lhs = SparseGraph::new();
lhs.add_edge("a", "b", 0.5).unwrap();
lhs.add_edge("c", "b", 0.25).unwrap();

let mut rhs = SparseGraph::new();
rhs.add_edge("b", "c", 0.25).unwrap();
rhs.add_edge("a", "b", 0.5).unwrap();

// hex encoded SHA-256
assert_eq!(lhs.digest_sha256(), rhs.digest_sha256());
assert_eq!(lhs.digest_sha256().len(), 64);
```
*/

use std::fmt::LowerHex;

use ::digest::{Digest, Output};
use itertools::Itertools;

use super::*;

/// Order independent content hash of a graph
pub trait GraphDigest {
    /// Hashes the graph with `D` and returns the hex encoded output
    fn digest<D>(&self) -> String
    where
        Output<D>: LowerHex,
        D: Digest;

    /// Shorthand for `digest::<Sha256>()` (64 hex characters)
    fn digest_sha256(&self) -> String {
        self.digest::<sha2::Sha256>()
    }
}

impl<G> GraphDigest for G
where
    G: WeightedAdjacency + GraphConfigured,
{
    fn digest<D>(&self) -> String
    where
        Output<D>: LowerHex,
        D: Digest,
    {
        let mut hasher = D::new();

        // length-prefix every identifier so that concatenations cannot collide
        let encode_id = |hasher: &mut D, id: &str| {
            hasher.update((id.len() as u32).to_le_bytes());
            hasher.update(id.as_bytes());
        };

        let config = self.config();
        hasher.update([
            config.weighted as u8,
            config.directed as u8,
            config.self_loops as u8,
        ]);

        hasher.update(self.number_of_nodes().to_le_bytes());
        for id in self.idmap().iter().sorted_unstable() {
            encode_id(&mut hasher, id);
        }

        let edges = self
            .edges(false)
            .map(|WeightedEdge(Edge(u, v), w)| {
                let (a, b) = (self.id_of(u), self.id_of(v));
                let (a, b) = if config.directed || a <= b { (a, b) } else { (b, a) };
                (a, b, w.to_bits())
            })
            .sorted_unstable()
            .dedup();

        for (a, b, w) in edges {
            encode_id(&mut hasher, a);
            encode_id(&mut hasher, b);
            hasher.update(w.to_le_bytes());
        }

        format!("{:x}", hasher.finalize())
    }
}
