use std::{iter::Copied, slice::Iter};

use fxhash::FxHashMap;
use tracing::warn;

use super::*;

/// Weighted neighborhood of a single node.
///
/// Neighbors are kept in insertion order so that row reconstruction and serialization are
/// deterministic; a hash index provides `O(1)` lookups by neighbor.
#[derive(Debug, Clone, Default)]
pub struct WeightedNeighborhood {
    entries: Vec<(Node, Weight)>,
    positions: FxHashMap<Node, u32>,
}

impl WeightedNeighborhood {
    /// Creates an empty neighborhood
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of neighbors in the Neighborhood
    pub fn len(&self) -> NumNodes {
        self.entries.len() as NumNodes
    }

    /// Returns *true* if the Neighborhood is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the weight to `v` if `v` is a neighbor
    pub fn weight_to(&self, v: Node) -> Option<Weight> {
        self.positions
            .get(&v)
            .map(|&pos| self.entries[pos as usize].1)
    }

    /// Returns *true* if `v` is in the Neighborhood
    pub fn has_neighbor(&self, v: Node) -> bool {
        self.positions.contains_key(&v)
    }

    /// Returns an iterator over all `(neighbor, weight)` pairs in insertion order
    pub fn neighbors(&self) -> Copied<Iter<'_, (Node, Weight)>> {
        self.entries.iter().copied()
    }

    /// Returns all `(neighbor, weight)` pairs as a slice
    pub fn as_slice(&self) -> &[(Node, Weight)] {
        &self.entries
    }

    /// Sets the weight to `v` and returns the previous weight if `v` was a neighbor before.
    /// Existing neighbors keep their position.
    pub fn insert(&mut self, v: Node, weight: Weight) -> Option<Weight> {
        if let Some(&pos) = self.positions.get(&v) {
            let old = std::mem::replace(&mut self.entries[pos as usize].1, weight);
            Some(old)
        } else {
            self.positions.insert(v, self.entries.len() as u32);
            self.entries.push((v, weight));
            None
        }
    }
}

/// Adjacency list: one [`WeightedNeighborhood`] per node, indexed by node.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyStore {
    rows: Vec<WeightedNeighborhood>,
    num_entries: usize,
}

impl AdjacencyStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty row for a newly added node
    pub fn push_row(&mut self) {
        self.rows.push(WeightedNeighborhood::new());
    }

    /// Returns the number of rows
    pub fn number_of_rows(&self) -> NumNodes {
        self.rows.len() as NumNodes
    }

    /// Returns the total number of entries over all rows
    pub fn number_of_entries(&self) -> usize {
        self.num_entries
    }

    /// Returns the row of `u`
    /// ** Panics if `u >= n` **
    pub fn row(&self, u: Node) -> &WeightedNeighborhood {
        &self.rows[u as usize]
    }

    /// Returns an iterator over all rows in node order
    pub fn rows(&self) -> Iter<'_, WeightedNeighborhood> {
        self.rows.iter()
    }

    /// Returns the weight at `[u][v]` if present
    /// ** Panics if `u >= n` **
    pub fn weight(&self, u: Node, v: Node) -> Option<Weight> {
        self.rows[u as usize].weight_to(v)
    }

    /// Writes `weight` at `[u][v]` (and `[v][u]` if `mirror`), resolving a conflict with an
    /// existing different weight through `reduction`. Without a reduction the new weight wins and
    /// a warning naming both identifiers is logged.
    ///
    /// Returns the committed weight and whether `[u][v]` is a new entry.
    /// ** Panics if `u >= n` or `v >= n` **
    pub(crate) fn write_edge(
        &mut self,
        u: Node,
        v: Node,
        weight: Weight,
        reduction: Option<Reduction>,
        mirror: bool,
        idmap: &IdMap,
    ) -> (Weight, bool) {
        let weight = match (self.weight(u, v), reduction) {
            (Some(old), Some(reduction)) if old != weight => reduction.reduce(old, weight),
            (Some(old), None) if old != weight => {
                warn!(
                    source = &idmap[u],
                    target = &idmap[v],
                    old_weight = old,
                    new_weight = weight,
                    "edge exists with a different weight, overwriting it"
                );
                weight
            }
            _ => weight,
        };

        let is_new = self.set_weight(u, v, weight);
        if mirror && u != v {
            self.set_weight(v, u, weight);
        }

        (weight, is_new)
    }

    /// Sets `[u][v]` without any conflict handling and returns *true* if the entry is new
    /// ** Panics if `u >= n` or `v >= n` **
    pub(crate) fn set_weight(&mut self, u: Node, v: Node, weight: Weight) -> bool {
        assert!((v as usize) < self.rows.len());
        let is_new = self.rows[u as usize].insert(v, weight).is_none();
        self.num_entries += is_new as usize;
        is_new
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn store_with_rows(n: NumNodes) -> (AdjacencyStore, IdMap) {
        let mut store = AdjacencyStore::new();
        let idmap = IdMap::from_ids((0..n).map(|u| format!("v{u}"))).unwrap();
        for _ in 0..n {
            store.push_row();
        }
        (store, idmap)
    }

    #[test]
    fn neighborhood_keeps_insertion_order() {
        let mut nbs = WeightedNeighborhood::new();
        assert_eq!(nbs.insert(5, 0.5), None);
        assert_eq!(nbs.insert(1, 0.1), None);
        assert_eq!(nbs.insert(3, 0.3), None);
        assert_eq!(nbs.insert(1, 0.2), Some(0.1));

        assert_eq!(nbs.len(), 3);
        assert_eq!(
            nbs.neighbors().collect_vec(),
            vec![(5, 0.5), (1, 0.2), (3, 0.3)]
        );
        assert_eq!(nbs.weight_to(1), Some(0.2));
        assert_eq!(nbs.weight_to(2), None);
        assert!(!nbs.has_neighbor(2));
    }

    #[test]
    fn mirrored_write() {
        let (mut store, idmap) = store_with_rows(3);
        assert_eq!(store.write_edge(0, 2, 0.7, None, true, &idmap), (0.7, true));
        assert_eq!(store.weight(0, 2), Some(0.7));
        assert_eq!(store.weight(2, 0), Some(0.7));
        assert_eq!(store.number_of_entries(), 2);

        // self loops are only stored once
        store.write_edge(1, 1, 1.0, None, true, &idmap);
        assert_eq!(store.number_of_entries(), 3);
    }

    #[test]
    fn reductions_on_conflict() {
        let (mut store, idmap) = store_with_rows(2);
        store.write_edge(0, 1, 1.0, None, false, &idmap);

        assert_eq!(
            store.write_edge(0, 1, 3.0, Some(Reduction::Min), false, &idmap),
            (1.0, false)
        );
        assert_eq!(
            store.write_edge(0, 1, 3.0, Some(Reduction::Max), false, &idmap),
            (3.0, false)
        );
        assert_eq!(
            store.write_edge(0, 1, 2.0, None, false, &idmap),
            (2.0, false)
        );
        assert_eq!(store.number_of_entries(), 1);
    }
}
