/*!
# Identifier Map

An [`IdMap`] is an injective mapping between opaque string identifiers and dense node indices
`0..n`. It is the source of truth for node ordering: index `i` always belongs to the `i`-th
identifier that was added.

Identifiers that look like numbers are canonicalized before insertion and lookup, so
`"1"`, `"1.0"` and `"1e0"` all refer to the same node `"1"`, and `"1.50"` and `"15e-1"` to `"1.5"`.

```
use idgraphs::idmap::IdMap;

let mut map = IdMap::new();
assert_eq!(map.add_id("a").unwrap(), 0);
assert_eq!(map.add_id("2.0").unwrap(), 1);

assert_eq!(map.index_of("2").unwrap(), 1);
assert_eq!(map.id_of(1), Some("2"));
assert!(map.add_id("a").is_err());
```
*/

use std::{borrow::Cow, ops::Index};

use fxhash::{FxHashMap, FxHashSet};

use crate::{error::*, node::*};

/// Renders numeric identifiers in a canonical form: integral values without a decimal point,
/// all other finite values in the shortest form that parses back to the same number.
///
/// Non-numeric and non-finite identifiers are returned unchanged.
pub fn canonicalize(id: &str) -> Cow<'_, str> {
    let num = match id.parse::<f64>() {
        Ok(num) if num.is_finite() => num,
        _ => return Cow::Borrowed(id),
    };

    // `{:.0}` would render negative zero as "-0"
    let rendered = if num == 0.0 {
        "0".to_string()
    } else if num.fract() == 0.0 {
        format!("{num:.0}")
    } else {
        format!("{num}")
    };

    if rendered == id {
        Cow::Borrowed(id)
    } else {
        Cow::Owned(rendered)
    }
}

/// Bidirectional mapping between identifiers and dense indices.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    /// Identifiers in index order
    ids: Vec<String>,
    /// Inverse of `ids`
    index: FxHashMap<String, Node>,
}

impl IdMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with space for `capacity` identifiers
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Creates a map from a sequence of identifiers, preserving their order.
    ///
    /// # Errors
    /// Fails with [`GraphError::DuplicateId`] if an identifier occurs twice.
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = ids.into_iter();
        let mut map = Self::with_capacity(ids.size_hint().0);
        for id in ids {
            map.add_id(id)?;
        }
        Ok(map)
    }

    /// Returns the number of identifiers
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns the number of identifiers as `NumNodes`
    pub fn number_of_nodes(&self) -> NumNodes {
        self.ids.len() as NumNodes
    }

    /// Returns *true* if the map holds no identifiers
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns *true* if the (canonicalized) identifier is present
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the index of an identifier if present
    pub fn get(&self, id: &str) -> Option<Node> {
        self.index.get(canonicalize(id).as_ref()).copied()
    }

    /// Returns the index of an identifier.
    ///
    /// # Errors
    /// Fails with [`GraphError::UnknownId`] if the identifier is not present.
    pub fn index_of(&self, id: &str) -> Result<Node> {
        self.get(id)
            .ok_or_else(|| GraphError::UnknownId(id.to_string()))
    }

    /// Returns the indices of a sequence (or set) of identifiers in input order.
    ///
    /// # Errors
    /// Fails with [`GraphError::UnknownId`] for the first identifier that is not present;
    /// no partial result is returned.
    pub fn indices_of<I, S>(&self, ids: I) -> Result<Vec<Node>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .map(|id| self.index_of(id.as_ref()))
            .collect()
    }

    /// Returns the identifier at a given index
    pub fn id_of(&self, u: Node) -> Option<&str> {
        self.ids.get(u as usize).map(String::as_str)
    }

    /// Returns all identifiers in index order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Returns an iterator over all identifiers in index order
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.ids.iter()
    }

    /// Appends a new identifier and returns its index.
    ///
    /// # Errors
    /// Fails with [`GraphError::DuplicateId`] if the (canonicalized) identifier already exists.
    pub fn add_id<S: AsRef<str>>(&mut self, id: S) -> Result<Node> {
        let id = canonicalize(id.as_ref()).into_owned();
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }

        Ok(self.push_canonical(id))
    }

    /// Appends an identifier that is canonical and not yet present
    fn push_canonical(&mut self, id: String) -> Node {
        let u = self.number_of_nodes();
        self.index.insert(id.clone(), u);
        self.ids.push(id);
        u
    }

    /// Removes an identifier and returns its former index.
    ///
    /// All identifiers behind the removed one move down by one index to keep indices contiguous.
    /// This takes `O(n)` time. Callers holding per-node data must perform the same shift, which is
    /// why graphs do not expose node removal.
    ///
    /// # Errors
    /// Fails with [`GraphError::UnknownId`] if the identifier is not present.
    pub fn remove(&mut self, id: &str) -> Result<Node> {
        let key = canonicalize(id);
        let u = self
            .index
            .remove(key.as_ref())
            .ok_or_else(|| GraphError::UnknownId(key.into_owned()))?;

        self.ids.remove(u as usize);
        for (offset, id) in self.ids[u as usize..].iter().enumerate() {
            if let Some(idx) = self.index.get_mut(id.as_str()) {
                *idx = u + offset as Node;
            }
        }

        Ok(u)
    }

    /// Returns a new map holding all identifiers of `self` followed by the
    /// identifiers of `other` that are not yet in `self`.
    pub fn union(&self, other: &IdMap) -> IdMap {
        let mut map = self.clone();
        for id in other.iter() {
            if !map.index.contains_key(id) {
                map.push_canonical(id.clone());
            }
        }
        map
    }

    /// Returns a new map holding the identifiers of `self` that are not in `other`
    pub fn difference(&self, other: &IdMap) -> IdMap {
        let mut map = IdMap::new();
        for id in self.iter().filter(|id| !other.index.contains_key(*id)) {
            map.push_canonical(id.clone());
        }
        map
    }

    /// Returns the identifiers as a set
    pub fn id_set(&self) -> FxHashSet<&str> {
        self.ids.iter().map(String::as_str).collect()
    }
}

/// Two maps are equal if they hold the same set of identifiers, regardless of order
impl PartialEq for IdMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.ids.iter().all(|id| other.index.contains_key(id))
    }
}

impl Eq for IdMap {}

impl Index<Node> for IdMap {
    type Output = str;

    /// ** Panics if `u >= n` **
    fn index(&self, u: Node) -> &Self::Output {
        &self.ids[u as usize]
    }
}

impl<'a> IntoIterator for &'a IdMap {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn map_ab() -> IdMap {
        IdMap::from_ids(["a", "b"]).unwrap()
    }

    #[test]
    fn canonicalize_numeric() {
        assert_eq!(canonicalize("1"), "1");
        assert_eq!(canonicalize("1.0"), "1");
        assert_eq!(canonicalize("1e3"), "1000");
        assert_eq!(canonicalize("-0.0"), "0");
        assert_eq!(canonicalize("007"), "7");
        assert_eq!(canonicalize("1.5"), "1.5");
        assert_eq!(canonicalize("1.50"), "1.5");
        assert_eq!(canonicalize("15e-1"), "1.5");
        assert_eq!(canonicalize("-0.250"), "-0.25");
        assert_eq!(canonicalize("0.1"), "0.1");
        assert_eq!(canonicalize("nan"), "nan");
        assert_eq!(canonicalize("inf"), "inf");
        assert_eq!(canonicalize("ncbigene:7157"), "ncbigene:7157");
        assert!(matches!(canonicalize("42"), Cow::Borrowed(_)));
    }

    #[test]
    fn add_and_lookup() {
        let mut map = IdMap::new();
        assert!(map.is_empty());
        assert_eq!(map.add_id("a").unwrap(), 0);
        assert_eq!(map.add_id("b").unwrap(), 1);
        assert_eq!(map.len(), 2);

        assert_eq!(map.index_of("a").unwrap(), 0);
        assert_eq!(map.id_of(1), Some("b"));
        assert_eq!(&map[0], "a");
        assert_eq!(map.id_of(2), None);
        assert!(map.contains("b"));
        assert!(!map.contains("c"));
    }

    #[test]
    fn duplicate_id_fails() {
        let mut map = map_ab();
        assert!(matches!(map.add_id("a"), Err(GraphError::DuplicateId(id)) if id == "a"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn numeric_spellings_collapse() {
        let mut map = IdMap::new();
        map.add_id("1").unwrap();
        assert!(map.add_id("1.0").is_err());
        assert_eq!(map.index_of("1.000").unwrap(), 0);
        assert_eq!(map.ids(), &["1".to_string()]);

        assert_eq!(map.add_id("1.50").unwrap(), 1);
        assert!(matches!(map.add_id("1.5"), Err(GraphError::DuplicateId(id)) if id == "1.5"));
        assert!(map.add_id("15e-1").is_err());
        assert_eq!(map.index_of("1.500").unwrap(), 1);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn distinct_ids_get_distinct_indices() {
        let mut map = IdMap::new();
        let ids = ["x", "y", "3", "3.0", "z", "x"];
        let added = ids.iter().filter_map(|id| map.add_id(id).ok()).collect_vec();
        assert_eq!(added, vec![0, 1, 2, 3]);
        assert_eq!(map.len(), 4);
        assert_eq!(added.iter().unique().count(), added.len());
    }

    #[test]
    fn batch_lookup_is_ordered_and_atomic() {
        let map = map_ab();
        assert_eq!(map.indices_of(["b", "a"]).unwrap(), vec![1, 0]);
        assert_eq!(map.indices_of(vec!["a".to_string()]).unwrap(), vec![0]);
        assert!(matches!(
            map.indices_of(["a", "q", "b"]),
            Err(GraphError::UnknownId(id)) if id == "q"
        ));
        assert!(matches!(map.index_of("q"), Err(GraphError::UnknownId(_))));
    }

    #[test]
    fn remove_shifts_indices() {
        let mut map = IdMap::from_ids(["a", "b", "c", "d"]).unwrap();
        assert_eq!(map.remove("b").unwrap(), 1);
        assert_eq!(map.ids(), &["a", "c", "d"]);
        for (i, id) in map.iter().enumerate() {
            assert_eq!(map.index_of(id).unwrap(), i as Node);
        }
        assert!(matches!(map.remove("b"), Err(GraphError::UnknownId(_))));
    }

    #[test]
    fn equality_ignores_order() {
        let mut lhs = map_ab();
        let mut rhs = IdMap::from_ids(["b", "a"]).unwrap();
        assert_eq!(lhs, rhs);

        lhs.add_id("c").unwrap();
        lhs.add_id("d").unwrap();
        rhs.add_id("d").unwrap();
        assert_ne!(lhs, rhs);

        rhs.add_id("c").unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn union_and_difference() {
        let lhs = IdMap::from_ids(["a", "b", "c"]).unwrap();
        let rhs = IdMap::from_ids(["c", "d"]).unwrap();

        assert_eq!(lhs.union(&rhs).ids(), &["a", "b", "c", "d"]);
        assert_eq!(lhs.difference(&rhs).ids(), &["a", "b"]);
        assert!(rhs.difference(&rhs).is_empty());

        let numeric = IdMap::from_ids(["1.0", "2.50"]).unwrap();
        let union = numeric.union(&IdMap::from_ids(["2.5", "3"]).unwrap());
        assert_eq!(union.ids(), &["1", "2.5", "3"]);
        assert_eq!(union.index_of("3.0").unwrap(), 2);
        assert_eq!(union.difference(&numeric).ids(), &["3"]);
    }

    #[test]
    fn iteration_follows_index_order() {
        let map = IdMap::from_ids(["a", "b", "x"]).unwrap();
        assert_eq!(map.iter().collect_vec(), vec!["a", "b", "x"]);
        assert_eq!((&map).into_iter().count(), 3);
    }
}
