//! # Cx
//!
//! The Cytoscape exchange format is a JSON array of aspect objects, each mapping an aspect name
//! to a list of records. Only four aspects are read:
//! - `nodes`: `{"@id", "n", "r"}`, the node identifier is taken from the name (`n`) or the
//!   represented entity (`r`),
//! - `edges`: `{"@id", "s", "t", "i"}` with source, target and interaction type,
//! - `nodeAttributes`: `{"po", "n", "v"}`, the `alias` attribute may replace the node identifier,
//! - `edgeAttributes`: `{"po", "n", "v"}`, a numeric attribute may provide edge weights.
//!
//! All other aspects are ignored. Nodes and edges that do not survive the prefix, interaction
//! type or converter filters are skipped and logged at `debug` level. Only the edges are written
//! into the graph, so nodes without any surviving edge never become part of it.

use std::{
    fmt,
    fs::File,
    io::BufRead,
    path::Path,
};

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use super::*;

/// Field of a node record that holds its identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeIdEntry {
    /// The name `n` of the node
    #[serde(rename = "n")]
    Name,
    /// The represented entity `r` of the node, eg. `ncbigene:1234`
    #[default]
    #[serde(rename = "r")]
    Represents,
}

impl FromStr for NodeIdEntry {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "n" => Ok(NodeIdEntry::Name),
            "r" => Ok(NodeIdEntry::Represents),
            _ => Err(GraphError::invalid(format!("unknown node identifier entry {s:?}"))),
        }
    }
}

/// Settings of a [`CxReader`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CxOptions {
    /// Only edges with one of these interaction types are read; all if `None`
    pub interaction_types: Option<Vec<String>>,
    /// Only identifiers starting with this prefix are kept, stripped up to the first `:`;
    /// all identifiers are kept verbatim if `None`
    pub node_id_prefix: Option<String>,
    /// Field of the node record holding the identifier
    pub node_id_entry: NodeIdEntry,
    /// Weight of edges without a weight attribute
    pub default_edge_weight: Weight,
    /// Name of the edge attribute holding numeric weights
    pub edge_weight_attr_name: Option<String>,
    /// Reduction applied to repeated edges
    pub reduction: Option<Reduction>,
    /// If *true*, identifiers are read from the first `alias` node attribute matching the prefix
    pub use_node_alias: bool,
}

impl Default for CxOptions {
    fn default() -> Self {
        Self {
            interaction_types: None,
            node_id_prefix: Some("ncbigene".to_owned()),
            node_id_entry: NodeIdEntry::Represents,
            default_edge_weight: UNIT_WEIGHT,
            edge_weight_attr_name: None,
            reduction: Some(Reduction::Max),
            use_node_alias: false,
        }
    }
}

/// Maps node identifiers of an input to the identifiers stored in the graph.
///
/// Any `Fn(&str) -> Option<String>` is a converter.
pub trait IdConverter {
    /// Called once with all identifiers before any call to [`IdConverter::convert`],
    /// eg. to resolve them in bulk
    fn prepare(&self, _ids: &[&str]) {}

    /// Returns the converted identifier or `None` if `id` cannot be converted
    fn convert(&self, id: &str) -> Option<String>;
}

impl<F> IdConverter for F
where
    F: Fn(&str) -> Option<String>,
{
    fn convert(&self, id: &str) -> Option<String> {
        self(id)
    }
}

/// A GraphReader for Cytoscape exchange streams
pub struct CxReader<'c> {
    /// Configuration of the graph that is read
    config: GraphConfig,
    options: CxOptions,
    converter: Option<Box<dyn IdConverter + 'c>>,
}

impl Default for CxReader<'_> {
    fn default() -> Self {
        Self {
            config: GraphConfig::default(),
            options: CxOptions::default(),
            converter: None,
        }
    }
}

impl fmt::Debug for CxReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CxReader")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

impl<'c> CxReader<'c> {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the configuration of the graph that is read
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Updates whether edges are directed
    pub fn directed(mut self, directed: bool) -> Self {
        self.config = self.config.directed(directed);
        self
    }

    /// Replaces all options at once
    pub fn options(mut self, options: CxOptions) -> Self {
        self.options = options;
        self
    }

    /// Restricts edges to the given interaction types
    pub fn interaction_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.interaction_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Updates the required identifier prefix
    pub fn node_id_prefix<S: Into<String>>(mut self, prefix: Option<S>) -> Self {
        self.options.node_id_prefix = prefix.map(Into::into);
        self
    }

    /// Updates the field holding node identifiers
    pub fn node_id_entry(mut self, entry: NodeIdEntry) -> Self {
        self.options.node_id_entry = entry;
        self
    }

    /// Updates the weight of edges without weight attribute
    pub fn default_edge_weight(mut self, weight: Weight) -> Self {
        self.options.default_edge_weight = weight;
        self
    }

    /// Updates the name of the edge attribute holding weights
    pub fn edge_weight_attr_name<S: Into<String>>(mut self, name: S) -> Self {
        self.options.edge_weight_attr_name = Some(name.into());
        self
    }

    /// Updates the reduction applied to repeated edges
    pub fn reduction(mut self, reduction: Option<Reduction>) -> Self {
        self.options.reduction = reduction;
        self
    }

    /// Updates whether identifiers are read from `alias` node attributes
    pub fn use_node_alias(mut self, use_alias: bool) -> Self {
        self.options.use_node_alias = use_alias;
        self
    }

    /// Sets a converter applied to every node identifier
    pub fn id_converter<C: IdConverter + 'c>(mut self, converter: C) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    /// Reads all edges of a stream into an existing graph.
    ///
    /// # Errors
    /// Fails on IO and JSON errors, with [`GraphError::InvalidArgument`] if an aspect is not a
    /// list of records or if aliases are used without an identifier prefix.
    pub fn try_read_into<G, R>(&self, graph: &mut G, reader: R) -> Result<ReadSummary>
    where
        G: GraphEdgeEditing,
        R: BufRead,
    {
        raise_error_unless!(
            !self.options.use_node_alias || self.options.node_id_prefix.is_some(),
            InvalidArgument,
            "node_id_prefix is required when reading node aliases"
        );

        let stream = CxStream::parse(reader)?;
        debug!(
            nodes = stream.nodes.len(),
            edges = stream.edges.len(),
            node_attributes = stream.node_attributes.len(),
            edge_attributes = stream.edge_attributes.len(),
            "parsed cx stream"
        );

        let ids = self.convert_ids(self.node_ids(&stream));
        let weights = self.edge_weights(&stream);

        let mut summary = ReadSummary::default();
        for edge in &stream.edges {
            let (Some(id1), Some(id2)) = (ids.get(&edge.s), ids.get(&edge.t)) else {
                debug!(edge = edge.id, "skipping edge with unknown endpoint");
                summary.skipped += 1;
                continue;
            };

            if let Some(types) = &self.options.interaction_types {
                if !edge.i.as_ref().is_some_and(|i| types.contains(i)) {
                    debug!(edge = edge.id, interaction = ?edge.i, "skipping edge with mismatching interaction type");
                    summary.skipped += 1;
                    continue;
                }
            }

            let weight = weights
                .get(&edge.id)
                .copied()
                .unwrap_or(self.options.default_edge_weight);
            graph.add_edge_with(id1, id2, weight, self.options.reduction)?;
            summary.added += 1;
        }

        summary.log(FileFormat::Cx);
        Ok(summary)
    }

    /// Maps node record ids to identifiers, either from the node aspect or from aliases
    fn node_ids(&self, stream: &CxStream) -> FxHashMap<u64, String> {
        let prefix = self.options.node_id_prefix.as_deref();
        let mut ids = FxHashMap::default();

        if self.options.use_node_alias {
            let Some(prefix) = prefix else {
                return ids;
            };

            for attr in stream.node_attributes.iter().filter(|a| a.n == "alias") {
                match attr.strings().into_iter().find_map(|v| strip_prefix(v, prefix)) {
                    Some(id) => {
                        ids.insert(attr.po, id.to_owned());
                    }
                    None => debug!(node = attr.po, "skipping node without matching alias"),
                }
            }
            return ids;
        }

        for node in &stream.nodes {
            let Some(name) = node.entry(self.options.node_id_entry) else {
                debug!(node = node.id, entry = ?self.options.node_id_entry, "skipping node without identifier");
                continue;
            };

            let id = match prefix {
                None => name,
                Some(prefix) => match strip_prefix(name, prefix) {
                    Some(id) => id,
                    None => {
                        debug!(node = node.id, name, prefix, "skipping node with mismatching prefix");
                        continue;
                    }
                },
            };
            ids.insert(node.id, id.to_owned());
        }

        ids
    }

    /// Applies the converter (if any), dropping identifiers it cannot convert
    fn convert_ids(&self, ids: FxHashMap<u64, String>) -> FxHashMap<u64, String> {
        let Some(converter) = &self.converter else {
            return ids;
        };

        info!(ids = ids.len(), "converting node identifiers");
        {
            let raw: Vec<&str> = ids.values().map(String::as_str).collect();
            converter.prepare(&raw);
        }

        ids.into_iter()
            .filter_map(|(node, id)| match converter.convert(&id) {
                Some(converted) => Some((node, converted)),
                None => {
                    debug!(node, id = id.as_str(), "skipping node without converted identifier");
                    None
                }
            })
            .collect()
    }

    /// Collects numeric values of the weight attribute keyed by edge record id
    fn edge_weights(&self, stream: &CxStream) -> FxHashMap<u64, Weight> {
        let Some(attr_name) = self.options.edge_weight_attr_name.as_deref() else {
            return FxHashMap::default();
        };

        let mut weights = FxHashMap::default();
        for attr in stream.edge_attributes.iter().filter(|a| a.n == attr_name) {
            match attr.number() {
                Some(weight) => {
                    weights.insert(attr.po, weight);
                }
                None => debug!(edge = attr.po, value = %attr.v, "skipping non-numeric edge weight"),
            }
        }
        weights
    }
}

/// Returns the part after the first `:` if `value` starts with `prefix`
fn strip_prefix<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if value.starts_with(prefix) {
        value.split(':').nth(1)
    } else {
        None
    }
}

#[derive(Debug, Deserialize)]
struct CxNode {
    #[serde(rename = "@id")]
    id: u64,
    n: Option<String>,
    r: Option<String>,
}

impl CxNode {
    fn entry(&self, entry: NodeIdEntry) -> Option<&str> {
        match entry {
            NodeIdEntry::Name => self.n.as_deref(),
            NodeIdEntry::Represents => self.r.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CxEdge {
    #[serde(rename = "@id")]
    id: u64,
    s: u64,
    t: u64,
    i: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CxAttribute {
    po: u64,
    n: String,
    #[serde(default)]
    v: Value,
}

impl CxAttribute {
    /// String values of a single or list valued attribute
    fn strings(&self) -> SmallVec<[&str; 2]> {
        match &self.v {
            Value::String(s) => SmallVec::from_iter([s.as_str()]),
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => SmallVec::new(),
        }
    }

    /// Numeric value of the attribute; numeric strings are parsed
    fn number(&self) -> Option<Weight> {
        match &self.v {
            Value::Number(x) => x.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// The aspects of a stream relevant for graphs.
/// Aspects may be split across several objects of the stream.
#[derive(Debug, Default)]
struct CxStream {
    nodes: Vec<CxNode>,
    edges: Vec<CxEdge>,
    node_attributes: Vec<CxAttribute>,
    edge_attributes: Vec<CxAttribute>,
}

impl CxStream {
    fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let aspects: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;

        let mut stream = CxStream::default();
        for (name, records) in aspects.into_iter().flatten() {
            match name.as_str() {
                "nodes" => collect_records(&name, records, &mut stream.nodes)?,
                "edges" => collect_records(&name, records, &mut stream.edges)?,
                "nodeAttributes" => collect_records(&name, records, &mut stream.node_attributes)?,
                "edgeAttributes" => collect_records(&name, records, &mut stream.edge_attributes)?,
                _ => {}
            }
        }

        Ok(stream)
    }
}

/// Deserializes every record of an aspect on its own; malformed records are skipped
fn collect_records<T: DeserializeOwned>(aspect: &str, records: Value, out: &mut Vec<T>) -> Result<()> {
    let Value::Array(records) = records else {
        return Err(GraphError::invalid(format!(
            "aspect {aspect:?} is not a list of records"
        )));
    };

    out.reserve(records.len());
    for record in records {
        match serde_json::from_value(record) {
            Ok(record) => out.push(record),
            Err(err) => debug!(aspect, %err, "skipping malformed record"),
        }
    }
    Ok(())
}

impl<G> GraphReader<G> for CxReader<'_>
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        let mut graph = G::with_config(self.config);
        self.try_read_into(&mut graph, reader)?;
        Ok(graph)
    }
}

/// Trait for creating graphs from a CxReader.
/// Used as shorthand for default CxReader settings
pub trait CxRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_cx<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given file
    fn try_read_cx_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_cx(BufReader::new(File::open(path)?))
    }
}

impl<G> CxRead for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_read_cx<R: BufRead>(reader: R) -> Result<Self> {
        CxReader::default().try_read_graph(reader)
    }
}
