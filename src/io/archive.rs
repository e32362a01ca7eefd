//! # Archive
//!
//! A compact binary format for exact round trips. An archive holds up to four named arrays:
//! - `node_ids`: the identifiers in index order,
//! - `edge_index`: a `2 x M` array of (source, target) indices, one column per stored entry,
//! - `edge_weight`: the `M` weights of the entries, only present for weighted graphs,
//! - `config`: the flags `[weighted, directed, self_loops]` of the written graph.
//!
//! Without explicit settings, a reader rebuilds the graph with the stored `config`, so loops and
//! directed entries survive a round trip. Archives without `config` are read as default graphs.
//!
//! On disk, the arrays are snappy-compressed behind a fixed header:
//! ```text
//! magic "IDGRAPH\0" | version: u16 | body length: u64 | crc32 of body: u32 | body
//! ```
//! All integers are little endian. Weights are stored as `f64` bit patterns, so reading an
//! archive reproduces every weight exactly.

use std::{
    fs::File,
    io::{BufRead, BufWriter, ErrorKind, Read, Write},
    path::Path,
};

use crc32fast::Hasher;
use fxhash::FxHashMap;

use super::*;

const ARCHIVE_MAGIC: &[u8; 8] = b"IDGRAPH\0";
const ARCHIVE_VERSION: u16 = 1;
const HEADER_LEN: usize = ARCHIVE_MAGIC.len() + 2 + 8 + 4;

const NODE_IDS: &str = "node_ids";
const EDGE_INDEX: &str = "edge_index";
const EDGE_WEIGHT: &str = "edge_weight";
const CONFIG: &str = "config";

const KIND_STRINGS: u8 = 0;
const KIND_U32: u8 = 1;
const KIND_F64: u8 = 2;

/// In-memory content of an archive
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Archive {
    /// Identifiers in index order
    pub node_ids: Vec<String>,
    /// Sources (`edge_index[0]`) and targets (`edge_index[1]`) of all entries
    pub edge_index: [Vec<Node>; 2],
    /// Weights of all entries if the archive is weighted
    pub edge_weight: Option<Vec<Weight>>,
    /// Configuration of the written graph
    pub config: Option<GraphConfig>,
}

/// Typed payload of a named array
enum ArrayData {
    Strings(Vec<String>),
    U32(Vec<u32>),
    F64(Vec<f64>),
}

impl Archive {
    /// Collects all stored entries of `graph` in row order.
    /// Undirected edges therefore appear in both directions.
    pub fn from_graph<G: WeightedAdjacency + GraphConfigured>(graph: &G, weighted: bool) -> Self {
        let m = graph.adjacency().number_of_entries();
        let mut edge_index = [Vec::with_capacity(m), Vec::with_capacity(m)];
        let mut edge_weight = Vec::with_capacity(if weighted { m } else { 0 });

        for WeightedEdge(Edge(u, v), w) in graph.edges(false) {
            edge_index[0].push(u);
            edge_index[1].push(v);
            if weighted {
                edge_weight.push(w);
            }
        }

        Self {
            node_ids: graph.idmap().ids().to_vec(),
            edge_index,
            edge_weight: weighted.then_some(edge_weight),
            config: Some(graph.config().weighted(weighted)),
        }
    }

    /// Returns the number of stored entries
    pub fn number_of_entries(&self) -> usize {
        self.edge_index[0].len()
    }

    /// Returns the weight of the `k`-th entry or `1` if the archive is unweighted
    /// ** Panics if `k >= M` **
    pub fn weight_at(&self, k: usize) -> Weight {
        self.edge_weight.as_ref().map_or(UNIT_WEIGHT, |w| w[k])
    }

    /// Writes the archive
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut body = Vec::new();
        let num_arrays = 2 + self.edge_weight.is_some() as u16 + self.config.is_some() as u16;
        body.extend_from_slice(&num_arrays.to_le_bytes());

        let m = self.number_of_entries() as u32;

        put_array_header(&mut body, NODE_IDS, KIND_STRINGS, self.node_ids.len() as u32, 1);
        for id in &self.node_ids {
            body.extend_from_slice(&(id.len() as u32).to_le_bytes());
            body.extend_from_slice(id.as_bytes());
        }

        put_array_header(&mut body, EDGE_INDEX, KIND_U32, 2, m);
        for u in self.edge_index.iter().flatten() {
            body.extend_from_slice(&u.to_le_bytes());
        }

        if let Some(weights) = &self.edge_weight {
            put_array_header(&mut body, EDGE_WEIGHT, KIND_F64, 1, m);
            for w in weights {
                body.extend_from_slice(&w.to_le_bytes());
            }
        }

        if let Some(config) = &self.config {
            put_array_header(&mut body, CONFIG, KIND_U32, 1, 3);
            for flag in [config.weighted, config.directed, config.self_loops] {
                body.extend_from_slice(&(flag as u32).to_le_bytes());
            }
        }

        let compressed = snap::raw::Encoder::new()
            .compress_vec(&body)
            .map_err(|e| GraphError::invalid(format!("cannot compress archive: {e}")))?;

        let mut hasher = Hasher::new();
        hasher.update(&compressed);

        writer.write_all(ARCHIVE_MAGIC)?;
        writer.write_all(&ARCHIVE_VERSION.to_le_bytes())?;
        writer.write_all(&(compressed.len() as u64).to_le_bytes())?;
        writer.write_all(&hasher.finalize().to_le_bytes())?;
        writer.write_all(&compressed)?;
        writer.flush()?;

        debug!(
            nodes = self.node_ids.len(),
            entries = m,
            bytes = HEADER_LEN + compressed.len(),
            "wrote archive"
        );
        Ok(())
    }

    /// Reads and validates an archive.
    ///
    /// # Errors
    /// Fails with [`GraphError::Corruption`] if the header, checksum or any array is invalid or
    /// if an edge references a node outside of `node_ids`.
    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => GraphError::corrupt("truncated archive header"),
            _ => e.into(),
        })?;

        let mut header = ByteReader::new(&header);
        raise_error_unless!(
            header.take(ARCHIVE_MAGIC.len())? == ARCHIVE_MAGIC,
            Corruption,
            "invalid archive magic"
        );

        let version = header.u16()?;
        raise_error_unless!(
            version == ARCHIVE_VERSION,
            Corruption,
            "unsupported archive version {version}"
        );

        let body_len = header.u64()?;
        let checksum = header.u32()?;

        let mut compressed = Vec::new();
        reader.take(body_len).read_to_end(&mut compressed)?;
        raise_error_unless!(
            compressed.len() as u64 == body_len,
            Corruption,
            "truncated archive body: expected {body_len} bytes, found {}",
            compressed.len()
        );

        let mut hasher = Hasher::new();
        hasher.update(&compressed);
        raise_error_unless!(
            hasher.finalize() == checksum,
            Corruption,
            "archive checksum mismatch"
        );

        let body = snap::raw::Decoder::new()
            .decompress_vec(&compressed)
            .map_err(|e| GraphError::corrupt(format!("cannot decompress archive: {e}")))?;

        let mut arrays = parse_arrays(&body)?;

        let node_ids = match arrays.remove(NODE_IDS) {
            Some((_, ArrayData::Strings(ids))) => ids,
            _ => return Err(GraphError::corrupt("missing string array node_ids")),
        };

        let edge_index = match arrays.remove(EDGE_INDEX) {
            Some(((2, m), ArrayData::U32(mut index))) => {
                let targets = index.split_off(m as usize);
                [index, targets]
            }
            _ => return Err(GraphError::corrupt("missing 2 x M array edge_index")),
        };

        let edge_weight = match arrays.remove(EDGE_WEIGHT) {
            Some((_, ArrayData::F64(weights))) => Some(weights),
            None => None,
            _ => return Err(GraphError::corrupt("edge_weight must be a float array")),
        };

        let config = match arrays.remove(CONFIG) {
            Some(((1, 3), ArrayData::U32(flags))) if flags.iter().all(|&f| f <= 1) => {
                Some(GraphConfig {
                    weighted: flags[0] == 1,
                    directed: flags[1] == 1,
                    self_loops: flags[2] == 1,
                })
            }
            None => None,
            _ => return Err(GraphError::corrupt("config must hold three boolean flags")),
        };

        for name in arrays.keys() {
            debug!(array = name.as_str(), "ignoring unknown archive array");
        }

        let archive = Self {
            node_ids,
            edge_index,
            edge_weight,
            config,
        };
        archive.validate()?;
        Ok(archive)
    }

    /// Checks that all arrays agree in length and all indices are in bounds
    fn validate(&self) -> Result<()> {
        let n = self.node_ids.len();
        let m = self.number_of_entries();

        raise_error_unless!(
            self.edge_index[1].len() == m,
            Corruption,
            "edge_index rows differ in length"
        );
        if let Some(weights) = &self.edge_weight {
            raise_error_unless!(
                weights.len() == m,
                Corruption,
                "expected {m} edge weights, found {}",
                weights.len()
            );
        }
        if let Some(u) = self.edge_index.iter().flatten().find(|&&u| u as usize >= n) {
            return Err(GraphError::corrupt(format!(
                "edge_index references node {u} but only {n} nodes exist"
            )));
        }

        Ok(())
    }
}

fn put_array_header(body: &mut Vec<u8>, name: &str, kind: u8, rows: u32, cols: u32) {
    body.extend_from_slice(&(name.len() as u16).to_le_bytes());
    body.extend_from_slice(name.as_bytes());
    body.push(kind);
    body.extend_from_slice(&rows.to_le_bytes());
    body.extend_from_slice(&cols.to_le_bytes());
}

/// Parses all named arrays of a decompressed body
fn parse_arrays(body: &[u8]) -> Result<FxHashMap<String, ((u32, u32), ArrayData)>> {
    let mut body = ByteReader::new(body);
    let num_arrays = body.u16()?;
    let mut arrays = FxHashMap::default();

    for _ in 0..num_arrays {
        let name_len = body.u16()? as usize;
        let name = body.string(name_len)?;
        let kind = body.u8()?;
        let rows = body.u32()?;
        let cols = body.u32()?;
        let len = rows as usize * cols as usize;
        // every element occupies at least one byte
        raise_error_unless!(
            len <= body.remaining(),
            Corruption,
            "array {name} of shape ({rows}, {cols}) exceeds the archive"
        );

        let data = match kind {
            KIND_STRINGS => ArrayData::Strings(
                (0..len)
                    .map(|_| {
                        let len = body.u32()? as usize;
                        body.string(len)
                    })
                    .collect::<Result<_>>()?,
            ),
            KIND_U32 => ArrayData::U32((0..len).map(|_| body.u32()).collect::<Result<_>>()?),
            KIND_F64 => ArrayData::F64((0..len).map(|_| body.f64()).collect::<Result<_>>()?),
            _ => return Err(GraphError::corrupt(format!("unknown array kind {kind}"))),
        };

        arrays.insert(name, ((rows, cols), data));
    }

    raise_error_unless!(
        body.is_exhausted(),
        Corruption,
        "trailing bytes after archive arrays"
    );
    Ok(arrays)
}

/// Bounds-checked little endian decoding of a byte slice
struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| GraphError::corrupt(format!("unexpected end of archive at byte {}", self.pos)))?;

        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N)?);
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    fn string(&mut self, len: usize) -> Result<String> {
        String::from_utf8(self.take(len)?.to_vec())
            .map_err(|_| GraphError::corrupt("archive string is not valid UTF-8"))
    }
}

/// A GraphReader for the archive format.
///
/// Settings that are not given explicitly are taken from the configuration stored in the archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveReader {
    /// Configuration of the graph that is read, replacing the stored configuration
    config: Option<GraphConfig>,
    /// Overrides whether weights are kept
    weighted: Option<bool>,
    /// Overrides whether edges are directed
    directed: Option<bool>,
    /// If set, entries with weight `<= cut_threshold` are skipped
    cut_threshold: Option<Weight>,
}

impl ArchiveReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the configuration of the graph that is read
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Updates whether weights are kept
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.weighted = Some(weighted);
        self
    }

    /// Updates whether edges are directed
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = Some(directed);
        self
    }

    /// Returns the configuration used for `archive`: explicit settings first, then the stored
    /// configuration, then the default
    pub fn config_for(&self, archive: &Archive) -> GraphConfig {
        let mut config = self.config.or(archive.config).unwrap_or_default();
        if let Some(weighted) = self.weighted {
            config = config.weighted(weighted);
        }
        if let Some(directed) = self.directed {
            config = config.directed(directed);
        }
        config
    }

    /// Updates the cut threshold
    pub fn cut_threshold(mut self, cut_threshold: Weight) -> Self {
        self.cut_threshold = Some(cut_threshold);
        self
    }

    /// Builds a graph from an already decoded archive, keeping the identifier order
    ///
    /// # Errors
    /// Fails with [`GraphError::InvalidArgument`] if a weighted graph is requested from an
    /// archive without weights.
    pub fn try_read_archive_into_graph<G>(&self, archive: &Archive) -> Result<G>
    where
        G: GraphNew + GraphEdgeEditing,
    {
        let config = self.config_for(archive);
        raise_error_unless!(
            !config.weighted || archive.edge_weight.is_some(),
            InvalidArgument,
            "cannot read a weighted graph from an archive without edge weights"
        );

        let mut graph = G::with_config(config);
        graph.add_ids(&archive.node_ids)?;

        let mut summary = ReadSummary::default();
        let [sources, targets] = &archive.edge_index;
        for (k, (&u, &v)) in sources.iter().zip(targets).enumerate() {
            let weight = archive.weight_at(k);
            if self.cut_threshold.is_some_and(|cut| weight <= cut) {
                summary.skipped += 1;
                continue;
            }

            graph.add_edge_by_index(u, v, weight, None);
            summary.added += 1;
        }

        summary.log(FileFormat::Archive);
        Ok(graph)
    }
}

impl<G> GraphReader<G> for ArchiveReader
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        self.try_read_archive_into_graph(&Archive::read(reader)?)
    }
}

/// Trait for creating graphs from an ArchiveReader.
/// Used as shorthand for default ArchiveReader settings
pub trait ArchiveRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_archive<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given file
    fn try_read_archive_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_archive(BufReader::new(File::open(path)?))
    }
}

impl<G> ArchiveRead for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_read_archive<R: BufRead>(reader: R) -> Result<Self> {
        ArchiveReader::default().try_read_graph(reader)
    }
}

/// A writer for the archive format
#[derive(Debug, Clone, Default)]
pub struct ArchiveWriter {
    /// Overrides whether edge weights are stored
    weighted: Option<bool>,
}

impl ArchiveWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces (or suppresses) the weight array regardless of the graph configuration
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.weighted = Some(weighted);
        self
    }
}

impl<G> GraphWriter<G> for ArchiveWriter
where
    G: WeightedAdjacency + GraphConfigured,
{
    fn try_write_graph<W: Write>(&self, graph: &G, writer: W) -> Result<()> {
        let weighted = self.weighted.unwrap_or(graph.is_weighted());
        Archive::from_graph(graph, weighted).write(writer)
    }
}

/// Trait for writing a graph to a writer in the archive format.
/// Shorthand for default settings.
pub trait ArchiveWrite {
    /// Tries to write the graph to a writer
    fn try_write_archive<W: Write>(&self, writer: W) -> Result<()>;

    /// Tries to write the graph to a file
    fn try_write_archive_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_archive(writer)
    }
}

impl<G> ArchiveWrite for G
where
    G: WeightedAdjacency + GraphConfigured,
{
    fn try_write_archive<W: Write>(&self, writer: W) -> Result<()> {
        ArchiveWriter::default().try_write_graph(self, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> SparseGraph {
        let mut graph = SparseGraph::new();
        graph.add_edge("1", "3", 0.1 + 0.2).unwrap();
        graph.add_edge("4", "2", 0.3).unwrap();
        graph.add_edge("3", "5", 1e-13).unwrap();
        graph.add_id("isolated").unwrap();
        graph
    }

    fn to_bytes<G: WeightedAdjacency + GraphConfigured>(writer: ArchiveWriter, graph: &G) -> Vec<u8> {
        let mut buffer = Vec::new();
        writer.try_write_graph(graph, &mut buffer).unwrap();
        buffer
    }

    #[test]
    fn exact_round_trip() {
        let graph = graph();
        let bytes = to_bytes(ArchiveWriter::new(), &graph);
        assert_eq!(&bytes[..8], ARCHIVE_MAGIC);

        let read = SparseGraph::try_read_archive(bytes.as_slice()).unwrap();
        assert_eq!(read, graph);
        assert_eq!(read.idmap().ids(), graph.idmap().ids());
        assert_eq!(read.number_of_edges(), 3);
        assert_eq!(read.get_edge("3", "1").unwrap(), 0.1 + 0.2);
        assert_eq!(read.get_edge("5", "3").unwrap(), 1e-13);
        for u in graph.vertices() {
            assert_eq!(
                read.neighbors_of(u).collect::<Vec<_>>(),
                graph.neighbors_of(u).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn archive_layout() {
        let graph = graph();
        let archive = Archive::from_graph(&graph, true);
        assert_eq!(archive.node_ids, vec!["1", "3", "4", "2", "5", "isolated"]);
        assert_eq!(archive.number_of_entries(), 6);
        assert_eq!(archive.edge_index[0][0], 0);
        assert_eq!(archive.edge_index[1][0], 1);

        let mut buffer = Vec::new();
        archive.write(&mut buffer).unwrap();
        assert_eq!(Archive::read(buffer.as_slice()).unwrap(), archive);
    }

    #[test]
    fn unweighted_archives() {
        let graph = graph();
        let bytes = to_bytes(ArchiveWriter::new().weighted(false), &graph);
        let archive = Archive::read(bytes.as_slice()).unwrap();
        assert_eq!(archive.edge_weight, None);
        assert_eq!(archive.config, Some(GraphConfig::default().weighted(false)));

        let forced: Result<SparseGraph> = ArchiveReader::new()
            .weighted(true)
            .try_read_graph(bytes.as_slice());
        assert!(matches!(forced, Err(GraphError::InvalidArgument(_))));

        let read = SparseGraph::try_read_archive(bytes.as_slice()).unwrap();
        assert!(!read.is_weighted());
        assert_eq!(read.number_of_edges(), 3);
        assert!(read.edges(false).all(|e| e.weight() == UNIT_WEIGHT));
    }

    #[test]
    fn cut_threshold_and_directed() {
        let mut graph = DirectedSparseGraph::new();
        graph.add_edge("a", "b", 0.5).unwrap();
        graph.add_edge("b", "a", 0.1).unwrap();
        let bytes = to_bytes(ArchiveWriter::new(), &graph);

        let read: DirectedSparseGraph = ArchiveReader::new()
            .cut_threshold(0.1)
            .try_read_graph(bytes.as_slice())
            .unwrap();
        assert_eq!(read.number_of_nodes(), 2);
        assert_eq!(read.number_of_edges(), 1);
        assert_eq!(read.get_edge("a", "b").unwrap(), 0.5);
        assert_eq!(read.in_degree_of(0), 0);
    }

    #[test]
    fn self_loops_survive_round_trip() {
        let mut graph = SparseGraph::with_config(GraphConfig::default().self_loops(true));
        graph.add_edge("a", "a", 2.0).unwrap();
        graph.add_edge("a", "b", 1.0).unwrap();
        assert_eq!(graph.number_of_edges(), 2);

        let read = SparseGraph::try_read_archive(to_bytes(ArchiveWriter::new(), &graph).as_slice())
            .unwrap();
        assert!(read.allows_self_loops());
        assert_eq!(read.number_of_edges(), 2);
        assert_eq!(read.get_edge("a", "a").unwrap(), 2.0);
        assert_eq!(read, graph);
    }

    #[test]
    fn directed_sparse_graph_round_trip() {
        let mut graph = SparseGraph::with_config(GraphConfig::default().directed(true));
        graph.add_edge("a", "b", 0.5).unwrap();
        assert!(!graph.has_edge(1, 0));

        let bytes = to_bytes(ArchiveWriter::new(), &graph);
        let read = SparseGraph::try_read_archive(bytes.as_slice()).unwrap();
        assert!(read.is_directed());
        assert_eq!(read.number_of_edges(), 1);
        assert_eq!(read.get_edge("b", "a").unwrap(), NO_EDGE);
        assert_eq!(read, graph);

        let undirected: SparseGraph = ArchiveReader::new()
            .directed(false)
            .try_read_graph(bytes.as_slice())
            .unwrap();
        assert_eq!(undirected.get_edge("b", "a").unwrap(), 0.5);
    }

    #[test]
    fn archives_without_config_use_defaults() {
        let mut archive = Archive::from_graph(&graph(), true);
        archive.config = None;
        let mut buffer = Vec::new();
        archive.write(&mut buffer).unwrap();

        let read = SparseGraph::try_read_archive(buffer.as_slice()).unwrap();
        assert_eq!(read.config(), GraphConfig::default());
        assert_eq!(read, graph());
    }

    #[test]
    fn corruption_is_detected() {
        let bytes = to_bytes(ArchiveWriter::new(), &graph());

        let mut flipped = bytes.clone();
        let last = flipped.len() - 1;
        flipped[last] ^= 0xff;
        assert!(matches!(
            Archive::read(flipped.as_slice()),
            Err(GraphError::Corruption(msg)) if msg.contains("checksum")
        ));

        let mut magic = bytes.clone();
        magic[0] = b'X';
        assert!(matches!(
            Archive::read(magic.as_slice()),
            Err(GraphError::Corruption(msg)) if msg.contains("magic")
        ));

        assert!(matches!(
            Archive::read(&bytes[..10]),
            Err(GraphError::Corruption(_))
        ));
        assert!(matches!(
            Archive::read(&bytes[..bytes.len() - 1]),
            Err(GraphError::Corruption(msg)) if msg.contains("truncated")
        ));
    }

    #[test]
    fn invalid_arrays_are_rejected() {
        let archive = Archive {
            node_ids: vec!["a".into(), "b".into()],
            edge_index: [vec![0, 1], vec![1, 2]],
            edge_weight: None,
            config: None,
        };
        let mut buffer = Vec::new();
        archive.write(&mut buffer).unwrap();
        assert!(matches!(
            Archive::read(buffer.as_slice()),
            Err(GraphError::Corruption(msg)) if msg.contains("references node 2")
        ));

        let archive = Archive {
            node_ids: vec!["a".into(), "b".into()],
            edge_index: [vec![0], vec![1]],
            edge_weight: Some(vec![1.0, 2.0]),
            config: None,
        };
        let mut buffer = Vec::new();
        archive.write(&mut buffer).unwrap();
        assert!(matches!(
            Archive::read(buffer.as_slice()),
            Err(GraphError::Corruption(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.archive");

        let graph = graph();
        graph.try_write_archive_file(&path).unwrap();
        assert_eq!(SparseGraph::try_read_archive_file(&path).unwrap(), graph);
    }
}
