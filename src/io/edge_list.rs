//! # EdgeList
//!
//! The EdgeList-Format consists of one line `id1 TAB id2 [TAB weight]` per edge.
//! A missing weight defaults to `1`. Lines may mix both variants, each is parsed on its own.
//! Identifiers are trimmed; empty lines are ignored.

use std::{
    fs::File,
    io::{BufRead, BufWriter, Write},
    path::Path,
};

use smallvec::SmallVec;

use super::*;

/// Reader for tab separated `id1 id2 [weight]` lines
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    /// Configuration of the graph that is read
    config: GraphConfig,
    /// Edges with weight `<= cut_threshold` are skipped
    cut_threshold: Weight,
    /// Reduction applied to repeated edges
    reduction: Option<Reduction>,
    /// If *true*, malformed lines are logged and skipped instead of failing the read
    skip_malformed: bool,
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: Option<String>,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self {
            config: GraphConfig::default(),
            cut_threshold: 0.0,
            reduction: None,
            skip_malformed: false,
            comment_identifier: None,
        }
    }
}

impl EdgeListReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the configuration of the graph that is read
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Updates whether weights are kept
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.config = self.config.weighted(weighted);
        self
    }

    /// Updates whether edges are directed
    pub fn directed(mut self, directed: bool) -> Self {
        self.config = self.config.directed(directed);
        self
    }

    /// Updates the cut threshold
    pub fn cut_threshold(mut self, cut_threshold: Weight) -> Self {
        self.cut_threshold = cut_threshold;
        self
    }

    /// Updates the reduction applied to repeated edges
    pub fn reduction(mut self, reduction: Option<Reduction>) -> Self {
        self.reduction = reduction;
        self
    }

    /// Updates whether malformed lines are skipped
    pub fn skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    /// Updates the comment identifier
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> Self {
        self.comment_identifier = Some(c.into());
        self
    }

    /// Reads all edges into an existing graph.
    /// The configuration of `graph` takes precedence over the configuration of the reader.
    ///
    /// # Errors
    /// Fails on IO errors and, unless malformed lines are skipped, with
    /// [`GraphError::InvalidArgument`] naming the first malformed line.
    pub fn try_read_into<G, R>(&self, graph: &mut G, reader: R) -> Result<ReadSummary>
    where
        G: GraphEdgeEditing,
        R: BufRead,
    {
        let mut summary = ReadSummary::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            let line_no = line_no + 1;

            if line.trim().is_empty()
                || self
                    .comment_identifier
                    .as_deref()
                    .is_some_and(|c| line.starts_with(c))
            {
                continue;
            }

            let fields: SmallVec<[&str; 3]> = line.split('\t').map(str::trim).collect();
            let (id1, id2, weight) = match fields.as_slice() {
                [id1, id2] => (*id1, *id2, UNIT_WEIGHT),
                [id1, id2, weight] => match weight.parse::<Weight>() {
                    Ok(weight) => (*id1, *id2, weight),
                    Err(_) => {
                        self.malformed(line_no, &format!("cannot parse weight {weight:?}"))?;
                        summary.skipped += 1;
                        continue;
                    }
                },
                _ => {
                    self.malformed(line_no, &format!("expected 2 or 3 fields, found {}", fields.len()))?;
                    summary.skipped += 1;
                    continue;
                }
            };

            if id1.is_empty() || id2.is_empty() {
                self.malformed(line_no, "empty identifier")?;
                summary.skipped += 1;
                continue;
            }

            if weight <= self.cut_threshold {
                debug!(line = line_no, weight, "edge at or below cut threshold");
                summary.skipped += 1;
                continue;
            }

            graph.add_edge_with(id1, id2, weight, self.reduction)?;
            summary.added += 1;
        }

        summary.log(FileFormat::EdgeList);
        Ok(summary)
    }

    /// Fails with a description of the malformed line unless malformed lines are skipped
    fn malformed(&self, line_no: usize, reason: &str) -> Result<()> {
        raise_error_unless!(
            self.skip_malformed,
            InvalidArgument,
            "malformed edge list record in line {line_no}: {reason}"
        );
        debug!(line = line_no, reason, "skipping malformed edge list record");
        Ok(())
    }
}

impl<G> GraphReader<G> for EdgeListReader
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        let mut graph = G::with_config(self.config);
        self.try_read_into(&mut graph, reader)?;
        Ok(graph)
    }
}

/// Reading tab separated edge lists with default [`EdgeListReader`] settings
pub trait EdgeListRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given file
    fn try_read_edge_list_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_edge_list(BufReader::new(File::open(path)?))
    }
}

impl<G> EdgeListRead for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self> {
        EdgeListReader::default().try_read_graph(reader)
    }
}

/// Writer for tab separated `id1 id2 [weight]` lines.
///
/// Undirected edges are written once, starting at the endpoint that was added to the graph first.
#[derive(Debug, Clone)]
pub struct EdgeListWriter {
    /// Edges with weight `<= cut_threshold` are omitted
    cut_threshold: Weight,
    /// Number of decimal places of written weights
    precision: usize,
    /// Overrides whether a weight column is written
    weighted: Option<bool>,
}

impl Default for EdgeListWriter {
    fn default() -> Self {
        Self {
            cut_threshold: 0.0,
            precision: 12,
            weighted: None,
        }
    }
}

impl EdgeListWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the cut threshold
    pub fn cut_threshold(mut self, cut_threshold: Weight) -> Self {
        self.cut_threshold = cut_threshold;
        self
    }

    /// Updates the number of decimal places of written weights
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Forces (or suppresses) the weight column regardless of the graph configuration
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.weighted = Some(weighted);
        self
    }
}

impl<G> GraphWriter<G> for EdgeListWriter
where
    G: WeightedAdjacency + GraphConfigured,
{
    fn try_write_graph<W: Write>(&self, graph: &G, mut writer: W) -> Result<()> {
        let weighted = self.weighted.unwrap_or(graph.is_weighted());

        for WeightedEdge(Edge(u, v), w) in graph.edges(graph.is_undirected()) {
            if w <= self.cut_threshold {
                continue;
            }

            let (id1, id2) = (graph.id_of(u), graph.id_of(v));
            if weighted {
                writeln!(writer, "{id1}\t{id2}\t{w:.prec$}", prec = self.precision)?;
            } else {
                writeln!(writer, "{id1}\t{id2}")?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

/// Writing tab separated edge lists with default [`EdgeListWriter`] settings
pub trait EdgeListWrite {
    /// Tries to write the graph to a writer
    fn try_write_edge_list<W: Write>(&self, writer: W) -> Result<()>;

    /// Tries to write the graph to a file
    fn try_write_edge_list_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_edge_list(writer)
    }
}

impl<G> EdgeListWrite for G
where
    G: WeightedAdjacency + GraphConfigured,
{
    fn try_write_edge_list<W: Write>(&self, writer: W) -> Result<()> {
        EdgeListWriter::default().try_write_graph(self, writer)
    }
}
