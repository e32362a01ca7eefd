/*!
# IO

Readers and writers connecting graphs to files.

## Input Formats

- **EdgeList**: one edge `id1 TAB id2 [TAB weight]` per line.
- **Matrix**: a dense `(N, N + 1)` matrix whose first column holds the node identifiers.
- **Archive**: a checksummed binary file of node identifiers, an edge index and edge weights.
- **Cx**: the JSON aspect stream of the Cytoscape exchange format.

## Output Formats

For writing graphs, the **EdgeList** and **Archive** formats are supported. The archive is the
preferred format for exact round trips as it avoids any floating point text formatting.

## Traits

- Every format has a configurable reader implementing [`GraphReader`] (and a writer implementing
  [`GraphWriter`] if it can be written), plus shorthand traits on the graphs for default settings
  (eg. [`EdgeListRead`]).
- [`GraphRead`] and [`GraphWrite`] select the format at runtime via [`FileFormat`].

Readers log per-record skips at `debug` level and a summary at `info` level via `tracing`.
*/

pub mod archive;
pub mod cx;
pub mod edge_list;
pub mod matrix;

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use tracing::{debug, info};

use crate::prelude::*;

pub use archive::*;
pub use cx::*;
pub use edge_list::*;
pub use matrix::*;

/// Supported graph formats, selected by name via [`FromStr`] (eg. from a configuration file)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Tab separated edge list
    EdgeList,
    /// Tab separated dense matrix with an identifier column
    Matrix,
    /// Binary archive
    Archive,
    /// Cytoscape exchange JSON stream
    Cx,
}

impl FromStr for FileFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "edgelist" | "edglst" => Ok(FileFormat::EdgeList),
            "matrix" => Ok(FileFormat::Matrix),
            "archive" => Ok(FileFormat::Archive),
            "cx" => Ok(FileFormat::Cx),
            _ => Err(GraphError::invalid(format!("unknown file format {s:?}"))),
        }
    }
}

/// A configured reader producing graphs of type `G` from one specific format
pub trait GraphReader<G> {
    /// Builds a new graph from `reader` using the settings of `self`.
    ///
    /// # Errors
    /// Fails on IO errors and on input that violates the format.
    fn try_read_graph<R>(&self, reader: R) -> Result<G>
    where
        R: BufRead;

    /// Same as [`GraphReader::try_read_graph`] for a (buffered) file at `path`.
    ///
    /// # Errors
    /// Additionally fails if the file cannot be opened.
    fn try_read_graph_file<P>(&self, path: P) -> Result<G>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        info!(path = %path.display(), "reading graph");
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// A configured writer serializing graphs of type `G` into one specific format
pub trait GraphWriter<G> {
    /// Serializes `graph` into `writer` using the settings of `self`.
    ///
    /// # Errors
    /// Fails on IO errors.
    fn try_write_graph<W>(&self, graph: &G, writer: W) -> Result<()>
    where
        W: Write;

    /// Same as [`GraphWriter::try_write_graph`] for a (buffered) file at `path`.
    ///
    /// # Errors
    /// Additionally fails if the file cannot be created.
    fn try_write_graph_file<P>(&self, graph: &G, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        info!(path = %path.display(), "writing graph");
        self.try_write_graph(graph, BufWriter::new(File::create(path)?))
    }
}

/// Reading a graph with default reader settings when the format is only known at runtime
pub trait GraphRead: Sized {
    /// Dispatches to the default reader of `format`.
    ///
    /// # Errors
    /// Fails like the reader of `format`.
    fn try_from_reader<R>(reader: R, format: FileFormat) -> Result<Self>
    where
        R: BufRead;

    /// Dispatches to the default reader of `format` for a (buffered) file at `path`.
    ///
    /// # Errors
    /// Fails like the reader of `format` or if the file cannot be opened.
    fn try_from_file<P>(path: P, format: FileFormat) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::try_from_reader(BufReader::new(File::open(path)?), format)
    }
}

impl<G> GraphRead for G
where
    G: EdgeListRead + MatrixRead + ArchiveRead + CxRead,
{
    fn try_from_reader<R>(reader: R, format: FileFormat) -> Result<Self>
    where
        R: BufRead,
    {
        match format {
            FileFormat::EdgeList => Self::try_read_edge_list(reader),
            FileFormat::Matrix => Self::try_read_matrix(reader),
            FileFormat::Archive => Self::try_read_archive(reader),
            FileFormat::Cx => Self::try_read_cx(reader),
        }
    }
}

/// Writing a graph with default writer settings when the format is only known at runtime.
/// Only [`FileFormat::EdgeList`] and [`FileFormat::Archive`] can be written.
pub trait GraphWrite {
    /// Dispatches to the default writer of `format`.
    ///
    /// # Errors
    /// Fails with [`GraphError::InvalidArgument`] for read-only formats and on IO errors.
    fn try_write_to_writer<W>(&self, writer: W, format: FileFormat) -> Result<()>
    where
        W: Write;

    /// Dispatches to the default writer of `format` for a (buffered) file at `path`.
    ///
    /// # Errors
    /// Fails like [`GraphWrite::try_write_to_writer`] or if the file cannot be created.
    fn try_write_to_file<P>(&self, path: P, format: FileFormat) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_to_writer(BufWriter::new(File::create(path)?), format)
    }
}

impl<G> GraphWrite for G
where
    G: EdgeListWrite + ArchiveWrite,
{
    fn try_write_to_writer<W>(&self, writer: W, format: FileFormat) -> Result<()>
    where
        W: Write,
    {
        match format {
            FileFormat::EdgeList => self.try_write_edge_list(writer),
            FileFormat::Archive => self.try_write_archive(writer),
            FileFormat::Matrix | FileFormat::Cx => Err(GraphError::invalid(format!(
                "{format:?} graphs can only be read"
            ))),
        }
    }
}

/// Number of records a reader applied to the graph and number of records it skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Records that were written into the graph
    pub added: usize,
    /// Records that were skipped (cut off, filtered or malformed)
    pub skipped: usize,
}

impl ReadSummary {
    /// Logs the summary at `info` level
    pub(crate) fn log(&self, format: FileFormat) {
        info!(?format, added = self.added, skipped = self.skipped, "finished reading graph");
    }
}

/// Returns early with the given error variant when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $variant : ident, $($info : tt)+) => {
        if !($cond) {
            return Err(GraphError::$variant(format!($($info)+)));
        }
    };
}

use raise_error_unless;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_format_from_str() {
        assert_eq!("EdgeList".parse::<FileFormat>().unwrap(), FileFormat::EdgeList);
        assert_eq!("edglst".parse::<FileFormat>().unwrap(), FileFormat::EdgeList);
        assert_eq!("archive".parse::<FileFormat>().unwrap(), FileFormat::Archive);
        assert_eq!("cx".parse::<FileFormat>().unwrap(), FileFormat::Cx);
        assert!(matches!(
            "metis".parse::<FileFormat>(),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn dispatch_round_trip() {
        let mut graph = SparseGraph::new();
        graph.add_edge("a", "b", 0.5).unwrap();
        graph.add_edge("b", "c", 0.25).unwrap();

        for format in [FileFormat::EdgeList, FileFormat::Archive] {
            let mut buffer = Vec::new();
            graph.try_write_to_writer(&mut buffer, format).unwrap();
            let read = SparseGraph::try_from_reader(buffer.as_slice(), format).unwrap();
            assert_eq!(read, graph);
        }

        assert!(matches!(
            graph.try_write_to_writer(Vec::new(), FileFormat::Cx),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.edg");

        let mut graph = DirectedSparseGraph::new();
        graph.add_edge("x", "y", 2.0).unwrap();
        graph.add_edge("y", "x", 3.0).unwrap();

        graph.try_write_to_file(&path, FileFormat::EdgeList).unwrap();
        let read = DirectedSparseGraph::try_from_file(&path, FileFormat::EdgeList).unwrap();
        assert_eq!(read, graph);
    }
}
