//! # Matrix
//!
//! A dense `(N, N + 1)` matrix where column `0` holds the (numeric) node identifiers and
//! columns `1..=N` hold the weights from the node of the row to the node of row `j - 1`.
//! Integral identifiers are rendered without a decimal point, so `3.0` becomes `"3"`.
//!
//! Only entries above the cut threshold become edges. Nodes without any such entry are not
//! added to the graph. As a text file, the matrix is stored tab separated without a header.

use std::{fs::File, io::BufRead, path::Path};

use csv::{ReaderBuilder, Trim};
use itertools::Itertools;

use super::*;

/// A GraphReader for dense matrices
#[derive(Debug, Clone)]
pub struct MatrixReader {
    /// Configuration of the graph that is read
    config: GraphConfig,
    /// Entries with weight `<= cut_threshold` are skipped
    cut_threshold: Weight,
    /// Reduction applied when both `(i, j)` and `(j, i)` are read into an undirected graph
    reduction: Option<Reduction>,
}

impl Default for MatrixReader {
    fn default() -> Self {
        Self {
            config: GraphConfig::default(),
            cut_threshold: 0.0,
            reduction: None,
        }
    }
}

impl MatrixReader {
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

    /// Reads all entries of `matrix` above the cut threshold into an existing graph.
    ///
    /// # Errors
    /// Fails with [`GraphError::InvalidArgument`] if the matrix is not of shape `(N, N + 1)` or
    /// if an identifier occurs twice in the first column.
    pub fn try_read_into<G>(&self, graph: &mut G, matrix: &DenseMatrix) -> Result<ReadSummary>
    where
        G: GraphEdgeEditing,
    {
        let n = matrix.rows();
        raise_error_unless!(
            matrix.cols() == n + 1,
            InvalidArgument,
            "expected a matrix of shape ({n}, {}), found {:?}",
            n + 1,
            matrix.shape()
        );

        let ids = matrix
            .iter_rows()
            .map(|row| canonicalize(&row[0].to_string()).into_owned())
            .collect_vec();
        raise_error_unless!(
            ids.iter().all_unique(),
            InvalidArgument,
            "identifier column contains duplicates"
        );

        let mut summary = ReadSummary::default();
        for (i, row) in matrix.iter_rows().enumerate() {
            for (j, &weight) in row[1..].iter().enumerate() {
                if weight > self.cut_threshold {
                    graph.add_edge_with(&ids[i], &ids[j], weight, self.reduction)?;
                    summary.added += 1;
                } else if weight != NO_EDGE {
                    summary.skipped += 1;
                }
            }
        }

        summary.log(FileFormat::Matrix);
        Ok(summary)
    }

    /// Creates a new graph from `matrix` with the settings of `self`
    pub fn try_read_matrix_into_graph<G>(&self, matrix: &DenseMatrix) -> Result<G>
    where
        G: GraphNew + GraphEdgeEditing,
    {
        let mut graph = G::with_config(self.config);
        self.try_read_into(&mut graph, matrix)?;
        Ok(graph)
    }
}

/// Parses a tab separated text matrix without header
pub fn parse_tsv_matrix<R: BufRead>(reader: R) -> Result<DenseMatrix> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                field.parse::<Weight>().map_err(|_| {
                    GraphError::invalid(format!(
                        "cannot parse {field:?} in matrix row {}",
                        row_no + 1
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    DenseMatrix::from_rows(rows)
}

impl<G> GraphReader<G> for MatrixReader
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        let matrix = parse_tsv_matrix(reader)?;
        debug!(shape = ?matrix.shape(), "parsed matrix");
        self.try_read_matrix_into_graph(&matrix)
    }
}

/// Trait for creating graphs from a MatrixReader.
/// Used as shorthand for default MatrixReader settings
pub trait MatrixRead: Sized {
    /// Tries to read the graph from an in-memory matrix
    fn try_from_matrix(matrix: &DenseMatrix) -> Result<Self>;

    /// Tries to read the graph from a given reader holding a tab separated matrix
    fn try_read_matrix<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given file holding a tab separated matrix
    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_matrix(BufReader::new(File::open(path)?))
    }
}

impl<G> MatrixRead for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_from_matrix(matrix: &DenseMatrix) -> Result<Self> {
        MatrixReader::default().try_read_matrix_into_graph(matrix)
    }

    fn try_read_matrix<R: BufRead>(reader: R) -> Result<Self> {
        MatrixReader::default().try_read_graph(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> DenseMatrix {
        DenseMatrix::from_rows([
            [1.0, 0.0, 0.0, 0.4, 0.0, 0.0],
            [4.0, 0.0, 0.0, 0.0, 0.3, 0.0],
            [3.0, 0.4, 0.0, 0.0, 0.0, 0.1],
            [2.0, 0.0, 0.3, 0.0, 0.0, 0.0],
            [5.0, 0.0, 0.0, 0.1, 0.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn read_matrix_matches_edge_list() {
        let graph = SparseGraph::try_from_matrix(&fixture()).unwrap();
        assert_eq!(graph.idmap().ids(), &["1", "3", "4", "2", "5"]);
        assert_eq!(graph.number_of_edges(), 3);

        let edge_list: SparseGraph = EdgeListReader::new()
            .try_read_graph("1\t3\t0.4\n4\t2\t0.3\n3\t5\t0.1\n".as_bytes())
            .unwrap();
        assert_eq!(graph, edge_list);
    }

    #[test]
    fn read_with_cut_threshold() {
        let mut graph = SparseGraph::new();
        let summary = MatrixReader::new()
            .cut_threshold(0.2)
            .try_read_into(&mut graph, &fixture())
            .unwrap();

        assert_eq!(summary, ReadSummary { added: 4, skipped: 2 });
        assert_eq!(graph.number_of_edges(), 2);
        assert!(!graph.contains_id("5"));
    }

    #[test]
    fn read_tsv_text() {
        let input = "1\t0\t0.5\n2.0\t0.5\t0\n";
        let graph: DirectedSparseGraph = MatrixReader::new().try_read_graph(input.as_bytes()).unwrap();
        assert_eq!(graph.idmap().ids(), &["1", "2"]);
        assert_eq!(graph.number_of_edges(), 2);
        assert_eq!(graph.get_edge("2", "1").unwrap(), 0.5);

        let input = "1.5\t0\n";
        let graph = SparseGraph::try_read_matrix(input.as_bytes()).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn invalid_matrices() {
        assert!(matches!(
            SparseGraph::try_from_matrix(&DenseMatrix::new(2, 2, 0.0)),
            Err(GraphError::InvalidArgument(_))
        ));
        assert!(matches!(
            SparseGraph::try_read_matrix("1\t0\t1\n1\t1\t0\n".as_bytes()),
            Err(GraphError::InvalidArgument(msg)) if msg.contains("duplicates")
        ));
        assert!(matches!(
            SparseGraph::try_read_matrix("1\tx\n".as_bytes()),
            Err(GraphError::InvalidArgument(msg)) if msg.contains("row 1")
        ));
        assert!(matches!(
            SparseGraph::try_read_matrix("1\t0\t1\n2\t1\n".as_bytes()),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn non_integral_identifiers_are_kept() {
        let matrix = DenseMatrix::from_rows([[1.5, 0.0, 2.0], [7.0, 2.0, 0.0]]).unwrap();
        let graph = SparseGraph::try_from_matrix(&matrix).unwrap();
        assert_eq!(graph.idmap().ids(), &["1.5", "7"]);
        assert_eq!(graph.get_edge("7", "1.5").unwrap(), 2.0);
    }

    #[test]
    fn read_matrix_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.tsv");
        std::fs::write(&path, "10\t0\t1\n20\t1\t0\n").unwrap();

        let graph = SparseGraph::try_read_matrix_file(&path).unwrap();
        assert_eq!(graph.get_edge("10", "20").unwrap(), 1.0);
    }
}
