/*!
# Dense Matrices

A minimal row-major matrix of weights used to hand graph rows to collaborators
([`WeightedAdjacency::rows_of`], [`WeightedAdjacency::to_dense_matrix`]) and to build graphs
from dense input ([`GraphFromDense`], [`MatrixReader`](crate::io::MatrixReader)).
*/

use std::{
    ops::{Index, IndexMut},
    slice::ChunksExact,
};

use crate::prelude::*;

/// Row-major `rows x cols` matrix of weights
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Weight>,
}

impl DenseMatrix {
    /// Creates a `rows x cols` matrix filled with `fill`
    pub fn new(rows: usize, cols: usize, fill: Weight) -> Self {
        Self {
            rows,
            cols,
            data: vec![fill; rows * cols],
        }
    }

    /// Creates a matrix from a list of rows.
    ///
    /// # Errors
    /// Fails with [`GraphError::InvalidArgument`] if the rows have different lengths.
    pub fn from_rows<R: AsRef<[Weight]>>(rows: impl IntoIterator<Item = R>) -> Result<Self> {
        let mut data = Vec::new();
        let mut num_rows = 0;
        let mut num_cols = None;

        for row in rows {
            let row = row.as_ref();
            match num_cols {
                None => num_cols = Some(row.len()),
                Some(cols) if cols != row.len() => {
                    return Err(GraphError::invalid(format!(
                        "row {num_rows} has {} columns, expected {cols}",
                        row.len()
                    )));
                }
                _ => {}
            }

            data.extend_from_slice(row);
            num_rows += 1;
        }

        Ok(Self {
            rows: num_rows,
            cols: num_cols.unwrap_or(0),
            data,
        })
    }

    /// Returns the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns *true* if the matrix has as many rows as columns
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns *true* if the matrix is square and equal to its transpose
    pub fn is_symmetric(&self) -> bool {
        self.is_square()
            && (0..self.rows).all(|i| (i + 1..self.cols).all(|j| self[(i, j)] == self[(j, i)]))
    }

    /// Returns the `i`-th row
    /// ** Panics if `i >= rows` **
    pub fn row(&self, i: usize) -> &[Weight] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns the entry at `(i, j)` if in bounds
    pub fn get(&self, i: usize, j: usize) -> Option<Weight> {
        (i < self.rows && j < self.cols).then(|| self.data[i * self.cols + j])
    }

    /// Returns an iterator over all rows
    pub fn iter_rows(&self) -> ChunksExact<'_, Weight> {
        // `chunks_exact(0)` panics, but a matrix without columns has no entries anyway
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Returns the underlying row-major data
    pub fn as_slice(&self) -> &[Weight] {
        &self.data
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = Weight;

    /// ** Panics if `(i, j)` is out of bounds **
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(j < self.cols);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    /// ** Panics if `(i, j)` is out of bounds **
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        assert!(j < self.cols);
        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn from_rows() {
        let matrix = DenseMatrix::from_rows([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(matrix.shape(), (3, 2));
        assert!(!matrix.is_square());
        assert_eq!(matrix.row(1), &[3.0, 4.0]);
        assert_eq!(matrix[(2, 0)], 5.0);
        assert_eq!(matrix.get(2, 1), Some(6.0));
        assert_eq!(matrix.get(3, 0), None);
        assert_eq!(matrix.iter_rows().count(), 3);

        assert!(matches!(
            DenseMatrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn symmetry() {
        let mut matrix = DenseMatrix::new(3, 3, 0.0);
        matrix[(0, 2)] = 1.0;
        assert!(!matrix.is_symmetric());
        matrix[(2, 0)] = 1.0;
        assert!(matrix.is_symmetric());
        assert_eq!(
            matrix.iter_rows().map(|r| r.to_vec()).collect_vec(),
            vec![vec![0.0, 0.0, 1.0], vec![0.0; 3], vec![1.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn empty_matrix() {
        let matrix = DenseMatrix::from_rows(Vec::<Vec<Weight>>::new()).unwrap();
        assert_eq!(matrix.shape(), (0, 0));
        assert!(matrix.is_square());
        assert_eq!(matrix.iter_rows().count(), 0);

        let no_cols = DenseMatrix::new(2, 0, 0.0);
        assert_eq!(no_cols.iter_rows().count(), 0);
    }
}
