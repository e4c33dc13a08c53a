//! Square integer matrix.

use crate::error::{BlockMulError, Result};
use std::fmt;
use std::ops::{Index, IndexMut};

/// An n×n matrix of `i64`, stored row-major in one contiguous buffer.
///
/// Cell `(r, c)` lives at `data[r * n + c]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    n: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// n×n matrix with every cell set to zero.
    pub fn zeros(n: usize) -> Self {
        Matrix {
            n,
            data: vec![0; n * n],
        }
    }

    /// n×n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Builds a matrix by calling `f(row, col)` for every cell.
    pub fn from_fn<F>(n: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> i64,
    {
        let mut data = Vec::with_capacity(n * n);
        for r in 0..n {
            for c in 0..n {
                data.push(f(r, c));
            }
        }
        Matrix { n, data }
    }

    /// Builds a matrix from nested rows.
    ///
    /// Every row must be as long as the number of rows.
    ///
    /// # Example
    ///
    /// ```
    /// use blockmul::Matrix;
    ///
    /// let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    /// assert_eq!(m[(1, 0)], 3);
    ///
    /// assert!(Matrix::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != n {
                return Err(BlockMulError::NotSquare {
                    row,
                    expected: n,
                    found: cells.len(),
                });
            }
            data.extend(cells);
        }
        Ok(Matrix { n, data })
    }

    /// Side length.
    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.n && col < self.n {
            Some(self.data[row * self.n + col])
        } else {
            None
        }
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[i64] {
        &self.data[row * self.n..(row + 1) * self.n]
    }

    /// Row-major cells.
    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        (0..self.n).map(|r| self.row(r).to_vec()).collect()
    }

    #[inline]
    fn check_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.n && col < self.n,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.n,
            self.n
        );
    }

    pub(crate) fn from_raw(n: usize, data: Vec<i64>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        Matrix { n, data }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [i64] {
        &mut self.data
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = i64;

    fn index(&self, (row, col): (usize, usize)) -> &i64 {
        self.check_bounds(row, col);
        &self.data[row * self.n + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut i64 {
        self.check_bounds(row, col);
        &mut self.data[row * self.n + col]
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.n).map(|r| self.row(r)))
            .finish()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.n {
            let cells: Vec<String> = self.row(r).iter().map(|v| v.to_string()).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
