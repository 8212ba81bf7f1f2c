//! # Linalg functions
//!
//! Dense matrix primitive and the elementary row and column operations
//! that the tableau algorithms are built on.

use itertools::iproduct;
use thiserror::Error;

/// Error kind for matrix operations that may fail on well-formed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinalgError {
    /// The matrix admits no inverse.
    #[error("tried to invert a singular matrix")]
    Singular,
}

/// Creates an identity matrix based on the input size `n`
pub fn identity_matrix(n: usize) -> Matrix {
    let mut t: Vec<f64> = Vec::with_capacity(n*n);
    for r in 0..n {
        for i in 0..n {
            if r == i {
                t.push(1.);
            } else {
                t.push(0.);
            }
        }
    }
    Matrix { val: t, ncols: n, nrows: n }
}

/// Data structure for a dense matrix, stored row major in a flat `Vec`.
#[derive(Debug)]
#[derive(Default)]
pub struct Matrix {
    /// `Vec` holding the values of the matrix. Note that `val.len()` must be equal to the product of `ncols` and `nrows`.
    pub val: Vec<f64>,
    /// Number of columns of the matrix
    pub ncols: usize,
    /// Number of rows of the matrix
    pub nrows: usize
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        return Matrix {
            val : self.val.to_vec(),
            ncols: self.ncols,
            nrows: self.nrows
        }
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        return (self.val == other.val) & (self.ncols == other.ncols) & (self.nrows == other.nrows);
    }
}

/// Multiplies two matrices with the standard dot-product accumulation.
/// The number of columns of `mat1` must equal the number of rows of `mat2`.
///
/// # Example:
///
/// ```
/// use simplexrs::linalg::Matrix;
/// use simplexrs::linalg::multiply;
/// let res = multiply(
///     &Matrix::new(3, 2, vec![1., 2., 3., 4., 5., 6.]),
///     &Matrix::new(2, 2, vec![7., 8., 9., 10.]));
/// assert_eq!(res, Matrix::new(3, 2, vec![25., 28., 57., 64., 89., 100.]));
/// ```
pub fn multiply(mat1: &Matrix, mat2: &Matrix) -> Matrix {
    if !(mat1.ncols == mat2.nrows) {
        panic!("Dimensions does not match, cannot multiply matrices of shapes ({},{}) and ({},{})", mat1.nrows, mat1.ncols, mat2.nrows, mat2.ncols);
    }
    let mut result = Matrix::zeros(mat1.nrows, mat2.ncols);
    for (i, j) in iproduct!(0..mat1.nrows, 0..mat2.ncols) {
        let mut acc = 0.0;
        for z in 0..mat1.ncols {
            acc = acc + mat1.at(i, z) * mat2.at(z, j);
        }
        result.set(i, j, acc);
    }
    return result;
}

impl Matrix {

    /// Creates a new matrix of shape (`nrows`, `ncols`) from the row major buffer `val`.
    /// The buffer length must equal the product of the dimensions, and both dimensions
    /// must be at least 1.
    pub fn new(nrows: usize, ncols: usize, val: Vec<f64>) -> Matrix {
        assert!(nrows >= 1 && ncols >= 1, "a matrix must have at least one row and one column");
        assert!(val.len() == nrows * ncols, "buffer of length {} cannot hold a ({},{}) matrix", val.len(), nrows, ncols);
        return Matrix { val, ncols, nrows }
    }

    /// Creates a new zero filled matrix of shape (`nrows`, `ncols`).
    pub fn zeros(nrows: usize, ncols: usize) -> Matrix {
        assert!(nrows >= 1 && ncols >= 1, "a matrix must have at least one row and one column");
        return Matrix { val: vec![0.0; nrows * ncols], ncols, nrows }
    }

    /// Returns the element at position (`row`, `col`).
    pub fn at(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.nrows && col < self.ncols, "position ({},{}) is outside a ({},{}) matrix", row, col, self.nrows, self.ncols);
        return self.val[row * self.ncols + col];
    }

    /// Sets the element at position (`row`, `col`) to `value`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.nrows && col < self.ncols, "position ({},{}) is outside a ({},{}) matrix", row, col, self.nrows, self.ncols);
        self.val[row * self.ncols + col] = value;
    }

    /// Swaps the two distinct rows `row1` and `row2`.
    pub fn swap_rows(&mut self, row1: usize, row2: usize) {
        assert!(row1 < self.nrows && row2 < self.nrows, "row outside a matrix with {} rows", self.nrows);
        assert!(row1 != row2, "cannot swap a row with itself");
        for j in 0..self.ncols {
            self.val.swap(row1 * self.ncols + j, row2 * self.ncols + j);
        }
    }

    /// Swaps the two distinct columns `col1` and `col2`.
    pub fn swap_columns(&mut self, col1: usize, col2: usize) {
        assert!(col1 < self.ncols && col2 < self.ncols, "column outside a matrix with {} columns", self.ncols);
        assert!(col1 != col2, "cannot swap a column with itself");
        for i in 0..self.nrows {
            self.val.swap(i * self.ncols + col1, i * self.ncols + col2);
        }
    }

    /// Multiplies every element of `row` by `k`.
    pub fn scale_row(&mut self, row: usize, k: f64) {
        assert!(row < self.nrows, "row {} outside a matrix with {} rows", row, self.nrows);
        for j in 0..self.ncols {
            self.val[row * self.ncols + j] *= k;
        }
    }

    /// Multiplies every element of `col` by `k`.
    pub fn scale_column(&mut self, col: usize, k: f64) {
        assert!(col < self.ncols, "column {} outside a matrix with {} columns", col, self.ncols);
        for i in 0..self.nrows {
            self.val[i * self.ncols + col] *= k;
        }
    }

    /// Adds row `src`, multiplied by `k`, to the distinct row `dst`.
    pub fn add_scaled_row(&mut self, src: usize, k: f64, dst: usize) {
        assert!(src < self.nrows && dst < self.nrows, "row outside a matrix with {} rows", self.nrows);
        assert!(src != dst, "cannot add a row to itself");
        for j in 0..self.ncols {
            let term = self.at(src, j) * k;
            self.val[dst * self.ncols + j] += term;
        }
    }

    /// Adds column `src`, multiplied by `k`, to the distinct column `dst`.
    pub fn add_scaled_column(&mut self, src: usize, k: f64, dst: usize) {
        assert!(src < self.ncols && dst < self.ncols, "column outside a matrix with {} columns", self.ncols);
        assert!(src != dst, "cannot add a column to itself");
        for i in 0..self.nrows {
            let term = self.at(i, src) * k;
            self.val[i * self.ncols + dst] += term;
        }
    }

    /// Inverts the matrix in place with Gauss-Jordan elimination.
    ///
    /// An identity matrix of the same size is prepared, and the receiver is
    /// transformed into the identity using only elementary row operations.
    /// Repeating the same operations on the prepared identity turns it into
    /// the inverse, which then replaces the receiver's buffer.
    ///
    /// Returns `Err(LinalgError::Singular)` when some column has no usable
    /// pivot; the receiver is left partially reduced and must not be used
    /// further in that case.
    ///
    /// # Example:
    ///
    /// ```
    /// use simplexrs::linalg::Matrix;
    /// let mut mat = Matrix::new(2, 2, vec![2., 0., 0., 4.]);
    /// mat.invert().expect("matrix is not singular");
    /// assert_eq!(mat, Matrix::new(2, 2, vec![0.5, 0., 0., 0.25]));
    /// ```
    pub fn invert(&mut self) -> Result<(), LinalgError> {
        assert!(self.nrows == self.ncols, "cannot invert a ({},{}) matrix", self.nrows, self.ncols);

        let mut identity = identity_matrix(self.nrows);

        for j in 0..self.ncols {
            let mut pivot = 0.0;

            // search a pivot downward from the diagonal
            for i in j..self.nrows {
                let value = self.at(i, j);
                if value != 0.0 {
                    if i != j {
                        self.swap_rows(j, i);
                        identity.swap_rows(j, i);
                    }
                    pivot = value;
                    break;
                }
            }

            // a column without pivot means the matrix is not invertible
            if pivot == 0.0 {
                return Err(LinalgError::Singular);
            }

            self.scale_row(j, 1.0 / pivot);
            identity.scale_row(j, 1.0 / pivot);

            // nullify every element in the column that is not the pivot
            for i in 0..self.nrows {
                if i == j {
                    continue;
                }
                let value = self.at(i, j);
                if value != 0.0 {
                    self.add_scaled_row(j, -value, i);
                    identity.add_scaled_row(j, -value, i);
                }
            }
        }

        self.val = identity.val;
        return Ok(());
    }

    /// See [multiply]
    pub fn multiply_by(&self, mat2: &Matrix) -> Matrix {
        multiply(self, mat2)
    }
}
