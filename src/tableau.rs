//! # Tableau
//!
//! The augmented matrix representation of a linear program: one extra row
//! holding the reduced costs, one extra column holding the right-hand side,
//! and a basis map telling which column is basic in each constraint row.

use log::debug;

use crate::linalg::Matrix;

/// Data structure for a simplex tableau.
///
/// The grid is a ([Matrix]) of shape (`m`, `n`) where the first `m - 1` rows
/// are constraint rows, row `m - 1` holds the reduced costs, the first
/// `n - 1` columns are variable columns and column `n - 1` holds the current
/// values of the basic variables (and, in the cost row, the negated value of
/// the objective function).
///
/// The grid is deliberately not exposed for direct mutation: every change
/// goes through the tableau operations, which keep the basis map in sync.
#[derive(Debug)]
pub struct Tableau {
    grid: Matrix,
    /// Column of the basic variable of each constraint row.
    basis: Vec<usize>,
    /// Whether the basic variable of each constraint row has been assigned.
    basis_set: Vec<bool>
}

impl Clone for Tableau {
    fn clone(&self) -> Self {
        return Tableau {
            grid: self.grid.clone(),
            basis: self.basis.to_vec(),
            basis_set: self.basis_set.to_vec()
        }
    }
}

impl Tableau {

    /// Creates a new tableau of shape (`nrows`, `ncols`) from the row major
    /// buffer `val` and an optional assignment of basis columns.
    ///
    /// `basis`, when given, must hold one column index per constraint row,
    /// each pointing at a variable column; all rows are then marked as
    /// assigned. Without it every row starts out unassigned (column 0).
    ///
    /// # Example:
    ///
    /// ```
    /// use simplexrs::tableau::Tableau;
    /// let tab = Tableau::new(3, 5, vec![
    ///     12.,  8., 2., 0., 48.,
    ///      6., -4., 0., 2., 12.,
    ///     -1., -1., 0., 0.,  0.,
    /// ], Some(vec![2, 3]));
    /// assert_eq!(tab.basis_at(0), 2);
    /// assert_eq!(tab.basis_at(1), 3);
    /// assert!(tab.basis_is_set(0));
    /// ```
    pub fn new(nrows: usize, ncols: usize, val: Vec<f64>, basis: Option<Vec<usize>>) -> Tableau {
        assert!(nrows >= 2 && ncols >= 2, "a tableau needs at least one constraint row and one variable column");
        let grid = Matrix::new(nrows, ncols, val);
        match basis {
            Some(indices) => {
                assert!(indices.len() == nrows - 1, "expected {} basis indices, got {}", nrows - 1, indices.len());
                for index in indices.iter() {
                    assert!(*index < ncols - 1, "basis column {} is not a variable column", index);
                }
                return Tableau { grid, basis: indices, basis_set: vec![true; nrows - 1] }
            },
            None => {
                return Tableau { grid, basis: vec![0; nrows - 1], basis_set: vec![false; nrows - 1] }
            }
        }
    }

    /// Number of rows of the tableau, the reduced costs row included.
    pub fn nrows(&self) -> usize {
        return self.grid.nrows;
    }

    /// Number of columns of the tableau, the right-hand side column included.
    pub fn ncols(&self) -> usize {
        return self.grid.ncols;
    }

    /// Returns the element at position (`row`, `col`).
    pub fn at(&self, row: usize, col: usize) -> f64 {
        return self.grid.at(row, col);
    }

    /// Sets the element at position (`row`, `col`) to `value`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.grid.set(row, col, value);
    }

    /// Returns the basis column of constraint row `row`.
    pub fn basis_at(&self, row: usize) -> usize {
        assert!(row < self.nrows() - 1, "row {} is not a constraint row", row);
        return self.basis[row];
    }

    /// Assigns `col` as the basis column of constraint row `row` and marks
    /// the row as assigned.
    pub fn set_basis(&mut self, row: usize, col: usize) {
        assert!(row < self.nrows() - 1, "row {} is not a constraint row", row);
        assert!(col < self.ncols() - 1, "basis column {} is not a variable column", col);
        self.basis[row] = col;
        self.basis_set[row] = true;
    }

    /// Whether the basis column of constraint row `row` has been assigned.
    pub fn basis_is_set(&self, row: usize) -> bool {
        assert!(row < self.nrows() - 1, "row {} is not a constraint row", row);
        return self.basis_set[row];
    }

    /// Multiplies every element of `row` by `k`. Row scaling cannot move a
    /// unit column, so the basis map is unaffected.
    pub fn scale_row(&mut self, row: usize, k: f64) {
        self.grid.scale_row(row, k);
    }

    /// Pivot operation on the element at (`row`, `col`).
    ///
    /// `row` must be a constraint row, `col` a variable column and the
    /// element must be non-zero. The row is scaled so the element becomes 1
    /// (skipped when it already is), after which the element is eliminated
    /// from every other row, the reduced costs row included. Afterwards
    /// column `col` is the unit vector with 1 at `row`.
    ///
    /// # Example:
    ///
    /// ```
    /// use simplexrs::tableau::Tableau;
    /// let mut tab = Tableau::new(3, 5, vec![
    ///     12.,  8., 2., 0., 48.,
    ///      6., -4., 0., 2., 12.,
    ///     -1., -1., 0., 0.,  0.,
    /// ], Some(vec![2, 3]));
    /// tab.pivot(0, 2);
    /// assert_eq!(tab.at(0, 2), 1.0);
    /// assert_eq!(tab.at(1, 2), 0.0);
    /// assert_eq!(tab.at(2, 2), 0.0);
    /// ```
    pub fn pivot(&mut self, row: usize, col: usize) {
        assert!(row < self.nrows() - 1, "row {} is not a constraint row", row);
        assert!(col < self.ncols() - 1, "column {} is not a variable column", col);

        let pivot = self.at(row, col);
        assert!(pivot != 0.0, "cannot pivot on a zero element at ({},{})", row, col);

        if pivot != 1.0 {
            self.grid.scale_row(row, 1.0 / pivot);
        }

        // nullify every element in the column that is not the pivot
        for i in 0..self.nrows() {
            if i == row {
                continue;
            }
            let value = self.at(i, col);
            if value == 0.0 {
                continue;
            }
            self.grid.add_scaled_row(row, -value, i);
        }
    }

    /// Puts the tableau in canonical form for the declared basis: every
    /// constraint row is pivoted on its basis column, in row order, leaving
    /// each basic column a unit vector and the reduced costs row consistent
    /// with the basis.
    pub fn canonicalize(&mut self) {
        for i in 0..self.nrows() - 1 {
            let j = self.basis[i];
            self.pivot(i, j);
        }
    }

    /// Deletes constraint row `row`, shifting the basis assignments of the
    /// rows below it up by one.
    pub fn delete_row(&mut self, row: usize) {
        assert!(row < self.nrows() - 1, "row {} is not a constraint row", row);
        debug!("deleting row {} from a ({},{}) tableau", row, self.nrows(), self.ncols());

        let ncols = self.ncols();
        self.grid.val.drain(row * ncols..(row + 1) * ncols);
        self.grid.nrows -= 1;
        self.basis.remove(row);
        self.basis_set.remove(row);
    }

    /// Deletes variable column `col`, rebuilding the backing buffer one
    /// column narrower. Basis assignments beyond the deleted column shift
    /// down by one; the column itself must not be basic in any row.
    pub fn delete_column(&mut self, col: usize) {
        assert!(col < self.ncols() - 1, "column {} is not a variable column", col);
        debug!("deleting column {} from a ({},{}) tableau", col, self.nrows(), self.ncols());

        for i in 0..self.nrows() - 1 {
            assert!(!(self.basis_set[i] && self.basis[i] == col), "cannot delete column {}, it is basic in row {}", col, i);
        }

        let mut tmp: Vec<f64> = Vec::with_capacity(self.nrows() * (self.ncols() - 1));
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                if j != col {
                    tmp.push(self.at(i, j));
                }
            }
        }
        self.grid.val = tmp;
        self.grid.ncols -= 1;

        for i in 0..self.nrows() - 1 {
            if self.basis[i] > col {
                self.basis[i] -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_tableau() -> Tableau {
        Tableau::new(3, 5, vec![
            12.,  8., 2., 0., 48.,
             6., -4., 0., 2., 12.,
            -1., -1., 0., 0.,  0.,
        ], Some(vec![2, 3]))
    }

    #[test]
    fn test_new_without_basis() {
        let tab = Tableau::new(3, 5, vec![0.0; 15], None);
        assert_eq!(tab.basis_at(0), 0);
        assert_eq!(tab.basis_at(1), 0);
        assert!(!tab.basis_is_set(0));
        assert!(!tab.basis_is_set(1));
    }

    #[test]
    fn test_pivot_makes_unit_column() {
        let mut tab = demo_tableau();
        tab.pivot(0, 0);
        assert_eq!(tab.at(0, 0), 1.0);
        assert_eq!(tab.at(1, 0), 0.0);
        assert_eq!(tab.at(2, 0), 0.0);
    }

    #[test]
    fn test_pivot_is_idempotent_on_its_own_element() {
        let mut tab = demo_tableau();
        tab.pivot(1, 1);
        let snapshot = tab.clone();
        tab.pivot(1, 1);
        for i in 0..tab.nrows() {
            for j in 0..tab.ncols() {
                assert_eq!(tab.at(i, j), snapshot.at(i, j));
            }
        }
    }

    #[test]
    fn test_canonicalize_establishes_basis_columns() {
        let mut tab = demo_tableau();
        tab.canonicalize();
        for i in 0..tab.nrows() - 1 {
            let j = tab.basis_at(i);
            assert_eq!(tab.at(i, j), 1.0);
            for k in 0..tab.nrows() {
                if k != i {
                    assert_eq!(tab.at(k, j), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_delete_row_shifts_basis() {
        let mut tab = Tableau::new(4, 5, vec![
            1., 0., 0., 0., 4.,
            0., 1., 0., 0., 5.,
            0., 0., 1., 0., 6.,
            0., 0., 0., 0., 0.,
        ], Some(vec![0, 1, 2]));
        tab.delete_row(1);
        assert_eq!(tab.nrows(), 3);
        assert_eq!(tab.basis_at(0), 0);
        assert_eq!(tab.basis_at(1), 2);
        assert_eq!(tab.at(1, 4), 6.0);
    }

    #[test]
    fn test_delete_column_remaps_basis() {
        let mut tab = Tableau::new(3, 5, vec![
            1., 2., 0., 3., 4.,
            0., 5., 1., 6., 7.,
            0., 8., 0., 9., 0.,
        ], Some(vec![0, 2]));
        tab.delete_column(1);
        assert_eq!(tab.ncols(), 4);
        assert_eq!(tab.basis_at(0), 0);
        assert_eq!(tab.basis_at(1), 1);
        assert_eq!(tab.at(0, 1), 0.0);
        assert_eq!(tab.at(1, 2), 6.0);
        assert_eq!(tab.at(2, 3), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_delete_basic_column_panics() {
        let mut tab = Tableau::new(3, 5, vec![0.0; 15], Some(vec![1, 2]));
        tab.delete_column(1);
    }

    #[test]
    #[should_panic]
    fn test_pivot_on_zero_element_panics() {
        let mut tab = demo_tableau();
        tab.pivot(0, 3);
    }
}
