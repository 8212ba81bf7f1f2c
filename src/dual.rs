//! # Dual simplex
//!
//! Full tableau implementation of the dual simplex method. Works on a dual
//! feasible tableau (no negative reduced cost) whose basic solution may
//! still violate primal feasibility, and pivots until every right-hand side
//! is non negative while keeping the reduced costs non negative.

use log::debug;

use crate::tableau::Tableau;
use crate::SolverError;

/// Whether the tableau is in the correct form for the dual simplex method,
/// i.e. no reduced cost is negative.
fn is_correct_form(tab: &Tableau) -> bool {
    for j in 0..tab.ncols() - 1 {
        if tab.at(tab.nrows() - 1, j) < 0.0 {
            return false;
        }
    }
    return true;
}

/// Whether every right-hand side is non negative, i.e. whether the current
/// basic solution is feasible and therefore optimal.
fn is_feasible(tab: &Tableau) -> bool {
    for i in 0..tab.nrows() - 1 {
        if tab.at(i, tab.ncols() - 1) < 0.0 {
            return false;
        }
    }
    return true;
}

/// Selects the leaving row by Bland's rule: among the constraint rows with a
/// negative right-hand side, the one whose basic variable has the smallest
/// column index. Must not be called on a feasible tableau.
fn select_leaving_row(tab: &Tableau) -> usize {
    let rhs = tab.ncols() - 1;
    let mut min_row: Option<usize> = None;

    for i in 0..tab.nrows() - 1 {
        if tab.at(i, rhs) < 0.0 {
            let better = match min_row {
                None => true,
                Some(row) => tab.basis_at(i) < tab.basis_at(row),
            };
            if better {
                min_row = Some(i);
            }
        }
    }

    return min_row.expect("some right-hand side is negative");
}

/// Whether the dual objective is unbounded along the leaving row, i.e. the
/// row has no strictly negative entry in any variable column.
fn is_unbounded(tab: &Tableau, leaving: usize) -> bool {
    for j in 0..tab.ncols() - 1 {
        if tab.at(leaving, j) < 0.0 {
            return false;
        }
    }
    return true;
}

/// Selects the entering column by the minimum ratio test: among the variable
/// columns with a strictly negative entry in the leaving row, the column
/// minimizing reduced cost over negated entry. Ties fall to the smallest
/// column index, since the scan is ascending and strict.
fn select_entering_column(tab: &Tableau, leaving: usize) -> usize {
    let cost_row = tab.nrows() - 1;
    let mut min_ratio = 0.0;
    let mut min_col: Option<usize> = None;

    for j in 0..tab.ncols() - 1 {
        if tab.at(leaving, j) >= 0.0 {
            continue;
        }
        let ratio = tab.at(cost_row, j) / -tab.at(leaving, j);
        let better = match min_col {
            None => true,
            Some(_) => ratio < min_ratio,
        };
        if better {
            min_ratio = ratio;
            min_col = Some(j);
        }
    }

    return min_col.expect("the leaving row has a negative entry");
}

/// Dual simplex method on a dual feasible tableau.
///
/// Returns [SolverError::InvalidForm] before any pivot when some reduced
/// cost is negative. Each iteration tests primal feasibility, picks the
/// leaving row by Bland's rule, tests dual unboundedness and picks the
/// entering column by the minimum ratio test on the negated row entries.
///
/// # Example:
///
/// ```
/// use simplexrs::dual;
/// use simplexrs::tableau::Tableau;
/// let mut tab = Tableau::new(3, 6, vec![
///     -2., -2., -1., 1., 0., -6.,
///     -1., -2., -3., 0., 1., -5.,
///      3.,  4.,  5., 0., 0.,  0.,
/// ], Some(vec![3, 4]));
/// assert_eq!(dual::simplex(&mut tab), Ok(11.0));
/// ```
pub fn simplex(tab: &mut Tableau) -> Result<f64, SolverError> {
    if !is_correct_form(tab) {
        debug!("a reduced cost is negative, the tableau is invalid for the dual simplex");
        return Err(SolverError::InvalidForm);
    }

    loop {
        if is_feasible(tab) {
            let value = -tab.at(tab.nrows() - 1, tab.ncols() - 1);
            debug!("optimal solution found, objective value {}", value);
            return Ok(value);
        }

        let leaving = select_leaving_row(tab);

        if is_unbounded(tab, leaving) {
            debug!("leaving row {} has no negative entry, the problem is unbounded", leaving);
            return Err(SolverError::Unbounded);
        }

        let entering = select_entering_column(tab, leaving);
        debug!("pivot: leaving row {}, entering column {}", leaving, entering);

        tab.set_basis(leaving, entering);
        tab.pivot(leaving, entering);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_tableau() -> Tableau {
        Tableau::new(3, 6, vec![
            -2., -2., -1., 1., 0., -6.,
            -1., -2., -3., 0., 1., -5.,
             3.,  4.,  5., 0., 0.,  0.,
        ], Some(vec![3, 4]))
    }

    #[test]
    fn test_dual_simplex_optimum() {
        let mut tab = demo_tableau();
        assert_eq!(simplex(&mut tab), Ok(11.0));
        // x1 = 1 and x2 = 2 end up basic
        assert_eq!(tab.basis_at(0), 0);
        assert_eq!(tab.basis_at(1), 1);
        assert_eq!(tab.at(0, 5), 1.0);
        assert_eq!(tab.at(1, 5), 2.0);
    }

    #[test]
    fn test_dual_simplex_certificate() {
        let mut tab = demo_tableau();
        simplex(&mut tab).expect("the program has a finite optimum");
        for i in 0..tab.nrows() - 1 {
            assert!(tab.at(i, tab.ncols() - 1) >= 0.0);
        }
        for j in 0..tab.ncols() - 1 {
            assert!(tab.at(tab.nrows() - 1, j) >= 0.0);
        }
    }

    #[test]
    fn test_dual_simplex_invalid_form() {
        let mut tab = Tableau::new(3, 6, vec![
            -2., -2., -1., 1., 0., -6.,
            -1., -2., -3., 0., 1., -5.,
             3., -4.,  5., 0., 0.,  0.,
        ], Some(vec![3, 4]));
        let before = tab.clone();
        assert_eq!(simplex(&mut tab), Err(SolverError::InvalidForm));
        // rejected before any pivot
        for i in 0..tab.nrows() {
            for j in 0..tab.ncols() {
                assert_eq!(tab.at(i, j), before.at(i, j));
            }
        }
    }

    #[test]
    fn test_dual_simplex_unbounded() {
        // the basic variable is negative but its row has no negative entry
        let mut tab = Tableau::new(2, 3, vec![
            1., 1., -1.,
            0., 2.,  0.,
        ], Some(vec![0]));
        assert_eq!(simplex(&mut tab), Err(SolverError::Unbounded));
    }

    #[test]
    fn test_dual_simplex_already_feasible() {
        let mut tab = Tableau::new(2, 3, vec![
            1., 0., 3.,
            0., 2., -7.,
        ], Some(vec![0]));
        assert_eq!(simplex(&mut tab), Ok(7.0));
    }
}
