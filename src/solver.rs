//! # Primal simplex
//!
//! Full tableau implementation of the primal simplex method, together with
//! the two-phase method used when no feasible starting basis is known.
//!
//! Both entry points expect a minimization cost row and report the negated
//! value of the objective row's right-hand side cell on success, leaving the
//! tableau mutated to its final basis for inspection.

use log::debug;

use crate::tableau::Tableau;
use crate::SolverError;

/// Whether every reduced cost is non negative, i.e. whether the current
/// basic solution is optimal.
fn is_optimal(tab: &Tableau) -> bool {
    for j in 0..tab.ncols() - 1 {
        if tab.at(tab.nrows() - 1, j) < 0.0 {
            return false;
        }
    }
    return true;
}

/// Selects the entering column by Bland's rule: the lowest indexed column
/// with a strictly negative reduced cost. Must not be called on an optimal
/// tableau.
fn select_entering_column(tab: &Tableau) -> usize {
    for j in 0..tab.ncols() - 1 {
        if tab.at(tab.nrows() - 1, j) < 0.0 {
            return j;
        }
    }
    unreachable!("no entering column on an optimal tableau");
}

/// Whether the objective is unbounded along the entering column, i.e. the
/// column has no strictly positive entry in any constraint row.
fn is_unbounded(tab: &Tableau, entering: usize) -> bool {
    for i in 0..tab.nrows() - 1 {
        if tab.at(i, entering) > 0.0 {
            return false;
        }
    }
    return true;
}

/// Selects the leaving row by the minimum ratio test: among constraint rows
/// with a strictly positive entry in the entering column, the row minimizing
/// right-hand side over entry. Ties are broken towards the smallest basis
/// column index, which together with the entering rule prevents cycling.
fn select_leaving_row(tab: &Tableau, entering: usize) -> usize {
    let rhs = tab.ncols() - 1;
    let mut min_ratio = 0.0;
    let mut min_row: Option<usize> = None;

    for i in 0..tab.nrows() - 1 {
        if tab.at(i, entering) <= 0.0 {
            continue;
        }
        let ratio = tab.at(i, rhs) / tab.at(i, entering);
        let better = match min_row {
            None => true,
            Some(row) => ratio < min_ratio || (ratio == min_ratio && tab.basis_at(i) < tab.basis_at(row)),
        };
        if better {
            min_ratio = ratio;
            min_row = Some(i);
        }
    }

    return min_row.expect("the entering column has a positive entry");
}

/// Primal simplex method on a tableau already in feasible canonical form for
/// its declared basis.
///
/// Each iteration tests optimality, picks the entering column by Bland's
/// rule, tests unboundedness, picks the leaving row by the minimum ratio
/// test and pivots. Bland's rule bounds the number of iterations by the
/// number of distinct bases, so the loop always terminates.
///
/// # Example:
///
/// ```
/// use simplexrs::solver::simplex;
/// use simplexrs::tableau::Tableau;
/// let mut tab = Tableau::new(3, 5, vec![
///     1., 1., 1., 0., 4.,
///     1., 0., 0., 1., 3.,
///    -1., -1., 0., 0., 0.,
/// ], Some(vec![2, 3]));
/// tab.canonicalize();
/// assert_eq!(simplex(&mut tab), Ok(-4.0));
/// ```
pub fn simplex(tab: &mut Tableau) -> Result<f64, SolverError> {
    loop {
        if is_optimal(tab) {
            let value = -tab.at(tab.nrows() - 1, tab.ncols() - 1);
            debug!("optimal solution found, objective value {}", value);
            return Ok(value);
        }

        let entering = select_entering_column(tab);

        if is_unbounded(tab, entering) {
            debug!("entering column {} has no positive entry, the problem is unbounded", entering);
            return Err(SolverError::Unbounded);
        }

        let leaving = select_leaving_row(tab, entering);
        debug!("pivot: entering column {}, leaving row {}", entering, leaving);

        tab.set_basis(leaving, entering);
        tab.pivot(leaving, entering);
    }
}

/// Searches columns that can serve as basic variables without introducing an
/// artificial variable.
///
/// A column qualifies only when it has exactly one strictly positive entry
/// across the constraint rows, no negative entry, and its row has no basic
/// variable yet; the row is then scaled so the entry becomes 1. The check is
/// deliberately conservative: columns that could be made usable through
/// further row operations are left for the artificial machinery.
fn search_usable_variables(tab: &mut Tableau) {
    let m = tab.nrows();
    let n = tab.ncols();
    let mut found = 0;

    for j in 0..n - 1 {
        if found >= m - 1 {
            break;
        }

        let mut elem_row = None;
        let mut positive_elements = 0;

        for i in 0..m - 1 {
            if tab.at(i, j) < 0.0 {
                positive_elements = 0;
                break;
            }
            if tab.at(i, j) > 0.0 {
                elem_row = Some(i);
                positive_elements += 1;
            }
            if positive_elements > 1 {
                break;
            }
        }

        if positive_elements == 1 {
            if let Some(row) = elem_row {
                if !tab.basis_is_set(row) {
                    debug!("column {} is usable as the basic variable of row {}", j, row);
                    let value = tab.at(row, j);
                    tab.set_basis(row, j);
                    tab.scale_row(row, 1.0 / value);
                    found += 1;
                }
            }
        }
    }
}

/// Builds the auxiliary tableau for phase I: the constraint coefficients of
/// `tab`, one appended artificial column per constraint row still lacking a
/// basic variable, and the sum of the artificial variables as cost row.
fn build_artificial_tableau(tab: &Tableau) -> Tableau {
    let m = tab.nrows();
    let n = tab.ncols();
    let art_columns = (0..m - 1).filter(|&i| !tab.basis_is_set(i)).count();
    debug!("building the artificial tableau with {} artificial columns", art_columns);

    let mut art = Tableau::new(m, n + art_columns, vec![0.0; m * (n + art_columns)], None);

    for i in 0..m - 1 {
        if tab.basis_is_set(i) {
            art.set_basis(i, tab.basis_at(i));
        }
    }

    // constraint coefficients, without the right-hand side column
    for i in 0..m - 1 {
        for j in 0..n - 1 {
            art.set(i, j, tab.at(i, j));
        }
    }

    // one artificial unit column per row still without a basic variable
    let mut next = n - 1;
    for i in 0..m - 1 {
        if !art.basis_is_set(i) {
            art.set(i, next, 1.0);
            art.set_basis(i, next);
            next += 1;
        }
    }

    // the auxiliary cost is the sum of the artificial variables
    for j in n - 1..n - 1 + art_columns {
        art.set(m - 1, j, 1.0);
    }

    // current values of the basic variables
    for i in 0..m - 1 {
        art.set(i, n - 1 + art_columns, tab.at(i, n - 1));
    }

    return art;
}

/// Two-phase simplex method for a tableau without a known feasible basis.
///
/// Phase I scales rows so that every right-hand side is non negative, picks
/// up columns already usable as basic variables, appends an artificial
/// variable for every remaining row and minimizes their sum with the primal
/// simplex. A positive auxiliary optimum means the constraints admit no non
/// negative solution. Artificial variables still basic at optimum zero are
/// pivoted out, or their row is deleted (from `tab` as well) when all its non
/// artificial entries are zero, since such a constraint is redundant.
///
/// Phase II copies the reduced constraint rows and the discovered basis back
/// into `tab`, canonicalizes against the original cost row and runs the
/// primal simplex to completion.
///
/// # Example:
///
/// ```
/// use simplexrs::solver::two_phase;
/// use simplexrs::tableau::Tableau;
/// let mut tab = Tableau::new(3, 5, vec![
///     1., 1., 1., 0., 4.,
///     1., 0., 0., 1., 3.,
///    -1., -1., 0., 0., 0.,
/// ], None);
/// assert_eq!(two_phase(&mut tab), Ok(-4.0));
/// ```
pub fn two_phase(tab: &mut Tableau) -> Result<f64, SolverError> {
    let n = tab.ncols();

    // all right-hand sides must be non negative before phase I
    for i in 0..tab.nrows() - 1 {
        if tab.at(i, n - 1) < 0.0 {
            tab.scale_row(i, -1.0);
        }
    }

    search_usable_variables(tab);

    let mut art = build_artificial_tableau(tab);
    art.canonicalize();

    let aux_value = simplex(&mut art)?;
    debug!("auxiliary problem solved with optimum {}", aux_value);

    if aux_value > 0.0 {
        debug!("the auxiliary optimum is positive, the problem is infeasible");
        return Err(SolverError::Infeasible);
    }

    // drive the remaining artificial variables out of the basis, deleting
    // rows whose non artificial entries are all zero
    loop {
        let mut art_var_row = None;
        for i in 0..art.nrows() - 1 {
            if art.basis_at(i) >= n - 1 {
                art_var_row = Some(i);
                break;
            }
        }
        let row = match art_var_row {
            None => break,
            Some(row) => row,
        };

        let mut entering = None;
        for j in 0..n - 1 {
            if art.at(row, j) != 0.0 {
                entering = Some(j);
                break;
            }
        }

        match entering {
            Some(col) => {
                debug!("driving the artificial variable of row {} out through column {}", row, col);
                art.set_basis(row, col);
                art.pivot(row, col);
            },
            None => {
                debug!("row {} is redundant and is deleted", row);
                art.delete_row(row);
                tab.delete_row(row);
            }
        }
    }

    // phase II: the reduced rows and the found basis carry over to the
    // original cost row
    let m = tab.nrows();
    for i in 0..m - 1 {
        for j in 0..n - 1 {
            tab.set(i, j, art.at(i, j));
        }
        tab.set(i, n - 1, art.at(i, art.ncols() - 1));
    }
    for i in 0..m - 1 {
        tab.set_basis(i, art.basis_at(i));
    }

    tab.canonicalize();

    return simplex(tab);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_simplex_bounded_optimum() {
        let mut tab = Tableau::new(3, 5, vec![
            1., 1., 1., 0., 4.,
            1., 0., 0., 1., 3.,
           -1., -1., 0., 0., 0.,
        ], Some(vec![2, 3]));
        tab.canonicalize();
        assert_eq!(simplex(&mut tab), Ok(-4.0));
        // final basis holds x2 = 1 in row 0 and x1 = 3 in row 1
        assert_eq!(tab.basis_at(0), 1);
        assert_eq!(tab.basis_at(1), 0);
        assert_eq!(tab.at(0, 4), 1.0);
        assert_eq!(tab.at(1, 4), 3.0);
    }

    #[test]
    fn test_simplex_optimality_certificate() {
        let mut tab = Tableau::new(3, 5, vec![
            12.,  8., 2., 0., 48.,
             6., -4., 0., 2., 12.,
            -1., -1., 0., 0.,  0.,
        ], Some(vec![2, 3]));
        tab.canonicalize();
        let value = simplex(&mut tab).expect("the program has a finite optimum");
        assert_close(value, -6.0);
        for j in 0..tab.ncols() - 1 {
            assert!(tab.at(tab.nrows() - 1, j) >= 0.0);
        }
    }

    #[test]
    fn test_simplex_unbounded() {
        let mut tab = Tableau::new(2, 3, vec![
            -1., 1., 0.,
            -1., 0., 0.,
        ], Some(vec![1]));
        assert_eq!(simplex(&mut tab), Err(SolverError::Unbounded));
    }

    #[test]
    fn test_simplex_terminates_on_degenerate_ties() {
        // Beale's cycling example: degenerate from the start, loops forever
        // under the largest-coefficient rule
        let mut tab = Tableau::new(4, 8, vec![
            1., 0., 0., 0.25, -60., -0.04,  9., 0.,
            0., 1., 0., 0.50, -90., -0.02,  3., 0.,
            0., 0., 1., 0.,     0.,  1.,    0., 1.,
            0., 0., 0., -0.75, 150., -0.02, 6., 0.,
        ], Some(vec![0, 1, 2]));
        tab.canonicalize();
        let value = simplex(&mut tab).expect("the program has a finite optimum");
        assert_close(value, -0.05);
    }

    #[test]
    fn test_two_phase_agrees_with_simplex() {
        let mut with_basis = Tableau::new(3, 5, vec![
            1., 1., 1., 0., 4.,
            1., 0., 0., 1., 3.,
           -1., -1., 0., 0., 0.,
        ], Some(vec![2, 3]));
        with_basis.canonicalize();
        let direct = simplex(&mut with_basis).expect("the program has a finite optimum");

        let mut without_basis = Tableau::new(3, 5, vec![
            1., 1., 1., 0., 4.,
            1., 0., 0., 1., 3.,
           -1., -1., 0., 0., 0.,
        ], None);
        let phased = two_phase(&mut without_basis).expect("the program has a finite optimum");

        assert_eq!(direct, phased);
    }

    #[test]
    fn test_two_phase_deletes_redundant_row() {
        // the third constraint is the sum of the first two
        let mut tab = Tableau::new(4, 5, vec![
            12.,  8., 2., 0., 48.,
             6., -4., 0., 2., 12.,
            18.,  4., 2., 2., 60.,
            -1., -1., 0., 0.,  0.,
        ], None);
        let value = two_phase(&mut tab).expect("the program has a finite optimum");
        assert_close(value, -6.0);
        assert_eq!(tab.nrows(), 3);
    }

    #[test]
    fn test_two_phase_infeasible() {
        // x1 + x2 = 1 and x1 + x2 = 3 cannot hold at once
        let mut tab = Tableau::new(3, 3, vec![
            1., 1., 1.,
            1., 1., 3.,
            0., 0., 0.,
        ], None);
        assert_eq!(two_phase(&mut tab), Err(SolverError::Infeasible));
    }

    #[test]
    fn test_two_phase_negative_rhs_is_normalized() {
        // same program as the impossible demo but with the first row negated;
        // still infeasible, the sign normalization must not change that
        let mut tab = Tableau::new(3, 3, vec![
            -1., -1., -1.,
             1.,  1.,  3.,
             0.,  0.,  0.,
        ], None);
        assert_eq!(two_phase(&mut tab), Err(SolverError::Infeasible));
    }

    #[test]
    fn test_two_phase_picks_up_usable_variables() {
        // both rows own a single-positive-entry column, so no artificial
        // variable is needed at all
        let mut tab = Tableau::new(3, 4, vec![
            1., 2., 0., 5.,
            0., 1., 2., 6.,
            1., 0., 1., 0.,
        ], None);
        let value = two_phase(&mut tab).expect("the program has a finite optimum");
        // minimum of x1 + x3 over x1 + 2 x2 = 5, x2 + 2 x3 = 6
        assert_close(value, 1.75);
    }

    #[test]
    fn test_two_phase_with_artificial_variables() {
        // neither column qualifies as a usable variable, so both rows need
        // an artificial one
        let mut tab = Tableau::new(3, 3, vec![
            1.,  1., 3.,
            1., -1., 1.,
            1.,  1., 0.,
        ], None);
        let value = two_phase(&mut tab).expect("the program has a finite optimum");
        // the constraints pin x1 = 2, x2 = 1
        assert_eq!(value, 3.0);
        assert_eq!(tab.at(tab.nrows() - 1, tab.ncols() - 1), -3.0);
    }
}
