//! # Simplex solvers
//!
//! Tableau based solvers for linear programs in standard equality form:
//! the primal simplex method, the two-phase method for problems without an
//! immediately available feasible basis, and the dual simplex method.
//!
//! A problem is handed over as a [tableau::Tableau]: constraint rows, a
//! minimization cost row at the bottom, the right-hand side in the last
//! column and optionally the columns of an initial basis. Exactly one of the
//! methods is then applied; it either reports the optimal objective value
//! (the negated right-hand side cell of the cost row) or a terminal
//! [SolverError], and in both cases leaves the tableau mutated in place so
//! the final basis and variable values can be read back out.

use thiserror::Error;

pub mod linalg;
pub mod tableau;
pub mod solver;
pub mod dual;

use tableau::Tableau;

/// The ways a solve can end without an optimal solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The tableau has a negative reduced cost and is not a valid starting
    /// point for the dual simplex method.
    #[error("invalid tableau for the dual simplex method: a reduced cost is negative")]
    InvalidForm,
    /// The objective can be improved without limit.
    #[error("the problem is unbounded")]
    Unbounded,
    /// The constraints admit no non negative solution.
    #[error("the problem is infeasible")]
    Infeasible,
}

/// Solver method to apply to a tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Primal simplex on a tableau already in feasible canonical form.
    Simplex,
    /// Two-phase method for a tableau without a known feasible basis.
    TwoPhase,
    /// Dual simplex on a dual feasible tableau.
    Dual,
}

/// Solves the linear program held by `tableau` with the chosen method.
///
/// On success the returned value is the optimum of the cost row, and the
/// tableau holds the final basis. [Method::Simplex] and [Method::Dual]
/// expect the tableau to be canonical for its declared basis;
/// [Method::TwoPhase] derives a basis itself.
///
/// # Example:
///
/// ```
/// use simplexrs::{solve, Method, SolverError};
/// use simplexrs::tableau::Tableau;
/// let mut tab = Tableau::new(3, 5, vec![
///     1., 1., 1., 0., 4.,
///     1., 0., 0., 1., 3.,
///    -1., -1., 0., 0., 0.,
/// ], None);
/// assert_eq!(solve(&mut tab, Method::TwoPhase), Ok(-4.0));
/// ```
pub fn solve(tableau: &mut Tableau, method: Method) -> Result<f64, SolverError> {
    match method {
        Method::Simplex => solver::simplex(tableau),
        Method::TwoPhase => solver::two_phase(tableau),
        Method::Dual => dual::simplex(tableau),
    }
}
