use crate::models::{Mip, MipSolution, SolveParams};

/// Interface for mixed-integer programming solvers.
///
/// A solver is an opaque oracle: it receives a fully-built program and
/// returns an assignment for every variable, how long it took, and how the
/// solve terminated. The call blocks until the solver is done or the time
/// limit in `params` is reached.
///
/// Implementations must not keep state between calls, so that a single
/// solver value may be shared by many independent solves.
pub trait MipSolver {
    /// Error type for failures of the solver itself (as opposed to an
    /// infeasible program, which is reported through the solution status)
    type Error: std::error::Error + Send + Sync + 'static;

    /// Maximize the program's objective subject to its constraints.
    ///
    /// # Returns
    ///
    /// A [`MipSolution`] whose status is
    /// - `Optimal` if the assignment is optimal,
    /// - `TimeLimit` if the time limit was reached first (the assignment is
    ///   then the best one found),
    /// - `Infeasible` if no assignment satisfies the constraints.
    fn solve(&self, mip: &Mip, params: &SolveParams) -> Result<MipSolution, Self::Error>;
}
