/// Implementation using the pure-Rust microlp solver
#[cfg(feature = "microlp")]
pub mod microlp;

/// Implementation using the COIN-OR CBC solver
#[cfg(feature = "coin_cbc")]
pub mod cbc;

#[cfg(any(feature = "microlp", feature = "coin_cbc"))]
pub use translate::SolverError;

#[cfg(any(feature = "microlp", feature = "coin_cbc"))]
mod translate {
    use good_lp::{
        Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus, Variable,
        constraint, variable,
    };
    use mrvm_core::models::{
        CompareType, Mip, MipSolution, SolveParams, SolveStatus, VarId, VarType,
    };
    use std::time::Instant;

    /// A failure of the solver backend itself
    #[derive(Debug, thiserror::Error)]
    pub enum SolverError {
        /// The backend could not solve the program
        #[error(transparent)]
        Resolution(ResolutionError),
    }

    /// Declare every variable of the program with `good_lp`
    pub(crate) fn variables(mip: &Mip) -> (ProblemVariables, Vec<Variable>) {
        let mut problem = ProblemVariables::new();
        let handles = mip
            .variables()
            .map(|(_, var)| {
                let definition = match var.var_type {
                    VarType::Binary => variable().binary(),
                    VarType::Integer => variable().integer().min(var.lower).max(var.upper),
                    VarType::Continuous => variable().min(var.lower).max(var.upper),
                };
                problem.add(definition.name(var.name.clone()))
            })
            .collect();
        (problem, handles)
    }

    fn expression(terms: &[(VarId, f64)], handles: &[Variable]) -> Expression {
        let mut expr = Expression::from(0.0);
        for &(var, coefficient) in terms {
            expr += coefficient * handles[var.index()];
        }
        expr
    }

    /// The (maximized) objective
    pub(crate) fn objective(mip: &Mip, handles: &[Variable]) -> Expression {
        expression(mip.objective(), handles)
    }

    /// Every constraint of the program
    pub(crate) fn constraints<'a>(
        mip: &'a Mip,
        handles: &'a [Variable],
    ) -> impl Iterator<Item = good_lp::Constraint> + 'a {
        mip.constraints().iter().map(|c| {
            let lhs = expression(c.terms(), handles);
            match c.compare() {
                CompareType::Leq => constraint::leq(lhs, c.rhs()),
                CompareType::Eq => constraint::eq(lhs, c.rhs()),
                CompareType::Geq => constraint::geq(lhs, c.rhs()),
            }
        })
    }

    /// Turn the backend's answer into the port's response.
    ///
    /// A solve the backend stopped on time, or that took longer than the time
    /// limit, is reported as such, with the assignment the backend returned.
    pub(crate) fn response<S: Solution>(
        result: Result<S, ResolutionError>,
        mip: &Mip,
        handles: &[Variable],
        params: &SolveParams,
        start: Instant,
    ) -> Result<MipSolution, SolverError> {
        let elapsed = start.elapsed();
        let solution = match result {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(MipSolution::infeasible(elapsed)),
            Err(err) => return Err(SolverError::Resolution(err)),
        };

        let values = handles
            .iter()
            .map(|&handle| solution.value(handle))
            .collect::<Vec<_>>();
        let objective = mip.evaluate_objective(&values);
        let stopped = matches!(solution.status(), SolutionStatus::TimeLimit);
        let status = if stopped || params.time_limit.is_some_and(|limit| elapsed >= limit) {
            SolveStatus::TimeLimit
        } else {
            SolveStatus::Optimal
        };
        Ok(MipSolution::new(values, objective, elapsed, status))
    }

}
