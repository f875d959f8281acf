use super::translate::{SolverError, constraints, objective, response, variables};
use good_lp::{SolverModel, solvers::microlp::microlp};
use mrvm_core::{
    models::{Mip, MipSolution, SolveParams},
    ports::MipSolver,
};
use std::time::Instant;

/// Solves programs with microlp, a pure-Rust simplex and branch-and-bound
/// solver.
///
/// microlp cannot be interrupted, so the time limit is enforced after the
/// fact: a solve that took longer than the limit reports
/// [`SolveStatus::TimeLimit`](mrvm_core::models::SolveStatus::TimeLimit).
#[derive(Clone, Copy, Debug, Default)]
pub struct MicroLpSolver;

impl MipSolver for MicroLpSolver {
    type Error = SolverError;

    fn solve(&self, mip: &Mip, params: &SolveParams) -> Result<MipSolution, Self::Error> {
        let start = Instant::now();
        let (problem, handles) = variables(mip);
        let mut model = problem.maximise(objective(mip, &handles)).using(microlp);
        for constraint in constraints(mip, &handles) {
            model = model.with(constraint);
        }
        response(model.solve(), mip, &handles, params, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mrvm_core::models::{CompareType, Constraint, SolveStatus, Variable};
    use std::time::Duration;

    #[test]
    fn test_small_knapsack() {
        // max 5a + 4b + 3c  s.t.  2a + 3b + c <= 5, a, b, c binary
        let mut mip = Mip::new();
        let a = mip.add_variable(Variable::binary("a"));
        let b = mip.add_variable(Variable::binary("b"));
        let c = mip.add_variable(Variable::binary("c"));
        mip.add_objective_term(5.0, a);
        mip.add_objective_term(4.0, b);
        mip.add_objective_term(3.0, c);
        mip.add_constraint(
            Constraint::new("weight", CompareType::Leq, 5.0)
                .with_term(2.0, a)
                .with_term(3.0, b)
                .with_term(1.0, c),
        );

        let solution = MicroLpSolver.solve(&mip, &SolveParams::default()).unwrap();
        assert_eq!(solution.status(), SolveStatus::Optimal);
        assert_abs_diff_eq!(solution.objective(), 9.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.value(a), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.value(b), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.value(c), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_infeasible() {
        let mut mip = Mip::new();
        let x = mip.add_variable(Variable::integer("x", 0.0, 3.0));
        mip.add_objective_term(1.0, x);
        mip.add_constraint(Constraint::new("impossible", CompareType::Geq, 4.0).with_term(1.0, x));

        let solution = MicroLpSolver.solve(&mip, &SolveParams::default()).unwrap();
        assert_eq!(solution.status(), SolveStatus::Infeasible);
    }

    #[test]
    fn test_exceeded_time_limit() {
        let mut mip = Mip::new();
        let x = mip.add_variable(Variable::integer("x", 0.0, 3.0));
        mip.add_objective_term(1.0, x);

        let params = SolveParams {
            time_limit: Some(Duration::ZERO),
            accept_suboptimal: false,
        };
        let solution = MicroLpSolver.solve(&mip, &params).unwrap();
        assert_eq!(solution.status(), SolveStatus::TimeLimit);
        assert_abs_diff_eq!(solution.value(x), 3.0, epsilon = 1e-6);
    }
}
