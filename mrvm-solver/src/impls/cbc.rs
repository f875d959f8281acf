use super::translate::{SolverError, constraints, objective, response, variables};
use good_lp::{SolverModel, solvers::coin_cbc::coin_cbc};
use mrvm_core::{
    models::{Mip, MipSolution, SolveParams},
    ports::MipSolver,
};
use std::time::Instant;

/// Solves programs with COIN-OR CBC.
///
/// The time limit is passed to CBC, which then returns the best assignment it
/// found. A solve that reaches the limit reports
/// [`SolveStatus::TimeLimit`](mrvm_core::models::SolveStatus::TimeLimit).
#[derive(Clone, Copy, Debug, Default)]
pub struct CbcSolver {
    /// Whether CBC may write its log to stdout
    pub verbose: bool,
}

impl MipSolver for CbcSolver {
    type Error = SolverError;

    fn solve(&self, mip: &Mip, params: &SolveParams) -> Result<MipSolution, Self::Error> {
        let start = Instant::now();
        let (problem, handles) = variables(mip);
        let mut model = problem.maximise(objective(mip, &handles)).using(coin_cbc);
        if !self.verbose {
            model.set_parameter("log", "0");
        }
        if let Some(limit) = params.time_limit {
            model.set_parameter("seconds", &limit.as_secs_f64().to_string());
        }
        for constraint in constraints(mip, &handles) {
            model = model.with(constraint);
        }
        response(model.solve(), mip, &handles, params, start)
    }
}
