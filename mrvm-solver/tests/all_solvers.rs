#![allow(unused_macros)]
use rstest_reuse::template;

// This creates a testing "template" to allow for the injection of each solver
// implementation

#[cfg(not(feature = "coin_cbc"))]
#[template]
#[rstest]
#[case::microlp(mrvm_solver::microlp::MicroLpSolver)]
pub fn all_solvers(#[case] solver: impl MipSolver) -> () {}

#[cfg(feature = "coin_cbc")]
#[template]
#[rstest]
#[case::microlp(mrvm_solver::microlp::MicroLpSolver)]
#[case::cbc(mrvm_solver::cbc::CbcSolver::default())]
pub fn all_solvers(#[case] solver: impl MipSolver) -> () {}
