mod solver;

pub use solver::MipSolver;
