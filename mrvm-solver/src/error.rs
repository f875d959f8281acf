use mrvm_core::models::{BidderId, GenericGood, RegionId};
use rust_decimal::Decimal;
use std::time::Duration;

/// The program cannot be composed from the given inputs.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// Winner determination needs at least one bidder
    #[error("no bidders provided")]
    NoBidders,

    /// The bidder to exclude is not part of the model
    #[error("bidder {0} is not part of the model")]
    UnknownBidder(BidderId),

    /// All bidders must live in the same world
    #[error("bidder {0} lives in a different world")]
    ForeignWorld(BidderId),

    /// A bidder references a region its world does not have
    #[error("bidder {bidder} references unknown region {region}")]
    UnknownRegion {
        /// The offending bidder
        bidder: BidderId,
        /// The unknown region
        region: RegionId,
    },

    /// Bidder ids must be unique
    #[error("bidder {0} was provided more than once")]
    DuplicateBidder(BidderId),

    /// The scaling settings leave no room for values
    #[error("max value {max_value} with safety gap {safety_gap} leaves no positive ceiling")]
    InvalidScaling {
        /// The configured largest magnitude
        max_value: f64,
        /// The configured head room
        safety_gap: f64,
    },
}

/// The solver's answer does not describe a valid allocation.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SolutionInconsistency {
    /// A quantity variable is not (close to) integral
    #[error("bidder {bidder} received a fractional quantity {value} of {good}")]
    FractionalQuantity {
        /// The bidder
        bidder: BidderId,
        /// The good
        good: GenericGood,
        /// The value the solver reported
        value: f64,
    },

    /// The value in the program disagrees with the bidder's valuation
    #[error("bidder {bidder} values its bundle at {expected}, the program claims {actual}")]
    ValueMismatch {
        /// The bidder
        bidder: BidderId,
        /// The bidder's true value of the extracted bundle
        expected: Decimal,
        /// The unscaled value from the program
        actual: f64,
    },
}

/// Everything that can go wrong computing an allocation
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Bad inputs
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The time limit was reached and suboptimal solutions are not accepted
    #[error("the solver hit the time limit of {0:?}")]
    SolveTimeout(Duration),

    /// The solver reports that no feasible assignment exists. Since the empty
    /// allocation is always feasible, this indicates a modeling defect.
    #[error("the program is infeasible")]
    Infeasible,

    /// The solution cannot be turned into an allocation
    #[error(transparent)]
    Inconsistent(#[from] SolutionInconsistency),

    /// The solver backend failed
    #[error("solver failure: {0}")]
    Solver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A counterfactual worker did not run to completion
    #[error(transparent)]
    Worker(#[from] tokio::task::JoinError),
}
