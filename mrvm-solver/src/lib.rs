#![doc = include_str!("../README.md")]

/**
 * The world-level fragment of the program: value, omega and quantity
 * variables, plus the supply constraints.
 */
mod world;
pub use world::WorldPartialMip;

/**
 * The bidder-level fragments: the shared capacity/value linearization and one
 * value linker per kind of bidder.
 */
mod bidder;
pub use bidder::{BidderPartialMip, LocalLinker, NationalLinker, RegionalLinker, ValueLinker};

/**
 * The composed program and its lifecycle.
 */
mod model;
pub use model::{MrvmMip, SolvedMrvmMip};

mod allocation;
mod error;
pub use error::{ConfigurationError, ModelError, SolutionInconsistency};

mod scaling;
pub use scaling::scaling_factor;

mod counterfactual;
pub use counterfactual::marginal_economies;

mod export;
pub use export::export_lp;

/**
 * Implementations of the solver port.
 */
mod impls;
pub use impls::*;

use rust_decimal::{Decimal, prelude::ToPrimitive as _};

// Decimals we feed into the program are bounded by construction, so the
// conversion cannot fail in practice.
pub(crate) fn float(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
