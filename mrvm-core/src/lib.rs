#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core domain models for multi-region spectrum auctions.
///
/// This module contains the world description (regions, bands, generic goods),
/// the bidders and their valuation functions, the allocation produced by
/// winner determination, and the solver-agnostic representation of a
/// mixed-integer program.
///
/// The models are immutable data with the minimum of logic required to
/// evaluate valuations and validate inputs; everything to do with building
/// and solving optimization problems lives behind the ports.
pub mod models;

/// Interface traits for the winner determination system.
///
/// These traits define the contract between the model-building logic and
/// external MIP solvers, without tying either side to a particular backend.
pub mod ports;
