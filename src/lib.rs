//! Materialized view selection with a memetic algorithm.
//!
//! Given a lattice of candidate aggregate views, picks the base view plus a
//! fixed number of additional views so that the cost of storing them and
//! answering every other view from them is as low as possible.
//!
//! - [`memetic`]: lattice and chromosome types, genetic operators, local
//!   search and the generational runner
//! - [`error`]: the error type every fallible operation returns
//! - [`random`]: the seeded random-number source threaded through a run
//!
//! # Architecture
//!
//! Lattice construction and view materialization belong to the caller; the
//! crate only consumes the ordered lattice and returns the chosen views.
//! Every run is driven by one seeded generator, so equal seeds reproduce
//! equal results.

pub mod error;
pub mod memetic;
pub mod random;

pub use error::{MemeticError, Result};
