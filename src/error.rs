//! Error type shared by every stage of a selection run.

use thiserror::Error;

/// Errors that abort a view-selection run.
///
/// None of these are retried internally: a run either completes with a
/// best chromosome or fails with one of the variants below.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemeticError {
    /// A configuration parameter or the lattice violates a precondition.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The working population became empty before the best chromosome
    /// could be chosen.
    #[error("population is empty at generation {generation}")]
    EmptyPopulation { generation: usize },

    /// An uncovered view has lower-level selected views, but none of them
    /// shares a dimension with it.
    #[error("no compatible ancestor for view '{view}'")]
    NoCompatibleAncestor { view: String },
}

pub type Result<T> = std::result::Result<T, MemeticError>;
