//! Memetic algorithm for materialized view selection.
//!
//! A genetic algorithm over subsets of a view lattice, with a hill-climbing
//! refinement pass applied to the best offspring of every generation.
//! Chromosomes always hold the base view plus a fixed number of other
//! views; fitness is the storage cost of the selected views plus the cost
//! of answering every other view from its cheapest selected ancestor.
//!
//! # Key Types
//!
//! - [`View`], [`Lattice`]: the candidate views, base view first
//! - [`Chromosome`]: one candidate selection with its cached fitness
//! - [`MemeticConfig`]: algorithm parameters (rates, draws, policies, seed)
//! - [`MemeticRunner`]: executes the generational loop
//! - [`MemeticResult`]: the winning selection and run statistics
//!
//! # Submodules
//!
//! - [`operators`]: single-point crossover and gene-replacement mutation
//! - [`selection`]: pairwise tournament selection
//! - [`local_search`]: first-improvement hill climbing
//!
//! # References
//!
//! - Moscato (1989), *On Evolution, Search, Optimization, Genetic Algorithms
//!   and Martial Arts: Towards Memetic Algorithms*
//! - Harinarayan, Rajaraman & Ullman (1996), *Implementing Data Cubes
//!   Efficiently*

mod config;
mod fitness;
pub mod local_search;
pub mod operators;
mod population;
mod runner;
pub mod selection;
mod types;

pub use config::{MemeticConfig, Replacement};
pub use fitness::{FitnessEvaluator, MissingAncestor};
pub use local_search::LocalSearch;
pub use population::initial_population;
pub use runner::{MemeticResult, MemeticRunner};
pub use types::{Chromosome, Lattice, LatticeProvider, Objective, View};
