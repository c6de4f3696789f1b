//! Run configuration.
//!
//! [`MemeticConfig`] holds every parameter that controls a selection run.

use super::fitness::MissingAncestor;
use super::types::{Lattice, Objective};
use crate::error::{MemeticError, Result};

/// How the next generation is formed from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// Offspring and the previous population compete together and the best
    /// `population_count` survive. The population size never changes and
    /// the best fitness never worsens.
    #[default]
    Elitist,

    /// The population is replaced wholesale by the generation's output.
    ///
    /// Invalid crossover children and mutants are dropped, so the population
    /// can shrink and eventually empty out.
    Generational,
}

/// Configuration for a memetic view-selection run.
///
/// # Defaults
///
/// ```
/// use memetic_views::memetic::MemeticConfig;
///
/// let config = MemeticConfig::default();
/// assert_eq!(config.population_count, 20);
/// assert_eq!(config.tournament_rounds, 10);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use memetic_views::memetic::{MemeticConfig, Objective};
///
/// let config = MemeticConfig::default()
///     .with_generations(50)
///     .with_top_view_count(4)
///     .with_tournament_chance(0.8)
///     .with_objective(Objective::Minimize)
///     .with_seed(7);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemeticConfig {
    /// Number of generations to run. Zero returns the best initial chromosome.
    pub generations: usize,

    /// Size of the initial population.
    pub population_count: usize,

    /// Views selected on top of the base view.
    pub top_view_count: usize,

    /// Probability that a tournament keeps the better of its two entrants.
    ///
    /// With the complementary probability it keeps the worse one.
    pub tournament_chance: f64,

    /// Tournaments held per generation.
    pub tournament_rounds: usize,

    /// Crossover pass-through threshold (0.0–1.0).
    ///
    /// A uniform draw recombines the parents when it is at least this
    /// value, so `1.0` never recombines and `0.0` always does.
    pub crossover_probability: f64,

    /// Parent pairs drawn per generation.
    pub crossover_draws: usize,

    /// Probability that a drawn chromosome is mutated (0.0–1.0).
    pub mutation_probability: f64,

    /// Chromosomes drawn for mutation per generation.
    pub mutation_draws: usize,

    /// Whether lower or higher fitness wins.
    pub objective: Objective,

    /// How the next generation is formed.
    pub replacement: Replacement,

    /// What to do when an uncovered view has no compatible ancestor.
    pub missing_ancestor: MissingAncestor,

    /// Number of best offspring refined by local search each generation.
    ///
    /// Set to 0 to run a plain genetic algorithm.
    pub refine_top_k: usize,

    /// Neighbour moves tried per refined chromosome.
    pub refine_attempts: usize,

    /// Whether to evaluate fitness in parallel (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for MemeticConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            population_count: 20,
            top_view_count: 3,
            tournament_chance: 0.75,
            tournament_rounds: 10,
            crossover_probability: 0.3,
            crossover_draws: 10,
            mutation_probability: 0.1,
            mutation_draws: 10,
            objective: Objective::default(),
            replacement: Replacement::default(),
            missing_ancestor: MissingAncestor::default(),
            refine_top_k: 2,
            refine_attempts: 5,
            parallel: false,
            seed: None,
        }
    }
}

impl MemeticConfig {
    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the initial population size.
    pub fn with_population_count(mut self, n: usize) -> Self {
        self.population_count = n;
        self
    }

    /// Sets the number of views selected besides the base view.
    pub fn with_top_view_count(mut self, n: usize) -> Self {
        self.top_view_count = n;
        self
    }

    /// Sets the tournament chance.
    pub fn with_tournament_chance(mut self, chance: f64) -> Self {
        self.tournament_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of tournaments per generation.
    pub fn with_tournament_rounds(mut self, rounds: usize) -> Self {
        self.tournament_rounds = rounds;
        self
    }

    /// Sets the crossover pass-through threshold.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of crossover draws per generation.
    pub fn with_crossover_draws(mut self, draws: usize) -> Self {
        self.crossover_draws = draws;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of mutation draws per generation.
    pub fn with_mutation_draws(mut self, draws: usize) -> Self {
        self.mutation_draws = draws;
        self
    }

    /// Sets the optimization direction.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the replacement policy.
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    /// Sets the policy for uncovered views without a compatible ancestor.
    pub fn with_missing_ancestor(mut self, policy: MissingAncestor) -> Self {
        self.missing_ancestor = policy;
        self
    }

    /// Sets how many offspring are refined per generation (0 disables).
    pub fn with_refine_top_k(mut self, k: usize) -> Self {
        self.refine_top_k = k;
        self
    }

    /// Sets the neighbour moves tried per refined chromosome.
    pub fn with_refine_attempts(mut self, attempts: usize) -> Self {
        self.refine_attempts = attempts;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for small lattices: small population, few generations.
    ///
    /// - Population: 10, Generations: 30, Refinement: best 1
    pub fn fast() -> Self {
        Self {
            generations: 30,
            population_count: 10,
            refine_top_k: 1,
            refine_attempts: 3,
            ..Self::default()
        }
    }

    /// Preset for moderate lattices.
    ///
    /// - Population: 40, Generations: 200, 20 draws per operator
    pub fn balanced() -> Self {
        Self {
            generations: 200,
            population_count: 40,
            tournament_rounds: 20,
            crossover_draws: 20,
            mutation_draws: 20,
            ..Self::default()
        }
    }

    /// Preset for large lattices: large population, many generations.
    ///
    /// - Population: 100, Generations: 500, 50 draws per operator
    pub fn quality() -> Self {
        Self {
            generations: 500,
            population_count: 100,
            tournament_rounds: 50,
            crossover_draws: 50,
            mutation_draws: 50,
            refine_top_k: 5,
            refine_attempts: 10,
            ..Self::default()
        }
    }

    /// Picks a preset from the lattice size.
    ///
    /// - `lattice_len < 64` → [`fast()`](Self::fast)
    /// - `64 ≤ lattice_len < 512` → [`balanced()`](Self::balanced)
    /// - `lattice_len ≥ 512` → [`quality()`](Self::quality)
    pub fn auto_select(lattice_len: usize) -> Self {
        if lattice_len < 64 {
            Self::fast()
        } else if lattice_len < 512 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration against the lattice it will run on.
    ///
    /// # Errors
    /// Returns [`MemeticError::InvalidConfiguration`] describing the first
    /// violated precondition.
    pub fn validate(&self, lattice: &Lattice) -> Result<()> {
        validate_counts(lattice, self.top_view_count, self.population_count)?;
        for (name, p) in [
            ("tournament_chance", self.tournament_chance),
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        for (name, n) in [
            ("tournament_rounds", self.tournament_rounds),
            ("crossover_draws", self.crossover_draws),
            ("mutation_draws", self.mutation_draws),
        ] {
            if n == 0 {
                return Err(invalid(format!("{name} must be at least 1")));
            }
        }
        if self.refine_top_k > 0 && self.refine_attempts == 0 {
            return Err(invalid(
                "refine_attempts must be at least 1 when refinement is enabled".into(),
            ));
        }
        if let MissingAncestor::Penalty(p) = self.missing_ancestor {
            if !p.is_finite() || p < 0.0 {
                return Err(invalid(format!(
                    "missing-ancestor penalty must be finite and non-negative, got {p}"
                )));
            }
        }
        Ok(())
    }
}

/// Checks the chromosome-shape preconditions shared by the initializer.
pub(crate) fn validate_counts(
    lattice: &Lattice,
    top_view_count: usize,
    population_count: usize,
) -> Result<()> {
    if top_view_count == 0 {
        return Err(invalid("top_view_count must be at least 1".into()));
    }
    if top_view_count + 1 > lattice.distinct_labels() {
        return Err(invalid(format!(
            "top_view_count {top_view_count} needs {} distinct views, lattice has {}",
            top_view_count + 1,
            lattice.distinct_labels()
        )));
    }
    if population_count == 0 {
        return Err(invalid("population_count must be at least 1".into()));
    }
    Ok(())
}

fn invalid(msg: String) -> MemeticError {
    MemeticError::InvalidConfiguration(msg)
}
