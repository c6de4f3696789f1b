//! Generational loop execution.
//!
//! [`MemeticRunner`] orchestrates the complete process:
//! initialization → evaluation → selection → crossover → mutation →
//! refinement → replacement → repeat.

use super::config::{MemeticConfig, Replacement};
use super::fitness::FitnessEvaluator;
use super::local_search::LocalSearch;
use super::operators::{crossover, mutation};
use super::population::initial_population;
use super::selection::tournament;
use super::types::{Chromosome, Lattice, LatticeProvider, Objective, View};
use crate::error::{MemeticError, Result};
use crate::random::create_rng;
use tracing::{debug, info, warn};

/// Result of a view-selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct MemeticResult {
    /// The best chromosome of the final population.
    pub best: Chromosome,

    /// The views selected by `best`, base view first.
    pub best_views: Vec<View>,

    /// Fitness of `best`.
    pub best_fitness: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Best fitness of the initial population, then of each generation.
    pub fitness_history: Vec<f64>,

    /// Size of the population the winner was picked from.
    pub final_population_size: usize,
}

/// Executes the memetic view-selection loop.
///
/// # Usage
///
/// ```
/// use memetic_views::memetic::{Lattice, MemeticConfig, MemeticRunner, View};
///
/// let lattice = Lattice::new(vec![
///     View::new("Base", 100.0, 0, ["d1", "d2"]),
///     View::new("V1", 10.0, 1, ["d1"]),
///     View::new("V2", 10.0, 1, ["d2"]),
///     View::new("V3", 50.0, 1, ["d1", "d2"]),
/// ])?;
/// let config = MemeticConfig::default()
///     .with_top_view_count(2)
///     .with_population_count(6)
///     .with_generations(20)
///     .with_seed(42);
///
/// let result = MemeticRunner::run(&lattice, &config)?;
/// assert_eq!(result.best_views[0].label, "Base");
/// # Ok::<(), memetic_views::MemeticError>(())
/// ```
pub struct MemeticRunner;

impl MemeticRunner {
    /// Runs the optimization on a lattice obtained from `provider`.
    pub fn run_with_provider<P: LatticeProvider + ?Sized>(
        provider: &P,
        config: &MemeticConfig,
    ) -> Result<MemeticResult> {
        let lattice = provider.lattice()?;
        Self::run(&lattice, config)
    }

    /// Runs the optimization.
    ///
    /// # Errors
    /// - [`MemeticError::InvalidConfiguration`] if `config` does not fit `lattice`.
    /// - [`MemeticError::NoCompatibleAncestor`] if fitness evaluation hits an
    ///   uncovered view without a compatible ancestor under
    ///   [`MissingAncestor::Fail`](super::MissingAncestor::Fail).
    /// - [`MemeticError::EmptyPopulation`] if generational replacement
    ///   leaves no chromosome.
    pub fn run(lattice: &Lattice, config: &MemeticConfig) -> Result<MemeticResult> {
        config.validate(lattice)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        let objective = config.objective;
        let evaluator = FitnessEvaluator::new(lattice, config.missing_ancestor);
        let local_search = LocalSearch::new(
            evaluator,
            config.top_view_count,
            config.refine_attempts,
            objective,
        );

        info!(
            seed,
            views = lattice.len(),
            generations = config.generations,
            population = config.population_count,
            "starting memetic view selection"
        );

        // 1. Initialize and evaluate
        let mut population = initial_population(
            lattice,
            config.top_view_count,
            config.population_count,
            &mut rng,
        )?;
        evaluator.evaluate_population(&mut population, config.parallel)?;

        let mut fitness_history = Vec::with_capacity(config.generations + 1);
        fitness_history.push(best_of(&population, objective, 0)?.score(objective));

        // 2. Generational loop
        for gen in 0..config.generations {
            evaluator.evaluate_population(&mut population, config.parallel)?;

            let parents = tournament(
                &population,
                config.tournament_chance,
                config.tournament_rounds,
                objective,
                &mut rng,
            );
            let children = crossover(
                lattice,
                &parents,
                config.crossover_probability,
                config.crossover_draws,
                &mut rng,
            );
            let mut offspring = mutation(
                lattice,
                &children,
                config.mutation_probability,
                config.mutation_draws,
                config.top_view_count,
                &mut rng,
            );

            evaluator.evaluate_population(&mut offspring, config.parallel)?;
            let improved = local_search.refine_best(&mut offspring, config.refine_top_k, &mut rng)?;
            let offspring_count = offspring.len();

            population = match config.replacement {
                Replacement::Elitist => {
                    elitist_merge(offspring, population, config.population_count, objective)
                }
                Replacement::Generational => offspring,
            };

            if population.is_empty() {
                warn!(generation = gen + 1, "population emptied out");
                return Err(MemeticError::EmptyPopulation {
                    generation: gen + 1,
                });
            }

            let gen_best = best_of(&population, objective, gen + 1)?.score(objective);
            fitness_history.push(gen_best);

            debug!(
                generation = gen + 1,
                offspring = offspring_count,
                population = population.len(),
                refined = improved,
                best = gen_best,
                "generation complete"
            );
        }

        // 3. Pick the winner
        let best = best_of(&population, objective, config.generations)?.clone();
        let best_fitness = best.score(objective);
        let best_views = best.views(lattice).cloned().collect();

        info!(
            best_fitness,
            views = ?best.labels(lattice),
            "memetic view selection finished"
        );

        Ok(MemeticResult {
            best,
            best_views,
            best_fitness,
            generations: config.generations,
            fitness_history,
            final_population_size: population.len(),
        })
    }
}

/// Keeps the `size` best of offspring and previous population combined.
///
/// The previous best always competes for a slot, so the best fitness never
/// worsens, and the result holds exactly `size` chromosomes whenever
/// `previous` does. Offspring win ties.
fn elitist_merge(
    mut offspring: Vec<Chromosome>,
    previous: Vec<Chromosome>,
    size: usize,
    objective: Objective,
) -> Vec<Chromosome> {
    offspring.extend(previous);
    sort_best_first(&mut offspring, objective);
    offspring.truncate(size);
    offspring
}

fn sort_best_first(population: &mut [Chromosome], objective: Objective) {
    population.sort_by(|a, b| objective.compare(a.score(objective), b.score(objective)));
}

/// Finds the best chromosome; the first one wins ties.
fn best_of(population: &[Chromosome], objective: Objective, generation: usize) -> Result<&Chromosome> {
    population
        .iter()
        .reduce(|best, c| {
            if objective.is_better(c.score(objective), best.score(objective)) {
                c
            } else {
                best
            }
        })
        .ok_or(MemeticError::EmptyPopulation { generation })
}

// ============================================================================
// Tests
// ============================================================================
