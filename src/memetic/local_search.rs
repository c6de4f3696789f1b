//! Local-search refinement, the memetic half of the algorithm.
//!
//! A chromosome is improved by first-improvement hill climbing: each
//! attempt proposes a neighbour with [`replace_random_gene`] and accepts it
//! only if its fitness is strictly better than the incumbent's.

use super::fitness::FitnessEvaluator;
use super::operators::replace_random_gene;
use super::types::{Chromosome, Objective};
use crate::error::Result;
use rand::Rng;

/// Hill-climbing refiner bound to one lattice and objective.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearch<'a> {
    evaluator: FitnessEvaluator<'a>,
    top_view_count: usize,
    attempts: usize,
    objective: Objective,
}

impl<'a> LocalSearch<'a> {
    /// Creates a refiner that tries `attempts` neighbours per chromosome.
    pub fn new(
        evaluator: FitnessEvaluator<'a>,
        top_view_count: usize,
        attempts: usize,
        objective: Objective,
    ) -> Self {
        Self {
            evaluator,
            top_view_count,
            attempts,
            objective,
        }
    }

    /// Hill-climbs from `chromosome`.
    ///
    /// The input is evaluated first if needed. Neighbours are built on
    /// independent copies, so a rejected proposal leaves the incumbent intact.
    /// The returned chromosome is never worse than the input.
    pub fn refine<R: Rng>(&self, chromosome: &Chromosome, rng: &mut R) -> Result<Chromosome> {
        let lattice = self.evaluator.lattice();
        let mut incumbent = chromosome.clone();
        let mut incumbent_fitness = self.evaluator.ensure(&mut incumbent)?;

        for _ in 0..self.attempts {
            let Some(mut candidate) =
                replace_random_gene(lattice, &incumbent, self.top_view_count, rng)
            else {
                continue;
            };
            let candidate_fitness = self.evaluator.ensure(&mut candidate)?;
            if self.objective.is_better(candidate_fitness, incumbent_fitness) {
                incumbent = candidate;
                incumbent_fitness = candidate_fitness;
            }
        }
        Ok(incumbent)
    }

    /// Refines the `top_k` best chromosomes of a population in place.
    ///
    /// Returns how many chromosomes were improved.
    pub fn refine_best<R: Rng>(
        &self,
        population: &mut [Chromosome],
        top_k: usize,
        rng: &mut R,
    ) -> Result<usize> {
        if top_k == 0 || population.is_empty() {
            return Ok(0);
        }

        let objective = self.objective;
        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by(|&a, &b| {
            objective.compare(population[a].score(objective), population[b].score(objective))
        });

        let mut improved = 0;
        for &idx in order.iter().take(top_k) {
            let before = population[idx].score(objective);
            let refined = self.refine(&population[idx], rng)?;
            if objective.is_better(refined.score(objective), before) {
                improved += 1;
            }
            population[idx] = refined;
        }
        Ok(improved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memetic::{Lattice, MissingAncestor, View};
    use crate::random::create_rng;

    /// Base plus ten level-1 views sized ten times their index.
    fn lattice() -> Lattice {
        let mut views = vec![View::new("Base", 1000.0, 0, ["a", "b"])];
        views.extend((1..=10).map(|i| View::new(format!("V{i}"), i as f64 * 10.0, 1, ["a"])));
        Lattice::new(views).unwrap()
    }

    #[test]
    fn test_refine_never_worse() {
        let l = lattice();
        let eval = FitnessEvaluator::new(&l, MissingAncestor::Fail);
        let start = Chromosome::new(&l, vec![0, 8, 9, 10]).unwrap();
        let start_fitness = eval.evaluate(start.genes()).unwrap();

        for objective in [Objective::Minimize, Objective::Maximize] {
            let mut rng = create_rng(4);
            let refined = LocalSearch::new(eval, 3, 20, objective)
                .refine(&start, &mut rng)
                .unwrap();
            let f = refined.fitness().unwrap();
            assert!(!objective.is_better(start_fitness, f));
            assert!(refined.is_valid(&l));
        }
    }

    #[test]
    fn test_refine_improves_when_possible() {
        // every uncovered view costs 1000 via Base, so selecting any level-1
        // view saves (1000 - size); swapping a large view for a small one helps
        let l = lattice();
        let eval = FitnessEvaluator::new(&l, MissingAncestor::Fail);
        let start = Chromosome::new(&l, vec![0, 9, 10]).unwrap();
        let mut rng = create_rng(12);
        let refined = LocalSearch::new(eval, 2, 50, Objective::Minimize)
            .refine(&start, &mut rng)
            .unwrap();
        assert!(refined.fitness().unwrap() < eval.evaluate(start.genes()).unwrap());
    }

    #[test]
    fn test_refine_zero_attempts_returns_evaluated_copy() {
        let l = lattice();
        let eval = FitnessEvaluator::new(&l, MissingAncestor::Fail);
        let start = Chromosome::new(&l, vec![0, 1, 2]).unwrap();
        let mut rng = create_rng(0);
        let refined = LocalSearch::new(eval, 2, 0, Objective::Minimize)
            .refine(&start, &mut rng)
            .unwrap();
        assert_eq!(refined.genes(), start.genes());
        assert!(refined.fitness().is_some());
        assert!(start.fitness().is_none());
    }

    #[test]
    fn test_refine_best_touches_only_top_k() {
        let l = lattice();
        let eval = FitnessEvaluator::new(&l, MissingAncestor::Fail);
        let mut pop: Vec<Chromosome> = [[0, 1, 2], [0, 9, 10], [0, 8, 10]]
            .iter()
            .map(|g| Chromosome::new(&l, g.to_vec()).unwrap())
            .collect();
        eval.evaluate_population(&mut pop, false).unwrap();
        let untouched = pop[1].clone();

        let mut rng = create_rng(5);
        LocalSearch::new(eval, 2, 30, Objective::Minimize)
            .refine_best(&mut pop, 1, &mut rng)
            .unwrap();
        // [0, 9, 10] is the worst under minimization and stays as it was
        assert_eq!(pop[1], untouched);
    }

    #[test]
    fn test_refine_best_disabled() {
        let l = lattice();
        let eval = FitnessEvaluator::new(&l, MissingAncestor::Fail);
        let mut pop = vec![Chromosome::new(&l, vec![0, 9, 10]).unwrap()];
        let mut rng = create_rng(5);
        let improved = LocalSearch::new(eval, 2, 30, Objective::Minimize)
            .refine_best(&mut pop, 0, &mut rng)
            .unwrap();
        assert_eq!(improved, 0);
        assert!(pop[0].fitness().is_none());
    }
}
