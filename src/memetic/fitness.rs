//! Fitness evaluation over the lattice.
//!
//! The score of a chromosome is the storage cost of the views it selects
//! plus, for every view it leaves out, the size of the cheapest selected
//! view that could answer it: one on a strictly lower level that shares at
//! least one dimension.

use super::types::{check_genes, Chromosome, Lattice};
use crate::error::{MemeticError, Result};

/// Policy for an uncovered view whose lower-level selected views share no
/// dimension with it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingAncestor {
    /// Abort the run with [`MemeticError::NoCompatibleAncestor`].
    #[default]
    Fail,

    /// Add a fixed cost for the view and keep going.
    Penalty(f64),
}

/// Scores chromosomes against one lattice.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    lattice: &'a Lattice,
    policy: MissingAncestor,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator for `lattice`.
    pub fn new(lattice: &'a Lattice, policy: MissingAncestor) -> Self {
        Self { lattice, policy }
    }

    /// The lattice this evaluator scores against.
    pub fn lattice(&self) -> &'a Lattice {
        self.lattice
    }

    /// Computes the fitness of a gene list.
    ///
    /// # Complexity
    /// O(L · n) for a lattice of L views and n genes.
    ///
    /// # Errors
    /// - [`MemeticError::InvalidConfiguration`] if `genes` would not form a
    ///   valid [`Chromosome`]: an index outside the lattice, a first gene
    ///   other than the base view, or a repeated label.
    /// - [`MemeticError::NoCompatibleAncestor`] under
    ///   [`MissingAncestor::Fail`] when an uncovered view has lower-level
    ///   selected views but none sharing a dimension.
    pub fn evaluate(&self, genes: &[usize]) -> Result<f64> {
        check_genes(self.lattice, genes)?;
        self.score(genes)
    }

    /// Scores genes already known to form a valid chromosome.
    fn score(&self, genes: &[usize]) -> Result<f64> {
        let lattice = self.lattice;

        let mut selected = vec![false; lattice.distinct_labels()];
        let mut size_view = 0.0;
        for &g in genes {
            selected[lattice.label_id(g)] = true;
            size_view += lattice.view(g).size;
        }

        let mut size_sma_view = 0.0;
        for (i, view) in lattice.views().iter().enumerate() {
            if selected[lattice.label_id(i)] {
                continue;
            }

            let mut has_lower = false;
            let mut cheapest: Option<f64> = None;
            for &g in genes {
                let candidate = lattice.view(g);
                if candidate.level >= view.level {
                    continue;
                }
                has_lower = true;
                if candidate.shares_dimension(view) {
                    cheapest = Some(cheapest.map_or(candidate.size, |c| c.min(candidate.size)));
                }
            }

            if !has_lower {
                continue;
            }
            size_sma_view += match (cheapest, self.policy) {
                (Some(size), _) => size,
                (None, MissingAncestor::Penalty(p)) => p,
                (None, MissingAncestor::Fail) => {
                    return Err(MemeticError::NoCompatibleAncestor {
                        view: view.label.clone(),
                    })
                }
            };
        }

        Ok(size_view + size_sma_view)
    }

    /// Evaluates a chromosome and caches the result on it.
    ///
    /// Chromosomes that already carry a fitness are left untouched.
    pub fn ensure(&self, chromosome: &mut Chromosome) -> Result<f64> {
        if let Some(f) = chromosome.fitness() {
            return Ok(f);
        }
        let f = self.score(chromosome.genes())?;
        chromosome.set_fitness(f);
        Ok(f)
    }

    /// Fills in the fitness of every unevaluated chromosome.
    ///
    /// On failure the error of the first failing chromosome in population
    /// order is returned, with or without `parallel`. In parallel mode the
    /// chromosomes after it are still evaluated.
    pub fn evaluate_population(&self, population: &mut [Chromosome], parallel: bool) -> Result<()> {
        if parallel {
            self.evaluate_parallel(population)
        } else {
            self.evaluate_sequential(population)
        }
    }

    fn evaluate_sequential(&self, population: &mut [Chromosome]) -> Result<()> {
        for chromosome in population.iter_mut() {
            self.ensure(chromosome)?;
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn evaluate_parallel(&self, population: &mut [Chromosome]) -> Result<()> {
        use rayon::prelude::*;

        let outcomes: Vec<Result<f64>> = population
            .par_iter_mut()
            .map(|chromosome| self.ensure(chromosome))
            .collect();
        outcomes.into_iter().try_for_each(|outcome| outcome.map(|_| ()))
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_parallel(&self, population: &mut [Chromosome]) -> Result<()> {
        self.evaluate_sequential(population)
    }
}
