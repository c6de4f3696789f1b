//! Initial population.

use super::config::validate_counts;
use super::types::{Chromosome, Lattice};
use crate::error::Result;
use rand::Rng;

/// Builds `population_count` random chromosomes.
///
/// Each chromosome starts with the base view and draws lattice indices
/// uniformly until it holds `top_view_count + 1` distinct labels. Draws
/// whose label is already present are discarded.
///
/// # Errors
/// Returns [`MemeticError::InvalidConfiguration`](crate::error::MemeticError::InvalidConfiguration)
/// if `top_view_count` is zero, exceeds what the lattice's distinct labels
/// allow, or `population_count` is zero. Validation happens before any
/// sampling, so the rejection loop always terminates.
pub fn initial_population<R: Rng>(
    lattice: &Lattice,
    top_view_count: usize,
    population_count: usize,
    rng: &mut R,
) -> Result<Vec<Chromosome>> {
    validate_counts(lattice, top_view_count, population_count)?;

    let genes_per_chromosome = top_view_count + 1;
    let population = (0..population_count)
        .map(|_| {
            let mut seen = vec![false; lattice.distinct_labels()];
            let mut genes = Vec::with_capacity(genes_per_chromosome);
            genes.push(0);
            seen[lattice.label_id(0)] = true;

            while genes.len() < genes_per_chromosome {
                let idx = rng.random_range(0..lattice.len());
                let id = lattice.label_id(idx);
                if !seen[id] {
                    seen[id] = true;
                    genes.push(idx);
                }
            }
            Chromosome::from_genes(genes)
        })
        .collect();

    Ok(population)
}
