//! Crossover and mutation over view-index chromosomes.
//!
//! Both operators draw their inputs with replacement from a pool and drop
//! offspring that would repeat a label. Neither repairs nor retries, so the
//! output can be smaller than the number of draws; the loop controller
//! decides how to refill the population.
//!
//! # Crossover
//!
//! - [`crossover`]: fixed single-point recombination around the middle gene
//!
//! # Mutation
//!
//! - [`mutation`]: replace one non-base gene with another lattice view

use super::types::{has_unique_labels, Chromosome, Lattice};
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Recombines `draws` random parent pairs from `pool`.
///
/// For each pair a uniform draw `u ∈ [0, 1)` is compared with
/// `probability`: when `u >= probability` the parents are recombined by
/// [`single_point`], otherwise both pass through unchanged. The parameter
/// therefore acts as a pass-through rate: `1.0` never recombines and `0.0`
/// always does.
///
/// Children that repeat a label are dropped. The result holds between 0
/// and `2 * draws` chromosomes; it is empty when `pool` is.
pub fn crossover<R: Rng>(
    lattice: &Lattice,
    pool: &[Chromosome],
    probability: f64,
    draws: usize,
    rng: &mut R,
) -> Vec<Chromosome> {
    if pool.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(draws * 2);
    for _ in 0..draws {
        let father = &pool[rng.random_range(0..pool.len())];
        let mother = &pool[rng.random_range(0..pool.len())];

        if rng.random::<f64>() >= probability {
            let (first, second) = single_point(father.genes(), mother.genes());
            for child in [first, second] {
                if has_unique_labels(lattice, &child) {
                    result.push(Chromosome::from_genes(child));
                }
            }
        } else {
            result.push(father.clone());
            result.push(mother.clone());
        }
    }
    result
}

/// Single-point crossover with the cut after gene `(n - 1) / 2`.
///
/// ```text
/// first  = father[0..=cut] ++ mother[cut+1..]
/// second = father[0] ++ mother[1..=cut] ++ father[cut+1..]
/// ```
///
/// Both children keep the father's base gene in position 0.
/// Parents of unequal length are cut to the shorter one.
pub fn single_point(father: &[usize], mother: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let n = father.len().min(mother.len());
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    let cut = (n - 1) / 2;

    let mut first = Vec::with_capacity(n);
    first.extend_from_slice(&father[..=cut]);
    first.extend_from_slice(&mother[cut + 1..n]);

    let mut second = Vec::with_capacity(n);
    second.push(father[0]);
    second.extend_from_slice(&mother[1..=cut]);
    second.extend_from_slice(&father[cut + 1..n]);

    (first, second)
}

// ============================================================================
// Mutation
// ============================================================================

/// Mutates `draws` random chromosomes from `pool`.
///
/// Each drawn chromosome is mutated with probability `probability` via
/// [`replace_random_gene`] on an independent copy; a mutant that repeats a
/// label is dropped. Chromosomes not mutated pass through unchanged with
/// their cached fitness.
///
/// Returns an empty vector when `pool` is empty.
pub fn mutation<R: Rng>(
    lattice: &Lattice,
    pool: &[Chromosome],
    probability: f64,
    draws: usize,
    top_view_count: usize,
    rng: &mut R,
) -> Vec<Chromosome> {
    if pool.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(draws);
    for _ in 0..draws {
        let chromosome = &pool[rng.random_range(0..pool.len())];

        if rng.random::<f64>() < probability {
            if let Some(mutant) = replace_random_gene(lattice, chromosome, top_view_count, rng) {
                result.push(mutant);
            }
        } else {
            result.push(chromosome.clone());
        }
    }
    result
}

/// Removes one non-base gene and appends a different lattice view.
///
/// The removed position is drawn from `[1, top_view_count - 1)`, or is 1
/// when that range is empty. The appended view is drawn uniformly from the
/// lattice views whose label differs from the removed one.
///
/// Returns `None` if no replacement exists or the result repeats a label.
/// The input is never modified.
pub fn replace_random_gene<R: Rng>(
    lattice: &Lattice,
    chromosome: &Chromosome,
    top_view_count: usize,
    rng: &mut R,
) -> Option<Chromosome> {
    let len = chromosome.len();
    if len < 2 {
        return None;
    }

    let upper = top_view_count.saturating_sub(1).max(2).min(len);
    let position = rng.random_range(1..upper);

    let mut genes = chromosome.genes().to_vec();
    let removed = lattice.label_id(genes.remove(position));

    let eligible = (0..lattice.len())
        .filter(|&i| lattice.label_id(i) != removed)
        .count();
    if eligible == 0 {
        return None;
    }
    let pick = rng.random_range(0..eligible);
    let replacement = (0..lattice.len())
        .filter(|&i| lattice.label_id(i) != removed)
        .nth(pick)?;

    genes.push(replacement);
    has_unique_labels(lattice, &genes).then(|| Chromosome::from_genes(genes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memetic::View;
    use crate::random::create_rng;

    fn lattice(n: usize) -> Lattice {
        let mut views = vec![View::new("Base", 100.0, 0, ["a", "b"])];
        views.extend((1..n).map(|i| View::new(format!("V{i}"), i as f64, 1, ["a"])));
        Lattice::new(views).unwrap()
    }

    fn chromosome(l: &Lattice, genes: &[usize]) -> Chromosome {
        Chromosome::new(l, genes.to_vec()).unwrap()
    }

    // ---- single_point ----

    #[test]
    fn test_single_point_odd_length() {
        // n = 5, cut = 2
        let (a, b) = single_point(&[0, 1, 2, 3, 4], &[0, 5, 6, 7, 8]);
        assert_eq!(a, vec![0, 1, 2, 7, 8]);
        assert_eq!(b, vec![0, 5, 6, 3, 4]);
    }

    #[test]
    fn test_single_point_even_length() {
        // n = 4, cut = 1
        let (a, b) = single_point(&[0, 1, 2, 3], &[0, 5, 6, 7]);
        assert_eq!(a, vec![0, 1, 6, 7]);
        assert_eq!(b, vec![0, 5, 2, 3]);
    }

    #[test]
    fn test_single_point_two_genes() {
        // cut = 0: the second child is the father again
        let (a, b) = single_point(&[0, 1], &[0, 2]);
        assert_eq!(a, vec![0, 2]);
        assert_eq!(b, vec![0, 1]);
    }

    // ---- crossover ----

    #[test]
    fn test_crossover_probability_one_passes_parents() {
        let l = lattice(10);
        let pool = vec![chromosome(&l, &[0, 1, 2, 3]), chromosome(&l, &[0, 4, 5, 6])];
        let mut rng = create_rng(42);
        let out = crossover(&l, &pool, 1.0, 50, &mut rng);
        assert_eq!(out.len(), 100);
        assert!(out.iter().all(|c| pool.contains(c)));
    }

    #[test]
    fn test_crossover_probability_zero_always_recombines() {
        let l = lattice(10);
        let mut father = chromosome(&l, &[0, 1, 2, 3]);
        father.set_fitness(1.0);
        let mut mother = chromosome(&l, &[0, 4, 5, 6]);
        mother.set_fitness(2.0);
        let pool = vec![father, mother];
        let mut rng = create_rng(42);
        let out = crossover(&l, &pool, 0.0, 50, &mut rng);
        // disjoint parents never clash, so every draw yields two fresh children
        assert_eq!(out.len(), 100);
        assert!(out.iter().all(|c| c.fitness().is_none()));
    }

    #[test]
    fn test_crossover_drops_invalid_children() {
        let l = lattice(10);
        // father [0,1,2,3], mother [0,3,2,1]: first = [0,1,2,1] clashes,
        // second = [0,3,2,3] clashes
        let pool = vec![chromosome(&l, &[0, 1, 2, 3]), chromosome(&l, &[0, 3, 2, 1])];
        let mut rng = create_rng(8);
        let out = crossover(&l, &pool, 0.0, 40, &mut rng);
        assert!(out.len() < 80);
        assert!(out.iter().all(|c| c.is_valid(&l)));
    }

    #[test]
    fn test_crossover_empty_pool() {
        let l = lattice(4);
        let mut rng = create_rng(1);
        assert!(crossover(&l, &[], 0.0, 10, &mut rng).is_empty());
    }

    // ---- mutation ----

    #[test]
    fn test_mutation_probability_zero_is_identity() {
        let l = lattice(10);
        let mut c = chromosome(&l, &[0, 1, 2, 3]);
        c.set_fitness(5.0);
        let pool = vec![c];
        let mut rng = create_rng(42);
        let out = mutation(&l, &pool, 0.0, 10, 3, &mut rng);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|x| *x == pool[0]));
    }

    #[test]
    fn test_mutation_without_alternative_is_empty() {
        // every replacement candidate is already selected
        let l = lattice(3);
        let pool = vec![chromosome(&l, &[0, 1, 2])];
        let mut rng = create_rng(42);
        let out = mutation(&l, &pool, 1.0, 10, 2, &mut rng);
        assert!(out.is_empty());
    }

    #[test]
    fn test_mutation_keeps_invariants() {
        let l = lattice(30);
        let pool = vec![chromosome(&l, &[0, 1, 2, 3, 4, 5])];
        let mut rng = create_rng(7);
        let out = mutation(&l, &pool, 1.0, 200, 5, &mut rng);
        assert!(!out.is_empty());
        for c in &out {
            assert_eq!(c.len(), 6);
            assert_eq!(c.genes()[0], 0);
            assert!(c.is_valid(&l));
            assert!(c.fitness().is_none());
        }
    }

    #[test]
    fn test_mutation_leaves_pool_untouched() {
        let l = lattice(30);
        let pool = vec![chromosome(&l, &[0, 1, 2, 3])];
        let before = pool.clone();
        let mut rng = create_rng(7);
        let _ = mutation(&l, &pool, 1.0, 20, 3, &mut rng);
        assert_eq!(pool, before);
    }

    #[test]
    fn test_replace_random_gene_position_range() {
        // top_view_count = 5: positions drawn from [1, 4)
        let l = lattice(30);
        let c = chromosome(&l, &[0, 1, 2, 3, 4, 5]);
        let mut rng = create_rng(3);
        for _ in 0..200 {
            let m = replace_random_gene(&l, &c, 5, &mut rng).unwrap_or_else(|| c.clone());
            // genes 4 and 5 are never removed
            assert!(m.genes().contains(&4));
            assert!(m.genes().contains(&5));
        }
    }

    #[test]
    fn test_replace_random_gene_small_top_view_count() {
        let l = lattice(5);
        let c = chromosome(&l, &[0, 1]);
        let mut rng = create_rng(3);
        let m = replace_random_gene(&l, &c, 1, &mut rng);
        if let Some(m) = m {
            assert_eq!(m.len(), 2);
            assert_ne!(m.genes()[1], 1);
        }
    }
}
