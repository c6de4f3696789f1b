//! Pairwise tournament selection.
//!
//! Each tournament draws two chromosomes with replacement and keeps the
//! better one with probability `chance`, the worse one otherwise. A chance
//! below 1 therefore lets weaker chromosomes through on purpose, trading
//! selection pressure for diversity.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::{Chromosome, Objective};
use rand::Rng;

/// Runs `rounds` tournaments and returns the winners.
///
/// Winners are independent copies, so the caller may modify them without
/// touching `population`. Ties keep the first entrant when choosing the
/// better and the second when choosing the worse.
///
/// Returns an empty vector when `population` is empty.
pub fn tournament<R: Rng>(
    population: &[Chromosome],
    chance: f64,
    rounds: usize,
    objective: Objective,
    rng: &mut R,
) -> Vec<Chromosome> {
    if population.is_empty() {
        return Vec::new();
    }

    let n = population.len();
    (0..rounds)
        .map(|_| {
            let first = &population[rng.random_range(0..n)];
            let second = &population[rng.random_range(0..n)];
            let second_better =
                objective.is_better(second.score(objective), first.score(objective));

            let winner = if rng.random::<f64>() < chance {
                if second_better {
                    second
                } else {
                    first
                }
            } else if second_better {
                first
            } else {
                second
            };
            winner.clone()
        })
        .collect()
}
