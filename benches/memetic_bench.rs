//! Criterion benchmarks for memetic view selection.
//!
//! Uses synthetic data-cube lattices (every non-empty subset of `d`
//! dimensions) to measure fitness evaluation and whole runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memetic_views::memetic::{
    initial_population, FitnessEvaluator, Lattice, MemeticConfig, MemeticRunner, MissingAncestor,
    View,
};
use memetic_views::random::create_rng;

/// Data cube over `d` dimensions, finest view first.
///
/// A view grouping `k` dimensions sits on level `d - k` and has size
/// `10^k`, so coarser views are cheaper.
fn cube_lattice(d: usize) -> Lattice {
    let mut masks: Vec<u32> = (1..(1u32 << d)).collect();
    masks.sort_by_key(|m| std::cmp::Reverse(m.count_ones()));

    let views = masks
        .into_iter()
        .map(|mask| {
            let dims: Vec<String> = (0..d)
                .filter(|bit| mask & (1 << *bit) != 0)
                .map(|bit| format!("d{bit}"))
                .collect();
            let k = dims.len();
            View::new(
                dims.join(""),
                10f64.powi(k as i32),
                (d - k) as u32,
                dims,
            )
        })
        .collect();
    Lattice::new(views).expect("cube lattice is non-empty")
}

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");

    for d in [4usize, 6, 8] {
        let lattice = cube_lattice(d);
        let evaluator = FitnessEvaluator::new(&lattice, MissingAncestor::Fail);
        let mut rng = create_rng(42);
        let population = initial_population(&lattice, d, 1, &mut rng).expect("valid counts");
        let genes = population[0].genes().to_vec();

        group.bench_with_input(BenchmarkId::from_parameter(d), &genes, |b, g| {
            b.iter(|| black_box(evaluator.evaluate(black_box(g))))
        });
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("memetic_run");
    group.sample_size(10);

    for (d, pop, gen) in [(4usize, 20usize, 50usize), (6, 40, 50), (8, 40, 30)] {
        let lattice = cube_lattice(d);
        let config = MemeticConfig {
            top_view_count: d,
            population_count: pop,
            generations: gen,
            seed: Some(42),
            ..MemeticConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_g{}", d, pop, gen), d),
            &(lattice, config),
            |b, (l, c)| {
                b.iter(|| {
                    let result = MemeticRunner::run(black_box(l), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_fitness, bench_run);
criterion_main!(benches);
