use coinreach::{BoundedSolver, CountPolicy, FlatSolver, SupplyModel};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bounded_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded");
    let coin_data: [(usize, usize); 4] = [(3, 40), (7, 40), (11, 40), (13, 40)];

    for target in [200usize, 2_000, 20_000] {
        for (name, policy) in [
            ("first", CountPolicy::FirstReachable),
            ("last", CountPolicy::LastReachable),
        ] {
            let solver = BoundedSolver::new(policy);
            group.bench_with_input(BenchmarkId::new(name, target), &target, |b, &target| {
                b.iter(|| solver.solve(black_box(target), black_box(&coin_data)))
            });
        }
    }
    group.finish();
}

fn flat_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat");
    let coins: [usize; 6] = [25, 10, 5, 1, 7, 7];

    for target in [1_000usize, 100_000, 1_000_000] {
        for (name, model) in [
            ("unbounded", SupplyModel::Unbounded),
            ("single_use", SupplyModel::SingleUse),
        ] {
            let solver = FlatSolver::new(model);
            group.bench_with_input(BenchmarkId::new(name, target), &target, |b, &target| {
                b.iter(|| solver.solve(black_box(target), black_box(&coins)))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bounded_benchmark, flat_benchmark);
criterion_main!(benches);
