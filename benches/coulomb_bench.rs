use coulomb_wave::{coulomb, coulomb_f, CoulombOptions, CoulombTable, Regime};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn bench_regimes(c: &mut Criterion) {
    let options = CoulombOptions::default();
    let cases = [
        (Regime::Series, 2, 0.5, 1.5),
        (Regime::Steed, 3, -2.0, 8.0),
        (Regime::Asymptotic, 2, 1.0, 60.0),
        (Regime::Recursion, 10, 1.0, 3.0),
        (Regime::Integration, 0, 5.0, 3.0),
    ];

    let mut group = c.benchmark_group("coulomb_regimes");
    for (regime, l, eta, rho) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(regime.name()), &regime, |b, regime| {
            b.iter(|| regime.evaluate(black_box(l), black_box(eta), black_box(rho), &options))
        });
    }
    group.finish();
}

fn bench_public_entry_points(c: &mut Criterion) {
    c.bench_function("coulomb_f_tunneling", |b| {
        b.iter(|| coulomb_f(black_box(1), black_box(50.0), black_box(30.0)))
    });
    c.bench_function("coulomb_pair_oscillatory", |b| {
        b.iter(|| coulomb(black_box(5), black_box(0.5), black_box(20.0)))
    });
}

fn bench_table(c: &mut Criterion) {
    let options = CoulombOptions::default();
    let radii: Vec<f64> = (1..=256).map(|i| 0.25 * f64::from(i)).collect();

    let mut group = c.benchmark_group("coulomb_table");
    group.sample_size(10);
    group.bench_function("l_max_10_256_radii", |b| {
        b.iter(|| CoulombTable::new(10, black_box(1.5), radii.clone(), &options))
    });
    group.finish();
}

criterion_group!(benches, bench_regimes, bench_public_entry_points, bench_table);
criterion_main!(benches);
