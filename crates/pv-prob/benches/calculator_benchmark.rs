use criterion::{Criterion, criterion_group, criterion_main};
use pv_prob::catalog::DistributionSpec;
use pv_prob::family::Family;
use pv_prob::{MultivariateNormal, RangePolicy, bivariate, data, pit, sampling};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

fn bench_calculator(c: &mut Criterion) {
    let normal = DistributionSpec::defaults(Family::Normal).handle().unwrap();
    c.bench_function("normal_fixed_200", |b| {
        b.iter(|| black_box(data::calculate(&normal, RangePolicy::Fixed)))
    });
    c.bench_function("normal_quantile_1000", |b| {
        b.iter(|| black_box(data::calculate(&normal, RangePolicy::Quantile)))
    });

    let poisson = DistributionSpec::Poisson { lambda: 40.0 }.handle().unwrap();
    c.bench_function("poisson_quantile_window", |b| {
        b.iter(|| black_box(data::calculate(&poisson, RangePolicy::Quantile)))
    });

    let mvn = MultivariateNormal::from_rows(&[0.0, 1.0], &[vec![1.0, 0.3], vec![0.3, 2.0]]).unwrap();
    c.bench_function("mvn_grid_100x100", |b| b.iter(|| black_box(bivariate::calculate_2d(&mvn).unwrap())));
}

fn bench_sampling(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(17);
    c.bench_function("negative_binomial_10k", |b| {
        b.iter(|| black_box(sampling::negative_binomial_with_rng(5, 0.3, 10_000, &mut rng).unwrap()))
    });
    c.bench_function("geometric_sum_1k_r10", |b| {
        b.iter(|| black_box(sampling::geometric_sum_with_rng(0.4, 10, 1_000, &mut rng).unwrap()))
    });

    let normal = DistributionSpec::defaults(Family::Normal).handle().unwrap();
    c.bench_function("pit_normal_10k", |b| {
        b.iter(|| black_box(pit::pit_with_rng(&normal, 10_000, &mut rng).unwrap()))
    });
}

criterion_group!(benches, bench_calculator, bench_sampling);
criterion_main!(benches);
