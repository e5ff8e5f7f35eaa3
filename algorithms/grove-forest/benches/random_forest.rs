use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use grove::prelude::*;
use grove::{Dataset, FeatureKeys};
use grove_forest::RandomForest;
use ndarray::{concatenate, Array, Array2, Axis};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;

/// Two blobs in `n_features` features, the class is stored in column 0
fn generate_blobs(samples: usize, n_features: usize, rng: &mut SmallRng) -> Dataset {
    let blocks = (0..2)
        .map(|class| {
            let labels = Array2::from_elem((samples, 1), class as f64);
            let features: Array2<f64> =
                Array::random_using((samples, n_features), StandardNormal, &mut *rng)
                    + 3. * class as f64;
            concatenate(Axis(1), &[labels.view(), features.view()]).unwrap()
        })
        .collect::<Vec<_>>();
    let views = blocks.iter().map(|x| x.view()).collect::<Vec<_>>();

    Dataset::new(concatenate(Axis(0), &views).unwrap())
}

fn random_forest_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    // Controls how many samples for each class are generated
    let training_set_sizes = &[100, 1000, 5000];
    let n_features = 4;

    let mut group = c.benchmark_group("random_forest");
    group.sample_size(10);

    for n in training_set_sizes.iter() {
        let dataset = generate_blobs(*n, n_features, &mut rng);
        let params = RandomForest::params(0, FeatureKeys::numbered(1..n_features + 1))
            .tree_count(20)
            .check_unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, d| {
            b.iter(|| params.fit(&d.view()))
        });
    }

    group.finish();
}

criterion_group!(benches, random_forest_bench);
criterion_main!(benches);
