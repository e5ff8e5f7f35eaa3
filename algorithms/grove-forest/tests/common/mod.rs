use grove::{Dataset, FeatureKeys};
use ndarray::{concatenate, s, Array, Array2, Axis};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Two gaussian blobs in three features, the class is stored in column 0
///
/// Rows alternate between the classes.
pub fn blobs(rows_per_class: usize, seed: u64) -> Dataset {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut records = Array2::zeros((2 * rows_per_class, 4));
    for class in 0..2 {
        let centre = if class == 0 { -2.0 } else { 2.0 };
        let features: Array2<f64> =
            Array::random_using((rows_per_class, 3), StandardNormal, &mut rng) + centre;
        let labels = Array2::from_elem((rows_per_class, 1), class as f64);
        let block = concatenate(Axis(1), &[labels.view(), features.view()]).unwrap();

        records
            .slice_mut(s![class..;2, ..])
            .assign(&block);
    }

    Dataset::new(records)
        .with_keys(
            FeatureKeys::new()
                .with("class", 0)
                .with("f1", 1)
                .with("f2", 2)
                .with("f3", 3),
        )
        .unwrap()
}

/// Fraction of rows whose class matches the prediction
pub fn accuracy(dataset: &Dataset, predictions: &[bool]) -> f64 {
    let correct = predictions
        .iter()
        .enumerate()
        .filter(|(row, prediction)| (dataset.store().row(*row)[0] > 0.0) == **prediction)
        .count();
    correct as f64 / predictions.len() as f64
}
