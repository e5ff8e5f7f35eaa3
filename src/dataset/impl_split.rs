use super::{DatasetView, InformationGain, ProbabilityMap, SplitPair};
use log::trace;
use rand::Rng;

/// Starting point of the information gain search. Any candidate threshold beats it, so even a
/// landscape without any gain reports the first candidate.
const SENTINEL_GAIN: f64 = -1000.0;
const SENTINEL_THRESHOLD: f64 = -1e199;

impl<'a> DatasetView<'a> {
    /// Enumerates the rows into two categories split on the given threshold
    ///
    /// Returns the fraction of rows with `row[column] <= threshold` and with
    /// `row[column] > threshold`.
    pub fn enumerate_threshold(&self, column: usize, threshold: f64) -> ProbabilityMap {
        let rows = self.nrows();
        if rows == 0 {
            return ProbabilityMap::default();
        }

        let greater = self
            .references
            .iter()
            .filter(|&&row| self.store.records[(row, column)] > threshold)
            .count();

        ProbabilityMap {
            le: (rows - greater) as f64 / rows as f64,
            g: greater as f64 / rows as f64,
        }
    }

    /// Candidate thresholds of a column: the raw value of every row, in view order
    pub fn thresholds(&self, column: usize) -> Vec<f64> {
        self.references
            .iter()
            .map(|&row| self.store.records[(row, column)])
            .collect()
    }

    /// Partition the rows on `row[column] > threshold`
    ///
    /// Both halves reference the same sample store and keep the relative order of the rows.
    pub fn split(&self, column: usize, threshold: f64) -> SplitPair<'a> {
        // Start with two views large enough for every row and shrink them afterwards
        let mut le = DatasetView::zeroed(self.store, self.nrows());
        let mut g = DatasetView::zeroed(self.store, self.nrows());
        let mut le_rows = 0;
        let mut g_rows = 0;

        for &row in &self.references {
            if self.store.records[(row, column)] > threshold {
                g.references[g_rows] = row;
                g_rows += 1;
            } else {
                le.references[le_rows] = row;
                le_rows += 1;
            }
        }

        le.resize(le_rows);
        g.resize(g_rows);

        SplitPair { le, g }
    }

    /// Information gain of the best threshold of `attribute_column` with respect to the
    /// decision column
    ///
    /// The decision column is expected to hold `0.0`/`1.0` values and is enumerated at threshold
    /// zero. Every row value of the attribute column is tried as threshold; ties keep the
    /// threshold seen first. A result with non-positive gain is no useful split.
    pub fn information_gain(
        &self,
        decision_column: usize,
        attribute_column: usize,
    ) -> InformationGain {
        let class_entropy = self.enumerate_threshold(decision_column, 0.0).entropy();
        let rows = self.nrows() as f64;

        let mut best = InformationGain {
            gain: SENTINEL_GAIN,
            threshold: SENTINEL_THRESHOLD,
        };
        for threshold in self.thresholds(attribute_column) {
            let counts = self.split_counts(decision_column, attribute_column, threshold);

            let gain = class_entropy
                - counts.le_rows as f64 / rows * counts.le_distribution().entropy()
                - counts.g_rows as f64 / rows * counts.g_distribution().entropy();

            if gain > best.gain {
                best = InformationGain { gain, threshold };
            }
        }

        trace!(
            "column {}: best threshold {} with gain {}",
            attribute_column,
            best.threshold,
            best.gain
        );
        best
    }

    /// Bootstrap sample of `sample_size` rows, drawn uniformly with replacement
    ///
    /// The sample references the same physical rows as this view. Sampling from an empty view
    /// yields an empty sample.
    pub fn bootstrap_sample<R: Rng + ?Sized>(
        &self,
        sample_size: usize,
        rng: &mut R,
    ) -> DatasetView<'a> {
        if self.is_empty() {
            return DatasetView::from_references_unchecked(self.store, Vec::new());
        }

        let references = (0..sample_size)
            .map(|_| self.references[rng.gen_range(0..self.nrows())])
            .collect();
        DatasetView::from_references_unchecked(self.store, references)
    }

    /// All physical rows of the store which are not referenced by this view, in store order
    pub fn out_of_bag_set(&self) -> DatasetView<'a> {
        let mut in_bag = vec![false; self.store.nrows()];
        for &row in &self.references {
            in_bag[row] = true;
        }

        let references = in_bag
            .into_iter()
            .enumerate()
            .filter(|(_, in_bag)| !in_bag)
            .map(|(row, _)| row)
            .collect();
        DatasetView::from_references_unchecked(self.store, references)
    }

    /// Row and decision counts of both sides of a split, without materializing the split
    fn split_counts(
        &self,
        decision_column: usize,
        attribute_column: usize,
        threshold: f64,
    ) -> SplitCounts {
        let mut counts = SplitCounts::default();
        for &row in &self.references {
            let decision = self.store.records[(row, decision_column)] > 0.0;
            if self.store.records[(row, attribute_column)] > threshold {
                counts.g_rows += 1;
                counts.g_decisions += decision as usize;
            } else {
                counts.le_rows += 1;
                counts.le_decisions += decision as usize;
            }
        }
        counts
    }
}

/// Split sizes and number of positive decisions on each side
#[derive(Debug, Default)]
struct SplitCounts {
    le_rows: usize,
    le_decisions: usize,
    g_rows: usize,
    g_decisions: usize,
}

impl SplitCounts {
    fn le_distribution(&self) -> ProbabilityMap {
        distribution(self.le_decisions, self.le_rows)
    }

    fn g_distribution(&self) -> ProbabilityMap {
        distribution(self.g_decisions, self.g_rows)
    }
}

/// Decision distribution of `rows` rows with `positive` decisions above zero
fn distribution(positive: usize, rows: usize) -> ProbabilityMap {
    if rows == 0 {
        return ProbabilityMap::default();
    }
    ProbabilityMap {
        le: (rows - positive) as f64 / rows as f64,
        g: positive as f64 / rows as f64,
    }
}
