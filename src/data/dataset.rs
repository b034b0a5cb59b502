use nalgebra::{DMatrix, DVector};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use super::record::{Label, RealNumber, Record};

/// Two-class Gini impurity, `1 - p² - q²`. Undefined for an empty set.
pub fn gini(positive: usize, negative: usize) -> Option<f64> {
    let n = positive + negative;
    if n == 0 {
        return None;
    }
    let p = positive as f64 / n as f64;
    let q = negative as f64 / n as f64;
    Some(1.0 - p * p - q * q)
}

/// Labeled records viewed through an index list over a shared, read-only store.
///
/// `separate` and `sub_sample` produce new index lists; the records themselves
/// are never copied, so siblings and parents cannot observe each other.
#[derive(Clone)]
pub struct Dataset<T: RealNumber> {
    store: Arc<[Record<T>]>,
    indices: Vec<usize>,
    positives: usize,
    impurity: Option<f64>,
    feature_range: Option<(usize, usize)>,
}

impl<T: RealNumber> Debug for Dataset<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.impurity {
            Some(impurity) => write!(f, "Dataset {{\n    impurity: {:.6},\n", impurity)?,
            None => write!(f, "Dataset {{\n    impurity: undefined,\n")?,
        }
        writeln!(f, "    records: [")?;
        for record in self.records() {
            writeln!(f, "        {:?},", record)?;
        }
        write!(f, "    ]\n}}")
    }
}

impl<T: RealNumber> Dataset<T> {
    pub fn new(records: Vec<Record<T>>) -> Self {
        let indices = (0..records.len()).collect();
        Self::from_indices(records.into(), indices)
    }

    fn from_indices(store: Arc<[Record<T>]>, indices: Vec<usize>) -> Self {
        let mut positives = 0;
        let mut feature_range: Option<(usize, usize)> = None;
        for &index in &indices {
            let record = &store[index];
            if record.label() == Label::Positive {
                positives += 1;
            }
            if let Some((lo, hi)) = record.index_range() {
                feature_range = Some(match feature_range {
                    Some((min, max)) => (min.min(lo), max.max(hi)),
                    None => (lo, hi),
                });
            }
        }
        let impurity = gini(positives, indices.len() - positives);

        Self {
            store,
            indices,
            positives,
            impurity,
            feature_range,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Cached Gini impurity; `None` for an empty dataset.
    pub fn impurity(&self) -> Option<f64> {
        self.impurity
    }

    /// Smallest and largest feature index observed across all records.
    pub fn feature_range(&self) -> Option<(usize, usize)> {
        self.feature_range
    }

    /// `(positive, negative)` label counts.
    pub fn class_counts(&self) -> (usize, usize) {
        (self.positives, self.len() - self.positives)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record<T>> + '_ {
        self.indices.iter().map(move |&index| &self.store[index])
    }

    /// A dataset with at most one record, or whose records all share one
    /// feature vector, offers nothing to split on.
    pub fn is_branchable(&self) -> bool {
        let mut records = self.records();
        let Some(first) = records.next() else {
            return false;
        };
        records.any(|record| !record.same_features(first))
    }

    /// Majority label; an exact tie is broken uniformly at random.
    pub fn majority_label<R: Rng + ?Sized>(&self, rng: &mut R) -> Label {
        let (positive, negative) = self.class_counts();
        if positive > negative {
            Label::Positive
        } else if negative > positive {
            Label::Negative
        } else if rng.gen_bool(0.5) {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Splits into `(positive, negative)`: records whose value at `feature_index`
    /// exceeds `threshold`, and the rest.
    pub fn separate(&self, feature_index: usize, threshold: T) -> (Self, Self) {
        let (positive, negative): (Vec<usize>, Vec<usize>) = self
            .indices
            .iter()
            .partition(|&&index| self.store[index].value(feature_index) > threshold);

        (
            Self::from_indices(Arc::clone(&self.store), positive),
            Self::from_indices(Arc::clone(&self.store), negative),
        )
    }

    /// Shuffles the records and keeps the first `sample_size` (no replacement).
    pub fn sub_sample<R: Rng + ?Sized>(&self, sample_size: usize, rng: &mut R) -> Self {
        let mut indices = self.indices.clone();
        indices.shuffle(rng);
        indices.truncate(sample_size);
        Self::from_indices(Arc::clone(&self.store), indices)
    }

    /// Dense feature matrix, one row per record and one column per index `0..=max`.
    pub fn to_dense(&self) -> DMatrix<T> {
        let ncols = self.feature_range.map_or(0, |(_, max)| max + 1);
        DMatrix::from_fn(self.len(), ncols, |row, col| {
            self.store[self.indices[row]].value(col)
        })
    }

    pub fn labels(&self) -> DVector<Label> {
        DVector::from_iterator(self.len(), self.records().map(Record::label))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn record(label: Label, pairs: &[(usize, f64)]) -> Record<f64> {
        Record::from_pairs(label, pairs.iter().copied())
    }

    fn example() -> Dataset<f64> {
        Dataset::new(vec![
            record(Label::Positive, &[(1, 5.0), (2, 1.0)]),
            record(Label::Positive, &[(1, 4.0), (2, 1.0)]),
            record(Label::Negative, &[(1, 1.0), (2, 9.0)]),
            record(Label::Negative, &[(1, 2.0), (2, 8.0)]),
        ])
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(0, 0), None);
        assert_eq!(gini(3, 0), Some(0.0));
        assert_eq!(gini(0, 5), Some(0.0));
        assert_relative_eq!(gini(2, 2).unwrap(), 0.5);
        assert_relative_eq!(gini(1, 3).unwrap(), 0.375);
    }

    #[test]
    fn test_gini_bounds() {
        for positive in 0..12 {
            for negative in 0..12 {
                if let Some(impurity) = gini(positive, negative) {
                    assert!((0.0..=1.0).contains(&impurity));
                    let pure = positive == 0 || negative == 0;
                    assert_eq!(impurity == 0.0, pure);
                }
            }
        }
    }

    #[test]
    fn test_dataset_new() {
        let dataset = example();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.class_counts(), (2, 2));
        assert_relative_eq!(dataset.impurity().unwrap(), 0.5);
        assert_eq!(dataset.feature_range(), Some((1, 2)));
    }

    #[test]
    fn test_dataset_empty() {
        let dataset: Dataset<f64> = Dataset::new(vec![]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.impurity(), None);
        assert_eq!(dataset.feature_range(), None);
        assert!(!dataset.is_branchable());
    }

    #[test]
    fn test_dataset_separate() {
        let dataset = example();
        let (positive, negative) = dataset.separate(1, 3.0);
        assert_eq!(positive.len(), 2);
        assert_eq!(negative.len(), 2);
        assert_eq!(positive.class_counts(), (2, 0));
        assert_eq!(negative.class_counts(), (0, 2));
        assert_eq!(positive.impurity(), Some(0.0));
        // the parent is untouched
        assert_eq!(dataset.len(), 4);
    }

    #[test]
    fn test_dataset_separate_is_a_partition() {
        let dataset = example();
        for feature in 0..4 {
            for threshold in [-1.0, 0.0, 1.5, 4.5, 9.0] {
                let (positive, negative) = dataset.separate(feature, threshold);
                assert_eq!(positive.len() + negative.len(), dataset.len());
                assert!(positive.indices.iter().all(|i| !negative.indices.contains(i)));
            }
        }
    }

    #[test]
    fn test_dataset_separate_absent_feature_is_zero() {
        let dataset = Dataset::new(vec![
            record(Label::Positive, &[(3, 2.0)]),
            record(Label::Negative, &[(1, 1.0)]),
        ]);
        let (positive, negative) = dataset.separate(3, 1.0);
        assert_eq!(positive.class_counts(), (1, 0));
        assert_eq!(negative.class_counts(), (0, 1));
        assert_eq!(negative.feature_range(), Some((1, 1)));
    }

    #[test]
    fn test_dataset_is_branchable() {
        assert!(example().is_branchable());

        let single = Dataset::new(vec![record(Label::Positive, &[(1, 1.0)])]);
        assert!(!single.is_branchable());

        let identical = Dataset::new(vec![
            record(Label::Positive, &[(1, 1.0), (2, 0.0)]),
            record(Label::Negative, &[(1, 1.0)]),
            record(Label::Negative, &[(1, 1.0)]),
        ]);
        assert!(!identical.is_branchable());
    }

    #[test]
    fn test_dataset_majority_label() {
        let mut rng = StdRng::seed_from_u64(7);
        let dataset = Dataset::new(vec![
            record(Label::Positive, &[]),
            record(Label::Negative, &[]),
            record(Label::Negative, &[]),
        ]);
        assert_eq!(dataset.majority_label(&mut rng), Label::Negative);

        let tied = example();
        let labels: Vec<_> = (0..64).map(|_| tied.majority_label(&mut rng)).collect();
        assert!(labels.contains(&Label::Positive));
        assert!(labels.contains(&Label::Negative));
    }

    #[test]
    fn test_dataset_sub_sample() {
        let dataset = example();
        let mut rng = StdRng::seed_from_u64(1000);
        let sample = dataset.sub_sample(3, &mut rng);
        assert_eq!(sample.len(), 3);

        let mut seen: Vec<_> = sample.indices.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_dataset_sub_sample_with_seed() {
        let dataset = example();
        let a = dataset.sub_sample(2, &mut StdRng::seed_from_u64(5));
        let b = dataset.sub_sample(2, &mut StdRng::seed_from_u64(5));
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn test_dataset_to_dense() {
        let dataset = example();
        let dense = dataset.to_dense();
        assert_eq!(dense.shape(), (4, 3));
        assert_eq!(dense[(0, 0)], 0.0);
        assert_eq!(dense[(0, 1)], 5.0);
        assert_eq!(dense[(3, 2)], 8.0);
        assert_eq!(
            dataset.labels(),
            DVector::from_vec(vec![
                Label::Positive,
                Label::Positive,
                Label::Negative,
                Label::Negative
            ])
        );
    }

    #[test]
    fn test_dataset_formatting() {
        let dataset = Dataset::new(vec![
            record(Label::Positive, &[(1, 5.0)]),
            record(Label::Negative, &[(2, 1.5)]),
        ]);
        let expected_str = "\
Dataset {
    impurity: 0.500000,
    records: [
        1 [ 1(5) ],
        -1 [ 2(1.5) ],
    ]
}";
        assert_eq!(format!("{:?}", dataset), expected_str);
    }
}
