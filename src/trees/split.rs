use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::trace;

use crate::data::{gini, Dataset, Label, RealNumber};

/// A scored `(feature, threshold)` cut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitCandidate<T: RealNumber> {
    /// Size-weighted impurity of the two sides.
    pub impurity: f64,
    pub threshold: T,
    pub feature: usize,
}

impl<T: RealNumber> SplitCandidate<T> {
    /// Ascending by impurity, then threshold, then feature index.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.impurity
            .total_cmp(&other.impurity)
            .then_with(|| {
                self.threshold
                    .partial_cmp(&other.threshold)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.feature.cmp(&other.feature))
    }
}

#[derive(Clone, Copy, Default)]
struct Tally {
    positive: usize,
    negative: usize,
}

impl Tally {
    fn add(&mut self, label: Label) {
        match label {
            Label::Positive => self.positive += 1,
            Label::Negative => self.negative += 1,
        }
    }

    fn size(&self) -> usize {
        self.positive + self.negative
    }

    /// This side's share of the weighted impurity. An empty side contributes nothing.
    fn weighted(&self) -> f64 {
        gini(self.positive, self.negative).map_or(0.0, |impurity| impurity * self.size() as f64)
    }
}

fn weighted_impurity(negative: Tally, positive: Tally) -> f64 {
    (negative.weighted() + positive.weighted()) / (negative.size() + positive.size()) as f64
}

/// A threshold `t` with `a <= t < b` for finite `a < b`, strictly inside
/// unless the two values are adjacent floats.
fn midpoint<T: RealNumber>(a: T, b: T) -> T {
    let two = T::one() + T::one();
    let gap = b - a;
    let mid = if gap.is_finite() {
        a + gap / two
    } else {
        a / two + b / two
    };
    if mid < b {
        mid
    } else {
        a
    }
}

/// Thresholds for an ascending list of distinct values: the midpoint of each
/// consecutive pair, or a lone `0` when the only value is `0`.
pub fn candidate_thresholds<T: RealNumber>(values: &[T]) -> Vec<T> {
    match values {
        [only] if only.is_zero() => vec![T::zero()],
        _ => values.windows(2).map(|pair| midpoint(pair[0], pair[1])).collect(),
    }
}

/// Scores every threshold of one feature in a single sorted sweep.
pub fn feature_candidates<T: RealNumber>(
    dataset: &Dataset<T>,
    feature: usize,
) -> Vec<SplitCandidate<T>> {
    let mut column: Vec<(T, Label)> = dataset
        .records()
        .map(|record| (record.value(feature), record.label()))
        .collect();
    column.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    // cumulative label tally through each distinct value
    let mut runs: Vec<(T, Tally)> = Vec::new();
    for (value, label) in column {
        if let Some((_, tally)) = runs.last_mut().filter(|(last, _)| *last == value) {
            tally.add(label);
            continue;
        }
        let mut tally = runs.last().map_or_else(Tally::default, |run| run.1);
        tally.add(label);
        runs.push((value, tally));
    }

    let (positives, negatives) = dataset.class_counts();
    let values: Vec<T> = runs.iter().map(|run| run.0).collect();
    // threshold k keeps runs[..=k] on the negative side
    let candidates: Vec<_> = candidate_thresholds(&values)
        .into_iter()
        .zip(&runs)
        .map(|(threshold, &(_, below))| {
            let above = Tally {
                positive: positives - below.positive,
                negative: negatives - below.negative,
            };
            SplitCandidate {
                impurity: weighted_impurity(below, above),
                threshold,
                feature,
            }
        })
        .collect();

    trace!(feature, candidates = candidates.len(), "scored feature");
    candidates
}

/// Every candidate across the observed feature range, best first.
pub fn ranked_candidates<T: RealNumber>(dataset: &Dataset<T>) -> Vec<SplitCandidate<T>> {
    let Some((min, max)) = dataset.feature_range() else {
        return Vec::new();
    };

    let mut candidates: Vec<_> = (min..=max)
        .into_par_iter()
        .flat_map_iter(|feature| feature_candidates(dataset, feature))
        .collect();
    candidates.sort_by(SplitCandidate::rank);
    candidates
}
