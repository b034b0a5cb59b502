/// Errors from dataset parsing, tree/forest induction and code emission.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    /// Returned when a record carries the unset label 0.
    #[error("line {line}: label 0 is the unset sentinel, expected a signed nonzero integer")]
    UnsetLabel {
        /// One-based line number of the offending record.
        line: usize,
    },

    /// Returned when the first token of a record is not an integer.
    #[error("line {line}: malformed label {token:?}")]
    MalformedLabel {
        /// One-based line number of the offending record.
        line: usize,
        /// The token that failed to parse.
        token: String,
    },

    /// Returned when an `index:value` token cannot be parsed.
    #[error("line {line}: malformed feature token {token:?}")]
    MalformedFeature {
        /// One-based line number of the offending record.
        line: usize,
        /// The token that failed to parse.
        token: String,
    },

    /// Returned when epsilon is outside `[0, 1]`.
    #[error("epsilon must be in [0, 1], got {epsilon}")]
    InvalidEpsilon {
        /// The invalid epsilon value provided.
        epsilon: f64,
    },

    /// Returned when a forest is configured with zero trees.
    #[error("tree count must be at least 1, got {num_trees}")]
    InvalidTreeCount {
        /// The invalid tree count provided.
        num_trees: usize,
    },

    /// Returned when a forest member's sub-sample would be empty.
    #[error("dataset of {records} records yields an empty sub-sample")]
    SampleTooSmall {
        /// Number of records in the base dataset.
        records: usize,
    },

    /// Returned when no split separates the data under the chosen epsilon.
    #[error("no solution: the data cannot be separated with epsilon {epsilon}")]
    NoSolution {
        /// The epsilon the construction ran with.
        epsilon: f64,
    },

    /// Returned when a model is used before `fit`.
    #[error("model wasn't built yet")]
    NotFitted,

    /// Returned when truth and prediction vectors differ in length.
    #[error("predictions and labels are of different sizes: {predictions} vs {labels}")]
    LengthMismatch {
        /// Number of predictions.
        predictions: usize,
        /// Number of labels.
        labels: usize,
    },

    /// Returned when the input cannot be opened or tokenized.
    #[error("failed to read input")]
    Csv(#[from] csv::Error),

    /// Returned when writing generated source fails.
    #[error("failed to format generated source")]
    Fmt(#[from] std::fmt::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ForestError>;
