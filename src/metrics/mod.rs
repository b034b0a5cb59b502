/// Confusion matrix, accuracy, precision and recall for `±1` labels
pub mod confusion;
