use nalgebra::{DMatrix, DVector};

use crate::data::Label;
use crate::error::{ForestError, Result};

type ConfusionMatrix = DMatrix<usize>;

fn class_index(label: Label) -> usize {
    match label {
        Label::Negative => 0,
        Label::Positive => 1,
    }
}

pub trait ClassificationMetrics {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// Rows are the true class, columns the predicted class, both ordered `[-1, +1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::LengthMismatch`] if the vectors differ in length.
    fn confusion_matrix(
        &self,
        y_true: &DVector<Label>,
        y_pred: &DVector<Label>,
    ) -> Result<ConfusionMatrix> {
        if y_true.len() != y_pred.len() {
            return Err(ForestError::LengthMismatch {
                predictions: y_pred.len(),
                labels: y_true.len(),
            });
        }

        let mut matrix: ConfusionMatrix = DMatrix::zeros(2, 2);
        for (&y_t, &y_p) in y_true.iter().zip(y_pred.iter()) {
            matrix[(class_index(y_t), class_index(y_p))] += 1;
        }

        Ok(matrix)
    }

    /// Fraction of predictions that match the true label; 0 for empty vectors.
    fn accuracy(&self, y_true: &DVector<Label>, y_pred: &DVector<Label>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        let correct: usize = matrix.diagonal().iter().sum();

        if y_true.is_empty() {
            return Ok(0.0);
        }
        Ok(correct as f64 / y_true.len() as f64)
    }

    /// Precision of the `+1` class; 0 when nothing is predicted positive.
    fn precision(&self, y_true: &DVector<Label>, y_pred: &DVector<Label>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        let tp = matrix[(1, 1)];
        let fp = matrix[(0, 1)];

        if tp + fp == 0 {
            return Ok(0.0);
        }
        Ok(tp as f64 / (tp + fp) as f64)
    }

    /// Recall of the `+1` class; 0 when there are no positive labels.
    fn recall(&self, y_true: &DVector<Label>, y_pred: &DVector<Label>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        let tp = matrix[(1, 1)];
        let fn_ = matrix[(1, 0)];

        if tp + fn_ == 0 {
            return Ok(0.0);
        }
        Ok(tp as f64 / (tp + fn_) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Label::{Negative as N, Positive as P};

    struct MockClassifier;

    impl ClassificationMetrics for MockClassifier {}

    #[test]
    fn test_confusion_matrix() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![P, N, P, N, P]);
        let y_pred = DVector::from_vec(vec![P, P, N, N, P]);

        let result = classifier.confusion_matrix(&y_true, &y_pred).unwrap();

        let expected = DMatrix::from_vec(2, 2, vec![1, 1, 1, 2]);

        assert_eq!(result, expected);
    }

    #[test]
    fn test_confusion_matrix_unequal() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![P, N, P, N, P, N]);
        let y_pred = DVector::from_vec(vec![P, P, N, N, P]);

        let result = classifier.confusion_matrix(&y_true, &y_pred);

        assert!(matches!(
            result,
            Err(ForestError::LengthMismatch {
                predictions: 5,
                labels: 6
            })
        ));
    }

    #[test]
    fn test_accuracy() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![P, N, P, N, P]);
        let y_pred = DVector::from_vec(vec![P, P, N, N, P]);

        assert_eq!(classifier.accuracy(&y_true, &y_pred).unwrap(), 0.6);
        assert_eq!(classifier.accuracy(&y_true, &y_true).unwrap(), 1.0);
    }

    #[test]
    fn test_accuracy_empty() {
        let classifier = MockClassifier;

        let empty: DVector<Label> = DVector::from_vec(vec![]);

        assert_eq!(classifier.accuracy(&empty, &empty).unwrap(), 0.0);
    }

    #[test]
    fn test_precision_and_recall() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![P, N, P, N, P]);
        let y_pred = DVector::from_vec(vec![P, P, N, N, P]);

        assert_eq!(classifier.precision(&y_true, &y_pred).unwrap(), 2.0 / 3.0);
        assert_eq!(classifier.recall(&y_true, &y_pred).unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn test_no_positive_predictions() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![P, P, P]);
        let y_pred = DVector::from_vec(vec![N, N, N]);

        assert_eq!(classifier.precision(&y_true, &y_pred).unwrap(), 0.0);
        assert_eq!(classifier.recall(&y_true, &y_pred).unwrap(), 0.0);
    }
}
