//! Decision Tree Classifier
use super::{node::Node, params::TreeParams, split::ranked_candidates};
use crate::{
    codegen::PredicateEmitter,
    data::{Attributes, Dataset, Label, RealNumber},
    error::{ForestError, Result},
    metrics::confusion::ClassificationMetrics,
};
use nalgebra::{DMatrix, DVector};
use rand::Rng;
use tracing::{debug, info, trace};

/// Outcome of growing one subtree.
enum Growth<T: RealNumber> {
    Built(Node<T>),
    /// No candidate split yields two buildable sides.
    Infeasible,
}

/// Decision Tree Classifier
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<T: RealNumber> {
    root: Option<Node<T>>,
    dataset: Option<Dataset<T>>,
    tree_params: TreeParams,
}

impl<T: RealNumber> Default for DecisionTreeClassifier<T> {
    /// Creates a new instance of the decision tree classifier with default parameters.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealNumber> ClassificationMetrics for DecisionTreeClassifier<T> {}

impl<T: RealNumber> DecisionTreeClassifier<T> {
    /// Creates a new instance of the decision tree classifier with `epsilon = 0`.
    pub fn new() -> Self {
        Self {
            root: None,
            dataset: None,
            tree_params: TreeParams::new(),
        }
    }

    /// Creates a new instance of the decision tree classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Impurity at or below which a subset becomes a leaf. Defaults to 0.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidEpsilon`] if `epsilon` is outside `[0, 1]`.
    pub fn with_params(epsilon: Option<f64>) -> Result<Self> {
        let mut tree = Self::new();
        tree.set_epsilon(epsilon.unwrap_or(0.0))?;
        Ok(tree)
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        self.tree_params.set_epsilon(epsilon)
    }

    pub fn epsilon(&self) -> f64 {
        self.tree_params.epsilon()
    }

    /// The induced tree, once [`fit`](Self::fit) has succeeded.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_ref()
    }

    /// The training data the tree was built from.
    pub fn dataset(&self) -> Option<&Dataset<T>> {
        self.dataset.as_ref()
    }

    /// Builds the decision tree from a dataset.
    ///
    /// `rng` breaks majority ties at the leaves.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::NoSolution`] when no sequence of splits separates
    /// the data under the current epsilon. The previous tree, if any, is kept.
    pub fn fit<R: Rng + ?Sized>(&mut self, dataset: &Dataset<T>, rng: &mut R) -> Result<()> {
        let root = match self.build(dataset, rng) {
            Growth::Built(root) => root,
            Growth::Infeasible => {
                return Err(ForestError::NoSolution {
                    epsilon: self.epsilon(),
                })
            }
        };

        info!(
            records = dataset.len(),
            depth = root.depth(),
            leaves = root.leaf_count(),
            "finished building the tree"
        );
        self.root = Some(root);
        self.dataset = Some(dataset.clone());
        Ok(())
    }

    /// Predicts the label of one attribute vector.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::NotFitted`] if the tree wasn't built yet.
    pub fn predict_one<A: Attributes<T> + ?Sized>(&self, attributes: &A) -> Result<Label> {
        let root = self.root.as_ref().ok_or(ForestError::NotFitted)?;
        Ok(root.predict(attributes))
    }

    /// Predicts one label per row of a dense feature matrix.
    ///
    /// Column `i` holds feature index `i`; indices past the last column read as 0.
    pub fn predict(&self, features: &DMatrix<T>) -> Result<DVector<Label>> {
        let root = self.root.as_ref().ok_or(ForestError::NotFitted)?;
        let predictions: Vec<_> = features
            .row_iter()
            .map(|row| root.predict(&row.transpose()))
            .collect();
        Ok(DVector::from_vec(predictions))
    }

    /// Predicts every record of `dataset`, in dataset order.
    ///
    /// Reads the sparse records directly, so no dense matrix is built.
    pub fn predict_dataset(&self, dataset: &Dataset<T>) -> Result<DVector<Label>> {
        let root = self.root.as_ref().ok_or(ForestError::NotFitted)?;
        Ok(DVector::from_iterator(
            dataset.len(),
            dataset.records().map(|record| root.predict(record)),
        ))
    }

    /// Renders the tree as a C `tree_predict` function.
    pub fn generate_source(&self) -> Result<String> {
        let root = self.root.as_ref().ok_or(ForestError::NotFitted)?;
        let mut emitter = PredicateEmitter::new(String::new());
        emitter.tree_function("tree_predict", root)?;
        Ok(emitter.finish())
    }

    fn build<R: Rng + ?Sized>(&self, dataset: &Dataset<T>, rng: &mut R) -> Growth<T> {
        let Some(impurity) = dataset.impurity() else {
            return Growth::Infeasible;
        };
        if impurity <= self.epsilon() || !dataset.is_branchable() {
            return Growth::Built(Node::leaf(dataset.majority_label(rng)));
        }

        for candidate in ranked_candidates(dataset) {
            let (positive, negative) = dataset.separate(candidate.feature, candidate.threshold);
            if positive.impurity().is_none() || negative.impurity().is_none() {
                trace!(
                    feature = candidate.feature,
                    threshold = %candidate.threshold,
                    "skipping degenerate split"
                );
                continue;
            }

            let Growth::Built(positive_node) = self.build(&positive, rng) else {
                trace!(feature = candidate.feature, "positive side infeasible");
                continue;
            };
            let Growth::Built(negative_node) = self.build(&negative, rng) else {
                trace!(feature = candidate.feature, "negative side infeasible");
                continue;
            };

            debug!(
                feature = candidate.feature,
                threshold = %candidate.threshold,
                impurity,
                split_impurity = candidate.impurity,
                records = dataset.len(),
                "split"
            );
            return Growth::Built(Node::internal(
                candidate.feature,
                candidate.threshold,
                positive_node,
                negative_node,
            ));
        }

        Growth::Infeasible
    }
}
