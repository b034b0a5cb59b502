use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::params::ForestParams;
use crate::{
    codegen::PredicateEmitter,
    data::{Attributes, Dataset, Label, RealNumber},
    error::{ForestError, Result},
    metrics::confusion::ClassificationMetrics,
    trees::classifier::DecisionTreeClassifier,
};

/// Vote of `num_trees` epsilon-0 trees, each grown on its own third of the data.
#[derive(Clone, Debug)]
pub struct RandomForestClassifier<T: RealNumber> {
    trees: Vec<DecisionTreeClassifier<T>>,
    dataset: Option<Dataset<T>>,
    forest_params: ForestParams,
}

impl<T: RealNumber> Default for RandomForestClassifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealNumber> ClassificationMetrics for RandomForestClassifier<T> {}

impl<T: RealNumber> RandomForestClassifier<T> {
    pub fn new() -> Self {
        Self {
            trees: Vec::new(),
            dataset: None,
            forest_params: ForestParams::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `num_trees` is 0.
    pub fn with_params(num_trees: Option<usize>) -> Result<Self> {
        let mut forest = Self::new();
        forest.set_num_trees(num_trees.unwrap_or(1))?;
        Ok(forest)
    }

    pub fn set_num_trees(&mut self, num_trees: usize) -> Result<()> {
        self.forest_params.set_num_trees(num_trees)
    }

    pub fn num_trees(&self) -> usize {
        self.forest_params.num_trees()
    }

    pub fn trees(&self) -> &[DecisionTreeClassifier<T>] {
        &self.trees
    }

    /// The base dataset the members were sampled from.
    pub fn dataset(&self) -> Option<&Dataset<T>> {
        self.dataset.as_ref()
    }

    /// Grows every member tree.
    ///
    /// A master generator seeded with `seed` (or from entropy) hands each member
    /// its own seed, so members can be grown in parallel and a given seed always
    /// reproduces the same forest.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::SampleTooSmall`] if a third of the dataset is empty,
    /// or the first member's [`ForestError::NoSolution`].
    pub fn fit(&mut self, dataset: &Dataset<T>, seed: Option<u64>) -> Result<()> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sample_size = self.forest_params.sample_size(dataset.len())?;

        let seeds = (0..self.num_trees())
            .map(|_| rng.gen::<u64>())
            .collect::<Vec<_>>();

        let trees: Result<Vec<_>> = seeds
            .into_par_iter()
            .enumerate()
            .map(|(member, tree_seed)| -> Result<DecisionTreeClassifier<T>> {
                let mut tree_rng = StdRng::seed_from_u64(tree_seed);
                let subset = dataset.sub_sample(sample_size, &mut tree_rng);
                let mut tree = DecisionTreeClassifier::new();
                tree.fit(&subset, &mut tree_rng)?;
                debug!(tree = member + 1, records = subset.len(), "grew member");
                Ok(tree)
            })
            .collect();
        self.trees = trees?;
        self.dataset = Some(dataset.clone());

        info!(
            trees = self.trees.len(),
            sample_size,
            records = dataset.len(),
            "finished building the forest"
        );
        Ok(())
    }

    /// Signed sum of the member votes, in `[-num_trees, num_trees]`.
    pub fn votes<A: Attributes<T> + ?Sized>(&self, attributes: &A) -> Result<i64> {
        if self.trees.is_empty() {
            return Err(ForestError::NotFitted);
        }
        self.trees
            .iter()
            .map(|tree| tree.predict_one(attributes).map(Label::sign))
            .sum()
    }

    /// Sign of the vote sum; an exact tie is broken uniformly at random.
    pub fn predict_one<A: Attributes<T> + ?Sized, R: Rng + ?Sized>(
        &self,
        attributes: &A,
        rng: &mut R,
    ) -> Result<Label> {
        let votes = self.votes(attributes)?;
        Ok(match votes.signum() {
            1 => Label::Positive,
            -1 => Label::Negative,
            _ if rng.gen_bool(0.5) => Label::Positive,
            _ => Label::Negative,
        })
    }

    /// Predicts one label per row of a dense feature matrix.
    pub fn predict<R: Rng + ?Sized>(
        &self,
        features: &DMatrix<T>,
        rng: &mut R,
    ) -> Result<DVector<Label>> {
        let predictions = features
            .row_iter()
            .map(|row| self.predict_one(&row.transpose(), rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(DVector::from_vec(predictions))
    }

    /// Predicts every record of `dataset`, in dataset order, without densifying it.
    pub fn predict_dataset<R: Rng + ?Sized>(
        &self,
        dataset: &Dataset<T>,
        rng: &mut R,
    ) -> Result<DVector<Label>> {
        if self.trees.is_empty() {
            return Err(ForestError::NotFitted);
        }
        let predictions = dataset
            .records()
            .map(|record| self.predict_one(record, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(DVector::from_vec(predictions))
    }

    /// Renders `tree1_predict` … `treeN_predict` followed by `forest_predict`.
    pub fn generate_source(&self) -> Result<String> {
        if self.trees.is_empty() {
            return Err(ForestError::NotFitted);
        }

        let mut emitter = PredicateEmitter::new(String::new());
        emitter.forest_preamble()?;

        let mut names = Vec::with_capacity(self.trees.len());
        for (member, tree) in self.trees.iter().enumerate() {
            let name = format!("tree{}_predict", member + 1);
            let root = tree.root().ok_or(ForestError::NotFitted)?;
            emitter.tree_function(&name, root)?;
            names.push(name);
        }
        emitter.forest_function("forest_predict", &names)?;
        Ok(emitter.finish())
    }
}
