//! # sparse-forest
//!
//! `sparse-forest` induces binary (`±1`) classifiers from sparse labeled
//! feature vectors by recursively splitting on the cut with the lowest Gini
//! impurity. It builds either a single decision tree or a forest of trees grown
//! on random thirds of the data, and renders the result as C predicate
//! functions over a dense `double *attr` array.
//!
//! ## Example Usage
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use sparse_forest::data::read_sparse;
//! use sparse_forest::trees::classifier::DecisionTreeClassifier;
//!
//! let input = "+1 1:5 2:1\n+1 1:4 2:1\n-1 1:1 2:9\n-1 1:2 2:8\n";
//! let dataset = read_sparse::<f64, _>(input.as_bytes()).unwrap();
//!
//! let mut tree = DecisionTreeClassifier::with_params(Some(0.0)).unwrap();
//! tree.fit(&dataset, &mut StdRng::seed_from_u64(42)).unwrap();
//!
//! let source = tree.generate_source().unwrap();
//! assert!(source.contains("if (attr[1] > 3) {"));
//! ```

/// Rendering trees and forests as C source
pub mod codegen;
/// Sparse records, datasets and the input reader
pub mod data;
/// Crate error type
pub mod error;
/// Forests of decision trees
pub mod forests;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;

pub use error::{ForestError, Result};
