/// Recursive tree construction
pub mod classifier;
/// Tree nodes
pub mod node;
/// Tree hyperparameters
pub mod params;
/// Candidate-split search
pub mod split;
