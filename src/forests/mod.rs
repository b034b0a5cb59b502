/// Forest of sub-sampled decision trees
pub mod classifier;
/// Forest hyperparameters
pub mod params;
