/// Labeled sparse datasets and impurity
pub mod dataset;
/// Reading the sparse `label index:value` text format
pub mod reader;
/// Labels, records and the numeric feature trait
pub mod record;

pub use dataset::{gini, Dataset};
pub use reader::{read_sparse, read_sparse_file};
pub use record::{Attributes, Label, RealNumber, Record};
