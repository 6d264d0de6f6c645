//! Tabula Stats - Analyses built on Tabula matrices
//!
//! Provides:
//! - Categorical encoding of delimited text (labels coded by first appearance)
//! - Entropy minimization discretization of numerical columns
//! - Classical multidimensional scaling of dissimilarities
//!
//! Tabular sources are read with the `csv` crate. Malformed input fails with
//! `InvalidData` errors carrying the offending line and column.

mod error;
mod format;
mod source;
mod categorical;
mod discretize;
mod mds;

pub use error::SourceError;
pub use format::NumberFormat;
pub use categorical::{CategoricalDataSet, CategoricalVariable, Categorizer, EncodeOptions};
pub use discretize::{DiscretizeOptions, Discretization, EntropyMinimization};
pub use mds::{ClassicalMds, MdsResult};
