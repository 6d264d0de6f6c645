//! Tabula Core - Fundamental types
//!
//! This crate provides the core types used throughout Tabula:
//! - `Scalar`: element types a matrix can hold (`f64`, `Complex64`)
//! - `TabulaError`: structured errors with a kind, parameter and context

mod error;
mod scalar;

pub use error::{ErrorContext, ErrorKind, Result, TabulaError};
pub use num_complex::Complex64;
pub use scalar::Scalar;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Complex64, ErrorKind, Result, Scalar, TabulaError};
}
