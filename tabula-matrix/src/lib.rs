//! Tabula Matrix - Dense and Sparse Matrices
//!
//! Provides a matrix type over real (`f64`) and complex (`Complex64`) scalars:
//! - Storage (dense column-major, or sparse map of nonzero entries)
//! - Construction (zeros, filled, slices, nested rows, triplets, identity, diagonal)
//! - Element access by linear index or (row, col), with row and column names
//! - Sub-matrix selection and assignment by index, collection, range or name
//! - Structural operations (transpose, conjugate, apply, vec)
//! - Pattern properties (symmetric, Hermitian, triangular, Hessenberg, bandwidths)
//! - Search (find, contains, index_of) and bulk copy
//! - Arithmetic (add, sub, hadamard, matmul, scale, negate)
//! - Read-only views rejecting every mutation
//!
//! Both storage schemes answer every query identically; sparse matrices are
//! processed through their stored entries wherever the result allows it.

mod types;
mod storage;
mod helpers;
mod index;
mod construct;
mod names;
mod access;
mod ops;
mod props;
mod search;
mod arith;
mod read_only;

pub use types::{ComplexMatrix, DoubleMatrix, Matrix};
pub use storage::StorageScheme;
pub use construct::StorageOrder;
pub use index::{IndexCollection, Selector};
pub use read_only::{MatrixAccess, ReadOnlyMatrix};
pub use tabula_core::{Complex64, ErrorKind, Result, Scalar, TabulaError};
