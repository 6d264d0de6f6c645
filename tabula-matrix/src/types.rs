//! Core matrix type

use std::collections::BTreeMap;
use std::fmt;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tabula_core::{Complex64, Result, Scalar, TabulaError};
use crate::helpers::check_dimension;
use crate::storage::{SparseStorage, Storage, StorageScheme};

/// An R×C grid of scalars, stored densely or sparsely
///
/// Elements are addressed by `(row, col)` or by the column-major linear
/// index `row + col * rows`. Cloning performs a deep copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "MatrixRepr<T>", try_from = "MatrixRepr<T>", bound = "")]
pub struct Matrix<T: Scalar> {
    pub(crate) storage: Storage<T>,
    pub(crate) row_names: BTreeMap<usize, String>,
    pub(crate) column_names: BTreeMap<usize, String>,
}

/// Matrix of real numbers
pub type DoubleMatrix = Matrix<f64>;

/// Matrix of complex numbers
pub type ComplexMatrix = Matrix<Complex64>;

impl<T: Scalar> Matrix<T> {
    pub(crate) fn from_storage(storage: Storage<T>) -> Self {
        Self {
            storage,
            row_names: BTreeMap::new(),
            column_names: BTreeMap::new(),
        }
    }

    /// Get number of rows
    pub fn rows(&self) -> usize {
        self.storage.rows()
    }

    /// Get number of columns
    pub fn cols(&self) -> usize {
        self.storage.cols()
    }

    /// Total number of elements (rows × cols)
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    pub fn scheme(&self) -> StorageScheme {
        self.storage.scheme()
    }

    pub fn is_sparse(&self) -> bool {
        self.scheme() == StorageScheme::Sparse
    }

    /// Number of explicitly stored values (nonzeros for sparse matrices)
    pub fn stored_count(&self) -> usize {
        self.storage.stored_count()
    }

    /// Always false for an owned matrix
    pub fn is_read_only(&self) -> bool {
        false
    }

    /// Get element at a linear (column-major) index
    pub fn get(&self, linear_index: usize) -> Result<T> {
        self.check_linear(linear_index, "linear_index")?;
        Ok(self.storage.get(linear_index))
    }

    /// Get element at (row, col)
    pub fn get_at(&self, row: usize, col: usize) -> Result<T> {
        self.check_row(row, "row_index")?;
        self.check_col(col, "column_index")?;
        Ok(self.storage.get_at(row, col))
    }

    /// Set element at a linear (column-major) index
    pub fn set(&mut self, linear_index: usize, value: T) -> Result<()> {
        self.check_linear(linear_index, "linear_index")?;
        self.storage.set(linear_index, value);
        Ok(())
    }

    /// Set element at (row, col)
    pub fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_row(row, "row_index")?;
        self.check_col(col, "column_index")?;
        self.storage.set_at(row, col, value);
        Ok(())
    }

    /// Elements in column-major order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |k| self.storage.get(k))
    }

    /// Elements in column-major order, as an owned vector
    pub fn to_vec(&self) -> Vec<T> {
        match &self.storage {
            Storage::Dense(d) => d.as_slice().to_vec(),
            Storage::Sparse(_) => self.iter().collect(),
        }
    }

    /// Convert to nested rows
    pub fn to_nested_list(&self) -> Vec<Vec<T>> {
        (0..self.rows())
            .map(|i| (0..self.cols()).map(|j| self.storage.get_at(i, j)).collect())
            .collect()
    }

    /// Copy of the values as an nalgebra matrix
    pub fn to_dmatrix(&self) -> DMatrix<T> {
        self.storage.to_dmatrix()
    }

    /// Dense copy (names kept)
    pub fn to_dense(&self) -> Matrix<T> {
        Matrix {
            storage: Storage::Dense(self.storage.to_dmatrix()),
            row_names: self.row_names.clone(),
            column_names: self.column_names.clone(),
        }
    }

    /// Sparse copy (names kept)
    pub fn to_sparse(&self) -> Matrix<T> {
        Matrix {
            storage: Storage::Sparse(self.storage.to_sparse()),
            row_names: self.row_names.clone(),
            column_names: self.column_names.clone(),
        }
    }

    /// Copy with the requested storage scheme
    pub fn to_scheme(&self, scheme: StorageScheme) -> Matrix<T> {
        match scheme {
            StorageScheme::Dense => self.to_dense(),
            StorageScheme::Sparse => self.to_sparse(),
        }
    }
}

/// Value equality: same shape and elements, whatever the storage scheme
impl<T: Scalar> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        match (&self.storage, &other.storage) {
            (Storage::Dense(a), Storage::Dense(b)) => a == b,
            (Storage::Sparse(a), Storage::Sparse(b)) => a == b,
            _ => (0..self.len()).all(|k| self.storage.get(k) == other.storage.get(k)),
        }
    }
}

impl<T: Scalar> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.rows() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for j in 0..self.cols() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.storage.get_at(i, j))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// Serialized form
// ============================================================================

#[derive(Serialize, Deserialize)]
struct MatrixRepr<T> {
    rows: usize,
    cols: usize,
    scheme: StorageScheme,
    /// Column-major values (dense)
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    values: Vec<T>,
    /// (linear index, value) pairs (sparse)
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    entries: Vec<(usize, T)>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    row_names: BTreeMap<usize, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    column_names: BTreeMap<usize, String>,
}

impl<T: Scalar> From<Matrix<T>> for MatrixRepr<T> {
    fn from(m: Matrix<T>) -> Self {
        let (values, entries) = match &m.storage {
            Storage::Dense(d) => (d.as_slice().to_vec(), Vec::new()),
            Storage::Sparse(s) => (Vec::new(), s.iter().collect()),
        };
        MatrixRepr {
            rows: m.rows(),
            cols: m.cols(),
            scheme: m.scheme(),
            values,
            entries,
            row_names: m.row_names,
            column_names: m.column_names,
        }
    }
}

impl<T: Scalar> TryFrom<MatrixRepr<T>> for Matrix<T> {
    type Error = TabulaError;

    fn try_from(repr: MatrixRepr<T>) -> Result<Self> {
        check_dimension(repr.rows, "rows")?;
        check_dimension(repr.cols, "cols")?;
        let len = repr.rows.checked_mul(repr.cols).ok_or_else(|| {
            TabulaError::invalid_data(format!("matrix {}×{} is too large", repr.rows, repr.cols))
        })?;
        let storage = match repr.scheme {
            StorageScheme::Dense => {
                if repr.values.len() != len {
                    return Err(TabulaError::invalid_data(format!(
                        "dense matrix {}×{} needs {} values, got {}",
                        repr.rows,
                        repr.cols,
                        len,
                        repr.values.len()
                    )));
                }
                Storage::Dense(DMatrix::from_vec(repr.rows, repr.cols, repr.values))
            }
            StorageScheme::Sparse => {
                let mut s = SparseStorage::new(repr.rows, repr.cols);
                for (k, v) in repr.entries {
                    if k >= len {
                        return Err(TabulaError::invalid_data(format!(
                            "sparse entry index {} outside {}×{} matrix",
                            k, repr.rows, repr.cols
                        )));
                    }
                    s.set(k, v);
                }
                Storage::Sparse(s)
            }
        };
        if repr.row_names.keys().any(|&i| i >= repr.rows)
            || repr.column_names.keys().any(|&j| j >= repr.cols)
        {
            return Err(TabulaError::invalid_data("name attached to a missing row or column"));
        }
        Ok(Matrix {
            storage,
            row_names: repr.row_names,
            column_names: repr.column_names,
        })
    }
}
