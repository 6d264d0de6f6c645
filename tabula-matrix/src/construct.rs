//! Matrix construction

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tabula_core::{Result, Scalar, TabulaError};
use crate::helpers::{check_dimension, check_indexes};
use crate::storage::{SparseStorage, Storage, StorageScheme};
use crate::types::Matrix;

/// Order in which a flat slice lists matrix elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageOrder {
    #[default]
    ColumnMajor,
    RowMajor,
}

impl<T: Scalar> Matrix<T> {
    /// All-zero matrix with the requested storage scheme
    pub fn zeros(rows: usize, cols: usize, scheme: StorageScheme) -> Result<Self> {
        check_dimension(rows, "rows")?;
        check_dimension(cols, "cols")?;
        Ok(Self::from_storage(Storage::zeros(rows, cols, scheme)))
    }

    /// All-zero dense matrix
    pub fn dense(rows: usize, cols: usize) -> Result<Self> {
        Self::zeros(rows, cols, StorageScheme::Dense)
    }

    /// Empty sparse matrix (every element zero)
    pub fn sparse(rows: usize, cols: usize) -> Result<Self> {
        Self::zeros(rows, cols, StorageScheme::Sparse)
    }

    /// Dense matrix with every element equal to `value`
    pub fn dense_filled(rows: usize, cols: usize, value: T) -> Result<Self> {
        check_dimension(rows, "rows")?;
        check_dimension(cols, "cols")?;
        Ok(Self::from_storage(Storage::Dense(DMatrix::from_element(rows, cols, value))))
    }

    /// Dense matrix from a flat slice listed in `order`
    pub fn from_slice(rows: usize, cols: usize, data: &[T], order: StorageOrder) -> Result<Self> {
        check_dimension(rows, "rows")?;
        check_dimension(cols, "cols")?;
        if data.len() != rows * cols {
            return Err(TabulaError::invalid_argument(
                "data",
                format!("{}×{} matrix needs {} values, got {}", rows, cols, rows * cols, data.len()),
            ));
        }
        let d = match order {
            StorageOrder::ColumnMajor => DMatrix::from_column_slice(rows, cols, data),
            StorageOrder::RowMajor => DMatrix::from_row_slice(rows, cols, data),
        };
        Ok(Self::from_storage(Storage::Dense(d)))
    }

    /// Dense matrix from nested rows
    pub fn from_nested_list(data: &[Vec<T>]) -> Result<Self> {
        if data.is_empty() {
            return Err(TabulaError::argument_null("data"));
        }

        let rows = data.len();
        let cols = data[0].len();
        check_dimension(cols, "cols")?;

        // Validate all rows have same length
        for (i, row) in data.iter().enumerate() {
            if row.len() != cols {
                return Err(TabulaError::invalid_argument(
                    "data",
                    format!("row {} has {} columns, expected {}", i, row.len(), cols),
                ));
            }
        }

        let d = DMatrix::from_fn(rows, cols, |i, j| data[i][j]);
        Ok(Self::from_storage(Storage::Dense(d)))
    }

    /// Dense matrix wrapping an nalgebra matrix
    pub fn from_dmatrix(data: DMatrix<T>) -> Result<Self> {
        check_dimension(data.nrows(), "rows")?;
        check_dimension(data.ncols(), "cols")?;
        Ok(Self::from_storage(Storage::Dense(data)))
    }

    /// Sparse matrix from `(row, col, value)` triplets
    ///
    /// A later triplet for the same cell overwrites an earlier one; zero
    /// values are not stored.
    pub fn sparse_from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, T)]) -> Result<Self> {
        check_dimension(rows, "rows")?;
        check_dimension(cols, "cols")?;
        let row_idx: Vec<usize> = triplets.iter().map(|t| t.0).collect();
        let col_idx: Vec<usize> = triplets.iter().map(|t| t.1).collect();
        check_indexes(&row_idx, rows, "triplets")?;
        check_indexes(&col_idx, cols, "triplets")?;

        let mut s = SparseStorage::new(rows, cols);
        for &(i, j, v) in triplets {
            s.set(i + j * rows, v);
        }
        Ok(Self::from_storage(Storage::Sparse(s)))
    }

    /// n×n identity
    pub fn identity(n: usize, scheme: StorageScheme) -> Result<Self> {
        let mut m = Self::zeros(n, n, scheme)?;
        for i in 0..n {
            m.storage.set_at(i, i, T::one());
        }
        Ok(m)
    }

    /// Square matrix with `values` on the main diagonal
    pub fn diagonal(values: &[T], scheme: StorageScheme) -> Result<Self> {
        if values.is_empty() {
            return Err(TabulaError::argument_null("values"));
        }
        let mut m = Self::zeros(values.len(), values.len(), scheme)?;
        for (i, &v) in values.iter().enumerate() {
            m.storage.set_at(i, i, v);
        }
        Ok(m)
    }

    /// Dense n×1 matrix
    pub fn column_vector(values: &[T]) -> Result<Self> {
        if values.is_empty() {
            return Err(TabulaError::argument_null("values"));
        }
        Self::from_slice(values.len(), 1, values, StorageOrder::ColumnMajor)
    }

    /// Dense 1×n matrix
    pub fn row_vector(values: &[T]) -> Result<Self> {
        if values.is_empty() {
            return Err(TabulaError::argument_null("values"));
        }
        Self::from_slice(1, values.len(), values, StorageOrder::ColumnMajor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DoubleMatrix;
    use tabula_core::ErrorKind;

    #[test]
    fn test_zero_dimension_rejected() {
        let err = DoubleMatrix::dense(0, 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArgumentOutOfRange);
        assert_eq!(err.param.as_deref(), Some("rows"));
        assert_eq!(DoubleMatrix::sparse(2, 0).unwrap_err().param.as_deref(), Some("cols"));
    }

    #[test]
    fn test_from_slice_orders() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let cm = DoubleMatrix::from_slice(2, 3, &data, StorageOrder::ColumnMajor).unwrap();
        let rm = DoubleMatrix::from_slice(2, 3, &data, StorageOrder::RowMajor).unwrap();
        assert_eq!(cm.get_at(1, 0).unwrap(), 2.0);
        assert_eq!(rm.get_at(1, 0).unwrap(), 4.0);
        assert!(DoubleMatrix::from_slice(2, 2, &data, StorageOrder::RowMajor).is_err());
    }

    #[test]
    fn test_from_nested_list_ragged() {
        let err = DoubleMatrix::from_nested_list(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(
            DoubleMatrix::from_nested_list(&[]).unwrap_err().kind,
            ErrorKind::ArgumentNull
        );
    }

    #[test]
    fn test_sparse_from_triplets() {
        let m = DoubleMatrix::sparse_from_triplets(3, 3, &[(0, 1, 2.0), (2, 2, 0.0), (0, 1, 5.0)]).unwrap();
        assert!(m.is_sparse());
        assert_eq!(m.stored_count(), 1);
        assert_eq!(m.get_at(0, 1).unwrap(), 5.0);

        let err = DoubleMatrix::sparse_from_triplets(2, 2, &[(2, 0, 1.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArgumentOutOfRange);
    }

    #[test]
    fn test_identity_and_diagonal() {
        let dense = DoubleMatrix::identity(3, StorageScheme::Dense).unwrap();
        let sparse = DoubleMatrix::identity(3, StorageScheme::Sparse).unwrap();
        assert_eq!(dense, sparse);
        assert_eq!(sparse.stored_count(), 3);

        let d = DoubleMatrix::diagonal(&[1.0, 2.0], StorageScheme::Dense).unwrap();
        assert_eq!(d.to_nested_list(), vec![vec![1.0, 0.0], vec![0.0, 2.0]]);
    }

    #[test]
    fn test_vectors() {
        let c = DoubleMatrix::column_vector(&[1.0, 2.0, 3.0]).unwrap();
        let r = DoubleMatrix::row_vector(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(c.shape(), (3, 1));
        assert_eq!(r.shape(), (1, 3));
    }
}
