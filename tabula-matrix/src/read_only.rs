//! Read-only matrix view
//!
//! [`ReadOnlyMatrix`] borrows a matrix and forwards every read to it through
//! `Deref`. Mutating methods exist on the view so that callers holding a
//! `ReadOnlyMatrix` (or a `dyn MatrixAccess`) get a `NotSupported` error
//! instead of a silent write. The wrapped matrix is never modified.

use std::fmt;
use std::ops::Deref;
use tabula_core::{Result, Scalar, TabulaError};
use crate::index::{IndexCollection, Selector};
use crate::types::Matrix;

/// Uniform element access over owned matrices and read-only views
pub trait MatrixAccess<T: Scalar> {
    fn shape(&self) -> (usize, usize);

    fn is_read_only(&self) -> bool;

    fn get(&self, linear_index: usize) -> Result<T>;

    fn get_at(&self, row: usize, col: usize) -> Result<T>;

    fn submatrix(&self, rows: Selector, cols: Selector) -> Result<Matrix<T>>;

    fn set(&mut self, linear_index: usize, value: T) -> Result<()>;

    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<()>;

    fn set_submatrix(&mut self, rows: Selector, cols: Selector, value: &Matrix<T>) -> Result<()>;

    fn fill_submatrix(&mut self, rows: Selector, cols: Selector, value: T) -> Result<()>;

    fn in_place_apply(&mut self, f: &dyn Fn(T) -> T) -> Result<()>;
}

impl<T: Scalar> MatrixAccess<T> for Matrix<T> {
    fn shape(&self) -> (usize, usize) {
        Matrix::shape(self)
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn get(&self, linear_index: usize) -> Result<T> {
        Matrix::get(self, linear_index)
    }

    fn get_at(&self, row: usize, col: usize) -> Result<T> {
        Matrix::get_at(self, row, col)
    }

    fn submatrix(&self, rows: Selector, cols: Selector) -> Result<Matrix<T>> {
        Matrix::submatrix(self, rows, cols)
    }

    fn set(&mut self, linear_index: usize, value: T) -> Result<()> {
        Matrix::set(self, linear_index, value)
    }

    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        Matrix::set_at(self, row, col, value)
    }

    fn set_submatrix(&mut self, rows: Selector, cols: Selector, value: &Matrix<T>) -> Result<()> {
        Matrix::set_submatrix(self, rows, cols, value)
    }

    fn fill_submatrix(&mut self, rows: Selector, cols: Selector, value: T) -> Result<()> {
        Matrix::fill_submatrix(self, rows, cols, value)
    }

    fn in_place_apply(&mut self, f: &dyn Fn(T) -> T) -> Result<()> {
        Matrix::in_place_apply(self, f);
        Ok(())
    }
}

/// Borrowed view of a matrix that rejects every mutation
#[derive(Clone, Copy)]
pub struct ReadOnlyMatrix<'a, T: Scalar> {
    inner: &'a Matrix<T>,
}

impl<T: Scalar> Matrix<T> {
    pub fn as_read_only(&self) -> ReadOnlyMatrix<'_, T> {
        ReadOnlyMatrix::new(self)
    }
}

impl<'a, T: Scalar> ReadOnlyMatrix<'a, T> {
    pub fn new(inner: &'a Matrix<T>) -> Self {
        Self { inner }
    }

    /// The wrapped matrix
    pub fn inner(&self) -> &'a Matrix<T> {
        self.inner
    }

    /// Deep, writable copy of the wrapped matrix
    pub fn to_matrix(&self) -> Matrix<T> {
        self.inner.clone()
    }

    pub fn is_read_only(&self) -> bool {
        true
    }

    pub fn submatrix(&self, rows: impl Into<Selector>, cols: impl Into<Selector>) -> Result<Matrix<T>> {
        self.inner.submatrix(rows, cols)
    }

    pub fn submatrix_with(
        &self,
        rows: impl Into<Selector>,
        cols: impl Into<Selector>,
        avoid_dense_allocations: bool,
    ) -> Result<Matrix<T>> {
        self.inner.submatrix_with(rows, cols, avoid_dense_allocations)
    }

    pub fn set(&mut self, _linear_index: usize, _value: T) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn set_at(&mut self, _row: usize, _col: usize, _value: T) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn set_submatrix(
        &mut self,
        _rows: impl Into<Selector>,
        _cols: impl Into<Selector>,
        _value: &Matrix<T>,
    ) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn fill_submatrix(&mut self, _rows: impl Into<Selector>, _cols: impl Into<Selector>, _value: T) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn set_linear(&mut self, _linear_indexes: &IndexCollection, _value: &Matrix<T>) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn in_place_apply<F: Fn(T) -> T>(&mut self, _f: F) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn in_place_transpose(&mut self) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn in_place_conjugate(&mut self) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn in_place_conjugate_transpose(&mut self) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn set_row_name(&mut self, _row: usize, _name: impl Into<String>) -> Result<()> {
        Err(TabulaError::read_only())
    }

    pub fn set_column_name(&mut self, _col: usize, _name: impl Into<String>) -> Result<()> {
        Err(TabulaError::read_only())
    }
}

impl<T: Scalar> Deref for ReadOnlyMatrix<'_, T> {
    type Target = Matrix<T>;

    fn deref(&self) -> &Matrix<T> {
        self.inner
    }
}

impl<T: Scalar> fmt::Debug for ReadOnlyMatrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyMatrix").field("inner", self.inner).finish()
    }
}

impl<T: Scalar> fmt::Display for ReadOnlyMatrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner, f)
    }
}

impl<T: Scalar> MatrixAccess<T> for ReadOnlyMatrix<'_, T> {
    fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn get(&self, linear_index: usize) -> Result<T> {
        self.inner.get(linear_index)
    }

    fn get_at(&self, row: usize, col: usize) -> Result<T> {
        self.inner.get_at(row, col)
    }

    fn submatrix(&self, rows: Selector, cols: Selector) -> Result<Matrix<T>> {
        self.inner.submatrix(rows, cols)
    }

    fn set(&mut self, _linear_index: usize, _value: T) -> Result<()> {
        Err(TabulaError::read_only())
    }

    fn set_at(&mut self, _row: usize, _col: usize, _value: T) -> Result<()> {
        Err(TabulaError::read_only())
    }

    fn set_submatrix(&mut self, _rows: Selector, _cols: Selector, _value: &Matrix<T>) -> Result<()> {
        Err(TabulaError::read_only())
    }

    fn fill_submatrix(&mut self, _rows: Selector, _cols: Selector, _value: T) -> Result<()> {
        Err(TabulaError::read_only())
    }

    fn in_place_apply(&mut self, _f: &dyn Fn(T) -> T) -> Result<()> {
        Err(TabulaError::read_only())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DoubleMatrix, StorageScheme};
    use tabula_core::ErrorKind;

    fn sample() -> DoubleMatrix {
        let mut m = DoubleMatrix::from_nested_list(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        m.set_row_name(0, "first").unwrap();
        m
    }

    #[test]
    fn test_reads_are_forwarded() {
        let m = sample();
        let view = m.as_read_only();
        assert!(view.is_read_only());
        assert!(!m.is_read_only());
        assert_eq!(view.get_at(1, 0).unwrap(), 3.0);
        assert_eq!(view.get(3).unwrap(), 4.0);
        assert_eq!(view.shape(), (2, 2));
        assert_eq!(view.row_name(0), Some("first"));
        assert_eq!(view.submatrix("first", ..).unwrap().to_vec(), vec![1.0, 2.0]);
        assert!(!view.is_symmetric());
        assert_eq!(view.transpose().get_at(0, 1).unwrap(), 3.0);
        assert_eq!(view.to_string(), m.to_string());
    }

    #[test]
    fn test_mutations_rejected_without_side_effects() {
        let m = sample();
        let mut view = m.as_read_only();
        let value = DoubleMatrix::dense_filled(1, 2, 9.0).unwrap();
        let indexes = IndexCollection::from_slice(&[0]).unwrap();

        let errors = vec![
            view.set(0, 9.0).unwrap_err(),
            view.set_at(0, 0, 9.0).unwrap_err(),
            view.set_submatrix(0usize, .., &value).unwrap_err(),
            view.fill_submatrix(.., .., 9.0).unwrap_err(),
            view.set_linear(&indexes, &value.submatrix(.., 0usize).unwrap()).unwrap_err(),
            view.in_place_apply(|v| v * 2.0).unwrap_err(),
            view.in_place_transpose().unwrap_err(),
            view.in_place_conjugate().unwrap_err(),
            view.in_place_conjugate_transpose().unwrap_err(),
            view.set_row_name(1, "x").unwrap_err(),
            view.set_column_name(1, "x").unwrap_err(),
        ];
        for err in errors {
            assert_eq!(err.kind, ErrorKind::NotSupported);
        }
        assert_eq!(m, sample());
        assert_eq!(m.row_name(1), None);
    }

    fn try_write(target: &mut dyn MatrixAccess<f64>) -> bool {
        let ok = target.set_at(0, 1, -1.0).is_ok();
        assert_eq!(target.is_read_only(), !ok);
        ok
    }

    #[test]
    fn test_trait_objects() {
        let mut owned = sample().to_scheme(StorageScheme::Sparse);
        let snapshot = owned.clone();
        let mut view = snapshot.as_read_only();
        assert!(try_write(&mut owned));
        assert!(!try_write(&mut view));
        assert_eq!(owned.get_at(0, 1).unwrap(), -1.0);
        assert_eq!(snapshot.get_at(0, 1).unwrap(), 2.0);
    }

    #[test]
    fn test_trait_apply() {
        let mut m = sample();
        MatrixAccess::in_place_apply(&mut m, &|v: f64| v + 1.0).unwrap();
        assert_eq!(m.get_at(1, 1).unwrap(), 5.0);

        let snapshot = m.clone();
        let mut view = snapshot.as_read_only();
        let err = MatrixAccess::in_place_apply(&mut view, &|v: f64| v + 1.0).unwrap_err();
        assert!(err.is(ErrorKind::NotSupported));
        assert_eq!(snapshot, m);
    }

    #[test]
    fn test_to_matrix_is_writable_copy() {
        let m = sample();
        let mut copy = m.as_read_only().to_matrix();
        copy.set(0, 0.0).unwrap();
        assert_eq!(m.get(0).unwrap(), 1.0);
    }
}
