//! Validation helpers shared by the matrix modules

use tabula_core::{Result, Scalar, TabulaError};
use crate::types::Matrix;

impl<T: Scalar> Matrix<T> {
    pub(crate) fn check_linear(&self, index: usize, param: &str) -> Result<()> {
        if index >= self.len() {
            return Err(TabulaError::index_out_of_range(param, index, self.len()));
        }
        Ok(())
    }

    pub(crate) fn check_row(&self, row: usize, param: &str) -> Result<()> {
        if row >= self.rows() {
            return Err(TabulaError::index_out_of_range(param, row, self.rows()));
        }
        Ok(())
    }

    pub(crate) fn check_col(&self, col: usize, param: &str) -> Result<()> {
        if col >= self.cols() {
            return Err(TabulaError::index_out_of_range(param, col, self.cols()));
        }
        Ok(())
    }
}

/// Dimensions passed to a factory must be positive
pub(crate) fn check_dimension(value: usize, param: &str) -> Result<()> {
    if value == 0 {
        return Err(TabulaError::out_of_range(param, format!("{} must be positive", param)));
    }
    Ok(())
}

/// Every position in `indexes` must be below `bound`
pub(crate) fn check_indexes(indexes: &[usize], bound: usize, param: &str) -> Result<()> {
    match indexes.iter().find(|&&i| i >= bound) {
        Some(&i) => Err(TabulaError::index_out_of_range(param, i, bound)),
        None => Ok(()),
    }
}

/// Check that two matrices have the same dimensions
pub(crate) fn check_same_dims<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>, param: &str) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(TabulaError::dimension_mismatch(param, a.shape(), b.shape()));
    }
    Ok(())
}
