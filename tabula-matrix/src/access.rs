//! Sub-matrix selection and assignment
//!
//! Rows and columns are picked with a [`Selector`]: a single position, an
//! index collection, a range, a name, a list of names, or everything.
//! Selectors are resolved and validated in full before any element is read
//! or written, so a failed call never leaves a partial write behind.
//!
//! Reads return owned matrices. Assigning a selection of a matrix back onto
//! itself (`m.set_submatrix(r, c, &m.submatrix(r, c)?)`) therefore never
//! aliases the destination.

use std::collections::HashMap;
use nalgebra::DMatrix;
use tabula_core::{Result, Scalar, TabulaError};
use crate::helpers::check_indexes;
use crate::index::{IndexCollection, Selector};
use crate::names::select_names;
use crate::storage::{SparseStorage, Storage};
use crate::types::Matrix;

#[derive(Clone, Copy)]
enum Axis {
    Row,
    Column,
}

impl Axis {
    fn params(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Axis::Row => ("row_index", "row_indexes", "row_name", "row_names"),
            Axis::Column => ("column_index", "column_indexes", "column_name", "column_names"),
        }
    }
}

impl<T: Scalar> Matrix<T> {
    fn resolve(&self, selector: &Selector, axis: Axis) -> Result<Vec<usize>> {
        let bound = match axis {
            Axis::Row => self.rows(),
            Axis::Column => self.cols(),
        };
        let (index_param, indexes_param, name_param, names_param) = axis.params();

        let resolved = match selector {
            Selector::All => (0..bound).collect(),
            Selector::Index(i) => {
                check_indexes(&[*i], bound, index_param)?;
                vec![*i]
            }
            Selector::Indexes(c) => {
                check_indexes(c.as_slice(), bound, indexes_param)?;
                c.as_slice().to_vec()
            }
            Selector::Range(r) => {
                if r.is_empty() {
                    return Err(TabulaError::argument_null(indexes_param));
                }
                if r.end > bound {
                    return Err(TabulaError::index_out_of_range(indexes_param, r.end - 1, bound));
                }
                r.clone().collect()
            }
            Selector::Name(name) => {
                let found = match axis {
                    Axis::Row => self.row_index_of(name),
                    Axis::Column => self.column_index_of(name),
                };
                vec![found.map_err(|e| e.for_param(name_param))?]
            }
            Selector::Names(names) => {
                if names.is_empty() {
                    return Err(TabulaError::argument_null(names_param));
                }
                names
                    .iter()
                    .map(|name| {
                        let found = match axis {
                            Axis::Row => self.row_index_of(name),
                            Axis::Column => self.column_index_of(name),
                        };
                        found.map_err(|e| e.for_param(names_param))
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };
        Ok(resolved)
    }

    /// Materialize the selected rows and columns
    ///
    /// A single row with several columns yields a 1×n matrix, several rows
    /// with a single column an m×1 matrix. The result has the storage scheme
    /// of the source and carries over the names of the selected positions.
    /// Sparse sources are read by walking their stored entries.
    pub fn submatrix(&self, rows: impl Into<Selector>, cols: impl Into<Selector>) -> Result<Matrix<T>> {
        self.submatrix_with(rows, cols, true)
    }

    /// Like [`Matrix::submatrix`], choosing how sparse sources are read
    ///
    /// With `avoid_dense_allocations` a sparse source is read by walking its
    /// stored entries only, which costs O(nnz) regardless of the selection
    /// size. Otherwise each addressed cell is probed. Both produce the same
    /// sparse result; dense sources ignore the flag.
    pub fn submatrix_with(
        &self,
        rows: impl Into<Selector>,
        cols: impl Into<Selector>,
        avoid_dense_allocations: bool,
    ) -> Result<Matrix<T>> {
        let ri = self.resolve(&rows.into(), Axis::Row)?;
        let ci = self.resolve(&cols.into(), Axis::Column)?;

        let storage = match &self.storage {
            Storage::Dense(d) => Storage::Dense(DMatrix::from_fn(ri.len(), ci.len(), |i, j| d[(ri[i], ci[j])])),
            Storage::Sparse(s) if avoid_dense_allocations => {
                Storage::Sparse(extract_by_entries(s, self.rows(), &ri, &ci))
            }
            Storage::Sparse(_) => {
                let mut out = SparseStorage::new(ri.len(), ci.len());
                for (j, &c) in ci.iter().enumerate() {
                    for (i, &r) in ri.iter().enumerate() {
                        out.set(i + j * ri.len(), self.storage.get_at(r, c));
                    }
                }
                Storage::Sparse(out)
            }
        };

        Ok(Matrix {
            storage,
            row_names: select_names(&self.row_names, &ri),
            column_names: select_names(&self.column_names, &ci),
        })
    }

    /// Assign `value` to the selected rows and columns
    ///
    /// `value` must have exactly the shape of the addressed region. When a
    /// position is selected more than once the last assignment wins.
    pub fn set_submatrix(
        &mut self,
        rows: impl Into<Selector>,
        cols: impl Into<Selector>,
        value: &Matrix<T>,
    ) -> Result<()> {
        let ri = self.resolve(&rows.into(), Axis::Row)?;
        let ci = self.resolve(&cols.into(), Axis::Column)?;
        if value.shape() != (ri.len(), ci.len()) {
            return Err(TabulaError::dimension_mismatch("value", (ri.len(), ci.len()), value.shape()));
        }

        for (j, &c) in ci.iter().enumerate() {
            for (i, &r) in ri.iter().enumerate() {
                self.storage.set_at(r, c, value.storage.get_at(i, j));
            }
        }
        Ok(())
    }

    /// Assign `value` to every selected element
    pub fn fill_submatrix(&mut self, rows: impl Into<Selector>, cols: impl Into<Selector>, value: T) -> Result<()> {
        let ri = self.resolve(&rows.into(), Axis::Row)?;
        let ci = self.resolve(&cols.into(), Axis::Column)?;
        for &c in &ci {
            for &r in &ri {
                self.storage.set_at(r, c, value);
            }
        }
        Ok(())
    }

    /// Assign the elements of a vector to linear positions, in order
    ///
    /// `value` must be a count×1 or 1×count matrix.
    pub fn set_linear(&mut self, linear_indexes: &IndexCollection, value: &Matrix<T>) -> Result<()> {
        check_indexes(linear_indexes.as_slice(), self.len(), "linear_indexes")?;
        let n = linear_indexes.len();
        if value.shape() != (n, 1) && value.shape() != (1, n) {
            return Err(TabulaError::dimension_mismatch("value", (n, 1), value.shape()));
        }
        for (k, idx) in linear_indexes.iter().enumerate() {
            self.storage.set(idx, value.storage.get(k));
        }
        Ok(())
    }
}

/// Sparse extraction walking stored entries only
fn extract_by_entries<T: Scalar>(
    source: &SparseStorage<T>,
    source_rows: usize,
    ri: &[usize],
    ci: &[usize],
) -> SparseStorage<T> {
    // A source position may be selected several times
    let mut row_targets: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, &r) in ri.iter().enumerate() {
        row_targets.entry(r).or_default().push(i);
    }
    let mut col_targets: HashMap<usize, Vec<usize>> = HashMap::new();
    for (j, &c) in ci.iter().enumerate() {
        col_targets.entry(c).or_default().push(j);
    }

    let mut out = SparseStorage::new(ri.len(), ci.len());
    for (k, v) in source.iter() {
        let (r, c) = (k % source_rows, k / source_rows);
        if let (Some(is), Some(js)) = (row_targets.get(&r), col_targets.get(&c)) {
            for &j in js {
                for &i in is {
                    out.set(i + j * ri.len(), v);
                }
            }
        }
    }
    out
}
