//! Structural operations: transpose, conjugate, apply, vectorize

use nalgebra::DMatrix;
use tabula_core::{Result, Scalar};
use crate::helpers::check_indexes;
use crate::index::IndexCollection;
use crate::storage::{SparseStorage, Storage};
use crate::types::Matrix;

// ============================================================================
// Storage-level kernels
// ============================================================================

fn transposed<T: Scalar>(storage: &Storage<T>, conjugate: bool) -> Storage<T> {
    let fix = |v: T| if conjugate { v.conj() } else { v };
    match storage {
        Storage::Dense(d) => {
            let t = d.transpose();
            if conjugate { Storage::Dense(t.map(|v| v.conj())) } else { Storage::Dense(t) }
        }
        Storage::Sparse(s) => {
            let (rows, cols) = (storage.rows(), storage.cols());
            // (r, c) -> (c, r) in a cols×rows matrix
            Storage::Sparse(s.rekey(cols, rows, |k, v| ((k / rows) + (k % rows) * cols, fix(v))))
        }
    }
}

fn mapped<T: Scalar, F: Fn(T) -> T>(storage: &Storage<T>, f: F) -> Storage<T> {
    match storage {
        Storage::Dense(d) => Storage::Dense(d.map(f)),
        Storage::Sparse(s) => {
            if f(T::zero()).is_zero_value() {
                Storage::Sparse(s.rekey(storage.rows(), storage.cols(), |k, v| (k, f(v))))
            } else {
                tracing::debug!(
                    rows = storage.rows(),
                    cols = storage.cols(),
                    "function does not preserve zero, applying densely"
                );
                Storage::Dense(storage.to_dmatrix().map(f))
            }
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Transposed copy; row and column names are swapped
    pub fn transpose(&self) -> Matrix<T> {
        Matrix {
            storage: transposed(&self.storage, false),
            row_names: self.column_names.clone(),
            column_names: self.row_names.clone(),
        }
    }

    pub fn in_place_transpose(&mut self) {
        self.storage = transposed(&self.storage, false);
        std::mem::swap(&mut self.row_names, &mut self.column_names);
    }

    /// Element-wise complex conjugate (a copy for real matrices)
    pub fn conjugate(&self) -> Matrix<T> {
        let mut m = self.clone();
        m.in_place_conjugate();
        m
    }

    pub fn in_place_conjugate(&mut self) {
        let (rows, cols) = self.shape();
        match &mut self.storage {
            Storage::Dense(d) => d.apply(|v| *v = v.conj()),
            Storage::Sparse(s) => *s = s.rekey(rows, cols, |k, v| (k, v.conj())),
        }
    }

    pub fn conjugate_transpose(&self) -> Matrix<T> {
        Matrix {
            storage: transposed(&self.storage, true),
            row_names: self.column_names.clone(),
            column_names: self.row_names.clone(),
        }
    }

    pub fn in_place_conjugate_transpose(&mut self) {
        self.storage = transposed(&self.storage, true);
        std::mem::swap(&mut self.row_names, &mut self.column_names);
    }

    /// Map `f` over every element into a new matrix
    ///
    /// Dense sources give dense results. Sparse sources stay sparse when
    /// `f(0) == 0` and become dense otherwise.
    pub fn apply<F: Fn(T) -> T>(&self, f: F) -> Matrix<T> {
        Matrix {
            storage: mapped(&self.storage, f),
            row_names: self.row_names.clone(),
            column_names: self.column_names.clone(),
        }
    }

    /// Map `f` over every element in place, keeping the storage scheme
    pub fn in_place_apply<F: Fn(T) -> T>(&mut self, f: F) {
        let (rows, cols) = self.shape();
        match &mut self.storage {
            Storage::Dense(d) => d.apply(|v| *v = f(*v)),
            Storage::Sparse(s) => {
                if f(T::zero()).is_zero_value() {
                    *s = s.rekey(rows, cols, |k, v| (k, f(v)));
                } else {
                    let mut out = SparseStorage::new(rows, cols);
                    for k in 0..rows * cols {
                        out.set(k, f(s.get(k)));
                    }
                    *s = out;
                }
            }
        }
    }

    /// All elements as a column vector, in column-major order
    pub fn vec(&self) -> Matrix<T> {
        let n = self.len();
        let storage = match &self.storage {
            Storage::Dense(d) => Storage::Dense(DMatrix::from_column_slice(n, 1, d.as_slice())),
            Storage::Sparse(s) => Storage::Sparse(s.rekey(n, 1, |k, v| (k, v))),
        };
        Matrix::from_storage(storage)
    }

    /// Elements at the given linear positions as a column vector, in the
    /// order of the collection
    pub fn vec_indexes(&self, linear_indexes: &IndexCollection) -> Result<Matrix<T>> {
        check_indexes(linear_indexes.as_slice(), self.len(), "linear_indexes")?;
        let n = linear_indexes.len();
        let storage = match &self.storage {
            Storage::Dense(d) => {
                Storage::Dense(DMatrix::from_iterator(n, 1, linear_indexes.iter().map(|k| d[k])))
            }
            Storage::Sparse(s) => {
                let mut out = SparseStorage::new(n, 1);
                for (i, k) in linear_indexes.iter().enumerate() {
                    out.set(i, s.get(k));
                }
                Storage::Sparse(out)
            }
        };
        Ok(Matrix::from_storage(storage))
    }

    /// Row `row` as a 1×cols matrix
    pub fn row(&self, row: usize) -> Result<Matrix<T>> {
        self.check_row(row, "row_index")?;
        self.submatrix(row, ..)
    }

    /// Column `col` as a rows×1 matrix
    pub fn column(&self, col: usize) -> Result<Matrix<T>> {
        self.check_col(col, "column_index")?;
        self.submatrix(.., col)
    }

    /// Main diagonal as a column vector
    pub fn diagonal_vector(&self) -> Matrix<T> {
        let n = self.rows().min(self.cols());
        let mut storage = Storage::zeros(n, 1, self.scheme());
        for i in 0..n {
            storage.set(i, self.storage.get_at(i, i));
        }
        Matrix::from_storage(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComplexMatrix, DoubleMatrix, StorageScheme};
    use tabula_core::{Complex64, ErrorKind};

    const SCHEMES: [StorageScheme; 2] = [StorageScheme::Dense, StorageScheme::Sparse];

    fn rect(scheme: StorageScheme) -> DoubleMatrix {
        // [[1, 0, 2], [0, 3, 0]]
        DoubleMatrix::from_nested_list(&[vec![1.0, 0.0, 2.0], vec![0.0, 3.0, 0.0]])
            .unwrap()
            .to_scheme(scheme)
    }

    #[test]
    fn test_transpose() {
        for scheme in SCHEMES {
            let m = rect(scheme);
            let t = m.transpose();
            assert_eq!(t.shape(), (3, 2));
            assert_eq!(t.scheme(), scheme);
            assert_eq!(t.to_nested_list(), vec![vec![1.0, 0.0], vec![0.0, 3.0], vec![2.0, 0.0]]);
        }
    }

    #[test]
    fn test_transpose_involution() {
        for scheme in SCHEMES {
            let m = rect(scheme);
            assert_eq!(m.transpose().transpose(), m);

            let mut n = m.clone();
            n.in_place_transpose();
            assert_eq!(n, m.transpose());
            n.in_place_transpose();
            assert_eq!(n, m);
        }
    }

    #[test]
    fn test_transpose_swaps_names() {
        let mut m = rect(StorageScheme::Sparse);
        m.set_row_name(1, "r1").unwrap();
        m.set_column_name(2, "c2").unwrap();
        let t = m.transpose();
        assert_eq!(t.row_name(2), Some("c2"));
        assert_eq!(t.column_name(1), Some("r1"));
    }

    #[test]
    fn test_conjugate_transpose() {
        for scheme in SCHEMES {
            let m = ComplexMatrix::from_nested_list(&[
                vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, 0.0)],
                vec![Complex64::new(2.0, -3.0), Complex64::new(0.0, 4.0)],
            ])
            .unwrap()
            .to_scheme(scheme);

            let h = m.conjugate_transpose();
            assert_eq!(h.get_at(0, 1).unwrap(), Complex64::new(2.0, 3.0));
            assert_eq!(h.get_at(0, 0).unwrap(), Complex64::new(1.0, -1.0));
            assert_eq!(h, m.transpose().conjugate());

            let mut n = m.clone();
            n.in_place_conjugate_transpose();
            assert_eq!(n, h);
            n.in_place_conjugate();
            assert_eq!(n, m.transpose());
        }
    }

    #[test]
    fn test_apply_scheme_selection() {
        let sparse = rect(StorageScheme::Sparse);
        let doubled = sparse.apply(|v| 2.0 * v);
        assert!(doubled.is_sparse());
        assert_eq!(doubled.get_at(1, 1).unwrap(), 6.0);

        let shifted = sparse.apply(|v| v + 1.0);
        assert!(!shifted.is_sparse());
        assert_eq!(shifted.get_at(0, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_in_place_apply() {
        for scheme in SCHEMES {
            let mut m = rect(scheme);
            m.in_place_apply(|v| v - 1.0);
            assert_eq!(m.scheme(), scheme);
            assert_eq!(m.to_nested_list(), vec![vec![0.0, -1.0, 1.0], vec![-1.0, 2.0, -1.0]]);
        }
        let mut sparse = rect(StorageScheme::Sparse);
        sparse.in_place_apply(|v| v - 1.0);
        assert_eq!(sparse.stored_count(), 5);
    }

    #[test]
    fn test_vec() {
        for scheme in SCHEMES {
            let m = rect(scheme);
            let v = m.vec();
            assert_eq!(v.shape(), (6, 1));
            assert_eq!(v.to_vec(), vec![1.0, 0.0, 0.0, 3.0, 2.0, 0.0]);

            let positions = IndexCollection::from_slice(&[4, 0, 4, 5]).unwrap();
            let picked = m.vec_indexes(&positions).unwrap();
            assert_eq!(picked.shape(), (4, 1));
            assert_eq!(picked.to_vec(), vec![2.0, 1.0, 2.0, 0.0]);
            assert_eq!(picked.scheme(), scheme);

            let err = m.vec_indexes(&IndexCollection::from_slice(&[6]).unwrap()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::ArgumentOutOfRange);
        }
    }

    #[test]
    fn test_row_column_diagonal() {
        let m = rect(StorageScheme::Dense);
        assert_eq!(m.row(1).unwrap().to_vec(), vec![0.0, 3.0, 0.0]);
        assert_eq!(m.column(2).unwrap().to_vec(), vec![2.0, 0.0]);
        assert_eq!(m.diagonal_vector().to_vec(), vec![1.0, 3.0]);
        assert_eq!(m.row(2).unwrap_err().param.as_deref(), Some("row_index"));
    }
}
