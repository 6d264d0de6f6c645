//! Matrix arithmetic
//!
//! Results are sparse when every matrix operand is sparse and dense
//! otherwise. Element-wise results keep the receiver's names; a product
//! takes its row names from the left operand and its column names from the
//! right one.

use tabula_core::{Result, Scalar, TabulaError};
use crate::helpers::check_same_dims;
use crate::storage::{SparseStorage, Storage};
use crate::types::Matrix;

/// Element-wise combination for operations where `op(0, 0) == 0`
fn zip_storage<T: Scalar, F: Fn(T, T) -> T>(a: &Storage<T>, b: &Storage<T>, op: F) -> Storage<T> {
    match (a, b) {
        (Storage::Sparse(sa), Storage::Sparse(sb)) => {
            let mut out = SparseStorage::new(a.rows(), a.cols());
            for (k, v) in sa.iter() {
                out.set(k, op(v, sb.get(k)));
            }
            for (k, v) in sb.iter() {
                if !sa.contains_key(k) {
                    out.set(k, op(T::zero(), v));
                }
            }
            Storage::Sparse(out)
        }
        (Storage::Dense(da), Storage::Dense(db)) => Storage::Dense(da.zip_map(db, op)),
        _ => Storage::Dense(a.to_dmatrix().zip_map(&b.to_dmatrix(), op)),
    }
}

impl<T: Scalar> Matrix<T> {
    fn with_names_of(&self, storage: Storage<T>) -> Matrix<T> {
        Matrix {
            storage,
            row_names: self.row_names.clone(),
            column_names: self.column_names.clone(),
        }
    }

    /// Element-wise sum
    pub fn mat_add(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        check_same_dims(self, other, "other")?;
        Ok(self.with_names_of(zip_storage(&self.storage, &other.storage, |x, y| x + y)))
    }

    /// Element-wise difference
    pub fn mat_sub(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        check_same_dims(self, other, "other")?;
        Ok(self.with_names_of(zip_storage(&self.storage, &other.storage, |x, y| x - y)))
    }

    /// Element-wise (Hadamard) product
    pub fn hadamard(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        check_same_dims(self, other, "other")?;
        let storage = match (&self.storage, &other.storage) {
            // only positions stored on both sides can be nonzero
            (Storage::Sparse(sa), Storage::Sparse(sb)) => {
                let mut out = SparseStorage::new(self.rows(), self.cols());
                for (k, v) in sa.iter() {
                    if sb.contains_key(k) {
                        out.set(k, v * sb.get(k));
                    }
                }
                Storage::Sparse(out)
            }
            (a, b) => zip_storage(a, b, |x, y| x * y),
        };
        Ok(self.with_names_of(storage))
    }

    /// Matrix product `self × other`
    pub fn matmul(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        if self.cols() != other.rows() {
            return Err(TabulaError::invalid_argument(
                "other",
                format!(
                    "Inner dimensions must agree: {}×{} × {}×{}",
                    self.rows(),
                    self.cols(),
                    other.rows(),
                    other.cols()
                ),
            ));
        }
        let (m, n, p) = (self.rows(), other.cols(), self.cols());
        let storage = match (&self.storage, &other.storage) {
            (Storage::Sparse(sa), Storage::Sparse(sb)) => {
                // entries of `other` grouped by row
                let mut by_row: Vec<Vec<(usize, T)>> = vec![Vec::new(); p];
                for (k, v) in sb.iter() {
                    by_row[k % p].push((k / p, v));
                }
                let mut out = SparseStorage::new(m, n);
                for (k, a) in sa.iter() {
                    let (i, q) = (k % m, k / m);
                    for &(j, b) in &by_row[q] {
                        let at = i + j * m;
                        out.set(at, out.get(at) + a * b);
                    }
                }
                Storage::Sparse(out)
            }
            _ => {
                let (da, db) = (self.to_dmatrix(), other.to_dmatrix());
                Storage::Dense(&da * &db)
            }
        };
        Ok(Matrix {
            storage,
            row_names: self.row_names.clone(),
            column_names: other.column_names.clone(),
        })
    }

    /// Every element multiplied by `factor`
    pub fn scale(&self, factor: T) -> Matrix<T> {
        self.apply(|v| v * factor)
    }

    /// Every element negated
    pub fn negate(&self) -> Matrix<T> {
        self.apply(|v| -v)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ComplexMatrix, DoubleMatrix, StorageScheme};
    use tabula_core::{Complex64, ErrorKind};

    fn a() -> DoubleMatrix {
        DoubleMatrix::from_nested_list(&[vec![1.0, 0.0, 2.0], vec![0.0, 3.0, 0.0]]).unwrap()
    }

    fn b() -> DoubleMatrix {
        DoubleMatrix::from_nested_list(&[vec![-1.0, 4.0, 0.0], vec![0.0, 5.0, 0.0]]).unwrap()
    }

    #[test]
    fn test_add_sub() {
        let sum = a().mat_add(&b()).unwrap();
        assert_eq!(sum.to_nested_list(), vec![vec![0.0, 4.0, 2.0], vec![0.0, 8.0, 0.0]]);
        let diff = a().mat_sub(&b()).unwrap();
        assert_eq!(diff.to_nested_list(), vec![vec![2.0, -4.0, 2.0], vec![0.0, -2.0, 0.0]]);
    }

    #[test]
    fn test_sparse_operands_give_sparse_result() {
        let (sa, sb) = (a().to_sparse(), b().to_sparse());
        let sum = sa.mat_add(&sb).unwrap();
        assert!(sum.is_sparse());
        // 1 + (-1) cancels out and is not stored
        assert_eq!(sum.stored_count(), 3);
        assert_eq!(sum, a().mat_add(&b()).unwrap());

        let mixed = sa.mat_add(&b()).unwrap();
        assert!(!mixed.is_sparse());
        assert_eq!(mixed, sum);
    }

    #[test]
    fn test_hadamard() {
        let expected = vec![vec![-1.0, 0.0, 0.0], vec![0.0, 15.0, 0.0]];
        for scheme in [StorageScheme::Dense, StorageScheme::Sparse] {
            let h = a().to_scheme(scheme).hadamard(&b().to_scheme(scheme)).unwrap();
            assert_eq!(h.to_nested_list(), expected);
            assert_eq!(h.scheme(), scheme);
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let err = a().mat_add(&a().transpose()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert!(err.message.contains("Dimension mismatch"));
        assert!(a().hadamard(&DoubleMatrix::dense(2, 2).unwrap()).is_err());
    }

    #[test]
    fn test_matmul() {
        // 2×3 × 3×2
        let bt = b().transpose();
        let expected = vec![vec![-1.0, 0.0], vec![12.0, 15.0]];
        assert_eq!(a().matmul(&bt).unwrap().to_nested_list(), expected);

        let sparse = a().to_sparse().matmul(&bt.to_sparse()).unwrap();
        assert!(sparse.is_sparse());
        assert_eq!(sparse.to_nested_list(), expected);

        let err = a().matmul(&b()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_matmul_mixed_schemes_is_dense() {
        let bt = b().transpose();
        let expected = a().matmul(&bt).unwrap();
        for p in [a().to_sparse().matmul(&bt).unwrap(), a().matmul(&bt.to_sparse()).unwrap()] {
            assert!(!p.is_sparse());
            assert_eq!(p.shape(), (2, 2));
            assert_eq!(p, expected);
        }
    }

    #[test]
    fn test_matmul_identity_and_names() {
        let mut m = a();
        m.set_row_name(0, "top").unwrap();
        let mut id = DoubleMatrix::identity(3, StorageScheme::Sparse).unwrap();
        id.set_column_name(2, "z").unwrap();
        let p = m.matmul(&id).unwrap();
        assert_eq!(p, a());
        assert_eq!(p.row_name(0), Some("top"));
        assert_eq!(p.column_name(2), Some("z"));
    }

    #[test]
    fn test_scale_negate() {
        let s = a().to_sparse().scale(2.0);
        assert!(s.is_sparse());
        assert_eq!(s.get_at(1, 1).unwrap(), 6.0);
        assert_eq!(a().negate().mat_add(&a()).unwrap(), DoubleMatrix::dense(2, 3).unwrap());
    }

    #[test]
    fn test_complex_product() {
        let i = Complex64::new(0.0, 1.0);
        let m = ComplexMatrix::from_nested_list(&[vec![i, Complex64::new(1.0, 0.0)]]).unwrap();
        let p = m.matmul(&m.conjugate_transpose()).unwrap();
        assert_eq!(p.shape(), (1, 1));
        assert_eq!(p.get(0).unwrap(), Complex64::new(2.0, 0.0));
    }
}
