//! Matrix pattern properties
//!
//! Every property is computed on demand from the current contents. Sparse
//! matrices are inspected through their stored entries only, dense ones
//! through their nonzero elements, so both schemes agree on every answer.

use tabula_core::Scalar;
use crate::types::Matrix;

impl<T: Scalar> Matrix<T> {
    // ========== Shape ==========

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// 1×n or n×1
    pub fn is_vector(&self) -> bool {
        self.rows() == 1 || self.cols() == 1
    }

    pub fn is_row_vector(&self) -> bool {
        self.rows() == 1
    }

    pub fn is_column_vector(&self) -> bool {
        self.cols() == 1
    }

    /// 1×1
    pub fn is_scalar(&self) -> bool {
        self.rows() == 1 && self.cols() == 1
    }

    // ========== Bandwidth ==========

    /// Largest `i - j` over nonzero entries strictly below the diagonal, or 0
    pub fn lower_bandwidth(&self) -> usize {
        let rows = self.rows();
        let mut band = 0;
        self.storage.all_nonzero(|k, _| {
            let (i, j) = (k % rows, k / rows);
            if i > j {
                band = band.max(i - j);
            }
            true
        });
        band
    }

    /// Largest `j - i` over nonzero entries strictly above the diagonal, or 0
    pub fn upper_bandwidth(&self) -> usize {
        let rows = self.rows();
        let mut band = 0;
        self.storage.all_nonzero(|k, _| {
            let (i, j) = (k % rows, k / rows);
            if j > i {
                band = band.max(j - i);
            }
            true
        });
        band
    }

    // ========== Band patterns ==========

    pub fn is_lower_triangular(&self) -> bool {
        self.upper_bandwidth() == 0
    }

    pub fn is_upper_triangular(&self) -> bool {
        self.lower_bandwidth() == 0
    }

    pub fn is_triangular(&self) -> bool {
        self.is_lower_triangular() || self.is_upper_triangular()
    }

    pub fn is_diagonal(&self) -> bool {
        self.lower_bandwidth() == 0 && self.upper_bandwidth() == 0
    }

    pub fn is_lower_bidiagonal(&self) -> bool {
        self.upper_bandwidth() == 0 && self.lower_bandwidth() <= 1
    }

    pub fn is_upper_bidiagonal(&self) -> bool {
        self.lower_bandwidth() == 0 && self.upper_bandwidth() <= 1
    }

    pub fn is_bidiagonal(&self) -> bool {
        self.is_lower_bidiagonal() || self.is_upper_bidiagonal()
    }

    pub fn is_tridiagonal(&self) -> bool {
        self.lower_bandwidth() <= 1 && self.upper_bandwidth() <= 1
    }

    /// Zero above the first superdiagonal
    pub fn is_lower_hessenberg(&self) -> bool {
        self.upper_bandwidth() <= 1
    }

    /// Zero below the first subdiagonal
    pub fn is_upper_hessenberg(&self) -> bool {
        self.lower_bandwidth() <= 1
    }

    pub fn is_hessenberg(&self) -> bool {
        self.is_lower_hessenberg() || self.is_upper_hessenberg()
    }

    // ========== Symmetry patterns ==========

    /// `a[i,j] == pair(a[j,i])` for every nonzero `a[i,j]`
    ///
    /// Checking nonzero entries suffices: if `a[i,j]` is zero and `a[j,i]`
    /// is not, the pair is visited from `(j, i)`.
    fn is_paired(&self, pair: impl Fn(T) -> T) -> bool {
        if !self.is_square() {
            return false;
        }
        let rows = self.rows();
        self.storage.all_nonzero(|k, v| {
            let (i, j) = (k % rows, k / rows);
            v == pair(self.storage.get_at(j, i))
        })
    }

    /// `A == Aᵀ`
    pub fn is_symmetric(&self) -> bool {
        self.is_paired(|v| v)
    }

    /// `A == -Aᵀ`
    pub fn is_skew_symmetric(&self) -> bool {
        self.is_paired(|v| -v)
    }

    /// `A == Aᴴ`; the same as symmetry for real matrices
    pub fn is_hermitian(&self) -> bool {
        self.is_paired(|v| v.conj())
    }

    /// `A == -Aᴴ`
    pub fn is_skew_hermitian(&self) -> bool {
        self.is_paired(|v| -v.conj())
    }

    // ========== Summary ==========

    /// Sum of the main diagonal
    pub fn trace(&self) -> T {
        let n = self.rows().min(self.cols());
        let mut sum = T::zero();
        for i in 0..n {
            sum += self.storage.get_at(i, i);
        }
        sum
    }
}
