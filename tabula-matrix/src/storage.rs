//! Storage backends
//!
//! A matrix keeps its values either densely, in an nalgebra `DMatrix`
//! (column-major), or sparsely, as an ordered map from linear index to
//! value. Both are addressed with the same column-major linear index
//! `row + col * rows`. Callers validate bounds before reaching storage.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabula_core::Scalar;

/// Storage representation of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScheme {
    /// Every element is stored explicitly
    #[default]
    Dense,
    /// Only nonzero elements are stored
    Sparse,
}

impl StorageScheme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dense" => Some(StorageScheme::Dense),
            "sparse" => Some(StorageScheme::Sparse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageScheme::Dense => "dense",
            StorageScheme::Sparse => "sparse",
        }
    }
}

/// Nonzero entries keyed by column-major linear index
///
/// Canonical form: no stored value is zero. Writing zero removes the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseStorage<T> {
    rows: usize,
    cols: usize,
    entries: BTreeMap<usize, T>,
}

impl<T: Scalar> SparseStorage<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, entries: BTreeMap::new() }
    }

    #[inline]
    pub fn get(&self, linear: usize) -> T {
        self.entries.get(&linear).copied().unwrap_or_else(T::zero)
    }

    #[inline]
    pub fn set(&mut self, linear: usize, value: T) {
        if value.is_zero_value() {
            self.entries.remove(&linear);
        } else {
            self.entries.insert(linear, value);
        }
    }

    /// Number of stored (nonzero) entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn contains_key(&self, linear: usize) -> bool {
        self.entries.contains_key(&linear)
    }

    /// Stored entries in column-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }

    /// Rebuild the entry map through `f`, dropping entries that map to zero
    pub fn rekey<F>(&self, rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, T) -> (usize, T),
    {
        let mut entries = BTreeMap::new();
        for (k, v) in self.iter() {
            let (key, value) = f(k, v);
            if !value.is_zero_value() {
                entries.insert(key, value);
            }
        }
        Self { rows, cols, entries }
    }
}

/// Dense or sparse element storage
#[derive(Debug, Clone)]
pub enum Storage<T: Scalar> {
    Dense(DMatrix<T>),
    Sparse(SparseStorage<T>),
}

impl<T: Scalar> Storage<T> {
    /// All-zero storage of the requested scheme
    pub fn zeros(rows: usize, cols: usize, scheme: StorageScheme) -> Self {
        match scheme {
            StorageScheme::Dense => Storage::Dense(DMatrix::from_element(rows, cols, T::zero())),
            StorageScheme::Sparse => Storage::Sparse(SparseStorage::new(rows, cols)),
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            Storage::Dense(d) => d.nrows(),
            Storage::Sparse(s) => s.rows,
        }
    }

    pub fn cols(&self) -> usize {
        match self {
            Storage::Dense(d) => d.ncols(),
            Storage::Sparse(s) => s.cols,
        }
    }

    pub fn scheme(&self) -> StorageScheme {
        match self {
            Storage::Dense(_) => StorageScheme::Dense,
            Storage::Sparse(_) => StorageScheme::Sparse,
        }
    }

    #[inline]
    pub fn get(&self, linear: usize) -> T {
        match self {
            Storage::Dense(d) => d[linear],
            Storage::Sparse(s) => s.get(linear),
        }
    }

    #[inline]
    pub fn get_at(&self, row: usize, col: usize) -> T {
        self.get(row + col * self.rows())
    }

    #[inline]
    pub fn set(&mut self, linear: usize, value: T) {
        match self {
            Storage::Dense(d) => d[linear] = value,
            Storage::Sparse(s) => s.set(linear, value),
        }
    }

    #[inline]
    pub fn set_at(&mut self, row: usize, col: usize, value: T) {
        let linear = row + col * self.rows();
        self.set(linear, value);
    }

    /// Number of explicitly stored values
    pub fn stored_count(&self) -> usize {
        match self {
            Storage::Dense(d) => d.len(),
            Storage::Sparse(s) => s.nnz(),
        }
    }

    /// Visit nonzero elements in column-major order until `f` returns false.
    /// Returns false if the walk was interrupted.
    pub fn all_nonzero<F>(&self, mut f: F) -> bool
    where
        F: FnMut(usize, T) -> bool,
    {
        match self {
            Storage::Dense(d) => d
                .as_slice()
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_zero_value())
                .all(|(k, &v)| f(k, v)),
            Storage::Sparse(s) => s.iter().all(|(k, v)| f(k, v)),
        }
    }

    /// Copy of the values as a dense nalgebra matrix
    pub fn to_dmatrix(&self) -> DMatrix<T> {
        match self {
            Storage::Dense(d) => d.clone(),
            Storage::Sparse(s) => {
                tracing::trace!(rows = s.rows, cols = s.cols, nnz = s.nnz(), "densifying sparse storage");
                let mut d = DMatrix::from_element(s.rows, s.cols, T::zero());
                for (k, v) in s.iter() {
                    d[k] = v;
                }
                d
            }
        }
    }

    /// Copy of the values in sparse form
    pub fn to_sparse(&self) -> SparseStorage<T> {
        match self {
            Storage::Sparse(s) => s.clone(),
            Storage::Dense(d) => {
                let mut s = SparseStorage::new(d.nrows(), d.ncols());
                for (k, &v) in d.as_slice().iter().enumerate() {
                    s.set(k, v);
                }
                tracing::trace!(rows = s.rows, cols = s.cols, nnz = s.nnz(), "sparsified dense storage");
                s
            }
        }
    }
}
