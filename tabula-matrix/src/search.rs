//! Element search and bulk copy

use tabula_core::{Result, Scalar, TabulaError};
use crate::index::IndexCollection;
use crate::storage::Storage;
use crate::types::Matrix;

impl<T: Scalar> Matrix<T> {
    /// Linear positions, column-major, whose element satisfies `predicate`
    ///
    /// Sparse matrices only visit stored entries unless zero itself matches.
    fn positions_where<P: Fn(T) -> bool>(&self, predicate: P) -> Vec<usize> {
        match &self.storage {
            Storage::Dense(d) => d
                .as_slice()
                .iter()
                .enumerate()
                .filter(|&(_, &v)| predicate(v))
                .map(|(k, _)| k)
                .collect(),
            Storage::Sparse(s) if predicate(T::zero()) => {
                (0..self.len()).filter(|&k| predicate(s.get(k))).collect()
            }
            Storage::Sparse(s) => s.iter().filter(|&(_, v)| predicate(v)).map(|(k, _)| k).collect(),
        }
    }

    /// Linear positions holding `value`, or `None` when there are none
    pub fn find(&self, value: T) -> Option<IndexCollection> {
        IndexCollection::from_vec(self.positions_where(|v| v == value)).ok()
    }

    /// Linear positions holding a nonzero element
    pub fn find_nonzero(&self) -> Option<IndexCollection> {
        IndexCollection::from_vec(self.positions_where(|v| !v.is_zero_value())).ok()
    }

    /// Linear positions whose element satisfies `predicate`
    pub fn find_while<P: Fn(T) -> bool>(&self, predicate: P) -> Option<IndexCollection> {
        IndexCollection::from_vec(self.positions_where(predicate)).ok()
    }

    pub fn contains(&self, value: T) -> bool {
        self.index_of(value).is_some()
    }

    /// First linear position holding `value`
    pub fn index_of(&self, value: T) -> Option<usize> {
        match &self.storage {
            Storage::Dense(d) => d.as_slice().iter().position(|&v| v == value),
            Storage::Sparse(s) if value.is_zero_value() => (0..self.len()).find(|&k| !s.contains_key(k)),
            Storage::Sparse(s) => s.iter().find(|&(_, v)| v == value).map(|(k, _)| k),
        }
    }

    /// Copy every element, column-major, into `array[start..start + len]`
    ///
    /// Nothing is written when the target is too short.
    pub fn copy_to(&self, array: &mut [T], start: usize) -> Result<()> {
        if start > array.len() {
            return Err(TabulaError::index_out_of_range("start", start, array.len() + 1));
        }
        let n = self.len();
        if array.len() - start < n {
            return Err(TabulaError::invalid_argument(
                "array",
                format!(
                    "Destination array is not long enough: {} elements from position {} do not fit in {}",
                    n,
                    start,
                    array.len()
                ),
            ));
        }
        let target = &mut array[start..start + n];
        match &self.storage {
            Storage::Dense(d) => target.copy_from_slice(d.as_slice()),
            Storage::Sparse(s) => {
                target.fill(T::zero());
                for (k, v) in s.iter() {
                    target[k] = v;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{DoubleMatrix, StorageScheme};
    use tabula_core::ErrorKind;

    const SCHEMES: [StorageScheme; 2] = [StorageScheme::Dense, StorageScheme::Sparse];

    fn sample(scheme: StorageScheme) -> DoubleMatrix {
        // [[2, 0, 7], [0, 2, 0]]
        DoubleMatrix::from_nested_list(&[vec![2.0, 0.0, 7.0], vec![0.0, 2.0, 0.0]])
            .unwrap()
            .to_scheme(scheme)
    }

    #[test]
    fn test_find_value() {
        for scheme in SCHEMES {
            let m = sample(scheme);
            assert_eq!(m.find(2.0).unwrap().as_slice(), &[0, 3]);
            assert_eq!(m.find(7.0).unwrap().as_slice(), &[4]);
            assert!(m.find(5.0).is_none());
        }
    }

    #[test]
    fn test_find_zero_scans_absent_cells() {
        for scheme in SCHEMES {
            let m = sample(scheme);
            assert_eq!(m.find(0.0).unwrap().as_slice(), &[1, 2, 5]);
            assert_eq!(m.index_of(0.0), Some(1));
        }
    }

    #[test]
    fn test_find_nonzero_and_predicate() {
        for scheme in SCHEMES {
            let m = sample(scheme);
            assert_eq!(m.find_nonzero().unwrap().as_slice(), &[0, 3, 4]);
            assert_eq!(m.find_while(|v| v > 1.0 && v < 5.0).unwrap().as_slice(), &[0, 3]);
            assert_eq!(m.find_while(|v| v < 1.0).unwrap().as_slice(), &[1, 2, 5]);
            assert!(m.find_while(|v| v > 100.0).is_none());
        }
        let empty = DoubleMatrix::sparse(3, 3).unwrap();
        assert!(empty.find_nonzero().is_none());
    }

    #[test]
    fn test_contains_and_index_of() {
        for scheme in SCHEMES {
            let m = sample(scheme);
            assert!(m.contains(7.0));
            assert!(!m.contains(-7.0));
            assert_eq!(m.index_of(2.0), Some(0));
            assert_eq!(m.index_of(3.0), None);
        }
        let full = DoubleMatrix::dense_filled(2, 2, 1.0).unwrap().to_sparse();
        assert_eq!(full.index_of(0.0), None);
    }

    #[test]
    fn test_copy_to() {
        for scheme in SCHEMES {
            let m = sample(scheme);
            let mut target = vec![-1.0; 8];
            m.copy_to(&mut target, 1).unwrap();
            assert_eq!(target, vec![-1.0, 2.0, 0.0, 0.0, 2.0, 7.0, 0.0, -1.0]);
        }
    }

    #[test]
    fn test_copy_to_short_target_untouched() {
        for scheme in SCHEMES {
            let m = sample(scheme);
            let mut target = vec![9.0; 7];
            let err = m.copy_to(&mut target, 2).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidArgument);
            assert_eq!(err.param.as_deref(), Some("array"));
            assert!(target.iter().all(|&v| v == 9.0));

            let err = m.copy_to(&mut target, 8).unwrap_err();
            assert_eq!(err.kind, ErrorKind::ArgumentOutOfRange);
            assert_eq!(err.param.as_deref(), Some("start"));
        }
    }
}
