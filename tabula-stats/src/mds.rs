//! Classical multidimensional scaling
//!
//! Given a symmetric matrix of dissimilarities `D`, finds points whose
//! Euclidean distances approximate `D`. The doubly centered matrix
//! `B = -½ J D⁽²⁾ J` (with `D⁽²⁾` the element-wise squares and `J` the
//! centering matrix) is eigen-decomposed; the configuration holds the leading
//! eigenvectors scaled by the square roots of their eigenvalues.

use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};
use tabula_core::{Result, TabulaError};
use tabula_matrix::DoubleMatrix;

/// Eigenvalues below this fraction of the largest magnitude count as zero
const RELATIVE_TOLERANCE: f64 = 1e-10;

/// Outcome of a scaling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdsResult {
    /// One row per object, one column per dimension
    pub configuration: DoubleMatrix,
    /// Share of the positive eigenvalue mass kept by the configuration
    pub goodness_of_fit: f64,
    /// Every eigenvalue of `B`, in decreasing order
    pub eigenvalues: Vec<f64>,
}

pub struct ClassicalMds;

impl ClassicalMds {
    /// Scale `proximities` into `configuration_dimension` dimensions, or into
    /// as many dimensions as there are positive eigenvalues when `None`
    pub fn analyze(proximities: &DoubleMatrix, configuration_dimension: Option<usize>) -> Result<MdsResult> {
        if !proximities.is_symmetric() {
            return Err(TabulaError::invalid_argument("proximities", "Proximities must be a symmetric matrix"));
        }
        let n = proximities.rows();
        if let Some(dimension) = configuration_dimension {
            if dimension == 0 || dimension > n {
                return Err(TabulaError::out_of_range(
                    "configuration_dimension",
                    format!("configuration_dimension {} must be in 1..={}", dimension, n),
                ));
            }
        }

        let b = double_centered(&proximities.to_dmatrix());
        let eigen = SymmetricEigen::new(b);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| eigen.eigenvalues[j].total_cmp(&eigen.eigenvalues[i]));
        let eigenvalues: Vec<f64> = order.iter().map(|&i| eigen.eigenvalues[i]).collect();

        let largest = eigenvalues.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let tolerance = RELATIVE_TOLERANCE * largest;
        let positive = eigenvalues.iter().take_while(|&&v| v > tolerance).count();
        tracing::debug!(objects = n, positive, largest, "eigen-decomposed proximities");

        if positive == 0 {
            return Err(TabulaError::invalid_argument(
                "proximities",
                "Proximities cannot be scaled: no eigenvalue is positive",
            ));
        }
        let dimension = configuration_dimension.unwrap_or(positive);
        if dimension > positive {
            return Err(TabulaError::out_of_range(
                "configuration_dimension",
                format!(
                    "configuration_dimension {} exceeds the {} positive eigenvalues",
                    dimension, positive
                ),
            ));
        }

        let mut configuration = DMatrix::zeros(n, dimension);
        for (k, &source) in order.iter().take(dimension).enumerate() {
            let scale = eigenvalues[k].sqrt();
            let mut vector = eigen.eigenvectors.column(source).clone_owned();
            // fix the sign so results are reproducible
            if let Some(first) = vector.iter().copied().find(|v| v.abs() > RELATIVE_TOLERANCE) {
                if first < 0.0 {
                    vector.neg_mut();
                }
            }
            configuration.set_column(k, &(vector * scale));
        }

        let kept: f64 = eigenvalues[..dimension].iter().sum();
        let total: f64 = eigenvalues[..positive].iter().sum();

        let mut configuration = DoubleMatrix::from_dmatrix(configuration)?;
        for (i, name) in proximities.row_names() {
            configuration.set_row_name(*i, name.as_str())?;
        }
        Ok(MdsResult {
            configuration,
            goodness_of_fit: kept / total,
            eigenvalues,
        })
    }
}

/// `-½ J D⁽²⁾ J`, computed by subtracting row, column and grand means
fn double_centered(d: &DMatrix<f64>) -> DMatrix<f64> {
    let n = d.nrows();
    let squared = d.map(|v| v * v);
    let row_means: Vec<f64> = (0..n).map(|i| squared.row(i).mean()).collect();
    let col_means: Vec<f64> = (0..n).map(|j| squared.column(j).mean()).collect();
    let grand = squared.mean();
    DMatrix::from_fn(n, n, |i, j| -0.5 * (squared[(i, j)] - row_means[i] - col_means[j] + grand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::ErrorKind;

    /// The origin and the four unit vectors of R⁴
    fn simplex() -> DoubleMatrix {
        let s = 2f64.sqrt();
        DoubleMatrix::from_nested_list(&[
            vec![0.0, 1.0, 1.0, 1.0, 1.0],
            vec![1.0, 0.0, s, s, s],
            vec![1.0, s, 0.0, s, s],
            vec![1.0, s, s, 0.0, s],
            vec![1.0, s, s, s, 0.0],
        ])
        .unwrap()
    }

    fn distance(m: &DoubleMatrix, a: usize, b: usize) -> f64 {
        (0..m.cols())
            .map(|k| {
                let d = m.get_at(a, k).unwrap() - m.get_at(b, k).unwrap();
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    #[test]
    fn test_dimension_beyond_positive_eigenvalues() {
        let err = ClassicalMds::analyze(&simplex(), Some(5)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArgumentOutOfRange);
        assert_eq!(err.param.as_deref(), Some("configuration_dimension"));
    }

    #[test]
    fn test_full_configuration_reproduces_distances() {
        let proximities = simplex();
        let result = ClassicalMds::analyze(&proximities, None).unwrap();
        assert_eq!(result.configuration.shape(), (5, 4));
        assert!((result.goodness_of_fit - 1.0).abs() < 1e-10);
        for a in 0..5 {
            for b in 0..5 {
                let expected = proximities.get_at(a, b).unwrap();
                assert!((distance(&result.configuration, a, b) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_eigenvalues_and_goodness_of_fit() {
        let result = ClassicalMds::analyze(&simplex(), Some(2)).unwrap();
        let expected = [1.0, 1.0, 1.0, 0.2, 0.0];
        assert_eq!(result.eigenvalues.len(), 5);
        for (got, want) in result.eigenvalues.iter().zip(expected) {
            assert!((got - want).abs() < 1e-10, "got {:?}", result.eigenvalues);
        }
        assert!((result.goodness_of_fit - 2.0 / 3.2).abs() < 1e-10);
        assert_eq!(result.configuration.shape(), (5, 2));
    }

    #[test]
    fn test_points_on_a_line() {
        let mut d = DoubleMatrix::dense(3, 3).unwrap();
        for (i, x) in [0.0, 1.0, 3.0].iter().enumerate() {
            for (j, y) in [0.0, 1.0, 3.0].iter().enumerate() {
                d.set_at(i, j, f64::abs(x - y)).unwrap();
            }
        }
        d.set_row_name(2, "far").unwrap();
        let result = ClassicalMds::analyze(&d, None).unwrap();
        assert_eq!(result.configuration.shape(), (3, 1));
        assert_eq!(result.configuration.row_name(2), Some("far"));
        assert!((distance(&result.configuration, 0, 2) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_proximities() {
        let mut d = simplex();
        d.set_at(0, 1, 2.0).unwrap();
        let err = ClassicalMds::analyze(&d, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(err.param.as_deref(), Some("proximities"));

        let zeros = DoubleMatrix::dense(3, 3).unwrap();
        let err = ClassicalMds::analyze(&zeros, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_dimension_bounds() {
        for dimension in [0, 6] {
            let err = ClassicalMds::analyze(&simplex(), Some(dimension)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::ArgumentOutOfRange);
            assert_eq!(err.param.as_deref(), Some("configuration_dimension"));
        }
    }

    #[test]
    fn test_sparse_proximities() {
        let dense = ClassicalMds::analyze(&simplex(), Some(3)).unwrap();
        let sparse = ClassicalMds::analyze(&simplex().to_sparse(), Some(3)).unwrap();
        assert_eq!(dense.eigenvalues.len(), sparse.eigenvalues.len());
        assert!((dense.goodness_of_fit - sparse.goodness_of_fit).abs() < 1e-12);
    }
}
