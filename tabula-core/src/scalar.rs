//! Scalar element types
//!
//! Matrices are generic over [`Scalar`], implemented for `f64` and
//! `Complex64`. The trait carries only what the matrix layer needs beyond
//! ordinary arithmetic: conjugation and a zero test used by sparse storage.

use num_complex::Complex64;
use num_traits::{One, Zero};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

pub trait Scalar:
    nalgebra::Scalar
    + Copy
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + MulAssign
    + Serialize
    + DeserializeOwned
    + fmt::Display
    + Send
    + Sync
{
    /// Short type name used in messages
    const NAME: &'static str;

    /// Complex conjugate (identity for real scalars)
    fn conj(self) -> Self;

    /// Absolute value or complex modulus
    fn modulus(self) -> f64;

    fn is_zero_value(&self) -> bool {
        self.is_zero()
    }
}

impl Scalar for f64 {
    const NAME: &'static str = "f64";

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn modulus(self) -> f64 {
        self.abs()
    }
}

impl Scalar for Complex64 {
    const NAME: &'static str = "Complex64";

    #[inline]
    fn conj(self) -> Self {
        Complex64::new(self.re, -self.im)
    }

    #[inline]
    fn modulus(self) -> f64 {
        self.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_conj_is_identity() {
        assert_eq!(2.5f64.conj(), 2.5);
        assert_eq!((-3.0f64).modulus(), 3.0);
    }

    #[test]
    fn test_complex_conj() {
        let z = Complex64::new(1.0, -2.0);
        assert_eq!(z.conj(), Complex64::new(1.0, 2.0));
        assert!((Complex64::new(3.0, 4.0).modulus() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_value() {
        assert!(0.0f64.is_zero_value());
        assert!(Complex64::new(0.0, 0.0).is_zero_value());
        assert!(!Complex64::new(0.0, 1e-300).is_zero_value());
    }
}
