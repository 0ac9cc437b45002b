//! Polynomial basis expansion of a single feature.
//!
//! A scalar `x` becomes the row `[1, x, x², …, xᵈ]`, which lets a linear model
//! fit curves.
use nalgebra::DMatrix;

use crate::value::Value;

/// Expands a scalar feature into its powers.
///
/// # Example
/// ```
/// # use polytune::features::PolynomialFeatures;
/// let features = PolynomialFeatures::new(3).without_bias();
/// let m = features.transform(&[2.0, 3.0, 4.0]);
/// assert_eq!(m.row(0).iter().copied().collect::<Vec<_>>(), vec![2.0, 4.0, 8.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialFeatures {
    degree: usize,
    include_bias: bool,
}
impl PolynomialFeatures {
    /// Creates an expansion up to `degree`, including the constant column.
    #[must_use]
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            include_bias: true,
        }
    }

    /// Drops the leading column of ones.
    #[must_use]
    pub fn without_bias(mut self) -> Self {
        self.include_bias = false;
        self
    }

    /// Highest power produced
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Changes the highest power produced
    pub fn set_degree(&mut self, degree: usize) {
        self.degree = degree;
    }

    /// Whether the constant column is produced
    #[must_use]
    pub fn include_bias(&self) -> bool {
        self.include_bias
    }

    /// Number of columns produced by [`PolynomialFeatures::transform`]
    #[must_use]
    pub fn n_output_features(&self) -> usize {
        self.degree + usize::from(self.include_bias)
    }

    /// Column names, `1` for the bias and `x0^p` for powers
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        let first = usize::from(!self.include_bias);
        (first..=self.degree)
            .map(|p| match p {
                0 => "1".to_string(),
                1 => "x0".to_string(),
                _ => format!("x0^{p}"),
            })
            .collect()
    }

    /// Builds the design matrix for `x`, one row per value.
    pub fn transform<T: Value>(&self, x: &[T]) -> DMatrix<T> {
        let first = usize::from(!self.include_bias);
        let mut matrix = DMatrix::zeros(x.len(), self.n_output_features());

        for (mut row, &x) in matrix.row_iter_mut().zip(x) {
            let mut power = T::one();
            for p in 0..=self.degree {
                if p >= first {
                    row[p - first] = power;
                }
                power *= x;
            }
        }

        matrix
    }
}
