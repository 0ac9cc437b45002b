//! Ordinary least squares linear regression.
use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    error::{Error, Result},
    value::Value,
};

/// Linear model fitted by ordinary least squares.
///
/// # How it works
/// - With `fit_intercept`, the columns of `X` and the target are centred on their means.
///   - With `normalize` as well, each centred column is divided by its L2 norm.
/// - Solves `X * w = y` using the **SVD** of `X`, discarding singular values below
///   `epsilon * max(n, k) * sigma_max`. Rank deficient or underdetermined systems
///   yield the minimum-norm solution.
/// - Scales the weights back and recovers the intercept from the means.
///
/// Without `fit_intercept` the `normalize` flag has no effect.
///
/// # Example
/// ```
/// # use polytune::linear::LinearRegression;
/// # use nalgebra::DMatrix;
/// let x = DMatrix::from_row_slice(3, 1, &[0.0, 1.0, 2.0]);
/// let mut model = LinearRegression::<f64>::new();
/// model.fit(&x, &[1.0, 3.0, 5.0]).unwrap();
/// assert!((model.intercept() - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression<T: Value = f64> {
    fit_intercept: bool,
    normalize: bool,
    fitted: Option<Fitted<T>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Fitted<T: Value> {
    coefficients: Vec<T>,
    intercept: T,
}

impl<T: Value> Default for LinearRegression<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Value> LinearRegression<T> {
    /// Creates an unfitted model with an intercept and no normalization.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
            normalize: false,
            fitted: None,
        }
    }

    /// Whether an intercept is fitted
    #[must_use]
    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    /// Whether columns are scaled to unit norm before solving
    #[must_use]
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Changes whether an intercept is fitted. Clears any previous fit.
    pub fn set_fit_intercept(&mut self, fit_intercept: bool) {
        self.fit_intercept = fit_intercept;
        self.fitted = None;
    }

    /// Changes whether columns are normalized. Clears any previous fit.
    pub fn set_normalize(&mut self, normalize: bool) {
        self.normalize = normalize;
        self.fitted = None;
    }

    /// Discards any previous fit, keeping the settings
    pub fn reset(&mut self) {
        self.fitted = None;
    }

    /// True once [`LinearRegression::fit`] has succeeded
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fitted weights, one per column. Empty before fitting.
    #[must_use]
    pub fn coefficients(&self) -> &[T] {
        self.fitted
            .as_ref()
            .map_or(&[], |f| f.coefficients.as_slice())
    }

    /// Fitted intercept. Zero before fitting or when `fit_intercept` is off.
    #[must_use]
    pub fn intercept(&self) -> T {
        self.fitted.as_ref().map_or(T::zero(), |f| f.intercept)
    }

    /// Fits the model to the design matrix `x` and target `y`.
    ///
    /// # Errors
    /// - `Error::NoData` if `x` has no rows
    /// - `Error::ShapeMismatch` if `y` has a different length than `x` has rows
    /// - `Error::Algebra` if the system could not be solved
    pub fn fit(&mut self, x: &DMatrix<T>, y: &[T]) -> Result<()> {
        let (n, k) = x.shape();
        if n == 0 {
            return Err(Error::NoData);
        } else if y.len() != n {
            return Err(Error::ShapeMismatch {
                expected: n,
                found: y.len(),
            });
        }

        let mut x = x.clone();
        let mut b = DVector::from_column_slice(y);

        let mut x_offset = vec![T::zero(); k];
        let mut x_scale = vec![T::one(); k];
        let mut y_offset = T::zero();

        if self.fit_intercept {
            let n_t = T::from_positive_int(n);
            for (j, mut column) in x.column_iter_mut().enumerate() {
                let offset = column.sum() / n_t;
                column.add_scalar_mut(-offset);
                x_offset[j] = offset;

                if self.normalize {
                    let norm = column.norm();
                    if norm != T::zero() {
                        column /= norm;
                        x_scale[j] = norm;
                    }
                }
            }

            y_offset = b.sum() / n_t;
            b.add_scalar_mut(-y_offset);
        }

        let mut coefficients = if k == 0 {
            Vec::new()
        } else {
            solve_least_squares(x, &b)?
        };

        for (c, scale) in coefficients.iter_mut().zip(&x_scale) {
            *c /= *scale;
        }

        let intercept = if self.fit_intercept {
            y_offset
                - x_offset
                    .iter()
                    .zip(&coefficients)
                    .fold(T::zero(), |acc, (o, c)| acc + *o * *c)
        } else {
            T::zero()
        };

        self.fitted = Some(Fitted {
            coefficients,
            intercept,
        });
        Ok(())
    }

    /// Predicts one value per row of `x`.
    ///
    /// # Errors
    /// - `Error::NotFitted` if the model has not been fitted
    /// - `Error::ShapeMismatch` if `x` has a different number of columns than the fit
    pub fn predict(&self, x: &DMatrix<T>) -> Result<Vec<T>> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        if x.ncols() != fitted.coefficients.len() {
            return Err(Error::ShapeMismatch {
                expected: fitted.coefficients.len(),
                found: x.ncols(),
            });
        }

        let w = DVector::from_column_slice(&fitted.coefficients);
        let y = x * w;
        Ok(y.iter().map(|v| *v + fitted.intercept).collect())
    }
}

/// Solves `x * w = b` in the least squares sense using SVD.
fn solve_least_squares<T: Value>(x: DMatrix<T>, b: &DVector<T>) -> Result<Vec<T>> {
    let size = x.shape();
    let decomp = SVD::new(x, true, true);

    // ~= machine_epsilon * max(size) * max_singular
    let max_size = size.0.max(size.1);
    let sigma_max = decomp.singular_values.max();
    let epsilon = T::epsilon() * T::try_cast(max_size)? * sigma_max;

    let w = decomp.solve(b, epsilon).map_err(Error::Algebra)?;
    let coefficients: Vec<T> = w.iter().copied().collect();

    if coefficients.iter().any(|c| c.is_nan()) {
        return Err(Error::Algebra("NaN in coefficients"));
    }

    Ok(coefficients)
}
