//! Numeric types and coordinate utilities.
//!
//! This module defines the [`Value`] trait, which abstracts the numeric
//! types that can be used for fitting and scoring, ensuring compatibility
//! with nalgebra and floating-point operations.
//!
//! # Example
//!
//! ```rust
//! use polytune::value::{linspace, CoordExt, Value};
//!
//! let xs: Vec<f64> = linspace(-0.1, 1.1, 5);
//! assert_eq!(xs.len(), 5);
//!
//! let data = vec![(0.0, 1.0), (1.0, 3.0)];
//! assert_eq!(data.y(), vec![1.0, 3.0]);
//! assert_eq!(f64::two(), 2.0);
//! ```
use std::ops::Range;

use crate::error::Error;

/// Numeric type for models
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Converts the value to `usize`
    fn as_usize(&self) -> Option<usize> {
        num_traits::cast(*self)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// Returns `n` evenly spaced values over `[start, end]`, including both ends.
///
/// - `n == 0` returns an empty vector
/// - `n == 1` returns `[start]`
pub fn linspace<T: Value>(start: T, end: T, n: usize) -> Vec<T> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / T::from_positive_int(n - 1);
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    } else {
                        start + step * T::from_positive_int(i)
                    }
                })
                .collect()
        }
    }
}

/// Extension trait for accessing the `x` and `y` coordinates of a dataset.
///
/// # Examples
///
/// ```
/// # use polytune::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// assert_eq!(data.x_range(), Some(0.0..2.0));
/// ```
pub trait CoordExt<T: Value> {
    /// Returns an iterator over the x-coordinates.
    fn x_iter(&self) -> impl Iterator<Item = T>;

    /// Returns an iterator over the y-coordinates.
    fn y_iter(&self) -> impl Iterator<Item = T>;

    /// Returns the x-coordinates.
    fn x(&self) -> Vec<T> {
        self.x_iter().collect()
    }

    /// Returns the y-coordinates.
    fn y(&self) -> Vec<T> {
        self.y_iter().collect()
    }

    /// Returns the range of x-coordinates.
    fn x_range(&self) -> Option<Range<T>> {
        min_max(self.x_iter())
    }

    /// Returns the range of y-coordinates.
    fn y_range(&self) -> Option<Range<T>> {
        min_max(self.y_iter())
    }

    /// Converts the coordinates to `f64`.
    ///
    /// # Errors
    /// Returns an error if any of the coordinates cannot be converted to `f64`.
    fn as_f64(&self) -> crate::error::Result<Vec<(f64, f64)>> {
        self.x_iter()
            .zip(self.y_iter())
            .map(|(x, y)| Ok((f64::try_cast(x)?, f64::try_cast(y)?)))
            .collect()
    }
}
impl<T: Value> CoordExt<T> for [(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}

fn min_max<T: Value>(values: impl Iterator<Item = T>) -> Option<Range<T>> {
    let bounds = values.fold(None, |acc: Option<(T, T)>, v| {
        Some(match acc {
            Some((min, max)) => (
                nalgebra::RealField::min(min, v),
                nalgebra::RealField::max(max, v),
            ),
            None => (v, v),
        })
    });
    bounds.map(|(start, end)| start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_ends() {
        let xs = linspace(-0.1, 1.1, 500);
        assert_eq!(xs.len(), 500);
        assert_eq!(xs[0], -0.1);
        assert_eq!(xs[499], 1.1);
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn linspace_degenerate_lengths() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.3, 1.0, 1), vec![0.3]);
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn coord_ranges() {
        let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
        assert_eq!(data.x_range(), Some(0.0..2.0));
        assert_eq!(data.y_range(), Some(-2.0..3.0));

        let empty: Vec<(f64, f64)> = vec![];
        assert_eq!(empty.x_range(), None);
    }

    #[test]
    fn coord_as_f64_from_f32() {
        let data: Vec<(f32, f32)> = vec![(1.0, 2.0)];
        assert_eq!(data.as_f64().unwrap(), vec![(1.0, 2.0)]);
    }
}
