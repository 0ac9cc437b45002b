//! Error types for polynomial regression and model selection
//!
//! This module defines the common errors encountered when fitting, scoring or
//! cross-validating models, along with a convenient `Result` alias.

/// Errors that can occur while fitting or evaluating models.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot fit or score because there is no data.
    #[error("No data available for fitting")]
    NoData,

    /// Two inputs that must agree in length or width do not.
    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        /// Expected length or column count
        expected: usize,
        /// Length or column count actually given
        found: usize,
    },

    /// The model was used for prediction before being fitted.
    #[error("This model has not been fitted yet")]
    NotFitted,

    /// The requested number of folds cannot split the dataset.
    ///
    /// At least 2 folds are needed, and no more folds than samples.
    #[error("Cannot split {samples} samples into {folds} folds")]
    InvalidFolds {
        /// Number of folds requested
        folds: usize,
        /// Number of samples available
        samples: usize,
    },

    /// A learning curve training size was out of range.
    #[error("Invalid training size: {0}")]
    InvalidTrainSize(String),

    /// A parameter grid or validation range had no candidates.
    #[error("Parameter grid has no candidates")]
    EmptyGrid,

    /// Every candidate tested during a search failed to fit.
    ///
    /// Something is probably wrong with the data used. Try a single candidate manually to see the error
    #[error("None of the models tested are valid")]
    NoModel,

    /// Failed to solve the least squares system.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// A numeric value could not be cast to the target type. This is usually a custom type much smaller than f64/f32
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// A dataset file could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number, or 0 when the whole file is at fault
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// A settings value is out of range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// File IO failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for polynomial regression and model selection
pub type Result<T> = std::result::Result<T, Error>;
