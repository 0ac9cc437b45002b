//! Cross-validation and hyperparameter search.
//!
//! Every utility takes an [`Estimator`](crate::estimator::Estimator) by reference
//! and works on clones of it, so the caller's model is never modified.
//!
//! - [`KFold`]: contiguous train/test splits
//! - [`cross_val_score`]: test score per fold
//! - [`validation_curve`]: train and validation scores across one hyperparameter
//! - [`learning_curve`]: train and validation scores as the training set grows
//! - [`GridSearch`]: exhaustive search over a [`ParamGrid`]
//!
//! A candidate that fails to fit on a fold is logged and scored as NaN rather
//! than aborting the whole run.
mod grid;
mod kfold;
mod learning;
mod validation;

pub use grid::{
    CandidateReport, CandidateResult, GridSearch, GridSearchReport, GridSearchResult, ParamGrid,
};
pub use kfold::{KFold, Split};
pub use learning::{learning_curve, train_sizes, LearningCurve};
pub use validation::{cross_val_score, validation_curve, ValidationCurve};
