//! # Polytune
//! ## Find the degree that fits, not the one that memorizes
//!
//! A polynomial of high enough degree will pass through every point you give it, and tell you
//! nothing about the next one. This crate fits polynomial regression models and, more importantly,
//! helps you choose how complex they should be:
//! - Expand a feature into its powers and fit it with least squares
//! - Score models on data they were not trained on, using k-fold cross-validation
//! - Trace validation curves (score vs degree) and learning curves (score vs training set size)
//! - Search a grid of hyperparameters for the best cross-validated model
//! - Draw all of the above to PNG files (`plotting` feature)
//!
//! The simplest use-case is to pick a degree for a noisy dataset:
//! ```rust
//! # use polytune::{datasets, model_selection::{GridSearch, KFold, ParamGrid}, PolynomialRegression};
//! let data = datasets::make_data(40, 1.0, 1);
//!
//! let search = GridSearch::new(KFold::new(7));
//! let result = search.fit(&PolynomialRegression::new(2), &data, &ParamGrid::polynomial(10)).unwrap();
//!
//! println!("{}", result.best_params_string());
//! ```
//!
//! # Core Concepts
//! - A [`PolynomialRegression`] is a [`features::PolynomialFeatures`] expansion feeding a [`linear::LinearRegression`].
//!     - The **degree** is the highest power of `x` in the model. It is how wiggly the line is.
//!     - Too low a degree underfits (high bias), too high a degree overfits (high variance).
//! - An [`estimator::Estimator`] is anything that can be fitted, predicted and scored.
//!     - Model selection tools take one by reference and only ever work on clones of it.
//! - A [`score::Scoring`] method decides what "better" means. Greater is always better.
//! - The [`model_selection`] module holds the cross-validation tools.
//!
//! # Walkthrough
//!
//! The `polytune` binary runs the classic bias/variance tutorial step by step and writes every
//! figure to `target/plot_output`. See [`walkthrough`] for the steps, and [`config::Settings`] for
//! what can be tuned.
//!
//! # Testing utilities
//!
//! This crate includes a set of testing macros for floats, fitted models and score matrices. See [`test`].
//!
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // I don't care about this one
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod test;

#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plotting;

#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod walkthrough;

pub mod config;
pub mod datasets;
pub mod error;
pub mod estimator;
pub mod features;
pub mod linear;
pub mod model_selection;
pub mod score;
pub mod statistics;
pub mod value;

mod pipeline;

pub use pipeline::{PolynomialParam, PolynomialRegression};
pub use value::linspace;

pub use nalgebra;
