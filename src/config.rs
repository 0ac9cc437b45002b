//! Settings for the tutorial walkthrough.
//!
//! Every field has a default, so a settings file only needs the values it changes:
//! ```json
//! { "seed": 7, "max_degree": 12 }
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    value::linspace,
};

/// Walkthrough settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for every synthetic dataset
    pub seed: u64,

    /// Size of the small dataset
    pub samples: usize,

    /// Size of the large dataset used when comparing models and for learning curves
    pub large_samples: usize,

    /// Multiplier for the Gaussian noise added to `y`
    pub noise: f64,

    /// Cross-validation folds
    pub folds: usize,

    /// Validation curves and grid search cover degrees `0..=max_degree`
    pub max_degree: usize,

    /// Degrees overlaid on the raw data
    pub preview_degrees: Vec<usize>,

    /// Degree drawn as the best model
    pub best_degree: usize,

    /// One learning curve panel per degree
    pub learning_degrees: Vec<usize>,

    /// Number of train size fractions between 0.3 and 1.0
    pub learning_points: usize,

    /// Resolution of the grid fitted curves are drawn on
    pub test_points: usize,

    /// Where figures are written
    pub output_dir: PathBuf,

    /// Width and height of a single panel, in pixels
    pub image_size: (u32, u32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 1,
            samples: 40,
            large_samples: 200,
            noise: 1.0,
            folds: 7,
            max_degree: 20,
            preview_degrees: vec![1, 3, 5],
            best_degree: 3,
            learning_degrees: vec![2, 9],
            learning_points: 25,
            test_points: 500,
            output_dir: PathBuf::from("target/plot_output"),
            image_size: (800, 600),
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    /// Checks that the settings describe a runnable walkthrough.
    ///
    /// # Errors
    /// - `Error::InvalidFolds` if there are fewer than 2 folds or either dataset is smaller than the fold count
    /// - `Error::InvalidSettings` for an unusable curve resolution or no learning curve degrees
    pub fn validate(&self) -> Result<()> {
        let smallest = self.samples.min(self.large_samples);
        if self.folds < 2 || smallest < self.folds {
            return Err(Error::InvalidFolds {
                folds: self.folds,
                samples: smallest,
            });
        }

        if self.learning_points == 0 {
            return Err(Error::InvalidSettings(
                "learning_points must be at least 1".to_string(),
            ));
        }

        if self.test_points < 2 {
            return Err(Error::InvalidSettings(
                "test_points must be at least 2".to_string(),
            ));
        }

        if self.learning_degrees.is_empty() {
            return Err(Error::InvalidSettings(
                "learning_degrees must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Grid the fitted curves are evaluated on: `test_points` values over `[-0.1, 1.1]`
    #[must_use]
    pub fn test_grid(&self) -> Vec<f64> {
        linspace(-0.1, 1.1, self.test_points)
    }

    /// Learning curve train fractions: `learning_points` values over `[0.3, 1.0]`
    #[must_use]
    pub fn train_fractions(&self) -> Vec<f64> {
        linspace(0.3, 1.0, self.learning_points)
    }

    /// Path of a figure inside the output directory
    #[must_use]
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.png"))
    }
}
