//! Synthetic datasets and dataset files.
//!
//! Every generator is seeded, so the same arguments always produce the same data.
//! - [`make_data`]: a saturating curve `10 - 1/(x + 0.1)` with points bunched near 0
//! - [`sine_data`]: `sin(x)` over `[0, 10)`
//!
//! [`load`] reads `(x, y)` pairs from a CSV or JSON file.
use std::path::Path;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{Error, Result};

/// Generates `n` noisy samples of `y = 10 - 1 / (x + 0.1)`.
///
/// `x` is the square of a uniform draw in `[0, 1)`, so samples are denser near 0.
/// When `err > 0`, each `y` gets `err * N(0, 1)` added.
///
/// All `x` values are drawn before any noise, so changing `err` leaves `x` unchanged.
///
/// # Example
/// ```
/// # use polytune::datasets::make_data;
/// let data = make_data(40, 1.0, 1);
/// assert_eq!(data.len(), 40);
/// assert_eq!(data, make_data(40, 1.0, 1));
/// ```
#[must_use]
pub fn make_data(n: usize, err: f64, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let xs: Vec<f64> = (0..n)
        .map(|_| {
            let u: f64 = rng.random();
            u * u
        })
        .collect();

    xs.into_iter()
        .map(|x| {
            let mut y = 10.0 - 1.0 / (x + 0.1);
            if err > 0.0 {
                let e: f64 = rng.sample(StandardNormal);
                y += err * e;
            }
            (x, y)
        })
        .collect()
}

/// Generates `n` samples of `y = sin(x) + noise * N(0, 1)` with `x` uniform in `[0, 10)`.
#[must_use]
pub fn sine_data(n: usize, noise: f64, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let xs: Vec<f64> = (0..n).map(|_| 10.0 * rng.random::<f64>()).collect();

    xs.into_iter()
        .map(|x| {
            let e: f64 = rng.sample(StandardNormal);
            (x, x.sin() + noise * e)
        })
        .collect()
}

/// Loads `(x, y)` pairs from a file.
///
/// - `.csv`: two columns `x,y`. A first line that does not parse is treated as a header.
/// - `.json`: an array of `[x, y]` pairs.
///
/// # Errors
/// - `Error::Io` if the file cannot be read
/// - `Error::Parse` for malformed content or an unsupported extension
/// - `Error::NoData` if the file holds no points
pub fn load(path: impl AsRef<Path>) -> Result<Vec<(f64, f64)>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;

    let data = match path.extension().and_then(|s| s.to_str()) {
        Some("csv") => parse_csv(&contents)?,
        Some("json") => serde_json::from_str(&contents).map_err(|e| Error::Parse {
            line: e.line(),
            message: e.to_string(),
        })?,
        _ => {
            return Err(Error::Parse {
                line: 0,
                message: format!("Unsupported file format: {}", path.display()),
            })
        }
    };

    if data.is_empty() {
        return Err(Error::NoData);
    }
    Ok(data)
}

/// Parses two-column CSV text, skipping blank lines.
///
/// # Errors
/// Returns `Error::Parse` with the 1-based line number of the first bad row.
pub fn parse_csv(contents: &str) -> Result<Vec<(f64, f64)>> {
    fn parse_line(line: &str) -> Option<(f64, f64)> {
        let mut parts = line.split(',').map(str::trim);
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        match parts.next() {
            None => Some((x, y)),
            Some(_) => None,
        }
    }

    let mut data = Vec::new();
    let mut first = true;
    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let is_first = std::mem::replace(&mut first, false);

        match parse_line(line) {
            Some(point) => data.push(point),

            // First non-blank line is allowed to be a header
            None if is_first => {}

            None => {
                return Err(Error::Parse {
                    line: i + 1,
                    message: format!("expected `x,y`, found `{line}`"),
                })
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CoordExt;

    #[test]
    fn make_data_is_seeded() {
        let a = make_data(40, 1.0, 1);
        let b = make_data(40, 1.0, 1);
        let c = make_data(40, 1.0, 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn make_data_shape() {
        let data = make_data(200, 1.0, 1);
        assert_eq!(data.len(), 200);
        assert!(data.x_iter().all(|x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn noise_free_data_follows_curve() {
        let data = make_data(25, 0.0, 7);
        for (x, y) in data {
            assert!((y - (10.0 - 1.0 / (x + 0.1))).abs() < 1e-12);
        }
    }

    #[test]
    fn noise_does_not_move_x() {
        let noisy = make_data(30, 1.0, 4);
        let clean = make_data(30, 0.0, 4);
        assert_eq!(noisy.x(), clean.x());
        assert_ne!(noisy.y(), clean.y());
    }

    #[test]
    fn sine_data_range() {
        let data = sine_data(50, 0.1, 1);
        assert_eq!(data.len(), 50);
        assert!(data.x_iter().all(|x| (0.0..10.0).contains(&x)));
        assert!(data.y_iter().all(|y| y.abs() < 2.0));
    }

    #[test]
    fn csv_with_header() {
        let data = parse_csv("x,y\n0.0, 1.0\n\n2.5,3\n").unwrap();
        assert_eq!(data, vec![(0.0, 1.0), (2.5, 3.0)]);

        let data = parse_csv("\n  \nx,y\n1,2\n").unwrap();
        assert_eq!(data, vec![(1.0, 2.0)]);
        let err = parse_csv("\nx,y\nx,y\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn csv_reports_line() {
        let err = parse_csv("0,1\n1,2\nnope\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));

        let err = parse_csv("0,1,2\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn load_files() {
        let dir = tempfile::tempdir().unwrap();

        let csv = dir.path().join("points.csv");
        std::fs::write(&csv, "x,y\n0,1\n1,3\n").unwrap();
        assert_eq!(load(&csv).unwrap(), vec![(0.0, 1.0), (1.0, 3.0)]);

        let json = dir.path().join("points.json");
        std::fs::write(&json, "[[0.5, 1.5], [2, 4]]").unwrap();
        assert_eq!(load(&json).unwrap(), vec![(0.5, 1.5), (2.0, 4.0)]);

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "[]").unwrap();
        assert!(matches!(load(&empty), Err(Error::NoData)));

        let other = dir.path().join("points.txt");
        std::fs::write(&other, "0,1").unwrap();
        assert!(matches!(load(&other), Err(Error::Parse { line: 0, .. })));

        assert!(matches!(load(dir.path().join("missing.csv")), Err(Error::Io(_))));
    }
}
