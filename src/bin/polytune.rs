//! polytune CLI: the bias/variance tutorial, one figure per step.
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use polytune::{
    config::Settings,
    datasets,
    plotting::Figure,
    value::{linspace, CoordExt},
    walkthrough::{self, DegreeCurve},
};
use tracing_subscriber::EnvFilter;

type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "polytune")]
#[command(about = "Polynomial regression model selection: validation curves, learning curves and grid search")]
#[command(version)]
struct Cli {
    /// JSON settings file. Missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Random seed for the synthetic datasets
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Size of the small dataset
    #[arg(long, global = true)]
    samples: Option<usize>,

    /// Noise multiplier for the synthetic datasets
    #[arg(long, global = true)]
    noise: Option<f64>,

    /// Cross-validation folds
    #[arg(long, global = true)]
    folds: Option<usize>,

    /// Highest degree covered by validation curves and grid search
    #[arg(long, global = true)]
    max_degree: Option<usize>,

    /// Directory figures are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scatter the data with fits of a few degrees
    Visualize,

    /// Validation curve over the polynomial degree
    Validate,

    /// Draw the model of the chosen degree
    Best {
        /// Degree to draw, defaults to the configured best degree
        #[arg(long)]
        degree: Option<usize>,
    },

    /// Validation curve on the large dataset, over the small dataset's curve
    Compare,

    /// Learning curves, one panel per configured degree
    Learn,

    /// Grid search over degree, intercept and normalization
    Search {
        /// Write the full search results as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Search a CSV or JSON dataset instead of the synthetic one
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Basis expansion demo and a degree 7 fit to a sine
    Basis,

    /// Every step, in tutorial order
    All,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CmdResult {
    let settings = settings(&cli)?;
    let data = datasets::make_data(settings.samples, settings.noise, settings.seed);

    match cli.command {
        Commands::Visualize => cmd_visualize(&data, &settings),
        Commands::Validate => cmd_validate(&data, &settings).map(|_| ()),
        Commands::Best { degree } => cmd_best(&data, &settings, degree.unwrap_or(settings.best_degree)),
        Commands::Compare => {
            let (previous, _) = walkthrough::validate_model(&data, &settings)?;
            cmd_compare(&previous, &settings)
        }
        Commands::Learn => cmd_learn(&settings),
        Commands::Search { report, data: path } => {
            let (data, xs) = match path {
                Some(path) => {
                    let data = datasets::load(&path)?;
                    let xs = padded_grid(&data, settings.test_points);
                    (data, xs)
                }
                None => (data, settings.test_grid()),
            };
            cmd_search(&data, &xs, &settings, report.as_deref())
        }
        Commands::Basis => cmd_basis(&settings),
        Commands::All => {
            cmd_visualize(&data, &settings)?;
            let previous = cmd_validate(&data, &settings)?;
            cmd_best(&data, &settings, settings.best_degree)?;
            cmd_compare(&previous, &settings)?;
            cmd_learn(&settings)?;
            cmd_search(&data, &settings.test_grid(), &settings, None)?;
            cmd_basis(&settings)
        }
    }
}

/// Defaults, then the settings file, then command line overrides
fn settings(cli: &Cli) -> CmdResult<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    if let Some(samples) = cli.samples {
        settings.samples = samples;
    }
    if let Some(noise) = cli.noise {
        settings.noise = noise;
    }
    if let Some(folds) = cli.folds {
        settings.folds = folds;
    }
    if let Some(max_degree) = cli.max_degree {
        settings.max_degree = max_degree;
    }
    if let Some(output_dir) = &cli.output_dir {
        settings.output_dir.clone_from(output_dir);
    }

    settings.validate()?;
    Ok(settings)
}

fn save(figure: &Figure, settings: &Settings, name: &str) -> CmdResult {
    let path = settings.output_path(name);
    figure.render(&path)?;
    println!("Wrote plot to {}", path.display());
    Ok(())
}

fn cmd_visualize(data: &[(f64, f64)], settings: &Settings) -> CmdResult {
    let chart = walkthrough::visualize_data(data, &settings.test_grid(), &settings.preview_degrees)?;
    save(&Figure::single(chart, settings.image_size), settings, "visualize_data")
}

fn cmd_validate(data: &[(f64, f64)], settings: &Settings) -> CmdResult<DegreeCurve> {
    let (curve, chart) = walkthrough::validate_model(data, settings)?;
    save(&Figure::single(chart, settings.image_size), settings, "validation_curve")?;
    Ok(curve)
}

fn cmd_best(data: &[(f64, f64)], settings: &Settings, degree: usize) -> CmdResult {
    let (_, chart) = walkthrough::best_model(data, &settings.test_grid(), degree)?;
    save(&Figure::single(chart, settings.image_size), settings, "best_model")
}

fn cmd_compare(previous: &DegreeCurve, settings: &Settings) -> CmdResult {
    let large = datasets::make_data(settings.large_samples, settings.noise, settings.seed);
    let (_, chart) = walkthrough::compare(&large, previous, settings)?;
    save(&Figure::single(chart, settings.image_size), settings, "compare")
}

fn cmd_learn(settings: &Settings) -> CmdResult {
    let large = datasets::make_data(settings.large_samples, settings.noise, settings.seed);
    let (_, figure) = walkthrough::learning_curves(&large, settings)?;
    save(&figure, settings, "learning_curves")
}

fn cmd_search(data: &[(f64, f64)], xs: &[f64], settings: &Settings, report: Option<&Path>) -> CmdResult {
    let (result, chart) = walkthrough::grid_search(data, xs, settings)?;

    println!("Best parameters: {}", result.best_params_string());
    if let Some(estimator) = &result.best_estimator {
        println!("Best estimator: {estimator}");
    }

    if let Some(path) = report {
        result.to_report().save(path)?;
        println!("Wrote report to {}", path.display());
    }

    save(&Figure::single(chart, settings.image_size), settings, "grid_search")
}

fn cmd_basis(settings: &Settings) -> CmdResult {
    let demo = walkthrough::basis_functions(settings)?;
    println!("{}", walkthrough::format_matrix(&demo.expansion));
    save(&Figure::single(demo.chart, settings.image_size), settings, "basis_functions")
}

/// Evaluation grid spanning the data with 10% of its width on each side
fn padded_grid(data: &[(f64, f64)], n: usize) -> Vec<f64> {
    let Some(range) = data.x_range() else {
        return Vec::new();
    };

    let pad = (range.end - range.start) * 0.1;
    linspace(range.start - pad, range.end + pad, n)
}
