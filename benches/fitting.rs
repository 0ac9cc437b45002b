use criterion::{criterion_group, criterion_main, Criterion};
use polytune::{
    datasets,
    estimator::Estimator,
    model_selection::{cross_val_score, validation_curve, GridSearch, KFold, ParamGrid},
    score::Scoring,
    PolynomialParam, PolynomialRegression,
};
use std::hint::black_box;

fn fit(data: &[(f64, f64)], degree: usize) -> PolynomialRegression {
    let mut model = PolynomialRegression::new(degree);
    model.fit(data).expect("Failed to fit data");
    model
}

fn criterion_benchmark(c: &mut Criterion) {
    //
    // First we test how the solver scales with data size
    println!("Benchmarking fit vs n (Degree=3)...");
    test_linear_criterion_group(
        c,
        "fit_vs_n",
        &[
            CriterionTestEntry::new("n=100", 1e2, datasets::make_data(100, 1.0, 1)),
            CriterionTestEntry::new("n=1_000", 1e3, datasets::make_data(1_000, 1.0, 1)),
            CriterionTestEntry::new("n=10_000", 1e4, datasets::make_data(10_000, 1.0, 1)),
            CriterionTestEntry::new("n=100_000", 1e5, datasets::make_data(100_000, 1.0, 1)),
        ],
        |b, data| b.iter(|| fit(black_box(data), 3)),
    );

    //
    // Now the same but scaling with degree
    println!("Benchmarking fit vs degree (n=1000)...");
    let samples = datasets::make_data(1_000, 1.0, 1);
    let mut group = c.benchmark_group("fit_vs_degree");
    for degree in [1, 2, 3, 5, 10, 20] {
        group.bench_with_input(format!("Degree={degree}"), &degree, |b, &degree| {
            b.iter(|| fit(black_box(&samples), degree));
        });
    }
    group.finish();

    //
    // Cross-validation on the tutorial sized datasets
    println!("Benchmarking model selection (n=40, 7 folds)...");
    let samples = datasets::make_data(40, 1.0, 1);
    let cv = KFold::new(7);
    let mut group = c.benchmark_group("model_selection");
    group.bench_function("cross_val_score", |b| {
        b.iter(|| cross_val_score(&PolynomialRegression::new(3), black_box(&samples), &cv, Scoring::R2))
    });
    group.bench_function("validation_curve", |b| {
        let degrees = PolynomialParam::degrees(0..=20);
        b.iter(|| {
            validation_curve(
                &PolynomialRegression::new(2),
                black_box(&samples),
                &degrees,
                &cv,
                Scoring::R2,
            )
        })
    });
    group.bench_function("grid_search", |b| {
        let grid = ParamGrid::polynomial(20);
        let search = GridSearch::new(cv);
        b.iter(|| search.fit(&PolynomialRegression::new(2), black_box(&samples), &grid))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn get_data_for_run<V>(group_id: &str, tests: &[CriterionTestEntry<V>]) -> Vec<(f64, f64)> {
    // Each test corresponds to a different x value in the series
    tests
        .iter()
        .filter_map(|test| {
            let y = get_sample_for_run(group_id, &test.id)?;
            Some((test.x, y))
        })
        .collect()
}

fn get_sample_for_run(group_id: &str, test_id: &str) -> Option<f64> {
    #[derive(serde::Deserialize)]
    struct CriterionSamples {
        iters: Vec<f64>,
        times: Vec<f64>,
    }

    let raw = std::fs::read_to_string(format!(
        "target/criterion/{group_id}/{test_id}/new/sample.json"
    ))
    .ok()?;
    let samples: CriterionSamples = serde_json::from_str(&raw).ok()?;

    let per_iter: Vec<f64> = samples
        .iters
        .iter()
        .zip(samples.times.iter())
        .map(|(i, t)| t / i)
        .collect();
    Some(polytune::statistics::mean(per_iter.into_iter()))
}

struct CriterionTestEntry<V> {
    id: String,
    x: f64,
    values: V,
}
impl<V> CriterionTestEntry<V> {
    pub fn new(id: &str, x: f64, values: V) -> Self {
        Self {
            id: id.to_string(),
            x,
            values,
        }
    }
}

fn test_linear_criterion_group<F, V>(
    c: &mut Criterion,
    id: &str,
    samples: &[CriterionTestEntry<V>],
    runner: F,
) where
    for<'a, 'b, 'c> F: Fn(&'a mut criterion::Bencher<'b>, &'c V),
{
    let mut group = c.benchmark_group(id);
    for sample in samples {
        group.bench_with_input(&sample.id, &sample.values, &runner);
    }
    group.finish();

    //
    // Time per fit should grow linearly with n
    let data = get_data_for_run(id, samples);
    if data.len() > 2 {
        let linear = fit(&data, 1);
        let r2 = linear.score(&data, Scoring::R2).unwrap_or(f64::NAN);
        println!("{id}: linear scaling R² = {r2:.4}");
    }
}
