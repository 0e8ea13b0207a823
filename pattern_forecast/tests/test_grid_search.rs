use pattern_forecast::error::ForecastError;
use pattern_forecast::forecaster::Forecaster;
use pattern_forecast::grid_search::{train_returns_count, GridSearch};
use pattern_forecast::models::MAX_PACKED_MEMORY;
use pattern_forecast::series::EncodedSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::sync::atomic::AtomicBool;

fn random_walk(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0005, 0.01).unwrap();
    let mut price = 100.0;

    (0..len)
        .map(|_| {
            price *= f64::exp(normal.sample(&mut rng));
            price
        })
        .collect()
}

#[test]
fn test_flat_series_tie_keeps_smallest_depth() {
    let series = EncodedSeries::encode(&[25.0; 30], 0.0).unwrap();
    let train = train_returns_count(series.len(), 70.0).unwrap();

    let outcome = GridSearch::new(5, 1.0).unwrap().run(&series, train).unwrap();

    assert_eq!(outcome.scores.len(), 5);
    assert!(outcome.scores.iter().all(|s| s.rmse == 0.0));
    assert_eq!(outcome.best.memory, 1);
}

#[test]
fn test_best_has_minimal_rmse_and_first_on_ties() {
    for seed in 0..5 {
        let prices = random_walk(seed, 250);
        let series = EncodedSeries::encode(&prices, 0.002).unwrap();
        let train = train_returns_count(series.len(), 70.0).unwrap();

        let outcome = GridSearch::new(6, 1.0).unwrap().run(&series, train).unwrap();
        let min_rmse = outcome
            .scores
            .iter()
            .map(|s| s.rmse)
            .fold(f64::INFINITY, f64::min);
        let first_min = outcome
            .scores
            .iter()
            .find(|s| s.rmse == min_rmse)
            .map(|s| s.memory)
            .unwrap();

        assert_eq!(outcome.best.metrics.rmse, min_rmse);
        assert_eq!(outcome.best.memory, first_min);
        assert_eq!(
            outcome.scores.iter().map(|s| s.memory).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6]
        );
    }
}

#[test]
fn test_scores_match_individual_runs() {
    let prices = random_walk(42, 120);
    let series = EncodedSeries::encode(&prices, 0.002).unwrap();
    let train = train_returns_count(series.len(), 70.0).unwrap();

    let outcome = GridSearch::new(4, 0.5).unwrap().run(&series, train).unwrap();

    for score in &outcome.scores {
        let single = Forecaster::new()
            .train_and_forecast(&series, train, score.memory, 0.5)
            .unwrap();
        assert_eq!(single.metrics.rmse, score.rmse);
        assert_eq!(single.metrics.mape_percent, score.mape_percent);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let prices = random_walk(9, 400);
    let series = EncodedSeries::encode(&prices, 0.001).unwrap();
    let train = train_returns_count(series.len(), 60.0).unwrap();

    let sequential = GridSearch::new(8, 1.0).unwrap().run(&series, train).unwrap();
    let parallel = GridSearch::new(8, 1.0)
        .unwrap()
        .parallel(true)
        .run(&series, train)
        .unwrap();

    assert_eq!(sequential.scores, parallel.scores);
    assert_eq!(sequential.best, parallel.best);
}

#[test]
fn test_depths_limited_by_training_size() {
    let prices = [10.0, 10.5, 10.2, 10.8, 10.6, 11.0];
    let series = EncodedSeries::encode(&prices, 0.0).unwrap();

    let outcome = GridSearch::new(10, 1.0).unwrap().run(&series, 3).unwrap();

    assert_eq!(outcome.scores.len(), 2);
}

#[test]
fn test_no_depth_fits() {
    let series = EncodedSeries::encode(&[10.0, 11.0, 12.0, 13.0], 0.0).unwrap();

    // With one training return no depth m >= 1 satisfies m < train
    assert!(matches!(
        GridSearch::new(3, 1.0).unwrap().run(&series, 1),
        Err(ForecastError::SearchExhausted(_))
    ));
}

#[test]
fn test_cancellation_stops_search() {
    let prices = random_walk(1, 100);
    let series = EncodedSeries::encode(&prices, 0.002).unwrap();
    let cancel = AtomicBool::new(true);

    for parallel in [false, true] {
        let result = GridSearch::new(4, 1.0)
            .unwrap()
            .parallel(parallel)
            .run_cancellable(&series, 70, &cancel);
        assert!(matches!(result, Err(ForecastError::Cancelled)));
    }
}

#[test]
fn test_random_walk_forecasts_are_well_formed() {
    for seed in 10..15 {
        let prices = random_walk(seed, 180);
        let series = EncodedSeries::encode(&prices, 0.003).unwrap();
        let train = train_returns_count(series.len(), 75.0).unwrap();

        let outcome = GridSearch::new(5, 1.0).unwrap().run(&series, train).unwrap();
        let best = &outcome.best;

        assert_eq!(best.len(), series.len() - train);
        assert_eq!(best.actual_prices, prices[train + 1..].to_vec());
        assert!(best.predicted_prices.iter().all(|p| p.is_finite() && *p > 0.0));
        assert!(best.metrics.rmse >= 0.0 && best.metrics.mae <= best.metrics.rmse + 1e-12);
    }
}

#[test]
fn test_depths_beyond_packing_limit_are_searched() {
    let prices = random_walk(21, 400);
    let series = EncodedSeries::encode(&prices, 0.002).unwrap();
    let max_memory = MAX_PACKED_MEMORY + 6;

    let outcome = GridSearch::new(max_memory, 1.0).unwrap().run(&series, 280).unwrap();

    assert_eq!(outcome.scores.len(), max_memory);
    assert_eq!(outcome.scores.last().unwrap().memory, max_memory);
    assert!(outcome.scores.iter().all(|s| s.rmse.is_finite()));
}

#[test]
fn test_split_forms_fraction_before_scaling() {
    // 45 * (70 / 100) sits just below 31.5
    assert_eq!(train_returns_count(45, 70.0).unwrap(), 31);
    assert_eq!(train_returns_count(85, 70.0).unwrap(), 59);
}
