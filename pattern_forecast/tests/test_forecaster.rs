use approx::assert_relative_eq;
use pattern_forecast::error::ForecastError;
use pattern_forecast::forecaster::Forecaster;
use pattern_forecast::models::{ForecastModel, RuleTrainer, TrainedForecastModel};
use pattern_forecast::series::EncodedSeries;
use series_math::{MathError, State};

const PRICES: [f64; 6] = [100.0, 102.0, 101.0, 105.0, 103.0, 108.0];

#[test]
fn test_end_to_end_scenario() {
    let series = EncodedSeries::encode(&PRICES, 0.0).unwrap();
    assert_eq!(series.len(), 5);
    assert_eq!(
        series.states(),
        &[State::Up, State::Down, State::Up, State::Down, State::Up]
    );

    let model = RuleTrainer::new(1, 1.0)
        .unwrap()
        .train(&series.states()[..3], &series.returns()[..3])
        .unwrap();
    let result = Forecaster::new().walk_forward(&series, &model, 3).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.actual_prices, vec![103.0, 108.0]);

    // After Up the only observed next state was Down
    let first_state = model.predict_state(&series.states()[2..3]);
    assert_eq!(first_state, State::Down);
    assert_relative_eq!(
        result.predicted_prices[0],
        PRICES[3] * model.predicted_return(first_state).exp(),
        epsilon = 1e-12
    );
    assert_relative_eq!(result.predicted_prices[0], 105.0 * 101.0 / 102.0, epsilon = 1e-9);

    // After Down the only observed next state was Up
    let up_mean = ((102.0f64 / 100.0).ln() + (105.0f64 / 101.0).ln()) / 2.0;
    assert_relative_eq!(result.predicted_returns[1], up_mean, epsilon = 1e-12);

    let metrics = result.metrics;
    for value in [metrics.mae, metrics.mse, metrics.rmse, metrics.mape_percent] {
        assert!(value.is_finite());
        assert!(value >= 0.0);
    }
    assert_relative_eq!(metrics.rmse, metrics.mse.sqrt(), epsilon = 1e-12);
}

#[test]
fn test_flat_series_has_zero_error() {
    let series = EncodedSeries::encode(&[50.0; 12], 0.0).unwrap();
    assert!(series.returns().iter().all(|&r| r == 0.0));
    assert!(series.states().iter().all(|&s| s == State::Neutral));

    let result = Forecaster::new().train_and_forecast(&series, 8, 2, 1.0).unwrap();

    assert!(result.predicted_prices.iter().all(|&p| p == 50.0));
    assert_eq!(result.metrics.mae, 0.0);
    assert_eq!(result.metrics.mse, 0.0);
    assert_eq!(result.metrics.rmse, 0.0);
    assert_eq!(result.metrics.mape_percent, 0.0);
}

#[test]
fn test_non_positive_price_fails_before_encoding() {
    for prices in [[100.0, 0.0, 101.0], [100.0, -3.0, 101.0]] {
        match EncodedSeries::encode(&prices, 0.0) {
            Err(ForecastError::MathError(MathError::InvalidInput(message))) => {
                assert!(message.contains("index 1"), "{}", message);
            }
            other => panic!("Expected invalid input, got {:?}", other),
        }
    }
}

#[test]
fn test_predictions_never_reanchor() {
    let prices: Vec<f64> = (0..40).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
    let series = EncodedSeries::encode(&prices, 0.01).unwrap();
    let train = 25;

    let result = Forecaster::new().train_and_forecast(&series, train, 3, 1.0).unwrap();

    let mut expected = prices[train];
    for (predicted, &r) in result.predicted_prices.iter().zip(result.predicted_returns.iter()) {
        expected *= r.exp();
        assert_relative_eq!(*predicted, expected, epsilon = 1e-9);
    }
    assert_eq!(result.actual_prices, prices[train + 1..].to_vec());
    assert_eq!(result.actual_returns, series.returns()[train..].to_vec());
}

#[test]
fn test_training_uses_prefix_only() {
    let prices = [100.0, 101.0, 102.0, 103.0, 104.0, 90.0, 80.0, 70.0];
    let series = EncodedSeries::encode(&prices, 0.0).unwrap();

    let result = Forecaster::new().train_and_forecast(&series, 4, 1, 1.0).unwrap();

    // Only rising returns were seen, so every step predicts the mean rise
    let up_mean = (104.0f64 / 100.0).ln() / 4.0;
    for &r in &result.predicted_returns {
        assert_relative_eq!(r, up_mean, epsilon = 1e-12);
    }
}
