use smartcore::metrics::{mean_absolute_error, mean_squared_error, r2};

/// Chybová metrika, nižšia hodnota = lepší model.
pub trait ErrorMetric: Send + Sync {
    fn get_name(&self) -> &str;

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64;
}

pub struct MeanSquaredError;
pub struct MeanAbsoluteError;
pub struct RootMeanSquaredError;
/// 1 − accuracy, triedy sa porovnávajú po zaokrúhlení
pub struct Misclassification;
/// 1 − R²
pub struct OneMinusR2;

impl ErrorMetric for MeanSquaredError {
    fn get_name(&self) -> &str {
        "mse"
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64 {
        mean_squared_error(&y_true.to_vec(), &y_pred.to_vec())
    }
}

impl ErrorMetric for MeanAbsoluteError {
    fn get_name(&self) -> &str {
        "mae"
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64 {
        mean_absolute_error(&y_true.to_vec(), &y_pred.to_vec())
    }
}

impl ErrorMetric for RootMeanSquaredError {
    fn get_name(&self) -> &str {
        "rmse"
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64 {
        mean_squared_error(&y_true.to_vec(), &y_pred.to_vec()).sqrt()
    }
}

impl ErrorMetric for Misclassification {
    fn get_name(&self) -> &str {
        "misclassification"
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64 {
        if y_true.is_empty() {
            return f64::NAN;
        }
        let wrong = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| (t.round() - p.round()).abs() > 0.1)
            .count();
        wrong as f64 / y_true.len() as f64
    }
}

impl ErrorMetric for OneMinusR2 {
    fn get_name(&self) -> &str {
        "one_minus_r2"
    }

    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64 {
        1.0 - r2(&y_true.to_vec(), &y_pred.to_vec())
    }
}
