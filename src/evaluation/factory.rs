use super::metrics::{
    ErrorMetric, MeanAbsoluteError, MeanSquaredError, Misclassification, OneMinusR2, RootMeanSquaredError,
};
use crate::error::{Result, SpsaError};

/// Factory pre chybové metriky podľa názvu
pub struct MetricFactory;

impl MetricFactory {
    pub fn create(name: &str) -> Result<Box<dyn ErrorMetric>> {
        match name {
            "mse" | "mean_squared_error" => Ok(Box::new(MeanSquaredError)),
            "mae" | "mean_absolute_error" => Ok(Box::new(MeanAbsoluteError)),
            "rmse" => Ok(Box::new(RootMeanSquaredError)),
            "misclassification" | "error_rate" => Ok(Box::new(Misclassification)),
            "one_minus_r2" => Ok(Box::new(OneMinusR2)),
            _ => Err(SpsaError::config(format!("Neznáma metrika: {}", name))),
        }
    }

    pub fn available() -> Vec<&'static str> {
        vec!["mse", "mae", "rmse", "misclassification", "one_minus_r2"]
    }

    pub fn get_description(name: &str) -> Option<&'static str> {
        match name {
            "mse" => Some("Stredná kvadratická chyba (regresia)"),
            "mae" => Some("Stredná absolútna chyba (regresia)"),
            "rmse" => Some("Odmocnina MSE, v jednotkách y"),
            "misclassification" => Some("Podiel zle klasifikovaných vzoriek (1 - accuracy)"),
            "one_minus_r2" => Some("1 - R², 0 pre dokonalý fit"),
            _ => None,
        }
    }

    /// Typ úlohy, pre ktorú má metrika zmysel (classification/regression)
    pub fn get_metric_type(name: &str) -> Option<&'static str> {
        match name {
            "misclassification" => Some("classification"),
            "mse" | "mae" | "rmse" | "one_minus_r2" => Some("regression"),
            _ => None,
        }
    }
}
