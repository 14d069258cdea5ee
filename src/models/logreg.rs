use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};

use super::{IModel, TrainedModel};
use crate::error::{Result, SpsaError};

pub struct LogRegWrapper {
    alpha: f64,
}

impl LogRegWrapper {
    pub fn new() -> Self {
        Self { alpha: 0.0 }
    }
}

impl Default for LogRegWrapper {
    fn default() -> Self {
        Self::new()
    }
}

struct TrainedLogReg(LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>);

impl TrainedModel for TrainedLogReg {
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>> {
        let labels = self.0.predict(x).map_err(|e| SpsaError::model(format!("{:?}", e)))?;
        Ok(labels.into_iter().map(f64::from).collect())
    }
}

impl IModel for LogRegWrapper {
    fn get_name(&self) -> &str { "Logistická Regresia (Klasifikácia)" }

    fn get_supported_params(&self) -> Vec<&str> {
        vec!["alpha"]
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "alpha" => {
                let alpha: f64 = value
                    .parse()
                    .map_err(|_| SpsaError::config("Alpha musí byť desatinné číslo"))?;
                if alpha < 0.0 {
                    return Err(SpsaError::config("Alpha nesmie byť záporná"));
                }
                self.alpha = alpha;
                Ok(())
            }
            _ => Err(SpsaError::config(format!("Parameter {} neexistuje", key)))
        }
    }

    fn fit(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Box<dyn TrainedModel>> {
        // smartcore očakáva celočíselné labely tried
        let labels: Vec<i32> = y.iter().map(|v| v.round() as i32).collect();
        let params = LogisticRegressionParameters::default().with_alpha(self.alpha);

        let model = LogisticRegression::fit(x, &labels, params)
            .map_err(|e| SpsaError::model(format!("{:?}", e)))?;
        Ok(Box::new(TrainedLogReg(model)))
    }
}
