use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::distance::euclidian::Euclidian;
use smartcore::neighbors::knn_regressor::{KNNRegressor, KNNRegressorParameters};

use super::{IModel, TrainedModel};
use crate::error::{Result, SpsaError};

pub struct KnnWrapper
{
    k: usize,
}

impl KnnWrapper
{
    pub fn new() -> Self
    {
        Self { k: 5 }
    }
}

impl Default for KnnWrapper
{
    fn default() -> Self
    {
        Self::new()
    }
}

struct TrainedKnn(KNNRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>, Euclidian<f64>>);

impl TrainedModel for TrainedKnn
{
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>>
    {
        self.0.predict(x).map_err(|e| SpsaError::model(format!("{:?}", e)))
    }
}

impl IModel for KnnWrapper
{
    fn get_name(&self) -> &str { "K-Nearest Neighbors" }

    fn get_supported_params(&self) -> Vec<&str>
    {
        vec!["k"]
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()>
    {
        match key {
            "k" => {
                let new_k = value
                    .parse::<usize>()
                    .map_err(|_| SpsaError::config("K musí byť celé číslo"))?;
                if new_k == 0 {
                    return Err(SpsaError::config("K musí byť aspoň 1"));
                }
                self.k = new_k;
                Ok(())
            }
            _ => Err(SpsaError::config(format!("Neznámy parameter {} pre KNN", key))),
        }
    }

    fn fit(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Box<dyn TrainedModel>>
    {
        let params = KNNRegressorParameters::default().with_k(self.k);
        let model = KNNRegressor::fit(x, &y.to_vec(), params)
            .map_err(|e| SpsaError::model(format!("{:?}", e)))?;
        Ok(Box::new(TrainedKnn(model)))
    }
}
