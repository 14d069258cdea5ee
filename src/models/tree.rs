use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{DecisionTreeRegressor, DecisionTreeRegressorParameters};

use super::{IModel, TrainedModel};
use crate::error::{Result, SpsaError};

pub struct TreeWrapper
{
    max_depth: u16,
    min_samples_split: usize,
}

impl TreeWrapper
{
    pub fn new() -> Self
    {
        Self
        {  //Default
            max_depth: 10,
            min_samples_split: 2,
        }
    }
}

impl Default for TreeWrapper
{
    fn default() -> Self
    {
        Self::new()
    }
}

struct TrainedTree(DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>);

impl TrainedModel for TrainedTree
{
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>>
    {
        self.0.predict(x).map_err(|e| SpsaError::model(format!("{:?}", e)))
    }
}

impl IModel for TreeWrapper
{
    fn get_name(&self) -> &str
    {
        "Decision Tree"
    }

    fn get_supported_params(&self) -> Vec<&str>
    {
        vec!["max_depth", "min_samples_split"]
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()>
    {
        match key
        {
            "max_depth" =>
            {
                self.max_depth = value.parse().map_err(|_| SpsaError::config("Neplatná hĺbka"))?;
                Ok(())
            }
            "min_samples_split" =>
            {
                self.min_samples_split = value
                    .parse()
                    .map_err(|_| SpsaError::config("Neplatná hodnota min_samples_split"))?;
                Ok(())
            }
            _ => Err(SpsaError::config(format!("Parameter {} neexistuje", key)))
        }
    }

    fn fit(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Box<dyn TrainedModel>>
    {
        let params = DecisionTreeRegressorParameters::default()
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split);

        let model = DecisionTreeRegressor::fit(x, &y.to_vec(), params)
            .map_err(|e| SpsaError::model(format!("{:?}", e)))?;
        Ok(Box::new(TrainedTree(model)))
    }
}
