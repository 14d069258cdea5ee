use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters, LinearRegressionSolverName};

use super::{IModel, TrainedModel};
use crate::error::{Result, SpsaError};

pub struct LinRegWrapper
{
    solver: String,
}

impl LinRegWrapper
{
    pub fn new() -> Self
    {
        Self { solver: "qr".to_string() }
    }
}

impl Default for LinRegWrapper
{
    fn default() -> Self
    {
        Self::new()
    }
}

struct TrainedLinReg(LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>);

impl TrainedModel for TrainedLinReg
{
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>>
    {
        self.0.predict(x).map_err(|e| SpsaError::model(format!("{:?}", e)))
    }
}

impl IModel for LinRegWrapper
{
    fn get_name(&self) -> &str { "Lineárna Regresia" }

    fn get_supported_params(&self) -> Vec<&str>
    {
        vec!["solver"]
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()>
    {
        match key {
            "solver" => {
                if value == "qr" || value == "svd"
                {
                    self.solver = value.to_string();
                    Ok(())
                } else {
                    Err(SpsaError::config("Podporované solver-y sú: qr, svd"))
                }
            }
            _ => Err(SpsaError::config(format!("Parameter {} neexistuje", key)))
        }
    }

    fn fit(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Box<dyn TrainedModel>>
    {
        let solver = match self.solver.as_str()
        {
            "svd" => LinearRegressionSolverName::SVD,
            _ => LinearRegressionSolverName::QR,
        };
        let params = LinearRegressionParameters::default().with_solver(solver);

        let model = LinearRegression::fit(x, &y.to_vec(), params)
            .map_err(|e| SpsaError::model(format!("{:?}", e)))?;
        Ok(Box::new(TrainedLinReg(model)))
    }
}
