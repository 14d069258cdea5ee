use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::Result;

/// Model, ktorý sa dá natrénovať na podmnožine stĺpcov.
///
/// `fit` berie `&self`, aby sa foldy mohli trénovať súbežne z jednej
/// inštancie; parametre sa menia cez `set_param` pred behom.
pub trait IModel: Send + Sync
{
    fn get_name(&self) -> &str;

    fn get_supported_params(&self) -> Vec<&str>;

    fn set_param(&mut self, key: &str, value: &str) -> Result<()>;

    fn fit(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Box<dyn TrainedModel>>;
}

/// Natrénovaný model z `IModel::fit`.
pub trait TrainedModel: Send
{
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>>;
}

pub mod factory;
pub mod knn;
pub mod linreg;
pub mod logreg;
pub mod tree;

pub use factory::ModelFactory;
pub use knn::KnnWrapper;
pub use linreg::LinRegWrapper;
pub use logreg::LogRegWrapper;
pub use tree::TreeWrapper;
