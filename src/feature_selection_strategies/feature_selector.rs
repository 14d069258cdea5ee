use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{Result, SpsaError};

pub trait FeatureSelector
{
    fn get_name(&self) -> &str;
    fn get_selected_indices(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Vec<usize>>;
    fn get_supported_params(&self) -> Vec<&str>;
    fn set_param(&mut self, key: &str, value: &str) -> Result<()>;

    fn select_features(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<DenseMatrix<f64>> {
        let indices = self.get_selected_indices(x, y)?;
        self.extract_columns(x, &indices)
    }

    /// Skóre features v poradí dôležitosti, ak ich selektor pozná.
    fn get_feature_scores(&self, _x: &DenseMatrix<f64>, _y: &[f64]) -> Result<Option<Vec<(usize, f64)>>> {
        Ok(None)
    }

    fn get_metric_name(&self) -> &str {
        "Score"
    }

    /// HTML so zhrnutím posledného výberu, prázdny string ak nie je k dispozícii.
    fn get_selection_details(&self) -> String {
        String::new()
    }

    fn extract_columns(&self, x: &DenseMatrix<f64>, indices: &[usize]) -> Result<DenseMatrix<f64>> {
        let (rows, cols) = x.shape();
        if let Some(&bad) = indices.iter().find(|&&i| i >= cols) {
            return Err(SpsaError::data(format!("stĺpec {} mimo 0..{}", bad, cols)));
        }
        let mut data = vec![vec![0.0; indices.len()]; rows];

        for (new_col, &old_col) in indices.iter().enumerate() {
            for (row, values) in data.iter_mut().enumerate() {
                values[new_col] = *x.get((row, old_col));
            }
        }

        DenseMatrix::from_2d_vec(&data).map_err(|e| SpsaError::data(format!("{:?}", e)))
    }
}
