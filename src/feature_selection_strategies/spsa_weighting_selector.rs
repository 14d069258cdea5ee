use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::spsa_selector_base::SpsaSelectorBase;
use super::FeatureSelector;
use crate::config::{Algorithm, RunConfig};
use crate::error::{Result, SpsaError};
use crate::evaluation::ErrorMetric;
use crate::models::IModel;
use crate::spsa::{Decision, RunBudget, RunOutcome};

/// SPSA-FSW ako feature selektor: váhy features, `select_features` vráti
/// stĺpce s nenulovou váhou už prenásobené váhou.
pub struct SpsaWeightingSelector
{
    base: SpsaSelectorBase,
}

impl SpsaWeightingSelector
{
    pub fn new() -> Self
    {
        Self { base: SpsaSelectorBase::new(Algorithm::Weighting) }
    }

    pub fn with_config(mut self, config: RunConfig) -> Self
    {
        self.base.set_config(config);
        self
    }

    pub fn with_model(mut self, name: &str, model: Box<dyn IModel>) -> Self
    {
        self.base.set_model(name, model);
        self
    }

    pub fn with_metric(mut self, metric: Box<dyn ErrorMetric>) -> Self
    {
        self.base.set_metric(metric);
        self
    }

    pub fn with_budget(mut self, budget: RunBudget) -> Self
    {
        self.base.set_budget(budget);
        self
    }

    pub fn config(&self) -> &RunConfig
    {
        self.base.config()
    }

    pub fn last_outcome(&self) -> Option<RunOutcome>
    {
        self.base.last_outcome()
    }

    /// Váha pre každý stĺpec v pôvodnom poradí.
    pub fn get_weights(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Vec<f64>>
    {
        let (_, cols) = x.shape();
        let mut weights = vec![0.0; cols];
        if let Decision::Weighting { weights: table, .. } = self.base.outcome(x, y)?.decision {
            for (i, w) in table {
                weights[i] = w;
            }
        }
        Ok(weights)
    }
}

impl Default for SpsaWeightingSelector
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl FeatureSelector for SpsaWeightingSelector
{
    fn get_name(&self) -> &str
    {
        "SPSA Feature Weighting"
    }

    fn get_supported_params(&self) -> Vec<&str>
    {
        self.base.supported_params()
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()>
    {
        self.base.set_param(key, value)
    }

    fn get_selected_indices(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Vec<usize>>
    {
        Ok(self.base.outcome(x, y)?.decision.selected().to_vec())
    }

    fn select_features(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<DenseMatrix<f64>>
    {
        let weights = self.get_weights(x, y)?;
        let indices: Vec<usize> = (0..weights.len()).filter(|&i| weights[i] > 0.0).collect();
        let (rows, _) = x.shape();
        let data: Vec<Vec<f64>> = (0..rows)
            .map(|r| indices.iter().map(|&c| *x.get((r, c)) * weights[c]).collect())
            .collect();
        DenseMatrix::from_2d_vec(&data).map_err(|e| SpsaError::data(format!("{:?}", e)))
    }

    fn get_feature_scores(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Option<Vec<(usize, f64)>>>
    {
        Ok(Some(self.base.outcome(x, y)?.decision.feature_scores()))
    }

    fn get_metric_name(&self) -> &str
    {
        "Váha"
    }

    fn get_selection_details(&self) -> String
    {
        self.base.details_html("SPSA-FSW")
    }
}
