use smartcore::linalg::basic::matrix::DenseMatrix;

use super::spsa_selector_base::SpsaSelectorBase;
use super::FeatureSelector;
use crate::config::{Algorithm, RunConfig};
use crate::error::Result;
use crate::evaluation::ErrorMetric;
use crate::models::IModel;
use crate::spsa::{RunBudget, RunOutcome};

/// SPSA-FSR ako feature selektor: podmnožina features s najnižšou CV chybou
/// zvoleného modelu, poradie podľa θ̄.
pub struct SpsaRankingSelector
{
    base: SpsaSelectorBase,
}

impl SpsaRankingSelector
{
    pub fn new() -> Self
    {
        Self { base: SpsaSelectorBase::new(Algorithm::Ranking) }
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

    /// Celý výsledok posledného behu (diagnostika, θ̄, stav).
    pub fn last_outcome(&self) -> Option<RunOutcome>
    {
        self.base.last_outcome()
    }
}

impl Default for SpsaRankingSelector
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl FeatureSelector for SpsaRankingSelector
{
    fn get_name(&self) -> &str
    {
        "SPSA Feature Selection & Ranking"
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

    fn get_feature_scores(&self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<Option<Vec<(usize, f64)>>>
    {
        Ok(Some(self.base.outcome(x, y)?.decision.feature_scores()))
    }

    fn get_metric_name(&self) -> &str
    {
        "Pravdepodobnosť výberu (θ̄)"
    }

    fn get_selection_details(&self) -> String
    {
        self.base.details_html("SPSA-FSR")
    }
}
