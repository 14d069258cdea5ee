//! Výber, poradie a váhovanie features pomocou SPSA nad krížovo validovanou
//! chybou modelu.
//!
//! Dva algoritmy nad spoločným jadrom:
//! - FSR ([`SpsaRanking`]) hľadá podmnožinu features a ich poradie,
//! - FSW ([`SpsaWeighting`]) hľadá nezáporné váhy features.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod feature_selection_strategies;
pub mod models;
pub mod spsa;

pub use config::{Algorithm, GainConfig, GainKind, RunConfig, RunConfigBuilder};
pub use error::{Result, SpsaError};
pub use evaluation::{CrossValidatedObjective, ErrorMetric, FnObjective, MetricFactory, Objective, ObjectiveResult};
pub use feature_selection_strategies::{
    FeatureSelector, FeatureSelectorFactory, SpsaRankingSelector, SpsaWeightingSelector,
};
pub use models::{IModel, KnnWrapper, LinRegWrapper, LogRegWrapper, ModelFactory, TrainedModel, TreeWrapper};
pub use spsa::{
    CancelToken, Decision, Projection, RunBudget, RunDiagnostics, RunOutcome, RunStatus, SpsaRanking, SpsaWeighting,
};
