pub mod feature_selector;
pub mod spsa_selector_base;
pub mod spsa_ranking_selector;
pub mod spsa_weighting_selector;
pub mod factory;

pub use feature_selector::FeatureSelector;
pub use spsa_ranking_selector::SpsaRankingSelector;
pub use spsa_weighting_selector::SpsaWeightingSelector;
pub use factory::FeatureSelectorFactory;
