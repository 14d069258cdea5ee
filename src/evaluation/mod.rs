pub mod evaluator;
pub mod factory;
pub mod metrics;
pub mod objective;
pub mod splitter;

pub use evaluator::CrossValidatedObjective;
pub use factory::MetricFactory;
pub use metrics::{
    ErrorMetric, MeanAbsoluteError, MeanSquaredError, Misclassification, OneMinusR2, RootMeanSquaredError,
};
pub use objective::{FnObjective, GuardedObjective, Objective, ObjectiveResult};
pub use splitter::{CvSplitter, Fold, KFold, StratifiedKFold};
