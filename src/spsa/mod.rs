//! SPSA optimalizácia nad výberom (FSR) a váhami (FSW) features.

pub mod cancel;
pub mod convergence;
pub mod gain;
pub mod gradient;
pub mod kernel;
pub mod perturbation;
pub mod projector;
pub mod random_stream;
pub mod ranker;
pub mod runner;
pub mod update;

pub use cancel::{CancelToken, RunBudget};
pub use convergence::{ConvergenceController, IterationRecord, TrailingWindow};
pub use gain::{BarzilaiBorweinGain, GainPair, GainScheduler, StepGain};
pub use gradient::GradientEstimate;
pub use kernel::{BestIterate, IterationSummary, RunDiagnostics, RunOutcome, RunStatus, SpsaKernel};
pub use perturbation::PerturbationGenerator;
pub use projector::{Projection, Projector};
pub use random_stream::RandomStream;
pub use ranker::{Decision, OutputRanker};
pub use runner::{SpsaRanking, SpsaWeighting};
pub use update::UpdateEngine;
