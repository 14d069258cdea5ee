use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::cancel::RunBudget;
use super::kernel::{RunOutcome, SpsaKernel};
use super::random_stream::RandomStream;
use crate::config::{Algorithm, RunConfig};
use crate::error::{Result, SpsaError};
use crate::evaluation::{CrossValidatedObjective, CvSplitter, ErrorMetric, KFold, Objective, StratifiedKFold};
use crate::models::IModel;

/// SPSA-FSR: výber a poradie features.
pub struct SpsaRanking;

/// SPSA-FSW: váhy features.
pub struct SpsaWeighting;

impl SpsaRanking {
    pub fn run(
        x: &DenseMatrix<f64>,
        y: &[f64],
        model: &dyn IModel,
        metric: &dyn ErrorMetric,
        config: &RunConfig,
        budget: &RunBudget,
    ) -> Result<RunOutcome> {
        run_on_dataset(Algorithm::Ranking, x, y, model, metric, config, budget)
    }

    /// Beh nad vlastnou objective funkciou (bez CV).
    pub fn run_with_objective(p: usize, objective: &dyn Objective, config: &RunConfig, budget: &RunBudget) -> Result<RunOutcome> {
        config.validate(p, Algorithm::Ranking)?;
        SpsaKernel::new(config, Algorithm::Ranking, p).run(RandomStream::new(config.seed), objective, budget)
    }
}

impl SpsaWeighting {
    pub fn run(
        x: &DenseMatrix<f64>,
        y: &[f64],
        model: &dyn IModel,
        metric: &dyn ErrorMetric,
        config: &RunConfig,
        budget: &RunBudget,
    ) -> Result<RunOutcome> {
        run_on_dataset(Algorithm::Weighting, x, y, model, metric, config, budget)
    }

    pub fn run_with_objective(p: usize, objective: &dyn Objective, config: &RunConfig, budget: &RunBudget) -> Result<RunOutcome> {
        config.validate(p, Algorithm::Weighting)?;
        SpsaKernel::new(config, Algorithm::Weighting, p).run(RandomStream::new(config.seed), objective, budget)
    }
}

fn run_on_dataset(
    algorithm: Algorithm,
    x: &DenseMatrix<f64>,
    y: &[f64],
    model: &dyn IModel,
    metric: &dyn ErrorMetric,
    config: &RunConfig,
    budget: &RunBudget,
) -> Result<RunOutcome> {
    let (n, p) = x.shape();
    if n == 0 {
        return Err(SpsaError::data("dataset neobsahuje žiadne riadky"));
    }
    if n != y.len() {
        return Err(SpsaError::data(format!(
            "počet riadkov ({}) nesedí s počtom labelov ({})",
            n,
            y.len()
        )));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(SpsaError::data("labely obsahujú NaN/Inf"));
    }
    config.validate(p, algorithm)?;

    let mut stream = RandomStream::new(config.seed);
    let split_seed = stream.next_seed();
    let eval_seed = stream.next_seed();
    let splitter = make_splitter(config, config.cv_repeats, split_seed);
    let folds = splitter.split(n, y)?;

    log::info!(
        "Dataset {} x {}, model {}, metrika {}, {} foldov ({})",
        n,
        p,
        model.get_name(),
        metric.get_name(),
        folds.len(),
        splitter.get_name()
    );

    let objective = CrossValidatedObjective::new(x, y, model, metric, folds, config.parallel);
    let kernel = SpsaKernel::new(config, algorithm, p);
    if !config.track_best {
        return kernel.run(stream, &objective, budget);
    }

    // najlepší výber sa hodnotí na vlastných foldoch s cv_repeats_eval opakovaniami
    let eval_folds = make_splitter(config, config.cv_repeats_eval, eval_seed).split(n, y)?;
    log::debug!("Vyhodnotenie najlepšieho výberu na {} foldoch", eval_folds.len());
    let evaluation = CrossValidatedObjective::new(x, y, model, metric, eval_folds, config.parallel);
    kernel.run_with_evaluation(stream, &objective, Some(&evaluation), budget)
}

fn make_splitter(config: &RunConfig, repeats: usize, seed: u64) -> Box<dyn CvSplitter> {
    if config.stratified {
        Box::new(StratifiedKFold::new(config.cv_folds, repeats, seed))
    } else {
        Box::new(KFold::new(config.cv_folds, repeats, seed))
    }
}
