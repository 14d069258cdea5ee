use std::time::Instant;

use ndarray::Array1;
use serde::Serialize;

use super::cancel::RunBudget;
use super::convergence::{ConvergenceController, IterationRecord};
use super::gain::{GainPair, GainScheduler, StepGain};
use super::gradient;
use super::perturbation::PerturbationGenerator;
use super::projector::Projector;
use super::random_stream::RandomStream;
use super::ranker::{Decision, OutputRanker};
use super::update::UpdateEngine;
use crate::config::{Algorithm, RunConfig};
use crate::error::Result;
use crate::evaluation::{GuardedObjective, Objective, ObjectiveResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Converged,
    MaxIterationsReached,
    /// zrušené alebo vyčerpaný rozpočet
    Incomplete,
}

/// Najlepšie prahované rozhodnutie počas behu (len pri `track_best`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestIterate {
    pub k: usize,
    pub value: f64,
    pub std_dev: f64,
    pub selected: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationSummary {
    pub k: usize,
    pub a_k: f64,
    pub c_k: f64,
    pub y_plus: f64,
    pub y_minus: f64,
    pub theta: Vec<f64>,
    pub selected: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunDiagnostics {
    pub iterations: usize,
    pub evaluations: usize,
    pub failures: usize,
    pub elapsed_secs: f64,
    pub final_gains: Option<GainPair>,
    pub last_window_change: Option<f64>,
    pub best: Option<BestIterate>,
    pub restarts: usize,
    pub trace: Vec<IterationSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub decision: Decision,
    pub status: RunStatus,
    pub theta_bar: Vec<f64>,
    pub diagnostics: RunDiagnostics,
}

impl RunOutcome {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_complete(&self) -> bool {
        self.status != RunStatus::Incomplete
    }
}

/// Hlavná SPSA slučka nad ľubovoľnou objective funkciou.
///
/// Konfigurácia musí byť už overená (`RunConfig::validate`) pre dimenziu `p`.
pub struct SpsaKernel<'c> {
    config: &'c RunConfig,
    algorithm: Algorithm,
    p: usize,
}

impl<'c> SpsaKernel<'c> {
    pub fn new(config: &'c RunConfig, algorithm: Algorithm, p: usize) -> Self {
        Self { config, algorithm, p }
    }

    pub fn run(&self, stream: RandomStream, objective: &dyn Objective, budget: &RunBudget) -> Result<RunOutcome> {
        self.run_with_evaluation(stream, objective, None, budget)
    }

    /// Ako `run`, ale najlepší výber (`track_best`) sa hodnotí cez `evaluation`,
    /// typicky CV s viac opakovaniami ako pri odhade gradientu.
    pub fn run_with_evaluation(
        &self,
        mut stream: RandomStream,
        objective: &dyn Objective,
        evaluation: Option<&dyn Objective>,
        budget: &RunBudget,
    ) -> Result<RunOutcome> {
        let config = self.config;
        let p = self.p;
        let started = Instant::now();

        let scheduler = GainScheduler::new(&config.gains, config.stabilization_constant());
        let mut step_gain = StepGain::from_kind(&config.gains.kind);
        let projector = Projector::from_config(config, self.algorithm);
        let ranker = OutputRanker::from_config(config, self.algorithm);
        let perturbation = PerturbationGenerator::new(p);
        let guarded = GuardedObjective::new(
            objective,
            config.sentinel_error,
            config.max_failure_rate,
            config.min_calls_before_abort,
        );
        let eval_guard = evaluation.map(|inner| {
            GuardedObjective::new(
                inner,
                config.sentinel_error,
                config.max_failure_rate,
                config.min_calls_before_abort,
            )
        });
        let evaluator = eval_guard.as_ref().unwrap_or(&guarded);
        let retry_new_solution = self.algorithm == Algorithm::Ranking && config.same_count_max > 0;
        let (retry_min, retry_max) = config.gains.step_range();
        let retry_increment = (retry_max - retry_min) / config.same_count_max.max(1) as f64;
        let mut engine = match config.starting_values {
            Some(ref start) => UpdateEngine::new(Array1::from(start.clone()), config.lower, config.upper, config.max_step),
            None => UpdateEngine::midpoint(p, config.lower, config.upper, config.max_step),
        };
        let mut controller = ConvergenceController::new(config.window, config.tolerance, config.patience);

        let averaging = config.num_grad_avg.max(1);
        let mut status = RunStatus::MaxIterationsReached;
        let mut iterations = 0;
        let mut final_gains = None;
        let mut best: Option<BestIterate> = None;
        let mut stall = 0;
        let mut restarts = 0;
        let mut trace = Vec::new();

        log::info!(
            "SPSA {:?} štart: p = {}, objective = {}, max_iter = {}, A = {:.1}",
            self.algorithm,
            p,
            objective.get_name(),
            config.max_iterations,
            scheduler.stabilization_constant()
        );

        for k in 1..=config.max_iterations {
            if budget.exhausted(iterations, started) {
                log::info!("Beh prerušený po {} iteráciách", iterations);
                status = RunStatus::Incomplete;
                break;
            }

            let c_k = scheduler.c_k(k);
            let mut ghat = Array1::<f64>::zeros(p);
            let mut sides: Option<(ObjectiveResult, ObjectiveResult)> = None;
            for _ in 0..averaging {
                // všetky ťahy pred paralelnou časťou
                let delta = perturbation.generate(&mut stream);
                let draws = if projector.needs_draws() {
                    Some(stream.next_uniform_vector(p))
                } else {
                    None
                };
                let estimate = gradient::estimate(
                    engine.theta(),
                    &delta,
                    c_k,
                    draws.as_ref(),
                    &projector,
                    &guarded,
                    config.parallel,
                );
                ghat += &estimate.ghat;
                if sides.is_none() {
                    sides = Some((estimate.y_plus, estimate.y_minus));
                }
            }
            ghat /= averaging as f64;
            guarded.check_failure_rate()?;

            let a_k = match step_gain {
                StepGain::Monotone => scheduler.a_k(k),
                StepGain::BarzilaiBorwein(ref mut bb) => bb.next(engine.previous(), engine.theta(), &ghat),
            };
            engine.step(&ghat, a_k);
            iterations = k;

            // rovnaký výber ako pred krokom: skúsi väčšie kroky z nového θ
            let mut retries_exhausted = false;
            if retry_new_solution && ghat.iter().any(|&g| g != 0.0) {
                if let Some(before) = engine.previous().map(|(prev, _)| projector.project_threshold(prev)) {
                    let base = engine.theta().clone();
                    let mut same_count = 0;
                    while projector.project_threshold(engine.theta()) == before {
                        if same_count >= config.same_count_max {
                            retries_exhausted = true;
                            break;
                        }
                        same_count += 1;
                        engine.nudge(&base, &ghat, retry_min + same_count as f64 * retry_increment);
                    }
                    if same_count > 1 {
                        log::debug!("k = {}: {} pokusov o nový výber", k, same_count);
                    }
                }
            }

            let gains = GainPair { a_k, c_k };
            final_gains = Some(gains);
            let theta = engine.theta().clone();
            let decision = projector.project_threshold(&theta);
            let mut restart = false;

            log::debug!(
                "k = {}: a_k = {:.5}, c_k = {:.5}, |ĝ| = {:.5}",
                k,
                a_k,
                c_k,
                ghat.dot(&ghat).sqrt()
            );

            if config.track_best && decision.selected_count() > 0 {
                let result = evaluator.evaluate(&decision);
                guarded.check_failure_rate()?;
                if let Some(ref g) = eval_guard {
                    g.check_failure_rate()?;
                }
                let improvement = best.as_ref().map_or(f64::INFINITY, |b| b.value - result.value);
                if !result.sentinel && improvement > 0.0 {
                    best = Some(BestIterate {
                        k,
                        value: result.value,
                        std_dev: result.std_dev,
                        selected: decision.selected_indices(),
                    });
                }
                if !result.sentinel && improvement > config.stall_tolerance {
                    stall = 0;
                } else {
                    stall += 1;
                }
                // stall počíta iterácie bez zlepšenia od poslednej zlepšujúcej
                if stall >= config.stall_limit {
                    log::warn!("Bez zlepšenia {} iterácií, reštart θ (k = {})", stall, k);
                    restart = true;
                }
            }
            if retries_exhausted {
                log::warn!(
                    "Výber sa nezmenil ani po {} pokusoch, reštart θ (k = {})",
                    config.same_count_max,
                    k
                );
                restart = true;
            }
            if restart {
                engine.reset();
                if let StepGain::BarzilaiBorwein(ref mut bb) = step_gain {
                    bb.reset();
                }
                stall = 0;
                restarts += 1;
            }

            let (y_plus, y_minus) = match sides {
                Some(sides) => sides,
                None => (ObjectiveResult::new(f64::NAN), ObjectiveResult::new(f64::NAN)),
            };
            if config.log_every > 0 && k % config.log_every == 0 {
                log::info!(
                    "k = {}: y+ = {:.5}, y- = {:.5}, vybraných {} / {}",
                    k,
                    y_plus.value,
                    y_minus.value,
                    decision.selected_count(),
                    p
                );
            }
            if config.record_trace {
                trace.push(IterationSummary {
                    k,
                    a_k,
                    c_k,
                    y_plus: y_plus.value,
                    y_minus: y_minus.value,
                    theta: theta.to_vec(),
                    selected: decision.selected_indices(),
                });
            }

            let converged = controller.observe(IterationRecord {
                k,
                theta,
                gains,
                y_plus,
                y_minus,
                decision,
            });
            if converged {
                status = RunStatus::Converged;
                break;
            }
        }

        let theta_bar = controller
            .theta_bar()
            .unwrap_or_else(|| engine.theta().clone());
        let decision = ranker.rank(&theta_bar);
        let elapsed = started.elapsed().as_secs_f64();

        let evaluations = guarded.calls() + eval_guard.as_ref().map_or(0, |g| g.calls());
        let failures = guarded.failures() + eval_guard.as_ref().map_or(0, |g| g.failures());

        log::info!(
            "SPSA koniec: {:?} po {} iteráciách, {} vyhodnotení ({} zlyhaní), {:.2} s, vybraných {}",
            status,
            iterations,
            evaluations,
            failures,
            elapsed,
            decision.selected().len()
        );

        Ok(RunOutcome {
            decision,
            status,
            theta_bar: theta_bar.to_vec(),
            diagnostics: RunDiagnostics {
                iterations,
                evaluations,
                failures,
                elapsed_secs: elapsed,
                final_gains,
                last_window_change: controller.last_change(),
                best,
                restarts,
                trace,
            },
        })
    }
}
