mod common;

use common::{subset_error, weight_error, INFORMATIVE, P};
use spsa_fs::evaluation::FnObjective;
use spsa_fs::spsa::OutputRanker;
use spsa_fs::{Algorithm, CancelToken, Projection, RunBudget, RunConfig, RunStatus, SpsaError, SpsaRanking, SpsaWeighting};

fn recovery_config(seed: u64) -> RunConfig {
    RunConfig::builder()
        .gains(0.06, Some(40.0), 0.602, 0.4, 0.05)
        .max_iterations(400)
        .window(30)
        .convergence(0.0, 1)
        .num_grad_avg(2)
        .max_step(None)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn same_seed_gives_identical_runs() {
    let config = RunConfig::builder()
        .max_iterations(60)
        .window(10)
        .seed(17)
        .record_trace(true)
        .build()
        .unwrap();
    let objective = FnObjective(subset_error);
    let first = SpsaRanking::run_with_objective(P, &objective, &config, &RunBudget::unlimited()).unwrap();
    let second = SpsaRanking::run_with_objective(P, &objective, &config, &RunBudget::unlimited()).unwrap();

    assert_eq!(first.diagnostics.trace, second.diagnostics.trace);
    assert_eq!(first.decision, second.decision);
    assert_eq!(first.theta_bar, second.theta_bar);
    assert_eq!(first.diagnostics.evaluations, second.diagnostics.evaluations);

    let mut sequential = config.clone();
    sequential.parallel = false;
    let third = SpsaRanking::run_with_objective(P, &objective, &sequential, &RunBudget::unlimited()).unwrap();
    assert_eq!(first.diagnostics.trace, third.diagnostics.trace);
}

#[test]
fn different_seeds_explore_differently() {
    let objective = FnObjective(subset_error);
    let mut a = RunConfig::builder().max_iterations(20).window(5).record_trace(true).build().unwrap();
    let mut b = a.clone();
    a.seed = 1;
    b.seed = 2;
    let ra = SpsaRanking::run_with_objective(P, &objective, &a, &RunBudget::unlimited()).unwrap();
    let rb = SpsaRanking::run_with_objective(P, &objective, &b, &RunBudget::unlimited()).unwrap();
    assert_ne!(ra.diagnostics.trace, rb.diagnostics.trace);
}

#[test]
fn theta_stays_within_bounds() {
    let config = RunConfig::builder()
        .gains(5.0, Some(1.0), 0.602, 0.3, 0.101)
        .bounds(0.0, 2.0)
        .max_iterations(80)
        .window(10)
        .convergence(0.0, 1)
        .max_step(None)
        .record_trace(true)
        .build()
        .unwrap();
    let objective = FnObjective(|p: &Projection| match p {
        Projection::Weights(w) => w.iter().enumerate().map(|(i, v)| if i % 2 == 0 { -v } else { *v }).sum(),
        Projection::Mask(_) => 0.0,
    });
    let outcome = SpsaWeighting::run_with_objective(6, &objective, &config, &RunBudget::unlimited()).unwrap();
    assert_eq!(outcome.diagnostics.trace.len(), 80);
    for summary in &outcome.diagnostics.trace {
        assert!(summary.theta.iter().all(|&t| (0.0..=2.0).contains(&t)), "k = {}", summary.k);
    }
    // veľké kroky musia naraziť na hranice
    assert!(outcome
        .diagnostics
        .trace
        .iter()
        .any(|s| s.theta.iter().any(|&t| t == 0.0 || t == 2.0)));
}

#[test]
fn always_nan_objective_escalates() {
    let config = RunConfig::builder().max_iterations(50).window(5).build().unwrap();
    let objective = FnObjective(|_: &Projection| f64::NAN);
    let result = SpsaRanking::run_with_objective(5, &objective, &config, &RunBudget::unlimited());
    match result {
        Err(SpsaError::ExcessiveFailures { failures, calls, .. }) => {
            assert_eq!(calls, 10);
            assert_eq!(failures, 10);
        }
        other => panic!("očakávaná eskalácia, výsledok {:?}", other.map(|o| o.status)),
    }
}

#[test]
fn failures_never_leak_nan_into_theta() {
    let config = RunConfig::builder()
        .max_iterations(30)
        .window(5)
        .failure_escalation(1.0, 10)
        .record_trace(true)
        .build()
        .unwrap();
    let objective = FnObjective(|_: &Projection| f64::NAN);
    let outcome = SpsaRanking::run_with_objective(4, &objective, &config, &RunBudget::unlimited()).unwrap();
    assert_eq!(outcome.diagnostics.failures, outcome.diagnostics.evaluations);
    assert!(outcome.theta_bar.iter().all(|t| t.is_finite()));
    for summary in &outcome.diagnostics.trace {
        assert_eq!(summary.y_plus, 1e6);
        assert_eq!(summary.theta, vec![0.5; 4]);
    }
}

#[test]
fn ranking_recovers_informative_subset() {
    let objective = FnObjective(subset_error);
    let mut expected = INFORMATIVE.to_vec();
    expected.sort_unstable();
    let mut hits = 0;
    for seed in 0..10 {
        let config = recovery_config(seed);
        let outcome = SpsaRanking::run_with_objective(P, &objective, &config, &RunBudget::unlimited()).unwrap();
        let mut top: Vec<usize> = outcome.decision.feature_scores().iter().take(3).map(|&(i, _)| i).collect();
        top.sort_unstable();
        if outcome.decision.selected() == expected.as_slice() && top == expected {
            hits += 1;
        }
    }
    assert!(hits >= 9, "úspešných behov {} z 10", hits);
}

#[test]
fn weighting_puts_informative_features_on_top() {
    let objective = FnObjective(weight_error);
    for seed in 0..3 {
        let config = RunConfig::builder()
            .gains(0.1, Some(20.0), 0.602, 0.05, 0.101)
            .max_iterations(200)
            .window(20)
            .convergence(0.0, 1)
            .seed(seed)
            .build()
            .unwrap();
        let outcome = SpsaWeighting::run_with_objective(P, &objective, &config, &RunBudget::unlimited()).unwrap();
        let mut top: Vec<usize> = outcome.decision.feature_scores().iter().take(3).map(|&(i, _)| i).collect();
        top.sort_unstable();
        assert_eq!(top, vec![3, 9, 15], "seed {}", seed);
    }
}

#[test]
fn reranking_is_idempotent() {
    let config = RunConfig::builder().max_iterations(60).window(10).build().unwrap();
    let objective = FnObjective(subset_error);
    let outcome = SpsaRanking::run_with_objective(P, &objective, &config, &RunBudget::unlimited()).unwrap();
    let ranker = OutputRanker::from_config(&config, Algorithm::Ranking);
    let theta_bar = ndarray::Array1::from(outcome.theta_bar.clone());
    let once = ranker.rank(&theta_bar);
    let twice = ranker.rank(&theta_bar);
    assert_eq!(once, twice);
    assert_eq!(once, outcome.decision);
}

#[test]
fn iteration_budget_matches_shorter_run() {
    let base = RunConfig::builder()
        .gains(0.2, Some(10.0), 0.602, 0.1, 0.101)
        .window(30)
        .convergence(0.0, 1)
        .seed(4);
    let long = base.clone().max_iterations(300).build().unwrap();
    let short = base.max_iterations(50).build().unwrap();
    let objective = FnObjective(subset_error);

    let cut = SpsaRanking::run_with_objective(P, &objective, &long, &RunBudget::unlimited().with_max_iterations(50)).unwrap();
    let full = SpsaRanking::run_with_objective(P, &objective, &short, &RunBudget::unlimited()).unwrap();

    assert_eq!(cut.status, RunStatus::Incomplete);
    assert_eq!(full.status, RunStatus::MaxIterationsReached);
    assert_eq!(cut.diagnostics.iterations, 50);
    assert_eq!(cut.theta_bar, full.theta_bar);
    assert_eq!(cut.decision, full.decision);
}

#[test]
fn cancel_from_another_thread() {
    let config = RunConfig::builder().max_iterations(5_000_000).window(30).convergence(0.0, 1).build().unwrap();
    let token = CancelToken::new();
    let objective = FnObjective(subset_error);
    let trigger = token.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(20));
        trigger.cancel();
    });
    let outcome = SpsaRanking::run_with_objective(P, &objective, &config, &RunBudget::unlimited().with_cancel(token)).unwrap();
    handle.join().unwrap();
    assert_eq!(outcome.status, RunStatus::Incomplete);
    assert!(outcome.diagnostics.iterations < 5_000_000);
    assert_eq!(outcome.theta_bar.len(), P);
    assert!(!outcome.decision.selected().is_empty());
}

#[test]
fn config_errors_are_reported_before_the_loop() {
    let objective = FnObjective(subset_error);
    let config = RunConfig::builder().features_to_keep(vec![25]).build().unwrap();
    assert!(matches!(
        SpsaRanking::run_with_objective(P, &objective, &config, &RunBudget::unlimited()),
        Err(SpsaError::Config(_))
    ));
    assert!(matches!(
        SpsaRanking::run_with_objective(0, &objective, &RunConfig::default(), &RunBudget::unlimited()),
        Err(SpsaError::Config(_))
    ));
    let wide = RunConfig::builder().bounds(0.0, 2.0).build().unwrap();
    assert!(SpsaRanking::run_with_objective(P, &objective, &wide, &RunBudget::unlimited()).is_err());
}

#[test]
fn forced_features_and_fixed_size() {
    let config = RunConfig::builder()
        .max_iterations(60)
        .window(10)
        .num_features(2)
        .features_to_keep(vec![0])
        .build()
        .unwrap();
    let objective = FnObjective(subset_error);
    let outcome = SpsaRanking::run_with_objective(P, &objective, &config, &RunBudget::unlimited()).unwrap();
    let selected = outcome.decision.selected();
    assert_eq!(selected.len(), 3);
    assert!(selected.contains(&0));
}

#[test]
fn barzilai_borwein_and_best_tracking() {
    let config = RunConfig::builder()
        .gain_kind(spsa_fs::GainKind::barzilai_borwein())
        .max_iterations(80)
        .window(10)
        .convergence(0.0, 1)
        .track_best(20)
        .build()
        .unwrap();
    let objective = FnObjective(subset_error);
    let outcome = SpsaRanking::run_with_objective(P, &objective, &config, &RunBudget::unlimited()).unwrap();
    let best = outcome.diagnostics.best.expect("best iterate");
    assert!(best.value.is_finite());
    assert!(best.k >= 1 && best.k <= 80);
    // každá iterácia: 2 vyhodnotenia gradientu + nanajvýš 1 pre best tracking
    assert!(outcome.diagnostics.evaluations <= 80 * 3);
    let gains = outcome.diagnostics.final_gains.unwrap();
    assert!((0.01..=1.0).contains(&gains.a_k));
}
