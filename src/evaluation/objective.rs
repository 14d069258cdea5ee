use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::error::{Result, SpsaError};
use crate::spsa::Projection;

/// Výsledok jedného vyhodnotenia (nižšie = lepšie).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveResult {
    pub value: f64,
    pub std_dev: f64,
    /// chyba na jednotlivých foldoch (prázdne, ak objective foldy nepozná)
    pub folds: Vec<f64>,
    /// true, ak ide o dosadenú sentinel hodnotu po zlyhaní
    pub sentinel: bool,
}

impl ObjectiveResult {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            std_dev: 0.0,
            folds: Vec::new(),
            sentinel: false,
        }
    }

    /// Priemer a populačná smerodajná odchýlka cez foldy.
    pub fn from_folds(folds: Vec<f64>) -> Self {
        let value = folds.iter().mean();
        let std_dev = if folds.len() > 1 {
            folds.iter().population_std_dev()
        } else {
            0.0
        };
        Self {
            value,
            std_dev,
            folds,
            sentinel: false,
        }
    }

    pub fn sentinel(value: f64) -> Self {
        Self {
            value,
            std_dev: 0.0,
            folds: Vec::new(),
            sentinel: true,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

/// Kontrakt objective funkcie: rozhodnutie -> chyba.
pub trait Objective: Sync {
    fn get_name(&self) -> String {
        "objective".to_string()
    }

    fn evaluate(&self, projection: &Projection) -> Result<ObjectiveResult>;
}

/// Objective z obyčajnej funkcie, hlavne pre syntetické úlohy a testy.
pub struct FnObjective<F>(pub F);

impl<F> Objective for FnObjective<F>
where
    F: Fn(&Projection) -> f64 + Sync,
{
    fn get_name(&self) -> String {
        "closure".to_string()
    }

    fn evaluate(&self, projection: &Projection) -> Result<ObjectiveResult> {
        Ok(ObjectiveResult::new((self.0)(projection)))
    }
}

/// Obal okolo objective, ktorý zlyhania a NaN/Inf nahrádza sentinelom a
/// počíta ich. Bezpečný pre súbežné volania (θ⁺ a θ⁻ bežia paralelne).
pub struct GuardedObjective<'o> {
    inner: &'o dyn Objective,
    sentinel: f64,
    max_failure_rate: f64,
    min_calls: usize,
    calls: AtomicUsize,
    failures: AtomicUsize,
}

impl<'o> GuardedObjective<'o> {
    pub fn new(inner: &'o dyn Objective, sentinel: f64, max_failure_rate: f64, min_calls: usize) -> Self {
        Self {
            inner,
            sentinel,
            max_failure_rate,
            min_calls,
            calls: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn evaluate(&self, projection: &Projection) -> ObjectiveResult {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let outcome = self.inner.evaluate(projection).and_then(|result| {
            if result.is_finite() {
                Ok(result)
            } else {
                Err(SpsaError::NonFinite(result.value))
            }
        });
        match outcome {
            Ok(result) => result,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                log::warn!(
                    "Vyhodnotenie {} features zlyhalo ({}), použitý sentinel {}",
                    projection.selected_count(),
                    e,
                    self.sentinel
                );
                ObjectiveResult::sentinel(self.sentinel)
            }
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn sentinel_value(&self) -> f64 {
        self.sentinel
    }

    /// Ukončí beh, ak je podiel zlyhaní nad limitom (až po `min_calls` volaniach).
    pub fn check_failure_rate(&self) -> Result<()> {
        let calls = self.calls();
        let failures = self.failures();
        if calls >= self.min_calls && calls > 0 {
            let rate = failures as f64 / calls as f64;
            if rate > self.max_failure_rate {
                log::error!(
                    "Podiel zlyhaných vyhodnotení {:.2} prekročil limit {:.2}",
                    rate,
                    self.max_failure_rate
                );
                return Err(SpsaError::ExcessiveFailures {
                    failures,
                    calls,
                    limit: self.max_failure_rate,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl Objective for Failing {
        fn evaluate(&self, _projection: &Projection) -> Result<ObjectiveResult> {
            Err(SpsaError::model("singular matrix"))
        }
    }

    #[test]
    fn folds_are_averaged() {
        let result = ObjectiveResult::from_folds(vec![1.0, 2.0, 3.0]);
        assert!((result.value - 2.0).abs() < 1e-12);
        assert!((result.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(!result.sentinel);
    }

    #[test]
    fn nan_becomes_sentinel_and_is_counted() {
        let nan = FnObjective(|_: &Projection| f64::NAN);
        let guarded = GuardedObjective::new(&nan, 1e6, 0.5, 4);
        let result = guarded.evaluate(&Projection::Mask(vec![true]));
        assert!(result.sentinel);
        assert_eq!(result.value, 1e6);
        assert_eq!(guarded.failures(), 1);
        // pod min_calls ešte neeskaluje
        assert!(guarded.check_failure_rate().is_ok());
        for _ in 0..3 {
            guarded.evaluate(&Projection::Mask(vec![true]));
        }
        assert!(matches!(
            guarded.check_failure_rate(),
            Err(SpsaError::ExcessiveFailures { failures: 4, calls: 4, .. })
        ));
    }

    #[test]
    fn model_errors_become_sentinel() {
        let failing = Failing;
        let guarded = GuardedObjective::new(&failing, 123.0, 1.0, 1);
        let result = guarded.evaluate(&Projection::Mask(vec![false]));
        assert!(result.sentinel);
        assert_eq!(result.value, 123.0);
        // limit 1.0 sa nedá prekročiť
        assert!(guarded.check_failure_rate().is_ok());
    }
}
