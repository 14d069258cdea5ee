use ndarray::Array1;

use super::gain::GainPair;
use super::projector::Projection;
use crate::evaluation::ObjectiveResult;

/// Snímka jednej iterácie.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub k: usize,
    /// θ po aktualizácii v iterácii k
    pub theta: Array1<f64>,
    pub gains: GainPair,
    pub y_plus: ObjectiveResult,
    pub y_minus: ObjectiveResult,
    pub decision: Projection,
}

/// Kruhový buffer posledných W záznamov s pevnou kapacitou.
#[derive(Debug, Clone)]
pub struct TrailingWindow {
    slots: Vec<Option<IterationRecord>>,
    next: usize,
    len: usize,
}

impl TrailingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            next: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Vloží záznam, pri plnom bufferi prepíše najstarší.
    pub fn push(&mut self, record: IterationRecord) {
        self.slots[self.next] = Some(record);
        self.next = (self.next + 1) % self.capacity();
        self.len = (self.len + 1).min(self.capacity());
    }

    /// Záznamy od najstaršieho po najnovší.
    pub fn iter(&self) -> impl Iterator<Item = &IterationRecord> {
        let cap = self.capacity();
        let start = (self.next + cap - self.len) % cap;
        (0..self.len).filter_map(move |i| self.slots[(start + i) % cap].as_ref())
    }

    pub fn latest(&self) -> Option<&IterationRecord> {
        self.iter().last()
    }

    /// Priemer θ po zložkách cez okno (θ̄).
    pub fn mean_theta(&self) -> Option<Array1<f64>> {
        let mut records = self.iter();
        let first = records.next()?;
        let mut sum = first.theta.clone();
        for record in records {
            sum += &record.theta;
        }
        Some(sum / self.len as f64)
    }
}

/// Rozhoduje o zastavení podľa relatívnej zmeny θ̄ medzi po sebe idúcimi
/// (neprekrývajúcimi sa) oknami. Zastaví až po `patience` pokojných kontrolách.
#[derive(Debug, Clone)]
pub struct ConvergenceController {
    window: TrailingWindow,
    tolerance: f64,
    patience: usize,
    calm_checks: usize,
    since_check: usize,
    previous_mean: Option<Array1<f64>>,
    last_change: Option<f64>,
}

impl ConvergenceController {
    pub fn new(window: usize, tolerance: f64, patience: usize) -> Self {
        Self {
            window: TrailingWindow::new(window),
            tolerance,
            patience: patience.max(1),
            calm_checks: 0,
            since_check: 0,
            previous_mean: None,
            last_change: None,
        }
    }

    /// Zaradí záznam a vráti `true`, ak je beh skonvergovaný.
    pub fn observe(&mut self, record: IterationRecord) -> bool {
        self.window.push(record);
        self.since_check += 1;
        if !self.window.is_full() || self.since_check < self.window.capacity() {
            return false;
        }
        self.since_check = 0;

        let mean = match self.window.mean_theta() {
            Some(mean) => mean,
            None => return false,
        };
        if let Some(ref prev) = self.previous_mean {
            let diff = &mean - prev;
            let change = diff.dot(&diff).sqrt() / prev.dot(prev).sqrt().max(1e-12);
            self.last_change = Some(change);
            if change < self.tolerance {
                self.calm_checks += 1;
            } else {
                self.calm_checks = 0;
            }
        }
        self.previous_mean = Some(mean);
        self.calm_checks >= self.patience
    }

    pub fn theta_bar(&self) -> Option<Array1<f64>> {
        self.window.mean_theta()
    }

    pub fn window(&self) -> &TrailingWindow {
        &self.window
    }

    pub fn last_change(&self) -> Option<f64> {
        self.last_change
    }
}
