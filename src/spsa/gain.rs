use ndarray::Array1;
use serde::Serialize;

use crate::config::{GainConfig, GainKind};

/// Dvojica (a_k, c_k) pre jednu iteráciu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GainPair {
    pub a_k: f64,
    pub c_k: f64,
}

/// Monotónne gain sekvencie, čisté funkcie od k (indexované od 1).
///
/// a_k = a / (k + A)^alpha, c_k = c / k^gamma
#[derive(Debug, Clone)]
pub struct GainScheduler {
    a: f64,
    big_a: f64,
    alpha: f64,
    c: f64,
    gamma: f64,
}

impl GainScheduler {
    pub fn new(gains: &GainConfig, big_a: f64) -> Self {
        Self {
            a: gains.a,
            big_a,
            alpha: gains.alpha,
            c: gains.c,
            gamma: gains.gamma,
        }
    }

    pub fn a_k(&self, k: usize) -> f64 {
        self.a / (k.max(1) as f64 + self.big_a).powf(self.alpha)
    }

    pub fn c_k(&self, k: usize) -> f64 {
        self.c / (k.max(1) as f64).powf(self.gamma)
    }

    pub fn gains(&self, k: usize) -> GainPair {
        GainPair {
            a_k: self.a_k(k),
            c_k: self.c_k(k),
        }
    }

    pub fn stabilization_constant(&self) -> f64 {
        self.big_a
    }
}

const BB_BOTTOM_THRESHOLD: f64 = 1e-5;

/// Barzilai-Borwein krok: ‖s‖² / sᵀy, s = θ_k − θ_{k−1}, y = ĝ_k − ĝ_{k−1}.
///
/// Pri malom alebo zápornom menovateli sa použije `gain_min`. Surové hodnoty
/// sa orezávajú na [gain_min, gain_max] a vyhladzujú kĺzavým priemerom.
#[derive(Debug, Clone)]
pub struct BarzilaiBorweinGain {
    gain_min: f64,
    gain_max: f64,
    smoothing: usize,
    raw: Vec<f64>,
}

impl BarzilaiBorweinGain {
    pub fn new(gain_min: f64, gain_max: f64, smoothing: usize) -> Self {
        Self {
            gain_min,
            gain_max,
            smoothing: smoothing.max(1),
            raw: Vec::new(),
        }
    }

    /// `prev` je None v prvej iterácii (alebo po reštarte).
    pub fn next(&mut self, prev: Option<(&Array1<f64>, &Array1<f64>)>, theta: &Array1<f64>, ghat: &Array1<f64>) -> f64 {
        let raw = match prev {
            None => self.gain_min,
            Some((theta_prev, ghat_prev)) => {
                let s = theta - theta_prev;
                let y = ghat - ghat_prev;
                let bottom = s.dot(&y);
                if bottom < BB_BOTTOM_THRESHOLD {
                    self.gain_min
                } else {
                    (s.dot(&s) / bottom).clamp(self.gain_min, self.gain_max)
                }
            }
        };
        self.raw.push(raw);
        if self.raw.len() > self.smoothing {
            self.raw.remove(0);
        }
        self.raw.iter().sum::<f64>() / self.raw.len() as f64
    }

    pub fn last_raw(&self) -> Option<f64> {
        self.raw.last().copied()
    }

    pub fn reset(&mut self) {
        self.raw.clear();
    }
}

/// Zdroj kroku a_k podľa nastaveného typu.
#[derive(Debug, Clone)]
pub enum StepGain {
    Monotone,
    BarzilaiBorwein(BarzilaiBorweinGain),
}

impl StepGain {
    pub fn from_kind(kind: &GainKind) -> Self {
        match *kind {
            GainKind::Monotone => StepGain::Monotone,
            GainKind::BarzilaiBorwein { gain_min, gain_max, smoothing } => {
                StepGain::BarzilaiBorwein(BarzilaiBorweinGain::new(gain_min, gain_max, smoothing))
            }
        }
    }
}
