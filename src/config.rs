use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpsaError};

/// Ktorý z dvoch algoritmov beží nad spoločným SPSA jadrom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Feature Selection and Ranking - binárna maska + poradie
    Ranking,
    /// Feature Selection and Weighting - nezáporné váhy
    Weighting,
}

/// Spôsob výpočtu kroku `a_k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GainKind {
    /// a_k = a / (k + A)^alpha
    Monotone,
    /// Barzilai-Borwein krok, orezaný na [gain_min, gain_max] a vyhladený
    /// priemerom posledných `smoothing` hodnôt
    BarzilaiBorwein {
        gain_min: f64,
        gain_max: f64,
        smoothing: usize,
    },
}

impl GainKind {
    pub fn barzilai_borwein() -> Self {
        GainKind::BarzilaiBorwein {
            gain_min: 0.01,
            gain_max: 1.0,
            smoothing: 1,
        }
    }
}

/// Stabilizačné konštanty SPSA (a, A, alpha, c, gamma).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainConfig {
    pub a: f64,
    /// `A`; ak chýba, použije sa 10 % z max. počtu iterácií
    pub big_a: Option<f64>,
    pub alpha: f64,
    pub c: f64,
    pub gamma: f64,
    pub kind: GainKind,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            a: 0.75,
            big_a: None,
            alpha: 0.602,
            c: 0.05,
            gamma: 0.101,
            kind: GainKind::Monotone,
        }
    }
}

impl GainConfig {
    /// Rozsah kroku [gain_min, gain_max]; pri monotónnom gaine default BB hodnoty.
    pub fn step_range(&self) -> (f64, f64) {
        match self.kind {
            GainKind::BarzilaiBorwein { gain_min, gain_max, .. } => (gain_min, gain_max),
            GainKind::Monotone => (0.01, 1.0),
        }
    }
}

/// Konfigurácia jedného behu. Po štarte behu sa už nemení.
///
/// Default gain konštanty (a = 0.75, c = 0.05, max_step = 0.2) sú
/// kalibrované na chybu v rozsahu [0, 1], teda `misclassification` alebo
/// `one_minus_r2`. Pri metrikách v jednotkách y (`mse`, `rmse`, `mae`) je
/// ĝ o rády väčší a každý krok narazí na `max_step`; vtedy treba zmenšiť
/// `a` a zväčšiť `c`, napr. a = 0.06, A = 40, c = 0.4, gamma = 0.05.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub gains: GainConfig,
    pub lower: f64,
    pub upper: f64,
    pub starting_values: Option<Vec<f64>>,
    pub max_iterations: usize,
    pub window: usize,
    pub tolerance: f64,
    pub patience: usize,
    pub seed: u64,
    pub cv_folds: usize,
    pub cv_repeats: usize,
    /// opakovania CV pri vyhodnotení najlepšieho výberu (`track_best`)
    pub cv_repeats_eval: usize,
    pub stratified: bool,
    pub selection_threshold: f64,
    pub num_features: Option<usize>,
    pub features_to_keep: Vec<usize>,
    pub sparsity_cutoff: Option<f64>,
    pub num_grad_avg: usize,
    pub max_step: Option<f64>,
    pub sentinel_error: f64,
    pub max_failure_rate: f64,
    pub min_calls_before_abort: usize,
    pub track_best: bool,
    pub stall_limit: usize,
    pub stall_tolerance: f64,
    /// max. počet pokusov o posun na nový výber (FSR), 0 vypína
    pub same_count_max: usize,
    pub record_trace: bool,
    pub parallel: bool,
    pub log_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            gains: GainConfig::default(),
            lower: 0.0,
            upper: 1.0,
            starting_values: None,
            max_iterations: 300,
            window: 30,
            tolerance: 1e-4,
            patience: 3,
            seed: 42,
            cv_folds: 5,
            cv_repeats: 1,
            cv_repeats_eval: 2,
            stratified: false,
            selection_threshold: 0.5,
            num_features: None,
            features_to_keep: Vec::new(),
            sparsity_cutoff: None,
            num_grad_avg: 1,
            max_step: Some(0.2),
            sentinel_error: 1e6,
            max_failure_rate: 0.5,
            min_calls_before_abort: 10,
            track_best: false,
            stall_limit: 100,
            stall_tolerance: 1e-5,
            same_count_max: 0,
            record_trace: false,
            parallel: true,
            log_every: 10,
        }
    }
}

pub const SUPPORTED_PARAMS: &[&str] = &[
    "a",
    "A",
    "alpha",
    "c",
    "gamma",
    "gain_type",
    "gain_min",
    "gain_max",
    "smoothing",
    "lower",
    "upper",
    "starting_values",
    "max_iterations",
    "window",
    "tolerance",
    "patience",
    "seed",
    "cv_folds",
    "cv_repeats",
    "cv_repeats_eval",
    "stratified",
    "threshold",
    "num_features",
    "features_to_keep",
    "sparsity_cutoff",
    "num_grad_avg",
    "max_step",
    "sentinel_error",
    "max_failure_rate",
    "min_calls_before_abort",
    "track_best",
    "stall_limit",
    "stall_tolerance",
    "same_count_max",
    "record_trace",
    "parallel",
    "log_every",
];

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| SpsaError::config(format!("Neplatná hodnota pre {}: {}", key, value)))
}

fn parse_optional<T: FromStr>(key: &str, value: &str) -> Result<Option<T>> {
    match value.trim() {
        "" | "none" | "auto" => Ok(None),
        v => parse(key, v).map(Some),
    }
}

fn parse_list<T: FromStr>(key: &str, value: &str) -> Result<Vec<T>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse(key, s))
        .collect()
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }

    /// Načíta konfiguráciu z JSON; chýbajúce polia dostanú default hodnoty.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Konštanta `A` gain sekvencie.
    pub fn stabilization_constant(&self) -> f64 {
        self.gains
            .big_a
            .unwrap_or(0.1 * self.max_iterations as f64)
    }

    /// Nastaví jeden parameter zo stringu (rovnaké kľúče ako `SUPPORTED_PARAMS`).
    pub fn set_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "a" => self.gains.a = parse(key, value)?,
            "A" | "big_a" => self.gains.big_a = parse_optional(key, value)?,
            "alpha" => self.gains.alpha = parse(key, value)?,
            "c" => self.gains.c = parse(key, value)?,
            "gamma" => self.gains.gamma = parse(key, value)?,
            "gain_type" => {
                self.gains.kind = match value {
                    "mon" | "monotone" => GainKind::Monotone,
                    // už nastavené BB parametre zostávajú
                    "bb" | "barzilai_borwein" => match self.gains.kind {
                        GainKind::Monotone => GainKind::barzilai_borwein(),
                        ref bb => bb.clone(),
                    },
                    _ => {
                        return Err(SpsaError::config(format!(
                            "Neplatná hodnota pre gain_type: {} (použite 'mon' alebo 'bb')",
                            value
                        )))
                    }
                }
            }
            "gain_min" | "gain_max" | "smoothing" => {
                // BB parameter zapína BB gain
                if self.gains.kind == GainKind::Monotone {
                    self.gains.kind = GainKind::barzilai_borwein();
                }
                if let GainKind::BarzilaiBorwein {
                    ref mut gain_min,
                    ref mut gain_max,
                    ref mut smoothing,
                } = self.gains.kind
                {
                    match key {
                        "gain_min" => *gain_min = parse(key, value)?,
                        "gain_max" => *gain_max = parse(key, value)?,
                        _ => *smoothing = parse(key, value)?,
                    }
                }
            }
            "lower" => self.lower = parse(key, value)?,
            "upper" => self.upper = parse(key, value)?,
            "starting_values" => {
                let values: Vec<f64> = parse_list(key, value)?;
                self.starting_values = if values.is_empty() { None } else { Some(values) };
            }
            "max_iterations" | "iter_max" => self.max_iterations = parse(key, value)?,
            "window" => self.window = parse(key, value)?,
            "tolerance" => self.tolerance = parse(key, value)?,
            "patience" => self.patience = parse(key, value)?,
            "seed" => self.seed = parse(key, value)?,
            "cv_folds" => self.cv_folds = parse(key, value)?,
            "cv_repeats" | "cv_reps_grad" => self.cv_repeats = parse(key, value)?,
            "cv_repeats_eval" | "cv_reps_eval" => self.cv_repeats_eval = parse(key, value)?,
            "stratified" => self.stratified = parse(key, value)?,
            "threshold" => self.selection_threshold = parse(key, value)?,
            "num_features" => {
                self.num_features = parse_optional::<usize>(key, value)?.filter(|&k| k > 0)
            }
            "features_to_keep" => self.features_to_keep = parse_list(key, value)?,
            "sparsity_cutoff" => self.sparsity_cutoff = parse_optional(key, value)?,
            "num_grad_avg" => self.num_grad_avg = parse(key, value)?,
            "max_step" => self.max_step = parse_optional(key, value)?,
            "sentinel_error" => self.sentinel_error = parse(key, value)?,
            "max_failure_rate" => self.max_failure_rate = parse(key, value)?,
            "min_calls_before_abort" => self.min_calls_before_abort = parse(key, value)?,
            "track_best" => self.track_best = parse(key, value)?,
            "stall_limit" => self.stall_limit = parse(key, value)?,
            "stall_tolerance" => self.stall_tolerance = parse(key, value)?,
            "same_count_max" => self.same_count_max = parse(key, value)?,
            "record_trace" => self.record_trace = parse(key, value)?,
            "parallel" => self.parallel = parse(key, value)?,
            "log_every" => self.log_every = parse(key, value)?,
            _ => return Err(SpsaError::config(format!("Neznámy parameter: {}", key))),
        }
        Ok(())
    }

    /// Kontroly nezávislé od datasetu.
    pub fn check(&self) -> Result<()> {
        let g = &self.gains;
        if !(g.a > 0.0 && g.a.is_finite()) {
            return Err(SpsaError::config("a musí byť kladné"));
        }
        if !(g.c > 0.0 && g.c.is_finite()) {
            return Err(SpsaError::config("c musí byť kladné"));
        }
        if !(g.alpha > 0.0 && g.alpha.is_finite()) || !(g.gamma > 0.0 && g.gamma.is_finite()) {
            return Err(SpsaError::config("alpha a gamma musia byť kladné"));
        }
        if let Some(big_a) = g.big_a {
            if !(big_a >= 0.0 && big_a.is_finite()) {
                return Err(SpsaError::config("A nesmie byť záporné"));
            }
        }
        if let GainKind::BarzilaiBorwein { gain_min, gain_max, smoothing } = g.kind {
            if !(gain_min > 0.0 && gain_min <= gain_max && gain_max.is_finite()) {
                return Err(SpsaError::config("BB gain vyžaduje 0 < gain_min <= gain_max"));
            }
            if smoothing == 0 {
                return Err(SpsaError::config("BB smoothing musí byť aspoň 1"));
            }
        }
        if !(self.lower < self.upper) || !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(SpsaError::config(format!(
                "rozsah [{}, {}] je prázdny",
                self.lower, self.upper
            )));
        }
        if self.max_iterations == 0 {
            return Err(SpsaError::config("max_iterations musí byť kladné"));
        }
        if self.window == 0 || self.window >= self.max_iterations {
            return Err(SpsaError::config(format!(
                "window ({}) musí byť v rozsahu 1..max_iterations ({})",
                self.window, self.max_iterations
            )));
        }
        if !(self.tolerance >= 0.0) || self.patience == 0 {
            return Err(SpsaError::config("tolerance >= 0 a patience >= 1"));
        }
        if self.cv_folds < 2 || self.cv_repeats == 0 || self.cv_repeats_eval == 0 {
            return Err(SpsaError::config("cv_folds >= 2, cv_repeats >= 1 a cv_repeats_eval >= 1"));
        }
        if !(0.0..=1.0).contains(&self.selection_threshold) {
            return Err(SpsaError::config("threshold musí byť v [0, 1]"));
        }
        if let Some(cutoff) = self.sparsity_cutoff {
            if !(cutoff >= 0.0) {
                return Err(SpsaError::config("sparsity_cutoff nesmie byť záporný"));
            }
        }
        if self.num_grad_avg == 0 {
            return Err(SpsaError::config("num_grad_avg musí byť aspoň 1"));
        }
        if let Some(step) = self.max_step {
            if !(step > 0.0) {
                return Err(SpsaError::config("max_step musí byť kladný"));
            }
        }
        if !(self.sentinel_error > 0.0 && self.sentinel_error.is_finite()) {
            return Err(SpsaError::config("sentinel_error musí byť kladné konečné číslo"));
        }
        if !(self.max_failure_rate > 0.0 && self.max_failure_rate <= 1.0) {
            return Err(SpsaError::config("max_failure_rate musí byť v (0, 1]"));
        }
        if self.track_best && self.stall_limit == 0 {
            return Err(SpsaError::config("stall_limit musí byť aspoň 1"));
        }
        if !(self.stall_tolerance >= 0.0 && self.stall_tolerance.is_finite()) {
            return Err(SpsaError::config("stall_tolerance nesmie byť záporná"));
        }
        Ok(())
    }

    /// Plná validácia pre konkrétny počet features `p`.
    pub fn validate(&self, p: usize, algorithm: Algorithm) -> Result<()> {
        self.check()?;
        if p == 0 {
            return Err(SpsaError::config("počet features musí byť kladný"));
        }
        match algorithm {
            Algorithm::Ranking => {
                if self.lower < 0.0 || self.upper > 1.0 {
                    return Err(SpsaError::config(
                        "pre ranking musí byť rozsah podmnožinou [0, 1]",
                    ));
                }
            }
            Algorithm::Weighting => {
                if self.lower < 0.0 {
                    return Err(SpsaError::config("váhy musia byť nezáporné"));
                }
            }
        }
        if let Some(&bad) = self.features_to_keep.iter().find(|&&i| i >= p) {
            return Err(SpsaError::config(format!(
                "features_to_keep obsahuje index {} mimo 0..{}",
                bad, p
            )));
        }
        if let Some(k) = self.num_features {
            if k == 0 || k > p {
                return Err(SpsaError::config(format!("num_features {} mimo 1..={}", k, p)));
            }
        }
        if let Some(ref start) = self.starting_values {
            if start.len() != p {
                return Err(SpsaError::config(format!(
                    "starting_values má dĺžku {}, očakávaná {}",
                    start.len(),
                    p
                )));
            }
            if start.iter().any(|v| !v.is_finite()) {
                return Err(SpsaError::config("starting_values obsahuje NaN/Inf"));
            }
        }
        Ok(())
    }
}

/// Builder pre `RunConfig`, `build()` spustí validáciu.
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
        }
    }

    pub fn gains(mut self, a: f64, big_a: Option<f64>, alpha: f64, c: f64, gamma: f64) -> Self {
        self.config.gains.a = a;
        self.config.gains.big_a = big_a;
        self.config.gains.alpha = alpha;
        self.config.gains.c = c;
        self.config.gains.gamma = gamma;
        self
    }

    pub fn gain_kind(mut self, kind: GainKind) -> Self {
        self.config.gains.kind = kind;
        self
    }

    pub fn bounds(mut self, lower: f64, upper: f64) -> Self {
        self.config.lower = lower;
        self.config.upper = upper;
        self
    }

    pub fn starting_values(mut self, values: Vec<f64>) -> Self {
        self.config.starting_values = Some(values);
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.config.max_iterations = n;
        self
    }

    pub fn window(mut self, w: usize) -> Self {
        self.config.window = w;
        self
    }

    /// Tolerancia relatívnej zmeny θ̄ a počet po sebe idúcich kontrol.
    pub fn convergence(mut self, tolerance: f64, patience: usize) -> Self {
        self.config.tolerance = tolerance;
        self.config.patience = patience;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn cv(mut self, folds: usize, repeats: usize, stratified: bool) -> Self {
        self.config.cv_folds = folds;
        self.config.cv_repeats = repeats;
        self.config.stratified = stratified;
        self
    }

    pub fn selection_threshold(mut self, threshold: f64) -> Self {
        self.config.selection_threshold = threshold;
        self
    }

    pub fn num_features(mut self, k: usize) -> Self {
        self.config.num_features = Some(k);
        self
    }

    pub fn features_to_keep(mut self, indices: Vec<usize>) -> Self {
        self.config.features_to_keep = indices;
        self
    }

    pub fn sparsity_cutoff(mut self, cutoff: f64) -> Self {
        self.config.sparsity_cutoff = Some(cutoff);
        self
    }

    pub fn num_grad_avg(mut self, n: usize) -> Self {
        self.config.num_grad_avg = n;
        self
    }

    pub fn max_step(mut self, step: Option<f64>) -> Self {
        self.config.max_step = step;
        self
    }

    pub fn sentinel_error(mut self, value: f64) -> Self {
        self.config.sentinel_error = value;
        self
    }

    pub fn failure_escalation(mut self, max_rate: f64, min_calls: usize) -> Self {
        self.config.max_failure_rate = max_rate;
        self.config.min_calls_before_abort = min_calls;
        self
    }

    pub fn track_best(mut self, stall_limit: usize) -> Self {
        self.config.track_best = true;
        self.config.stall_limit = stall_limit;
        self
    }

    pub fn cv_repeats_eval(mut self, repeats: usize) -> Self {
        self.config.cv_repeats_eval = repeats;
        self
    }

    /// Pokusy o nový výber, keď krok nezmení prahovanú masku (0 vypína).
    pub fn same_count_max(mut self, n: usize) -> Self {
        self.config.same_count_max = n;
        self
    }

    pub fn record_trace(mut self, record: bool) -> Self {
        self.config.record_trace = record;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn log_every(mut self, n: usize) -> Self {
        self.config.log_every = n;
        self
    }

    pub fn build(self) -> Result<RunConfig> {
        self.config.check()?;
        Ok(self.config)
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RunConfig::default();
        assert!(config.validate(10, Algorithm::Ranking).is_ok());
        assert!(config.validate(10, Algorithm::Weighting).is_ok());
        assert!((config.stabilization_constant() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_contradictory_bounds() {
        let err = RunConfig::builder().bounds(1.0, 1.0).build();
        assert!(matches!(err, Err(SpsaError::Config(_))));
        let err = RunConfig::builder().bounds(2.0, 1.0).build();
        assert!(matches!(err, Err(SpsaError::Config(_))));
    }

    #[test]
    fn rejects_window_not_smaller_than_max_iterations() {
        let err = RunConfig::builder().max_iterations(20).window(20).build();
        assert!(matches!(err, Err(SpsaError::Config(_))));
    }

    #[test]
    fn rejects_zero_dimensionality() {
        let config = RunConfig::default();
        assert!(matches!(
            config.validate(0, Algorithm::Ranking),
            Err(SpsaError::Config(_))
        ));
    }

    #[test]
    fn ranking_bounds_must_fit_unit_interval() {
        let config = RunConfig::builder().bounds(0.0, 2.0).build().unwrap();
        assert!(config.validate(3, Algorithm::Ranking).is_err());
        assert!(config.validate(3, Algorithm::Weighting).is_ok());
    }

    #[test]
    fn set_param_parses_strings() {
        let mut config = RunConfig::default();
        config.set_param("gain_type", "bb").unwrap();
        config.set_param("features_to_keep", "1, 4").unwrap();
        config.set_param("max_step", "none").unwrap();
        config.set_param("A", "12.5").unwrap();
        assert_eq!(config.gains.kind, GainKind::barzilai_borwein());
        assert_eq!(config.features_to_keep, vec![1, 4]);
        assert_eq!(config.max_step, None);
        assert_eq!(config.gains.big_a, Some(12.5));
        assert!(config.set_param("alpha", "abc").is_err());
        assert!(config.set_param("unknown", "1").is_err());
    }

    #[test]
    fn set_param_covers_every_run_field() {
        let mut config = RunConfig::default();
        config.set_param("stall_tolerance", "1").unwrap();
        config.set_param("min_calls_before_abort", "25").unwrap();
        config.set_param("starting_values", "0.1, 0.9").unwrap();
        config.set_param("same_count_max", "40").unwrap();
        config.set_param("cv_reps_eval", "3").unwrap();
        assert_eq!(config.stall_tolerance, 1.0);
        assert_eq!(config.min_calls_before_abort, 25);
        assert_eq!(config.starting_values, Some(vec![0.1, 0.9]));
        assert_eq!(config.same_count_max, 40);
        assert_eq!(config.cv_repeats_eval, 3);
        config.set_param("starting_values", "").unwrap();
        assert_eq!(config.starting_values, None);
        assert!(config.set_param("stall_tolerance", "x").is_err());
    }

    #[test]
    fn every_supported_key_is_known() {
        for key in SUPPORTED_PARAMS {
            let mut config = RunConfig::default();
            if let Err(e) = config.set_param(key, "1") {
                assert!(!e.to_string().contains("Neznámy"), "{}: {}", key, e);
            }
        }
    }

    #[test]
    fn bb_params_switch_gain_kind_in_any_order() {
        let mut first = RunConfig::default();
        first.set_param("gain_min", "0.05").unwrap();
        first.set_param("smoothing", "3").unwrap();
        first.set_param("gain_type", "bb").unwrap();

        let mut second = RunConfig::default();
        second.set_param("gain_type", "bb").unwrap();
        second.set_param("smoothing", "3").unwrap();
        second.set_param("gain_min", "0.05").unwrap();

        let expected = GainKind::BarzilaiBorwein {
            gain_min: 0.05,
            gain_max: 1.0,
            smoothing: 3,
        };
        assert_eq!(first.gains.kind, expected);
        assert_eq!(second.gains.kind, expected);
        assert_eq!(first.gains.step_range(), (0.05, 1.0));
        assert_eq!(RunConfig::default().gains.step_range(), (0.01, 1.0));

        first.set_param("gain_max", "0.01").unwrap();
        assert!(first.check().is_err());
    }

    #[test]
    fn json_round_trip_keeps_defaults_for_missing_fields() {
        let config = RunConfig::from_json(r#"{ "seed": 7, "gains": { "a": 0.3 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert!((config.gains.a - 0.3).abs() < 1e-12);
        assert!((config.gains.alpha - 0.602).abs() < 1e-12);
        assert_eq!(config.window, 30);
    }

    #[test]
    fn forced_features_must_be_in_range() {
        let config = RunConfig::builder().features_to_keep(vec![5]).build().unwrap();
        assert!(config.validate(5, Algorithm::Ranking).is_err());
        assert!(config.validate(6, Algorithm::Ranking).is_ok());
    }
}
