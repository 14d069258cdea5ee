use ndarray::Array1;

/// Posun θ podľa odhadu gradientu: θ_{k+1} = clip(θ_k − a_k·ĝ).
///
/// Zmena každej zložky sa najprv orezáva na `max_step` (ak je nastavený),
/// potom sa θ orezáva na [lower, upper].
#[derive(Debug, Clone)]
pub struct UpdateEngine {
    theta: Array1<f64>,
    initial: Array1<f64>,
    lower: f64,
    upper: f64,
    max_step: Option<f64>,
    previous: Option<(Array1<f64>, Array1<f64>)>,
}

impl UpdateEngine {
    pub fn new(initial: Array1<f64>, lower: f64, upper: f64, max_step: Option<f64>) -> Self {
        let initial = initial.mapv(|v| v.clamp(lower, upper));
        Self {
            theta: initial.clone(),
            initial,
            lower,
            upper,
            max_step,
            previous: None,
        }
    }

    /// Štart v strede rozsahu.
    pub fn midpoint(dim: usize, lower: f64, upper: f64, max_step: Option<f64>) -> Self {
        Self::new(Array1::from_elem(dim, 0.5 * (lower + upper)), lower, upper, max_step)
    }

    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// (θ_{k−1}, ĝ_{k−1}) z poslednej aktualizácie.
    pub fn previous(&self) -> Option<(&Array1<f64>, &Array1<f64>)> {
        self.previous.as_ref().map(|(t, g)| (t, g))
    }

    fn moved(&self, base: &Array1<f64>, ghat: &Array1<f64>, a: f64) -> Array1<f64> {
        let mut change = ghat.mapv(|g| -a * g);
        if let Some(limit) = self.max_step {
            change.mapv_inplace(|d| d.clamp(-limit, limit));
        }
        let (lower, upper) = (self.lower, self.upper);
        let mut theta = base.clone();
        theta.zip_mut_with(&change, |t, &d| *t = (*t + d).clamp(lower, upper));
        theta
    }

    pub fn step(&mut self, ghat: &Array1<f64>, a_k: f64) {
        let next = self.moved(&self.theta, ghat, a_k);
        let old = std::mem::replace(&mut self.theta, next);
        self.previous = Some((old, ghat.clone()));
    }

    /// Dodatočný posun z `base` s krokom `a` (pokus o nový výber).
    /// Históriu pre BB nemení.
    pub fn nudge(&mut self, base: &Array1<f64>, ghat: &Array1<f64>, a: f64) {
        self.theta = self.moved(base, ghat, a);
    }

    /// Návrat na štartovacie hodnoty (reštart po stagnácii).
    pub fn reset(&mut self) {
        self.theta = self.initial.clone();
        self.previous = None;
    }
}
