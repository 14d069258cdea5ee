use ndarray::Array1;

use crate::config::{Algorithm, RunConfig};

/// Rozhodnutie, ktoré ide do objective: maska (FSR) alebo váhy (FSW).
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Mask(Vec<bool>),
    Weights(Vec<f64>),
}

impl Projection {
    pub fn len(&self) -> usize {
        match self {
            Projection::Mask(m) => m.len(),
            Projection::Weights(w) => w.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Počet features, ktoré sa reálne dostanú do modelu.
    pub fn selected_count(&self) -> usize {
        match self {
            Projection::Mask(m) => m.iter().filter(|&&b| b).count(),
            Projection::Weights(w) => w.iter().filter(|&&v| v > 0.0).count(),
        }
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        match self {
            Projection::Mask(m) => m
                .iter()
                .enumerate()
                .filter(|(_, &b)| b)
                .map(|(i, _)| i)
                .collect(),
            Projection::Weights(w) => w
                .iter()
                .enumerate()
                .filter(|(_, &v)| v > 0.0)
                .map(|(i, _)| i)
                .collect(),
        }
    }
}

/// Indexy zoradené zostupne podľa hodnoty, pri zhode podľa indexu.
pub fn order_desc(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[j].total_cmp(&values[i]).then(i.cmp(&j)));
    order
}

/// Zobrazenie spojitého θ na rozhodnutie.
///
/// `project` je čistá funkcia od θ a (voliteľne) vektora uniformných ťahov,
/// náhodu dodáva volajúci.
#[derive(Debug, Clone)]
pub enum Projector {
    Ranking {
        threshold: f64,
        forced: Vec<usize>,
        num_features: Option<usize>,
    },
    Weighting {
        lower: f64,
        upper: f64,
    },
}

impl Projector {
    pub fn from_config(config: &RunConfig, algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Ranking => Projector::Ranking {
                threshold: config.selection_threshold,
                forced: config.features_to_keep.clone(),
                num_features: config.num_features,
            },
            Algorithm::Weighting => Projector::Weighting {
                lower: config.lower,
                upper: config.upper,
            },
        }
    }

    /// Stochastické zaokrúhľovanie potrebuje ťahy len pri automatickom výbere.
    pub fn needs_draws(&self) -> bool {
        matches!(self, Projector::Ranking { num_features: None, .. })
    }

    pub fn project(&self, theta: &Array1<f64>, draws: Option<&Array1<f64>>) -> Projection {
        match self {
            Projector::Ranking { threshold, forced, num_features } => {
                let mut mask = match (num_features, draws) {
                    (Some(k), _) => top_k_mask(theta, *k, forced),
                    (None, Some(u)) => theta.iter().zip(u.iter()).map(|(&t, &u)| u < t).collect(),
                    (None, None) => theta.iter().map(|&t| t >= *threshold).collect(),
                };
                for &i in forced {
                    mask[i] = true;
                }
                Projection::Mask(mask)
            }
            Projector::Weighting { lower, upper } => {
                Projection::Weights(theta.iter().map(|&t| t.clamp(*lower, *upper)).collect())
            }
        }
    }

    /// Deterministická verzia (prah pre FSR), použitá na záznam a best tracking.
    pub fn project_threshold(&self, theta: &Array1<f64>) -> Projection {
        self.project(theta, None)
    }
}

fn top_k_mask(theta: &Array1<f64>, k: usize, forced: &[usize]) -> Vec<bool> {
    let values: Vec<f64> = theta.to_vec();
    let mut mask = vec![false; values.len()];
    order_desc(&values)
        .into_iter()
        .filter(|i| !forced.contains(i))
        .take(k)
        .for_each(|i| mask[i] = true);
    mask
}
