use ndarray::Array1;
use serde::Serialize;

use super::projector::order_desc;
use crate::config::{Algorithm, RunConfig};

/// Výsledné rozhodnutie behu.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// FSR: vybrané indexy (vzostupne), poradie všetkých features a ich θ̄
    Ranking {
        selected: Vec<usize>,
        ranking: Vec<usize>,
        scores: Vec<f64>,
    },
    /// FSW: (index, váha) zostupne podľa váhy a indexy s nenulovou váhou
    Weighting {
        weights: Vec<(usize, f64)>,
        selected: Vec<usize>,
    },
}

impl Decision {
    pub fn selected(&self) -> &[usize] {
        match self {
            Decision::Ranking { selected, .. } => selected,
            Decision::Weighting { selected, .. } => selected,
        }
    }

    /// (index, skóre) v poradí dôležitosti.
    pub fn feature_scores(&self) -> Vec<(usize, f64)> {
        match self {
            Decision::Ranking { ranking, scores, .. } => {
                ranking.iter().map(|&i| (i, scores[i])).collect()
            }
            Decision::Weighting { weights, .. } => weights.clone(),
        }
    }
}

/// Z θ̄ spraví poradie/podmnožinu (FSR) alebo tabuľku váh (FSW).
/// Nepoužíva náhodu, opakované volanie dá rovnaký výsledok.
#[derive(Debug, Clone)]
pub struct OutputRanker {
    algorithm: Algorithm,
    threshold: f64,
    forced: Vec<usize>,
    num_features: Option<usize>,
    sparsity_cutoff: Option<f64>,
}

impl OutputRanker {
    pub fn from_config(config: &RunConfig, algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            threshold: config.selection_threshold,
            forced: config.features_to_keep.clone(),
            num_features: config.num_features,
            sparsity_cutoff: config.sparsity_cutoff,
        }
    }

    pub fn rank(&self, theta_bar: &Array1<f64>) -> Decision {
        let scores = theta_bar.to_vec();
        let ranking = order_desc(&scores);
        match self.algorithm {
            Algorithm::Ranking => {
                let mut selected: Vec<usize> = match self.num_features {
                    Some(k) => ranking
                        .iter()
                        .copied()
                        .filter(|i| !self.forced.contains(i))
                        .take(k)
                        .collect(),
                    None => ranking
                        .iter()
                        .copied()
                        .filter(|&i| scores[i] >= self.threshold)
                        .collect(),
                };
                selected.extend(self.forced.iter().copied());
                selected.sort_unstable();
                selected.dedup();
                // aspoň jeden feature
                if selected.is_empty() {
                    if let Some(&top) = ranking.first() {
                        selected.push(top);
                    }
                }
                Decision::Ranking {
                    selected,
                    ranking,
                    scores,
                }
            }
            Algorithm::Weighting => {
                let weights: Vec<(usize, f64)> = ranking
                    .iter()
                    .map(|&i| {
                        let w = scores[i].max(0.0);
                        match self.sparsity_cutoff {
                            Some(cutoff) if w < cutoff => (i, 0.0),
                            _ => (i, w),
                        }
                    })
                    .collect();
                let mut selected: Vec<usize> =
                    weights.iter().filter(|(_, w)| *w > 0.0).map(|(i, _)| *i).collect();
                selected.sort_unstable();
                Decision::Weighting { weights, selected }
            }
        }
    }
}
