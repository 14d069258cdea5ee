use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SpsaError};

/// Jeden train/test split.
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Rozdelenie riadkov na foldy, deterministické pre daný seed.
pub trait CvSplitter: Send + Sync {
    fn get_name(&self) -> &str;

    fn split(&self, n_samples: usize, labels: &[f64]) -> Result<Vec<Fold>>;
}

fn check_folds(folds: usize, n_samples: usize) -> Result<()> {
    if folds < 2 {
        return Err(SpsaError::config(format!("počet foldov musí byť aspoň 2, zadané {}", folds)));
    }
    if folds > n_samples {
        return Err(SpsaError::config(format!(
            "počet foldov ({}) je väčší ako počet vzoriek ({})",
            folds, n_samples
        )));
    }
    Ok(())
}

/// Z priradenia riadok -> fold poskladá train/test indexy (vzostupne).
fn folds_from_assignment(assignment: &[usize], folds: usize) -> Vec<Fold> {
    (0..folds)
        .map(|f| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..assignment.len()).partition(|&i| assignment[i] == f);
            Fold { train, test }
        })
        .collect()
}

/// Zamiešaný k-fold, voliteľne opakovaný s iným zamiešaním.
#[derive(Debug, Clone)]
pub struct KFold {
    folds: usize,
    repeats: usize,
    seed: u64,
}

impl KFold {
    pub fn new(folds: usize, repeats: usize, seed: u64) -> Self {
        Self {
            folds,
            repeats: repeats.max(1),
            seed,
        }
    }
}

impl CvSplitter for KFold {
    fn get_name(&self) -> &str {
        "kfold"
    }

    fn split(&self, n_samples: usize, _labels: &[f64]) -> Result<Vec<Fold>> {
        check_folds(self.folds, n_samples)?;
        let mut result = Vec::with_capacity(self.folds * self.repeats);
        for repeat in 0..self.repeats {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(repeat as u64));
            let mut order: Vec<usize> = (0..n_samples).collect();
            order.shuffle(&mut rng);

            let mut assignment = vec![0; n_samples];
            let base = n_samples / self.folds;
            let extra = n_samples % self.folds;
            let mut start = 0;
            for f in 0..self.folds {
                let size = base + usize::from(f < extra);
                for &i in &order[start..start + size] {
                    assignment[i] = f;
                }
                start += size;
            }
            result.extend(folds_from_assignment(&assignment, self.folds));
        }
        Ok(result)
    }
}

/// Stratifikovaný k-fold: triedy (zaokrúhlené labely) sa rozdávajú do foldov
/// postupne, takže každý fold má približne rovnaké zastúpenie tried.
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    folds: usize,
    repeats: usize,
    seed: u64,
}

impl StratifiedKFold {
    pub fn new(folds: usize, repeats: usize, seed: u64) -> Self {
        Self {
            folds,
            repeats: repeats.max(1),
            seed,
        }
    }
}

impl CvSplitter for StratifiedKFold {
    fn get_name(&self) -> &str {
        "stratified_kfold"
    }

    fn split(&self, n_samples: usize, labels: &[f64]) -> Result<Vec<Fold>> {
        check_folds(self.folds, n_samples)?;
        if labels.len() != n_samples {
            return Err(SpsaError::data(format!(
                "stratifikácia potrebuje {} labelov, zadaných {}",
                n_samples,
                labels.len()
            )));
        }
        let mut classes: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (i, &label) in labels.iter().enumerate() {
            classes.entry(label.round() as i64).or_default().push(i);
        }

        let mut result = Vec::with_capacity(self.folds * self.repeats);
        for repeat in 0..self.repeats {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(repeat as u64));
            let mut assignment = vec![0; n_samples];
            let mut next = 0;
            for members in classes.values() {
                let mut members = members.clone();
                members.shuffle(&mut rng);
                for i in members {
                    assignment[i] = next % self.folds;
                    next += 1;
                }
            }
            result.extend(folds_from_assignment(&assignment, self.folds));
        }
        Ok(result)
    }
}
