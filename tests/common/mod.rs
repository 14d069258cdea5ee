#![allow(dead_code)]

use rand::distributions::Distribution;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smartcore::linalg::basic::matrix::DenseMatrix;
use statrs::distribution::Normal;

use spsa_fs::Projection;

pub const INFORMATIVE: [usize; 3] = [3, 9, 15];
pub const P: usize = 20;

/// Syntetická chyba: 5 za každý chýbajúci informatívny feature, 2 za každý
/// vybraný šumový.
pub fn subset_error(projection: &Projection) -> f64 {
    match projection {
        Projection::Mask(mask) => mask
            .iter()
            .enumerate()
            .map(|(i, &keep)| match (INFORMATIVE.contains(&i), keep) {
                (true, false) => 5.0,
                (false, true) => 2.0,
                _ => 0.0,
            })
            .sum(),
        Projection::Weights(_) => f64::NAN,
    }
}

/// Kvadratická chyba váh: informatívne chcú váhu 1, šumové 0.
pub fn weight_error(projection: &Projection) -> f64 {
    match projection {
        Projection::Weights(weights) => weights
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                if INFORMATIVE.contains(&i) {
                    3.0 * (1.0 - w) * (1.0 - w)
                } else {
                    w * w
                }
            })
            .sum(),
        Projection::Mask(_) => f64::NAN,
    }
}

/// y = 3·x0 + 0.1·ε, ostatné stĺpce sú nezávislý šum.
pub fn regression_dataset(n: usize, p: usize, seed: u64) -> (DenseMatrix<f64>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..p).map(|_| normal.sample(&mut rng)).collect())
        .collect();
    let y: Vec<f64> = rows
        .iter()
        .map(|r| 3.0 * r[0] + 0.1 * normal.sample(&mut rng))
        .collect();
    (DenseMatrix::from_2d_vec(&rows).unwrap(), y)
}

/// y = 2·(x3 + x9 + x15) + 0.1·ε nad `P` stĺpcami štandardného šumu.
pub fn informative_dataset(n: usize, seed: u64) -> (DenseMatrix<f64>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..P).map(|_| normal.sample(&mut rng)).collect())
        .collect();
    let y: Vec<f64> = rows
        .iter()
        .map(|r| 2.0 * INFORMATIVE.iter().map(|&i| r[i]).sum::<f64>() + 0.1 * normal.sample(&mut rng))
        .collect();
    (DenseMatrix::from_2d_vec(&rows).unwrap(), y)
}
