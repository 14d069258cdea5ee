use ndarray::Array1;

use super::projector::{Projection, Projector};
use crate::evaluation::{GuardedObjective, ObjectiveResult};

/// Jeden dvojbodový SPSA odhad.
#[derive(Debug, Clone)]
pub struct GradientEstimate {
    pub ghat: Array1<f64>,
    pub y_plus: ObjectiveResult,
    pub y_minus: ObjectiveResult,
    pub plus: Projection,
    pub minus: Projection,
}

/// ĝ_i = (y⁺ − y⁻) / (2·c_k·Δ_i), kde y± = f(project(θ ± c_k·Δ)).
///
/// Obe strany sa premietajú s rovnakými ťahmi `draws`. Ak obe vyhodnotenia
/// zlyhali, odhad je nulový a θ sa v tejto iterácii nepohne.
pub fn estimate(
    theta: &Array1<f64>,
    delta: &Array1<f64>,
    c_k: f64,
    draws: Option<&Array1<f64>>,
    projector: &Projector,
    objective: &GuardedObjective<'_>,
    parallel: bool,
) -> GradientEstimate {
    let theta_plus = theta + &(delta * c_k);
    let theta_minus = theta - &(delta * c_k);
    let plus = projector.project(&theta_plus, draws);
    let minus = projector.project(&theta_minus, draws);

    let (y_plus, y_minus) = if parallel {
        rayon::join(|| objective.evaluate(&plus), || objective.evaluate(&minus))
    } else {
        (objective.evaluate(&plus), objective.evaluate(&minus))
    };

    let ghat = if y_plus.sentinel && y_minus.sentinel {
        Array1::zeros(theta.len())
    } else {
        let diff = y_plus.value - y_minus.value;
        delta.mapv(|d| diff / (2.0 * c_k * d))
    };

    GradientEstimate {
        ghat,
        y_plus,
        y_minus,
        plus,
        minus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::FnObjective;
    use crate::spsa::{PerturbationGenerator, RandomStream};

    fn weighting() -> Projector {
        Projector::Weighting { lower: 0.0, upper: 10.0 }
    }

    fn linear(projection: &Projection) -> f64 {
        let b = [1.0, -2.0, 0.5];
        match projection {
            Projection::Weights(w) => w.iter().zip(b.iter()).map(|(w, b)| w * b).sum(),
            Projection::Mask(_) => unreachable!(),
        }
    }

    #[test]
    fn one_dimensional_linear_is_exact() {
        let objective = FnObjective(|p: &Projection| match p {
            Projection::Weights(w) => 3.0 * w[0],
            Projection::Mask(_) => 0.0,
        });
        let guarded = GuardedObjective::new(&objective, 1e6, 0.5, 10);
        for &d in &[1.0, -1.0] {
            let est = estimate(
                &Array1::from(vec![5.0]),
                &Array1::from(vec![d]),
                0.1,
                None,
                &weighting(),
                &guarded,
                false,
            );
            assert!((est.ghat[0] - 3.0).abs() < 1e-9);
        }
        assert_eq!(guarded.calls(), 4);
    }

    #[test]
    fn average_matches_true_gradient() {
        let objective = FnObjective(linear);
        let guarded = GuardedObjective::new(&objective, 1e6, 0.5, 10);
        let theta = Array1::from(vec![5.0, 5.0, 5.0]);
        let generator = PerturbationGenerator::new(3);
        let mut stream = RandomStream::new(7);
        let rounds = 4000;
        let mut sum = Array1::<f64>::zeros(3);
        for _ in 0..rounds {
            let delta = generator.generate(&mut stream);
            let est = estimate(&theta, &delta, 0.2, None, &weighting(), &guarded, true);
            sum += &est.ghat;
        }
        let mean = sum / rounds as f64;
        for (got, want) in mean.iter().zip([1.0, -2.0, 0.5].iter()) {
            assert!((got - want).abs() < 0.15, "{} vs {}", got, want);
        }
    }

    #[test]
    fn both_sentinels_give_zero_gradient() {
        let objective = FnObjective(|_: &Projection| f64::INFINITY);
        let guarded = GuardedObjective::new(&objective, 1e6, 1.0, 10);
        let est = estimate(
            &Array1::from(vec![0.5, 0.5]),
            &Array1::from(vec![1.0, -1.0]),
            0.05,
            None,
            &weighting(),
            &guarded,
            false,
        );
        assert_eq!(est.ghat, Array1::from(vec![0.0, 0.0]));
        assert!(est.y_plus.sentinel && est.y_minus.sentinel);
        assert_eq!(guarded.failures(), 2);
    }

    #[test]
    fn common_draws_for_both_sides() {
        let projector = Projector::Ranking {
            threshold: 0.5,
            forced: vec![],
            num_features: None,
        };
        let objective = FnObjective(|p: &Projection| p.selected_count() as f64);
        let guarded = GuardedObjective::new(&objective, 1e6, 0.5, 10);
        let theta = Array1::from(vec![0.5, 0.5]);
        let delta = Array1::from(vec![1.0, 1.0]);
        // u = 0.52 leží medzi θ⁻ = 0.4 a θ⁺ = 0.6
        let draws = Array1::from(vec![0.52, 0.52]);
        let est = estimate(&theta, &delta, 0.1, Some(&draws), &projector, &guarded, false);
        assert_eq!(est.plus, Projection::Mask(vec![true, true]));
        assert_eq!(est.minus, Projection::Mask(vec![false, false]));
        assert!((est.ghat[0] - 10.0).abs() < 1e-9);
    }
}
