use rayon::prelude::*;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::metrics::ErrorMetric;
use super::objective::{Objective, ObjectiveResult};
use super::splitter::Fold;
use crate::error::{Result, SpsaError};
use crate::models::IModel;
use crate::spsa::Projection;

/// Objective = priemerná chyba modelu cez CV foldy.
///
/// FSR maska vyberá stĺpce, FSW váhy stĺpce škálujú (nulová váha stĺpec
/// vypustí). Foldy sa pri `parallel` vyhodnocujú súbežne.
pub struct CrossValidatedObjective<'d> {
    x: &'d DenseMatrix<f64>,
    y: &'d [f64],
    model: &'d dyn IModel,
    metric: &'d dyn ErrorMetric,
    folds: Vec<Fold>,
    parallel: bool,
}

impl<'d> CrossValidatedObjective<'d> {
    pub fn new(
        x: &'d DenseMatrix<f64>,
        y: &'d [f64],
        model: &'d dyn IModel,
        metric: &'d dyn ErrorMetric,
        folds: Vec<Fold>,
        parallel: bool,
    ) -> Self {
        Self {
            x,
            y,
            model,
            metric,
            folds,
            parallel,
        }
    }

    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    /// Podmatica pre dané riadky a rozhodnutie.
    fn design(&self, rows: &[usize], columns: &[(usize, f64)]) -> Result<DenseMatrix<f64>> {
        let data: Vec<Vec<f64>> = rows
            .iter()
            .map(|&r| columns.iter().map(|&(c, w)| *self.x.get((r, c)) * w).collect())
            .collect();
        DenseMatrix::from_2d_vec(&data).map_err(|e| SpsaError::data(format!("{:?}", e)))
    }

    fn fold_error(&self, fold: &Fold, columns: &[(usize, f64)]) -> Result<f64> {
        if fold.train.is_empty() || fold.test.is_empty() {
            return Err(SpsaError::data("prázdny fold"));
        }
        let x_train = self.design(&fold.train, columns)?;
        let x_test = self.design(&fold.test, columns)?;
        let y_train: Vec<f64> = fold.train.iter().map(|&r| self.y[r]).collect();
        let y_test: Vec<f64> = fold.test.iter().map(|&r| self.y[r]).collect();

        let trained = self.model.fit(&x_train, &y_train)?;
        let y_pred = trained.predict(&x_test)?;
        if y_pred.len() != y_test.len() {
            return Err(SpsaError::model(format!(
                "model vrátil {} predikcií pre {} vzoriek",
                y_pred.len(),
                y_test.len()
            )));
        }
        let error = self.metric.score(&y_test, &y_pred);
        if !error.is_finite() {
            return Err(SpsaError::NonFinite(error));
        }
        Ok(error)
    }
}

impl Objective for CrossValidatedObjective<'_> {
    fn get_name(&self) -> String {
        format!("{} / {}", self.model.get_name(), self.metric.get_name())
    }

    fn evaluate(&self, projection: &Projection) -> Result<ObjectiveResult> {
        let (_, p) = self.x.shape();
        if projection.len() != p {
            return Err(SpsaError::data(format!(
                "rozhodnutie má dĺžku {}, dataset má {} features",
                projection.len(),
                p
            )));
        }
        let columns: Vec<(usize, f64)> = match projection {
            Projection::Mask(mask) => mask
                .iter()
                .enumerate()
                .filter(|(_, &keep)| keep)
                .map(|(i, _)| (i, 1.0))
                .collect(),
            Projection::Weights(weights) => weights
                .iter()
                .enumerate()
                .filter(|(_, &w)| w > 0.0)
                .map(|(i, &w)| (i, w))
                .collect(),
        };
        if columns.is_empty() {
            return Err(SpsaError::model("žiadny feature nie je vybraný"));
        }

        let errors: Vec<f64> = if self.parallel {
            self.folds
                .par_iter()
                .map(|fold| self.fold_error(fold, &columns))
                .collect::<Result<Vec<f64>>>()?
        } else {
            self.folds
                .iter()
                .map(|fold| self.fold_error(fold, &columns))
                .collect::<Result<Vec<f64>>>()?
        };
        Ok(ObjectiveResult::from_folds(errors))
    }
}
