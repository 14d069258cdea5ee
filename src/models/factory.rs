use super::{IModel, KnnWrapper, LinRegWrapper, LogRegWrapper, TreeWrapper};
use crate::error::{Result, SpsaError};

/// Factory pre vytváranie modelov podľa názvu
pub struct ModelFactory;

impl ModelFactory {
    /// Vytvorí model na základe názvu
    pub fn create(model_type: &str) -> Result<Box<dyn IModel>> {
        match model_type {
            "linreg" | "linear_regression" => Ok(Box::new(LinRegWrapper::new())),
            "logreg" | "logistic_regression" => Ok(Box::new(LogRegWrapper::new())),
            "knn" => Ok(Box::new(KnnWrapper::new())),
            "tree" | "decision_tree" => Ok(Box::new(TreeWrapper::new())),
            _ => Err(SpsaError::config(format!("Neznámy model: {}", model_type))),
        }
    }

    /// Vráti zoznam všetkých dostupných modelov
    pub fn available() -> Vec<&'static str> {
        vec![
            "linreg",
            "logreg",
            "knn",
            "tree",
        ]
    }

    /// Vráti popis modelu
    pub fn get_description(model_type: &str) -> Option<&'static str> {
        match model_type {
            "linreg" => Some("Lineárna Regresia - predikcia spojitých hodnôt"),
            "logreg" => Some("Logistická Regresia - binárna klasifikácia"),
            "knn" => Some("K-Nearest Neighbors - regresia priemerom susedov"),
            "tree" => Some("Rozhodovací strom - regresia"),
            _ => None,
        }
    }

    /// Určí typ modelu (classification/regression)
    pub fn get_model_type(model_type: &str) -> Option<&'static str> {
        match model_type {
            "linreg" | "knn" | "tree" => Some("regression"),
            "logreg" => Some("classification"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::linalg::basic::matrix::DenseMatrix;

    fn line() -> (DenseMatrix<f64>, Vec<f64>) {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let y = rows.iter().map(|r| if r[0] >= 10.0 { 1.0 } else { 0.0 }).collect();
        (DenseMatrix::from_2d_vec(&rows).unwrap(), y)
    }

    #[test]
    fn every_model_fits_and_predicts() {
        let (x, y) = line();
        for name in ModelFactory::available() {
            let model = ModelFactory::create(name).unwrap();
            let trained = model.fit(&x, &y).unwrap();
            let pred = trained.predict(&x).unwrap();
            assert_eq!(pred.len(), y.len(), "{}", name);
            assert!(pred.iter().all(|v| v.is_finite()), "{}", name);
            assert!(ModelFactory::get_description(name).is_some());
        }
    }

    #[test]
    fn params_are_validated() {
        let mut knn = ModelFactory::create("knn").unwrap();
        assert!(knn.set_param("k", "3").is_ok());
        assert!(knn.set_param("k", "0").is_err());
        assert!(knn.set_param("depth", "3").is_err());

        let mut linreg = ModelFactory::create("linreg").unwrap();
        assert_eq!(linreg.get_supported_params(), vec!["solver"]);
        assert!(linreg.set_param("solver", "svd").is_ok());
        assert!(linreg.set_param("solver", "cholesky").is_err());

        assert!(ModelFactory::create("svm").is_err());
    }
}
