use super::{FeatureSelector, SpsaRankingSelector, SpsaWeightingSelector};
use crate::config::SUPPORTED_PARAMS;
use crate::error::{Result, SpsaError};

/// Factory pre vytváranie feature selektorov podľa názvu
pub struct FeatureSelectorFactory;

impl FeatureSelectorFactory {
    /// Vytvorí feature selektor na základe názvu
    pub fn create(selector_type: &str) -> Result<Box<dyn FeatureSelector>> {
        match selector_type {
            "spsa_fsr" | "spsa" | "fsr" => Ok(Box::new(SpsaRankingSelector::new())),
            "spsa_fsw" | "fsw" => Ok(Box::new(SpsaWeightingSelector::new())),
            _ => Err(SpsaError::config(format!("Neznámy feature selektor: {}", selector_type))),
        }
    }

    /// Vráti zoznam všetkých dostupných feature selektorov
    pub fn available() -> Vec<&'static str> {
        vec!["spsa_fsr", "spsa_fsw"]
    }

    /// Vráti popis feature selektora
    pub fn get_description(selector_type: &str) -> Option<&'static str> {
        match selector_type {
            "spsa_fsr" => Some("SPSA-FSR - wrapper výber a poradie features minimalizáciou CV chyby modelu"),
            "spsa_fsw" => Some("SPSA-FSW - wrapper váhovanie features minimalizáciou CV chyby modelu"),
            _ => None,
        }
    }

    /// Vráti podporované typy problémov pre selector
    pub fn get_supported_types(selector_type: &str) -> Vec<&'static str> {
        match selector_type {
            "spsa_fsr" | "spsa_fsw" => vec!["regression", "classification"],
            _ => vec![],
        }
    }

    /// Vráti podporované parametre pre selector
    pub fn get_supported_params(selector_type: &str) -> Vec<&'static str> {
        match selector_type {
            "spsa_fsr" | "spsa_fsw" => {
                let mut params = vec!["model", "metric"];
                params.extend(SUPPORTED_PARAMS.iter().copied());
                params
            }
            _ => vec![],
        }
    }
}
