use thiserror::Error;

/// Chyby celej knižnice.
///
/// `Config` a `Data` vznikajú ešte pred spustením optimalizácie, `Model` a
/// `NonFinite` sú zlyhania jedného vyhodnotenia (objective ich prekladá na
/// sentinel), `ExcessiveFailures` ukončí beh.
#[derive(Debug, Error)]
pub enum SpsaError {
    #[error("neplatná konfigurácia: {0}")]
    Config(String),

    #[error("neplatné dáta: {0}")]
    Data(String),

    #[error("model zlyhal: {0}")]
    Model(String),

    #[error("vyhodnotenie vrátilo nekonečnú hodnotu ({0})")]
    NonFinite(f64),

    #[error("príliš veľa zlyhaných vyhodnotení: {failures} z {calls} (limit {limit:.2})")]
    ExcessiveFailures {
        failures: usize,
        calls: usize,
        limit: f64,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SpsaError {
    pub fn config(msg: impl Into<String>) -> Self {
        SpsaError::Config(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        SpsaError::Model(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        SpsaError::Data(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SpsaError>;
