/// Errors surfaced by a feature selection run.
///
/// A run is all-or-nothing: any of these aborts it and is returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("ConfigurationError: {0}")]
    Configuration(String),
    #[error("EvaluationError: mask={mask}, reason={reason}")]
    Evaluation { mask: String, reason: String },
    #[error("DataError: {0}")]
    Data(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("YamlError: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JsonError: {0}")]
    Json(#[from] serde_json::Error),
    #[error("BincodeError: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("CsvError: {0}")]
    Csv(#[from] csv::Error),
}

impl SelectorError {
    pub(crate) fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn evaluation<S: Into<String>>(mask: &[bool], reason: S) -> Self {
        Self::Evaluation {
            mask: crate::utils::mask_to_string(mask),
            reason: reason.into(),
        }
    }

    pub(crate) fn data<S: Into<String>>(message: S) -> Self {
        Self::Data(message.into())
    }
}
