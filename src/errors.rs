#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("backend request failed: {0}")]
    Transport(String),

    #[error("invalid arguments for {operation}: {reason}")]
    ArgumentParse { operation: String, reason: String },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("language model error: {0}")]
    ModelCall(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn argument_parse(operation: impl Into<String>, reason: impl ToString) -> Self {
        AppError::ArgumentParse {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
