use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Could not parse {format} transcript: {reason}")]
    ParseFailed { format: String, reason: String },

    #[error("Parsed {format} input but found no usable segments")]
    EmptyTranscript { format: String },

    #[error("Embedding collaborator failed: {reason}")]
    Collaborator { reason: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
