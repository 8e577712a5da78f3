#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Serialization(format!("JSON deserialization/serialization error: {}", error))
    }
}

impl From<url::ParseError> for ClientError {
    fn from(error: url::ParseError) -> Self {
        ClientError::Configuration(format!("Invalid endpoint URL: {}", error))
    }
}

// Result alias used across the crate
pub type ClientResult<T> = Result<T, ClientError>;
