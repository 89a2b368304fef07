use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Message suitable for a toast, without the variant prefix
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the Velocity server".to_string(),
            ApiError::Serialization(_) => "Unexpected response from the server".to_string(),
            ApiError::Api(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::BadRequest(msg) => msg.clone(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
