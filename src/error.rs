use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Malformed LLM response: {0}")]
    MalformedLlmResponse(String),

    #[error("Travel data error: {0}")]
    TravelData(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
