use thiserror::Error;

#[derive(Error, Debug)]
pub enum PpForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Beatmap Fetch Error: {0}")]
    Fetch(String),

    #[error("Beatmap Parse Error: {0}")]
    Parse(String),

    #[error("Calculation Error: {0}")]
    Calculation(String),

    #[error("Input Validation Error: {0}")]
    Validation(String),
}

pub type PfResult<T> = Result<T, PpForgeError>;
