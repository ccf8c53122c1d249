use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChardexError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("API error: {0}")]
    Api(String),

    #[error("Response is missing '{0}'")]
    MissingField(&'static str),

    #[error("ChardexError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for ChardexError {
    fn from(error: std::io::Error) -> Self {
        ChardexError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for ChardexError {
    fn from(error: reqwest::Error) -> Self {
        ChardexError::Reqwest(Box::new(error))
    }
}
