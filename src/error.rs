use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("content file is not valid TOML: {0}")]
    ContentParse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<CardError> for std::io::Error {
    fn from(err: CardError) -> Self {
        match err {
            CardError::Io(io) => io,
            other => std::io::Error::other(other.to_string()),
        }
    }
}
