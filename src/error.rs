use thiserror::Error;

/// Failures of the transport channel.
///
/// Business errors reported by the backend are not represented here: they
/// travel as [`ApiError`](crate::domain::payment::ApiError) inside an
/// `ApiReply::Rejected` and end up in the session transcript.
#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Missing input: {0}")]
    MissingInput(&'static str),
}

pub type Result<T> = std::result::Result<T, TerminalError>;
