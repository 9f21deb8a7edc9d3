use thiserror::Error;

/// Failures while loading or running a PAC script.
///
/// The helper predicates themselves never fail; malformed input there
/// degrades to `false`.
#[derive(Debug, Error)]
pub enum PacError {
    #[error("failed to read PAC script: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to download PAC script: {0}")]
    Http(#[from] reqwest::Error),
    #[error("PAC download failed: HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("URL has no host: {0}")]
    NoHost(String),
    #[error("PAC script error: {0}")]
    Script(String),
    #[error("FindProxyForURL is not defined by the PAC script")]
    MissingFunction,
}

impl From<boa_engine::JsError> for PacError {
    fn from(err: boa_engine::JsError) -> Self {
        PacError::Script(err.to_string())
    }
}
