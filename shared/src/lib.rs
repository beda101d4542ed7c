// shared/src/lib.rs

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Missing BREWFATHER_USER_ID or BREWFATHER_API_KEY environment variables")]
    ConfigurationMissing,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Brewfather API error: HTTP {0}")]
    UpstreamHttp(u16),
    #[error("Brewfather API unreachable: {0}")]
    UpstreamTransport(String),
    #[error("Brewfather API returned invalid JSON: {0}")]
    UpstreamDecode(String),
    #[error("Invalid data format from Brewfather API: {0}")]
    InvalidResponse(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::UpstreamDecode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
