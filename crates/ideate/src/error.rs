use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
    #[error("Operating system certificate store is unavailable: {0}")]
    TrustStoreUnavailable(String),
    #[error("Failed to set up connection: {0}")]
    ConnectionSetupFailed(String),
    #[error("Invalid identity host: {0}")]
    InvalidIdentityHost(String),
    #[error("Token cannot be used as a header value. Must be ASCII.")]
    InvalidHeaderValue,
    #[error("Request to fetch token failed: {0}")]
    OAuth2RequestFailed(String),
    #[error("Failed to parse token response: {0}")]
    OAuth2ParseError(String),
    #[error("Request failed: {0}")]
    ReqwestFailed(#[from] Arc<reqwest::Error>),
}

impl Error {
    pub(crate) fn setup(reason: impl std::fmt::Display) -> Self {
        Self::ConnectionSetupFailed(reason.to_string())
    }
}
