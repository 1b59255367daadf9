//! Source error types

use std::fmt;

/// Errors raised while polling a location source
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The provider backing this source is switched off or gone
    ProviderDisabled { provider: String },
    /// The source lost its connection to the platform subsystem
    ConnectionLost { provider: String },
    /// The backend returned something unusable
    BackendError { provider: String, details: String },
}

impl SourceError {
    /// Provider the error originated from
    pub fn provider(&self) -> &str {
        match self {
            SourceError::ProviderDisabled { provider }
            | SourceError::ConnectionLost { provider }
            | SourceError::BackendError { provider, .. } => provider,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::ProviderDisabled { provider } => {
                write!(f, "Provider '{}' is disabled", provider)
            }
            SourceError::ConnectionLost { provider } => {
                write!(f, "Connection lost to provider '{}'", provider)
            }
            SourceError::BackendError { provider, details } => {
                write!(f, "Backend error from provider '{}': {}", provider, details)
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;
