//! Error types for the Ladle domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the orchestrator turns any
//! of them into a task's failure cause.

use thiserror::Error;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Whether a fresh attempt at the same request could plausibly succeed.
    ///
    /// Authentication and configuration problems will fail the same way
    /// every time, so they are not worth another round trip.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Network(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::AuthenticationFailed(_) | Self::ModelNotFound(_) | Self::NotConfigured(_) => {
                false
            }
        }
    }
}

/// Errors raised while registering, resolving, or executing a capability.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Capability already registered: {0}")]
    Duplicate(String),

    #[error("Unknown capability: {0}")]
    Unknown(String),

    #[error("Invalid parameter schema for {capability}: {reason}")]
    InvalidSchema { capability: String, reason: String },

    #[error("Invalid parameters for {capability}: {reason}")]
    InvalidParameters { capability: String, reason: String },

    #[error("Capability {capability} failed: {source}")]
    ExecutionFailed {
        capability: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CapabilityError {
    /// Wrap an underlying failure, keeping it as the error source.
    pub fn execution(
        capability: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ExecutionFailed {
            capability: capability.into(),
            source: source.into(),
        }
    }

    /// Shorthand for a parameter validation failure.
    pub fn invalid_parameters(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            capability: capability.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while asking the model for the next action.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("model call failed after {attempts} attempt(s): {source}")]
    Provider {
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    #[error("could not parse model reply: {reason}")]
    Parse { reason: String, reply: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn capability_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = CapabilityError::execution("search_recipe", io);
        assert!(err.to_string().contains("search_recipe"));
        assert!(err.to_string().contains("connection reset"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection reset");
    }

    #[test]
    fn transient_provider_errors() {
        assert!(ProviderError::Network("reset".into()).is_transient());
        assert!(ProviderError::RateLimited { retry_after_secs: 1 }.is_transient());
        assert!(
            ProviderError::ApiError {
                status_code: 502,
                message: "bad gateway".into()
            }
            .is_transient()
        );
        assert!(
            !ProviderError::ApiError {
                status_code: 400,
                message: "bad request".into()
            }
            .is_transient()
        );
        assert!(!ProviderError::AuthenticationFailed("bad key".into()).is_transient());
    }

    #[test]
    fn parse_error_displays_reason() {
        let err = SelectionError::Parse {
            reason: "missing field `action`".into(),
            reply: "{}".into(),
        };
        assert!(err.to_string().contains("missing field `action`"));
    }
}
