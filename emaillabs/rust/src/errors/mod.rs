//! Error types for the EmailLabs transport.
//!
//! Every failure a send can hit is represented here, even though the default
//! fire-and-forget mode only logs them. Strict mode and
//! [`EmailLabsTransport::try_send`](crate::client::EmailLabsTransport::try_send)
//! hand them back to the caller.

use std::fmt;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for EmailLabs operations.
pub type EmailLabsResult<T> = Result<T, EmailLabsError>;

/// Error type for EmailLabs transport operations.
#[derive(Debug, Error)]
pub enum EmailLabsError {
    /// Configuration error (missing credentials, bad endpoint).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Message validation error raised while building a message.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message describing the validation issue.
        message: String,
        /// The field that failed validation.
        field: Option<String>,
    },

    /// A pre-send hook rejected the message.
    #[error("Pre-send hook '{hook}' rejected message: {message}")]
    Hook {
        /// Name of the hook that failed.
        hook: String,
        /// Reason given by the hook.
        message: String,
    },

    /// Network or connection failure during the POST.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be decoded as a provider response.
    #[error("Decode error (HTTP {status}): {message}")]
    Decode {
        /// Error message from the JSON decoder.
        message: String,
        /// HTTP status code of the undecodable response.
        status: u16,
        /// Raw response body, lossily converted to UTF-8.
        body: Option<String>,
    },

    /// The provider answered with a status other than `success`.
    #[error("Provider rejected message ({status}): {message}")]
    Provider {
        /// Status string reported by the provider.
        status: String,
        /// Message reported by the provider.
        message: String,
        /// `data[0]` formatted as `key:value;` pairs.
        details: String,
    },
}

/// Coarse classification of [`EmailLabsError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailLabsErrorKind {
    /// Configuration error.
    Configuration,
    /// Message validation error.
    Validation,
    /// Pre-send hook failure.
    Hook,
    /// Network or connection failure.
    Transport,
    /// Undecodable response body.
    Decode,
    /// Provider-reported failure.
    Provider,
}

impl EmailLabsErrorKind {
    /// Returns a short, stable label for metrics and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailLabsErrorKind::Configuration => "configuration",
            EmailLabsErrorKind::Validation => "validation",
            EmailLabsErrorKind::Hook => "hook",
            EmailLabsErrorKind::Transport => "transport",
            EmailLabsErrorKind::Decode => "decode",
            EmailLabsErrorKind::Provider => "provider",
        }
    }
}

impl fmt::Display for EmailLabsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EmailLabsError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> EmailLabsErrorKind {
        match self {
            EmailLabsError::Configuration { .. } => EmailLabsErrorKind::Configuration,
            EmailLabsError::Validation { .. } => EmailLabsErrorKind::Validation,
            EmailLabsError::Hook { .. } => EmailLabsErrorKind::Hook,
            EmailLabsError::Transport(_) => EmailLabsErrorKind::Transport,
            EmailLabsError::Decode { .. } => EmailLabsErrorKind::Decode,
            EmailLabsError::Provider { .. } => EmailLabsErrorKind::Provider,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        EmailLabsError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a validation error tied to a field.
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        EmailLabsError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a hook error.
    pub fn hook(hook: impl Into<String>, message: impl Into<String>) -> Self {
        EmailLabsError::Hook {
            hook: hook.into(),
            message: message.into(),
        }
    }

    /// Returns true if the provider itself reported the failure.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, EmailLabsError::Provider { .. })
    }
}

impl From<serde_json::Error> for EmailLabsError {
    fn from(err: serde_json::Error) -> Self {
        EmailLabsError::Decode {
            message: err.to_string(),
            status: 0,
            body: None,
        }
    }
}

impl From<reqwest::Error> for EmailLabsError {
    fn from(err: reqwest::Error) -> Self {
        EmailLabsError::Transport(err.into())
    }
}

impl From<url::ParseError> for EmailLabsError {
    fn from(err: url::ParseError) -> Self {
        EmailLabsError::Configuration {
            message: format!("Invalid endpoint URL: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            EmailLabsError::configuration("x").kind(),
            EmailLabsErrorKind::Configuration
        );
        assert_eq!(
            EmailLabsError::hook("guard", "no").kind(),
            EmailLabsErrorKind::Hook
        );
        assert_eq!(
            EmailLabsError::Transport(TransportError::Connection {
                message: "refused".to_string()
            })
            .kind(),
            EmailLabsErrorKind::Transport
        );
    }

    #[test]
    fn test_provider_error_display() {
        let error = EmailLabsError::Provider {
            status: "fail".to_string(),
            message: "bad smtp".to_string(),
            details: String::new(),
        };

        assert!(error.is_provider_failure());
        assert_eq!(
            error.to_string(),
            "Provider rejected message (fail): bad smtp"
        );
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: EmailLabsError = err.into();

        assert_eq!(error.kind(), EmailLabsErrorKind::Decode);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(EmailLabsErrorKind::Transport.to_string(), "transport");
        assert_eq!(EmailLabsErrorKind::Decode.as_str(), "decode");
    }
}
