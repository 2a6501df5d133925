//! Authentication for the EmailLabs API.
//!
//! The API uses HTTP Basic auth with the application key as the user name and
//! the secret key as the password.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::errors::EmailLabsError;

/// Authentication provider trait.
///
/// Implementations of this trait provide authentication credentials
/// for API requests.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> Result<(), EmailLabsError>;
}

/// HTTP Basic authentication with the app key and secret key.
pub struct BasicAuth {
    app_key: String,
    secret_key: SecretString,
}

impl BasicAuth {
    /// Creates a new Basic auth provider.
    pub fn new(app_key: impl Into<String>, secret_key: SecretString) -> Self {
        Self {
            app_key: app_key.into(),
            secret_key,
        }
    }

    /// Creates from plain strings.
    pub fn from_strings(app_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::new(app_key, SecretString::new(secret_key.into()))
    }

    /// Returns the application key.
    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    /// Gets a hint of the secret key for debugging (last 4 characters).
    pub fn secret_hint(&self) -> String {
        let chars: Vec<char> = self.secret_key.expose_secret().chars().collect();
        if chars.len() > 4 {
            format!("...{}", chars[chars.len() - 4..].iter().collect::<String>())
        } else {
            "****".to_string()
        }
    }

    /// Returns the `Authorization` header value.
    fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.app_key, self.secret_key.expose_secret());
        format!("Basic {}", BASE64.encode(raw.as_bytes()))
    }
}

impl AuthProvider for BasicAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert("Authorization".to_string(), self.header_value());
    }

    fn scheme(&self) -> &str {
        "Basic"
    }

    fn validate(&self) -> Result<(), EmailLabsError> {
        if self.app_key.is_empty() {
            return Err(EmailLabsError::configuration("App key cannot be empty"));
        }

        if self.app_key.contains(':') {
            return Err(EmailLabsError::configuration(
                "App key cannot contain ':' in Basic auth",
            ));
        }

        if self.secret_key.expose_secret().is_empty() {
            return Err(EmailLabsError::configuration("Secret key cannot be empty"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("app_key", &self.app_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
