//! Configuration module for the EmailLabs client.
//!
//! Holds the API credentials, the SMTP account messages are sent through,
//! the endpoint and the delivery mode.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::errors::{EmailLabsError, EmailLabsResult};

/// Default `sendmail` endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.emaillabs.net.pl/api/sendmail";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How send failures reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Failures are logged and swallowed; `send` always succeeds.
    #[default]
    FireAndForget,
    /// Failures are logged and returned as typed errors.
    Strict,
}

/// Provider settings in the `{secret, app, smtp}` shape used by mail
/// configuration files.
#[derive(Clone, Deserialize)]
pub struct ProviderSettings {
    /// API secret key.
    pub secret: SecretString,
    /// API application key.
    pub app: String,
    /// SMTP account name.
    pub smtp: String,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("secret", &"[REDACTED]")
            .field("app", &self.app)
            .field("smtp", &self.smtp)
            .finish()
    }
}

/// Configuration for the EmailLabs client.
#[derive(Clone)]
pub struct EmailLabsConfig {
    /// Application key, used as the Basic auth user name.
    pub app_key: String,
    /// Secret key (stored securely).
    pub(crate) secret_key: SecretString,
    /// Provider-side SMTP account name.
    pub smtp_account: String,
    /// Full URL of the `sendmail` endpoint.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Delivery mode.
    pub delivery_mode: DeliveryMode,
}

impl EmailLabsConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> EmailLabsConfigBuilder {
        EmailLabsConfigBuilder::new()
    }

    /// Creates a configuration from `{secret, app, smtp}` settings.
    pub fn from_settings(settings: ProviderSettings) -> EmailLabsResult<Self> {
        EmailLabsConfigBuilder::new()
            .app_key(settings.app)
            .secret_key(settings.secret.expose_secret().as_str())
            .smtp_account(settings.smtp)
            .build()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EMAILLABS_APP_KEY` (required): application key
    /// - `EMAILLABS_SECRET_KEY` (required): secret key
    /// - `EMAILLABS_SMTP_ACCOUNT` (required): SMTP account name
    /// - `EMAILLABS_ENDPOINT` (optional): custom endpoint URL
    /// - `EMAILLABS_TIMEOUT` (optional): request timeout in seconds
    /// - `EMAILLABS_STRICT` (optional): `1` or `true` for strict delivery
    pub fn from_env() -> EmailLabsResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> EmailLabsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| {
                EmailLabsError::configuration(format!("{} environment variable not set", name))
            })
        };

        let mut builder = EmailLabsConfigBuilder::new()
            .app_key(required("EMAILLABS_APP_KEY")?)
            .secret_key(required("EMAILLABS_SECRET_KEY")?)
            .smtp_account(required("EMAILLABS_SMTP_ACCOUNT")?);

        if let Some(endpoint) = lookup("EMAILLABS_ENDPOINT") {
            builder = builder.endpoint(endpoint);
        }

        if let Some(timeout_str) = lookup("EMAILLABS_TIMEOUT") {
            let secs = timeout_str.trim().parse::<u64>().map_err(|_| {
                EmailLabsError::configuration(format!(
                    "EMAILLABS_TIMEOUT must be a number of seconds, got '{}'",
                    timeout_str
                ))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(strict) = lookup("EMAILLABS_STRICT") {
            if matches!(strict.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                builder = builder.delivery_mode(DeliveryMode::Strict);
            }
        }

        builder.build()
    }

    /// Returns the secret key (exposing the secret).
    pub(crate) fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Returns true in strict delivery mode.
    pub fn is_strict(&self) -> bool {
        self.delivery_mode == DeliveryMode::Strict
    }
}

impl std::fmt::Debug for EmailLabsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailLabsConfig")
            .field("app_key", &self.app_key)
            .field("secret_key", &"[REDACTED]")
            .field("smtp_account", &self.smtp_account)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("delivery_mode", &self.delivery_mode)
            .finish()
    }
}

/// Builder for `EmailLabsConfig`.
#[derive(Default)]
pub struct EmailLabsConfigBuilder {
    app_key: Option<String>,
    secret_key: Option<String>,
    smtp_account: Option<String>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    delivery_mode: DeliveryMode,
}

impl EmailLabsConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application key.
    pub fn app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    /// Sets the secret key.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Sets the SMTP account name.
    pub fn smtp_account(mut self, smtp_account: impl Into<String>) -> Self {
        self.smtp_account = Some(smtp_account.into());
        self
    }

    /// Overrides the endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the delivery mode.
    pub fn delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.delivery_mode = mode;
        self
    }

    /// Shorthand for [`DeliveryMode::Strict`].
    pub fn strict(self) -> Self {
        self.delivery_mode(DeliveryMode::Strict)
    }

    /// Builds the configuration.
    pub fn build(self) -> EmailLabsResult<EmailLabsConfig> {
        let app_key = non_empty(self.app_key, "App key")?;
        let secret_key = non_empty(self.secret_key, "Secret key")?;
        let smtp_account = non_empty(self.smtp_account, "SMTP account")?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let parsed = url::Url::parse(&endpoint)?;

        match parsed.scheme() {
            "https" => {}
            "http" => {
                tracing::warn!(endpoint = %endpoint, "EmailLabs endpoint does not use HTTPS");
            }
            other => {
                return Err(EmailLabsError::configuration(format!(
                    "Unsupported endpoint scheme '{}'",
                    other
                )));
            }
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(EmailLabsError::configuration("Timeout must be greater than zero"));
        }

        Ok(EmailLabsConfig {
            app_key,
            secret_key: SecretString::new(secret_key),
            smtp_account,
            endpoint,
            timeout,
            delivery_mode: self.delivery_mode,
        })
    }
}

fn non_empty(value: Option<String>, what: &str) -> EmailLabsResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(EmailLabsError::configuration(format!("{} cannot be empty", what))),
        None => Err(EmailLabsError::configuration(format!("{} is required", what))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> EmailLabsConfigBuilder {
        EmailLabsConfig::builder()
            .app_key("app_key_1")
            .secret_key("secret_key_1")
            .smtp_account("1.acme.smtp")
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = base().build().unwrap();

        assert_eq!(config.app_key, "app_key_1");
        assert_eq!(config.secret_key(), "secret_key_1");
        assert_eq!(config.smtp_account, "1.acme.smtp");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.delivery_mode, DeliveryMode::FireAndForget);
        assert!(!config.is_strict());
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = base()
            .endpoint("http://127.0.0.1:8080/api/sendmail")
            .timeout(Duration::from_secs(5))
            .strict()
            .build()
            .unwrap();

        assert_eq!(config.endpoint, "http://127.0.0.1:8080/api/sendmail");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.is_strict());
    }

    #[test]
    fn test_config_builder_missing_fields() {
        assert!(EmailLabsConfig::builder().build().is_err());
        assert!(base().app_key("").build().is_err());
        assert!(base().secret_key("  ").build().is_err());
        assert!(base().smtp_account("").build().is_err());
    }

    #[test]
    fn test_config_builder_invalid_endpoint() {
        assert!(base().endpoint("not a url").build().is_err());
        assert!(base().endpoint("ftp://example.com/send").build().is_err());
    }

    #[test]
    fn test_config_builder_zero_timeout() {
        assert!(base().timeout(Duration::ZERO).build().is_err());
    }

    #[test]
    fn test_from_settings() {
        let settings: ProviderSettings = serde_json::from_str(
            r#"{"secret":"s3cr3t","app":"my_app","smtp":"1.acme.smtp"}"#,
        )
        .unwrap();

        let config = EmailLabsConfig::from_settings(settings).unwrap();
        assert_eq!(config.app_key, "my_app");
        assert_eq!(config.secret_key(), "s3cr3t");
        assert_eq!(config.smtp_account, "1.acme.smtp");
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("EMAILLABS_APP_KEY", "app"),
            ("EMAILLABS_SECRET_KEY", "secret"),
            ("EMAILLABS_SMTP_ACCOUNT", "1.acme.smtp"),
            ("EMAILLABS_TIMEOUT", "12"),
            ("EMAILLABS_STRICT", "true"),
        ]
        .into_iter()
        .collect();

        let config =
            EmailLabsConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.app_key, "app");
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert!(config.is_strict());
    }

    #[test]
    fn test_from_lookup_missing_required() {
        let result = EmailLabsConfig::from_lookup(|name| {
            (name == "EMAILLABS_APP_KEY").then(|| "app".to_string())
        });

        let err = result.unwrap_err();
        assert!(err.to_string().contains("EMAILLABS_SECRET_KEY"));
    }

    #[test]
    fn test_from_lookup_bad_timeout() {
        let result = EmailLabsConfig::from_lookup(|name| match name {
            "EMAILLABS_TIMEOUT" => Some("soon".to_string()),
            "EMAILLABS_ENDPOINT" | "EMAILLABS_STRICT" => None,
            _ => Some("value".to_string()),
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = base().secret_key("super_secret_key").build().unwrap();
        let debug_str = format!("{:?}", config);

        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super_secret_key"));
    }
}
