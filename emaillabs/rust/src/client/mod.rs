//! EmailLabs transport client.
//!
//! [`EmailLabsTransport`] runs the pre-send hooks, maps the message, posts it
//! to the `sendmail` endpoint and classifies the answer. Every outcome is
//! reported to the configured [`Logger`]; whether failures also reach the
//! caller depends on the [`DeliveryMode`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

use crate::auth::{AuthProvider, BasicAuth};
use crate::config::{DeliveryMode, EmailLabsConfig, EmailLabsConfigBuilder, ProviderSettings};
use crate::errors::{EmailLabsError, EmailLabsResult};
use crate::hooks::{HookChain, SendHook};
use crate::mapper::map_to_payload;
use crate::observability::{LogLevel, Logger, SendMetrics, TracingLogger};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::types::{Message, ProviderResponse, SendReceipt};

/// Sends messages through the EmailLabs API.
///
/// # Example
///
/// ```rust,no_run
/// use integrations_emaillabs::{EmailLabsTransport, Message};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let transport = EmailLabsTransport::builder()
///         .app_key("app_key")
///         .secret_key("secret_key")
///         .smtp_account("1.acme.smtp")
///         .build()?;
///
///     let message = Message::builder()
///         .from("Shop <shop@example.com>")
///         .to("customer@example.com")
///         .subject("Your order")
///         .html("<p>Thanks!</p>")
///         .build()?;
///
///     transport.send(&message).await?;
///     Ok(())
/// }
/// ```
pub struct EmailLabsTransport {
    config: EmailLabsConfig,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    logger: Arc<dyn Logger>,
    hooks: HookChain,
    metrics: SendMetrics,
}

impl EmailLabsTransport {
    /// Creates a new client builder.
    pub fn builder() -> EmailLabsTransportBuilder {
        EmailLabsTransportBuilder::new()
    }

    /// Creates a client from environment variables.
    pub fn from_env() -> EmailLabsResult<Self> {
        let config = EmailLabsConfig::from_env()?;
        EmailLabsTransportBuilder::from_config(config).build()
    }

    /// Creates a client from `{secret, app, smtp}` provider settings.
    pub fn from_settings(settings: ProviderSettings) -> EmailLabsResult<Self> {
        let config = EmailLabsConfig::from_settings(settings)?;
        EmailLabsTransportBuilder::from_config(config).build()
    }

    /// Sends a message.
    ///
    /// In [`DeliveryMode::FireAndForget`] this always returns `Ok(())`; the
    /// outcome is only logged. In [`DeliveryMode::Strict`] hook, transport,
    /// decode and provider failures are returned.
    pub async fn send(&self, message: &Message) -> EmailLabsResult<()> {
        match (self.try_send(message).await, self.config.delivery_mode) {
            (Ok(_), _) => Ok(()),
            (Err(e), DeliveryMode::Strict) => Err(e),
            (Err(_), DeliveryMode::FireAndForget) => Ok(()),
        }
    }

    /// Sends a message and returns the typed outcome, whatever the
    /// delivery mode.
    #[instrument(
        skip(self, message),
        fields(endpoint = %self.config.endpoint, recipients = message.to.len())
    )]
    pub async fn try_send(&self, message: &Message) -> EmailLabsResult<SendReceipt> {
        self.metrics.record_attempt();
        let mut context = HashMap::new();
        context.insert("smtp_account".to_string(), self.config.smtp_account.clone());

        let message = match self.hooks.run(message) {
            Ok(hooked) => hooked,
            Err(e) => return Err(self.fail(e, &context)),
        };

        let request = self.build_request(&message);
        let started = Instant::now();

        let response = match self.transport.post(request).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e.into(), &context)),
        };

        let latency = started.elapsed();
        context.insert("http_status".to_string(), response.status.to_string());

        let decoded = match decode_response(&response) {
            Ok(decoded) => decoded,
            Err(e) => {
                if let Some(content_type) = response.header("content-type") {
                    context.insert("content_type".to_string(), content_type.to_string());
                }
                return Err(self.fail(e, &context));
            }
        };

        let details = decoded.format_data();

        if decoded.is_success() {
            self.metrics.record_delivered(latency);
            self.logger.log(
                LogLevel::Debug,
                &format!("Message sent. {} {}", decoded.message, details),
                Some(&context),
            );

            Ok(SendReceipt {
                message: decoded.message,
                details,
                http_status: response.status,
            })
        } else {
            self.metrics.record_provider_failure(latency);
            self.logger.log(
                LogLevel::Warn,
                &format!("Message send failure. {} {}", decoded.message, details),
                Some(&context),
            );

            Err(EmailLabsError::Provider {
                status: decoded.status,
                message: decoded.message,
                details,
            })
        }
    }

    /// Records and logs a failure that never reached classification.
    fn fail(&self, error: EmailLabsError, context: &HashMap<String, String>) -> EmailLabsError {
        self.metrics.record_error();
        self.logger
            .log(LogLevel::Error, &error.to_string(), Some(context));
        error
    }

    fn build_request(&self, message: &Message) -> HttpRequest {
        let payload = map_to_payload(message, &self.config.smtp_account);

        let mut request = HttpRequest::post(&self.config.endpoint)
            .with_form(payload.to_form_fields())
            .with_timeout(self.config.timeout);
        self.auth.apply_auth(&mut request.headers);

        request
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EmailLabsConfig {
        &self.config
    }

    /// Returns the send counters.
    pub fn metrics(&self) -> &SendMetrics {
        &self.metrics
    }
}

/// Decodes a response body; the HTTP status is not inspected.
fn decode_response(response: &HttpResponse) -> EmailLabsResult<ProviderResponse> {
    response
        .json::<ProviderResponse>()
        .map_err(|e| EmailLabsError::Decode {
            message: e.to_string(),
            status: response.status,
            body: Some(response.text()),
        })
}

impl std::fmt::Debug for EmailLabsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailLabsTransport")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Builder for [`EmailLabsTransport`].
pub struct EmailLabsTransportBuilder {
    config_builder: EmailLabsConfigBuilder,
    config: Option<EmailLabsConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    logger: Option<Arc<dyn Logger>>,
    hooks: HookChain,
}

impl EmailLabsTransportBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: EmailLabsConfigBuilder::new(),
            config: None,
            transport: None,
            auth: None,
            logger: None,
            hooks: HookChain::new(),
        }
    }

    /// Creates a builder from an existing configuration.
    ///
    /// Credential setters on the builder are ignored once a configuration is
    /// supplied.
    pub fn from_config(config: EmailLabsConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::new()
        }
    }

    /// Sets the application key.
    pub fn app_key(mut self, app_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.app_key(app_key);
        self
    }

    /// Sets the secret key.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.secret_key(secret_key);
        self
    }

    /// Sets the SMTP account name.
    pub fn smtp_account(mut self, smtp_account: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.smtp_account(smtp_account);
        self
    }

    /// Overrides the endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.endpoint(endpoint);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the delivery mode.
    pub fn delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.config_builder = self.config_builder.delivery_mode(mode);
        self
    }

    /// Switches to strict delivery.
    pub fn strict(self) -> Self {
        self.delivery_mode(DeliveryMode::Strict)
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Registers a pre-send hook. Hooks run in registration order.
    pub fn hook(mut self, hook: Arc<dyn SendHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Builds the client.
    pub fn build(self) -> EmailLabsResult<EmailLabsTransport> {
        let config = match self.config {
            Some(config) => config,
            None => self.config_builder.build()?,
        };

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                ReqwestTransport::new(config.timeout)
                    .map_err(|e| EmailLabsError::configuration(e.to_string()))?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(BasicAuth::from_strings(
                config.app_key.clone(),
                config.secret_key(),
            )),
        };
        auth.validate()?;

        let logger: Arc<dyn Logger> = self.logger.unwrap_or_else(|| Arc::new(TracingLogger::new()));

        tracing::debug!(
            smtp_account = %config.smtp_account,
            delivery_mode = ?config.delivery_mode,
            hooks = self.hooks.len(),
            "EmailLabs transport configured"
        );

        Ok(EmailLabsTransport {
            config,
            transport,
            auth,
            logger,
            hooks: self.hooks,
            metrics: SendMetrics::new(),
        })
    }
}

impl Default for EmailLabsTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
