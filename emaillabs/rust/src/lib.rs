//! EmailLabs Transport Library
//!
//! Sends transactional email through the EmailLabs `sendmail` HTTP API.
//! Messages are flattened into the provider's form payload, posted with
//! HTTP Basic authentication, and the JSON answer is classified as success
//! or failure.
//!
//! # Features
//!
//! - **Mapping**: provider payload from a [`Message`], with 128-character
//!   name and subject limits
//! - **Attachments**: base64 content wrapped at 76 characters with CRLF
//! - **Delivery Modes**: fire-and-forget (log and swallow) or strict (typed errors)
//! - **Hooks**: pre-send rewrites and checks that can stop a message
//! - **Observability**: tracing, send counters, pluggable log sink
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_emaillabs::{EmailLabsTransport, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = EmailLabsTransport::builder()
//!         .app_key("app_key")
//!         .secret_key("secret_key")
//!         .smtp_account("1.acme.smtp")
//!         .build()?;
//!
//!     let message = Message::builder()
//!         .from("Acme <noreply@acme.com>")
//!         .to("customer@example.com")
//!         .subject("Welcome")
//!         .html("<h1>Hello!</h1>")
//!         .build()?;
//!
//!     transport.send(&message).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Strict Mode
//!
//! ```rust,no_run
//! use integrations_emaillabs::{EmailLabsErrorKind, EmailLabsTransport, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = EmailLabsTransport::from_env()?;
//!     let message = Message::builder().to("customer@example.com").build()?;
//!
//!     match transport.try_send(&message).await {
//!         Ok(receipt) => println!("sent: {}", receipt.details),
//!         Err(e) if e.kind() == EmailLabsErrorKind::Provider => eprintln!("rejected: {e}"),
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod hooks;
pub mod mapper;
pub mod observability;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{EmailLabsTransport, EmailLabsTransportBuilder};
pub use config::{DeliveryMode, EmailLabsConfig, ProviderSettings};
pub use errors::{EmailLabsError, EmailLabsErrorKind, EmailLabsResult};

pub use encoding::encode_attachment;
pub use mapper::map_to_payload;
pub use types::{Address, Attachment, Message, MessageBuilder, Payload, SendReceipt};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
