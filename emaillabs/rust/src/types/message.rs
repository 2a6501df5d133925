//! Outbound message types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{EmailLabsError, EmailLabsResult};

/// Email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// Email address (e.g., "jan@example.com").
    pub email: String,
    /// Display name (e.g., "Jan Kowalski").
    pub name: Option<String>,
}

impl Address {
    /// Creates a new address with just an email.
    pub fn new(email: impl Into<String>) -> EmailLabsResult<Self> {
        let email = email.into();
        Self::validate_email(&email)?;
        Ok(Self { email, name: None })
    }

    /// Creates a new address with display name and email.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> EmailLabsResult<Self> {
        let email = email.into();
        Self::validate_email(&email)?;
        Ok(Self {
            email,
            name: Some(name.into()),
        })
    }

    /// Parses an address from a string (e.g., "Jan Kowalski <jan@example.com>").
    pub fn parse(s: &str) -> EmailLabsResult<Self> {
        let s = s.trim();

        if let (Some(start), Some(end)) = (s.find('<'), s.rfind('>')) {
            if start < end {
                let name = s[..start].trim().trim_matches('"');
                let email = s[start + 1..end].trim();
                return if name.is_empty() {
                    Self::new(email)
                } else {
                    Self::with_name(name, email)
                };
            }
        }

        Self::new(s)
    }

    fn validate_email(email: &str) -> EmailLabsResult<()> {
        if email.is_empty() {
            return Err(EmailLabsError::validation_field(
                "Email address cannot be empty",
                "email",
            ));
        }

        if email.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(EmailLabsError::validation_field(
                format!("Email address '{}' contains whitespace or control characters", email.escape_default()),
                "email",
            ));
        }

        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
                Ok(())
            }
            _ => Err(EmailLabsError::validation_field(
                format!("Email address '{}' must have the form local@domain", email),
                "email",
            )),
        }
    }

    /// Returns the email part only.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name if present.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => f.write_str(&self.email),
        }
    }
}

/// Email attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Filename.
    pub filename: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw content.
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates a new attachment with an explicit content type.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Creates an attachment, guessing the content type from the filename.
    pub fn guessed(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = mime_guess::from_path(&filename)
            .first()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM)
            .essence_str()
            .to_string();

        Self {
            filename,
            content_type,
            data,
        }
    }

    /// Returns the size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// An outbound email message, as handed to the transport.
///
/// Address lists keep the order they were added in. The transport only
/// reads the message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Sender addresses (normally exactly one).
    pub from: Vec<Address>,
    /// Recipients.
    pub to: Vec<Address>,
    /// CC recipients.
    pub cc: Vec<Address>,
    /// BCC recipients.
    pub bcc: Vec<Address>,
    /// Reply-to addresses.
    pub reply_to: Vec<Address>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Attachment parts, in order.
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Creates a message builder.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Returns true if the message carries attachment parts.
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Returns the total number of recipients (to + cc + bcc).
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}

/// Builder for [`Message`].
///
/// Address setters accept `"Name <email>"` or a bare `"email"`. The first
/// invalid address is reported by [`build`](MessageBuilder::build).
#[derive(Debug, Default)]
pub struct MessageBuilder {
    message: Message,
    error: Option<EmailLabsError>,
}

impl MessageBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, address: &str, list: fn(&mut Message) -> &mut Vec<Address>) -> Self {
        if self.error.is_none() {
            match Address::parse(address) {
                Ok(parsed) => list(&mut self.message).push(parsed),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Adds a sender address.
    pub fn from(self, address: &str) -> Self {
        self.push(address, |m| &mut m.from)
    }

    /// Adds a recipient.
    pub fn to(self, address: &str) -> Self {
        self.push(address, |m| &mut m.to)
    }

    /// Adds a CC recipient.
    pub fn cc(self, address: &str) -> Self {
        self.push(address, |m| &mut m.cc)
    }

    /// Adds a BCC recipient.
    pub fn bcc(self, address: &str) -> Self {
        self.push(address, |m| &mut m.bcc)
    }

    /// Adds a reply-to address.
    pub fn reply_to(self, address: &str) -> Self {
        self.push(address, |m| &mut m.reply_to)
    }

    /// Adds an already parsed recipient.
    pub fn to_address(mut self, address: Address) -> Self {
        self.message.to.push(address);
        self
    }

    /// Sets the subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.message.subject = subject.into();
        self
    }

    /// Sets the HTML body.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.message.html = html.into();
        self
    }

    /// Adds an attachment.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.message.attachments.push(attachment);
        self
    }

    /// Builds the message.
    pub fn build(self) -> EmailLabsResult<Message> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if self.message.to.is_empty() {
            return Err(EmailLabsError::validation_field(
                "At least one recipient is required",
                "to",
            ));
        }

        Ok(self.message)
    }
}
