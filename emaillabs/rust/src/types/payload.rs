//! The sendmail request payload.

use serde::Serialize;

/// An encoded attachment descriptor, sent as `files[i][..]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    /// MIME content type.
    pub mime: String,
    /// Filename.
    pub name: String,
    /// Base64 content, CRLF-wrapped at 76 characters.
    pub content: String,
}

/// Fields accepted by the EmailLabs `sendmail` endpoint.
///
/// Single-address fields hold the first address of the matching list, or an
/// empty string when the list is empty. `files` is omitted entirely for
/// messages without attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Payload {
    /// Provider-side SMTP account name.
    pub smtp_account: String,
    /// Every recipient address, in message order.
    pub to: Vec<String>,
    /// First CC address.
    pub cc: String,
    /// First CC display name.
    pub cc_name: String,
    /// First BCC address.
    pub bcc: String,
    /// First BCC display name.
    pub bcc_name: String,
    /// First sender address.
    pub from: String,
    /// First sender display name.
    pub from_name: String,
    /// First reply-to display name.
    pub reply_to: String,
    /// HTML body.
    pub html: String,
    /// Subject, at most 128 characters.
    pub subject: String,
    /// Attachment descriptors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileDescriptor>>,
}

impl Payload {
    /// Flattens the payload into ordered form fields.
    ///
    /// Arrays use indexed brackets: `to[0]`, `files[0][mime]`.
    pub fn to_form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(11 + self.to.len());

        fields.push(("smtp_account".to_string(), self.smtp_account.clone()));
        for (i, address) in self.to.iter().enumerate() {
            fields.push((format!("to[{}]", i), address.clone()));
        }

        for (key, value) in [
            ("cc", &self.cc),
            ("cc_name", &self.cc_name),
            ("bcc", &self.bcc),
            ("bcc_name", &self.bcc_name),
            ("from", &self.from),
            ("from_name", &self.from_name),
            ("reply_to", &self.reply_to),
            ("html", &self.html),
            ("subject", &self.subject),
        ] {
            fields.push((key.to_string(), value.clone()));
        }

        if let Some(files) = &self.files {
            for (i, file) in files.iter().enumerate() {
                fields.push((format!("files[{}][mime]", i), file.mime.clone()));
                fields.push((format!("files[{}][name]", i), file.name.clone()));
                fields.push((format!("files[{}][content]", i), file.content.clone()));
            }
        }

        fields
    }
}
