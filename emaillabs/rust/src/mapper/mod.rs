//! Message to payload mapping.
//!
//! The provider accepts a single cc, bcc, sender and reply-to entry. Only the
//! first entry of each list is sent; the rest are dropped.

use crate::encoding::encode_attachment_default;
use crate::types::{Address, Attachment, FileDescriptor, Message, Payload};

/// Longest subject or display name the provider accepts, in characters.
pub const MAX_FIELD_CHARS: usize = 128;

/// Maps a message onto the `sendmail` payload for `smtp_account`.
///
/// Missing optional parts map to empty strings (or no `files`); this never
/// fails and never touches the message.
pub fn map_to_payload(message: &Message, smtp_account: &str) -> Payload {
    Payload {
        smtp_account: smtp_account.to_string(),
        to: addresses(&message.to),
        cc: first_address(&message.cc),
        cc_name: first_name(&message.cc),
        bcc: first_address(&message.bcc),
        bcc_name: first_name(&message.bcc),
        from: first_address(&message.from),
        from_name: first_name(&message.from),
        // Carries the display name, not the address.
        reply_to: first_name(&message.reply_to),
        html: message.html.clone(),
        subject: truncate_chars(&message.subject, MAX_FIELD_CHARS),
        files: message
            .has_attachments()
            .then(|| message.attachments.iter().map(file_descriptor).collect()),
    }
}

fn file_descriptor(attachment: &Attachment) -> FileDescriptor {
    FileDescriptor {
        mime: attachment.content_type.clone(),
        name: attachment.filename.clone(),
        content: encode_attachment_default(&attachment.data),
    }
}

fn addresses(list: &[Address]) -> Vec<String> {
    list.iter().map(|a| a.email.clone()).collect()
}

fn first_address(list: &[Address]) -> String {
    list.first().map(|a| a.email.clone()).unwrap_or_default()
}

fn first_name(list: &[Address]) -> String {
    list.first()
        .and_then(Address::name)
        .map(|name| truncate_chars(name, MAX_FIELD_CHARS))
        .unwrap_or_default()
}

/// Returns the first `max` characters of `value`.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn addr(email: &str, name: Option<&str>) -> Address {
        Address {
            email: email.to_string(),
            name: name.map(str::to_string),
        }
    }

    fn minimal() -> Message {
        Message {
            to: vec![addr("a@x.com", None)],
            subject: "Hi".to_string(),
            html: "<p>ok</p>".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_message_payload() {
        let payload = map_to_payload(&minimal(), "1.acme.smtp");

        assert_eq!(
            payload,
            Payload {
                smtp_account: "1.acme.smtp".to_string(),
                to: vec!["a@x.com".to_string()],
                cc: String::new(),
                cc_name: String::new(),
                bcc: String::new(),
                bcc_name: String::new(),
                from: String::new(),
                from_name: String::new(),
                reply_to: String::new(),
                html: "<p>ok</p>".to_string(),
                subject: "Hi".to_string(),
                files: None,
            }
        );
    }

    #[test]
    fn test_all_recipients_kept_in_order() {
        let mut message = minimal();
        message.to = vec![
            addr("c@x.com", Some("C")),
            addr("a@x.com", None),
            addr("b@x.com", Some("B")),
        ];

        let payload = map_to_payload(&message, "acct");
        assert_eq!(payload.to, vec!["c@x.com", "a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_only_first_cc_and_bcc_used() {
        let mut message = minimal();
        message.cc = vec![addr("cc1@x.com", Some("First")), addr("cc2@x.com", Some("Second"))];
        message.bcc = vec![addr("bcc1@x.com", None), addr("bcc2@x.com", Some("Other"))];

        let payload = map_to_payload(&message, "acct");

        assert_eq!(payload.cc, "cc1@x.com");
        assert_eq!(payload.cc_name, "First");
        assert_eq!(payload.bcc, "bcc1@x.com");
        assert_eq!(payload.bcc_name, "");
    }

    #[test]
    fn test_from_fields() {
        let mut message = minimal();
        message.from = vec![addr("shop@x.com", Some("Shop"))];

        let payload = map_to_payload(&message, "acct");
        assert_eq!(payload.from, "shop@x.com");
        assert_eq!(payload.from_name, "Shop");
    }

    #[test]
    fn test_reply_to_carries_display_name() {
        let mut message = minimal();
        message.reply_to = vec![addr("support@x.com", Some("Support Team"))];

        let payload = map_to_payload(&message, "acct");
        assert_eq!(payload.reply_to, "Support Team");
    }

    #[test]
    fn test_reply_to_without_name_is_empty() {
        let mut message = minimal();
        message.reply_to = vec![addr("support@x.com", None)];

        let payload = map_to_payload(&message, "acct");
        assert_eq!(payload.reply_to, "");
    }

    #[test]
    fn test_long_display_name_truncated() {
        let mut message = minimal();
        message.cc = vec![addr("cc@x.com", Some("n".repeat(300).as_str()))];

        let payload = map_to_payload(&message, "acct");
        assert_eq!(payload.cc_name.chars().count(), 128);
    }

    #[test_case(0, 0 ; "empty")]
    #[test_case(127, 127 ; "below limit")]
    #[test_case(128, 128 ; "at limit")]
    #[test_case(129, 128 ; "just above limit")]
    #[test_case(500, 128 ; "far above limit")]
    fn test_subject_truncation(len: usize, expected: usize) {
        let mut message = minimal();
        message.subject = "s".repeat(len);

        let payload = map_to_payload(&message, "acct");
        assert_eq!(payload.subject.chars().count(), expected);
        assert!(message.subject.starts_with(&payload.subject));
    }

    #[test]
    fn test_truncation_respects_multibyte_chars() {
        let subject = "ż".repeat(200);
        let truncated = truncate_chars(&subject, MAX_FIELD_CHARS);

        assert_eq!(truncated.chars().count(), 128);
        assert_eq!(truncated.len(), 256);
    }

    #[test]
    fn test_attachments_become_files() {
        let mut message = minimal();
        message.attachments = vec![
            Attachment::new("a.txt", "text/plain", b"hi".to_vec()),
            Attachment::new("b.bin", "application/octet-stream", vec![0u8; 100]),
        ];

        let payload = map_to_payload(&message, "acct");
        let files = payload.files.unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(
            files[0],
            FileDescriptor {
                mime: "text/plain".to_string(),
                name: "a.txt".to_string(),
                content: "aGk=".to_string(),
            }
        );
        assert_eq!(files[1].name, "b.bin");
        assert!(files[1].content.contains("\r\n"));
    }

    #[test]
    fn test_html_is_unmodified() {
        let mut message = minimal();
        message.html = "<html>\r\n<body>  ünïcode  </body></html>\n".to_string();

        let payload = map_to_payload(&message, "acct");
        assert_eq!(payload.html, message.html);
    }

    #[test]
    fn test_input_message_untouched() {
        let mut message = minimal();
        message.subject = "x".repeat(200);
        let before = message.clone();

        let _ = map_to_payload(&message, "acct");
        assert_eq!(message, before);
    }
}
