//! Base64 encoding for attachment content.
//!
//! The provider expects attachment bodies the way a MIME encoder writes
//! them: base64, hard-wrapped with CRLF.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Longest line a mail encoder may emit (RFC 2045).
pub const MAX_LINE_LENGTH: usize = 76;

const LINE_SEPARATOR: &str = "\r\n";

/// Base64-encodes `bytes`, wrapped at `max_line_length` with CRLF.
///
/// A `max_line_length` of 0 or above 76 means 76. A nonzero
/// `first_line_offset` shortens the first line by that many characters, for
/// callers that already wrote a prefix on it; the remainder is wrapped at the
/// full width. The result never ends with a separator.
pub fn encode_attachment(bytes: &[u8], first_line_offset: usize, max_line_length: usize) -> String {
    let max_line_length = if max_line_length == 0 || max_line_length > MAX_LINE_LENGTH {
        MAX_LINE_LENGTH
    } else {
        max_line_length
    };

    let encoded = BASE64.encode(bytes);
    let mut rest = encoded.as_str();
    let mut lines: Vec<&str> = Vec::with_capacity(encoded.len() / max_line_length + 2);

    if first_line_offset != 0 {
        let first_len = max_line_length
            .saturating_sub(first_line_offset)
            .min(rest.len());
        let (first, tail) = rest.split_at(first_len);
        lines.push(first);
        rest = tail;
    }

    // base64 output is ASCII, so byte offsets are char boundaries
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(max_line_length.min(rest.len()));
        lines.push(line);
        rest = tail;
    }

    lines.join(LINE_SEPARATOR)
}

/// Encodes with no offset and the default 76-character lines.
pub fn encode_attachment_default(bytes: &[u8]) -> String {
    encode_attachment(bytes, 0, 0)
}
