//! Provider response types.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Status string the provider uses for an accepted message.
pub const STATUS_SUCCESS: &str = "success";

/// Decoded `sendmail` response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderResponse {
    /// `success` or a failure status.
    pub status: String,
    /// Human readable message. `null` or missing reads as empty.
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    /// Per-message details; only the first entry is used.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub data: Vec<Value>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(scalar_text).unwrap_or_default())
}

// An object is read by its "0" key, the way an associative array is indexed.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(entries)) => entries,
        Some(Value::Object(mut map)) => map.remove("0").into_iter().collect(),
        _ => Vec::new(),
    })
}

impl ProviderResponse {
    /// Returns true if the provider accepted the message.
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Formats `data[0]` as `key:value;` pairs, in provider order.
    ///
    /// Anything that is not an object (or a missing entry) formats as an
    /// empty string.
    pub fn format_data(&self) -> String {
        match self.data.first() {
            Some(Value::Object(entry)) => format_entry(entry),
            _ => String::new(),
        }
    }
}

fn format_entry(entry: &Map<String, Value>) -> String {
    entry
        .iter()
        .map(|(key, value)| format!("{}:{};", key, scalar_text(value)))
        .collect()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        other => other.to_string(),
    }
}

/// Outcome of an accepted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Provider message.
    pub message: String,
    /// `data[0]` formatted as `key:value;` pairs.
    pub details: String,
    /// HTTP status code of the response.
    pub http_status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ProviderResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_success_response() {
        let response = parse(r#"{"status":"success","message":"ok","data":[{"id":"123"}]}"#);
        assert!(response.is_success());
        assert_eq!(response.message, "ok");
        assert_eq!(response.format_data(), "id:123;");
    }

    #[test]
    fn test_format_keeps_provider_order() {
        let response = parse(
            r#"{"status":"success","message":"ok","data":[{"zeta":"1","alpha":"2","mid":"3"}]}"#,
        );
        assert_eq!(response.format_data(), "zeta:1;alpha:2;mid:3;");
    }

    #[test]
    fn test_format_scalar_values() {
        let response = parse(
            r#"{"status":"success","data":[{"n":5,"t":true,"f":false,"z":null,"a":[1]}]}"#,
        );
        assert_eq!(response.format_data(), "n:5;t:1;f:;z:;a:[1];");
    }

    #[test]
    fn test_failure_with_empty_data_entry() {
        let response = parse(r#"{"status":"fail","message":"bad smtp","data":[{}]}"#);
        assert!(!response.is_success());
        assert_eq!(response.format_data(), "");
    }

    #[test]
    fn test_missing_optional_fields() {
        let response = parse(r#"{"status":"error"}"#);
        assert_eq!(response.message, "");
        assert!(response.data.is_empty());
        assert_eq!(response.format_data(), "");
    }

    #[test]
    fn test_null_message_and_data_read_as_empty() {
        let response = parse(r#"{"status":"fail","message":null,"data":null}"#);
        assert!(!response.is_success());
        assert_eq!(response.message, "");
        assert!(response.data.is_empty());
        assert_eq!(response.format_data(), "");
    }

    #[test]
    fn test_non_array_data() {
        let keyed = parse(r#"{"status":"fail","message":"x","data":{"0":{"id":"7"}}}"#);
        assert_eq!(keyed.format_data(), "id:7;");

        let object = parse(r#"{"status":"fail","message":"x","data":{"id":"7"}}"#);
        assert_eq!(object.format_data(), "");

        let scalar = parse(r#"{"status":"fail","message":"x","data":"oops"}"#);
        assert!(scalar.data.is_empty());
    }

    #[test]
    fn test_numeric_message_uses_json_text() {
        let response = parse(r#"{"status":"fail","message":42}"#);
        assert_eq!(response.message, "42");
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let result = serde_json::from_str::<ProviderResponse>(r#"{"message":"ok"}"#);
        assert!(result.is_err());
    }
}
