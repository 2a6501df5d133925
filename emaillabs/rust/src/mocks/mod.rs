//! Mock implementations for testing.
//!
//! Provides a scripted transport and a capturing logger so the invoker can be
//! exercised without network access.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::observability::{LogLevel, Logger};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A scripted response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a 200 response with a JSON body.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates a response with a raw body.
    pub fn body(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    /// Creates a provider answer with the given status, message and `data`.
    pub fn provider(status: &str, message: &str, data: serde_json::Value) -> Self {
        Self::json(&serde_json::json!({
            "status": status,
            "message": message,
            "data": data,
        }))
    }

    /// Overrides the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

enum Scripted {
    Respond(MockResponse),
    Fail(TransportError),
}

/// Mock HTTP transport for testing.
///
/// Answers are consumed in FIFO order. With nothing queued, a request fails
/// with [`TransportError::Connection`].
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.script).push_back(Scripted::Respond(response));
    }

    /// Queues a 200 JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Makes the next request fail with the given error.
    pub fn fail_next(&self, error: TransportError) {
        lock(&self.script).push_back(Scripted::Fail(error));
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);

        match lock(&self.script).pop_front() {
            Some(Scripted::Respond(response)) => Ok(HttpResponse {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
            Some(Scripted::Fail(error)) => Err(error),
            None => Err(TransportError::Connection {
                message: "no mock response queued".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued", &lock(&self.script).len())
            .field("requests", &self.request_count())
            .finish()
    }
}

/// A captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Level the entry was logged at.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Context fields, empty when none were passed.
    pub context: HashMap<String, String>,
}

/// Logger that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all entries in logging order.
    pub fn entries(&self) -> Vec<LogEntry> {
        lock(&self.entries).clone()
    }

    /// Returns the messages logged at `level`.
    pub fn entries_at(&self, level: LogLevel) -> Vec<String> {
        lock(&self.entries)
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Returns true if a message at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        lock(&self.entries)
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    /// Returns the context of the last entry logged at `level`.
    pub fn last_context(&self, level: LogLevel) -> Option<HashMap<String, String>> {
        lock(&self.entries)
            .iter()
            .rev()
            .find(|e| e.level == level)
            .map(|e| e.context.clone())
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str, context: Option<&HashMap<String, String>>) {
        lock(&self.entries).push(LogEntry {
            level,
            message: message.to_string(),
            context: context.cloned().unwrap_or_default(),
        });
    }
}
