//! Shared HTTP client and SSE helpers.

use std::sync::OnceLock;

use crate::error::SearchError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Parse an SSE "data:" line, returning None for "[DONE]" and non-data lines.
pub fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line
        .strip_prefix("data:")
        .map(str::trim_start)?;
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(data)
}

/// Collects raw SSE bytes and hands out complete lines.
///
/// Bytes are decoded only once a whole line has arrived, so a multibyte
/// character split across network chunks is kept intact.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Next complete line, trimmed, or `None` until more bytes arrive.
    pub fn next_line(&mut self) -> Option<Result<String, SearchError>> {
        let end = self.pending.iter().position(|b| *b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=end).collect();
        Some(
            String::from_utf8(line)
                .map(|line| line.trim().to_string())
                .map_err(|e| SearchError::Stream(format!("invalid UTF-8 in event stream: {e}"))),
        )
    }
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> SearchError {
    let message = extract_error_message(body).unwrap_or_else(|| body.to_string());
    match status {
        401 | 403 => SearchError::MissingCredential(format!("rejected by provider: {message}")),
        429 => SearchError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => SearchError::api(status, message),
    }
}

/// Google error bodies look like `{"error": {"code": 400, "message": "..."}}`.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// `RetryInfo` details carry a delay such as `"17s"`.
fn extract_retry_after(body: &str) -> Option<u64> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    let details = value.get("error")?.get("details")?.as_array()?;
    details.iter().find_map(|detail| {
        let delay = detail.get("retryDelay")?.as_str()?;
        let secs: f64 = delay.strip_suffix('s')?.parse().ok()?;
        Some((secs * 1000.0) as u64)
    })
}
