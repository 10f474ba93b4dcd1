//! Plain HTTP GET over a shared client and runtime.
//!
//! Uses async reqwest internally but presents a sync interface, since the
//! scan loops run on rayon workers and ordinary threads.

use std::sync::LazyLock;
use std::time::Duration;

/// Connect timeout; the per-request timeout comes from the caller.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error from a single HTTP round trip.
#[derive(Debug)]
pub struct HttpError {
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(s) => write!(f, "HTTP {s}: {}", self.message),
            None => write!(f, "HTTP error: {}", self.message),
        }
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// Status code plus decoded body of a completed response.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(4)
        .build()
        .expect("failed to build HTTP client")
});

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// GET `url` with the given user-agent and request timeout.
///
/// Returns the status and body for any completed response, including
/// 404 and 5xx — callers decide what a given status means. `Err` is
/// reserved for transport failures (connect, timeout, decode).
pub fn http_get(url: &str, user_agent: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
    SHARED_RUNTIME.handle().block_on(async {
        let resp = SHARED_CLIENT
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(&e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| HttpError::from_reqwest(&e))?;

        Ok(HttpResponse { status, body })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_status() {
        let err = HttpError {
            status: Some(503),
            message: "unavailable".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP 503: unavailable");
    }

    #[test]
    fn display_without_status() {
        let err = HttpError {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP error: connection refused");
    }
}
