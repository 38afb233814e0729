//! Request executor
//!
//! Performs exactly one logical HTTP exchange per call and translates the
//! outcome into a JSON payload or a typed error:
//! - 200 is success (a body that is only `{"error": ...}` counts as no data)
//! - 400/403/404/429/500/504 map to dedicated error variants
//! - a missed deadline becomes `Error::Timeout`
//! - 429 is the only status retried, with a fixed delay and bounded attempts

use super::rate_limit::RateLimiter;
use super::request::RequestDescriptor;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Transport seam used by the paginated cursor and every single-object fetch
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute one request and return its JSON payload
    async fn execute(&self, request: &RequestDescriptor) -> Result<JsonValue>;
}

/// `reqwest` backed executor
pub struct ApiRequester {
    client: Client,
    timeout: Duration,
    retry: bool,
    max_attempts: u32,
    retry_delay: Duration,
    debug: bool,
    rate_limiter: Option<RateLimiter>,
}

impl ApiRequester {
    /// Create an executor from the client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
            retry: config.retry,
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay,
            debug: config.debug,
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
        })
    }

    /// Default per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether rate-limited requests are retried
    pub fn retry(&self) -> bool {
        self.retry
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Single attempt, no retry
    async fn send_once(&self, request: &RequestDescriptor) -> Result<JsonValue> {
        let method = request.method();
        let url = request.full_url();
        let timeout = request.timeout.unwrap_or(self.timeout);

        if self.debug {
            trace_request(request);
        }

        let mut req = self
            .client
            .request(method.into(), url.as_str())
            .timeout(timeout);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| transport_error(e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        debug!("{} {} -> {}", method, url, status);

        classify_response(status, &body)
    }
}

#[async_trait]
impl RequestExecutor for ApiRequester {
    async fn execute(&self, request: &RequestDescriptor) -> Result<JsonValue> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            if let Some(ref limiter) = self.rate_limiter {
                limiter.acquire().await;
            }

            match self.send_once(request).await {
                Err(Error::RateLimited { .. }) => {
                    if self.retry && attempt < self.max_attempts {
                        warn!(
                            "Rate limited (429), attempt {}/{}, waiting {:?}",
                            attempt, self.max_attempts, self.retry_delay
                        );
                        tokio::time::sleep(self.retry_delay).await;
                        continue;
                    }
                    return Err(Error::RateLimited { attempts: attempt });
                }
                other => return other,
            }
        }
    }
}

impl std::fmt::Debug for ApiRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequester")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Map a response status and body to a payload or an error
pub(crate) fn classify_response(status: u16, body: &str) -> Result<JsonValue> {
    match status {
        200 => {
            let data: JsonValue = serde_json::from_str(body)?;
            if is_error_only(&data) {
                debug!("200 response carried only an error marker, treating as empty");
                return Ok(JsonValue::Object(JsonObject::new()));
            }
            Ok(data)
        }
        400 => Err(Error::BadQueryParameters {
            message: error_message(body, "error"),
        }),
        403 => Err(Error::Authorization {
            message: "HTTP status 403 Forbidden.".to_string(),
        }),
        404 => Err(Error::NotFound {
            message: error_message(body, "error"),
        }),
        429 => Err(Error::RateLimited { attempts: 1 }),
        500 => Err(Error::InternalServer {
            message: error_message(body, "message"),
        }),
        504 => Err(Error::GatewayTimeout {
            message: error_message(body, "message"),
        }),
        _ => Err(Error::http_status(status, body)),
    }
}

fn is_error_only(data: &JsonValue) -> bool {
    data.as_object()
        .is_some_and(|map| map.len() == 1 && map.contains_key("error"))
}

/// Pull the explanatory message out of an error body, falling back to the raw text
fn error_message(body: &str, key: &str) -> String {
    serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|value| value.get(key).cloned())
        .map(|value| match value {
            JsonValue::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> Error {
    if error.is_timeout() {
        Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        Error::Http(error)
    }
}

fn trace_request(request: &RequestDescriptor) {
    debug!(
        method = %request.method(),
        url = %request.full_url(),
        headers = ?request.redacted_headers(),
        body = ?request.body,
        "HTTP request"
    );
    debug!("curl: {}", request.to_curl());
}
