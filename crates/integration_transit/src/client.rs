//! HAFAS transit client via transport.rest API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::TransitConfig;
use crate::error::TransitError;

/// Trait for transit service clients
#[async_trait]
pub trait TransitClient: Send + Sync {
    /// GET `base_url/<segments...>?<query>` and return the JSON body
    ///
    /// Segments are percent-encoded individually, so opaque ids and tokens
    /// may contain `/`, `|` or non-ASCII characters.
    async fn get_json(
        &self,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<Value, TransitError>;

    /// Check if the transit service is reachable
    async fn is_healthy(&self) -> bool;
}

/// HAFAS-based transit client using the transport.rest API
#[derive(Debug)]
pub struct HafasTransitClient {
    client: Client,
    base_url: Url,
    timeout_secs: u64,
}

impl HafasTransitClient {
    /// Create a new HAFAS transit client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &TransitConfig) -> Result<Self, TransitError> {
        config.validate().map_err(TransitError::ConfigurationError)?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TransitError::ConfigurationError(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransitError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Build the request URL for a path below the base URL
    fn url_for(&self, segments: &[&str], query: &[(String, String)]) -> Result<Url, TransitError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransitError::ConfigurationError("base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn map_send_error(&self, e: &reqwest::Error) -> TransitError {
        if e.is_timeout() {
            TransitError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            TransitError::ConnectionFailed(e.to_string())
        }
    }
}

/// Pull a human-readable message out of an upstream error body
///
/// transport.rest answers errors with `{"msg": "..."}`; anything else falls
/// back to the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("msg").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}

#[async_trait]
impl TransitClient for HafasTransitClient {
    #[instrument(skip(self, query), fields(path = %segments.join("/")))]
    async fn get_json(
        &self,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<Value, TransitError> {
        let url = self.url_for(segments, query)?;
        debug!(%url, "Requesting upstream");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransitError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransitError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                TransitError::ParseError(e.to_string())
            }
        })?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(status = status.as_u16(), %message, "Upstream returned an error");
            return Err(match status {
                StatusCode::BAD_REQUEST => TransitError::BadRequest { message },
                StatusCode::NOT_FOUND => TransitError::NotFound { message },
                _ => TransitError::RequestFailed {
                    status: status.as_u16(),
                    message,
                    body,
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| TransitError::ParseError(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn is_healthy(&self) -> bool {
        let Ok(url) = self.url_for(
            &["locations"],
            &[
                ("query".to_string(), "test".to_string()),
                ("results".to_string(), "1".to_string()),
            ],
        ) else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Health check failed");
                false
            },
        }
    }
}
