/// HTTP client for the knowledge-base query service.
///
/// This module provides `BackendClient` for making synchronous HTTP requests to the
/// query endpoint, along with error types and a builder pattern for configuration.
use std::time::Duration;

use thiserror::Error;

use crate::models::{AnswerResponse, RESULT_LIMIT};

/// Errors that can occur when talking to the query service.
///
/// Every variant is recoverable at the call site: the controller falls back
/// to the offline responder on any of them.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network-related errors (connection failures, DNS resolution, timeouts)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// HTTP errors with a non-success status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Response body did not decode as an `AnswerResponse`
    #[error("Malformed response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Builder for constructing `BackendClient` instances.
///
/// # Examples
///
/// ```
/// use kbq::backend::BackendClientBuilder;
///
/// let client = BackendClientBuilder::new()
///     .base_url("http://localhost:8000")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct BackendClientBuilder {
    base_url: Option<String>,
}

impl BackendClientBuilder {
    /// Creates a new `BackendClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the query service.
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL (e.g., "http://localhost:8000")
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the `BackendClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, this method checks the `KBQ_API_URL`
    /// environment variable. If not set, it defaults to `http://localhost:8000`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` if the resolved URL does not parse,
    /// or `BackendError::Network` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<BackendClient, BackendError> {
        // Determine base URL: use builder value, then env var, then default
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("KBQ_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
        };

        // Validate URL
        reqwest::Url::parse(&base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // Create reqwest blocking client with timeout configuration.
        // The request timeout bounds how long a hung backend can hold the
        // UI in the loading state.
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(BackendError::Network)?;

        Ok(BackendClient { client, base_url })
    }
}

/// Synchronous HTTP client for the query service.
///
/// Issues exactly one request per query: no retry, no backoff. Recovery from
/// transport failures is the caller's concern (the controller's fallback).
/// Construct via `BackendClientBuilder`.
pub struct BackendClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

/// Trait for query-service client operations.
///
/// This trait enables mocking in unit tests and keeps the controller free of
/// any concrete transport.
pub trait BackendClientTrait: Send + Sync {
    /// Sends one query to the service and returns its typed answer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on network failure, non-2xx status, or a body
    /// that does not decode as an `AnswerResponse`.
    fn query(&self, query: &str) -> Result<AnswerResponse, BackendError>;
}

impl BackendClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_internal(&self, query: &str) -> Result<AnswerResponse, BackendError> {
        let url = format!("{}/query", self.base_url);
        let request_body = serde_json::json!({
            "query": query,
            "n_results": RESULT_LIMIT,
        });

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .map_err(BackendError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
            });
        }

        // Typed decode: a 2xx with a body that isn't an AnswerResponse is a
        // transport failure, not something rendering ever sees.
        response.json::<AnswerResponse>().map_err(BackendError::Decode)
    }
}

impl BackendClientTrait for BackendClient {
    fn query(&self, query: &str) -> Result<AnswerResponse, BackendError> {
        self.query_internal(query)
    }
}
