//! HTTP backend implementation.
//!
//! This module provides the [`HttpBackend`] which implements the [`Backend`]
//! trait against the hosted application API. Entity schemas and records live
//! under `entities/`, server-side functions (the comparison engine) under
//! `functions/`, and identity under `auth/me`.

use super::Backend;
use crate::error::{ConsoleError, Result as ConsoleResult};
use crate::types::{ComparisonOutcome, ComparisonRequest, InventoryReport, UserProfile};
use anyhow::{anyhow, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.tmmit.com/v1";

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Server-side function computing the fixed physical inventory report.
const INVENTORY_FUNCTION: &str = "comparePhysicalInventoryToTrailers";

/// Server-side function running the two-entity comparison.
const COMPARE_FUNCTION: &str = "compareEntities";

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL for the API (useful for proxies or staging environments).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConsoleResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConsoleError::InvalidConfig(
                "base URL must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConsoleError::InvalidConfig(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`HttpConfig`].
#[derive(Default)]
pub struct HttpConfigBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl HttpConfigBuilder {
    /// Set a custom base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP backend for the hosted application API.
///
/// # Example
///
/// ```rust,ignore
/// use tally_console::backend::{HttpBackend, HttpConfig};
///
/// // Simple usage with defaults
/// let backend = HttpBackend::new("your-api-key", "your-app-id")?;
///
/// // With custom configuration
/// let config = HttpConfig::builder()
///     .base_url("https://staging.tmmit.com/v1")
///     .timeout_secs(60)
///     .build();
/// let backend = HttpBackend::with_config("your-api-key", "your-app-id", config)?;
/// ```
pub struct HttpBackend {
    api_key: String,
    app_id: String,
    config: HttpConfig,
    client: Client,
}

impl HttpBackend {
    /// Create a new HTTP backend with default configuration.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for the hosted application
    /// * `app_id` - Application id the entities belong to
    ///
    /// # Errors
    ///
    /// Returns an error if the app id is empty or the HTTP client cannot
    /// be created.
    pub fn new(api_key: impl Into<String>, app_id: impl Into<String>) -> ConsoleResult<Self> {
        Self::with_config(api_key, app_id, HttpConfig::default())
    }

    /// Create a new HTTP backend with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the app id is
    /// empty, or the HTTP client cannot be created.
    pub fn with_config(
        api_key: impl Into<String>,
        app_id: impl Into<String>,
        config: HttpConfig,
    ) -> ConsoleResult<Self> {
        config.validate()?;
        let app_id = app_id.into();
        if app_id.trim().is_empty() {
            return Err(ConsoleError::InvalidConfig(
                "app id must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            app_id,
            config,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/apps/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.app_id,
            path
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("API error {}: {}", status, response.text()?));
        }
        Ok(response.json()?)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {}", path);
        let response = self.authorized(self.client.get(self.endpoint(path))).send()?;
        Self::parse_response(response)
    }

    fn invoke_function<T: DeserializeOwned>(&self, name: &str, body: &Value) -> Result<T> {
        debug!("Invoking function {}", name);
        let response = self
            .authorized(self.client.post(self.endpoint(&format!("functions/{}", name))))
            .json(body)
            .send()?;
        Self::parse_response(response)
    }
}

impl Backend for HttpBackend {
    fn current_user(&self) -> Result<UserProfile> {
        self.get_json("auth/me")
    }

    fn fetch_inventory_report(&self) -> Result<InventoryReport> {
        self.invoke_function(INVENTORY_FUNCTION, &serde_json::json!({}))
    }

    fn fetch_entity_schema(&self, entity: &str) -> Result<Value> {
        self.get_json(&format!("entities/{}/schema", entity))
    }

    fn fetch_sample_records(&self, entity: &str, limit: Option<usize>) -> Result<Value> {
        debug!("GET entities/{} (limit {:?})", entity, limit);
        let mut request = self
            .authorized(self.client.get(self.endpoint(&format!("entities/{}", entity))));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response = request.send()?;
        Self::parse_response(response)
    }

    fn run_comparison(&self, request: &ComparisonRequest) -> Result<ComparisonOutcome> {
        self.invoke_function(COMPARE_FUNCTION, &serde_json::to_value(request)?)
    }

    fn name(&self) -> &str {
        "HTTP"
    }
}

// ============================================================================
// Tests
// ============================================================================
