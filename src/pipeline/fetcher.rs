//! HTTP fetch client for the discovery pipeline
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building a reqwest client with configured timeouts
//! - Rotating the client-identity header per request
//! - Classifying failures into the typed [`FetchError`]
//!
//! There is no retry at this layer; retry policy, if any, belongs to the
//! pipeline driver.

use crate::config::FetchConfig;
use crate::{ConfigError, FetchError, ScoutError};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;

/// Asynchronous HTTP client with a rotating client-identity pool
///
/// Each GET picks one identity string uniformly at random from the pool.
/// Rotation reduces the chance of being blocked by naive bot filtering on
/// the portal; it is evasion, not security, and offers no protection
/// against a filter that inspects anything beyond the header.
///
/// Cloning is cheap: the underlying reqwest client is reference-counted.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    user_agents: Vec<String>,
}

impl FetchClient {
    /// Creates a fetch client from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Fetch configuration (timeouts and identity pool)
    ///
    /// # Returns
    ///
    /// * `Ok(FetchClient)` - Successfully built client
    /// * `Err(ScoutError)` - Empty identity pool or client build failure
    pub fn new(config: &FetchConfig) -> Result<Self, ScoutError> {
        if config.user_agents.is_empty() {
            return Err(ScoutError::Config(ConfigError::Validation(
                "user_agents cannot be empty".to_string(),
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            user_agents: config.user_agents.clone(),
        })
    }

    /// Fetches a URL and returns the body text
    ///
    /// On a non-success status code returns [`FetchError::HttpStatus`]; on
    /// DNS/timeout/reset failures returns [`FetchError::Transport`]. Both
    /// are non-fatal to the stages: a failed fetch for one URL means "no
    /// result for that URL", never an aborted batch.
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to fetch
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.pick_user_agent())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// Picks one identity string uniformly at random from the pool
    fn pick_user_agent(&self) -> &str {
        &self.user_agents[fastrand::usize(..self.user_agents.len())]
    }
}
