//! Vercel registrar bulk availability client.
//!
//! Sends `POST /v1/registrar/domains/availability` with a bearer token and an
//! optional `teamId`, and reads back one availability flag per domain.

use super::{Availability, AvailabilityProvider};
use crate::error::DomainSieveError;
use crate::types::Domain;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Production API root.
pub const DEFAULT_VERCEL_API_URL: &str = "https://api.vercel.com";

const AVAILABILITY_PATH: &str = "/v1/registrar/domains/availability";

/// Connection settings for [`VercelRegistrar`].
#[derive(Debug, Clone, PartialEq)]
pub struct VercelConfig {
    /// Bearer token. Only required once a lookup is actually made.
    pub bearer_token: Option<String>,

    /// Team the request is made on behalf of
    pub team_id: Option<String>,

    /// API root, overridable for testing
    pub base_url: String,

    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Default for VercelConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            team_id: None,
            base_url: DEFAULT_VERCEL_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct AvailabilityRequest<'a> {
    domains: &'a [Domain],
}

#[derive(Deserialize)]
struct AvailabilityResponse {
    results: Vec<Availability>,
}

/// HTTP client for the Vercel registrar.
#[derive(Clone)]
pub struct VercelRegistrar {
    http_client: reqwest::Client,
    config: VercelConfig,
}

impl VercelRegistrar {
    pub fn new(config: VercelConfig) -> Result<Self, DomainSieveError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("domain-sieve/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainSieveError::registrar(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &VercelConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            AVAILABILITY_PATH
        )
    }
}

#[async_trait]
impl AvailabilityProvider for VercelRegistrar {
    async fn bulk_availability(
        &self,
        domains: &[Domain],
    ) -> Result<Vec<Availability>, DomainSieveError> {
        let token = self.config.bearer_token.as_deref().ok_or_else(|| {
            DomainSieveError::config(
                "VERCEL_BEARER_TOKEN is not set; it is required to query uncached domains",
            )
        })?;

        let mut request = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&AvailabilityRequest { domains });

        if let Some(team_id) = &self.config.team_id {
            request = request.query(&[("teamId", team_id)]);
        }

        debug!("Requesting availability for {} domains", domains.len());
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            };
            return Err(DomainSieveError::registrar_with_status(
                message,
                status.as_u16(),
            ));
        }

        let body = response.bytes().await?;
        let parsed: AvailabilityResponse = serde_json::from_slice(&body)?;
        Ok(parsed.results)
    }
}
