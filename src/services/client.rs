//! Caller side of the recommendation endpoint.
//!
//! The ordering gateway uses this to fetch a page of recommendations. Outbound
//! calls are capped at five seconds by default, and timeouts surface as
//! retryable [`AppError::Timeout`] errors.

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Recommendation, RecommendationRequest, RecommendationResponse},
};

pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct RecommendClient {
    http_client: HttpClient,
    base_url: String,
}

impl RecommendClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(base_url, DEFAULT_CLIENT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::with_timeout(&config.recommend_service_url, config.request_timeout())
    }

    /// Requests one page of recommendations for a user
    pub async fn recommend(&self, request: RecommendationRequest) -> AppResult<Vec<Recommendation>> {
        let url = format!("{}/api/v1/recommendations", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| timeout_or(e, &url))?;

        let status = response.status();
        if status == StatusCode::GATEWAY_TIMEOUT {
            return Err(AppError::Timeout(format!(
                "recommendation service at {url} reported a deadline expiry"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Recommendation service call failed");
            return Err(AppError::Upstream(format!(
                "recommendation service returned {status}"
            )));
        }

        let envelope: RecommendationResponse =
            response.json().await.map_err(|e| timeout_or(e, &url))?;
        Ok(envelope.data)
    }
}

fn timeout_or(error: reqwest::Error, url: &str) -> AppError {
    if error.is_timeout() {
        tracing::warn!(url, "Recommendation service call timed out");
        AppError::Timeout(format!("call to {url} timed out"))
    } else {
        AppError::HttpClient(error)
    }
}
