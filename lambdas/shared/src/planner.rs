//! Client for the TMB journey-planning API

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::{Error, Result};
use crate::models::{Credentials, JourneyRequest};

const PLAN_ENDPOINT: &str = "planner/plan";

/// Anything that can answer a journey request with a plan document
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JourneyPlanner: Send + Sync {
    async fn plan(
        &self,
        request: &JourneyRequest,
        credentials: &Credentials,
    ) -> Result<serde_json::Value>;
}

/// HTTPS client for `{base_url}planner/plan`
pub struct TmbPlannerClient {
    client: Client,
    base_url: String,
}

impl TmbPlannerClient {
    /// `base_url` must end with `/`
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn plan_url(&self) -> String {
        format!("{}{}", self.base_url, PLAN_ENDPOINT)
    }
}

#[async_trait]
impl JourneyPlanner for TmbPlannerClient {
    async fn plan(
        &self,
        request: &JourneyRequest,
        credentials: &Credentials,
    ) -> Result<serde_json::Value> {
        let mut params = vec![
            ("app_id", credentials.app_id.clone()),
            ("app_key", credentials.app_key.clone()),
        ];
        params.extend(request.query_params());

        debug!(
            from = %request.origin.to_place(),
            to = %request.destination.to_place(),
            "Requesting journey plan"
        );

        let response = self
            .client
            .get(self.plan_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::UpstreamRequest(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Journey planner rejected request");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::UpstreamRequest(format!("invalid JSON body: {}", e.without_url())))
    }
}
