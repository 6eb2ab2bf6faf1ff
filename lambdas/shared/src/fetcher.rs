//! Route fetcher: secret read, planner call, raw plan write

use chrono::NaiveDateTime;
use tracing::info;

use crate::config::PipelineConfig;
use crate::errors::Result;
use crate::models::{journey_plan_key, DestinationOverride, JourneyRequest, StoredPlan};
use crate::planner::JourneyPlanner;
use crate::secrets::SecretStore;
use crate::storage::ObjectStore;

pub struct RouteFetcher<'a> {
    config: &'a PipelineConfig,
    secrets: &'a dyn SecretStore,
    planner: &'a dyn JourneyPlanner,
    store: &'a dyn ObjectStore,
}

impl<'a> RouteFetcher<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        secrets: &'a dyn SecretStore,
        planner: &'a dyn JourneyPlanner,
        store: &'a dyn ObjectStore,
    ) -> Self {
        Self {
            config,
            secrets,
            planner,
            store,
        }
    }

    /// Fetch a plan from home to the (possibly overridden) destination and
    /// persist it under a key derived from `now`
    ///
    /// Nothing is written unless the planner call succeeds. A second fetch in
    /// the same minute overwrites the first.
    pub async fn fetch(
        &self,
        destination: &DestinationOverride,
        now: NaiveDateTime,
    ) -> Result<StoredPlan> {
        let destination = destination.apply(self.config.work)?;
        let request = JourneyRequest::new(self.config.home, destination, now);

        let credentials = self.secrets.credentials(&self.config.secret_name).await?;
        let journey_plan = self.planner.plan(&request, &credentials).await?;

        let key = journey_plan_key(now);
        let body = serde_json::to_vec(&journey_plan)?;
        self.store
            .put_object(&self.config.bucket, &key, body, "application/json")
            .await?;

        info!(bucket = %self.config.bucket, key = %key, "Stored journey plan");

        Ok(StoredPlan { key, journey_plan })
    }
}
