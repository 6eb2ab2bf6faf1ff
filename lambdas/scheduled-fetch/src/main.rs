//! TMB Routes Scheduled Fetch Lambda
//!
//! Triggered by a CloudWatch schedule. Fetches the home -> work plan with the
//! configured destination and stores it under `routes_from_api/`, which kicks
//! off the rest of the pipeline.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_lambda_events::event::cloudwatch_events::CloudWatchEvent;
use chrono::NaiveDateTime;
use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use tmbroutes_core::logging::init_tracing;
use tmbroutes_core::{
    DestinationOverride, JourneyPlanner, ObjectStore, PipelineConfig, RouteFetcher,
    S3ObjectStore, SecretStore, SecretsManagerStore, TmbPlannerClient,
};
use tracing::{error, info};

struct AppState {
    config: PipelineConfig,
    secrets: Box<dyn SecretStore>,
    planner: Box<dyn JourneyPlanner>,
    store: Box<dyn ObjectStore>,
}

async fn fetch_scheduled(state: &AppState, now: NaiveDateTime) -> Result<String, LambdaError> {
    let fetcher = RouteFetcher::new(
        &state.config,
        state.secrets.as_ref(),
        state.planner.as_ref(),
        state.store.as_ref(),
    );

    match fetcher.fetch(&DestinationOverride::default(), now).await {
        Ok(stored) => Ok(stored.key),
        Err(e) => {
            error!(code = e.code(), error = %e, "Scheduled fetch failed");
            Err(e.into())
        }
    }
}

async fn handler(
    event: LambdaEvent<CloudWatchEvent>,
    state: Arc<AppState>,
) -> Result<(), LambdaError> {
    let (payload, context) = event.into_parts();
    info!(
        request_id = %context.request_id,
        source = payload.source.as_deref().unwrap_or("unknown"),
        "Processing scheduled fetch"
    );

    let key = fetch_scheduled(&state, chrono::Local::now().naive_local()).await?;
    info!(key = %key, "Scheduled fetch complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    init_tracing();

    let config = PipelineConfig::from_env()?;
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let state = Arc::new(AppState {
        secrets: Box::new(SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&aws))),
        planner: Box::new(TmbPlannerClient::new(
            reqwest::Client::new(),
            config.api_base_url.clone(),
        )),
        store: Box::new(S3ObjectStore::new(aws_sdk_s3::Client::new(&aws))),
        config,
    });

    run(service_fn(|event| handler(event, state.clone()))).await
}
