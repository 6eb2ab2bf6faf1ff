//! TMB Routes Activity Log Lambda
//!
//! Triggered by S3 object-created notifications for both raw plans and route
//! CSVs. Appends one line per new object to `logs/logs.txt`, keeping the most
//! recent `ACTIVITY_LOG_MAX_ENTRIES` lines.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use tmbroutes_core::logging::init_tracing;
use tmbroutes_core::{
    EventRouter, KeyFilter, ObjectCreated, ObjectStore, PipelineConfig, S3ObjectStore, Stage,
    StageRunner,
};
use tracing::info;

struct AppState {
    config: PipelineConfig,
    store: Box<dyn ObjectStore>,
}

fn router() -> EventRouter {
    EventRouter::new()
        .subscribe(KeyFilter::raw_plans(), Stage::ActivityLog)
        .subscribe(KeyFilter::route_csvs(), Stage::ActivityLog)
}

async fn process(state: &AppState, payload: &S3Event) -> Result<(), LambdaError> {
    let events = ObjectCreated::from_s3_event(payload);
    info!(record_count = events.len(), "Processing S3 notification batch");

    // Records are applied one at a time; each read-modify-write of the log
    // must finish before the next starts.
    let runner = StageRunner::new(&state.config, state.store.as_ref(), router());
    let outcome = runner.handle_batch(&events).await.into_result()?;

    info!(processed = outcome.processed, skipped = outcome.skipped, "Activity log updated");
    Ok(())
}

async fn handler(event: LambdaEvent<S3Event>, state: Arc<AppState>) -> Result<(), LambdaError> {
    let (payload, _context) = event.into_parts();
    process(&state, &payload).await
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    init_tracing();

    let config = PipelineConfig::from_env()?;
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let state = Arc::new(AppState {
        config,
        store: Box::new(S3ObjectStore::new(aws_sdk_s3::Client::new(&aws))),
    });

    run(service_fn(|event| handler(event, state.clone()))).await
}
