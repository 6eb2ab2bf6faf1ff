//! TMB Routes Notify Lambda
//!
//! Triggered by S3 object-created notifications for `routes_csv/*.csv`.
//! Publishes one email-friendly message per new CSV to the configured topic.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use tmbroutes_core::logging::init_tracing;
use tmbroutes_core::{
    EventRouter, KeyFilter, ObjectCreated, ObjectStore, PipelineConfig, S3ObjectStore,
    SnsPublisher, Stage, StageRunner, TopicPublisher,
};
use tracing::info;

struct AppState {
    config: PipelineConfig,
    store: Box<dyn ObjectStore>,
    publisher: Box<dyn TopicPublisher>,
}

fn router() -> EventRouter {
    EventRouter::new().subscribe(KeyFilter::route_csvs(), Stage::Notify)
}

async fn process(state: &AppState, payload: &S3Event) -> Result<(), LambdaError> {
    let events = ObjectCreated::from_s3_event(payload);
    info!(record_count = events.len(), "Processing S3 notification batch");

    let runner = StageRunner::new(&state.config, state.store.as_ref(), router())
        .with_publisher(state.publisher.as_ref());
    let outcome = runner.handle_batch(&events).await.into_result()?;

    info!(
        processed = outcome.processed,
        skipped = outcome.skipped,
        "Notify batch complete"
    );
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
    config.require_topic_arn()?;
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let state = Arc::new(AppState {
        config,
        store: Box::new(S3ObjectStore::new(aws_sdk_s3::Client::new(&aws))),
        publisher: Box::new(SnsPublisher::new(aws_sdk_sns::Client::new(&aws))),
    });

    run(service_fn(|event| handler(event, state.clone()))).await
}
