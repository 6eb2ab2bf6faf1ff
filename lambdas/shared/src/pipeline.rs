//! Runs pipeline stages for object-created events
//!
//! Every event-triggered Lambda is a [`StageRunner`] with a router holding the
//! single subscription that Lambda serves. Tests wire the full router to a
//! [`MemoryObjectStore`](crate::memory::MemoryObjectStore) to drive the whole
//! chain.

use chrono::Utc;
use tracing::{error, info};

use crate::activity_log::record_object_created;
use crate::config::PipelineConfig;
use crate::errors::{Error, Result};
use crate::events::{EventRouter, ObjectCreated, Stage};
use crate::notify::notify_object;
use crate::publisher::TopicPublisher;
use crate::storage::ObjectStore;
use crate::transform::transform_object;

/// Counts from one batch of events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchOutcome {
    /// Fail when any record failed
    ///
    /// The platform retries a failed invocation as a whole, so records that
    /// already succeeded in the batch run again on retry.
    pub fn into_result(self) -> Result<Self> {
        if self.failed > 0 {
            return Err(Error::Internal(format!(
                "{} of {} records failed",
                self.failed,
                self.processed + self.failed + self.skipped
            )));
        }
        Ok(self)
    }
}

pub struct StageRunner<'a> {
    config: &'a PipelineConfig,
    store: &'a dyn ObjectStore,
    publisher: Option<&'a dyn TopicPublisher>,
    router: EventRouter,
}

impl<'a> StageRunner<'a> {
    pub fn new(config: &'a PipelineConfig, store: &'a dyn ObjectStore, router: EventRouter) -> Self {
        Self {
            config,
            store,
            publisher: None,
            router,
        }
    }

    pub fn with_publisher(mut self, publisher: &'a dyn TopicPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Run one stage for one event
    pub async fn run(&self, stage: Stage, event: &ObjectCreated) -> Result<()> {
        match stage {
            Stage::TransformCsv => {
                transform_object(self.store, &event.bucket, &event.key).await?;
            }
            Stage::Notify => {
                let topic_arn = self.config.require_topic_arn()?;
                let publisher = self
                    .publisher
                    .ok_or_else(|| Error::Publish("no topic publisher configured".to_string()))?;
                notify_object(self.store, publisher, topic_arn, &event.bucket, &event.key).await?;
            }
            Stage::ActivityLog => {
                record_object_created(
                    self.store,
                    event,
                    self.config.activity_log_max_entries,
                    Utc::now(),
                )
                .await?;
            }
        }
        Ok(())
    }

    /// Run every subscribed stage for `event`
    ///
    /// Returns the number of stages run; stops at the first failure.
    pub async fn handle(&self, event: &ObjectCreated) -> Result<usize> {
        let stages = self.router.route(event);
        for stage in &stages {
            self.run(*stage, event).await?;
        }
        Ok(stages.len())
    }

    /// Handle a batch, logging failures and carrying on with the rest
    pub async fn handle_batch(&self, events: &[ObjectCreated]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for event in events {
            match self.handle(event).await {
                Ok(0) => {
                    info!(bucket = %event.bucket, key = %event.key, "No stage subscribed, skipping");
                    outcome.skipped += 1;
                }
                Ok(_) => outcome.processed += 1,
                Err(e) => {
                    error!(
                        bucket = %event.bucket,
                        key = %event.key,
                        code = e.code(),
                        error = %e,
                        "Failed to process object"
                    );
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }
}
