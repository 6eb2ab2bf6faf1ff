//! TMB Routes Core Library
//!
//! Shared functionality for the route pipeline Lambda functions:
//! - Domain models, configuration and error types
//! - Secret store, journey planner, object store and topic clients
//! - Fetch, CSV transform, notify and activity-log stages
//! - Object-created event routing

pub mod activity_log;
pub mod auth;
pub mod config;
pub mod errors;
pub mod events;
pub mod fetcher;
pub mod logging;
pub mod memory;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod planner;
pub mod publisher;
pub mod secrets;
pub mod storage;
pub mod transform;

pub use config::PipelineConfig;
pub use errors::{Error, Result};
pub use events::{EventRouter, KeyFilter, ObjectCreated, Stage};
pub use fetcher::RouteFetcher;
pub use models::*;
pub use pipeline::{BatchOutcome, StageRunner};
pub use planner::{JourneyPlanner, TmbPlannerClient};
pub use publisher::{SnsPublisher, TopicPublisher};
pub use secrets::{SecretStore, SecretsManagerStore};
pub use storage::{ObjectStore, S3ObjectStore};
