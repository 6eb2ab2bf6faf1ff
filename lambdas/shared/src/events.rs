//! Object-created events and routing
//!
//! The pipeline stages are coupled only through the object store: a new
//! object under a prefix is the trigger for the next stage. This module makes
//! that contract explicit so it can be exercised without S3:
//! - [`ObjectCreated`]: a typed "this key now exists" event
//! - [`KeyFilter`]: the prefix + suffix scope of a subscription
//! - [`EventRouter`]: which [`Stage`]s receive a given event

use aws_lambda_events::event::s3::S3Event;
use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use tracing::warn;

use crate::models::{CSV_PREFIX, RAW_PREFIX};

/// A new object exists in the store
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectCreated {
    pub bucket: String,
    pub key: String,
    pub event_time: DateTime<Utc>,
}

impl ObjectCreated {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            event_time: Utc::now(),
        }
    }

    /// Extract one event per usable record of an S3 notification
    ///
    /// Records without a bucket name or key are skipped.
    pub fn from_s3_event(event: &S3Event) -> Vec<Self> {
        event
            .records
            .iter()
            .filter_map(|record| {
                let bucket = record.s3.bucket.name.as_deref();
                let key = record.s3.object.key.as_deref();
                match (bucket, key) {
                    (Some(bucket), Some(key)) => Some(Self {
                        bucket: bucket.to_string(),
                        key: decode_object_key(key),
                        event_time: record.event_time,
                    }),
                    _ => {
                        warn!("S3 record without bucket or key");
                        None
                    }
                }
            })
            .collect()
    }
}

/// S3 notifications carry form-encoded keys (`+` for space)
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|key| key.into_owned())
        .unwrap_or(spaced)
}

/// Prefix + suffix scope, as configured on the bucket notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFilter {
    pub prefix: String,
    pub suffix: String,
}

impl KeyFilter {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Raw journey plans, consumed by the CSV transformer
    pub fn raw_plans() -> Self {
        Self::new(RAW_PREFIX, ".json")
    }

    /// Route CSV files, consumed by the notifier
    pub fn route_csvs() -> Self {
        Self::new(CSV_PREFIX, ".csv")
    }

    pub fn matches(&self, key: &str) -> bool {
        key.len() >= self.prefix.len() + self.suffix.len()
            && key.starts_with(&self.prefix)
            && key.ends_with(&self.suffix)
    }
}

/// Consumers of object-created events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    TransformCsv,
    Notify,
    ActivityLog,
}

/// Maps key filters to the stages subscribed to them
#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    routes: Vec<(KeyFilter, Stage)>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fetch -> transform -> notify wiring
    pub fn pipeline() -> Self {
        Self::new()
            .subscribe(KeyFilter::raw_plans(), Stage::TransformCsv)
            .subscribe(KeyFilter::route_csvs(), Stage::Notify)
    }

    pub fn subscribe(mut self, filter: KeyFilter, stage: Stage) -> Self {
        self.routes.push((filter, stage));
        self
    }

    /// Stages that should run for `event`, in subscription order
    pub fn route(&self, event: &ObjectCreated) -> Vec<Stage> {
        self.routes
            .iter()
            .filter(|(filter, _)| filter.matches(&event.key))
            .map(|(_, stage)| *stage)
            .collect()
    }
}
