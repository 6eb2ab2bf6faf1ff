//! Rolling log of objects created in the bucket
//!
//! The log lives in a single object. Updates are written to a temporary key
//! first, then copied over the real one, so a failed write never truncates
//! the existing log.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{Error, Result};
use crate::events::ObjectCreated;
use crate::storage::ObjectStore;

pub const LOG_KEY: &str = "logs/logs.txt";
pub const TEMP_LOG_KEY: &str = "logs/logs_temp.txt";

/// One log line for a created object
pub fn log_entry(key: &str, event_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!(
        "New file created: {} at {}. Log entry added at {}",
        key,
        event_time.to_rfc3339(),
        now.to_rfc3339()
    )
}

/// Append `entry`, keeping only the newest `max_entries` lines
pub fn append_entry(existing: &str, entry: &str, max_entries: usize) -> String {
    let mut entries: Vec<&str> = existing.lines().filter(|l| !l.is_empty()).collect();
    entries.push(entry);
    let skip = entries.len().saturating_sub(max_entries);

    let mut content = entries[skip..].join("\n");
    content.push('\n');
    content
}

/// Record `event` in the bucket's activity log
pub async fn record_object_created(
    store: &dyn ObjectStore,
    event: &ObjectCreated,
    max_entries: usize,
    now: DateTime<Utc>,
) -> Result<()> {
    let existing = match store.get_object(&event.bucket, LOG_KEY).await {
        Ok(body) => String::from_utf8_lossy(&body).into_owned(),
        Err(Error::ObjectNotFound { .. }) => {
            debug!(bucket = %event.bucket, "Activity log does not exist yet, creating it");
            String::new()
        }
        Err(e) => return Err(e),
    };

    let entry = log_entry(&event.key, event.event_time, now);
    let content = append_entry(&existing, &entry, max_entries);

    store
        .put_object(&event.bucket, TEMP_LOG_KEY, content.into_bytes(), "text/plain")
        .await?;
    store
        .copy_object(&event.bucket, TEMP_LOG_KEY, LOG_KEY)
        .await?;
    store.delete_object(&event.bucket, TEMP_LOG_KEY).await?;

    info!(bucket = %event.bucket, key = %event.key, "Activity log updated");
    Ok(())
}
