//! Notifier: summarise a route CSV and publish it to the topic

use tracing::info;

use crate::errors::Result;
use crate::models::{Notification, RouteRow};
use crate::publisher::TopicPublisher;
use crate::storage::ObjectStore;
use crate::transform::from_csv;

pub const SUBJECT: &str = "Update on today's route";

/// The itinerary that arrives soonest after it departs
#[derive(Debug, Clone, PartialEq)]
pub struct BestRoute {
    pub id: String,
    /// Unique modes in leg order, joined with ` & `
    pub way_to_go: String,
    /// Milliseconds between first departure and last arrival
    pub span_ms: i64,
}

impl BestRoute {
    pub fn minutes(&self) -> i64 {
        self.span_ms.saturating_add(30_000) / 60_000
    }
}

/// Pick the itinerary with the smallest departure-to-arrival span
///
/// Itineraries without any timing are ignored; ties go to the first one in
/// file order.
pub fn best_route(rows: &[RouteRow]) -> Option<BestRoute> {
    let mut ids: Vec<&str> = Vec::new();
    for row in rows {
        if !ids.contains(&row.id.as_str()) {
            ids.push(&row.id);
        }
    }

    let mut best: Option<BestRoute> = None;
    for id in ids {
        let legs: Vec<&RouteRow> = rows.iter().filter(|r| r.id == id).collect();
        let start = legs.iter().filter_map(|r| r.start_time).min();
        let end = legs.iter().filter_map(|r| r.end_time).max();
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        let span_ms = end.saturating_sub(start);
        if best.as_ref().is_some_and(|b| b.span_ms <= span_ms) {
            continue;
        }

        let mut modes: Vec<&str> = Vec::new();
        for mode in legs.iter().filter_map(|r| r.mode.as_deref()) {
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }

        best = Some(BestRoute {
            id: id.to_string(),
            way_to_go: modes.join(" & "),
            span_ms,
        });
    }
    best
}

/// Plain-text message naming the CSV object and the best route in it
pub fn build_notification(key: &str, best: Option<&BestRoute>) -> Notification {
    let summary = match best {
        Some(best) => format!(
            "The best way to go today is {} ({} min).",
            best.way_to_go,
            best.minutes()
        ),
        None => "A new route file is available.".to_string(),
    };
    Notification {
        subject: SUBJECT.to_string(),
        message: format!("{}\n\nRoute file: {}", summary, key),
    }
}

/// Read the CSV at `key` and publish one notification about it
///
/// Returns the message id assigned by the topic.
pub async fn notify_object(
    store: &dyn ObjectStore,
    publisher: &dyn TopicPublisher,
    topic_arn: &str,
    bucket: &str,
    key: &str,
) -> Result<String> {
    let body = store.get_object(bucket, key).await?;
    let rows = from_csv(&body)?;
    let best = best_route(&rows);

    let notification = build_notification(key, best.as_ref());
    let message_id = publisher.publish(topic_arn, &notification).await?;

    info!(
        key = %key,
        message_id = %message_id,
        way_to_go = best.as_ref().map(|b| b.way_to_go.as_str()).unwrap_or("unknown"),
        "Notification published"
    );

    Ok(message_id)
}
