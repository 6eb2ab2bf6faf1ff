//! CSV transformer: journey plan JSON to one CSV row per leg

use tracing::info;
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::models::{csv_key_for, JourneyPlanDocument, RouteRow};
use crate::storage::ObjectStore;

/// Flatten every itinerary leg into a row
///
/// Each itinerary gets a fresh id shared by its rows. Fails if the document
/// does not have a `plan.itineraries` array or contains no legs at all.
pub fn extract_routes(document: &[u8]) -> Result<Vec<RouteRow>> {
    let document: JourneyPlanDocument = serde_json::from_slice(document)
        .map_err(|e| Error::Transform(format!("not a journey plan: {}", e)))?;

    let mut rows = Vec::new();
    for (index, itinerary) in document.plan.itineraries.iter().enumerate() {
        let id = Uuid::new_v4().to_string();

        let mut modes: Vec<&str> = Vec::new();
        for mode in itinerary.legs.iter().filter_map(|leg| leg.mode.as_deref()) {
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }
        let modes = modes.join("|");

        for (leg_index, leg) in itinerary.legs.iter().enumerate() {
            rows.push(RouteRow {
                id: id.clone(),
                itinerary: index,
                leg: leg_index,
                mode: leg.mode.clone(),
                start_time: leg.start_time,
                end_time: leg.end_time,
                from: leg.from.as_ref().and_then(|p| p.name.clone()),
                to: leg.to.as_ref().and_then(|p| p.name.clone()),
                route: leg.route.clone(),
                distance: leg.distance,
                leg_duration: leg.duration,
                agency: leg.agency_name.clone(),
                duration: itinerary.duration,
                transfers: itinerary.transfers,
                modes: modes.clone(),
            });
        }
    }

    if rows.is_empty() {
        return Err(Error::Transform(
            "journey plan contains no itinerary legs".to_string(),
        ));
    }

    Ok(rows)
}

/// Render rows as CSV text with a header line
pub fn to_csv(rows: &[RouteRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| Error::Transform(format!("CSV encoding failed: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Transform(format!("CSV encoding failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Internal(e.to_string()))
}

/// Parse CSV text produced by [`to_csv`]
pub fn from_csv(text: &[u8]) -> Result<Vec<RouteRow>> {
    csv::Reader::from_reader(text)
        .deserialize()
        .collect::<std::result::Result<Vec<RouteRow>, _>>()
        .map_err(|e| Error::Transform(format!("not a route CSV: {}", e)))
}

/// Read the raw plan at `key`, write its CSV next to it under `routes_csv/`
///
/// Returns the key of the CSV object. Nothing is written on failure.
pub async fn transform_object(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<String> {
    let csv_key = csv_key_for(key)?;
    let document = store.get_object(bucket, key).await?;

    let rows = extract_routes(&document)?;
    let csv = to_csv(&rows)?;

    store
        .put_object(bucket, &csv_key, csv.into_bytes(), "text/csv")
        .await?;

    info!(
        bucket = %bucket,
        source = %key,
        key = %csv_key,
        rows = rows.len(),
        "CSV file created"
    );

    Ok(csv_key)
}
