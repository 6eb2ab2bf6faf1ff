//! Domain models for the TMB routes pipeline
//!
//! These types represent the entities flowing through the pipeline:
//! - Requests: coordinates, credentials and the journey request sent upstream
//! - Journey plans: the raw upstream document and the shape the transformer reads
//! - Route rows: the flattened CSV representation
//! - API responses returned by the HTTP Lambda

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Key prefix for raw journey plans written by the fetcher
pub const RAW_PREFIX: &str = "routes_from_api/";
/// Key prefix for transformed CSV files
pub const CSV_PREFIX: &str = "routes_csv/";

/// Travel modes requested from the planner
pub const DEFAULT_MODES: [&str; 2] = ["TRANSIT", "WALK"];

/// A point on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidCoordinate(format!(
                "latitude {} out of range",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidCoordinate(format!(
                "longitude {} out of range",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// `lat,lon` as the planner expects in `fromPlace`/`toPlace`
    pub fn to_place(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// App identifier and key for the journey-planning API
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "TMB_APP_ID")]
    pub app_id: String,
    #[serde(rename = "TMB_APP_KEY")]
    pub app_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"[REDACTED]")
            .finish()
    }
}

/// Destination fields supplied on the query string
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DestinationOverride {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DestinationOverride {
    /// Parse `work_lat` / `work_lon` query values
    pub fn parse(work_lat: Option<&str>, work_lon: Option<&str>) -> Result<Self> {
        Ok(Self {
            latitude: work_lat.map(|v| parse_coordinate("work_lat", v)).transpose()?,
            longitude: work_lon.map(|v| parse_coordinate("work_lon", v)).transpose()?,
        })
    }

    /// Override the fields that were supplied, keep the rest of `base`
    pub fn apply(&self, base: Coordinates) -> Result<Coordinates> {
        Coordinates::new(
            self.latitude.unwrap_or(base.latitude),
            self.longitude.unwrap_or(base.longitude),
        )
    }
}

fn parse_coordinate(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidCoordinate(format!("{}={}", name, value)))
}

/// Parameters of a single planning call
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub modes: Vec<String>,
    pub show_intermediate_stops: bool,
}

impl JourneyRequest {
    /// Request for transit+walk journeys leaving at `now`
    pub fn new(origin: Coordinates, destination: Coordinates, now: NaiveDateTime) -> Self {
        Self {
            origin,
            destination,
            date: now.date(),
            time: now.time(),
            modes: DEFAULT_MODES.iter().map(|m| m.to_string()).collect(),
            show_intermediate_stops: true,
        }
    }

    /// Query parameters for `planner/plan`, credentials excluded
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fromPlace", self.origin.to_place()),
            ("toPlace", self.destination.to_place()),
            ("date", self.date.format("%Y-%m-%d").to_string()),
            ("time", self.time.format("%H:%M").to_string()),
            ("mode", self.modes.join(",")),
            (
                "showIntermediateStops",
                self.show_intermediate_stops.to_string(),
            ),
        ]
    }
}

/// A journey plan persisted by the fetcher
#[derive(Debug, Clone, Serialize)]
pub struct StoredPlan {
    pub key: String,
    pub journey_plan: serde_json::Value,
}

/// Object key for a plan fetched at `now` (minute resolution)
pub fn journey_plan_key(now: NaiveDateTime) -> String {
    format!(
        "{}journey_plan_{}.json",
        RAW_PREFIX,
        now.format("%Y-%m-%d_%H-%M")
    )
}

/// Object key of the CSV derived from a raw plan key
///
/// `routes_from_api/journey_plan_2024-08-07_11-43.json` becomes
/// `routes_csv/journey_plan_2024-08-07_11-43.csv`.
pub fn csv_key_for(raw_key: &str) -> Result<String> {
    let name = raw_key
        .strip_prefix(RAW_PREFIX)
        .and_then(|rest| rest.strip_suffix(".json"))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::Transform(format!("Not a journey plan key: {}", raw_key)))?;
    Ok(format!("{}{}.csv", CSV_PREFIX, name))
}

// =========================================================================
// Upstream document shape
// =========================================================================

/// The parts of the planner response the transformer reads
#[derive(Debug, Clone, Deserialize)]
pub struct JourneyPlanDocument {
    pub plan: Plan,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Itinerary {
    /// Total duration in seconds
    pub duration: Option<i64>,
    pub transfers: Option<i64>,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub mode: Option<String>,
    /// Epoch milliseconds
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub from: Option<Place>,
    pub to: Option<Place>,
    pub route: Option<String>,
    /// Meters
    pub distance: Option<f64>,
    /// Seconds
    pub duration: Option<f64>,
    pub agency_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub name: Option<String>,
}

/// One CSV row: a single leg of an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRow {
    /// Identifies the itinerary the leg belongs to
    pub id: String,
    pub itinerary: usize,
    pub leg: usize,
    pub mode: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub route: Option<String>,
    pub distance: Option<f64>,
    pub leg_duration: Option<f64>,
    pub agency: Option<String>,
    pub duration: Option<i64>,
    pub transfers: Option<i64>,
    /// Unique itinerary modes joined with `|`
    pub modes: String,
}

/// Message sent to the notification topic
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub subject: String,
    pub message: String,
}

// =========================================================================
// HTTP responses
// =========================================================================

/// Successful fetch response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub message: String,
    pub journey_plan: serde_json::Value,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: error.into(),
        }
    }
}
