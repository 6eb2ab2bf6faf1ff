//! Pipeline configuration, read from the Lambda environment

use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::models::Coordinates;

const BUCKET_ENV: &str = "TMB_BUCKET";
const DEFAULT_BUCKET: &str = "tmbinfo";

const SECRET_NAME_ENV: &str = "TMB_SECRET_NAME";
const DEFAULT_SECRET_NAME: &str = "tmb/api-credentials";

const API_BASE_URL_ENV: &str = "TMB_API_BASE_URL";
const DEFAULT_API_BASE_URL: &str = "https://api.tmb.cat/v1/";

const TOPIC_ARN_ENV: &str = "SNS_TOPIC_ARN";

const HOME_LATITUDE_ENV: &str = "HOME_LATITUDE";
const HOME_LONGITUDE_ENV: &str = "HOME_LONGITUDE";
const WORK_LATITUDE_ENV: &str = "WORK_LATITUDE";
const WORK_LONGITUDE_ENV: &str = "WORK_LONGITUDE";

const DEFAULT_HOME: (f64, f64) = (41.423043, 2.184006);
const DEFAULT_WORK: (f64, f64) = (41.406232, 2.192273);

const ACTIVITY_LOG_MAX_ENTRIES_ENV: &str = "ACTIVITY_LOG_MAX_ENTRIES";
const DEFAULT_ACTIVITY_LOG_MAX_ENTRIES: usize = 100;

/// Settings shared by every Lambda in the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bucket holding raw plans, CSV files and the activity log
    pub bucket: String,
    /// Secrets Manager secret with `TMB_APP_ID` / `TMB_APP_KEY`
    pub secret_name: String,
    /// Base URL of the journey-planning API, ending in `/`
    pub api_base_url: String,
    /// Topic notified when a CSV lands; only the notifier needs it
    pub topic_arn: Option<String>,
    /// Fixed origin of every journey
    pub home: Coordinates,
    /// Destination used when the request does not override it
    pub work: Coordinates,
    pub activity_log_max_entries: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            topic_arn: None,
            home: Coordinates {
                latitude: DEFAULT_HOME.0,
                longitude: DEFAULT_HOME.1,
            },
            work: Coordinates {
                latitude: DEFAULT_WORK.0,
                longitude: DEFAULT_WORK.1,
            },
            activity_log_max_entries: DEFAULT_ACTIVITY_LOG_MAX_ENTRIES,
        }
    }
}

impl PipelineConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut api_base_url =
            lookup(API_BASE_URL_ENV).unwrap_or_else(|| defaults.api_base_url.clone());
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }

        let home = Coordinates::new(
            parse_or(&lookup, HOME_LATITUDE_ENV, defaults.home.latitude)?,
            parse_or(&lookup, HOME_LONGITUDE_ENV, defaults.home.longitude)?,
        )
        .map_err(|e| Error::Config(e.to_string()))?;

        let work = Coordinates::new(
            parse_or(&lookup, WORK_LATITUDE_ENV, defaults.work.latitude)?,
            parse_or(&lookup, WORK_LONGITUDE_ENV, defaults.work.longitude)?,
        )
        .map_err(|e| Error::Config(e.to_string()))?;

        let activity_log_max_entries = parse_or(
            &lookup,
            ACTIVITY_LOG_MAX_ENTRIES_ENV,
            defaults.activity_log_max_entries,
        )?;
        if activity_log_max_entries == 0 {
            return Err(Error::Config(format!(
                "{} must be at least 1",
                ACTIVITY_LOG_MAX_ENTRIES_ENV
            )));
        }

        Ok(Self {
            bucket: lookup(BUCKET_ENV).unwrap_or(defaults.bucket),
            secret_name: lookup(SECRET_NAME_ENV).unwrap_or(defaults.secret_name),
            api_base_url,
            topic_arn: lookup(TOPIC_ARN_ENV).filter(|arn| !arn.is_empty()),
            home,
            work,
            activity_log_max_entries,
        })
    }

    /// Topic ARN, or a publish error when the notifier is not configured
    pub fn require_topic_arn(&self) -> Result<&str> {
        self.topic_arn
            .as_deref()
            .ok_or_else(|| Error::Publish(format!("{} is not set", TOPIC_ARN_ENV)))
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", name, raw))),
        None => Ok(default),
    }
}
