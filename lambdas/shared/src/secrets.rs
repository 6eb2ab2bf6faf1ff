//! Credential retrieval from AWS Secrets Manager

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::models::Credentials;

/// Named credential records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Load the planner credential pair stored under `secret_name`
    async fn credentials(&self, secret_name: &str) -> Result<Credentials>;
}

pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn credentials(&self, secret_name: &str) -> Result<Credentials> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_name)
            .send()
            .await
            .map_err(|e| Error::SecretAccess(format!("{}: {}", secret_name, e)))?;

        let secret = output.secret_string().ok_or_else(|| {
            Error::SecretAccess(format!("{} has no string value", secret_name))
        })?;

        debug!(secret_name = %secret_name, "Loaded planner credentials");
        parse_credentials(secret_name, secret)
    }
}

/// Parse a `{"TMB_APP_ID": ..., "TMB_APP_KEY": ...}` record
pub fn parse_credentials(secret_name: &str, secret: &str) -> Result<Credentials> {
    serde_json::from_str(secret)
        .map_err(|e| Error::SecretAccess(format!("{} is not a credential record: {}", secret_name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credentials() {
        let creds = parse_credentials(
            "tmb/api-credentials",
            r#"{"TMB_APP_ID": "8de5b882", "TMB_APP_KEY": "a9e0b1a3"}"#,
        )
        .unwrap();
        assert_eq!(creds.app_id, "8de5b882");
        assert_eq!(creds.app_key, "a9e0b1a3");
    }

    #[test]
    fn test_missing_field_is_secret_access_error() {
        let err = parse_credentials("tmb/api-credentials", r#"{"TMB_APP_ID": "8de5b882"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::SecretAccess(_)));
        assert!(err.to_string().contains("tmb/api-credentials"));
    }

    #[test]
    fn test_error_does_not_leak_value() {
        let err = parse_credentials("s", "not json s3cr3t").unwrap_err();
        assert!(!err.to_string().contains("s3cr3t"));
    }
}
