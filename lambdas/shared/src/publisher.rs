//! Topic publishing via SNS

use async_trait::async_trait;
use aws_sdk_sns::Client;

use crate::errors::{Error, Result};
use crate::models::Notification;

/// Publish/subscribe channel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    /// Publish once; returns the message id assigned by the channel
    async fn publish(&self, topic_arn: &str, notification: &Notification) -> Result<String>;
}

pub struct SnsPublisher {
    client: Client,
}

impl SnsPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TopicPublisher for SnsPublisher {
    async fn publish(&self, topic_arn: &str, notification: &Notification) -> Result<String> {
        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(&notification.subject)
            .message(&notification.message)
            .send()
            .await
            .map_err(|e| Error::Publish(format!("{}: {}", topic_arn, e)))?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}
