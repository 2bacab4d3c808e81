//! Kinesis-backed stream client.
//!
//! One [`KinesisStreamClient`] wraps one SDK client, built once per process
//! through the default AWS credential chain and shared across invocations for
//! connection reuse. It carries no per-invocation state.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_kinesis::Client;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::types::PutRecordsRequestEntry;

use crate::error::PublishError;
use crate::publisher::{PublishItem, PutError, PutOutcome, StreamClient};

/// [`StreamClient`] implementation over `PutRecords`.
pub struct KinesisStreamClient {
    client: Client,
}

impl KinesisStreamClient {
    /// Wrap an already-configured SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the environment's default AWS configuration
    /// (region, credentials, endpoint overrides).
    pub async fn from_env() -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Client::new(&aws_config))
    }
}

#[async_trait]
impl StreamClient for KinesisStreamClient {
    async fn put_records(
        &self,
        stream_name: &str,
        items: &[PublishItem],
    ) -> Result<Vec<PutOutcome>, PublishError> {
        let entries = items
            .iter()
            .map(|item| {
                PutRecordsRequestEntry::builder()
                    .data(Blob::new(item.payload.to_vec()))
                    .partition_key(item.partition_key.clone())
                    .build()
                    .map_err(|err| PublishError::Transport(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let response = self
            .client
            .put_records()
            .stream_name(stream_name)
            .set_records(Some(entries))
            .send()
            .await
            .map_err(|err| PublishError::Transport(err.to_string()))?;

        Ok(response
            .records()
            .iter()
            .map(|entry| PutOutcome {
                error: entry.error_code().map(|code| PutError {
                    code: code.to_string(),
                    message: entry.error_message().unwrap_or_default().to_string(),
                }),
            })
            .collect())
    }
}
