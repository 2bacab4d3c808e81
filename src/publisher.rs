//! Batch publishing to the partitioned stream.
//!
//! One invocation's records are submitted through [`publish`], which chunks
//! the batch to the service's per-request limits, applies the configured
//! deadline to every outbound call, and aggregates per-record outcomes into
//! one [`PublishResult`]. Partial failure is a normal outcome here, not an
//! error: the result identifies every rejected record so callers can alert,
//! retry, or dead-letter without re-sending the records that were accepted.
//!
//! There is no local retry loop. A transport failure fails the invocation and
//! leaves redelivery to the invocation framework, which keeps at-least-once
//! semantics in exactly one layer.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::timeout;

use crate::config::ForwarderConfig;
use crate::error::PublishError;
use crate::record::NormalizedRecord;

/// One record ready for the stream: NDJSON payload plus partition key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishItem {
    /// UTF-8 JSON encoding of the record, newline-terminated.
    pub payload: Bytes,
    /// Non-empty routing key for the stream shard.
    pub partition_key: String,
}

impl PublishItem {
    /// Serialize a normalized record into its NDJSON wire payload.
    pub fn from_record(
        record: &NormalizedRecord,
        partition_key: String,
    ) -> Result<Self, serde_json::Error> {
        let mut payload = serde_json::to_vec(record)?;
        payload.push(b'\n');
        Ok(Self {
            payload: Bytes::from(payload),
            partition_key,
        })
    }

    /// Bytes this item counts against the per-request byte limit.
    fn wire_size(&self) -> usize {
        self.payload.len() + self.partition_key.len()
    }
}

/// Identity of one record the service rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Position of the record within the invocation's full batch.
    pub index: usize,
    /// The record's partition key, for operator correlation.
    pub partition_key: String,
    /// Service error code, e.g. `ProvisionedThroughputExceededException`.
    pub code: String,
    /// Service error message, possibly empty.
    pub message: String,
}

/// Aggregate outcome of one invocation's publish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishResult {
    /// Records submitted to the service across all chunks.
    pub sent: usize,
    /// Records the service rejected.
    pub failed: usize,
    /// One entry per rejected record, batch-global indices.
    pub failures: Vec<ItemFailure>,
}

/// Per-record outcome as reported by the stream service, index-aligned with
/// the submitted records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOutcome {
    /// Populated when the service rejected this record.
    pub error: Option<PutError>,
}

impl PutOutcome {
    /// An accepted record.
    pub fn ok() -> Self {
        Self::default()
    }

    /// A rejected record with the service's code and message.
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: Some(PutError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// Service-side rejection detail for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutError {
    pub code: String,
    pub message: String,
}

/// Transport seam to the partitioned stream.
///
/// Implementations must be stateless with respect to invocations: the client
/// may be constructed once per process and shared, but must not retain
/// payloads or keys between calls. One call maps to one batch-put request.
#[async_trait]
pub trait StreamClient: Send + Sync {
    /// Submit one request's worth of records, returning an outcome per
    /// record in submission order.
    async fn put_records(
        &self,
        stream_name: &str,
        items: &[PublishItem],
    ) -> Result<Vec<PutOutcome>, PublishError>;
}

struct Chunk<'a> {
    /// Index of the chunk's first item within the full batch.
    start: usize,
    items: &'a [PublishItem],
}

/// Split a batch into service-sized requests, greedily by record count and
/// wire bytes.
fn chunk_batch<'a>(
    items: &'a [PublishItem],
    config: &ForwarderConfig,
) -> Result<Vec<Chunk<'a>>, PublishError> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut bytes = 0;

    for (index, item) in items.iter().enumerate() {
        let size = item.wire_size();
        if size > config.max_batch_bytes {
            return Err(PublishError::ItemTooLarge {
                index,
                size,
                limit: config.max_batch_bytes,
            });
        }
        let at_record_limit = index - start == config.max_batch_records;
        let over_byte_limit = bytes + size > config.max_batch_bytes;
        if index > start && (at_record_limit || over_byte_limit) {
            chunks.push(Chunk {
                start,
                items: &items[start..index],
            });
            start = index;
            bytes = 0;
        }
        bytes += size;
    }
    if start < items.len() {
        chunks.push(Chunk {
            start,
            items: &items[start..],
        });
    }
    Ok(chunks)
}

/// Publish one invocation's batch.
///
/// Empty input is a no-op that issues no network call and returns a zero
/// result. Otherwise every chunk is submitted under the configured deadline;
/// a timeout or transport failure on any chunk fails the whole invocation.
pub async fn publish(
    items: &[PublishItem],
    client: &dyn StreamClient,
    config: &ForwarderConfig,
) -> Result<PublishResult, PublishError> {
    if items.is_empty() {
        return Ok(PublishResult::default());
    }

    let mut result = PublishResult {
        sent: items.len(),
        ..PublishResult::default()
    };

    for chunk in chunk_batch(items, config)? {
        let outcomes = timeout(
            config.publish_timeout,
            client.put_records(&config.stream_name, chunk.items),
        )
        .await
        .map_err(|_| PublishError::Timeout(config.publish_timeout))??;

        if outcomes.len() != chunk.items.len() {
            return Err(PublishError::OutcomeMismatch {
                expected: chunk.items.len(),
                actual: outcomes.len(),
            });
        }

        for (offset, outcome) in outcomes.into_iter().enumerate() {
            if let Some(error) = outcome.error {
                result.failed += 1;
                result.failures.push(ItemFailure {
                    index: chunk.start + offset,
                    partition_key: chunk.items[offset].partition_key.clone(),
                    code: error.code,
                    message: error.message,
                });
            }
        }
    }

    Ok(result)
}
