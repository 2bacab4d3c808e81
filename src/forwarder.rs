//! The invocation controller.
//!
//! [`Forwarder`] is the explicit per-process context: configuration plus the
//! shared stream client, constructed once at start-up and passed into each
//! invocation. It holds no per-invocation state, so the invocation framework
//! may run invocations concurrently against one `Forwarder` without locking.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{ConfigError, ForwarderConfig};
use crate::error::ForwardError;
use crate::event::{ChangeEvent, EventKind, InvocationSummary};
use crate::partition::resolve_key;
use crate::publisher::{PublishItem, StreamClient, publish};
use crate::record::normalize;

/// Process-wide forwarding context.
pub struct Forwarder {
    config: ForwarderConfig,
    client: Arc<dyn StreamClient>,
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Forwarder {
    /// Build a forwarder, validating the configuration up front.
    pub fn new(
        config: ForwarderConfig,
        client: Arc<dyn StreamClient>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, client })
    }

    /// The active configuration.
    pub fn config(&self) -> &ForwarderConfig {
        &self.config
    }

    /// Handle one invocation's batch of change events.
    ///
    /// Skips every event that is not an insert or that lacks a new image;
    /// normalizes, keys, and frames the rest; publishes them as one batch;
    /// and returns the invocation summary. Emits one `forward_complete` log
    /// event per non-empty publish plus one `record_publish_failed` warning
    /// per rejected record. An empty surviving batch returns a zero summary
    /// with no network call and no summary log.
    pub async fn handle(
        &self,
        events: &[ChangeEvent],
    ) -> Result<InvocationSummary, ForwardError> {
        let mut items = Vec::new();
        for event in events {
            if event.event_kind != EventKind::Insert {
                continue;
            }
            let Some(image) = &event.new_image else {
                continue;
            };
            let record = normalize(image)?;
            let partition_key = resolve_key(&record, &self.config.partition_key_field);
            items.push(PublishItem::from_record(&record, partition_key)?);
        }

        if items.is_empty() {
            return Ok(InvocationSummary::default());
        }

        let result = publish(&items, self.client.as_ref(), &self.config).await?;

        for failure in &result.failures {
            warn!(
                index = failure.index,
                partition_key = %failure.partition_key,
                code = %failure.code,
                message = %failure.message,
                "record_publish_failed"
            );
        }
        info!(
            stream = %self.config.stream_name,
            sent = result.sent,
            failed = result.failed,
            "forward_complete"
        );

        Ok(InvocationSummary {
            records_processed: result.sent,
            failed: result.failed,
        })
    }
}
