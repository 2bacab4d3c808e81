//! Change-event forwarder.
//!
//! Consumes change-capture events from a source database's change log,
//! decodes each event's type-tagged new image into plain JSON, derives a
//! partition key, and publishes the batch to a partitioned stream with
//! per-record failure reporting.
//!
//! ## Pipeline
//!
//! [`Forwarder::handle`] drives one invocation:
//!
//! 1. filter — keep inserts that carry a new image,
//! 2. [`normalize`] — decode every tagged field ([`decode`]) into a
//!    [`NormalizedRecord`],
//! 3. [`resolve_key`] — derive the partition key from the configured field,
//!    falling back to `"unknown"`,
//! 4. [`publish`] — frame records as NDJSON, chunk to the service limits,
//!    submit under a deadline, and aggregate per-record outcomes.
//!
//! Nothing is retained across invocations; the only shared resource is the
//! [`StreamClient`], constructed once per process.
//!
//! ## Delivery semantics
//!
//! At-least-once. A transport failure fails the whole invocation so the
//! invoking framework redelivers it; a partial batch failure succeeds at the
//! framework level (redelivery would duplicate the accepted records) and is
//! surfaced through the summary, the logs, and
//! [`PublishResult::failures`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cdc_forwarder::{ChangeEvent, Forwarder, ForwarderConfig};
//! # async fn run(client: Arc<dyn cdc_forwarder::StreamClient>) -> Result<(), Box<dyn std::error::Error>> {
//! let forwarder = Forwarder::new(ForwarderConfig::from_env()?, client)?;
//! let events: Vec<ChangeEvent> = serde_json::from_str(r#"[
//!     {"eventKind": "INSERT", "newImage": {"city": {"S": "Austin"}, "temp_c": {"N": "21.5"}}}
//! ]"#)?;
//! let summary = forwarder.handle(&events).await?;
//! assert_eq!(summary.records_processed, 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod forwarder;
pub mod partition;
pub mod publisher;
pub mod record;
pub mod value;

#[cfg(feature = "aws")]
pub mod kinesis;

pub use crate::config::{ConfigError, ForwarderConfig};
pub use crate::error::{DecodeError, ForwardError, PublishError};
pub use crate::event::{ChangeEvent, EventKind, InvocationSummary};
pub use crate::forwarder::Forwarder;
pub use crate::partition::{FALLBACK_PARTITION_KEY, resolve_key};
pub use crate::publisher::{
    ItemFailure, PublishItem, PublishResult, PutError, PutOutcome, StreamClient, publish,
};
pub use crate::record::{NormalizedRecord, normalize};
pub use crate::value::{Image, TaggedValue, decode};

#[cfg(feature = "aws")]
pub use crate::kinesis::KinesisStreamClient;
