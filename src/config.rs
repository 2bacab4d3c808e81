//! Runtime configuration for the forwarder.
//!
//! Configuration is environment-style: every knob has an operational default
//! and an optional `FORWARDER_*` environment override. [`ForwarderConfig`] is
//! cheap to clone and is validated once at process start-up, never per
//! invocation.
//!
//! | Variable                       | Default          |
//! |--------------------------------|------------------|
//! | `FORWARDER_STREAM_NAME`        | `cdc-events-dev` |
//! | `FORWARDER_PARTITION_KEY`      | `city`           |
//! | `FORWARDER_PUBLISH_TIMEOUT_MS` | `10000`          |
//! | `FORWARDER_MAX_BATCH_RECORDS`  | `500`            |
//! | `FORWARDER_MAX_BATCH_BYTES`    | `5242880`        |

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default target stream name.
pub const DEFAULT_STREAM_NAME: &str = "cdc-events-dev";

/// Default record field consulted for the partition key.
pub const DEFAULT_PARTITION_KEY_FIELD: &str = "city";

/// Kinesis `PutRecords` accepts at most 500 records per request.
pub const MAX_RECORDS_PER_REQUEST: usize = 500;

/// Kinesis `PutRecords` accepts at most 5 MiB per request, data plus keys.
pub const MAX_BYTES_PER_REQUEST: usize = 5 * 1024 * 1024;

/// Runtime configuration for one forwarder process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwarderConfig {
    /// Name of the target partitioned stream.
    pub stream_name: String,

    /// Record field whose value becomes the partition key. Records missing
    /// the field partition under the `"unknown"` fallback.
    pub partition_key_field: String,

    /// Deadline applied to each outbound publish call. On expiry the call is
    /// treated as a transport failure, never left pending.
    pub publish_timeout: Duration,

    /// Upper bound on records per publish request. Batches beyond this are
    /// chunked. Must not exceed the service limit of 500.
    pub max_batch_records: usize,

    /// Upper bound on bytes (payloads plus partition keys) per publish
    /// request. Must not exceed the service limit of 5 MiB.
    pub max_batch_bytes: usize,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            stream_name: DEFAULT_STREAM_NAME.into(),
            partition_key_field: DEFAULT_PARTITION_KEY_FIELD.into(),
            publish_timeout: Duration::from_secs(10),
            max_batch_records: MAX_RECORDS_PER_REQUEST,
            max_batch_bytes: MAX_BYTES_PER_REQUEST,
        }
    }
}

impl ForwarderConfig {
    /// Build a configuration from `FORWARDER_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// source, so tests never touch process-global state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            stream_name: lookup("FORWARDER_STREAM_NAME").unwrap_or(defaults.stream_name),
            partition_key_field: lookup("FORWARDER_PARTITION_KEY")
                .unwrap_or(defaults.partition_key_field),
            publish_timeout: match lookup("FORWARDER_PUBLISH_TIMEOUT_MS") {
                Some(raw) => Duration::from_millis(parse_var("FORWARDER_PUBLISH_TIMEOUT_MS", &raw)?),
                None => defaults.publish_timeout,
            },
            max_batch_records: match lookup("FORWARDER_MAX_BATCH_RECORDS") {
                Some(raw) => parse_var("FORWARDER_MAX_BATCH_RECORDS", &raw)?,
                None => defaults.max_batch_records,
            },
            max_batch_bytes: match lookup("FORWARDER_MAX_BATCH_BYTES") {
                Some(raw) => parse_var("FORWARDER_MAX_BATCH_BYTES", &raw)?,
                None => defaults.max_batch_bytes,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency. Inexpensive; intended for process
    /// start-up so misconfiguration surfaces before live traffic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream_name.is_empty() {
            return Err(ConfigError::EmptyField("stream_name"));
        }
        if self.partition_key_field.is_empty() {
            return Err(ConfigError::EmptyField("partition_key_field"));
        }
        if self.publish_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_batch_records == 0 || self.max_batch_records > MAX_RECORDS_PER_REQUEST {
            return Err(ConfigError::BatchRecordsOutOfRange {
                configured: self.max_batch_records,
                limit: MAX_RECORDS_PER_REQUEST,
            });
        }
        if self.max_batch_bytes == 0 || self.max_batch_bytes > MAX_BYTES_PER_REQUEST {
            return Err(ConfigError::BatchBytesOutOfRange {
                configured: self.max_batch_bytes,
                limit: MAX_BYTES_PER_REQUEST,
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidInteger {
        name,
        value: raw.to_owned(),
    })
}

/// Configuration-time errors, surfaced at service start-up rather than at
/// invocation time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required string option is empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A numeric environment override did not parse.
    #[error("{name} is not a valid integer: {value:?}")]
    InvalidInteger { name: &'static str, value: String },

    /// The publish deadline must be positive.
    #[error("publish timeout must be greater than zero")]
    ZeroTimeout,

    /// Records-per-request bound outside `1..=500`.
    #[error("max_batch_records must be between 1 and {limit}, got {configured}")]
    BatchRecordsOutOfRange { configured: usize, limit: usize },

    /// Bytes-per-request bound outside `1..=5 MiB`.
    #[error("max_batch_bytes must be between 1 and {limit}, got {configured}")]
    BatchBytesOutOfRange { configured: usize, limit: usize },
}
