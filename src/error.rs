//! Error types produced by the forwarder.
//!
//! All errors are typed so callers can tell a structural schema mismatch
//! (not retryable) apart from a transport failure (retryable by redelivering
//! the whole invocation). Partial batch failure is *not* an error; it is a
//! normal outcome carried in [`PublishResult`](crate::PublishResult).

use std::time::Duration;

use thiserror::Error;

/// Errors raised while decoding tagged attribute values.
///
/// Decoding is total over well-formed values: every legal tag maps to exactly
/// one plain value. The only failure mode is numeric text that is not a valid
/// decimal number, which indicates a structural mismatch with the upstream
/// change-log schema and is fatal to the invocation rather than retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// An `N` or `NS` attribute carried text that does not parse as a
    /// decimal number.
    #[error("numeric attribute is not valid decimal text: {0:?}")]
    InvalidNumber(String),
}

/// Errors raised by the batch publisher or its stream client.
///
/// These are whole-invocation failures: the invocation framework's own
/// redelivery is the retry layer, so the publisher performs no local retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublishError {
    /// The stream call did not complete within the configured deadline.
    #[error("publish timed out after {0:?}")]
    Timeout(Duration),

    /// A single record exceeds the per-request byte limit and can never be
    /// shipped, regardless of how the batch is chunked.
    #[error("record at index {index} is {size} bytes, exceeding the {limit}-byte batch limit")]
    ItemTooLarge {
        index: usize,
        size: usize,
        limit: usize,
    },

    /// The service answered with a different number of per-record outcomes
    /// than records submitted. Failure identity cannot be trusted, so the
    /// whole invocation fails instead of misreporting.
    #[error("stream service returned {actual} outcomes for {expected} records")]
    OutcomeMismatch { expected: usize, actual: usize },

    /// Network failure or whole-batch rejection by the stream service.
    #[error("stream transport failure: {0}")]
    Transport(String),
}

/// Top-level error for one invocation of the controller.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ForwardError {
    /// A change event's new image could not be decoded into plain values.
    #[error("change event decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// A normalized record could not be serialized to its NDJSON payload.
    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The batch publish failed as a whole.
    #[error("batch publish failed: {0}")]
    Publish(#[from] PublishError),
}
