//! Change events as delivered by the invocation framework.

use serde::{Deserialize, Serialize};

use crate::value::Image;

/// Kind of change a [`ChangeEvent`] describes.
///
/// Only inserts are forwarded. Unknown kinds deserialize to
/// [`EventKind::Unknown`] so a new upstream kind skips cleanly instead of
/// failing the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Insert,
    Modify,
    Remove,
    #[serde(other)]
    Unknown,
}

/// One notification from the source change log.
///
/// Read-only to the forwarder; discarded after processing. `new_image` is
/// present only for inserts and modifies; its absence means there is nothing
/// to forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub event_kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<Image>,
}

/// Result of one invocation, returned to the invoking framework.
///
/// `records_processed` counts items submitted to the stream (including ones
/// the service later rejected); `failed` counts the rejections. Partial
/// failure still returns `Ok` at the framework level so the framework does
/// not redeliver and duplicate the records that were accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationSummary {
    pub records_processed: usize,
    pub failed: usize,
}
