//! Record normalization: a change event's new image, fully decoded.

use serde_json::Map;

use crate::error::DecodeError;
use crate::value::{Image, decode};

/// A plain mapping from field name to decoded value.
///
/// Owned by the current invocation and never retained across invocations.
pub type NormalizedRecord = Map<String, serde_json::Value>;

/// Decode every field of a new image into a [`NormalizedRecord`].
///
/// The output's field-name set equals the input's exactly: no fields are
/// added, dropped, or renamed. Field semantics (types, ranges) are not
/// validated here; the forwarder stays schema-agnostic so new upstream
/// fields flow through untouched.
pub fn normalize(image: &Image) -> Result<NormalizedRecord, DecodeError> {
    let mut record = Map::with_capacity(image.len());
    for (field, tagged) in image {
        record.insert(field.clone(), decode(tagged)?);
    }
    Ok(record)
}
