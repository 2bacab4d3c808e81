//! Tagged attribute values and their decoding into plain JSON.
//!
//! A change log emits each field wrapped in an explicit type tag, e.g.
//! `{"S": "Austin"}` or `{"N": "21.5"}`. [`TaggedValue`] models that wire
//! format as a closed discriminated union so an unknown tag is rejected at
//! deserialization time with compile-time exhaustiveness over the known ones,
//! instead of being looked up in a dictionary at runtime.
//!
//! [`decode`] converts one tagged value into its plain [`serde_json::Value`]
//! equivalent, recursively. The conversion is deterministic:
//!
//! - `N`/`NS` keep their exact decimal text (no float rounding),
//! - `B`/`BS` render as standard base64 with padding, the same encoding the
//!   change log's own JSON form uses,
//! - sets (`SS`/`NS`/`BS`) are semantically unordered, so they are emitted
//!   sorted by wire representation to keep output reproducible.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::DecodeError;

/// A field map as carried by a change event's new image.
pub type Image = BTreeMap<String, TaggedValue>;

/// One type-tagged attribute value from the change log's wire format.
///
/// Serde's externally-tagged enum representation matches the wire shape
/// exactly: a single-key object whose key is the type tag. Exactly one
/// variant is populated per instance by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaggedValue {
    /// String.
    #[serde(rename = "S")]
    Str(String),
    /// Number, carried as decimal text to preserve precision.
    #[serde(rename = "N")]
    Num(String),
    /// Binary, base64 on the wire.
    #[serde(rename = "B", with = "b64")]
    Bin(Vec<u8>),
    /// Boolean.
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// Null. The wire carries `{"NULL": true}`; the payload bool is ignored.
    #[serde(rename = "NULL")]
    Null(bool),
    /// Ordered list of tagged values.
    #[serde(rename = "L")]
    List(Vec<TaggedValue>),
    /// Nested map of field name to tagged value.
    #[serde(rename = "M")]
    Map(BTreeMap<String, TaggedValue>),
    /// Set of strings.
    #[serde(rename = "SS")]
    StrSet(Vec<String>),
    /// Set of numbers, each carried as decimal text.
    #[serde(rename = "NS")]
    NumSet(Vec<String>),
    /// Set of binary values, base64 on the wire.
    #[serde(rename = "BS", with = "b64_seq")]
    BinSet(Vec<Vec<u8>>),
}

/// Decode one tagged value into its plain JSON equivalent.
///
/// Total over well-formed values; the only error is numeric text that does
/// not parse as a decimal number, which is a schema mismatch fatal to the
/// invocation (see [`DecodeError`]).
pub fn decode(value: &TaggedValue) -> Result<Value, DecodeError> {
    match value {
        TaggedValue::Str(s) => Ok(Value::String(s.clone())),
        TaggedValue::Num(n) => decode_number(n),
        TaggedValue::Bin(bytes) => Ok(Value::String(BASE64.encode(bytes))),
        TaggedValue::Bool(b) => Ok(Value::Bool(*b)),
        TaggedValue::Null(_) => Ok(Value::Null),
        TaggedValue::List(items) => Ok(Value::Array(
            items.iter().map(decode).collect::<Result<_, _>>()?,
        )),
        TaggedValue::Map(entries) => {
            let mut out = Map::new();
            for (field, tagged) in entries {
                out.insert(field.clone(), decode(tagged)?);
            }
            Ok(Value::Object(out))
        }
        TaggedValue::StrSet(items) => {
            let mut sorted = items.clone();
            sorted.sort_unstable();
            Ok(Value::Array(sorted.into_iter().map(Value::String).collect()))
        }
        TaggedValue::NumSet(items) => {
            let mut sorted = items.clone();
            sorted.sort_unstable();
            Ok(Value::Array(
                sorted
                    .iter()
                    .map(|n| decode_number(n))
                    .collect::<Result<_, _>>()?,
            ))
        }
        TaggedValue::BinSet(items) => {
            let mut sorted = items.clone();
            sorted.sort_unstable();
            Ok(Value::Array(
                sorted
                    .into_iter()
                    .map(|bytes| Value::String(BASE64.encode(bytes)))
                    .collect(),
            ))
        }
    }
}

fn decode_number(text: &str) -> Result<Value, DecodeError> {
    text.parse::<Number>()
        .map(Value::Number)
        .map_err(|_| DecodeError::InvalidNumber(text.to_owned()))
}

/// Base64 transparency for the `B` variant: the wire carries base64 text,
/// the Rust type carries raw bytes.
mod b64 {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::BASE64;
    use base64::Engine as _;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        BASE64.decode(&text).map_err(serde::de::Error::custom)
    }
}

/// Same as [`b64`] for the `BS` variant's element sequence.
mod b64_seq {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde::ser::SerializeSeq;

    use super::BASE64;
    use base64::Engine as _;

    pub fn serialize<S: Serializer>(
        items: &[Vec<u8>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for bytes in items {
            seq.serialize_element(&BASE64.encode(bytes))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts
            .into_iter()
            .map(|text| BASE64.decode(&text).map_err(serde::de::Error::custom))
            .collect()
    }
}
