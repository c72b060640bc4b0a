//! Binary payloads travel as base64 text inside JSON, both inbound and
//! outbound. Internally they are plain bytes.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

use crate::{Error, Result};

/// Decode an optional base64 field.
///
/// `None` and blank strings mean "no file". A leading data-URL header
/// (`data:image/png;base64,`) is stripped before decoding.
pub fn decode(field: &'static str, text: Option<&str>) -> Result<Option<Vec<u8>>> {
  let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
    return Ok(None);
  };

  let payload = match text.strip_prefix("data:") {
    Some(rest) => rest.split_once(',').map(|(_, p)| p).unwrap_or(rest),
    None => text,
  };

  B64
    .decode(payload)
    .map(Some)
    .map_err(|source| Error::InvalidBase64 { field, source })
}

pub fn encode(bytes: &[u8]) -> String { B64.encode(bytes) }

/// `serialize_with` helper for `Option<Vec<u8>>` fields.
pub fn serialize_opt<S>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  match bytes {
    Some(b) => s.serialize_some(&encode(b)),
    None => s.serialize_none(),
  }
}

/// Accept any JSON value for a file field; only non-blank strings survive.
///
/// Clients send `null`, `""`, `{}` or `false` for "no file"; none of those
/// should reject the whole request.
pub fn lenient_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<serde_json::Value>::deserialize(d)?;
  Ok(match value {
    Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
    _ => None,
  })
}

/// Dates arrive as `YYYY-MM-DD`; an empty string means "not supplied".
pub fn lenient_date<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<String>::deserialize(d)?;
  match value.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map(Some)
      .map_err(serde::de::Error::custom),
  }
}
