//! Lenient decoding of JSON columns
//!
//! Persisted blobs may be malformed or shaped by older clients. A blob
//! that does not decode is logged and replaced by the type's default; it
//! never fails a load.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;

/// Decode `raw`, substituting `T::default()` for a missing or bad blob
pub(crate) fn decode_or_default<T>(raw: Option<&str>, column: &str, owner: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return T::default();
    };

    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                column,
                owner,
                error = %e,
                "Malformed JSON column, using empty default"
            );
            T::default()
        }
    }
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
