//! Proposed modifications and their shape validation.
//!
//! A washing machine hands its proposal back as a loose JSON value, the
//! same way the continuation-based contract delivers it. The engine runs
//! every proposal through [`Modification::from_value`] before merging:
//! anything that is not a key-value mapping is rejected, unrecognized
//! keys are ignored, and the two recognized keys are read if present.

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// The canonical key for a proposed status change.
pub const STATUS_KEY: &str = "status";

/// The canonical key for a proposed url change.
pub const URL_KEY: &str = "url";

/// A machine's proposed partial update to the run state.
///
/// Both fields are optional; an absent field means "no change". An empty
/// modification is valid and leaves the run state untouched.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use laundromat_core::Modification;
///
/// let modification = Modification::default()
///     .with_status(StatusCode::TEMPORARY_REDIRECT)
///     .with_url("http://so.me/new/url");
///
/// assert!(!modification.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modification {
    /// Proposed status code, if any.
    pub status: Option<StatusCode>,

    /// Proposed url, if any.
    pub url: Option<String>,
}

impl Modification {
    /// Sets the proposed status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the proposed url.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns `true` when the modification proposes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.url.is_none()
    }

    /// Validates a machine's raw proposal and reads the recognized keys.
    ///
    /// Accepted shapes are `null` (no change) and a key-value mapping.
    /// Unrecognized keys are ignored; a recognized key bound to `null`
    /// counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ModificationError`] when the value is a primitive or a
    /// sequence, when the status key is not a valid HTTP status code, or
    /// when the url key is not a string.
    pub fn from_value(value: &Value) -> Result<Self, ModificationError> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(ModificationError::NotAMapping {
                    kind: json_kind(other),
                })
            }
        };

        let mut modification = Self::default();

        if let Some(raw) = map.get(STATUS_KEY) {
            if !raw.is_null() {
                let status = raw
                    .as_u64()
                    .and_then(|code| u16::try_from(code).ok())
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .ok_or_else(|| ModificationError::Status { value: raw.clone() })?;
                modification.status = Some(status);
            }
        }

        if let Some(raw) = map.get(URL_KEY) {
            if !raw.is_null() {
                let url = raw
                    .as_str()
                    .ok_or_else(|| ModificationError::Url { value: raw.clone() })?;
                modification.url = Some(url.to_string());
            }
        }

        Ok(modification)
    }

    /// Converts the modification into the raw proposal shape machines
    /// return through [`MachineOutcome`](crate::MachineOutcome).
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(status) = self.status {
            map.insert(STATUS_KEY.to_string(), Value::from(status.as_u16()));
        }
        if let Some(url) = self.url {
            map.insert(URL_KEY.to_string(), Value::String(url));
        }
        Value::Object(map)
    }
}

/// A proposal that failed shape validation.
#[derive(Debug, Error)]
pub enum ModificationError {
    /// The proposal is not a key-value mapping.
    #[error("modification must be a key-value mapping, got a {kind}")]
    NotAMapping {
        /// The JSON kind the machine returned instead.
        kind: &'static str,
    },

    /// The status key does not hold a valid HTTP status code.
    #[error("modification status must be a valid HTTP status code, got {value}")]
    Status {
        /// The offending value.
        value: Value,
    },

    /// The url key does not hold a string.
    #[error("modification url must be a string, got {value}")]
    Url {
        /// The offending value.
        value: Value,
    },
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_means_no_change() {
        let modification = Modification::from_value(&Value::Null).unwrap();
        assert!(modification.is_empty());
    }

    #[test]
    fn empty_mapping_means_no_change() {
        let modification = Modification::from_value(&json!({})).unwrap();
        assert!(modification.is_empty());
    }

    #[test]
    fn reads_recognized_keys() {
        let modification =
            Modification::from_value(&json!({ "status": 307, "url": "http://so.me/new/url" }))
                .unwrap();
        assert_eq!(modification.status, Some(StatusCode::TEMPORARY_REDIRECT));
        assert_eq!(modification.url.as_deref(), Some("http://so.me/new/url"));
    }

    #[test]
    fn ignores_unrecognized_keys() {
        let modification =
            Modification::from_value(&json!({ "detergent": "extra", "url": "/rinse" })).unwrap();
        assert_eq!(modification.status, None);
        assert_eq!(modification.url.as_deref(), Some("/rinse"));
    }

    #[test]
    fn null_keys_count_as_absent() {
        let modification =
            Modification::from_value(&json!({ "status": null, "url": null })).unwrap();
        assert!(modification.is_empty());
    }

    #[test]
    fn rejects_primitives_and_sequences() {
        assert!(matches!(
            Modification::from_value(&json!("http://so.me/new/url")),
            Err(ModificationError::NotAMapping { kind: "string" })
        ));
        assert!(matches!(
            Modification::from_value(&json!(307)),
            Err(ModificationError::NotAMapping { kind: "number" })
        ));
        assert!(matches!(
            Modification::from_value(&json!([{ "url": "/rinse" }])),
            Err(ModificationError::NotAMapping { kind: "sequence" })
        ));
        assert!(matches!(
            Modification::from_value(&json!(true)),
            Err(ModificationError::NotAMapping { kind: "boolean" })
        ));
    }

    #[test]
    fn rejects_bad_status_values() {
        assert!(matches!(
            Modification::from_value(&json!({ "status": "temporary" })),
            Err(ModificationError::Status { .. })
        ));
        // Out of the valid HTTP range.
        assert!(matches!(
            Modification::from_value(&json!({ "status": 99 })),
            Err(ModificationError::Status { .. })
        ));
        assert!(matches!(
            Modification::from_value(&json!({ "status": 70000 })),
            Err(ModificationError::Status { .. })
        ));
    }

    #[test]
    fn rejects_non_string_urls() {
        assert!(matches!(
            Modification::from_value(&json!({ "url": 42 })),
            Err(ModificationError::Url { .. })
        ));
    }

    #[test]
    fn into_value_produces_canonical_keys() {
        let value = Modification::default()
            .with_status(StatusCode::SEE_OTHER)
            .with_url("/spin")
            .into_value();
        assert_eq!(value, json!({ "status": 303, "url": "/spin" }));

        let parsed = Modification::from_value(&value).unwrap();
        assert_eq!(parsed.status, Some(StatusCode::SEE_OTHER));
        assert_eq!(parsed.url.as_deref(), Some("/spin"));
    }
}
