//! Kinesis Data Firehose event views
//!
//! Read-only accessors over a parsed Firehose transformation event. The views
//! borrow the `serde_json::Value` tree they were built from and resolve each
//! field on access, so a missing or mistyped field only fails the accessor
//! that asked for it.
//!

mod event;
mod metadata;
mod record;

pub use event::{EventView, Records};
pub use metadata::RecordMetadataView;
pub use record::RecordView;

use serde_json::Value;

/// Errors returned by view accessors and the data decode chain
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid value for field {field}: expected {expected}")]
    TypeConversion {
        field: String,
        expected: &'static str,
    },

    #[error("Failed to decode base64 data: {0}")]
    DecodeError(String),

    #[error("Invalid UTF-8 in data: {0}")]
    EncodingError(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(String),
}

/// Walk `path` from `root`, one object key per step.
pub(crate) fn lookup<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value, ViewError> {
    let mut current = root;
    for (depth, key) in path.iter().enumerate() {
        let map = current.as_object().ok_or_else(|| ViewError::TypeConversion {
            field: field_path(&path[..depth]),
            expected: "object",
        })?;
        current = map
            .get(*key)
            .ok_or_else(|| ViewError::MissingField(field_path(&path[..=depth])))?;
    }
    Ok(current)
}

pub(crate) fn lookup_str<'a>(root: &'a Value, path: &[&str]) -> Result<&'a str, ViewError> {
    lookup(root, path)?
        .as_str()
        .ok_or_else(|| ViewError::TypeConversion {
            field: field_path(path),
            expected: "string",
        })
}

fn field_path(path: &[&str]) -> String {
    if path.is_empty() {
        // the wrapped value itself
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

#[cfg(test)]
pub(crate) const FIREHOSE_EVENT_FIXTURE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/kinesis_firehose_event.json"
));
