use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::{Engine, alphabet};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use super::{RecordMetadataView, ViewError, lookup, lookup_str};

const ARRIVAL_TIMESTAMP_KEY: &str = "approximateArrivalTimestamp";

// Padded standard alphabet; non-zero bits in the final symbol are ignored
const DATA_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PAD.with_decode_allow_trailing_bits(true));

/// One entry of the Firehose event `records` list
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    raw: &'a Value,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a Value) -> Self {
        Self { raw: record }
    }

    /// The value this view was constructed from
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    /// Look up a record key without failing
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.raw.get(key)
    }

    /// The base64 encoded data blob
    pub fn data(&self) -> Result<&'a str, ViewError> {
        lookup_str(self.raw, &["data"])
    }

    /// A globally unique identifier for the record within the invocation
    pub fn record_id(&self) -> Result<&'a str, ViewError> {
        lookup_str(self.raw, &["recordId"])
    }

    /// The approximate time the record was inserted into the stream, in epoch
    /// milliseconds. Accepts a JSON number or a numeric string.
    pub fn approximate_arrival_timestamp(&self) -> Result<f64, ViewError> {
        let value = lookup(self.raw, &[ARRIVAL_TIMESTAMP_KEY])?;
        let timestamp = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        timestamp.ok_or_else(|| ViewError::TypeConversion {
            field: ARRIVAL_TIMESTAMP_KEY.to_string(),
            expected: "number",
        })
    }

    /// Metadata of the underlying Kinesis record. The returned view wraps the
    /// whole record, not only the metadata mapping.
    pub fn kinesis_record_metadata(&self) -> RecordMetadataView<'a> {
        RecordMetadataView::new(self.raw)
    }

    /// Decode the data blob as bytes. Padding is required; invalid symbols
    /// and lengths fail with [`ViewError::DecodeError`].
    pub fn data_as_bytes(&self) -> Result<Vec<u8>, ViewError> {
        let encoded = self.data()?;
        let bytes = DATA_ENGINE
            .decode(encoded.as_bytes())
            .map_err(|e| ViewError::DecodeError(e.to_string()))?;

        trace!(
            encoded_size = encoded.len(),
            decoded_size = bytes.len(),
            "Decoded record data"
        );

        Ok(bytes)
    }

    /// Decode the data blob as UTF-8 text
    pub fn data_as_text(&self) -> Result<String, ViewError> {
        String::from_utf8(self.data_as_bytes()?)
            .map_err(|e| ViewError::EncodingError(e.utf8_error().to_string()))
    }

    /// Decode the data blob as a JSON value
    pub fn data_as_json(&self) -> Result<Value, ViewError> {
        self.data_as()
    }

    /// Decode the data blob as JSON straight into `T`
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ViewError> {
        let text = self.data_as_text()?;
        serde_json::from_str(&text).map_err(|e| ViewError::JsonParseError(e.to_string()))
    }
}
