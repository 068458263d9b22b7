use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::firehose::{EventView, ViewError};

/// FirehosePayload owns a deserialized Firehose event. It can be used as the
/// payload type of a Lambda handler, and borrowed as an [`EventView`] for
/// field access. Deserialization accepts any JSON value; fields are only
/// checked when read through the view.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FirehosePayload {
    raw: Value,
}

impl FirehosePayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ViewError> {
        serde_json::from_slice(bytes).map_err(|e| ViewError::JsonParseError(e.to_string()))
    }

    pub fn view(&self) -> EventView<'_> {
        EventView::new(&self.raw)
    }

    pub fn into_inner(self) -> Value {
        self.raw
    }
}

impl FromStr for FirehosePayload {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|e| ViewError::JsonParseError(e.to_string()))
    }
}

impl From<Value> for FirehosePayload {
    fn from(raw: Value) -> Self {
        Self { raw }
    }
}
