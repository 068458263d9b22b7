use serde_json::Value;

use super::{ViewError, lookup_str};

const METADATA_KEY: &str = "kinesisRecordMetadata";

/// Where the metadata fields live relative to the wrapped value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Wrapped value holds a `kinesisRecordMetadata` key
    Record,
    /// Wrapped value is the metadata mapping itself
    Metadata,
}

/// Source Kinesis stream metadata of a Firehose record
#[derive(Debug, Clone, Copy)]
pub struct RecordMetadataView<'a> {
    raw: &'a Value,
    scope: Scope,
}

impl<'a> RecordMetadataView<'a> {
    /// Wrap a mapping that contains the `kinesisRecordMetadata` key, usually
    /// the whole record.
    pub fn new(record: &'a Value) -> Self {
        Self {
            raw: record,
            scope: Scope::Record,
        }
    }

    /// Wrap an already extracted `kinesisRecordMetadata` mapping.
    pub fn from_metadata(metadata: &'a Value) -> Self {
        Self {
            raw: metadata,
            scope: Scope::Metadata,
        }
    }

    /// The value this view was constructed from
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    /// Look up a metadata key without failing
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        match self.scope {
            Scope::Record => self.raw.get(METADATA_KEY)?.get(key),
            Scope::Metadata => self.raw.get(key),
        }
    }

    /// Identifies which shard in the stream the data record is assigned to
    pub fn shard_id(&self) -> Result<&'a str, ViewError> {
        self.field("shardId")
    }

    /// Partition key of the underlying Kinesis record
    pub fn partition_key(&self) -> Result<&'a str, ViewError> {
        self.field("partitionKey")
    }

    /// The approximate time that the record was inserted into the stream.
    /// Kept as the original timestamp string.
    pub fn approximate_arrival_timestamp(&self) -> Result<&'a str, ViewError> {
        self.field("approximateArrivalTimestamp")
    }

    /// The unique identifier of the record within its shard
    pub fn sequence_number(&self) -> Result<&'a str, ViewError> {
        self.field("sequenceNumber")
    }

    /// The unique identifier of the subrecord in an aggregated record, empty
    /// for records that were not aggregated
    pub fn subsequence_number(&self) -> Result<&'a str, ViewError> {
        self.field("subsequenceNumber")
    }

    fn field(&self, key: &str) -> Result<&'a str, ViewError> {
        match self.scope {
            Scope::Record => lookup_str(self.raw, &[METADATA_KEY, key]),
            Scope::Metadata => lookup_str(self.raw, &[key]),
        }
    }
}
