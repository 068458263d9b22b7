use std::iter::FusedIterator;

use serde_json::Value;
use tracing::debug;

use super::{RecordView, ViewError, lookup, lookup_str};

/// Kinesis Data Firehose transformation event
///
/// See <https://docs.aws.amazon.com/lambda/latest/dg/services-kinesisfirehose.html>
#[derive(Debug, Clone, Copy)]
pub struct EventView<'a> {
    raw: &'a Value,
}

impl<'a> EventView<'a> {
    pub fn new(event: &'a Value) -> Self {
        Self { raw: event }
    }

    /// The value this view was constructed from
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    /// Look up a top level key without failing
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.raw.get(key)
    }

    /// A globally unique identifier for the invocation of the Lambda function
    pub fn invocation_id(&self) -> Result<&'a str, ViewError> {
        lookup_str(self.raw, &["invocationId"])
    }

    /// ARN of the Firehose delivery stream that sent the event
    pub fn delivery_stream_arn(&self) -> Result<&'a str, ViewError> {
        lookup_str(self.raw, &["deliveryStreamArn"])
    }

    /// AWS region where the event originated, eg: us-east-1
    pub fn region(&self) -> Result<&'a str, ViewError> {
        lookup_str(self.raw, &["region"])
    }

    /// Iterate the event records in delivery order. Each call returns a new
    /// iterator starting from the first record.
    pub fn records(&self) -> Result<Records<'a>, ViewError> {
        let records = lookup(self.raw, &["records"])?
            .as_array()
            .ok_or_else(|| ViewError::TypeConversion {
                field: "records".to_string(),
                expected: "array",
            })?;

        debug!(count = records.len(), "Iterating Firehose records");

        Ok(Records {
            inner: records.iter(),
        })
    }
}

/// Forward-only iterator of [`RecordView`]s, built by [`EventView::records`]
#[derive(Debug)]
pub struct Records<'a> {
    inner: std::slice::Iter<'a, Value>,
}

impl<'a> Iterator for Records<'a> {
    type Item = RecordView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(RecordView::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Records<'_> {}

impl FusedIterator for Records<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firehose::FIREHOSE_EVENT_FIXTURE;
    use serde_json::json;

    fn fixture() -> Value {
        serde_json::from_str(FIREHOSE_EVENT_FIXTURE).unwrap()
    }

    #[test]
    fn test_kinesis_firehose_event() {
        let raw = fixture();
        let event = EventView::new(&raw);

        assert_eq!(event.invocation_id().unwrap(), "invoked123");
        assert_eq!(event.delivery_stream_arn().unwrap(), "aws:lambda:events");
        assert_eq!(event.region().unwrap(), "us-west-2");

        let records: Vec<RecordView<'_>> = event.records().unwrap().collect();
        assert_eq!(records.len(), 2);
        let record = records[0];

        assert_eq!(record.data().unwrap(), raw["records"][0]["data"]);
        assert_eq!(record.record_id().unwrap(), "record1");
        assert_eq!(record.approximate_arrival_timestamp().unwrap(), 1510772160000.0);

        let metadata = record.kinesis_record_metadata();
        assert_eq!(
            metadata.raw()["kinesisRecordMetadata"],
            raw["records"][0]["kinesisRecordMetadata"]
        );
        assert_eq!(metadata.shard_id().unwrap(), "shardId-000000000000");
        assert_eq!(
            metadata.partition_key().unwrap(),
            "4d1ad2b9-24f8-4b9d-a088-76e9947c317a"
        );
        assert_eq!(
            metadata.approximate_arrival_timestamp().unwrap(),
            "2012-04-23T18:25:43.511Z"
        );
        assert_eq!(
            metadata.sequence_number().unwrap(),
            "49546986683135544286507457936321625675700192471156785154"
        );
        assert_eq!(metadata.subsequence_number().unwrap(), "");

        assert_eq!(record.data_as_bytes().unwrap(), b"Hello World");
        assert_eq!(record.data_as_text().unwrap(), "Hello World");

        assert_eq!(records[1].record_id().unwrap(), "record2");
        assert_eq!(records[1].data_as_json().unwrap(), json!({"Hello": "World"}));
    }

    #[test]
    fn test_kinesis_firehose_event_json_data() {
        let raw = json!({"records": [{"data": "eyJ0ZXN0IjogInZhbHVlIn0="}]});
        let event = EventView::new(&raw);

        let record = event.records().unwrap().next().unwrap();
        assert_eq!(record.data_as_json().unwrap(), json!({"test": "value"}));
    }

    #[test]
    fn test_records_preserve_order() {
        let raw = json!({"records": [
            {"recordId": "a"},
            {"recordId": "b"},
            {"recordId": "c"}
        ]});
        let event = EventView::new(&raw);

        let ids: Vec<&str> = event
            .records()
            .unwrap()
            .map(|r| r.record_id().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_records_iterator_is_single_pass() {
        let raw = fixture();
        let event = EventView::new(&raw);

        let mut records = event.records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.next().is_some());
        assert!(records.next().is_some());
        assert!(records.next().is_none());
        assert!(records.next().is_none());

        // a fresh call starts over
        assert_eq!(event.records().unwrap().count(), 2);
    }

    #[test]
    fn test_empty_records() {
        let raw = json!({"records": []});
        let event = EventView::new(&raw);
        assert_eq!(event.records().unwrap().count(), 0);
    }

    #[test]
    fn test_missing_fields_fail_on_access() {
        let raw = json!({});
        let event = EventView::new(&raw);

        assert!(matches!(event.invocation_id(), Err(ViewError::MissingField(f)) if f == "invocationId"));
        assert!(matches!(
            event.delivery_stream_arn(),
            Err(ViewError::MissingField(f)) if f == "deliveryStreamArn"
        ));
        assert!(matches!(event.region(), Err(ViewError::MissingField(f)) if f == "region"));
        assert!(matches!(event.records(), Err(ViewError::MissingField(f)) if f == "records"));
        assert!(event.get("region").is_none());
    }

    #[test]
    fn test_records_not_a_list() {
        let raw = json!({"records": {"data": "SGVsbG8gV29ybGQ="}});
        let event = EventView::new(&raw);

        match event.records() {
            Err(ViewError::TypeConversion { field, expected }) => {
                assert_eq!(field, "records");
                assert_eq!(expected, "array");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
