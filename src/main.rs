use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use firehose_event_views::events::FirehosePayload;
use firehose_event_views::firehose::{RecordView, ViewError};
use firehose_event_views::init::{self, BoxError, logging::LogFormat};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DecodeMode {
    Bytes,
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "firehose-inspect")]
#[command(bin_name = "firehose-inspect")]
struct Arguments {
    // This is ignored in these options, but we keep it here to avoid an error on unknown
    // options
    #[arg(long)]
    env_file: Option<String>,

    #[arg(env = "FIREHOSE_PAYLOAD_FILE")]
    /// Firehose event JSON file
    payload_file: String,

    #[arg(long, value_enum, env = "FIREHOSE_DECODE", default_value_t = DecodeMode::Text)]
    /// How to decode each record's data blob
    decode: DecodeMode,

    #[arg(long, value_enum, env = "FIREHOSE_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    /// Log output format
    log_format: LogFormat,
}

// Minimal option to allow us to parse out the env from a file
#[derive(Debug, Parser)]
#[clap(ignore_errors = true)]
struct EnvFileArguments {
    #[arg(long, env = "FIREHOSE_ENV_FILE")]
    env_file: Option<String>,
}

fn main() -> ExitCode {
    let start_time = Instant::now();

    let env_opt = EnvFileArguments::parse();
    if let Some(env_file) = env_opt.env_file
        && let Err(e) = init::env::load_file(&env_file)
    {
        eprintln!("Can not load envfile: {}", e);
        return ExitCode::FAILURE;
    }

    let opt = Arguments::parse();

    let _guard = match init::logging::setup(opt.log_format) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ERROR: failed to setup logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match inspect(&opt.payload_file, opt.decode) {
        Ok(failed) => {
            info!(
                failed_records = failed,
                "Inspection finished in {}ms",
                start_time.elapsed().as_millis()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(payload_file = %opt.payload_file, error = %e, "Failed to inspect event");
            ExitCode::FAILURE
        }
    }
}

/// Log the event and every record in it. Returns the number of records that
/// could not be read.
fn inspect(payload_file: &str, mode: DecodeMode) -> Result<usize, BoxError> {
    let body = std::fs::read(payload_file)
        .map_err(|e| format!("failed to read payload file {}: {}", payload_file, e))?;
    let payload = FirehosePayload::from_slice(&body)?;
    let event = payload.view();

    let invocation_id = event.invocation_id()?;
    let delivery_stream_arn = event.delivery_stream_arn()?;
    let region = event.region()?;
    let records = event.records()?;
    info!(
        invocation_id = %invocation_id,
        delivery_stream_arn = %delivery_stream_arn,
        region = %region,
        count = records.len(),
        "Loaded Firehose event"
    );

    let mut failed = 0;
    for (idx, record) in records.enumerate() {
        if let Err(e) = inspect_record(invocation_id, idx, record, mode) {
            warn!(
                invocation_id = %invocation_id,
                record_index = idx,
                record_id = ?record.get("recordId"),
                error = %e,
                "Skipping unreadable record"
            );
            failed += 1;
        }
    }

    Ok(failed)
}

fn inspect_record(
    invocation_id: &str,
    idx: usize,
    record: RecordView<'_>,
    mode: DecodeMode,
) -> Result<(), ViewError> {
    let record_id = record.record_id()?;
    let arrival_timestamp = record.approximate_arrival_timestamp()?;
    let metadata = record.kinesis_record_metadata();
    let shard_id = metadata.shard_id()?;
    let partition_key = metadata.partition_key()?;
    let kinesis_arrival_timestamp = metadata.approximate_arrival_timestamp()?;
    let sequence_number = metadata.sequence_number()?;
    let subsequence_number = metadata.subsequence_number()?;

    info!(
        invocation_id = %invocation_id,
        record_index = idx,
        record_id = %record_id,
        approximate_arrival_timestamp = arrival_timestamp,
        shard_id = %shard_id,
        partition_key = %partition_key,
        kinesis_arrival_timestamp = %kinesis_arrival_timestamp,
        sequence_number = %sequence_number,
        subsequence_number = %subsequence_number,
        "Firehose record"
    );

    match mode {
        DecodeMode::Bytes => {
            let bytes = record.data_as_bytes()?;
            info!(record_index = idx, size = bytes.len(), data = ?bytes, "Record data");
        }
        DecodeMode::Text => {
            let text = record.data_as_text()?;
            info!(record_index = idx, size = text.len(), data = %text, "Record data");
        }
        DecodeMode::Json => {
            let json = record.data_as_json()?;
            debug!(record_index = idx, is_object = json.is_object(), "Parsed record data");
            info!(record_index = idx, data = %json, "Record data");
        }
    }

    Ok(())
}
