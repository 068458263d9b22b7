use std::env;

use clap::ValueEnum;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, filter::LevelFilter};

use super::BoxError;

pub type LoggerGuard = tracing_appender::non_blocking::WorkerGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Lambda's advanced logging controls export AWS_LAMBDA_LOG_FORMAT, which
    /// wins over the requested format when it asks for JSON.
    pub fn resolve(self) -> Self {
        self.resolve_with(env::var("AWS_LAMBDA_LOG_FORMAT").ok().as_deref())
    }

    fn resolve_with(self, lambda_format: Option<&str>) -> Self {
        match lambda_format {
            Some(f) if f.eq_ignore_ascii_case("JSON") => LogFormat::Json,
            _ => self,
        }
    }
}

pub fn setup(format: LogFormat) -> Result<LoggerGuard, BoxError> {
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_writer)
        // disable printing of the module
        .with_target(false)
        .with_ansi(false);

    match format.resolve() {
        LogFormat::Json => {
            let subscriber = Registry::default().with(filter).with(layer.json());
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Compact => {
            let subscriber = Registry::default().with(filter).with(layer.compact());
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(guard)
}
