use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::{
    format::FmtSpan,
    writer::{BoxMakeWriter, MakeWriterExt},
};

pub const CLI_PREFIX: &str = "cli";

/// Installs the global subscriber. Without an application directory logs only go to stdout, and
/// only if `show_std` is set.
pub fn enable_logging(
    prefix: &str,
    application_data_path: Option<&Path>,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let appender = application_data_path
        .map(|path| {
            tracing_appender::rolling::Builder::new()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix(prefix)
                .build(path.join("logs"))
        })
        .transpose()?;
    let appender = match appender {
        Some(appender) => BoxMakeWriter::new(appender),
        None => BoxMakeWriter::new(std::io::sink),
    };

    let stdout = std::io::stdout.with_filter(move |_| show_std);

    let level = log_level
        .map(|v| v.to_string())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "{}={level}",
            env!("CARGO_PKG_NAME").replace("-", "_"),
        )))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .with_ansi(false)
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});
