use std::path::Path;
use std::sync::Mutex;

use file_rotate::{ContentLimit, FileRotate, compression::Compression, suffix::AppendCount};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::config::Logging;

const LOG_FILE_NAME: &str = "sitewatch.log";

/// JSON logs to stdout, teed into a size-rotated file when `file` is given.
pub fn init_json_logging(file: Option<&Logging>) {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false);

    let result = match file.and_then(open_rotating_log) {
        Some(rotating) => tracing::subscriber::set_global_default(
            builder
                .with_writer(std::io::stdout.and(Mutex::new(rotating)))
                .finish(),
        ),
        None => tracing::subscriber::set_global_default(builder.finish()),
    };

    if let Err(error) = result {
        eprintln!("global logger initialization failed: {}", error);
    }
}

fn open_rotating_log(config: &Logging) -> Option<FileRotate<AppendCount>> {
    let dir = Path::new(&config.dir);
    if let Err(error) = std::fs::create_dir_all(dir) {
        eprintln!(
            "log directory {} unavailable, logging to stdout only: {}",
            dir.display(),
            error
        );
        return None;
    }

    let max_bytes = usize::try_from(config.max_file_size_bytes).unwrap_or(usize::MAX);
    Some(FileRotate::new(
        dir.join(LOG_FILE_NAME),
        AppendCount::new(config.max_files.max(1)),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        None,
    ))
}
