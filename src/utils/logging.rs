//! Logging utilities and initialization for baobrew

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;
use std::path::Path;

/// Where log records go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

/// Map `-q` / `-v` flags to a level filter
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Initialize logging for the baobrew CLI
pub fn init_cli_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
    format: LogFormat,
) -> Result<()> {
    let level = level_for(verbose, quiet);

    match (log_file, format) {
        (_, LogFormat::Json) => init_json_logger(level, log_file)?,
        (Some(path), LogFormat::Human) => init_file_logger(level, path)?,
        (None, LogFormat::Human) => {
            Builder::from_default_env()
                .target(Target::Stderr)
                .filter_level(level)
                .format_timestamp_secs()
                .format_module_path(false)
                .init();
        }
    }

    #[cfg(debug_assertions)]
    log_panics::init();

    log::debug!("baobrew logging initialized with level: {:?}", level);
    Ok(())
}

fn open_append(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?)
}

fn init_file_logger(level: LevelFilter, path: &Path) -> Result<()> {
    let file = open_append(path)?;

    Builder::from_default_env()
        .target(Target::Pipe(Box::new(file)))
        .filter_level(level)
        .format_timestamp_secs()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .init();

    Ok(())
}

fn init_json_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    use chrono::Utc;

    let target: Box<dyn Write + Send> = match log_file {
        Some(path) => Box::new(open_append(path)?),
        None => Box::new(std::io::stderr()),
    };

    Builder::from_default_env()
        .target(Target::Pipe(target))
        .filter_level(level)
        .format(|buf, record| {
            let json = serde_json::json!({
                "timestamp": Utc::now().to_rfc3339(),
                "level": record.level().to_string(),
                "module": record.module_path().unwrap_or("unknown"),
                "message": record.args().to_string(),
                "target": record.target(),
            });
            writeln!(buf, "{}", json)
        })
        .init();

    Ok(())
}
