use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;

/// Console logging, plus a log file when `log_file` is given.
///
/// `RUST_LOG` overrides the verbosity-derived level when set.
pub fn setup_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string().to_lowercase());

    let console = pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .build();

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            let file_logger = pretty_env_logger::formatted_builder()
                .parse_filters(&filters)
                .write_style(pretty_env_logger::env_logger::WriteStyle::Never)
                .target(pretty_env_logger::env_logger::Target::Pipe(Box::new(file)))
                .build();

            let max_level = console.filter().max(file_logger.filter());
            log::set_boxed_logger(Box::new(LogDispatcher {
                console,
                file: file_logger,
            }))?;
            log::set_max_level(max_level);
        }
        None => {
            let max_level = console.filter();
            log::set_boxed_logger(Box::new(console))?;
            log::set_max_level(max_level);
        }
    }

    Ok(())
}

// Fans each record out to the console and the log file
struct LogDispatcher {
    console: pretty_env_logger::env_logger::Logger,
    file: pretty_env_logger::env_logger::Logger,
}

impl log::Log for LogDispatcher {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console.enabled(metadata) || self.file.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        self.console.log(record);
        self.file.log(record);
    }

    fn flush(&self) {
        self.console.flush();
        self.file.flush();
    }
}
