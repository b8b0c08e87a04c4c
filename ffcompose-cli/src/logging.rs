// ============================================================================
// ffcompose-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern Dispatch for Console and File Output
//
// Console lines go to stderr so command output on stdout stays clean for
// piping (e.g. `ffcompose info --json`). Level names are colored on the
// console only; the optional log file receives plain lines.
//
// USAGE:
// - default: info and above
// - -v / --verbose: debug, which includes every compiled command line

use log::LevelFilter;
use owo_colors::OwoColorize;
use std::path::Path;

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn colored_level(level: log::Level) -> String {
    match level {
        log::Level::Error => "ERROR".bright_red().to_string(),
        log::Level::Warn => "WARN ".yellow().to_string(),
        log::Level::Info => "INFO ".green().to_string(),
        log::Level::Debug => "DEBUG".blue().to_string(),
        log::Level::Trace => "TRACE".magenta().to_string(),
    }
}

/// Installs the global logger.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} {}",
                get_timestamp().dimmed(),
                colored_level(record.level()),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().level(level).chain(console);

    if let Some(path) = log_file {
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} {:<5} [{}] {}",
                    get_timestamp(),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::log_file(path)?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;
    log::debug!("Logger initialized with level: {level}");
    Ok(())
}
