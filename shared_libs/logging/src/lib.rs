/*
Shared log4rs setup for the ground station tools and the firmware build hook.

Every process installs one logger. init_logger is for when the operator asked for log files
and takes the directory they go to:
    - all_logs.log                 everything at trace and above
    - error_and_warning_logs.log   warnings and errors only
init_console_logger only writes to the console and never touches the filesystem.
Either way the console gets whatever passes console_level, on stderr so it never mixes with
the status lines a tool prints on stdout.
*/

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::filter::threshold::ThresholdFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::path::Path;
use thiserror::Error;

const ALL_LOGS_FILE: &str = "all_logs.log";
const FILTERED_LOGS_FILE: &str = "error_and_warning_logs.log";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("could not open log file: {0}")]
    File(#[from] std::io::Error),
    #[error("invalid logger config: {0}")]
    Config(String),
    #[error("logger already initialised: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}

fn console_appender(console_level: LevelFilter) -> Appender {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();

    Appender::builder()
        .filter(Box::new(ThresholdFilter::new(console_level)))
        .build("stderr", Box::new(stderr))
}

fn configure_console_logger(console_level: LevelFilter) -> Result<Config, LoggingError> {
    Config::builder()
        .appender(console_appender(console_level))
        .build(Root::builder().appender("stderr").build(LevelFilter::Trace))
        .map_err(|e| LoggingError::Config(e.to_string()))
}

fn configure_logger(
    console_level: LevelFilter,
    filtered_log_level: LevelFilter,
    log_path: &Path,
) -> Result<Config, LoggingError> {
    let all_file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} - {l} - {m}{n}")))
        .build(log_path.join(ALL_LOGS_FILE))?;

    let filtered_file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} - {l} - {m}{n}")))
        .build(log_path.join(FILTERED_LOGS_FILE))?;

    Config::builder()
        .appender(console_appender(console_level))
        .appender(Appender::builder().build("all_file", Box::new(all_file)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(filtered_log_level)))
                .build("filtered_file", Box::new(filtered_file)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("all_file")
                .appender("filtered_file")
                .build(LevelFilter::Trace),
        )
        .map_err(|e| LoggingError::Config(e.to_string()))
}

/// Install the process-wide logger. Log files are created under `log_path`, which must exist
/// or be creatable.
pub fn init_logger(log_path: impl AsRef<Path>, console_level: LevelFilter) -> Result<(), LoggingError> {
    let log_path = log_path.as_ref();
    std::fs::create_dir_all(log_path)?;

    let config = configure_logger(console_level, LevelFilter::Warn, log_path)?;
    let _handle = log4rs::init_config(config)?;
    Ok(())
}

/// Install a process-wide logger that only writes to stderr.
pub fn init_console_logger(console_level: LevelFilter) -> Result<(), LoggingError> {
    let config = configure_console_logger(console_level)?;
    let _handle = log4rs::init_config(config)?;
    Ok(())
}
