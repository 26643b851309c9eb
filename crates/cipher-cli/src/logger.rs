use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable overriding the log level (`error` .. `trace`, `off`)
pub const LOG_ENV: &str = "CIPHERQUEST_LOG";

/// Writes log records to stderr so they never mix with the game screen
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:<5} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Level from `-v` count, else the environment, else warnings only
pub fn resolve_level(verbosity: u8, env_value: Option<&str>) -> LevelFilter {
    match verbosity {
        0 => env_value
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: u8) -> Result<LevelFilter, SetLoggerError> {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = resolve_level(verbosity, env_value.as_deref());
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level);
    Ok(level)
}
