use std::io::Write;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Writes log records to a file. The menu owns the terminal, so nothing is logged to it.
struct MenuLogger {
    file: Mutex<std::fs::File>,
    filter: LevelFilter,
    start: Instant,
}

impl Log for MenuLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let _ = writeln!(
            self.file.lock(),
            "[{elapsed:.3}s] [{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = self.file.lock().flush();
    }
}

/// Level from `RUST_LOG`, or `default` when it is unset or unparsable
#[must_use]
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Initialize the global logger. Without a log file, logging stays off.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(log_file: Option<std::fs::File>) {
    let Some(file) = log_file else {
        log::set_max_level(LevelFilter::Off);
        return;
    };

    let filter = level_from_env(LevelFilter::Info);
    let logger = MenuLogger {
        file: Mutex::new(file),
        filter,
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger)).expect("logger already initialized");
    log::set_max_level(filter);
}
