//! Colored stderr logger backing the `log` facade

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} {}", level_label(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

fn level_label(level: Level) -> ColoredString {
    match level {
        Level::Error => "error:".red().bold(),
        Level::Warn => "warning:".yellow().bold(),
        Level::Info => "info:".cyan(),
        Level::Debug => "debug:".dimmed(),
        Level::Trace => "trace:".dimmed(),
    }
}

/// Level shown for a given `--verbose` setting
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the logger. Later calls keep the first logger.
pub fn init(verbose: bool) {
    let level = level_for(verbose);
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
