//! Console logger
//!
//! Leveled, namespaced, ANSI-colored console logging. The level threshold
//! is set once at startup from configuration; until then everything at
//! info and above is printed.

use chrono::Local;
use std::sync::atomic::{AtomicU8, Ordering};

const RESET: &str = "\x1b[0m";
const FG_RED: &str = "\x1b[31m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_CYAN: &str = "\x1b[36m";

/// Logging levels, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    /// Parse a configured level name; unknown names fall back to info
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Self::Trace | Self::Debug => FG_CYAN,
            Self::Info => FG_GREEN,
            Self::Warn => FG_YELLOW,
            Self::Error => FG_RED,
        }
    }
}

static THRESHOLD: AtomicU8 = AtomicU8::new(Level::Info as u8);

/// Set the global level threshold. Called once at application startup.
pub fn init(level: &str) {
    THRESHOLD.store(Level::parse(level) as u8, Ordering::Relaxed);
}

/// Namespaced console logger
///
/// Each module keeps its own `static LOG: Logger = Logger::new("...")`;
/// the namespace appears in every line it writes.
#[derive(Debug)]
pub struct Logger {
    namespace: &'static str,
}

impl Logger {
    #[must_use]
    pub const fn new(namespace: &'static str) -> Self {
        Self { namespace }
    }

    pub fn trace(&self, message: &str) {
        self.write(Level::Trace, message);
    }

    pub fn debug(&self, message: &str) {
        self.write(Level::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.write(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.write(Level::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.write(Level::Error, message);
    }

    fn write(&self, level: Level, message: &str) {
        if (level as u8) < THRESHOLD.load(Ordering::Relaxed) {
            return;
        }
        let time = Local::now().format("%d.%m.%Y %H:%M:%S");
        let line = format!(
            "{time} {}[{}]{RESET} {} : {message}",
            level.color(),
            level.label(),
            self.namespace
        );
        match level {
            Level::Warn | Level::Error => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_levels() {
        assert_eq!(Level::parse("trace"), Level::Trace);
        assert_eq!(Level::parse("DEBUG"), Level::Debug);
        assert_eq!(Level::parse("warning"), Level::Warn);
        assert_eq!(Level::parse("error"), Level::Error);
    }

    #[test]
    fn parse_unknown_level_falls_back_to_info() {
        assert_eq!(Level::parse("verbose"), Level::Info);
        assert_eq!(Level::parse(""), Level::Info);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }
}
