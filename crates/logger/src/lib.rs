//! Level-gated logger shared by the `gradpath` library and CLI.
//! - `log-info` enables `info!` output (enabled by default).
//! - `log-debug` enables `debug!` output and a runtime debug flag.
//! - `verbose` enables `verbose!`, an untagged console printer.
//! - `file-logging` routes tagged messages to a file sink with UTC timestamps.
//! - `warn!` and `error!` are always active.

use std::fmt::{self, Arguments};
use std::str::FromStr;
#[cfg(any(feature = "log-debug", feature = "verbose"))]
use std::sync::atomic::AtomicBool;
use std::sync::atomic::{AtomicU8, Ordering};

#[cfg(feature = "file-logging")]
use std::{
    fs::{File, OpenOptions},
    io::Write,
    sync::{LazyLock, Mutex},
};

/// Logging levels, ordered from most to least severe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Error-level messages (always enabled).
    Error = 1,
    /// Warning-level messages (always enabled).
    Warn = 2,
    /// Info-level messages (requires `log-info` feature).
    Info = 3,
    /// Debug-level messages (requires `log-debug` feature and runtime flag).
    Debug = 4,
}

impl Level {
    /// Bracketed tag written in front of every message at this level.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Error => "[ERROR]",
            Self::Warn => "[WARN]",
            Self::Info => "[INFO]",
            Self::Debug => "[DEBUG]",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Error,
            2 => Self::Warn,
            3 => Self::Info,
            _ => Self::Debug,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "err" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(format!("Unknown log level: '{other}'")),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Default level picked from the enabled features.
const fn default_level() -> u8 {
    if cfg!(feature = "log-debug") {
        Level::Debug as u8
    } else if cfg!(feature = "log-info") {
        Level::Info as u8
    } else {
        Level::Warn as u8
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(default_level());
#[cfg(feature = "log-debug")]
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(true);
#[cfg(feature = "verbose")]
static VERBOSE_ENABLED: AtomicBool = AtomicBool::new(false);
#[cfg(feature = "file-logging")]
static LOG_FILE: LazyLock<Mutex<Option<File>>> = LazyLock::new(|| Mutex::new(None));

/// Set the global log level.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Current global log level.
#[must_use]
pub fn level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::SeqCst))
}

/// Parse and set level from a string (case-insensitive). Returns true on success.
#[must_use]
pub fn set_level_from_str(level: &str) -> bool {
    level.parse::<Level>().map(set_level).is_ok()
}

/// Enable debug logging at runtime (no-op when log-debug is disabled).
#[cfg(feature = "log-debug")]
pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}
#[cfg(not(feature = "log-debug"))]
/// Enable debug logging at runtime (no-op when log-debug is disabled).
pub const fn enable_debug() {}

/// Disable debug logging at runtime (no-op when log-debug is disabled).
#[cfg(feature = "log-debug")]
pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}
#[cfg(not(feature = "log-debug"))]
/// Disable debug logging at runtime (no-op when log-debug is disabled).
pub const fn disable_debug() {}

/// Returns whether debug logging is enabled (false if `log-debug` is disabled).
#[cfg(feature = "log-debug")]
#[must_use]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

/// Returns whether debug logging is enabled (false if `log-debug` is disabled).
#[cfg(not(feature = "log-debug"))]
#[must_use]
pub const fn is_debug_enabled() -> bool {
    false
}

/// Enable verbose output at runtime (no-op when verbose is disabled).
#[cfg(feature = "verbose")]
pub fn enable_verbose() {
    VERBOSE_ENABLED.store(true, Ordering::SeqCst);
}
#[cfg(not(feature = "verbose"))]
/// Enable verbose output at runtime (no-op when verbose is disabled).
pub const fn enable_verbose() {}

/// Disable verbose output at runtime (no-op when verbose is disabled).
#[cfg(feature = "verbose")]
pub fn disable_verbose() {
    VERBOSE_ENABLED.store(false, Ordering::SeqCst);
}
#[cfg(not(feature = "verbose"))]
/// Disable verbose output at runtime (no-op when verbose is disabled).
pub const fn disable_verbose() {}

/// Returns whether verbose output is enabled (false if `verbose` is disabled).
#[cfg(feature = "verbose")]
#[must_use]
pub fn is_verbose_enabled() -> bool {
    VERBOSE_ENABLED.load(Ordering::SeqCst)
}

/// Returns whether verbose output is enabled (false if `verbose` is disabled).
#[cfg(not(feature = "verbose"))]
#[must_use]
pub const fn is_verbose_enabled() -> bool {
    false
}

/// Open (append mode) the file sink. Returns true on success.
#[cfg(feature = "file-logging")]
#[must_use]
pub fn init_file_logging(path: &std::path::Path) -> bool {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };
    LOG_FILE.lock().is_ok_and(|mut sink| {
        *sink = Some(file);
        true
    })
}

/// Open (append mode) the file sink. Always false without `file-logging`.
#[cfg(not(feature = "file-logging"))]
#[must_use]
pub fn init_file_logging(_path: &std::path::Path) -> bool {
    false
}

/// Close the file sink; later messages go back to the console.
#[cfg(feature = "file-logging")]
pub fn close_file_logging() {
    if let Ok(mut sink) = LOG_FILE.lock() {
        *sink = None;
    }
}

/// Close the file sink (no-op when file-logging is disabled).
#[cfg(not(feature = "file-logging"))]
pub const fn close_file_logging() {}

/// Write one timestamped line to the file sink. Returns false when no sink is open.
#[cfg(feature = "file-logging")]
fn write_to_file(level: Level, msg: &str) -> bool {
    let Ok(mut sink) = LOG_FILE.lock() else {
        return false;
    };
    let Some(file) = sink.as_mut() else {
        return false;
    };
    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let _ = writeln!(file, "{stamp} {} {msg}", level.tag());
    let _ = file.flush();
    true
}

#[cfg(not(feature = "file-logging"))]
const fn write_to_file(_level: Level, _msg: &str) -> bool {
    false
}

/// Route a message: the file sink wins when open, otherwise stdout
/// for info/debug and stderr for warn/error.
fn emit(level: Level, msg: &str) {
    if write_to_file(level, msg) {
        return;
    }
    match level {
        Level::Error | Level::Warn => eprintln!("{} {msg}", level.tag()),
        Level::Info | Level::Debug => println!("{} {msg}", level.tag()),
    }
}

/// Feature gates first, then the runtime level and debug flag.
fn should_log(level: Level) -> bool {
    match level {
        Level::Info if !cfg!(feature = "log-info") => return false,
        Level::Debug if !cfg!(feature = "log-debug") => return false,
        _ => {}
    }
    level <= self::level() && (level != Level::Debug || is_debug_enabled())
}

/// Internal logging dispatch used by the public macros.
pub fn log_impl(level: Level, args: Arguments) {
    if should_log(level) {
        emit(level, &args.to_string());
    }
}

#[macro_export]
/// Logs an error-level message (always enabled).
macro_rules! error {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Error, format_args!($($arg)*)) };
}

#[macro_export]
/// Logs a warning-level message (always enabled).
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Warn, format_args!($($arg)*)) };
}

#[macro_export]
/// Logs an info-level message (requires `log-info` feature).
macro_rules! info {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Info, format_args!($($arg)*)) };
}

#[macro_export]
/// Logs a debug-level message (requires `log-debug` feature and runtime enablement).
macro_rules! debug {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Debug, format_args!($($arg)*)) };
}

#[macro_export]
/// Prints an untagged console line when verbose output is enabled. Never goes to the file sink.
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::is_verbose_enabled() {
            println!($($arg)*);
        }
    };
}
