//! Log callback system.
//!
//! Messages go to the `tracing` subscriber (if any) and to an optional
//! process-wide callback for hosts that want to route logs themselves.

use parking_lot::Mutex;
use std::sync::OnceLock;

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global log callback.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    *log_callback().lock() = Some(Box::new(callback));
}

/// Remove the global log callback.
pub fn clear_log_callback() {
    *log_callback().lock() = None;
}

/// Emit a log event.
pub fn emit_log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "cutekit", "{message}"),
        LogLevel::Info => tracing::info!(target: "cutekit", "{message}"),
        LogLevel::Warn => tracing::warn!(target: "cutekit", "{message}"),
        LogLevel::Error => tracing::error!(target: "cutekit", "{message}"),
    }
    if let Some(callback) = log_callback().lock().as_ref() {
        callback(level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_callback() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let called = Arc::new(AtomicBool::new(false));
        let called_clone = Arc::clone(&called);
        set_log_callback(move |level, msg| {
            if msg == "event-test hello" {
                assert_eq!(level, LogLevel::Info);
                called_clone.store(true, Ordering::SeqCst);
            }
        });
        emit_log(LogLevel::Info, "event-test hello");
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
