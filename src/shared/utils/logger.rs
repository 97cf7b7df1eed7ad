use log::{debug, info};
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the `env_logger` backend; later calls are no-ops
///
/// `RUST_LOG` still wins over the defaults set here.
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .filter_module("leadbook", log::LevelFilter::Debug)
            .filter_module("diesel", log::LevelFilter::Warn)
            .filter_module("r2d2", log::LevelFilter::Warn)
            .filter_module("tokio", log::LevelFilter::Warn)
            .parse_default_env()
            .format_timestamp_millis()
            .format_target(false)
            .try_init();

        info!("Logging initialized");
    });
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// One-line log shapes shared by the store and the import pipeline
pub struct LogContext;

impl LogContext {
    /// Store round trip; without a duration it marks the start
    pub fn db_operation(operation: &str, table: &str, duration_ms: Option<u64>) {
        match duration_ms {
            Some(duration) => info!("DB: {} on {} completed in {}ms", operation, table, duration),
            None => debug!("DB: Starting {} on {}", operation, table),
        }
    }

    pub fn import_progress(processed: usize, total: usize, contact: &str) {
        debug!("Import: {}/{} done, last '{}'", processed, total, contact);
    }

    pub fn parse_summary(total_rows: usize, valid_rows: usize, errors: usize) {
        info!(
            "Parse: {} rows read, {} valid, {} row errors",
            total_rows, valid_rows, errors
        );
    }

    /// Every error the crate logs goes through here
    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        crate::log_error!("{}: {}", context, error);
    }

    pub fn performance_metric(operation: &str, duration_ms: u64, additional_info: Option<&str>) {
        match additional_info {
            Some(info) => info!("Timing: {} took {}ms ({})", operation, duration_ms, info),
            None => debug!("Timing: {} took {}ms", operation, duration_ms),
        }
    }
}

/// Logs the elapsed time of an operation when finished
pub struct TimedOperation {
    start: std::time::Instant,
    operation: &'static str,
}

impl TimedOperation {
    pub fn new(operation: &'static str) -> Self {
        debug!("Starting: {}", operation);
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    pub fn finish(self) -> u64 {
        let duration = self.start.elapsed().as_millis() as u64;
        LogContext::performance_metric(self.operation, duration, None);
        duration
    }

    pub fn finish_with_info(self, info: &str) -> u64 {
        let duration = self.start.elapsed().as_millis() as u64;
        LogContext::performance_metric(self.operation, duration, Some(info));
        duration
    }
}
