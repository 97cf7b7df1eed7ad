/// Runtime configuration
///
/// The import core only ever sees an `ImportConfig` value. `AppConfig::from_env`
/// is how a host process builds one (plus the database URL) from the environment.
use std::env;
use std::time::Duration;

use crate::log_warn;
use crate::shared::errors::{AppError, AppResult};

const MIN_CONCURRENCY: usize = 2;
const MAX_CONCURRENCY: usize = 20;
const CONCURRENCY_PER_CPU: usize = 2;

/// Tuning knobs for one import pipeline
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Upper bound on pairs processed at once by the orchestrator
    pub max_concurrency: usize,

    /// Budget for one pair's lookup + write + associations
    pub pair_timeout: Duration,

    /// Files above this size are rejected before parsing
    pub max_file_bytes: usize,
}

impl ImportConfig {
    /// Production defaults: concurrency scales with CPUs, 30s per pair, 5 MiB files
    pub fn new() -> Self {
        Self {
            max_concurrency: Self::default_concurrency(),
            pair_timeout: Duration::from_secs(30),
            max_file_bytes: 5 * 1024 * 1024,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_pair_timeout(mut self, pair_timeout: Duration) -> Self {
        self.pair_timeout = pair_timeout;
        self
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    fn default_concurrency() -> usize {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        (cpu_count * CONCURRENCY_PER_CPU).clamp(MIN_CONCURRENCY, MAX_CONCURRENCY)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-level configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub import: ImportConfig,
}

impl AppConfig {
    /// Load from `.env` (if present) and the process environment
    ///
    /// - `DATABASE_URL` (required)
    /// - `IMPORT_MAX_CONCURRENCY`, `IMPORT_PAIR_TIMEOUT_SECS`, `IMPORT_MAX_FILE_BYTES` (optional)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| {
            AppError::InvalidInput("DATABASE_URL environment variable not found".to_string())
        })?;

        let mut import = ImportConfig::new();
        if let Some(value) = read_usize("IMPORT_MAX_CONCURRENCY") {
            import = import.with_max_concurrency(value);
        }
        if let Some(value) = read_usize("IMPORT_PAIR_TIMEOUT_SECS") {
            import = import.with_pair_timeout(Duration::from_secs(value as u64));
        }
        if let Some(value) = read_usize("IMPORT_MAX_FILE_BYTES") {
            import = import.with_max_file_bytes(value);
        }

        Ok(Self {
            database_url,
            import,
        })
    }
}

fn read_usize(key: &str) -> Option<usize> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(e) => {
            log_warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
