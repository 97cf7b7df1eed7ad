pub mod csv_parser;
pub mod duplicate_detector;
pub mod field_validator;
pub mod import_coordinator;
pub mod import_executor;
pub mod progress_tracker;
pub mod types;

// Re-export main types for public API
pub use csv_parser::{CanonicalField, CsvRowParser, RawRow, RawRows};
pub use duplicate_detector::DuplicateDetector;
pub use field_validator::{parse_connected_on, FieldValidator, RowVerdict};
pub use import_coordinator::ImportCoordinator;
pub use import_executor::ImportExecutor;
pub use progress_tracker::ProgressTracker;
pub use types::*;
