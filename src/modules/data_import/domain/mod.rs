pub mod events;
pub mod services;

// Re-exports for easy access
pub use events::ImportEvent;
pub use services::import_components::{
    CsvRowParser, DuplicateDetector, FieldValidator, ImportCoordinator, ImportExecutor,
    ProgressTracker,
};
