// Shared kernel: cross-context errors, configuration, events and infrastructure

pub mod config; // Environment-driven configuration
pub mod errors; // Shared error types
pub mod events; // In-process event bus
pub mod infrastructure; // Database pool
pub mod utils; // Logging helpers

pub use config::{AppConfig, ImportConfig};
pub use events::{EventBus, SubscriptionId};
pub use infrastructure::Database;
