use crate::modules::data_import::domain::events::ImportEvent;
use crate::shared::events::EventBus;
use crate::shared::utils::logger::LogContext;

use super::types::ImportProgress;

/// Number of progress events a full run is thinned down to
const TARGET_UPDATES: usize = 50;

/// Publishes batched import progress on the event bus
#[derive(Clone)]
pub struct ProgressTracker {
    events: EventBus<ImportEvent>,
    batch_size: usize,
}

impl ProgressTracker {
    pub fn new(events: EventBus<ImportEvent>) -> Self {
        Self {
            events,
            batch_size: 1,
        }
    }

    /// Emit roughly every `total / 50` items
    pub fn with_batch_config(mut self, total: usize) -> Self {
        self.batch_size = (total / TARGET_UPDATES).max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// First and last item always emit
    pub fn should_emit(&self, processed: usize, total: usize) -> bool {
        processed <= 1 || processed >= total || processed % self.batch_size == 0
    }

    pub fn emit_import_progress(&self, progress: ImportProgress) {
        LogContext::import_progress(progress.processed, progress.total, &progress.current_contact);
        self.events.publish(&ImportEvent::Progress(progress));
    }
}
