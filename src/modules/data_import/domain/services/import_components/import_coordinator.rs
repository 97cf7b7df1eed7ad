use crate::log_info;
use crate::modules::contacts::ContactRepository;
use crate::modules::data_import::domain::events::ImportEvent;
use crate::shared::config::ImportConfig;
use crate::shared::events::EventBus;
use crate::shared::utils::logger::TimedOperation;

use super::import_executor::ImportExecutor;
use super::progress_tracker::ProgressTracker;
use super::types::{ContactOutcome, ImportItem, ImportProgress, ImportRequest, ImportSummary};
use futures::{stream, StreamExt};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Atomic counters for progress tracking without lock contention
#[derive(Default)]
struct ProgressCounts {
    processed: AtomicUsize,
    imported: AtomicUsize,
    overwritten: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl ProgressCounts {
    fn record(&self, outcome: &ContactOutcome) -> usize {
        let counter = match outcome {
            ContactOutcome::Imported { .. } => &self.imported,
            ContactOutcome::Overwritten { .. } => &self.overwritten,
            ContactOutcome::Skipped { .. } => &self.skipped,
            ContactOutcome::Rejected { .. } => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn snapshot(&self, current: usize, total: usize, current_contact: String) -> ImportProgress {
        ImportProgress {
            current,
            total,
            current_contact,
            processed: self.processed.load(Ordering::Relaxed),
            imported_count: self.imported.load(Ordering::Relaxed),
            overwritten_count: self.overwritten.load(Ordering::Relaxed),
            skipped_count: self.skipped.load(Ordering::Relaxed),
            failed_count: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Everything one pair needs, shared by the groups of a single run
struct PairRun {
    import_executor: ImportExecutor,
    progress_tracker: ProgressTracker,
    events: EventBus<ImportEvent>,
    counts: ProgressCounts,
    overwrite_ids: HashSet<Uuid>,
    cancel: CancellationToken,
    total_count: usize,
}

impl PairRun {
    async fn run(&self, index: usize, item: &ImportItem) -> ContactOutcome {
        let name = item.candidate.full_name();

        let outcome = if self.cancel.is_cancelled() {
            ContactOutcome::Rejected {
                message: format!("Import cancelled before processing {}", name),
            }
        } else {
            self.import_executor.import_single(item, &self.overwrite_ids).await
        };

        let processed = self.counts.record(&outcome);
        self.events.publish(&ImportEvent::ContactProcessed {
            position: index,
            name: name.clone(),
            outcome: outcome.clone(),
        });
        if self.progress_tracker.should_emit(processed, self.total_count) {
            self.progress_tracker.emit_import_progress(self.counts.snapshot(
                index + 1,
                self.total_count,
                format!("Importing: {}", name),
            ));
        }

        outcome
    }
}

/// Drives every pair of an import request through the executor
///
/// Pairs sharing a URL or a full name form one group and run in request
/// order, so each sees the writes of the ones before it. Groups run
/// concurrently up to `max_concurrency`. A failing pair never stops the others.
#[derive(Clone)]
pub struct ImportCoordinator {
    import_executor: ImportExecutor,
    progress_tracker: ProgressTracker,
    events: EventBus<ImportEvent>,
    config: ImportConfig,
}

impl ImportCoordinator {
    pub fn new(
        contact_repo: Arc<dyn ContactRepository>,
        events: EventBus<ImportEvent>,
        config: ImportConfig,
    ) -> Self {
        Self {
            import_executor: ImportExecutor::new(contact_repo).with_pair_timeout(config.pair_timeout),
            progress_tracker: ProgressTracker::new(events.clone()),
            events,
            config,
        }
    }

    /// Process all pairs and report per-pair failures in request order
    pub async fn import_contacts(
        &self,
        request: ImportRequest,
        cancel: Option<CancellationToken>,
    ) -> ImportSummary {
        let _timer = TimedOperation::new("import_contacts");
        let total_count = request.items.len();
        let concurrency = self.config.max_concurrency.max(1);
        let groups = identity_groups(request.items);

        log_info!(
            "Starting contact import for {} items in {} identity groups ({} marked for overwrite, concurrency {})",
            total_count,
            groups.len(),
            request.overwrite_ids.len(),
            concurrency
        );

        let run = Arc::new(PairRun {
            import_executor: self.import_executor.clone(),
            progress_tracker: self.progress_tracker.clone().with_batch_config(total_count),
            events: self.events.clone(),
            counts: ProgressCounts::default(),
            overwrite_ids: request.overwrite_ids,
            cancel: cancel.unwrap_or_default(),
            total_count,
        });

        run.progress_tracker
            .emit_import_progress(run.counts.snapshot(0, total_count, "Starting import...".to_string()));

        let mut results: Vec<(usize, ContactOutcome)> = stream::iter(groups.into_iter().map(|group| {
            let run = Arc::clone(&run);
            async move {
                let mut outcomes = Vec::with_capacity(group.len());
                for (index, item) in group {
                    let outcome = run.run(index, &item).await;
                    outcomes.push((index, outcome));
                }
                outcomes
            }
        }))
        .buffer_unordered(concurrency)
        .flat_map(stream::iter)
        .collect()
        .await;

        // Completion order is arbitrary; report in request order
        results.sort_by_key(|(index, _)| *index);

        let summary = summarize(results.into_iter().map(|(_, outcome)| outcome));

        self.events.publish(&ImportEvent::ImportCompleted(summary.clone()));

        log_info!(
            "Contact import completed: {} imported, {} overwritten, {} skipped, {} failed",
            summary.imported,
            summary.overwritten,
            summary.skipped,
            summary.errors.len()
        );

        summary
    }
}

/// Split items into groups linked by a shared URL or full name, ignoring case
///
/// Links are transitive. Each group keeps request order; groups are ordered
/// by their first item.
fn identity_groups(items: Vec<ImportItem>) -> Vec<Vec<(usize, ImportItem)>> {
    let mut parent: Vec<usize> = (0..items.len()).collect();
    let mut owners: HashMap<String, usize> = HashMap::new();

    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for (index, item) in items.iter().enumerate() {
        let candidate = &item.candidate;
        let url = candidate.profile_url.trim().to_lowercase();
        let name = format!(
            "{}\u{0}{}",
            candidate.first_name.trim().to_lowercase(),
            candidate.last_name.trim().to_lowercase()
        );
        let keys = [(!url.is_empty()).then(|| format!("url:{}", url)), Some(format!("name:{}", name))];

        for key in keys.into_iter().flatten() {
            match owners.entry(key) {
                Entry::Occupied(owner) => {
                    let a = root(&mut parent, index);
                    let b = root(&mut parent, *owner.get());
                    // Lower index as root keeps groups ordered by first item
                    parent[a.max(b)] = a.min(b);
                }
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }
    }

    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<(usize, ImportItem)>> = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        let group_root = root(&mut parent, index);
        let slot = *slots.entry(group_root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push((index, item));
    }
    groups
}

fn summarize(outcomes: impl Iterator<Item = ContactOutcome>) -> ImportSummary {
    outcomes.fold(ImportSummary::default(), |mut summary, outcome| {
        match outcome {
            ContactOutcome::Imported { .. } => summary.imported += 1,
            ContactOutcome::Overwritten { .. } => summary.overwritten += 1,
            ContactOutcome::Skipped { .. } => summary.skipped += 1,
            ContactOutcome::Rejected { message } => summary.errors.push(message),
        }
        summary
    })
}
