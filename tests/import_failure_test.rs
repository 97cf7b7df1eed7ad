/// Import failure handling tests
///
/// Tests cover:
/// - Store failures isolated to the failing pair
/// - Per-pair timeouts on the duplicate re-check
/// - Writes that outlast the pair timeout
/// - Cancellation before pairs start
/// - Lookup failures during duplicate detection
mod utils;

use leadbook::modules::contacts::{ContactWrite, InMemoryContactRepository};
use leadbook::modules::data_import::{ImportRequest, ImportService};
use leadbook::shared::errors::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use utils::factories::CandidateFactory;
use utils::helpers::{
    test_config, BlockingWriteRepository, CancellingRepository, MockContactStore, SlowRepository,
};
use uuid::Uuid;

fn numbered_request(count: usize) -> ImportRequest {
    let candidates = (0..count).map(|i| CandidateFactory::numbered(i).build()).collect();
    ImportRequest::for_campaigns(candidates, vec![Uuid::new_v4()], HashSet::new())
}

#[tokio::test]
async fn failing_write_is_reported_and_others_continue() {
    let mut store = MockContactStore::new();
    store.expect_find_by_identity().returning(|_| Ok(vec![]));
    store.expect_apply_import().times(4).returning(|write, _| match write {
        ContactWrite::Insert(fields) if fields.first_name == "First2" => Err(AppError::DatabaseError(
            "duplicate key value violates unique constraint".to_string(),
        )),
        _ => Ok(Uuid::new_v4()),
    });

    let service = ImportService::new(Arc::new(store), test_config());
    let summary = service.import_contacts(numbered_request(4), None).await.unwrap();

    assert_eq!(summary.imported, 3);
    assert_eq!(
        summary.errors,
        vec!["First2 Last2: Database error: duplicate key value violates unique constraint".to_string()]
    );
}

#[tokio::test]
async fn lookup_failure_rejects_pair_without_writing() {
    let mut store = MockContactStore::new();
    store
        .expect_find_by_identity()
        .returning(|_| Err(AppError::ServiceUnavailable("store offline".to_string())));
    store.expect_apply_import().never();

    let service = ImportService::new(Arc::new(store), test_config());
    let summary = service.import_contacts(numbered_request(2), None).await.unwrap();

    assert_eq!(summary.imported, 0);
    assert_eq!(
        summary.errors,
        vec![
            "First0 Last0: Service unavailable: store offline".to_string(),
            "First1 Last1: Service unavailable: store offline".to_string(),
        ]
    );
}

#[tokio::test]
async fn vanished_overwrite_target_is_a_row_error() {
    let existing_id = Uuid::new_v4();
    let stored = utils::factories::StoredContactFactory::new().build();
    let stored = leadbook::modules::contacts::StoredContact { id: existing_id, ..stored };

    let mut store = MockContactStore::new();
    store
        .expect_find_by_identity()
        .returning(move |_| Ok(vec![stored.clone()]));
    store
        .expect_apply_import()
        .returning(|_, _| Err(AppError::NotFound("Contact not found".to_string())));

    let service = ImportService::new(Arc::new(store), test_config());
    let request = ImportRequest::for_campaigns(
        vec![CandidateFactory::new().build()],
        vec![Uuid::new_v4()],
        [existing_id].into_iter().collect(),
    );
    let summary = service.import_contacts(request, None).await.unwrap();

    assert_eq!(summary.overwritten, 0);
    assert_eq!(
        summary.errors,
        vec!["Jane Doe: Contact was removed before it could be overwritten".to_string()]
    );
}

#[tokio::test]
async fn slow_recheck_times_out_without_blocking_others() {
    let memory = Arc::new(InMemoryContactRepository::new());
    let slow = SlowRepository::new(memory.clone(), &["First1"], Duration::from_secs(2));
    let config = test_config().with_pair_timeout(Duration::from_millis(200));
    let service = ImportService::new(Arc::new(slow), config);

    let summary = service.import_contacts(numbered_request(3), None).await.unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with("First1 Last1: Timed out after"));
    assert_eq!(memory.contacts().await.len(), 2);
}

#[tokio::test]
async fn write_outlasting_pair_timeout_reports_committed_outcome() {
    let memory = Arc::new(InMemoryContactRepository::new());
    let repo = BlockingWriteRepository::new(memory.clone(), Duration::from_millis(400));
    let config = test_config().with_pair_timeout(Duration::from_millis(100));
    let service = ImportService::new(Arc::new(repo), config);

    let summary = service.import_contacts(numbered_request(1), None).await.unwrap();

    assert_eq!(summary.imported, 1);
    assert!(summary.errors.is_empty());
    assert_eq!(memory.contacts().await.len(), 1);
}

#[tokio::test]
async fn cancellation_reports_unstarted_pairs() {
    let memory = Arc::new(InMemoryContactRepository::new());
    let token = CancellationToken::new();
    let repo = CancellingRepository::new(memory.clone(), token.clone());
    let service = ImportService::new(Arc::new(repo), test_config().with_max_concurrency(1));

    let summary = service
        .import_contacts(numbered_request(3), Some(token))
        .await
        .unwrap();

    assert_eq!(summary.imported, 1);
    assert_eq!(
        summary.errors,
        vec![
            "Import cancelled before processing First1 Last1".to_string(),
            "Import cancelled before processing First2 Last2".to_string(),
        ]
    );
    assert_eq!(memory.contacts().await.len(), 1);
}

#[test]
fn detection_surfaces_store_failure() {
    let mut store = MockContactStore::new();
    store
        .expect_find_by_identity()
        .returning(|_| Err(AppError::DatabaseError("connection refused".to_string())));

    let service = ImportService::new(Arc::new(store), test_config());
    let candidates = vec![CandidateFactory::new().build()];

    let result = tokio_test::block_on(service.detect_duplicates(&candidates));
    assert!(matches!(result, Err(AppError::DatabaseError(_))));
}

#[test]
fn detection_looks_up_in_bounded_chunks() {
    let mut store = MockContactStore::new();
    store
        .expect_find_by_identity()
        .withf(|keys| keys.len() <= 500)
        .times(3)
        .returning(|_| Ok(vec![]));

    let service = ImportService::new(Arc::new(store), test_config());
    let candidates: Vec<_> = (0..1200).map(|i| CandidateFactory::numbered(i).build()).collect();

    let duplicates = tokio_test::block_on(service.detect_duplicates(&candidates)).unwrap();
    assert!(duplicates.is_empty());
}
