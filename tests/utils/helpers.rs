/// Test helper functions and service builders
use async_trait::async_trait;
use leadbook::modules::contacts::{
    ContactRepository, ContactWrite, IdentityKey, InMemoryContactRepository, StoredContact,
};
use leadbook::modules::data_import::{ImportEvent, ImportService};
use leadbook::shared::errors::AppResult;
use leadbook::shared::ImportConfig;
use mockall::mock;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

mock! {
    pub ContactStore {}

    #[async_trait]
    impl ContactRepository for ContactStore {
        async fn find_by_identity(&self, keys: &[IdentityKey]) -> AppResult<Vec<StoredContact>>;
        async fn apply_import(&self, write: ContactWrite, campaign_ids: &[Uuid]) -> AppResult<Uuid>;
        async fn campaign_ids_for(&self, contact_id: Uuid) -> AppResult<Vec<Uuid>>;
    }
}

pub fn test_config() -> ImportConfig {
    ImportConfig::default()
        .with_max_concurrency(8)
        .with_pair_timeout(Duration::from_secs(5))
}

pub struct MemoryServices {
    pub service: ImportService,
    pub repo: Arc<InMemoryContactRepository>,
}

/// Service over an empty in-memory store
pub fn build_memory_service() -> MemoryServices {
    build_memory_service_with(InMemoryContactRepository::new(), test_config())
}

pub fn build_memory_service_with(repo: InMemoryContactRepository, config: ImportConfig) -> MemoryServices {
    let repo = Arc::new(repo);
    let service = ImportService::new(repo.clone(), config);
    MemoryServices { service, repo }
}

/// Collects every event published on a service's bus
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<ImportEvent>>>,
}

impl EventRecorder {
    pub fn attach(service: &ImportService) -> Self {
        let recorder = Self::default();
        let sink = Arc::clone(&recorder.events);
        service
            .events()
            .subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        recorder
    }

    pub fn events(&self) -> Vec<ImportEvent> {
        self.events.lock().unwrap().clone()
    }
}

/// Delegates to an in-memory store, stalling duplicate re-checks for chosen first names
pub struct SlowRepository {
    inner: Arc<InMemoryContactRepository>,
    slow_names: Vec<String>,
    delay: Duration,
}

impl SlowRepository {
    pub fn new(inner: Arc<InMemoryContactRepository>, slow_names: &[&str], delay: Duration) -> Self {
        Self {
            inner,
            slow_names: slow_names.iter().map(|n| n.to_string()).collect(),
            delay,
        }
    }
}

#[async_trait]
impl ContactRepository for SlowRepository {
    async fn find_by_identity(&self, keys: &[IdentityKey]) -> AppResult<Vec<StoredContact>> {
        if keys.iter().any(|key| self.slow_names.contains(&key.first_name)) {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.find_by_identity(keys).await
    }

    async fn apply_import(&self, write: ContactWrite, campaign_ids: &[Uuid]) -> AppResult<Uuid> {
        self.inner.apply_import(write, campaign_ids).await
    }

    async fn campaign_ids_for(&self, contact_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.inner.campaign_ids_for(contact_id).await
    }
}

/// Yields to the scheduler before every call, like a store behind real I/O
pub struct YieldingRepository {
    inner: Arc<InMemoryContactRepository>,
}

impl YieldingRepository {
    pub fn new(inner: Arc<InMemoryContactRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ContactRepository for YieldingRepository {
    async fn find_by_identity(&self, keys: &[IdentityKey]) -> AppResult<Vec<StoredContact>> {
        tokio::task::yield_now().await;
        self.inner.find_by_identity(keys).await
    }

    async fn apply_import(&self, write: ContactWrite, campaign_ids: &[Uuid]) -> AppResult<Uuid> {
        tokio::task::yield_now().await;
        self.inner.apply_import(write, campaign_ids).await
    }

    async fn campaign_ids_for(&self, contact_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.inner.campaign_ids_for(contact_id).await
    }
}

/// Writes on the blocking pool after a pause, the way the Postgres store does
pub struct BlockingWriteRepository {
    inner: Arc<InMemoryContactRepository>,
    write_delay: Duration,
}

impl BlockingWriteRepository {
    pub fn new(inner: Arc<InMemoryContactRepository>, write_delay: Duration) -> Self {
        Self { inner, write_delay }
    }
}

#[async_trait]
impl ContactRepository for BlockingWriteRepository {
    async fn find_by_identity(&self, keys: &[IdentityKey]) -> AppResult<Vec<StoredContact>> {
        self.inner.find_by_identity(keys).await
    }

    async fn apply_import(&self, write: ContactWrite, campaign_ids: &[Uuid]) -> AppResult<Uuid> {
        let inner = Arc::clone(&self.inner);
        let campaign_ids = campaign_ids.to_vec();
        let delay = self.write_delay;

        tokio::task::spawn_blocking(move || {
            std::thread::sleep(delay);
            futures::executor::block_on(inner.apply_import(write, &campaign_ids))
        })
        .await?
    }

    async fn campaign_ids_for(&self, contact_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.inner.campaign_ids_for(contact_id).await
    }
}

/// Fires a cancellation token after the first completed write
pub struct CancellingRepository {
    inner: Arc<InMemoryContactRepository>,
    token: CancellationToken,
}

impl CancellingRepository {
    pub fn new(inner: Arc<InMemoryContactRepository>, token: CancellationToken) -> Self {
        Self { inner, token }
    }
}

#[async_trait]
impl ContactRepository for CancellingRepository {
    async fn find_by_identity(&self, keys: &[IdentityKey]) -> AppResult<Vec<StoredContact>> {
        self.inner.find_by_identity(keys).await
    }

    async fn apply_import(&self, write: ContactWrite, campaign_ids: &[Uuid]) -> AppResult<Uuid> {
        let id = self.inner.apply_import(write, campaign_ids).await?;
        self.token.cancel();
        Ok(id)
    }

    async fn campaign_ids_for(&self, contact_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.inner.campaign_ids_for(contact_id).await
    }
}
