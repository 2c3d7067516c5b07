use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use super::appwrite::{AppwriteClient, AppwriteError};
use super::cache::{CacheKey, CacheManager};
use super::memory::InMemoryStore;
use crate::models::{Booking, BookingStatus, BookingUpdate, ChatMessage, Conversation, WorkerProfile};

/// Errors surfaced by the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Appwrite(#[from] AppwriteError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Where records actually live
pub enum Backend {
    Memory(InMemoryStore),
    Appwrite(AppwriteClient),
}

/// Record store shared by all request handlers
///
/// Worker reads go through the cache; every worker write invalidates it.
/// A read only fills the cache if no write happened while it was loading.
pub struct Store {
    backend: Backend,
    cache: CacheManager,
    worker_generation: AtomicU64,
}

impl Store {
    pub fn new(backend: Backend, cache: CacheManager) -> Self {
        Self {
            backend,
            cache,
            worker_generation: AtomicU64::new(0),
        }
    }

    pub fn in_memory(cache: CacheManager) -> Self {
        Self::new(Backend::Memory(InMemoryStore::new()), cache)
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::Appwrite(_) => "appwrite",
        }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Whole worker roster, in stored order
    pub async fn list_workers(&self) -> Result<Vec<WorkerProfile>, StoreError> {
        let key = CacheKey::roster();
        match self.cache.get::<Vec<WorkerProfile>>(&key).await {
            Ok(Some(workers)) => return Ok(workers),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable cached roster: {}", e),
        }

        let generation = self.worker_generation();
        let workers = match &self.backend {
            Backend::Memory(store) => store.list_workers().await,
            Backend::Appwrite(client) => client.list_workers().await?,
        };
        tracing::debug!("Loaded {} workers from {}", workers.len(), self.backend_name());

        self.cache_workers(&key, &workers, generation).await;
        Ok(workers)
    }

    pub async fn get_worker(&self, id: &str) -> Result<Option<WorkerProfile>, StoreError> {
        let key = CacheKey::worker(id);
        match self.cache.get::<WorkerProfile>(&key).await {
            Ok(Some(worker)) => return Ok(Some(worker)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable cached worker {}: {}", id, e),
        }

        let generation = self.worker_generation();
        let worker = match &self.backend {
            Backend::Memory(store) => store.get_worker(id).await,
            Backend::Appwrite(client) => client.get_worker(id).await?,
        };

        if let Some(worker) = &worker {
            self.cache_workers(&key, worker, generation).await;
        }
        Ok(worker)
    }

    fn worker_generation(&self) -> u64 {
        self.worker_generation.load(Ordering::Acquire)
    }

    fn invalidate_workers(&self) {
        self.worker_generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
    }

    /// Cache a worker read unless a write has bumped the generation since
    /// `generation` was taken. A write landing between this check and the
    /// insert can still leave a stale entry until the TTL expires.
    async fn cache_workers<T: Serialize>(&self, key: &str, value: &T, generation: u64) {
        if self.worker_generation() != generation {
            tracing::debug!("Worker data changed while loading {}, not caching", key);
            return;
        }
        if let Err(e) = self.cache.set(key, value).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
    }

    /// Store a worker, assigning an id and timestamps when missing
    pub async fn add_worker(&self, mut worker: WorkerProfile) -> Result<WorkerProfile, StoreError> {
        if worker.id.is_empty() {
            worker.id = uuid::Uuid::new_v4().to_string();
        }
        let now = Utc::now();
        worker.created_at.get_or_insert(now);
        worker.updated_at = Some(now);

        match &self.backend {
            Backend::Memory(store) => store.put_worker(worker.clone()).await,
            Backend::Appwrite(client) => client.create_worker(&worker).await?,
        }

        self.invalidate_workers();
        Ok(worker)
    }

    /// Add the given workers unless the roster already has some.
    /// Returns how many were added.
    pub async fn seed(&self, workers: Vec<WorkerProfile>) -> Result<usize, StoreError> {
        self.invalidate_workers();

        let existing = self.list_workers().await?;
        if !existing.is_empty() {
            tracing::info!("Store already holds {} workers, skipping seed", existing.len());
            return Ok(0);
        }

        let mut added = 0;
        for worker in workers {
            self.add_worker(worker).await?;
            added += 1;
        }

        tracing::info!("Seeded {} workers", added);
        Ok(added)
    }

    pub async fn create_booking(&self, mut booking: Booking) -> Result<Booking, StoreError> {
        if booking.id.is_empty() {
            booking.id = uuid::Uuid::new_v4().to_string();
        }

        match &self.backend {
            Backend::Memory(store) => store.put_booking(booking.clone()).await,
            Backend::Appwrite(client) => client.create_booking(&booking).await?,
        }

        tracing::debug!("Created booking {} for client {}", booking.id, booking.client_id);
        Ok(booking)
    }

    pub async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(match &self.backend {
            Backend::Memory(store) => store.get_booking(id).await,
            Backend::Appwrite(client) => client.get_booking(id).await?,
        })
    }

    pub async fn update_booking(&self, id: &str, update: BookingUpdate) -> Result<Booking, StoreError> {
        let mut booking = self
            .get_booking(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("booking {}", id)))?;

        booking.apply(update);

        match &self.backend {
            Backend::Memory(store) => store.put_booking(booking.clone()).await,
            Backend::Appwrite(client) => client.update_booking(&booking).await?,
        }
        Ok(booking)
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, StoreError> {
        let update = BookingUpdate {
            status: Some(BookingStatus::Cancelled),
            ..Default::default()
        };
        self.update_booking(id, update).await
    }

    /// A client's bookings ordered by start time
    pub async fn list_client_bookings(&self, client_id: &str) -> Result<Vec<Booking>, StoreError> {
        let mut bookings = match &self.backend {
            Backend::Memory(store) => store.client_bookings(client_id).await,
            Backend::Appwrite(client) => client.list_client_bookings(client_id).await?,
        };
        bookings.sort_by_key(|b| b.start_time);
        Ok(bookings)
    }

    pub async fn create_conversation(&self, conversation: Conversation) -> Result<Conversation, StoreError> {
        match &self.backend {
            Backend::Memory(store) => store.put_conversation(conversation.clone()).await,
            Backend::Appwrite(client) => client.create_conversation(&conversation).await?,
        }
        Ok(conversation)
    }

    pub async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        Ok(match &self.backend {
            Backend::Memory(store) => store.get_conversation(id).await,
            Backend::Appwrite(client) => client.get_conversation(id).await?,
        })
    }

    pub async fn update_conversation(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let mut conversation = conversation.clone();
        conversation.updated_at = Utc::now();

        match &self.backend {
            Backend::Memory(store) => store.put_conversation(conversation).await,
            Backend::Appwrite(client) => client.update_conversation(&conversation).await?,
        }
        Ok(())
    }

    pub async fn add_chat_message(
        &self,
        conversation_id: &str,
        message: ChatMessage,
    ) -> Result<Conversation, StoreError> {
        let mut conversation = self
            .get_conversation(conversation_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("conversation {}", conversation_id)))?;

        conversation.messages.push(message);
        self.update_conversation(&conversation).await?;
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sender;
    use crate::services::seed::sample_workers;
    use chrono::{Duration, TimeZone};

    fn store() -> Store {
        Store::in_memory(CacheManager::new(100, 60))
    }

    fn booking(client_id: &str, hour: u32) -> Booking {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap();
        Booking {
            id: String::new(),
            client_id: client_id.to_string(),
            psw_id: "psw-001".to_string(),
            start_time: start,
            end_time: start + Duration::hours(2),
            service_type: "General Support".to_string(),
            status: BookingStatus::Confirmed,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = store();
        assert_eq!(store.seed(sample_workers()).await.unwrap(), 5);
        assert_eq!(store.seed(sample_workers()).await.unwrap(), 0);
        assert_eq!(store.list_workers().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_add_worker_invalidates_roster() {
        let store = store();
        assert!(store.list_workers().await.unwrap().is_empty());

        let mut worker = sample_workers().remove(0);
        worker.id = String::new();
        let stored = store.add_worker(worker).await.unwrap();

        assert!(!stored.id.is_empty());
        assert!(stored.created_at.is_some());
        assert_eq!(store.list_workers().await.unwrap().len(), 1);
        assert_eq!(store.get_worker(&stored.id).await.unwrap().unwrap().name, "Sarah Johnson");
    }

    #[tokio::test]
    async fn test_unreadable_cached_worker_falls_back_to_backend() {
        let store = store();
        store.seed(sample_workers()).await.unwrap();

        store
            .cache()
            .set(&CacheKey::worker("psw-001"), &"not a worker")
            .await
            .unwrap();

        let worker = store.get_worker("psw-001").await.unwrap().unwrap();
        assert_eq!(worker.name, "Sarah Johnson");
        let cached: Option<WorkerProfile> = store.cache().get(&CacheKey::worker("psw-001")).await.unwrap();
        assert_eq!(cached.map(|w| w.id), Some("psw-001".to_string()));
    }

    #[tokio::test]
    async fn test_read_overlapping_write_is_not_cached() {
        let store = store();
        let generation = store.worker_generation();
        let stale_roster: Vec<WorkerProfile> = Vec::new();

        store.add_worker(sample_workers().remove(0)).await.unwrap();
        store
            .cache_workers(&CacheKey::roster(), &stale_roster, generation)
            .await;

        let cached: Option<Vec<WorkerProfile>> = store.cache().get(&CacheKey::roster()).await.unwrap();
        assert!(cached.is_none());
        assert_eq!(store.list_workers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_booking_lifecycle() {
        let store = store();
        let later = store.create_booking(booking("client-1", 14)).await.unwrap();
        let earlier = store.create_booking(booking("client-1", 9)).await.unwrap();
        store.create_booking(booking("client-2", 9)).await.unwrap();

        let listed = store.list_client_bookings("client-1").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec![earlier.id.as_str(), later.id.as_str()]);

        let updated = store
            .update_booking(
                &later.id,
                BookingUpdate {
                    notes: Some("Ring the bell twice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Ring the bell twice"));
        assert_eq!(updated.status, BookingStatus::Confirmed);

        let cancelled = store.cancel_booking(&later.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.notes.as_deref(), Some("Ring the bell twice"));
    }

    #[tokio::test]
    async fn test_update_missing_booking() {
        let result = store().cancel_booking("missing").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_chat_message() {
        let store = store();
        let conversation = store.create_conversation(Conversation::new("client-1")).await.unwrap();

        let message = ChatMessage::new(&conversation.id, Sender::Client, "Hello");
        let updated = store.add_chat_message(&conversation.id, message).await.unwrap();
        assert_eq!(updated.messages.len(), 1);

        let stored = store.get_conversation(&conversation.id).await.unwrap().unwrap();
        assert_eq!(stored.messages[0].content, "Hello");

        let orphan = ChatMessage::new("missing", Sender::Client, "Hi");
        assert!(store.add_chat_message("missing", orphan).await.is_err());
    }
}
