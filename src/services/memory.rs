use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{Booking, Conversation, WorkerProfile};

/// Process-local store used for development and tests
///
/// Workers keep insertion order so matching over the roster is deterministic.
#[derive(Default)]
pub struct InMemoryStore {
    workers: RwLock<Vec<WorkerProfile>>,
    bookings: RwLock<HashMap<String, Booking>>,
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list_workers(&self) -> Vec<WorkerProfile> {
        self.workers.read().await.clone()
    }

    pub async fn get_worker(&self, id: &str) -> Option<WorkerProfile> {
        self.workers.read().await.iter().find(|w| w.id == id).cloned()
    }

    /// Insert a worker, replacing any profile with the same id in place
    pub async fn put_worker(&self, worker: WorkerProfile) {
        let mut workers = self.workers.write().await;
        match workers.iter_mut().find(|w| w.id == worker.id) {
            Some(existing) => *existing = worker,
            None => workers.push(worker),
        }
    }

    pub async fn get_booking(&self, id: &str) -> Option<Booking> {
        self.bookings.read().await.get(id).cloned()
    }

    pub async fn put_booking(&self, booking: Booking) {
        self.bookings.write().await.insert(booking.id.clone(), booking);
    }

    pub async fn client_bookings(&self, client_id: &str) -> Vec<Booking> {
        self.bookings
            .read()
            .await
            .values()
            .filter(|b| b.client_id == client_id)
            .cloned()
            .collect()
    }

    pub async fn get_conversation(&self, id: &str) -> Option<Conversation> {
        self.conversations.read().await.get(id).cloned()
    }

    pub async fn put_conversation(&self, conversation: Conversation) {
        self.conversations
            .write()
            .await
            .insert(conversation.id.clone(), conversation);
    }
}
