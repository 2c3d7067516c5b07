// Service exports
pub mod appwrite;
pub mod cache;
pub mod memory;
pub mod seed;
pub mod store;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use memory::InMemoryStore;
pub use seed::sample_workers;
pub use store::{Backend, Store, StoreError};
