// Service exports
pub mod appwrite;
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use appwrite::{AppwriteError, AppwriteStore};
pub use cache::{CacheKey, CachedStore};
pub use memory::MemoryStore;
pub use postgres::{PostgresError, PostgresStore};
pub use store::{to_document, Collection, DocumentStore, Filter, StoreError, StoredDocument};
