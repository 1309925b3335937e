//! In-memory storage backend.
//!
//! Lock-free maps hold the entities; a single `RwLock` guards the
//! append-only activity log. Intended for tests and single-node
//! deployments without a database.

mod storage;

pub use storage::InMemoryStorage;
