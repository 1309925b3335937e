//! Storage abstraction for the catalog.
//!
//! Defines the [`CatalogStorage`] trait that all storage backends
//! implement, together with the storage error types. Backends persist the
//! typed entities from `opencatalog-core`; the action layer never talks to
//! a concrete backend directly.

pub mod error;
pub mod traits;

pub use error::{ErrorCategory, StorageError};
pub use traits::CatalogStorage;
