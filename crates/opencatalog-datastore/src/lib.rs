//! Index DDL generation for the tabular datastore.
//!
//! When a resource's rows are pushed into the datastore, each table gets a
//! full-text index over the whole row plus one per textual column. This
//! crate builds those statements; executing them is the job of a
//! [`DatastoreConnection`] implementation owned by the caller.

mod connection;
mod fields;
mod indexing;

pub use connection::{DatastoreConnection, DatastoreError, Statement};
pub use fields::{Field, FieldType};
pub use indexing::{DEFAULT_FTS_LANG, IndexRequest, create_indexes};
