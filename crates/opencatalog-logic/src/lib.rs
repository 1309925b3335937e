//! Action layer for the catalog.
//!
//! Update operations are exposed twice: as typed methods on
//! [`CatalogActions`] and through the string-keyed [`CatalogActions::call`]
//! dispatch boundary used by API plumbing and tests. Payloads are sparse
//! JSON objects; results are dictized JSON objects.
//!
//! The membership reconciler in [`reconcile`] implements the tri-state
//! relation-update contract for group aggregates: an absent payload key
//! preserves the stored relation, an empty list clears it, and a non-empty
//! list replaces it wholesale.

pub mod action;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod reconcile;
mod schema;

pub use action::{NoopNotificationSender, NotificationSender};
pub use context::{Context, PayloadValidator};
pub use dispatch::CatalogActions;
pub use error::{FieldError, LogicError};
pub use reconcile::{EntityRef, ExtraItem, MembershipUpdate, Reconciler};
