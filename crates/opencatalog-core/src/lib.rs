pub mod activity;
pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod time;

pub use activity::Activity;
pub use entity::EntityType;
pub use error::{CoreError, Result};
pub use id::{NameError, generate_id, validate_name};
pub use model::{Extra, Group, Package, Password, Resource, ResourceView, User};
pub use time::{CatalogDateTime, now_utc};
