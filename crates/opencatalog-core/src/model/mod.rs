mod group;
mod package;
mod resource_view;
mod user;

pub use group::{Extra, Group};
pub use package::{Package, Resource};
pub use resource_view::ResourceView;
pub use user::{Password, User};
