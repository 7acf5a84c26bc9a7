//! HTTP handlers for the generated CRUD endpoints.

pub mod entity;
pub use entity::*;
