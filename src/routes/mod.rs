pub mod entity;
pub mod status;

pub use entity::entity_routes;
pub use status::{status_routes, BoundModel};
