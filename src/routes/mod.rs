pub mod common;
pub mod entity;

pub use common::common_routes;
pub use entity::entity_routes;
