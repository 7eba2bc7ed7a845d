//! Loader/action bindings and the HTTP handlers that expose them.

pub mod binding;
pub mod entity;
pub use binding::*;
pub use entity::*;
