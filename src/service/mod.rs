pub mod client;
pub mod serializer;

pub use client::{ClientConfig, Removed, ResourceClient};
pub use serializer::{parse_form_data, parse_form_data_strict, parse_form_data_tolerant};
