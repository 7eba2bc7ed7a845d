//! Records admin: schema-driven REST data layer for the scientific records admin UI.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod extractors;
pub mod form;
pub mod response;
pub mod state;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::{
    load_from_dir, parse_entities, resolve, BindingOptions, EntityConfig, FieldType, FormPolicy, LoaderPolicy,
    ResolvedEntity, ResolvedModel, ResponsePolicy, Schema, SchemaElement, Settings,
};
pub use error::{AppError, ConfigError, RawResponse};
pub use form::{FileBlob, FormPairs, FormValue, SubmissionForm, SubmissionValue};
pub use handlers::{ActionRequest, EntityBinding, LoaderRequest, RouteParams};
pub use response::{success_one, success_many};
pub use routes::{common_routes, entity_routes};
pub use service::{parse_form_data, ClientConfig, Removed, ResourceClient};
pub use state::AppState;
