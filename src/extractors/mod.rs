pub mod form;

pub use form::FormSubmission;
