//! Domain value objects and types.
//!
//! This module contains type-safe wrappers for record ids, email addresses
//! and company domains. These value objects validate at construction time so
//! malformed input is rejected before any request is built.

pub mod domain_name;
pub mod email;
pub mod errors;
pub mod record_id;

pub use domain_name::DomainName;
pub use email::EmailAddress;
pub use errors::ValidationError;
pub use record_id::{is_valid_uuid, prepare_payload, RecordId};
