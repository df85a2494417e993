//! Data models for Twenty CRM entities.
//!
//! Records fetched from the backend are kept as opaque JSON ([`Record`]).
//! Caller input arrives as flat per-entity field structs which know how to
//! build the nested payload shapes the backend mutations expect.

pub mod activity;
pub mod company;
pub mod entity;
pub mod opportunity;
pub mod payload;
pub mod person;
pub mod record;

pub use activity::{ActivityTarget, NoteFields, TaskFields};
pub use company::CompanyFields;
pub use entity::EntityKind;
pub use opportunity::OpportunityFields;
pub use payload::{validate_date, CustomFieldValue};
pub use person::PersonFields;
pub use record::{Record, RecordPage};
