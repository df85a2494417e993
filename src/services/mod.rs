//! Application service layer.
//!
//! One service per entity kind. Services validate parameters, run lookups
//! through the unified finder, and shape results for the batch executor.
//! They share a [`Backend`] holding the repositories.

mod backend;
mod by_key;
mod company_service;
mod merge;
mod note_service;
mod opportunity_service;
mod outputs;
mod params;
mod person_service;
mod reconciler;
mod references;
mod task_service;

pub use backend::Backend;
pub use company_service::{
    CompanyService, CompanyServiceImpl, DELETE_MIN_CONFIDENCE, UPDATE_MIN_CONFIDENCE,
};
pub use merge::merge_patch;
pub use note_service::{NoteCreated, NoteDeleted, NoteList, NoteService, NoteServiceImpl, NoteUpdated, TargetError};
pub use opportunity_service::{OpportunityList, OpportunityService, OpportunityServiceImpl};
pub use outputs::{CreateOutput, DeleteOutput, FindOutput, Keyed, UpdateOutput};
pub use params::{
    CompanySearchBy, DeleteByIdParams, IdParams, KeyParams, ListByCompanyParams, ListNotesBy,
    NoteListParams, OpportunityListParams, TaskListParams, UpdateParams,
};
pub use person_service::{PeopleByCompany, PersonService, PersonServiceImpl, SyncAction, SyncOutput};
pub use reconciler::{ReconcileAction, Reconciled, Reconciler};
pub use task_service::{
    TaskCreated, TaskDeleted, TaskList, TaskService, TaskServiceImpl, TaskTargetError, TaskUpdated,
};
