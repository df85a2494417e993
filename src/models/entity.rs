//! Entity kinds known to the Twenty schema.

use crate::domain::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of records this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Person,
    Company,
    Opportunity,
    Note,
    Task,
    NoteTarget,
    TaskTarget,
    WorkspaceMember,
}

impl EntityKind {
    /// Singular API name (`person`, `noteTarget`).
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Company => "company",
            Self::Opportunity => "opportunity",
            Self::Note => "note",
            Self::Task => "task",
            Self::NoteTarget => "noteTarget",
            Self::TaskTarget => "taskTarget",
            Self::WorkspaceMember => "workspaceMember",
        }
    }

    /// Plural API name, used for collection queries and REST paths.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Person => "people",
            Self::Company => "companies",
            Self::Opportunity => "opportunities",
            Self::Note => "notes",
            Self::Task => "tasks",
            Self::NoteTarget => "noteTargets",
            Self::TaskTarget => "taskTargets",
            Self::WorkspaceMember => "workspaceMembers",
        }
    }

    /// GraphQL object type name (`Person`, `NoteTarget`).
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Company => "Company",
            Self::Opportunity => "Opportunity",
            Self::Note => "Note",
            Self::Task => "Task",
            Self::NoteTarget => "NoteTarget",
            Self::TaskTarget => "TaskTarget",
            Self::WorkspaceMember => "WorkspaceMember",
        }
    }

    /// Human-readable label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Company => "Company",
            Self::Opportunity => "Opportunity",
            Self::Note => "Note",
            Self::Task => "Task",
            Self::NoteTarget => "Note target",
            Self::TaskTarget => "Task target",
            Self::WorkspaceMember => "Workspace member",
        }
    }

    /// Field that carries the record's display name.
    pub fn name_field(&self) -> Option<&'static str> {
        match self {
            Self::Company | Self::Opportunity => Some("name"),
            Self::Note | Self::Task => Some("title"),
            _ => None,
        }
    }

    /// Default GraphQL selection set.
    pub fn selection(&self) -> &'static str {
        match self {
            Self::Person => {
                "id name { firstName lastName } emails { primaryEmail } \
                 phones { primaryPhoneNumber primaryPhoneCountryCode primaryPhoneCallingCode } \
                 jobTitle city avatarUrl position companyId \
                 linkedinLink { primaryLinkUrl } xLink { primaryLinkUrl } createdAt updatedAt"
            }
            Self::Company => {
                "id name domainName { primaryLinkUrl } employees \
                 address { addressStreet1 addressStreet2 addressCity addressPostcode addressState addressCountry } \
                 annualRecurringRevenue { amountMicros currencyCode } \
                 linkedinLink { primaryLinkUrl } xLink { primaryLinkUrl } accountOwnerId createdAt updatedAt"
            }
            Self::Opportunity => {
                "id name amount { amountMicros currencyCode } closeDate stage \
                 companyId pointOfContactId createdAt updatedAt"
            }
            Self::Note => "id title bodyV2 { markdown } createdAt updatedAt",
            Self::Task => {
                "id title bodyV2 { markdown } dueAt status position assigneeId createdAt updatedAt"
            }
            Self::NoteTarget => "id noteId personId companyId opportunityId",
            Self::TaskTarget => "id taskId personId companyId opportunityId",
            Self::WorkspaceMember => "id name { firstName lastName } userEmail",
        }
    }

    /// Extra selection used when related records are requested.
    pub fn related_selection(&self) -> Option<&'static str> {
        match self {
            Self::Person => Some("company { id name domainName { primaryLinkUrl } }"),
            Self::Company => Some(
                "people { edges { node { id name { firstName lastName } emails { primaryEmail } } } }",
            ),
            Self::Opportunity => Some(
                "company { id name } pointOfContact { id name { firstName lastName } }",
            ),
            Self::NoteTarget => Some("note { id title bodyV2 { markdown } createdAt updatedAt }"),
            Self::TaskTarget => Some("task { id title status dueAt }"),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.singular())
    }
}

impl FromStr for EntityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" | "people" => Ok(Self::Person),
            "company" | "companies" => Ok(Self::Company),
            "opportunity" | "opportunities" => Ok(Self::Opportunity),
            "note" | "notes" => Ok(Self::Note),
            "task" | "tasks" => Ok(Self::Task),
            "noteTarget" => Ok(Self::NoteTarget),
            "taskTarget" => Ok(Self::TaskTarget),
            "workspaceMember" => Ok(Self::WorkspaceMember),
            other => Err(ValidationError::UnknownOperation(other.to_string())),
        }
    }
}
