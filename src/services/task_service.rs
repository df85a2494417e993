//! Task service layer.

use super::backend::Backend;
use super::by_key;
use super::outputs::FindOutput;
use super::params::{DeleteByIdParams, IdParams, KeyParams, TaskListParams};
use crate::domain::RecordId;
use crate::error::{TwentyApiError, TwentyApiResult};
use crate::models::{EntityKind, Record, TaskFields};
use crate::repositories::FindQuery;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Default page size for task lists.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// A target that could not be attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTargetError {
    /// 0-based position in the request
    pub index: usize,
    #[serde(rename = "type")]
    pub target_type: EntityKind,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreated {
    pub success: bool,

    /// The task with a `targets` array of the created join records
    pub task: Value,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_errors: Option<Vec<TaskTargetError>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskUpdated {
    Updated { success: bool, task: Record },
    NothingToUpdate { updated: bool, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeleted {
    pub success: bool,
    pub task_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub tasks: Vec<Record>,
    pub total_count: usize,
    pub has_next_page: bool,
}

/// Task operations.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Create a task, then attach its targets one by one.
    async fn create(&self, fields: TaskFields) -> TwentyApiResult<TaskCreated>;

    /// Patch a task by id. An empty patch is a soft no-op.
    async fn update(&self, params: IdParams<TaskFields>) -> TwentyApiResult<TaskUpdated>;

    async fn delete(&self, params: DeleteByIdParams) -> TwentyApiResult<TaskDeleted>;

    /// Find by title, custom field or id.
    async fn find(&self, params: KeyParams) -> TwentyApiResult<FindOutput>;

    async fn list(&self, params: TaskListParams) -> TwentyApiResult<TaskList>;
}

/// Default implementation of TaskService.
pub struct TaskServiceImpl {
    backend: Backend,
}

impl TaskServiceImpl {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl TaskService for TaskServiceImpl {
    async fn create(&self, fields: TaskFields) -> TwentyApiResult<TaskCreated> {
        let payload = fields.to_create_payload()?;
        let task = self.backend.records.create(EntityKind::Task, &payload).await?;
        let task_id = task
            .id()
            .map(str::to_string)
            .ok_or_else(|| TwentyApiError::Other("created task has no id".into()))?;

        let mut created = Vec::new();
        let mut errors = Vec::new();
        for (index, target) in fields.targets.iter().enumerate() {
            let result = match target.to_payload("taskId", &task_id) {
                Ok(payload) => self
                    .backend
                    .records
                    .create(EntityKind::TaskTarget, &payload)
                    .await,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(record) => {
                    let mut fields = record.fields().clone();
                    fields.insert(
                        "targetType".into(),
                        Value::String(target.kind().singular().into()),
                    );
                    created.push(Value::Object(fields));
                }
                Err(e) => {
                    warn!("Task target {} failed: {}", index, e);
                    errors.push(TaskTargetError {
                        index,
                        target_type: target.kind(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let mut task_value = task.fields().clone();
        task_value.insert("targets".into(), Value::Array(created));

        Ok(TaskCreated {
            success: true,
            task: Value::Object(task_value),
            task_id,
            target_errors: (!errors.is_empty()).then_some(errors),
        })
    }

    async fn update(&self, params: IdParams<TaskFields>) -> TwentyApiResult<TaskUpdated> {
        let id = RecordId::for_field(params.id.as_str(), "taskId")?;
        let patch = params.fields.to_patch()?;
        if patch.is_empty() {
            return Ok(TaskUpdated::NothingToUpdate {
                updated: false,
                message: "No fields to update provided".into(),
            });
        }

        let task = self.backend.records.update(EntityKind::Task, &id, &patch).await?;
        Ok(TaskUpdated::Updated {
            success: true,
            task,
        })
    }

    async fn delete(&self, params: DeleteByIdParams) -> TwentyApiResult<TaskDeleted> {
        let id = RecordId::for_field(params.id, "taskId")?;
        let task_id = self.backend.records.delete(EntityKind::Task, &id).await?;
        Ok(TaskDeleted {
            success: true,
            task_id,
        })
    }

    async fn find(&self, params: KeyParams) -> TwentyApiResult<FindOutput> {
        by_key::find(&self.backend, EntityKind::Task, &params).await
    }

    async fn list(&self, params: TaskListParams) -> TwentyApiResult<TaskList> {
        let query = FindQuery::new(None, params.limit.unwrap_or(DEFAULT_LIST_LIMIT));
        let page = self.backend.records.find(EntityKind::Task, &query).await?;
        Ok(TaskList {
            tasks: page.records,
            total_count: page.total_count,
            has_next_page: page.has_next_page,
        })
    }
}
