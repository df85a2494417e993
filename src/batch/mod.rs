//! Batch execution.
//!
//! A batch is an ordered list of `{resource, operation, params}` items. Items
//! run one after another; each produces one JSON output. With
//! `continue_on_fail` a failing item yields an error object and the batch
//! moves on, otherwise the first failure aborts it.

mod request;

pub use request::{BatchRequest, Operation};

use crate::domain::ValidationError;
use crate::error::TwentyApiResult;
use crate::services::{
    Backend, CompanyService, CompanyServiceImpl, NoteService, NoteServiceImpl, OpportunityService,
    OpportunityServiceImpl, PersonService, PersonServiceImpl, TaskService, TaskServiceImpl,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, error};

/// Runs batch items against the entity services.
pub struct BatchExecutor {
    person: Arc<dyn PersonService>,
    company: Arc<dyn CompanyService>,
    opportunity: Arc<dyn OpportunityService>,
    note: Arc<dyn NoteService>,
    task: Arc<dyn TaskService>,
    continue_on_fail: bool,
}

impl BatchExecutor {
    /// Build an executor with the default service implementations.
    pub fn new(backend: Backend, continue_on_fail: bool) -> Self {
        Self {
            person: Arc::new(PersonServiceImpl::new(backend.clone())),
            company: Arc::new(CompanyServiceImpl::new(backend.clone())),
            opportunity: Arc::new(OpportunityServiceImpl::new(backend.clone())),
            note: Arc::new(NoteServiceImpl::new(backend.clone())),
            task: Arc::new(TaskServiceImpl::new(backend)),
            continue_on_fail,
        }
    }

    /// Run every item in order.
    ///
    /// # Errors
    /// The first failing item's error, unless `continue_on_fail` is set.
    pub async fn run(&self, requests: Vec<BatchRequest>) -> TwentyApiResult<Vec<Value>> {
        let mut outputs = Vec::with_capacity(requests.len());

        for (index, request) in requests.into_iter().enumerate() {
            debug!("Batch item {}: {}", index, request.pair());
            match self.execute(&request).await {
                Ok(output) => outputs.push(output),
                Err(e) if self.continue_on_fail => {
                    error!("Batch item {} ({}) failed: {}", index, request.pair(), e);
                    outputs.push(json!({
                        "error": e.to_string(),
                        "resource": request.resource,
                        "operation": request.operation,
                        "success": false,
                    }));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outputs)
    }

    /// Run a single item.
    pub async fn execute(&self, request: &BatchRequest) -> TwentyApiResult<Value> {
        let op = Operation::parse(&request.resource, &request.operation)?;
        let params = &request.params;

        match op {
            Operation::PersonFind => to_json(self.person.find(decode(params)?).await?),
            Operation::PersonCreate => to_json(self.person.create(decode(params)?).await?),
            Operation::PersonUpdate => to_json(self.person.update(decode(params)?).await?),
            Operation::PersonDelete => to_json(self.person.delete(decode(params)?).await?),
            Operation::PersonListByCompany => {
                to_json(self.person.list_by_company(decode(params)?).await?)
            }
            Operation::PersonSync => to_json(self.person.sync(decode(params)?).await?),
            Operation::CompanyFind => to_json(self.company.find(decode(params)?).await?),
            Operation::CompanyCreate => to_json(self.company.create(decode(params)?).await?),
            Operation::CompanyUpdate => to_json(self.company.update(decode(params)?).await?),
            Operation::CompanyDelete => to_json(self.company.delete(decode(params)?).await?),
            Operation::OpportunityFind => to_json(self.opportunity.find(decode(params)?).await?),
            Operation::OpportunityCreate => {
                to_json(self.opportunity.create(decode(params)?).await?)
            }
            Operation::OpportunityUpdate => {
                to_json(self.opportunity.update(decode(params)?).await?)
            }
            Operation::OpportunityDelete => {
                to_json(self.opportunity.delete(decode(params)?).await?)
            }
            Operation::OpportunityList => to_json(self.opportunity.list(decode(params)?).await?),
            Operation::NoteCreate => to_json(self.note.create(decode(params)?).await?),
            Operation::NoteUpdate => to_json(self.note.update(decode(params)?).await?),
            Operation::NoteDelete => to_json(self.note.delete(decode(params)?).await?),
            Operation::NoteList => to_json(self.note.list(decode(params)?).await?),
            Operation::TaskCreate => to_json(self.task.create(decode(params)?).await?),
            Operation::TaskUpdate => to_json(self.task.update(decode(params)?).await?),
            Operation::TaskDelete => to_json(self.task.delete(decode(params)?).await?),
            Operation::TaskFind => to_json(self.task.find(decode(params)?).await?),
            Operation::TaskList => to_json(self.task.list(decode(params)?).await?),
        }
    }
}

/// Decode operation parameters; missing params count as `{}`.
fn decode<T: DeserializeOwned>(params: &Value) -> Result<T, ValidationError> {
    let params = match params {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(params).map_err(|e| ValidationError::InvalidParameters(e.to_string()))
}

fn to_json<T: Serialize>(output: T) -> TwentyApiResult<Value> {
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::KeyParams;

    #[test]
    fn test_decode_reports_invalid_parameters() {
        let err = decode::<KeyParams>(&json!({"searchBy": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidParameters(_)));
    }

    #[test]
    fn test_decode_null_as_empty_object() {
        let params: crate::services::TaskListParams = decode(&Value::Null).unwrap();
        assert_eq!(params.limit, None);
    }
}
