mod graphql_repository;
mod response;
mod rest_repository;
mod schema_repository;
mod traits;

pub use graphql_repository::GraphqlRecordRepository;
pub use rest_repository::RestRecordRepository;
pub use schema_repository::GraphqlSchemaRepository;
pub use traits::{FindQuery, RecordRepository, SchemaRepository};
