pub mod mock_record_repository;
pub mod mock_schema_repository;

#[allow(unused_imports)]
pub use mock_record_repository::MockRecordRepository;
#[allow(unused_imports)]
pub use mock_schema_repository::MockSchemaRepository;
