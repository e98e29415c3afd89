//! PostgreSQL adapters - Database implementations for repository ports.

mod call_record_repository;

pub use call_record_repository::PostgresCallRecordRepository;
