//! In-memory adapters for tests and local development.

mod in_memory_call_record_repository;

pub use in_memory_call_record_repository::InMemoryCallRecordRepository;
