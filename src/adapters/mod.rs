// src/adapters/mod.rs
pub mod memory;
pub mod postgres;

pub use memory::MemoryAdapter;
pub use postgres::{PostgresAdapter, PostgresRegistryAdapter, PostgresSchemaRegistryAdapter};
