//! Persistence examples: SQL on SQLite, a small ORM-style catalog, batched
//! analytics, and in-process key-value, document and table stores.

pub mod analytics;
pub mod document_store;
pub mod kv_store;
pub mod orm;
pub mod sql_basics;
pub mod table_store;
