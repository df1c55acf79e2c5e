//! msgstore — embedded persistence for a messaging backend.
//!
//! One serialized SQLite connection per store, wrapped with a stepwise
//! schema-migration engine, a bounded cache of precompiled statements,
//! a nesting-counted transaction mechanism and a typed key/value
//! configuration store. Message parsing, encryption and transport live
//! in collaborator crates that read and write rows through this layer.

pub mod error;
pub mod storage;

pub use error::{Result, StoreError};
pub use storage::{Database, DatabaseGuard, OpenMode, SCHEMA_VERSION, Stmt};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
