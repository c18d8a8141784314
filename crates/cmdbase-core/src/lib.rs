//! cmdbase Core - CRUD lifecycle for dynamically-typed model instances
//!
//! This crate manages configuration item instances (hosts, generic assets,
//! and their attributes) in a document store, including:
//! - Dynamic, schema-less instance payloads with typed accessor helpers
//! - Tenant/owner scoping on every read and write
//! - A table router dispatching object types to storage targets
//! - Association-guarded deletion and explicit cascade delete
//! - Bind-ip propagation keeping process bind addresses in sync with their
//!   host's network address
//!
//! The validation rule engine and the association subsystem are consumed as
//! traits ([`gateway`]); the document store is pluggable ([`store`]), with
//! an in-memory implementation here and a SQLite one in `cmdbase-store`.

pub mod errors;
pub mod filter;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod ops;
pub mod router;
pub mod store;

// Re-export commonly used types
pub use errors::{CmdbError, CmdbErrorKind, Result};
pub use gateway::{
    AcceptAll, AssociationGuard, NoAssociations, ValidationError, ValidationGateway,
};
pub use model::{
    BindIpKind, CreateManyResult, CreatedInstance, DeletedCount, Document, ExceptionRecord,
    Instance, Label, Page, QueryResult, UpdatedCount,
};
pub use router::{resolve, TableRoute};
pub use store::{DocStore, FindOptions, MemoryStore};
