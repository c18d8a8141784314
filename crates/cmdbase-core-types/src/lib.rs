//! Core types shared across cmdbase facilities
//!
//! This crate provides foundational types used by the instance core,
//! the store backends, and the logging facility:
//!
//! - **Correlation types**: OwnerId, RequestId, RequestContext
//! - **Schema constants**: Canonical document field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{OwnerId, RequestContext, RequestId};
