//! External collaborator traits
//!
//! The instance core consumes two collaborators it does not implement: the
//! validation rule engine deciding whether field values are acceptable, and
//! the association subsystem tracking references between instances. Both
//! are injected as trait objects per operation; the provided default impls
//! accept everything and report no associations.

use thiserror::Error;

use cmdbase_core_types::RequestContext;

use crate::errors::Result;
use crate::model::{Instance, Label};

/// Structured rejection from the validation gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ValidationError {
    /// The offending field, when the rule engine can name one
    pub field: Option<String>,
    pub reason: String,
}

impl ValidationError {
    /// A rejection not tied to a single field
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            field: None,
            reason: reason.into(),
        }
    }

    /// A rejection of one named field
    pub fn for_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            reason: reason.into(),
        }
    }
}

/// Decides whether a candidate instance's field values are acceptable
pub trait ValidationGateway {
    /// Validate a candidate instance before insert
    fn validate_create(
        &self,
        ctx: &RequestContext,
        object_type: &str,
        data: &Instance,
    ) -> std::result::Result<(), ValidationError>;

    /// Validate a patch against one original instance
    ///
    /// `original` is an isolated copy of the specific pre-update instance,
    /// so rules may depend on prior values. `label` carries the business
    /// scoping extracted from the update condition. `can_edit_all` lifts
    /// field-level edit restrictions for privileged callers.
    fn validate_update(
        &self,
        ctx: &RequestContext,
        object_type: &str,
        patch: &Instance,
        label: &Label,
        original: &Instance,
        can_edit_all: bool,
    ) -> std::result::Result<(), ValidationError>;
}

/// Gateway that accepts every instance and patch
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ValidationGateway for AcceptAll {
    fn validate_create(
        &self,
        _ctx: &RequestContext,
        _object_type: &str,
        _data: &Instance,
    ) -> std::result::Result<(), ValidationError> {
        Ok(())
    }

    fn validate_update(
        &self,
        _ctx: &RequestContext,
        _object_type: &str,
        _patch: &Instance,
        _label: &Label,
        _original: &Instance,
        _can_edit_all: bool,
    ) -> std::result::Result<(), ValidationError> {
        Ok(())
    }
}

/// Reports and removes associations referencing an instance
///
/// Associations live outside this core; only existence checks and bulk
/// removal are needed here.
pub trait AssociationGuard {
    /// Whether any association still references the instance
    fn has_associations(
        &self,
        ctx: &RequestContext,
        object_type: &str,
        instance_id: u64,
    ) -> Result<bool>;

    /// Delete every association referencing the instance
    fn delete_associations(
        &mut self,
        ctx: &RequestContext,
        object_type: &str,
        instance_id: u64,
    ) -> Result<()>;
}

/// Guard for deployments without association tracking
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssociations;

impl AssociationGuard for NoAssociations {
    fn has_associations(
        &self,
        _ctx: &RequestContext,
        _object_type: &str,
        _instance_id: u64,
    ) -> Result<bool> {
        Ok(false)
    }

    fn delete_associations(
        &mut self,
        _ctx: &RequestContext,
        _object_type: &str,
        _instance_id: u64,
    ) -> Result<()> {
        Ok(())
    }
}
