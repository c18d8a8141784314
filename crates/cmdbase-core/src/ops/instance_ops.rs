//! Instance CRUD operations
//!
//! Create, bulk create, update, search, delete, and cascade delete for
//! dynamically-typed model instances. Every operation scopes its reads and
//! writes to the owner in the request context, routes through the table
//! router, and consults the validation gateway before writing.
//!
//! Only bulk create has partial-failure semantics; all other operations are
//! all-or-nothing from the caller's perspective, except that a host
//! update's bind-ip propagation is a separate follow-up write (see
//! [`super::bind_ip`]).

use chrono::Utc;
use serde_json::Value;

use cmdbase_core_types::{schema, RequestContext};

use crate::errors::{CmdbError, Result};
use crate::filter;
use crate::gateway::{AssociationGuard, ValidationError, ValidationGateway};
use crate::model::{
    CreateManyResult, CreatedInstance, DeletedCount, Document, ExceptionRecord, Instance, Label,
    Page, QueryResult, UpdatedCount,
};
use crate::router::{self, TableRoute};
use crate::store::{DocStore, FindOptions};
use crate::{log_op_end, log_op_err, log_op_start};

use super::bind_ip;

/// Create one instance
///
/// Stamps the owner field from the context, validates, allocates the next
/// identity, and persists.
///
/// # Errors
/// * `Validation` - The gateway rejected the field values
/// * `Storage` - The insert or identity allocation failed
pub fn create_instance(
    store: &mut dyn DocStore,
    validator: &dyn ValidationGateway,
    ctx: &RequestContext,
    object_type: &str,
    mut data: Instance,
) -> Result<CreatedInstance> {
    log_op_start!("create_instance", object_type, request_id = %ctx.request_id);
    let route = router::resolve(object_type);
    stamp_scope(&mut data, &route, ctx, object_type);

    if let Err(err) = validator.validate_create(ctx, object_type, &data) {
        let err = validation_error(object_type, err);
        log_op_err!("create_instance", err, request_id = %ctx.request_id);
        return Err(err);
    }

    let id = save(store, &route, &mut data)?;
    log_op_end!("create_instance", object_type, id);
    Ok(CreatedInstance { id })
}

/// Create many instances with independent per-item failure
///
/// Each item is stamped, validated, and persisted on its own. A failure
/// produces an exception record carrying the original index and payload,
/// and processing continues; earlier successes are never rolled back.
pub fn create_many_instances(
    store: &mut dyn DocStore,
    validator: &dyn ValidationGateway,
    ctx: &RequestContext,
    object_type: &str,
    items: Vec<Instance>,
) -> Result<CreateManyResult> {
    log_op_start!("create_many_instances", object_type, items = items.len(), request_id = %ctx.request_id);
    let route = router::resolve(object_type);
    let mut result = CreateManyResult::default();

    for (index, mut item) in items.into_iter().enumerate() {
        stamp_scope(&mut item, &route, ctx, object_type);

        if let Err(err) = validator.validate_create(ctx, object_type, &item) {
            let err = validation_error(object_type, err);
            result.exceptions.push(exception(err, index, item));
            continue;
        }

        match save(store, &route, &mut item) {
            Ok(id) => result.created.push(CreatedInstance { id }),
            Err(err) => result.exceptions.push(exception(err, index, item)),
        }
    }

    log_op_end!(
        "create_many_instances",
        object_type,
        created = result.created.len(),
        exceptions = result.exceptions.len()
    );
    Ok(result)
}

/// Update every instance matching a condition
///
/// Loads the pre-update originals, validates the patch against an isolated
/// copy of each one, then applies the patch with a single bulk write over
/// the same filter. A single validation failure fails the whole call with
/// no writes. Host updates additionally propagate changed addresses to
/// dependent process bind addresses.
///
/// # Errors
/// * `NotFound` - No instance matched the scoped condition
/// * `Validation` - The patch was rejected against one of the originals
/// * `Storage` - A store operation failed
/// * `BindIpPropagation` - The host write succeeded but propagation failed;
///   dependent process addresses may be stale
pub fn update_instances(
    store: &mut dyn DocStore,
    validator: &dyn ValidationGateway,
    ctx: &RequestContext,
    object_type: &str,
    condition: Document,
    patch: Instance,
    can_edit_all: bool,
) -> Result<UpdatedCount> {
    log_op_start!("update_instances", object_type, request_id = %ctx.request_id);
    let route = router::resolve(object_type);
    let condition = scoped_condition(condition, &route, ctx, object_type);

    let originals = load_instances(store, &route, &condition)?;
    if originals.is_empty() {
        let err = CmdbError::NotFound {
            object_type: object_type.to_string(),
            condition: filter::render(&condition),
        };
        log_op_err!("update_instances", err, request_id = %ctx.request_id);
        return Err(err);
    }

    let label = condition
        .get(schema::FIELD_METADATA)
        .map(Label::from_metadata_value)
        .unwrap_or_default();

    for original in &originals {
        let isolated = original.clone();
        if let Err(err) =
            validator.validate_update(ctx, object_type, &patch, &label, &isolated, can_edit_all)
        {
            let err = validation_error(object_type, err);
            log_op_err!("update_instances", err, request_id = %ctx.request_id);
            return Err(err);
        }
    }

    let mut applied = patch.as_document().clone();
    applied.insert(
        schema::FIELD_LAST_TIME.to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    store.update_many(route.collection, &condition, &applied)?;

    if object_type == router::OBJECT_HOST {
        if let Err(err) = bind_ip::propagate_host_bind_ip(store, ctx, patch.as_document(), &originals)
        {
            let err = match err {
                err @ CmdbError::BindIpPropagation { .. } => err,
                other => CmdbError::BindIpPropagation {
                    reason: other.to_string(),
                },
            };
            log_op_err!("update_instances", err, request_id = %ctx.request_id);
            return Err(err);
        }
    }

    log_op_end!("update_instances", object_type, count = originals.len());
    Ok(UpdatedCount {
        count: originals.len() as u64,
    })
}

/// Search instances matching a condition
///
/// On the shared generic collection, a caller object-type constraint that
/// contradicts the requested object type yields an empty result rather than
/// an error; otherwise the object-type equality is injected. The total
/// count comes from a separate count query and is not transactionally
/// consistent with the returned page.
pub fn search_instances(
    store: &dyn DocStore,
    ctx: &RequestContext,
    object_type: &str,
    condition: Document,
    page: &Page,
    fields: &[String],
) -> Result<QueryResult> {
    log_op_start!("search_instances", object_type, request_id = %ctx.request_id);
    let route = router::resolve(object_type);

    if route.is_shared() && filter::object_type_conflicts(&condition, object_type) {
        log_op_end!("search_instances", object_type, conflicting_object_type = true);
        return Ok(QueryResult::default());
    }

    let condition = scoped_condition(condition, &route, ctx, object_type);

    let mut options = FindOptions::all()
        .with_page(page.start, page.limit)
        .with_fields(fields.iter().cloned());
    if let Some(sort) = &page.sort {
        options = options.with_sort(sort.clone());
    }

    let items: Vec<Instance> = store
        .find(route.collection, &condition, &options)?
        .into_iter()
        .map(Instance::from_document)
        .collect();
    let count = store.count(route.collection, &condition)?;

    log_op_end!("search_instances", object_type, count, page_len = items.len());
    Ok(QueryResult { count, items })
}

/// Delete every instance matching a condition
///
/// Refuses if any matched instance still has a surviving association; in
/// that case nothing is deleted.
///
/// # Errors
/// * `NotFound` - No instance matched the scoped condition
/// * `AssociationConflict` - A matched instance is still referenced
/// * `InvalidIdentity` - A matched instance lacks a usable identity field
/// * `Storage` - A store operation failed
pub fn delete_instances(
    store: &mut dyn DocStore,
    guard: &dyn AssociationGuard,
    ctx: &RequestContext,
    object_type: &str,
    condition: Document,
) -> Result<DeletedCount> {
    log_op_start!("delete_instances", object_type, request_id = %ctx.request_id);
    let route = router::resolve(object_type);
    let condition = scoped_condition(condition, &route, ctx, object_type);

    let originals = load_instances(store, &route, &condition)?;
    if originals.is_empty() {
        let err = CmdbError::NotFound {
            object_type: object_type.to_string(),
            condition: filter::render(&condition),
        };
        log_op_err!("delete_instances", err, request_id = %ctx.request_id);
        return Err(err);
    }

    for original in &originals {
        let instance_id = identity_of(original, &route, object_type)?;
        if guard.has_associations(ctx, object_type, instance_id)? {
            let err = CmdbError::AssociationConflict {
                object_type: object_type.to_string(),
                instance_id,
            };
            log_op_err!("delete_instances", err, request_id = %ctx.request_id);
            return Err(err);
        }
    }

    let count = store.delete_many(route.collection, &condition)?;
    log_op_end!("delete_instances", object_type, count);
    Ok(DeletedCount { count })
}

/// Delete matching instances after removing all their associations
///
/// Associations are deleted per instance before the instances themselves; a
/// guard failure aborts the call, and associations already removed stay
/// removed (no rollback). Zero matches is not an error here; cascade delete
/// is routinely called from cleanup paths where absence is success.
pub fn cascade_delete_instances(
    store: &mut dyn DocStore,
    guard: &mut dyn AssociationGuard,
    ctx: &RequestContext,
    object_type: &str,
    condition: Document,
) -> Result<DeletedCount> {
    log_op_start!("cascade_delete_instances", object_type, request_id = %ctx.request_id);
    let route = router::resolve(object_type);
    let condition = scoped_condition(condition, &route, ctx, object_type);

    let originals = load_instances(store, &route, &condition)?;
    for original in &originals {
        let instance_id = identity_of(original, &route, object_type)?;
        guard.delete_associations(ctx, object_type, instance_id)?;
    }

    let count = store.delete_many(route.collection, &condition)?;
    log_op_end!("cascade_delete_instances", object_type, count);
    Ok(DeletedCount { count })
}

/// Stamp the owner field and, on the shared collection, the object type
fn stamp_scope(data: &mut Instance, route: &TableRoute, ctx: &RequestContext, object_type: &str) {
    data.set(
        schema::FIELD_OWNER_ID,
        Value::String(ctx.owner.as_str().to_string()),
    );
    if route.is_shared() {
        data.set(
            schema::FIELD_OBJECT_TYPE,
            Value::String(object_type.to_string()),
        );
    }
}

/// Owner-scope a condition and key it to the object type on the shared
/// collection
fn scoped_condition(
    mut condition: Document,
    route: &TableRoute,
    ctx: &RequestContext,
    object_type: &str,
) -> Document {
    if route.is_shared() {
        condition.insert(
            schema::FIELD_OBJECT_TYPE.to_string(),
            Value::String(object_type.to_string()),
        );
    }
    filter::scope_to_owner(&mut condition, &ctx.owner);
    condition
}

/// Allocate the next identity, stamp it and the lifecycle timestamps, and
/// insert the document
fn save(store: &mut dyn DocStore, route: &TableRoute, data: &mut Instance) -> Result<u64> {
    let id = store.next_id(route.collection)?;
    data.set(route.id_field, Value::from(id));
    let now = Utc::now().to_rfc3339();
    data.set(schema::FIELD_CREATE_TIME, Value::String(now.clone()));
    data.set(schema::FIELD_LAST_TIME, Value::String(now));
    store.insert(route.collection, data.as_document().clone())?;
    Ok(id)
}

fn load_instances(
    store: &dyn DocStore,
    route: &TableRoute,
    condition: &Document,
) -> Result<Vec<Instance>> {
    Ok(store
        .find(route.collection, condition, &FindOptions::all())?
        .into_iter()
        .map(Instance::from_document)
        .collect())
}

fn identity_of(instance: &Instance, route: &TableRoute, object_type: &str) -> Result<u64> {
    instance
        .get_u64(route.id_field)
        .ok_or_else(|| CmdbError::InvalidIdentity {
            object_type: object_type.to_string(),
            reason: format!("missing or non-numeric {}", route.id_field),
        })
}

fn validation_error(object_type: &str, err: ValidationError) -> CmdbError {
    CmdbError::Validation {
        object_type: object_type.to_string(),
        reason: err.to_string(),
    }
}

fn exception(err: CmdbError, index: usize, data: Instance) -> ExceptionRecord {
    ExceptionRecord {
        message: err.to_string(),
        code: err.code().to_string(),
        original_index: index,
        data,
    }
}
