//! Bind-ip propagation for host address changes
//!
//! When a host update touches the inner or outer address, processes whose
//! template derives their bind address from that host address kind must
//! follow the new first address. This runs after the host write as a
//! separate follow-up; the two are not jointly atomic, and a propagation
//! failure surfaces as `BindIpPropagation` without reverting the host write.

use std::collections::HashMap;

use serde_json::Value;

use cmdbase_core_types::{schema, RequestContext};

use crate::errors::{CmdbError, Result};
use crate::filter::any_of;
use crate::model::process::{TEMPLATE_BIND_IP_AS_DEFAULT, TEMPLATE_BIND_IP_VALUE};
use crate::model::{
    coerce_string, BindIpKind, Document, Instance, ProcessInstanceRelation, ProcessTemplate,
};
use crate::router::{
    COLLECTION_PROCESSES, COLLECTION_PROCESS_RELATIONS, COLLECTION_PROCESS_TEMPLATES, OBJECT_HOST,
};
use crate::store::{DocStore, FindOptions};

/// Extract the first address from an address-field value
///
/// A delimited string yields the substring before the first `,` (the whole
/// string when there is no delimiter); a sequence yields its first element
/// coerced to string; an empty sequence yields the empty string.
pub fn first_ip(value: &Value) -> String {
    match value {
        Value::String(s) => match s.find(',') {
            Some(index) => s[..index].to_string(),
            None => s.clone(),
        },
        Value::Array(items) => items.first().map(coerce_string).unwrap_or_default(),
        other => coerce_string(other),
    }
}

/// Propagate changed host addresses to dependent process bind addresses
///
/// For each address kind present in the patch, partitions the pre-update
/// originals into hosts whose first address of that kind actually changed;
/// kinds with no affected host are skipped without issuing any query.
pub(crate) fn propagate_host_bind_ip(
    store: &mut dyn DocStore,
    ctx: &RequestContext,
    patch: &Document,
    origins: &[Instance],
) -> Result<()> {
    for kind in [BindIpKind::Inner, BindIpKind::Outer] {
        let Some(new_value) = patch.get(kind.address_field()) else {
            continue;
        };
        let new_first = first_ip(new_value);

        let mut affected_hosts = Vec::new();
        for origin in origins {
            let current_first = origin
                .get(kind.address_field())
                .map(first_ip)
                .unwrap_or_default();
            if current_first == new_first {
                continue;
            }
            let host_id = origin.get_u64(schema::FIELD_HOST_ID).ok_or_else(|| {
                CmdbError::InvalidIdentity {
                    object_type: OBJECT_HOST.to_string(),
                    reason: format!("missing or non-numeric {}", schema::FIELD_HOST_ID),
                }
            })?;
            affected_hosts.push(host_id);
        }

        if affected_hosts.is_empty() {
            continue;
        }

        tracing::debug!(
            component = module_path!(),
            op = "propagate_host_bind_ip",
            request_id = %ctx.request_id,
            address_field = kind.address_field(),
            affected = affected_hosts.len(),
        );
        update_process_bind_ip(store, &new_first, kind, &affected_hosts)?;
    }
    Ok(())
}

/// Rewrite the bind address of processes derived from the affected hosts
fn update_process_bind_ip(
    store: &mut dyn DocStore,
    ip: &str,
    kind: BindIpKind,
    host_ids: &[u64],
) -> Result<()> {
    let mut relation_condition = Document::new();
    relation_condition.insert(
        schema::FIELD_HOST_ID.to_string(),
        any_of(host_ids.iter().copied()),
    );
    let relation_fields = FindOptions::all().with_fields([
        schema::FIELD_HOST_ID,
        schema::FIELD_PROCESS_ID,
        schema::FIELD_PROCESS_TEMPLATE_ID,
    ]);
    let relation_docs = store.find(
        COLLECTION_PROCESS_RELATIONS,
        &relation_condition,
        &relation_fields,
    )?;
    if relation_docs.is_empty() {
        return Ok(());
    }

    let mut template_ids = Vec::with_capacity(relation_docs.len());
    let mut processes_by_template: HashMap<u64, Vec<u64>> = HashMap::new();
    for doc in relation_docs {
        let relation: ProcessInstanceRelation = serde_json::from_value(Value::Object(doc))
            .map_err(|err| CmdbError::Serialization {
                reason: err.to_string(),
            })?;
        template_ids.push(relation.process_template_id);
        processes_by_template
            .entry(relation.process_template_id)
            .or_default()
            .push(relation.process_id);
    }

    // only templates that derive their bind address from this host address kind
    let mut template_condition = Document::new();
    template_condition.insert(schema::FIELD_ID.to_string(), any_of(template_ids));
    template_condition.insert(TEMPLATE_BIND_IP_AS_DEFAULT.to_string(), Value::Bool(true));
    template_condition.insert(
        TEMPLATE_BIND_IP_VALUE.to_string(),
        Value::String(kind.template_value().to_string()),
    );
    let template_docs = store.find(
        COLLECTION_PROCESS_TEMPLATES,
        &template_condition,
        &FindOptions::all().with_fields([schema::FIELD_ID]),
    )?;

    let mut process_ids: Vec<u64> = Vec::new();
    for doc in template_docs {
        let template: ProcessTemplate =
            serde_json::from_value(Value::Object(doc)).map_err(|err| CmdbError::Serialization {
                reason: err.to_string(),
            })?;
        if let Some(ids) = processes_by_template.get(&template.id) {
            process_ids.extend_from_slice(ids);
        }
    }
    if process_ids.is_empty() {
        return Ok(());
    }

    let mut process_condition = Document::new();
    process_condition.insert(schema::FIELD_PROCESS_ID.to_string(), any_of(process_ids));
    let mut patch = Document::new();
    patch.insert(
        schema::FIELD_BIND_IP.to_string(),
        Value::String(ip.to_string()),
    );
    store.update_many(COLLECTION_PROCESSES, &process_condition, &patch)?;
    Ok(())
}
