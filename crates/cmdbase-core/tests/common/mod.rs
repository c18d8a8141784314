use std::cell::RefCell;
use std::collections::HashSet;

use serde_json::{json, Value};

use cmdbase_core::errors::Result;
use cmdbase_core::gateway::{AssociationGuard, ValidationError, ValidationGateway};
use cmdbase_core::model::{Document, Instance, Label};
use cmdbase_core::router::{
    COLLECTION_HOSTS, COLLECTION_PROCESSES, COLLECTION_PROCESS_RELATIONS,
    COLLECTION_PROCESS_TEMPLATES,
};
use cmdbase_core::store::{DocStore, FindOptions, MemoryStore};
use cmdbase_core_types::{OwnerId, RequestContext};

/// Create a new empty MemoryStore for testing
#[allow(dead_code)]
pub fn new_store() -> MemoryStore {
    MemoryStore::new()
}

/// Build a request context for the given owner
#[allow(dead_code)]
pub fn ctx(owner: &str) -> RequestContext {
    RequestContext::new(OwnerId::new(owner))
}

/// Build a Document from a JSON literal
#[allow(dead_code)]
pub fn doc(value: Value) -> Document {
    value.as_object().expect("test document literal").clone()
}

/// Build an Instance from a JSON literal
#[allow(dead_code)]
pub fn instance(value: Value) -> Instance {
    Instance::from_document(doc(value))
}

/// Insert a host document directly, bypassing the CRUD operations
#[allow(dead_code)]
pub fn seed_host(store: &mut MemoryStore, owner: &str, host_id: u64, inner_ip: &str) {
    store
        .insert(
            COLLECTION_HOSTS,
            doc(json!({
                "owner_id": owner,
                "host_id": host_id,
                "inner_ip": inner_ip,
            })),
        )
        .unwrap();
}

/// Insert a host↔process↔template relation directly
#[allow(dead_code)]
pub fn seed_relation(store: &mut MemoryStore, host_id: u64, process_id: u64, template_id: u64) {
    store
        .insert(
            COLLECTION_PROCESS_RELATIONS,
            doc(json!({
                "host_id": host_id,
                "process_id": process_id,
                "process_template_id": template_id,
            })),
        )
        .unwrap();
}

/// Insert a process template with the given bind-ip derivation policy
#[allow(dead_code)]
pub fn seed_template(store: &mut MemoryStore, id: u64, as_default: bool, kind: &str) {
    store
        .insert(
            COLLECTION_PROCESS_TEMPLATES,
            doc(json!({
                "id": id,
                "property": {"bind_ip": {"as_default_value": as_default, "value": kind}},
            })),
        )
        .unwrap();
}

/// Insert a process document with the given bind address
#[allow(dead_code)]
pub fn seed_process(store: &mut MemoryStore, process_id: u64, bind_ip: &str) {
    store
        .insert(
            COLLECTION_PROCESSES,
            doc(json!({
                "process_id": process_id,
                "bind_ip": bind_ip,
            })),
        )
        .unwrap();
}

/// Read the bind address of a seeded process
#[allow(dead_code)]
pub fn bind_ip_of(store: &MemoryStore, process_id: u64) -> String {
    let found = store
        .find(
            COLLECTION_PROCESSES,
            &doc(json!({"process_id": process_id})),
            &FindOptions::all(),
        )
        .unwrap();
    found[0]
        .get("bind_ip")
        .and_then(Value::as_str)
        .unwrap()
        .to_string()
}

/// Gateway that rejects any instance or patch containing a marker field
#[allow(dead_code)]
pub struct RejectField(pub &'static str);

impl ValidationGateway for RejectField {
    fn validate_create(
        &self,
        _ctx: &RequestContext,
        _object_type: &str,
        data: &Instance,
    ) -> std::result::Result<(), ValidationError> {
        if data.contains_key(self.0) {
            return Err(ValidationError::for_field(self.0, "rejected by rule engine"));
        }
        Ok(())
    }

    fn validate_update(
        &self,
        _ctx: &RequestContext,
        _object_type: &str,
        patch: &Instance,
        _label: &Label,
        _original: &Instance,
        _can_edit_all: bool,
    ) -> std::result::Result<(), ValidationError> {
        if patch.contains_key(self.0) {
            return Err(ValidationError::for_field(self.0, "rejected by rule engine"));
        }
        Ok(())
    }
}

/// Association guard with a fixed set of referenced instance ids
///
/// `delete_associations` records the ids it was asked to clean up and drops
/// them from the referenced set.
#[allow(dead_code)]
#[derive(Default)]
pub struct FixedAssociations {
    pub referenced: HashSet<u64>,
    pub deleted: Vec<u64>,
}

#[allow(dead_code)]
impl FixedAssociations {
    pub fn referencing<I: IntoIterator<Item = u64>>(ids: I) -> Self {
        Self {
            referenced: ids.into_iter().collect(),
            deleted: Vec::new(),
        }
    }
}

impl AssociationGuard for FixedAssociations {
    fn has_associations(
        &self,
        _ctx: &RequestContext,
        _object_type: &str,
        instance_id: u64,
    ) -> Result<bool> {
        Ok(self.referenced.contains(&instance_id))
    }

    fn delete_associations(
        &mut self,
        _ctx: &RequestContext,
        _object_type: &str,
        instance_id: u64,
    ) -> Result<()> {
        self.referenced.remove(&instance_id);
        self.deleted.push(instance_id);
        Ok(())
    }
}

/// Store wrapper recording which collections each call touches
///
/// Used to assert that skipped propagation kinds issue no queries.
#[allow(dead_code)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub finds: RefCell<Vec<String>>,
    pub updates: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn wrap(inner: MemoryStore) -> Self {
        Self {
            inner,
            finds: RefCell::new(Vec::new()),
            updates: RefCell::new(Vec::new()),
        }
    }

    pub fn found_in(&self, collection: &str) -> bool {
        self.finds.borrow().iter().any(|c| c == collection)
    }

    pub fn updated_in(&self, collection: &str) -> bool {
        self.updates.borrow().iter().any(|c| c == collection)
    }
}

impl DocStore for RecordingStore {
    fn find(
        &self,
        collection: &str,
        condition: &Document,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        self.finds.borrow_mut().push(collection.to_string());
        self.inner.find(collection, condition, options)
    }

    fn count(&self, collection: &str, condition: &Document) -> Result<u64> {
        self.inner.count(collection, condition)
    }

    fn insert(&mut self, collection: &str, document: Document) -> Result<()> {
        self.inner.insert(collection, document)
    }

    fn update_many(
        &mut self,
        collection: &str,
        condition: &Document,
        patch: &Document,
    ) -> Result<u64> {
        self.updates.borrow_mut().push(collection.to_string());
        self.inner.update_many(collection, condition, patch)
    }

    fn delete_many(&mut self, collection: &str, condition: &Document) -> Result<u64> {
        self.inner.delete_many(collection, condition)
    }

    fn next_id(&mut self, collection: &str) -> Result<u64> {
        self.inner.next_id(collection)
    }
}
