//! Table router: object type → storage target
//!
//! Pure dispatch from an object-type identifier to the collection holding
//! its instances and the name of its identity field. Built-in object types
//! get dedicated collections; everything else shares the generic instance
//! collection, additionally keyed by the object-type field.

use cmdbase_core_types::schema;

// Built-in object types with dedicated collections
pub const OBJECT_HOST: &str = "host";
pub const OBJECT_PROCESS: &str = "process";
pub const OBJECT_PLAT: &str = "plat";

// Collection names
pub const COLLECTION_INSTANCES: &str = "instances";
pub const COLLECTION_HOSTS: &str = "hosts";
pub const COLLECTION_PROCESSES: &str = "processes";
pub const COLLECTION_PLATS: &str = "plats";
pub const COLLECTION_PROCESS_RELATIONS: &str = "process_instance_relations";
pub const COLLECTION_PROCESS_TEMPLATES: &str = "process_templates";

/// Storage target for one object type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRoute {
    pub collection: &'static str,
    pub id_field: &'static str,
}

impl TableRoute {
    /// Whether this route points at the shared generic instance collection
    ///
    /// Documents there carry the object-type field, and reads must inject an
    /// object-type constraint.
    pub fn is_shared(&self) -> bool {
        self.collection == COLLECTION_INSTANCES
    }
}

/// Resolve an object type to its storage target
///
/// Total and deterministic: every object type resolves, unknown ones fall
/// through to the shared instance collection.
pub fn resolve(object_type: &str) -> TableRoute {
    match object_type {
        OBJECT_HOST => TableRoute {
            collection: COLLECTION_HOSTS,
            id_field: schema::FIELD_HOST_ID,
        },
        OBJECT_PROCESS => TableRoute {
            collection: COLLECTION_PROCESSES,
            id_field: schema::FIELD_PROCESS_ID,
        },
        OBJECT_PLAT => TableRoute {
            collection: COLLECTION_PLATS,
            id_field: schema::FIELD_PLAT_ID,
        },
        _ => TableRoute {
            collection: COLLECTION_INSTANCES,
            id_field: schema::FIELD_INST_ID,
        },
    }
}
