//! Canonical schema constants
//!
//! Document field keys and logging event names used consistently across the
//! instance core, the store backends, and error reporting.

// Canonical document field keys
pub const FIELD_ID: &str = "id";
pub const FIELD_OWNER_ID: &str = "owner_id";
pub const FIELD_OBJECT_TYPE: &str = "object_type";
pub const FIELD_INST_ID: &str = "inst_id";
pub const FIELD_HOST_ID: &str = "host_id";
pub const FIELD_HOST_INNER_IP: &str = "inner_ip";
pub const FIELD_HOST_OUTER_IP: &str = "outer_ip";
pub const FIELD_PROCESS_ID: &str = "process_id";
pub const FIELD_PROCESS_TEMPLATE_ID: &str = "process_template_id";
pub const FIELD_BIND_IP: &str = "bind_ip";
pub const FIELD_PLAT_ID: &str = "plat_id";
pub const FIELD_METADATA: &str = "metadata";
pub const FIELD_CREATE_TIME: &str = "create_time";
pub const FIELD_LAST_TIME: &str = "last_time";

// Metadata label keys
pub const LABEL_KEY: &str = "label";
pub const LABEL_BUSINESS_ID: &str = "business_id";

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
