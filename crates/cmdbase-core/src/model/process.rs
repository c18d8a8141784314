use serde::{Deserialize, Serialize};

use cmdbase_core_types::schema;

/// Which host address a process's bind address is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindIpKind {
    Inner,
    Outer,
}

impl BindIpKind {
    /// The host document field holding addresses of this kind
    pub fn address_field(&self) -> &'static str {
        match self {
            BindIpKind::Inner => schema::FIELD_HOST_INNER_IP,
            BindIpKind::Outer => schema::FIELD_HOST_OUTER_IP,
        }
    }

    /// The value a process template's bind-ip property carries for this kind
    pub fn template_value(&self) -> &'static str {
        match self {
            BindIpKind::Inner => "inner",
            BindIpKind::Outer => "outer",
        }
    }
}

/// Link between a host, a concrete process, and the template it came from
///
/// Read-only from the instance core's perspective; produced by the service
/// topology subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInstanceRelation {
    pub host_id: u64,
    pub process_id: u64,
    pub process_template_id: u64,
}

/// Process template projection used by bind-ip propagation
///
/// Only the id survives the projected fetch; the derive-from-host policy is
/// expressed in the store filter (`property.bind_ip.as_default_value` and
/// `property.bind_ip.value`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessTemplate {
    pub id: u64,
}

/// Dotted path to a template's derive-from-host flag
pub const TEMPLATE_BIND_IP_AS_DEFAULT: &str = "property.bind_ip.as_default_value";

/// Dotted path to a template's bind address kind
pub const TEMPLATE_BIND_IP_VALUE: &str = "property.bind_ip.value";
