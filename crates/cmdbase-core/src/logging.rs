//! Structured logging facility
//!
//! Single initialization point via `init(profile)` plus structured
//! operation macros (`log_op_start!`, `log_op_end!`, `log_op_err!`) used on
//! the CRUD operations' boundaries. Event and field names come from
//! `cmdbase_core_types::schema` so logs stay greppable across crates.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at application startup; later calls are no-ops.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("cmdbase=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("cmdbase=info")),
                )
                .init();
        }
    });
}

/// Log the start of an operation
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = cmdbase_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = cmdbase_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
#[macro_export]
macro_rules! log_op_end {
    ($op:expr) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = cmdbase_core_types::schema::EVENT_END,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = cmdbase_core_types::schema::EVENT_END,
            $($field)*
        );
    };
}

/// Log an operation error with its stable code
#[macro_export]
macro_rules! log_op_err {
    ($op:expr, $err:expr) => {
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = cmdbase_core_types::schema::EVENT_END_ERROR,
            err_code = $err.code(),
            err = %$err,
        );
    };
    ($op:expr, $err:expr, $($field:tt)*) => {
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = cmdbase_core_types::schema::EVENT_END_ERROR,
            err_code = $err.code(),
            err = %$err,
            $($field)*
        );
    };
}
