pub mod instance;
pub mod label;
pub mod process;
pub mod query;

pub use instance::{coerce_string, coerce_u64, Document, Instance};
pub use label::Label;
pub use process::{BindIpKind, ProcessInstanceRelation, ProcessTemplate};
pub use query::{
    CreateManyResult, CreatedInstance, DeletedCount, ExceptionRecord, Page, QueryResult,
    UpdatedCount,
};
