pub mod bind_ip;
pub mod instance_ops;

pub use bind_ip::first_ip;
pub use instance_ops::{
    cascade_delete_instances, create_instance, create_many_instances, delete_instances,
    search_instances, update_instances,
};
