pub mod instance;
pub mod message_box;

pub use instance::{Instance, InstanceOwner, InstanceStatus, ProcessElementInfo, ProcessState};
pub use message_box::{DeleteStatus, MessageBoxInstance};
