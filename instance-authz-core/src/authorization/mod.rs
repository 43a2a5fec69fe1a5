pub mod operation;

pub use operation::{ApiOperation, InstanceAction};
