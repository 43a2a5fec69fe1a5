mod server_info;

pub use server_info::{ScopeCacheInfo, ServerInfo};
