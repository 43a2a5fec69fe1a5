pub mod api_server;
pub mod authorization;
pub mod pdp;
pub mod scheduler_interval;
pub mod storage;
