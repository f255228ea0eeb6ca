pub mod config;
pub mod messages;
pub mod stats;
pub mod storage;
