// Re-export the shared contract so consumers can reach it via steady_core::*
pub use steady_protocol::config;
pub use steady_protocol::messages;
pub use steady_protocol::stats;
pub use steady_protocol::storage;

pub mod adaptive;
pub mod bridge;
pub mod classifier;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod history;
pub mod predictor;
pub mod scheduler;
pub mod simulation;
pub mod trace;
pub mod tremor;
pub mod view;
