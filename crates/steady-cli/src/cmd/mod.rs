pub mod analyze;
pub mod demo;
pub mod show_config;
