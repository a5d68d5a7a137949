//! Configuration management for baobrew

pub mod app_config;
pub mod store;

pub use app_config::*;
pub use store::*;
