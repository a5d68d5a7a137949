//! Error types for baobrew

pub mod types;

pub use types::*;
