//! Utility functions and helpers used throughout baobrew

pub mod logging;
pub mod poll;
pub mod text;
