//! baobrew - build, flash, boot and monitor Baochip firmware
//!
//! baobrew drives the xous-core `tools-bao` scripts: it copies UF2 images to
//! the device drive (only the application when the board is already current),
//! sends the boot command, waits for the run-mode serial port and attaches a
//! monitor.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod toolchain;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;

/// baobrew version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// baobrew application name
pub const APP_NAME: &str = "baobrew";
