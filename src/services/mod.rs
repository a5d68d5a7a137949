//! Flash/boot services
//!
//! One module per step of the flash sequence, plus the orchestrator that
//! strings them together, and the checks a build needs first.

pub mod apps;
pub mod artifacts;
pub mod boot;
pub mod copy;
pub mod destination;
pub mod orchestrator;
pub mod ports;
pub mod prereqs;
pub mod targets;
pub mod tools_gate;
pub mod version;

pub use apps::*;
pub use artifacts::*;
pub use boot::*;
pub use copy::*;
pub use destination::*;
pub use orchestrator::*;
pub use ports::*;
pub use prereqs::*;
pub use targets::*;
pub use tools_gate::*;
pub use version::*;
