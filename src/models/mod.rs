//! Data models and types used throughout baobrew

pub mod artifact;
pub mod events;
pub mod flash;
pub mod notice;
pub mod port;
pub mod sequence;
pub mod version;

// Re-export commonly used types
pub use artifact::*;
pub use events::*;
pub use flash::*;
pub use notice::*;
pub use port::*;
pub use sequence::*;
pub use version::*;
