//! Custom error types for baobrew

use std::fmt;

/// Main error type for baobrew operations
#[derive(Debug)]
pub enum BaoError {
    /// Missing or invalid configuration (no destination, no port, no toolchain path)
    Config(String),
    /// The external toolchain could not be launched or returned garbage
    Toolchain(String),
    /// The device could not be reached for a version comparison, or its answer was unreadable
    VersionCheck(String),
    /// The boot command did not exit cleanly
    Boot(String),
    /// The device drive or port did not show up in time
    Device(String),
    /// Serial port enumeration errors
    Port(String),
    /// `cargo xtask` build errors
    Build(String),
    /// Interactive prompt errors (stdin closed, unreadable input)
    Prompt(String),
    /// General I/O errors
    Io(std::io::Error),
    /// Serialization errors
    Serialization(String),
}

impl fmt::Display for BaoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaoError::Config(msg) => write!(f, "Configuration error: {}", msg),
            BaoError::Toolchain(msg) => write!(f, "Toolchain error: {}", msg),
            BaoError::VersionCheck(msg) => write!(f, "Version check failed: {}", msg),
            BaoError::Boot(msg) => write!(f, "Boot command failed: {}", msg),
            BaoError::Device(msg) => write!(f, "Device unavailable: {}", msg),
            BaoError::Port(msg) => write!(f, "Serial port error: {}", msg),
            BaoError::Build(msg) => write!(f, "Build error: {}", msg),
            BaoError::Prompt(msg) => write!(f, "Prompt error: {}", msg),
            BaoError::Io(err) => write!(f, "I/O error: {}", err),
            BaoError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl BaoError {
    /// Message without the category prefix, for user-facing notices
    pub fn detail(&self) -> String {
        match self {
            BaoError::Config(msg)
            | BaoError::Toolchain(msg)
            | BaoError::VersionCheck(msg)
            | BaoError::Boot(msg)
            | BaoError::Device(msg)
            | BaoError::Port(msg)
            | BaoError::Build(msg)
            | BaoError::Prompt(msg)
            | BaoError::Serialization(msg) => msg.clone(),
            BaoError::Io(err) => err.to_string(),
        }
    }
}

impl std::error::Error for BaoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BaoError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BaoError {
    fn from(err: std::io::Error) -> Self {
        BaoError::Io(err)
    }
}

impl From<serde_json::Error> for BaoError {
    fn from(err: serde_json::Error) -> Self {
        BaoError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BaoError {
    fn from(err: toml::de::Error) -> Self {
        BaoError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for BaoError {
    fn from(err: toml::ser::Error) -> Self {
        BaoError::Serialization(err.to_string())
    }
}

impl From<serialport::Error> for BaoError {
    fn from(err: serialport::Error) -> Self {
        BaoError::Port(err.to_string())
    }
}

/// Result type alias for baobrew operations
pub type Result<T> = std::result::Result<T, BaoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = BaoError::VersionCheck("no response on /dev/ttyACM0".to_string());
        assert_eq!(
            err.to_string(),
            "Version check failed: no response on /dev/ttyACM0"
        );

        let err: BaoError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().starts_with("I/O error"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_detail_drops_category_prefix() {
        let err = BaoError::Config("Selected location is not accessible: /media/x".to_string());
        assert!(err.to_string().starts_with("Configuration error: "));
        assert_eq!(err.detail(), "Selected location is not accessible: /media/x");

        let err = BaoError::Device("Drive did not appear at: /media/BAOCHIP".to_string());
        assert_eq!(err.detail(), "Drive did not appear at: /media/BAOCHIP");
    }
}
