//! Serial port identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the device's two serial identities a port belongs to.
///
/// The board re-enumerates when it leaves bootloader mode, so the
/// bootloader-mode port and the run-mode port are different identifiers for
/// the same physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PortRole {
    Bootloader,
    #[default]
    Run,
}

impl PortRole {
    pub fn friendly_name(&self) -> &'static str {
        match self {
            PortRole::Bootloader => "bootloader-mode",
            PortRole::Run => "run-mode",
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortRole::Bootloader => "bootloader",
            PortRole::Run => "run",
        })
    }
}

/// One line of a port listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub name: String,
    pub description: Option<String>,
}

impl PortEntry {
    /// Parse `port` or `port<TAB>description`
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }
        let mut fields = line.splitn(2, '\t');
        let name = fields.next()?.trim();
        if name.is_empty() {
            return None;
        }
        let description = fields
            .next()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Some(Self {
            name: name.to_string(),
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_lines() {
        assert_eq!(
            PortEntry::parse_line("COM7\tUSB Serial Device"),
            Some(PortEntry {
                name: "COM7".to_string(),
                description: Some("USB Serial Device".to_string()),
            })
        );
        assert_eq!(
            PortEntry::parse_line("  /dev/ttyACM0  "),
            Some(PortEntry {
                name: "/dev/ttyACM0".to_string(),
                description: None,
            })
        );
        assert_eq!(PortEntry::parse_line("   "), None);
        assert_eq!(PortEntry::parse_line("\tdangling description"), None);
    }
}
