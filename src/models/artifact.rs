//! Firmware image models reported by `bao.py artifacts`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Semantic role of a firmware image.
///
/// Declaration order is the write order on the device drive: the loader must
/// land first, then the operating system, then the application image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactRole {
    Loader,
    OperatingSystem,
    Application,
}

impl ArtifactRole {
    /// All roles in flash order
    pub const FLASH_ORDER: [ArtifactRole; 3] = [
        ArtifactRole::Loader,
        ArtifactRole::OperatingSystem,
        ArtifactRole::Application,
    ];

    /// Map a toolchain role tag onto a role. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "loader" => Some(ArtifactRole::Loader),
            "xous" | "os" | "operating-system" | "kernel" => Some(ArtifactRole::OperatingSystem),
            "apps" | "app" | "application" => Some(ArtifactRole::Application),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArtifactRole::Loader => "loader",
            ArtifactRole::OperatingSystem => "operating-system",
            ArtifactRole::Application => "application",
        }
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Image entry exactly as the toolchain prints it
#[derive(Debug, Clone, Deserialize)]
pub struct RawArtifact {
    pub path: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A built firmware image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub role: Option<ArtifactRole>,
}

impl From<RawArtifact> for Artifact {
    fn from(raw: RawArtifact) -> Self {
        Self {
            role: raw.role.as_deref().and_then(ArtifactRole::from_tag),
            path: PathBuf::from(raw.path),
        }
    }
}
