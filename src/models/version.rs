//! Firmware version comparison result

use serde::{Deserialize, Deserializer, Serialize};

/// Verdict of `bao.py update-all`: whether every role must be flashed or only
/// the application image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub update_all: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub local_semver: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub local_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub board_semver: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub board_timestamp: Option<String>,
}

impl VersionInfo {
    /// Verdict-only info, used when the toolchain answered with a bare boolean
    pub fn verdict(update_all: bool) -> Self {
        Self {
            update_all,
            ..Default::default()
        }
    }

    /// One-line summary for logs and progress output
    pub fn summary(&self) -> String {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "unknown".to_string());
        format!(
            "local {} ({}), board {} ({}) -> {}",
            show(&self.local_semver),
            show(&self.local_timestamp),
            show(&self.board_semver),
            show(&self.board_timestamp),
            if self.update_all {
                "update all images"
            } else {
                "update application only"
            }
        )
    }
}

/// Accepts strings, numbers and null. Timestamps come back as either.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
