//! Minimum `bao.py` version check

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

use crate::errors::{BaoError, Result};
use crate::toolchain::{Toolchain, args};

fn semver_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").ok())
        .as_ref()
}

/// First `MAJOR.MINOR.PATCH` in `text`
pub fn extract_semver(text: &str) -> Option<(u64, u64, u64)> {
    let caps = semver_regex()?.captures(text)?;
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

pub fn compare_semver(found: &str, required: &str) -> Option<Ordering> {
    Some(extract_semver(found)?.cmp(&extract_semver(required)?))
}

/// Fail unless `bao.py --version` reports at least `required`
pub async fn check_tools_version(toolchain: &dyn Toolchain, required: &str) -> Result<String> {
    let run = toolchain.run(&args(["--version"])).await?;
    if !run.success() {
        return Err(BaoError::Toolchain(format!(
            "Could not check tools-bao version: {}",
            run.diagnostic()
        )));
    }

    let (major, minor, patch) = extract_semver(&run.stdout).ok_or_else(|| {
        BaoError::Toolchain(format!(
            "Could not parse version from: {}",
            run.stdout.trim()
        ))
    })?;
    let found = format!("{}.{}.{}", major, minor, patch);

    match compare_semver(&found, required) {
        Some(Ordering::Less) => Err(BaoError::Toolchain(format!(
            "Your tools-bao is too old (found v{}, need ≥ v{}). Please update your xous-core repository.",
            found, required
        ))),
        Some(_) => {
            log::debug!("tools-bao v{} satisfies ≥ v{}", found, required);
            Ok(found)
        }
        None => Err(BaoError::Config(format!(
            "Invalid required tools version: {}",
            required
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_semver() {
        assert_eq!(extract_semver("bao.py 0.4.12"), Some((0, 4, 12)));
        assert_eq!(extract_semver("v1.2"), None);
    }

    #[test]
    fn test_compare_is_numeric() {
        assert_eq!(compare_semver("0.10.0", "0.9.9"), Some(Ordering::Greater));
        assert_eq!(compare_semver("1.2.0", "1.2.0"), Some(Ordering::Equal));
        assert_eq!(compare_semver("0.1.9", "0.2.0"), Some(Ordering::Less));
        assert_eq!(compare_semver("dev", "0.2.0"), None);
    }
}
