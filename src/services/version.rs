//! Local vs. on-device firmware version comparison

use crate::errors::{BaoError, Result};
use crate::models::VersionInfo;
use crate::toolchain::{ToolOutput, Toolchain, args};

/// Interpret `bao.py update-all --json` stdout.
///
/// JSON is the contract. A bare `true`/`false` (older tools) is accepted as a
/// verdict without version details.
pub fn parse_update_all(stdout: &str) -> Result<VersionInfo> {
    match ToolOutput::<VersionInfo>::parse(stdout) {
        ToolOutput::Structured(info) => Ok(info),
        ToolOutput::FallbackText(text) => {
            let verdict = text.lines().rev().map(str::trim).find(|l| !l.is_empty());
            match verdict.map(str::to_ascii_lowercase).as_deref() {
                Some("true") => Ok(VersionInfo::verdict(true)),
                Some("false") => Ok(VersionInfo::verdict(false)),
                _ => Err(BaoError::VersionCheck(format!(
                    "Could not parse update-all output: {}",
                    crate::utils::text::truncate_diagnostic(&text, 120)
                ))),
            }
        }
    }
}

/// Ask the device (over `port`) whether every image must be reflashed.
///
/// Requires a reachable, booted device; there is no default verdict.
pub async fn get_update_all_info(
    toolchain: &dyn Toolchain,
    port: &str,
    baud: u32,
) -> Result<VersionInfo> {
    let run = toolchain
        .run(&args([
            "update-all".to_string(),
            "--json".to_string(),
            "-p".to_string(),
            port.to_string(),
            "-b".to_string(),
            baud.to_string(),
        ]))
        .await
        .map_err(|e| BaoError::VersionCheck(e.to_string()))?;

    if !run.success() {
        return Err(BaoError::VersionCheck(run.diagnostic()));
    }

    let info = parse_update_all(&run.stdout)?;
    log::info!("Version check: {}", info.summary());
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_verdict() {
        let info = parse_update_all(
            r#"{"updateAll": false, "localSemver": "1.2.0", "boardSemver": "1.2.0"}"#,
        )
        .unwrap();
        assert!(!info.update_all);
        assert_eq!(info.local_semver.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_bare_boolean_fallback() {
        assert!(parse_update_all("True\n").unwrap().update_all);
        assert!(!parse_update_all("checking...\nfalse").unwrap().update_all);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let err = parse_update_all("no reply from device").unwrap_err();
        assert!(matches!(err, BaoError::VersionCheck(_)));
    }
}
