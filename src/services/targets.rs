//! Build targets known to the toolchain

use crate::toolchain::{Toolchain, args};

/// Parse `bao.py targets`: one target per line
pub fn parse_targets(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Failures yield an empty list
pub async fn list_build_targets(toolchain: &dyn Toolchain) -> Vec<String> {
    match toolchain.run(&args(["targets"])).await {
        Ok(run) if run.success() => parse_targets(&run.stdout),
        Ok(run) => {
            log::warn!("Could not list build targets: {}", run.diagnostic());
            Vec::new()
        }
        Err(e) => {
            log::warn!("Could not list build targets: {}", e);
            Vec::new()
        }
    }
}
