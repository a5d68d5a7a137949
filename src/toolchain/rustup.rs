//! Host Rust toolchain checks (rustc, cargo, rustup)

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::errors::{BaoError, Result};

/// Bare-metal target the firmware is compiled for
pub const RISCV_TARGET: &str = "riscv32imac-unknown-none-elf";

/// What the firmware build needs from the host Rust installation
#[async_trait]
pub trait RustEnvironment: Send + Sync {
    /// `<tool> --version` output, or `None` when the tool cannot be started
    async fn tool_version(&self, tool: &str) -> Option<String>;

    /// Targets from `rustup target list --installed`; `None` without rustup
    async fn installed_targets(&self) -> Option<Vec<String>>;

    /// `rustup target add <target>`
    async fn add_target(&self, target: &str) -> Result<()>;
}

/// Parse `rustup target list --installed`
pub fn parse_target_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tools found on PATH
pub struct SystemRust;

impl SystemRust {
    async fn capture(program: &str, args: &[&str]) -> Option<String> {
        let path = which::which(program).ok()?;
        let output = Command::new(path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            log::debug!("{} {} exited with {:?}", program, args.join(" "), output.status.code());
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl RustEnvironment for SystemRust {
    async fn tool_version(&self, tool: &str) -> Option<String> {
        Self::capture(tool, &["--version"])
            .await
            .map(|v| v.trim().to_string())
    }

    async fn installed_targets(&self) -> Option<Vec<String>> {
        Self::capture("rustup", &["target", "list", "--installed"])
            .await
            .map(|stdout| parse_target_list(&stdout))
    }

    async fn add_target(&self, target: &str) -> Result<()> {
        let rustup = which::which("rustup")
            .map_err(|e| BaoError::Build(format!("rustup not found on PATH: {}", e)))?;
        log::info!("Executing: rustup target add {}", target);
        let status = Command::new(rustup)
            .args(["target", "add", target])
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| BaoError::Build(format!("Failed to start rustup: {}", e)))?;
        if !status.success() {
            return Err(BaoError::Build(format!(
                "rustup target add {} exited with {}",
                target, status
            )));
        }
        Ok(())
    }
}
