//! External toolchain integration
//!
//! Everything baobrew knows about the device goes through `bao.py`, the
//! Python CLI shipped in xous-core under `tools-bao/`. Builds go through
//! `cargo xtask` in the same tree, which needs a host Rust install with the
//! RISC-V target.

pub mod bao;
pub mod cargo;
pub mod monitor;
pub mod output;
pub mod rustup;

pub use bao::*;
pub use cargo::*;
pub use monitor::*;
pub use output::*;
pub use rustup::*;

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use crate::errors::{BaoError, Result};
use crate::utils::text::{MAX_DIAGNOSTIC_CHARS, truncate_diagnostic};

/// Captured result of one toolchain invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRun {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolRun {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable failure reason: stderr, else stdout, else the exit code.
    /// Always bounded to [`MAX_DIAGNOSTIC_CHARS`].
    pub fn diagnostic(&self) -> String {
        let message = if !self.stderr.trim().is_empty() {
            self.stderr.clone()
        } else if !self.stdout.trim().is_empty() {
            self.stdout.clone()
        } else {
            match self.code {
                Some(code) => format!("exited {}", code),
                None => "terminated by signal".to_string(),
            }
        };
        truncate_diagnostic(&message, MAX_DIAGNOSTIC_CHARS)
    }
}

/// Seam over the `bao.py` command line
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Working directory the toolchain runs in (the xous-core root)
    fn root(&self) -> &Path;

    /// Run `bao.py <args>` to completion and capture its output
    async fn run(&self, args: &[String]) -> Result<ToolRun>;

    /// Like [`Toolchain::run`], but gives up after `limit`
    async fn run_bounded(&self, args: &[String], limit: Duration) -> Result<ToolRun> {
        match tokio::time::timeout(limit, self.run(args)).await {
            Ok(result) => result,
            Err(_) => Err(BaoError::Toolchain(format!(
                "bao.py {} did not finish within {}s",
                args.first().map(String::as_str).unwrap_or(""),
                limit.as_secs()
            ))),
        }
    }
}

/// Owned argv helper
pub fn args<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_prefers_stderr() {
        let run = ToolRun {
            code: Some(2),
            stdout: "some progress".to_string(),
            stderr: "  serial port busy \n".to_string(),
        };
        assert_eq!(run.diagnostic(), "serial port busy");
    }

    #[test]
    fn test_diagnostic_falls_back_to_stdout_then_code() {
        let run = ToolRun {
            code: Some(1),
            stdout: "no device".to_string(),
            stderr: String::new(),
        };
        assert_eq!(run.diagnostic(), "no device");

        let run = ToolRun {
            code: Some(3),
            ..Default::default()
        };
        assert_eq!(run.diagnostic(), "exited 3");
    }

    #[test]
    fn test_diagnostic_is_bounded() {
        let run = ToolRun::failed(1, "e".repeat(5000));
        assert_eq!(run.diagnostic().chars().count(), MAX_DIAGNOSTIC_CHARS);
    }
}
