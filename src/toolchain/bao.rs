//! `bao.py` subprocess runner

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::config::AppConfig;
use crate::errors::{BaoError, Result};
use crate::toolchain::{ToolRun, Toolchain};

/// Location of the CLI script inside a xous-core checkout
pub const BAO_SCRIPT: &str = "tools-bao/bao.py";

/// Split a launcher such as `uv run python` into executable and leading args
pub fn split_launcher(command: &str) -> Option<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let exe = parts.next()?;
    Some((exe, parts.collect()))
}

/// Runs `<python> <xous-core>/tools-bao/bao.py ...` in the xous-core root
#[derive(Debug, Clone)]
pub struct BaoToolchain {
    python: PathBuf,
    python_args: Vec<String>,
    script: PathBuf,
    root: PathBuf,
}

impl BaoToolchain {
    pub fn new(python: PathBuf, python_args: Vec<String>, root: PathBuf) -> Self {
        Self {
            script: root.join(BAO_SCRIPT),
            python,
            python_args,
            root,
        }
    }

    /// Validate the configured xous-core checkout and locate the interpreter
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let root = config
            .xous_core_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| BaoError::Config("xous-core path not set".to_string()))?;

        if !root.is_dir() {
            return Err(BaoError::Config(format!(
                "xous-core path is not a directory: {}",
                root.display()
            )));
        }

        let script = root.join(BAO_SCRIPT);
        if !script.is_file() {
            return Err(BaoError::Config(format!(
                "Cannot find {} under: {}",
                BAO_SCRIPT,
                root.display()
            )));
        }

        let (exe, python_args) = split_launcher(config.python_command())
            .ok_or_else(|| BaoError::Config("python command is empty".to_string()))?;
        let python = which::which(&exe).map_err(|e| {
            BaoError::Config(format!("Python launcher '{}' not found on PATH: {}", exe, e))
        })?;

        log::debug!(
            "Using toolchain {} {} {}",
            python.display(),
            python_args.join(" "),
            script.display()
        );
        Ok(Self::new(python, python_args, root))
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.current_dir(&self.root)
            .env("PYTHONIOENCODING", "utf-8")
            .env("PYTHONUNBUFFERED", "1")
            .args(&self.python_args)
            .arg(&self.script)
            .args(args);
        cmd
    }

    /// Run with the terminal attached (interactive monitor)
    pub async fn run_attached(&self, args: &[String]) -> Result<ExitStatus> {
        log::info!("Attaching: bao.py {}", args.join(" "));
        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| BaoError::Toolchain(format!("Failed to start bao.py: {}", e)))?;
        Ok(status)
    }
}

#[async_trait]
impl Toolchain for BaoToolchain {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn run(&self, args: &[String]) -> Result<ToolRun> {
        log::debug!("Running: bao.py {}", args.join(" "));

        let output = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| BaoError::Toolchain(format!("Failed to start bao.py: {}", e)))?;

        let run = ToolRun {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::debug!(
            "bao.py {} exited with {:?}",
            args.first().map(String::as_str).unwrap_or(""),
            run.code
        );
        log::trace!("stdout: {}", run.stdout);
        log::trace!("stderr: {}", run.stderr);
        Ok(run)
    }
}
