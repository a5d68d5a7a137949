//! `cargo xtask` build runner

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::config::AppConfig;
use crate::errors::{BaoError, Result};
use crate::models::{FlashEvent, FlashObserver};

/// Produces the firmware images the flash sequence copies
#[async_trait]
pub trait FirmwareBuilder: Send + Sync {
    async fn build(&self, observer: Arc<dyn FlashObserver>) -> Result<()>;
}

/// Build target plus app names, as passed to `cargo xtask`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpec {
    pub target: String,
    pub apps: Vec<String>,
}

impl BuildSpec {
    /// Requires a build target; apps are optional
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let target = config
            .build_target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BaoError::Config("No build target set.".to_string()))?;
        let apps = config
            .app_name
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Ok(Self {
            target: target.to_string(),
            apps,
        })
    }

    pub fn xtask_args(&self) -> Vec<String> {
        let mut args = vec!["xtask".to_string(), self.target.clone()];
        args.extend(self.apps.iter().cloned());
        args
    }
}

/// Runs cargo in the xous-core root
#[derive(Debug, Clone)]
pub struct CargoRunner {
    root: PathBuf,
}

impl CargoRunner {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Run cargo, forwarding each output line to `observer`. Returns the exit code.
    pub async fn run_streaming(
        &self,
        args: &[String],
        observer: Arc<dyn FlashObserver>,
    ) -> Result<i32> {
        log::info!("Executing: cargo {} (in {})", args.join(" "), self.root.display());

        let mut child = Command::new("cargo")
            .current_dir(&self.root)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BaoError::Build(format!("Failed to start cargo: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BaoError::Build("cargo stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BaoError::Build("cargo stderr unavailable".to_string()))?;

        let out_observer = observer.clone();
        let stdout_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                out_observer.on_event(FlashEvent::Output(line));
            }
        });
        let err_observer = observer.clone();
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                err_observer.on_event(FlashEvent::Output(line));
            }
        });

        let status = child.wait().await?;
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        let code = status.code().unwrap_or(1);
        log::info!("cargo {} exited with {}", args.join(" "), code);
        Ok(code)
    }

    pub async fn clean(&self, observer: Arc<dyn FlashObserver>) -> Result<()> {
        let code = self
            .run_streaming(&["clean".to_string()], observer)
            .await?;
        if code != 0 {
            return Err(BaoError::Build(format!("cargo clean exited {}", code)));
        }
        Ok(())
    }
}

/// `cargo xtask <target> [apps…]`
#[derive(Debug, Clone)]
pub struct XtaskBuilder {
    runner: CargoRunner,
    spec: BuildSpec,
}

impl XtaskBuilder {
    pub fn new(root: PathBuf, spec: BuildSpec) -> Self {
        Self {
            runner: CargoRunner::new(root),
            spec,
        }
    }
}

#[async_trait]
impl FirmwareBuilder for XtaskBuilder {
    async fn build(&self, observer: Arc<dyn FlashObserver>) -> Result<()> {
        if self.spec.apps.is_empty() {
            log::info!(
                "No app selected; building {} without apps",
                self.spec.target
            );
        }
        let code = self
            .runner
            .run_streaming(&self.spec.xtask_args(), observer)
            .await?;
        if code != 0 {
            return Err(BaoError::Build(format!("cargo xtask exited {}", code)));
        }
        Ok(())
    }
}
