//! Build prerequisites
//!
//! Checked before `cargo xtask` runs: rustc and cargo on PATH, the RISC-V
//! target installed (offered for install, never required), a build target
//! selected, and every selected app present under `apps-dabao/`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::models::{FollowUp, Notice};
use crate::services::apps::{apps_dir, list_apps, missing_apps};
use crate::toolchain::{BuildSpec, RISCV_TARGET, RustEnvironment};
use crate::ui::Prompter;

pub const INSTALL: &str = "Install";
pub const IGNORE: &str = "Ignore";

/// Why a build cannot start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrereqFailure {
    RustMissing { tool: String },
    TargetInstallFailed { target: String, reason: String },
    NoBuildTarget,
    MissingApps { apps_dir: PathBuf, missing: Vec<String> },
}

impl PrereqFailure {
    pub fn notice(&self) -> Notice {
        match self {
            PrereqFailure::RustMissing { .. } | PrereqFailure::TargetInstallFailed { .. } => {
                Notice::error(self.to_string())
            }
            PrereqFailure::NoBuildTarget => {
                Notice::warning(self.to_string()).with_follow_up(FollowUp::SelectTarget)
            }
            PrereqFailure::MissingApps { .. } => {
                Notice::error(self.to_string()).with_follow_up(FollowUp::SelectApp)
            }
        }
    }
}

impl fmt::Display for PrereqFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrereqFailure::RustMissing { tool } if tool == "rustc" => write!(
                f,
                "Rust not found. Please install Rust from https://rustup.rs before building."
            ),
            PrereqFailure::RustMissing { tool } => write!(
                f,
                "{} not found. Make sure Rust is installed correctly and in PATH.",
                tool
            ),
            PrereqFailure::TargetInstallFailed { target, reason } => write!(
                f,
                "Failed to install {} ({}). Run manually: rustup target add {}",
                target, reason, target
            ),
            PrereqFailure::NoBuildTarget => write!(f, "No build target set."),
            PrereqFailure::MissingApps { apps_dir, missing } if missing.len() == 1 => write!(
                f,
                "App '{}' not found under {}",
                missing[0],
                apps_dir.display()
            ),
            PrereqFailure::MissingApps { apps_dir, missing } => write!(
                f,
                "Apps not found under {}: {}",
                apps_dir.display(),
                missing.join(", ")
            ),
        }
    }
}

/// rustc and cargo must run; a missing RISC-V target is offered for install
pub async fn check_rust_toolchain(
    env: &dyn RustEnvironment,
    prompter: &dyn Prompter,
) -> Result<(), PrereqFailure> {
    for tool in ["rustc", "cargo"] {
        match env.tool_version(tool).await {
            Some(version) => log::debug!("{}", version),
            None => {
                return Err(PrereqFailure::RustMissing {
                    tool: tool.to_string(),
                });
            }
        }
    }

    let Some(targets) = env.installed_targets().await else {
        log::warn!("rustup not available; cannot check for {}", RISCV_TARGET);
        return Ok(());
    };
    if targets.iter().any(|t| t == RISCV_TARGET) {
        return Ok(());
    }

    let message = format!(
        "The RISC-V target `{}` is not installed. Install it now?",
        RISCV_TARGET
    );
    match prompter.choose(&message, &[INSTALL, IGNORE]).await {
        Ok(Some(0)) => match env.add_target(RISCV_TARGET).await {
            Ok(()) => {
                log::info!("✅ Installed {}", RISCV_TARGET);
                Ok(())
            }
            Err(e) => Err(PrereqFailure::TargetInstallFailed {
                target: RISCV_TARGET.to_string(),
                reason: e.detail(),
            }),
        },
        Ok(_) => {
            log::warn!("Continuing without {}", RISCV_TARGET);
            Ok(())
        }
        Err(e) => {
            log::warn!("Continuing without {}: {}", RISCV_TARGET, e);
            Ok(())
        }
    }
}

/// Everything `cargo xtask` needs, resolved into the build to run
pub async fn ensure_build_prereqs(
    root: &Path,
    config: &AppConfig,
    env: &dyn RustEnvironment,
    prompter: &dyn Prompter,
) -> Result<BuildSpec, PrereqFailure> {
    check_rust_toolchain(env, prompter).await?;

    let spec = BuildSpec::from_config(config).map_err(|_| PrereqFailure::NoBuildTarget)?;

    let missing = missing_apps(root, &spec.apps);
    if !missing.is_empty() {
        return Err(PrereqFailure::MissingApps {
            apps_dir: apps_dir(root),
            missing,
        });
    }

    if spec.apps.is_empty() {
        log::info!(
            "No app selected; {} app(s) available under {}",
            list_apps(root).len(),
            apps_dir(root).display()
        );
    }
    Ok(spec)
}
