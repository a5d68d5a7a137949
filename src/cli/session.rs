//! Per-invocation wiring: settings store, prompter, toolchain and ports

use anyhow::{Result, anyhow};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cli::args::Cli;
use crate::cli::progress::print_events;
use crate::config::{ConfigStore, FileConfigStore, PortSource};
use crate::models::{FlashEvent, FlashObserver, FollowUp};
use crate::services::{
    FlashContext, NativePortLister, PortLister, ToolchainPortLister, check_tools_version,
};
use crate::toolchain::{BaoMonitor, BaoToolchain, Toolchain};
use crate::ui::{Prompter, TerminalPrompter};

pub struct Session {
    pub config: Arc<FileConfigStore>,
    pub prompter: Arc<TerminalPrompter>,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => FileConfigStore::single(path.clone()),
            None => FileConfigStore::discover(&std::env::current_dir()?),
        };
        log::debug!("Settings are written to {}", config.writable_path().display());

        Ok(Self {
            config: Arc::new(config),
            prompter: Arc::new(TerminalPrompter::new(cli.yes)),
        })
    }

    /// Locate `bao.py` and enforce the minimum tools version
    pub async fn toolchain(&self) -> Result<BaoToolchain> {
        let settings = self.config.snapshot();
        let toolchain = BaoToolchain::from_config(&settings).map_err(|e| {
            anyhow!(
                "{}\n   → {}",
                e,
                FollowUp::SetToolchainPath.command_hint()
            )
        })?;

        let found = check_tools_version(&toolchain, settings.required_tools_version()).await?;
        log::info!("🧰 tools-bao v{} at {}", found, toolchain.root().display());
        Ok(toolchain)
    }

    /// Configured xous-core checkout, without probing the toolchain
    pub fn xous_core_root(&self) -> Result<PathBuf> {
        self.config
            .snapshot()
            .xous_core_path
            .filter(|root| root.is_dir())
            .ok_or_else(|| {
                anyhow!(
                    "xous-core path not set or not a directory\n   → {}",
                    FollowUp::SetToolchainPath.command_hint()
                )
            })
    }

    /// Lister for the configured port source. The toolchain is only located when it is the source.
    pub async fn port_lister(&self, toolchain: Option<&BaoToolchain>) -> Result<Arc<dyn PortLister>> {
        match self.config.snapshot().port_source() {
            PortSource::Native => Ok(Arc::new(NativePortLister)),
            PortSource::Toolchain => {
                let toolchain = match toolchain {
                    Some(toolchain) => toolchain.clone(),
                    None => self.toolchain().await?,
                };
                Ok(Arc::new(ToolchainPortLister::new(Arc::new(toolchain))))
            }
        }
    }

    pub async fn flash_context(
        &self,
        toolchain: &BaoToolchain,
        observer: Arc<dyn FlashObserver>,
    ) -> Result<FlashContext> {
        let monitor = BaoMonitor::new(toolchain.clone(), self.config.snapshot().monitor);
        Ok(FlashContext {
            config: self.config.clone() as Arc<dyn ConfigStore>,
            toolchain: Arc::new(toolchain.clone()),
            prompter: self.prompter.clone() as Arc<dyn Prompter>,
            ports: self.port_lister(Some(toolchain)).await?,
            monitor: Arc::new(monitor),
            observer,
        })
    }
}

/// Channel-backed observer plus the task printing its events
pub struct ProgressPrinter {
    pub observer: Arc<mpsc::UnboundedSender<FlashEvent>>,
    handle: JoinHandle<()>,
}

impl ProgressPrinter {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<FlashEvent>();
        Self {
            observer: Arc::new(tx),
            handle: tokio::spawn(print_events(rx)),
        }
    }

    /// Drop the sender side and wait for buffered events to print
    pub async fn finish(self) {
        let Self { observer, handle } = self;
        drop(observer);
        let _ = handle.await;
    }
}

/// Cancellation flag raised by Ctrl+C. The sequence checks it before each
/// step and before each image; a second Ctrl+C exits immediately.
pub fn install_cancel_handler() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!(
                "🛑 Stopping once the current step or image finishes (Ctrl+C again to exit now)"
            );
            flag.store(true, Ordering::SeqCst);
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
    cancel
}
