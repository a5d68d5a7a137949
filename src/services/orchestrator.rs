//! Flash/boot sequence
//!
//! resolve destination → gather images → resolve bootloader port → compare
//! versions → select images → copy → boot → resolve run port → wait for run
//! port → attach monitor.
//!
//! Every abort is terminal for the run and produces exactly one notice. The
//! only retries are the bounded drive and port polls. A cancel request stops
//! the run at the next step, or before the next image while copying.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::ConfigStore;
use crate::errors::BaoError;
use crate::models::{
    FlashEvent, FlashObserver, FlashOutcome, FlashStep, FollowUp, Notice, PortRole,
    SequenceOutcome, SequenceReport,
};
use crate::services::artifacts::gather_artifacts;
use crate::services::boot::{DEFAULT_BOOT_TIMEOUT, send_boot};
use crate::services::copy::flash_files;
use crate::services::destination::{DestinationResolver, default_drive_wait};
use crate::services::ports::{PortLister, PortSelector, default_port_wait, wait_for_port};
use crate::services::version::get_update_all_info;
use crate::toolchain::{FirmwareBuilder, MonitorLauncher, Toolchain};
use crate::ui::Prompter;
use crate::utils::poll::PollConfig;

/// Collaborators shared by every step
#[derive(Clone)]
pub struct FlashContext {
    pub config: Arc<dyn ConfigStore>,
    pub toolchain: Arc<dyn Toolchain>,
    pub prompter: Arc<dyn Prompter>,
    pub ports: Arc<dyn PortLister>,
    pub monitor: Arc<dyn MonitorLauncher>,
    pub observer: Arc<dyn FlashObserver>,
}

/// Timing knobs for the polling steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTimings {
    pub drive_wait: PollConfig,
    pub port_wait: PollConfig,
    pub boot_timeout: Duration,
}

impl Default for SequenceTimings {
    fn default() -> Self {
        Self {
            drive_wait: default_drive_wait(),
            port_wait: default_port_wait(),
            boot_timeout: DEFAULT_BOOT_TIMEOUT,
        }
    }
}

/// How much of the sequence to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceMode {
    /// Version-aware copy, no boot
    FlashOnly,
    /// Copy every present image without asking the device
    ForceAll,
    /// Full sequence through the run-mode port
    FlashBoot { attach_monitor: bool },
}

pub struct Orchestrator {
    ctx: FlashContext,
    timings: SequenceTimings,
    builder: Option<Arc<dyn FirmwareBuilder>>,
}

impl Orchestrator {
    pub fn new(ctx: FlashContext, timings: SequenceTimings) -> Self {
        Self {
            ctx,
            timings,
            builder: None,
        }
    }

    /// Build before flashing
    pub fn with_builder(mut self, builder: Arc<dyn FirmwareBuilder>) -> Self {
        self.builder = Some(builder);
        self
    }

    /// Announce `step`, or stop here when cancellation was requested
    fn enter(&self, step: FlashStep, cancel: &AtomicBool) -> Result<(), SequenceOutcome> {
        if cancel.load(Ordering::SeqCst) {
            return Err(self.abort(
                step,
                Notice::warning(format!("Cancelled before '{}'.", step)),
            ));
        }
        log::debug!("▶ {}", step);
        self.ctx.observer.on_event(FlashEvent::StepStarted(step));
        Ok(())
    }

    fn abort(&self, step: FlashStep, notice: Notice) -> SequenceOutcome {
        log::debug!("Aborted at '{}': {}", step, notice.message);
        let message = notice.message.clone();
        self.ctx.prompter.notify(notice);
        SequenceOutcome::Aborted { step, message }
    }

    pub async fn run(&self, mode: SequenceMode, cancel: &AtomicBool) -> SequenceOutcome {
        match self.sequence(mode, cancel).await {
            Ok(report) => SequenceOutcome::Completed(report),
            Err(aborted) => aborted,
        }
    }

    async fn sequence(
        &self,
        mode: SequenceMode,
        cancel: &AtomicBool,
    ) -> Result<SequenceReport, SequenceOutcome> {
        let mut report = SequenceReport::default();

        if let Some(builder) = &self.builder {
            self.enter(FlashStep::Build, cancel)?;
            if let Err(e) = builder.build(self.ctx.observer.clone()).await {
                let notice = match e {
                    BaoError::Config(msg) => {
                        Notice::warning(msg).with_follow_up(FollowUp::SelectTarget)
                    }
                    other => Notice::error(format!("Build failed. {}", other)),
                };
                return Err(self.abort(FlashStep::Build, notice));
            }
        }

        // 1. Destination
        self.enter(FlashStep::ResolveDestination, cancel)?;
        let resolver = DestinationResolver::new(
            self.ctx.config.clone(),
            self.ctx.prompter.clone(),
            self.timings.drive_wait,
        );
        let destination: PathBuf = match resolver.ensure_flash_location().await {
            Ok(Some(dest)) => dest,
            Ok(None) => {
                return Err(self.abort(
                    FlashStep::ResolveDestination,
                    Notice::warning("No flash location selected; flash aborted.")
                        .with_follow_up(FollowUp::SelectFlashLocation),
                ));
            }
            Err(e) => {
                return Err(self.abort(
                    FlashStep::ResolveDestination,
                    Notice::error(e.detail()).with_follow_up(FollowUp::SelectFlashLocation),
                ));
            }
        };

        // 2. Images
        self.enter(FlashStep::GatherArtifacts, cancel)?;
        let catalog = gather_artifacts(self.ctx.toolchain.as_ref()).await;
        if catalog.is_empty() {
            return Err(self.abort(
                FlashStep::GatherArtifacts,
                Notice::warning("No UF2 images found (loader/xous/apps). Build first, then flash.")
                    .with_follow_up(FollowUp::Build),
            ));
        }

        let baud = self.ctx.config.default_baud();
        let mut bootloader_port = None;

        let files = if mode == SequenceMode::ForceAll {
            log::info!("Force mode: flashing all available images (no version check)");
            catalog.all.clone()
        } else {
            // 3. Bootloader-mode port
            self.enter(FlashStep::ResolveBootloaderPort, cancel)?;
            let Some(port) = self.ctx.config.serial_port(PortRole::Bootloader) else {
                return Err(self.bootloader_port_unset().await);
            };

            // 4. Versions
            self.enter(FlashStep::CompareVersions, cancel)?;
            let version =
                match get_update_all_info(self.ctx.toolchain.as_ref(), &port, baud).await {
                    Ok(info) => info,
                    Err(e) => {
                        let notice = Notice::error(e.to_string());
                        return Err(self.abort(FlashStep::CompareVersions, notice));
                    }
                };

            // 5. Selection
            self.enter(FlashStep::SelectFiles, cancel)?;
            let files = catalog.select(version.update_all);
            if files.is_empty() {
                let message = if version.update_all {
                    "No UF2 images found (loader/xous/apps). Build first, then flash."
                } else {
                    "No application image found. Build an app first, then flash."
                };
                return Err(self.abort(
                    FlashStep::SelectFiles,
                    Notice::warning(message).with_follow_up(FollowUp::Build),
                ));
            }
            report.version = Some(version);
            bootloader_port = Some(port);
            files
        };

        // 6. Copy
        self.enter(FlashStep::CopyFiles, cancel)?;
        if !destination.is_dir() {
            return Err(self.abort(
                FlashStep::CopyFiles,
                Notice::error(format!("Device not found at {}", destination.display()))
                    .with_follow_up(FollowUp::SelectFlashLocation),
            ));
        }
        let outcome = flash_files(&destination, &files, cancel, self.ctx.observer.as_ref()).await;
        if !outcome.is_success() {
            log::debug!(
                "{} of {} image(s) left on {}",
                outcome.copied(),
                files.len(),
                destination.display()
            );
        }
        match &outcome {
            FlashOutcome::Success { copied } => {
                report.copied = *copied;
                self.ctx.prompter.notify(Notice::info(format!(
                    "Flashed {} file(s) to {}.",
                    copied,
                    destination.display()
                )));
            }
            FlashOutcome::Cancelled { .. } => {
                return Err(self.abort(FlashStep::CopyFiles, Notice::warning("Flash cancelled.")));
            }
            FlashOutcome::Failed { message, .. } => {
                return Err(self.abort(
                    FlashStep::CopyFiles,
                    Notice::error(format!("Flash failed: {}", message)),
                ));
            }
        }

        let (SequenceMode::FlashBoot { attach_monitor }, Some(bootloader_port)) =
            (mode, bootloader_port)
        else {
            return Ok(report);
        };

        // 7. Boot
        self.enter(FlashStep::SendBoot, cancel)?;
        if let Err(e) = send_boot(
            self.ctx.toolchain.as_ref(),
            &bootloader_port,
            baud,
            self.timings.boot_timeout,
            self.ctx.observer.as_ref(),
        )
        .await
        {
            return Err(self.abort(FlashStep::SendBoot, Notice::error(e.to_string())));
        }

        // 8. Run-mode port
        self.enter(FlashStep::ResolveRunPort, cancel)?;
        let run_port = match self.ctx.config.serial_port(PortRole::Run) {
            Some(port) => port,
            None => match self.port_selector().select_and_save(PortRole::Run).await {
                Ok(Some(port)) => port,
                Ok(None) => {
                    return Err(self.abort(
                        FlashStep::ResolveRunPort,
                        Notice::info("No run-mode serial port set. Pick one first.")
                            .with_follow_up(FollowUp::SetRunPort),
                    ));
                }
                Err(e) => {
                    return Err(self.abort(
                        FlashStep::ResolveRunPort,
                        Notice::error(e.detail()).with_follow_up(FollowUp::SetRunPort),
                    ));
                }
            },
        };
        if run_port == bootloader_port {
            log::warn!(
                "Run-mode and bootloader-mode ports are both {}; the device normally re-enumerates under a new name",
                run_port
            );
        }

        // 9. Wait for re-enumeration
        self.enter(FlashStep::WaitForRunPort, cancel)?;
        let ready = wait_for_port(
            self.ctx.ports.as_ref(),
            &run_port,
            self.timings.port_wait,
            self.ctx.observer.as_ref(),
        )
        .await;
        if !ready {
            self.ctx.prompter.notify(Notice::warning(format!(
                "Run-mode port {} did not appear within {}s; attaching anyway.",
                run_port,
                self.timings.port_wait.timeout.as_secs()
            )));
        }
        report.run_port_ready = Some(ready);

        // 10. Monitor
        if attach_monitor {
            self.enter(FlashStep::AttachMonitor, cancel)?;
            match self.ctx.monitor.attach(&run_port, baud).await {
                Ok(()) => report.monitor_attached = true,
                Err(e) => {
                    self.ctx
                        .prompter
                        .notify(Notice::warning(format!("Monitor on {} failed: {}", run_port, e)));
                }
            }
        }

        Ok(report)
    }

    fn port_selector(&self) -> PortSelector {
        PortSelector::new(
            self.ctx.ports.clone(),
            self.ctx.prompter.clone(),
            self.ctx.config.clone(),
        )
    }

    /// Offer the port picker, then stop. A freshly picked bootloader port is
    /// saved but never used by the same run.
    async fn bootloader_port_unset(&self) -> SequenceOutcome {
        let step = FlashStep::ResolveBootloaderPort;
        let notice = match self.port_selector().select_and_save(PortRole::Bootloader).await {
            Ok(Some(port)) => Notice::info(format!(
                "Bootloader-mode serial port set to {}. Run the command again to flash.",
                port
            )),
            Ok(None) => Notice::info("Bootloader-mode serial port not set. Set it first.")
                .with_follow_up(FollowUp::SetBootloaderPort),
            Err(e) => Notice::error(e.detail()).with_follow_up(FollowUp::SetBootloaderPort),
        };
        self.abort(step, notice)
    }
}
