//! Flash command implementations

use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;

use crate::cli::session::{ProgressPrinter, Session, install_cancel_handler};
use crate::config::ConfigStore;
use crate::models::SequenceOutcome;
use crate::services::{Orchestrator, SequenceMode, SequenceTimings, ensure_build_prereqs};
use crate::toolchain::{SystemRust, Toolchain, XtaskBuilder};
use crate::ui::Prompter;

/// Copy images only; `--force-all` skips the device version query
pub async fn execute_flash_command(session: &Session, force_all: bool) -> Result<ExitCode> {
    let mode = if force_all {
        SequenceMode::ForceAll
    } else {
        SequenceMode::FlashOnly
    };
    run_sequence(session, mode, false).await
}

pub async fn execute_flash_boot_monitor_command(
    session: &Session,
    attach_monitor: bool,
) -> Result<ExitCode> {
    run_sequence(session, SequenceMode::FlashBoot { attach_monitor }, false).await
}

pub async fn execute_build_flash_monitor_command(
    session: &Session,
    attach_monitor: bool,
) -> Result<ExitCode> {
    run_sequence(session, SequenceMode::FlashBoot { attach_monitor }, true).await
}

async fn run_sequence(session: &Session, mode: SequenceMode, build: bool) -> Result<ExitCode> {
    let toolchain = session.toolchain().await?;

    let builder = if build {
        match ensure_build_prereqs(
            toolchain.root(),
            &session.config.snapshot(),
            &SystemRust,
            session.prompter.as_ref(),
        )
        .await
        {
            Ok(spec) => Some(XtaskBuilder::new(toolchain.root().to_path_buf(), spec)),
            Err(failure) => {
                session.prompter.notify(failure.notice());
                return Ok(ExitCode::FAILURE);
            }
        }
    } else {
        None
    };

    let printer = ProgressPrinter::spawn();
    let ctx = session
        .flash_context(&toolchain, printer.observer.clone())
        .await?;
    let mut orchestrator = Orchestrator::new(ctx, SequenceTimings::default());
    if let Some(builder) = builder {
        orchestrator = orchestrator.with_builder(Arc::new(builder));
    }

    let cancel = install_cancel_handler();
    let outcome = orchestrator.run(mode, &cancel).await;
    drop(orchestrator);
    printer.finish().await;

    match outcome {
        SequenceOutcome::Completed(report) => {
            if report.run_port_ready == Some(true) {
                log::info!("🔌 Run-mode port is up");
            }
            log::info!("🎉 Done: {} file(s) flashed", report.copied);
            Ok(ExitCode::SUCCESS)
        }
        SequenceOutcome::Aborted { step, .. } => {
            log::debug!("Sequence stopped at: {}", step);
            Ok(ExitCode::FAILURE)
        }
    }
}
