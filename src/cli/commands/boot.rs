//! Boot command implementation

use anyhow::Result;
use std::process::ExitCode;

use crate::cli::session::{ProgressPrinter, Session};
use crate::config::ConfigStore;
use crate::models::{FollowUp, Notice, PortRole};
use crate::services::{DEFAULT_BOOT_TIMEOUT, send_boot};
use crate::ui::Prompter;

pub async fn execute_boot_command(session: &Session) -> Result<ExitCode> {
    let toolchain = session.toolchain().await?;

    let Some(port) = session.config.serial_port(PortRole::Bootloader) else {
        session.prompter.notify(
            Notice::info("Bootloader-mode serial port not set. Set it first.")
                .with_follow_up(FollowUp::SetBootloaderPort),
        );
        return Ok(ExitCode::FAILURE);
    };

    let printer = ProgressPrinter::spawn();
    let result = send_boot(
        &toolchain,
        &port,
        session.config.default_baud(),
        DEFAULT_BOOT_TIMEOUT,
        &*printer.observer,
    )
    .await;
    printer.finish().await;

    match result {
        Ok(()) => {
            log::info!("🚀 Boot command sent on {}", port);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            session.prompter.notify(Notice::error(e.to_string()));
            Ok(ExitCode::FAILURE)
        }
    }
}
