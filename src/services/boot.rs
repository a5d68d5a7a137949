//! Boot command: leave bootloader/drive mode and start the firmware

use std::time::Duration;

use crate::errors::{BaoError, Result};
use crate::models::{FlashEvent, FlashObserver};
use crate::toolchain::{Toolchain, args};

/// Upper bound for the one-shot boot command
pub const DEFAULT_BOOT_TIMEOUT: Duration = Duration::from_secs(15);

/// Send `boot` over the bootloader-mode port. One shot: either the command
/// exits cleanly or the call fails; it never waits on further device output.
pub async fn send_boot(
    toolchain: &dyn Toolchain,
    port: &str,
    baud: u32,
    limit: Duration,
    observer: &dyn FlashObserver,
) -> Result<()> {
    log::info!("Sending 'boot' to {} @ {}", port, baud);

    let run = toolchain
        .run_bounded(
            &args([
                "boot".to_string(),
                "-p".to_string(),
                port.to_string(),
                "-b".to_string(),
                baud.to_string(),
            ]),
            limit,
        )
        .await
        .map_err(|e| BaoError::Boot(e.to_string()))?;

    for line in run.stdout.lines().chain(run.stderr.lines()) {
        if !line.trim().is_empty() {
            observer.on_event(FlashEvent::Output(line.to_string()));
        }
    }

    if !run.success() {
        return Err(BaoError::Boot(run.diagnostic()));
    }

    log::info!("boot command succeeded");
    Ok(())
}
