//! Flash location resolution
//!
//! The device shows up as a removable drive while in bootloader mode. The
//! drive can vanish between runs (reset, unplug, slow mount), so the
//! configured path is re-validated every time it is about to be used.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ConfigStore;
use crate::errors::{BaoError, Result};
use crate::ui::Prompter;
use crate::utils::poll::{PollConfig, poll};

pub const SELECT_FOLDER: &str = "Select Folder";
pub const SELECT_NEW_LOCATION: &str = "Select New Location";
pub const CONTINUE: &str = "Continue";

/// Default wait for a freshly reset drive to mount
pub fn default_drive_wait() -> PollConfig {
    PollConfig::new(Duration::from_secs(8), Duration::from_millis(500))
}

fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

pub struct DestinationResolver {
    config: Arc<dyn ConfigStore>,
    prompter: Arc<dyn Prompter>,
    drive_wait: PollConfig,
}

impl DestinationResolver {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        prompter: Arc<dyn Prompter>,
        drive_wait: PollConfig,
    ) -> Self {
        Self {
            config,
            prompter,
            drive_wait,
        }
    }

    /// Return a flash location that exists right now.
    ///
    /// `Ok(None)` means the user declined a prompt. `Err` means a location
    /// was chosen but is not usable.
    pub async fn ensure_flash_location(&self) -> Result<Option<PathBuf>> {
        let configured = self.config.flash_location();

        let dest = match configured {
            Some(dest) => dest,
            None => {
                let proceed = self
                    .prompter
                    .confirm(
                        "Select the drive where BAOCHIP is mounted.\n\n\
                         • The board should appear as a removable drive named \"BAOCHIP\".\n\
                         • If you can't see it, press RESET on the board.",
                        SELECT_FOLDER,
                    )
                    .await?;
                if !proceed {
                    return Ok(None);
                }
                return self.pick_and_save().await;
            }
        };

        if is_directory(&dest) {
            log::debug!("Flash location {} is present", dest.display());
            return Ok(Some(dest));
        }

        let choice = self
            .prompter
            .choose(
                &format!(
                    "Device not found at {}\n\n\
                     • Is the board plugged in?\n\
                     • Is the board in bootloader mode? (press RESET on the board)\n\n\
                     Select \"{}\" if the device appears after checking cable and pressing RESET.\n\
                     Otherwise, select a new location for the BAOCHIP device.",
                    dest.display(),
                    CONTINUE
                ),
                &[SELECT_NEW_LOCATION, CONTINUE],
            )
            .await?;

        match choice {
            Some(0) => self.pick_and_save().await,
            Some(1) => {
                log::info!(
                    "Waiting up to {:?} for {} to appear",
                    self.drive_wait.timeout,
                    dest.display()
                );
                let appeared = poll(self.drive_wait, |attempt| {
                    let present = is_directory(&dest);
                    log::trace!("drive check {}: present={}", attempt, present);
                    async move { present }
                })
                .await;
                if appeared.is_found() {
                    Ok(Some(dest))
                } else {
                    Err(BaoError::Device(format!(
                        "Drive did not appear at: {}",
                        dest.display()
                    )))
                }
            }
            _ => Ok(None),
        }
    }

    /// Ask for a directory, validate it, persist it
    async fn pick_and_save(&self) -> Result<Option<PathBuf>> {
        let Some(picked) = self
            .prompter
            .select_directory("Select mounted BAOCHIP drive")
            .await?
        else {
            return Ok(None);
        };

        if !is_directory(&picked) {
            return Err(BaoError::Config(format!(
                "Selected location is not accessible: {}",
                picked.display()
            )));
        }

        self.config.set_flash_location(&picked)?;
        log::info!("Flash location set to {}", picked.display());
        Ok(Some(picked))
    }
}
