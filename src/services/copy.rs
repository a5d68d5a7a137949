//! Copies firmware images onto the device drive

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::{FlashEvent, FlashObserver, FlashOutcome};
use crate::utils::text::{MAX_DIAGNOSTIC_CHARS, truncate_diagnostic};

/// Copy `files` into `destination` one at a time, in the given order.
///
/// `cancel` is checked before each file; files already copied stay on the
/// drive. Existing files with the same name are overwritten.
pub async fn flash_files(
    destination: &Path,
    files: &[PathBuf],
    cancel: &AtomicBool,
    observer: &dyn FlashObserver,
) -> FlashOutcome {
    let total = files.len();
    observer.on_event(FlashEvent::CopyStarted {
        total,
        destination: destination.to_path_buf(),
    });

    let mut copied = 0usize;
    for (index, source) in files.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            log::debug!("Flash cancelled after {}/{} files", copied, total);
            return finish(observer, FlashOutcome::Cancelled { copied });
        }

        observer.on_event(FlashEvent::FileCopying {
            index,
            total,
            file: source.clone(),
        });

        match copy_one(source, destination).await {
            Ok(sha256) => {
                copied += 1;
                log::debug!(
                    "Flashed {} ({}/{}) sha256 {}",
                    source.display(),
                    copied,
                    total,
                    sha256
                );
                observer.on_event(FlashEvent::FileCopied {
                    copied,
                    total,
                    file: source.clone(),
                    sha256,
                });
            }
            Err(message) => {
                log::debug!("Copy of {} failed: {}", source.display(), message);
                return finish(
                    observer,
                    FlashOutcome::Failed {
                        copied,
                        message: truncate_diagnostic(&message, MAX_DIAGNOSTIC_CHARS),
                    },
                );
            }
        }
    }

    finish(observer, FlashOutcome::Success { copied })
}

fn finish(observer: &dyn FlashObserver, outcome: FlashOutcome) -> FlashOutcome {
    observer.on_event(FlashEvent::CopyFinished(outcome.clone()));
    outcome
}

/// Copy one file, returning its SHA-256
async fn copy_one(source: &Path, destination: &Path) -> std::result::Result<String, String> {
    let file_name = source
        .file_name()
        .ok_or_else(|| format!("{} has no file name", source.display()))?;

    let data = tokio::fs::read(source)
        .await
        .map_err(|e| format!("{}: {}", source.display(), e))?;
    let digest = format!("{:x}", Sha256::digest(&data));

    let target = destination.join(file_name);
    tokio::fs::write(&target, &data)
        .await
        .map_err(|e| format!("{}: {}", target.display(), e))?;

    Ok(digest)
}
