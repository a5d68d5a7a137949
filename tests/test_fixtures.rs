//! Test fixtures for baobrew testing
//!
//! A [`Workbench`] is a temporary xous-core checkout with built UF2 images and
//! a directory standing in for the mounted BAOCHIP drive.

#![allow(dead_code)]

use baobrew::config::AppConfig;
use baobrew::services::SequenceTimings;
use baobrew::toolchain::ToolRun;
use baobrew::utils::poll::PollConfig;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const BOOTLOADER_PORT: &str = "/dev/ttyACM0";
pub const RUN_PORT: &str = "/dev/ttyACM1";

pub struct Workbench {
    pub temp: TempDir,
    pub root: PathBuf,
    pub drive: PathBuf,
}

impl Workbench {
    /// Checkout plus a mounted drive
    pub fn new() -> std::io::Result<Self> {
        let temp = TempDir::new()?;
        let root = temp.path().join("xous-core");
        let drive = temp.path().join("BAOCHIP");
        fs::create_dir_all(root.join("target").join("uf2"))?;
        fs::create_dir_all(&drive)?;
        Ok(Self { temp, root, drive })
    }

    /// Write UF2 files for `roles` (any of loader/xous/apps) and return the
    /// `bao.py artifacts --json` payload describing them
    pub fn build_images(&self, roles: &[&str]) -> std::io::Result<String> {
        let mut images = Vec::new();
        for role in roles {
            let relative = format!("target/uf2/{}.uf2", role);
            fs::write(self.root.join(&relative), format!("UF2 image for {}", role))?;
            images.push(json!({ "path": relative, "role": role }));
        }
        Ok(json!({ "images": images }).to_string())
    }

    pub fn image(&self, role: &str) -> PathBuf {
        self.root.join("target").join("uf2").join(format!("{}.uf2", role))
    }

    /// File names currently on the drive, sorted
    pub fn drive_contents(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.drive)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Settings with both ports and the drive configured
    pub fn config(&self) -> AppConfig {
        AppConfig {
            flash_location: Some(self.drive.clone()),
            serial_port_bootloader: Some(BOOTLOADER_PORT.to_string()),
            serial_port_run: Some(RUN_PORT.to_string()),
            xous_core_path: Some(self.root.clone()),
            ..Default::default()
        }
    }

    pub fn unmount_drive(&self) -> std::io::Result<()> {
        fs::remove_dir_all(&self.drive)
    }
}

pub fn update_all_json(update_all: bool) -> String {
    json!({
        "updateAll": update_all,
        "localSemver": "0.9.16",
        "localTimestamp": 1760000000,
        "boardSemver": if update_all { "0.9.15" } else { "0.9.16" },
        "boardTimestamp": "1750000000",
    })
    .to_string()
}

pub fn ok(stdout: &str) -> ToolRun {
    ToolRun::ok(stdout)
}

/// Short waits so real-time tests stay fast
pub fn quick_timings() -> SequenceTimings {
    SequenceTimings {
        drive_wait: PollConfig::new(Duration::from_millis(400), Duration::from_millis(20)),
        port_wait: PollConfig::new(Duration::from_millis(400), Duration::from_millis(20)),
        boot_timeout: Duration::from_secs(5),
    }
}
