//! Serial monitor hand-off

use async_trait::async_trait;

use crate::config::MonitorSettings;
use crate::errors::{BaoError, Result};
use crate::toolchain::BaoToolchain;

/// Attaches an interactive serial monitor once the device is running
#[async_trait]
pub trait MonitorLauncher: Send + Sync {
    async fn attach(&self, port: &str, baud: u32) -> Result<()>;
}

/// `bao.py monitor` arguments for the given settings
pub fn monitor_args(port: &str, baud: u32, settings: &MonitorSettings) -> Vec<String> {
    let mut args = vec![
        "monitor".to_string(),
        "-p".to_string(),
        port.to_string(),
        "-b".to_string(),
        baud.to_string(),
    ];
    if settings.timestamp.unwrap_or(false) {
        args.push("--ts".to_string());
    }
    if settings.crlf.unwrap_or(false) {
        args.push("--crlf".to_string());
    }
    if settings.raw.unwrap_or(false) {
        args.push("--raw".to_string());
    }
    if !settings.echo.unwrap_or(false) {
        args.push("--no-echo".to_string());
    }
    if settings.rtscts.unwrap_or(false) {
        args.push("--rtscts".to_string());
    }
    if settings.xonxoff.unwrap_or(false) {
        args.push("--xonxoff".to_string());
    }
    if settings.dsrdtr.unwrap_or(false) {
        args.push("--dsrdtr".to_string());
    }
    args
}

/// Runs `bao.py monitor` in the foreground
pub struct BaoMonitor {
    toolchain: BaoToolchain,
    settings: MonitorSettings,
}

impl BaoMonitor {
    pub fn new(toolchain: BaoToolchain, settings: MonitorSettings) -> Self {
        Self {
            toolchain,
            settings,
        }
    }
}

#[async_trait]
impl MonitorLauncher for BaoMonitor {
    async fn attach(&self, port: &str, baud: u32) -> Result<()> {
        let status = self
            .toolchain
            .run_attached(&monitor_args(port, baud, &self.settings))
            .await?;
        if !status.success() {
            return Err(BaoError::Toolchain(format!(
                "monitor on {} exited with {}",
                port, status
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_flags() {
        let settings = MonitorSettings {
            crlf: Some(true),
            echo: Some(false),
            ..Default::default()
        };
        assert_eq!(
            monitor_args("COM7", 1_000_000, &settings),
            vec!["monitor", "-p", "COM7", "-b", "1000000", "--crlf", "--no-echo"]
        );

        let settings = MonitorSettings {
            echo: Some(true),
            timestamp: Some(true),
            ..Default::default()
        };
        assert_eq!(
            monitor_args("/dev/ttyACM1", 115_200, &settings),
            vec!["monitor", "-p", "/dev/ttyACM1", "-b", "115200", "--ts"]
        );
    }

    #[test]
    fn test_flow_control_flags() {
        let settings = MonitorSettings {
            echo: Some(true),
            rtscts: Some(true),
            dsrdtr: Some(true),
            ..Default::default()
        };
        assert_eq!(
            monitor_args("COM7", 1_000_000, &settings),
            vec!["monitor", "-p", "COM7", "-b", "1000000", "--rtscts", "--dsrdtr"]
        );
    }
}
