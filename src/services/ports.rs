//! Serial port enumeration and the run-mode port waiter

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ConfigStore;
use crate::errors::{BaoError, Result};
use crate::models::{FlashEvent, FlashObserver, PortEntry, PortRole};
use crate::toolchain::{Toolchain, args};
use crate::ui::Prompter;
use crate::utils::poll::{PollConfig, poll};

/// Default wait for the device to re-enumerate in run mode
pub fn default_port_wait() -> PollConfig {
    PollConfig::new(Duration::from_secs(20), Duration::from_millis(500))
        .with_grace(Duration::from_millis(300))
}

/// Lists serial ports currently present
#[async_trait]
pub trait PortLister: Send + Sync {
    async fn list_ports(&self) -> Result<Vec<PortEntry>>;
}

/// Parse `bao.py ports` output: one port per line, optional TAB + description
pub fn parse_port_listing(stdout: &str) -> Vec<PortEntry> {
    stdout.lines().filter_map(PortEntry::parse_line).collect()
}

/// Ports as reported by `bao.py ports`
pub struct ToolchainPortLister {
    toolchain: Arc<dyn Toolchain>,
}

impl ToolchainPortLister {
    pub fn new(toolchain: Arc<dyn Toolchain>) -> Self {
        Self { toolchain }
    }
}

#[async_trait]
impl PortLister for ToolchainPortLister {
    async fn list_ports(&self) -> Result<Vec<PortEntry>> {
        let run = self.toolchain.run(&args(["ports"])).await?;
        if !run.success() {
            return Err(BaoError::Port(format!(
                "Could not list ports: {}",
                run.diagnostic()
            )));
        }
        Ok(parse_port_listing(&run.stdout))
    }
}

/// Ports as enumerated by the operating system
pub struct NativePortLister;

#[async_trait]
impl PortLister for NativePortLister {
    async fn list_ports(&self) -> Result<Vec<PortEntry>> {
        let ports = tokio::task::spawn_blocking(serialport::available_ports)
            .await
            .map_err(|e| BaoError::Port(format!("Port enumeration task failed: {}", e)))??;

        Ok(ports
            .into_iter()
            .map(|info| {
                let description = match info.port_type {
                    serialport::SerialPortType::UsbPort(usb) => Some(
                        usb.product
                            .unwrap_or_else(|| format!("USB {:04x}:{:04x}", usb.vid, usb.pid)),
                    ),
                    serialport::SerialPortType::PciPort => Some("PCI".to_string()),
                    serialport::SerialPortType::BluetoothPort => Some("Bluetooth".to_string()),
                    serialport::SerialPortType::Unknown => None,
                };
                PortEntry {
                    name: info.port_name,
                    description,
                }
            })
            .collect())
    }
}

/// Poll `lister` until `target` shows up or the wait times out.
///
/// Listing errors while the device re-enumerates are expected and count as
/// "not yet".
pub async fn wait_for_port(
    lister: &dyn PortLister,
    target: &str,
    config: PollConfig,
    observer: &dyn FlashObserver,
) -> bool {
    poll(config, |attempt| async move {
        observer.on_event(FlashEvent::PortPoll {
            port: target.to_string(),
            attempt,
        });
        match lister.list_ports().await {
            Ok(ports) => ports.iter().any(|p| p.name == target),
            Err(e) => {
                log::debug!("Port listing failed while waiting for {}: {}", target, e);
                false
            }
        }
    })
    .await
    .is_found()
}

/// Interactive port selection: list, pick, persist
pub struct PortSelector {
    lister: Arc<dyn PortLister>,
    prompter: Arc<dyn Prompter>,
    config: Arc<dyn ConfigStore>,
}

impl PortSelector {
    pub fn new(
        lister: Arc<dyn PortLister>,
        prompter: Arc<dyn Prompter>,
        config: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            lister,
            prompter,
            config,
        }
    }

    /// Returns the saved port, or `None` if nothing was chosen
    pub async fn select_and_save(&self, role: PortRole) -> Result<Option<String>> {
        let ports = self.lister.list_ports().await?;
        if ports.is_empty() {
            return Err(BaoError::Port("No serial ports found.".to_string()));
        }

        let Some(port) = self.prompter.select_port(role, &ports).await? else {
            return Ok(None);
        };
        self.config.set_serial_port(role, &port)?;
        log::debug!("{} serial port set to: {}", role.friendly_name(), port);
        Ok(Some(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoopObserver;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Returns scripted listings in order, repeating the last one
    struct ScriptedLister {
        script: Mutex<Vec<Result<Vec<PortEntry>>>>,
    }

    impl ScriptedLister {
        fn new(script: Vec<Result<Vec<PortEntry>>>) -> Self {
            Self {
                script: Mutex::new(script),
            }
        }
    }

    fn entries(names: &[&str]) -> Vec<PortEntry> {
        names
            .iter()
            .map(|n| PortEntry {
                name: n.to_string(),
                description: None,
            })
            .collect()
    }

    #[async_trait]
    impl PortLister for ScriptedLister {
        async fn list_ports(&self) -> Result<Vec<PortEntry>> {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.remove(0)
            } else {
                match &script[0] {
                    Ok(ports) => Ok(ports.clone()),
                    Err(e) => Err(BaoError::Port(e.to_string())),
                }
            }
        }
    }

    #[test]
    fn test_parse_port_listing() {
        let ports = parse_port_listing("COM3\tUSB Serial\r\n\r\nCOM7\n");
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].name, "COM3");
        assert_eq!(ports[1].name, "COM7");
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_through_transient_errors() {
        let lister = ScriptedLister::new(vec![
            Ok(entries(&["/dev/ttyACM0"])),
            Err(BaoError::Port("device busy".to_string())),
            Ok(entries(&[])),
            Ok(entries(&["/dev/ttyACM1"])),
        ]);
        let found = wait_for_port(
            &lister,
            "/dev/ttyACM1",
            default_port_wait(),
            &NoopObserver,
        )
        .await;
        assert!(found);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bound() {
        let lister = ScriptedLister::new(vec![Ok(entries(&["/dev/ttyACM0"]))]);
        let config = PollConfig::new(Duration::from_secs(3), Duration::from_millis(500));

        let start = Instant::now();
        let found = wait_for_port(&lister, "/dev/ttyACM1", config, &NoopObserver).await;
        let elapsed = start.elapsed();

        assert!(!found);
        assert!(elapsed >= config.timeout);
        assert!(elapsed <= config.timeout + config.interval);
    }
}
