//! Persisted settings
//!
//! Every field is optional so a workspace file can override a subset of the
//! global file. Accessors apply defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::{BaoError, Result};
use crate::models::PortRole;

pub const DEFAULT_BAUD: u32 = 1_000_000;
pub const DEFAULT_PYTHON: &str = "python";
pub const DEFAULT_REQUIRED_TOOLS_VERSION: &str = "0.1.0";

/// Where serial port listings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PortSource {
    /// `bao.py ports`
    #[default]
    Toolchain,
    /// The `serialport` crate's native enumeration
    Native,
}

/// Serial monitor settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_baud: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_port: Option<PortRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crlf: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<bool>,
    /// Hardware (RTS/CTS) flow control
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtscts: Option<bool>,
    /// Software (XON/XOFF) flow control
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xonxoff: Option<bool>,
    /// Hardware (DSR/DTR) flow control
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsrdtr: Option<bool>,
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Mounted device drive that receives firmware images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_location: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_port_bootloader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_port_run: Option<String>,
    /// Python launcher; may carry leading arguments (`uv run python`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xous_core_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_target: Option<String>,
    /// Whitespace-separated app names passed to `cargo xtask`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_source: Option<PortSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tools_version: Option<String>,
    #[serde(default)]
    pub monitor: MonitorSettings,
}

impl AppConfig {
    /// Fields set in `other` win
    pub fn overlay(self, other: AppConfig) -> AppConfig {
        AppConfig {
            flash_location: other.flash_location.or(self.flash_location),
            serial_port_bootloader: other.serial_port_bootloader.or(self.serial_port_bootloader),
            serial_port_run: other.serial_port_run.or(self.serial_port_run),
            python_command: other.python_command.or(self.python_command),
            xous_core_path: other.xous_core_path.or(self.xous_core_path),
            build_target: other.build_target.or(self.build_target),
            app_name: other.app_name.or(self.app_name),
            port_source: other.port_source.or(self.port_source),
            required_tools_version: other.required_tools_version.or(self.required_tools_version),
            monitor: MonitorSettings {
                default_baud: other.monitor.default_baud.or(self.monitor.default_baud),
                default_port: other.monitor.default_port.or(self.monitor.default_port),
                crlf: other.monitor.crlf.or(self.monitor.crlf),
                raw: other.monitor.raw.or(self.monitor.raw),
                echo: other.monitor.echo.or(self.monitor.echo),
                timestamp: other.monitor.timestamp.or(self.monitor.timestamp),
                rtscts: other.monitor.rtscts.or(self.monitor.rtscts),
                xonxoff: other.monitor.xonxoff.or(self.monitor.xonxoff),
                dsrdtr: other.monitor.dsrdtr.or(self.monitor.dsrdtr),
            },
        }
    }

    pub fn serial_port(&self, role: PortRole) -> Option<&str> {
        match role {
            PortRole::Bootloader => self.serial_port_bootloader.as_deref(),
            PortRole::Run => self.serial_port_run.as_deref(),
        }
        .filter(|p| !p.trim().is_empty())
    }

    pub fn default_baud(&self) -> u32 {
        self.monitor.default_baud.unwrap_or(DEFAULT_BAUD)
    }

    pub fn python_command(&self) -> &str {
        self.python_command
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PYTHON)
    }

    pub fn required_tools_version(&self) -> &str {
        self.required_tools_version
            .as_deref()
            .unwrap_or(DEFAULT_REQUIRED_TOOLS_VERSION)
    }

    pub fn port_source(&self) -> PortSource {
        self.port_source.unwrap_or_default()
    }

    /// Set a scalar by its CLI key name. An empty value clears the key.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let text = || (!value.is_empty()).then(|| value.to_string());
        let path = || (!value.is_empty()).then(|| PathBuf::from(value));

        match key {
            "flash-location" => self.flash_location = path(),
            "serial-port-bootloader" => self.serial_port_bootloader = text(),
            "serial-port-run" => self.serial_port_run = text(),
            "python-command" => self.python_command = text(),
            "xous-core-path" => self.xous_core_path = path(),
            "build-target" => self.build_target = text(),
            "app-name" => self.app_name = text(),
            "required-tools-version" => self.required_tools_version = text(),
            "port-source" => {
                self.port_source = match value {
                    "" => None,
                    "toolchain" => Some(PortSource::Toolchain),
                    "native" => Some(PortSource::Native),
                    other => {
                        return Err(BaoError::Config(format!(
                            "port-source must be 'toolchain' or 'native', got '{}'",
                            other
                        )));
                    }
                }
            }
            "monitor.default-baud" => {
                self.monitor.default_baud = match value {
                    "" => None,
                    v => Some(v.parse().map_err(|_| {
                        BaoError::Config(format!("monitor.default-baud must be a number, got '{}'", v))
                    })?),
                }
            }
            "monitor.default-port" => {
                self.monitor.default_port = match value {
                    "" => None,
                    "run" => Some(PortRole::Run),
                    "bootloader" => Some(PortRole::Bootloader),
                    other => {
                        return Err(BaoError::Config(format!(
                            "monitor.default-port must be 'run' or 'bootloader', got '{}'",
                            other
                        )));
                    }
                }
            }
            "monitor.crlf" => self.monitor.crlf = parse_flag(key, value)?,
            "monitor.raw" => self.monitor.raw = parse_flag(key, value)?,
            "monitor.echo" => self.monitor.echo = parse_flag(key, value)?,
            "monitor.timestamp" => self.monitor.timestamp = parse_flag(key, value)?,
            "monitor.rtscts" => self.monitor.rtscts = parse_flag(key, value)?,
            "monitor.xonxoff" => self.monitor.xonxoff = parse_flag(key, value)?,
            "monitor.dsrdtr" => self.monitor.dsrdtr = parse_flag(key, value)?,
            other => {
                return Err(BaoError::Config(format!("Unknown configuration key: {}", other)));
            }
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<Option<bool>> {
    match value {
        "" => Ok(None),
        "true" | "on" | "yes" | "1" => Ok(Some(true)),
        "false" | "off" | "no" | "0" => Ok(Some(false)),
        other => Err(BaoError::Config(format!(
            "{} must be true or false, got '{}'",
            key, other
        ))),
    }
}
