//! Command line argument parsing

use crate::models::PortRole;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "baobrew")]
#[command(about = "Build, flash, boot and monitor Baochip firmware from the terminal")]
pub struct Cli {
    /// Use this settings file instead of the global + workspace pair
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Accept confirmations and take the first choice in menus
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Selects the bootloader-mode or run-mode port
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PortRoleArgs {
    /// Run-mode (firmware) port
    #[arg(long, conflicts_with = "bootloader")]
    pub run: bool,
    /// Bootloader-mode (drive) port
    #[arg(long)]
    pub bootloader: bool,
}

impl PortRoleArgs {
    pub fn role(&self) -> Option<PortRole> {
        match (self.run, self.bootloader) {
            (true, _) => Some(PortRole::Run),
            (_, true) => Some(PortRole::Bootloader),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Copy firmware images to the device drive (version-aware)
    Flash {
        /// Copy every built image without asking the device for its version
        #[arg(long)]
        force_all: bool,
    },
    /// Flash, boot the firmware, wait for the run-mode port and open a monitor
    FlashBootMonitor {
        /// Stop once the run-mode port is back
        #[arg(long)]
        no_monitor: bool,
    },
    /// Build with cargo xtask, then flash, boot and monitor
    BuildFlashMonitor {
        /// Stop once the run-mode port is back
        #[arg(long)]
        no_monitor: bool,
    },
    /// Build the configured target and apps with cargo xtask
    Build,
    /// Run cargo clean in the xous-core tree
    Clean,
    /// List build targets known to the toolchain
    Targets,
    /// List, select or create apps under xous-core/apps-dabao
    Apps {
        #[command(subcommand)]
        command: Option<AppsCommands>,
    },
    /// Send the boot command over the bootloader-mode port
    Boot,
    /// List serial ports
    Ports,
    /// Wait for a configured serial port to appear
    WaitPort {
        #[command(flatten)]
        role: PortRoleArgs,
        /// Give up after this many milliseconds
        #[arg(long, default_value = "20000")]
        timeout_ms: u64,
        /// Poll interval in milliseconds
        #[arg(long, default_value = "500")]
        interval_ms: u64,
    },
    /// Show built firmware images in flash order
    Artifacts,
    /// Open a serial monitor
    Monitor {
        #[command(flatten)]
        role: PortRoleArgs,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AppsCommands {
    /// List apps (the default)
    List,
    /// Build these apps from now on
    Select {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Create a new app and select it
    New { name: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Set the mounted device drive
    SetFlashLocation {
        /// Directory where the BAOCHIP drive is mounted
        dir: PathBuf,
    },
    /// Set a serial port (interactive picker when PORT is omitted)
    SetPort {
        #[command(flatten)]
        role: PortRoleArgs,
        /// Port name, e.g. /dev/ttyACM0 or COM7
        port: Option<String>,
    },
    /// Set a scalar setting, e.g. `monitor.default-baud 115200`. Empty VALUE clears it.
    Set { key: String, value: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flash_force_all() {
        let cli = Cli::try_parse_from(["baobrew", "-vv", "flash", "--force-all"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Flash { force_all: true }));
    }

    #[test]
    fn test_port_role_flags() {
        let cli = Cli::try_parse_from(["baobrew", "monitor", "--bootloader"]).unwrap();
        match cli.command {
            Commands::Monitor { role } => assert_eq!(role.role(), Some(PortRole::Bootloader)),
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["baobrew", "monitor", "--run", "--bootloader"]).is_err());
    }

    #[test]
    fn test_wait_port_defaults() {
        let cli = Cli::try_parse_from(["baobrew", "wait-port", "--run"]).unwrap();
        match cli.command {
            Commands::WaitPort {
                role,
                timeout_ms,
                interval_ms,
            } => {
                assert_eq!(role.role(), Some(PortRole::Run));
                assert_eq!(timeout_ms, 20_000);
                assert_eq!(interval_ms, 500);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_apps_subcommands() {
        let cli = Cli::try_parse_from(["baobrew", "apps"]).unwrap();
        assert!(matches!(cli.command, Commands::Apps { command: None }));

        let cli = Cli::try_parse_from(["baobrew", "apps", "select", "hello", "blinky"]).unwrap();
        match cli.command {
            Commands::Apps {
                command: Some(AppsCommands::Select { names }),
            } => assert_eq!(names, vec!["hello", "blinky"]),
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["baobrew", "apps", "select"]).is_err());
    }

    #[test]
    fn test_config_set_port_with_value() {
        let cli =
            Cli::try_parse_from(["baobrew", "config", "set-port", "--run", "COM7"]).unwrap();
        match cli.command {
            Commands::Config {
                command: ConfigCommands::SetPort { role, port },
            } => {
                assert_eq!(role.role(), Some(PortRole::Run));
                assert_eq!(port.as_deref(), Some("COM7"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
