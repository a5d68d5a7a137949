//! CLI command implementations

pub mod apps;
pub mod artifacts;
pub mod boot;
pub mod build;
pub mod config;
pub mod flash;
pub mod monitor;
pub mod ports;

use crate::cli::args::Commands;
use crate::cli::session::Session;
use anyhow::Result;
use std::process::ExitCode;

/// Execute a CLI command
pub async fn execute_command(command: Commands, session: &Session) -> Result<ExitCode> {
    match command {
        Commands::Flash { force_all } => flash::execute_flash_command(session, force_all).await,
        Commands::FlashBootMonitor { no_monitor } => {
            flash::execute_flash_boot_monitor_command(session, !no_monitor).await
        }
        Commands::BuildFlashMonitor { no_monitor } => {
            flash::execute_build_flash_monitor_command(session, !no_monitor).await
        }
        Commands::Build => build::execute_build_command(session).await,
        Commands::Clean => build::execute_clean_command(session).await,
        Commands::Targets => build::execute_targets_command(session).await,
        Commands::Apps { command } => apps::execute_apps_command(session, command).await,
        Commands::Boot => boot::execute_boot_command(session).await,
        Commands::Ports => ports::execute_ports_command(session).await,
        Commands::WaitPort {
            role,
            timeout_ms,
            interval_ms,
        } => {
            ports::execute_wait_port_command(
                session,
                role.role().unwrap_or_default(),
                timeout_ms,
                interval_ms,
            )
            .await
        }
        Commands::Artifacts => artifacts::execute_artifacts_command(session).await,
        Commands::Monitor { role } => monitor::execute_monitor_command(session, role.role()).await,
        Commands::Config { command } => config::execute_config_command(session, command).await,
    }
}
