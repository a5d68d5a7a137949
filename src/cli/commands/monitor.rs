//! Serial monitor command implementation

use anyhow::Result;
use std::process::ExitCode;

use crate::cli::session::Session;
use crate::config::ConfigStore;
use crate::models::{FollowUp, Notice, PortRole};
use crate::services::PortSelector;
use crate::toolchain::{BaoMonitor, MonitorLauncher};
use crate::ui::Prompter;

/// Attach to the port for `role`, falling back to `monitor.defaultPort`
pub async fn execute_monitor_command(
    session: &Session,
    role: Option<PortRole>,
) -> Result<ExitCode> {
    let settings = session.config.snapshot();
    let role = role.or(settings.monitor.default_port).unwrap_or_default();
    let toolchain = session.toolchain().await?;

    let port = match session.config.serial_port(role) {
        Some(port) => port,
        None => {
            let selector = PortSelector::new(
                session.port_lister(Some(&toolchain)).await?,
                session.prompter.clone(),
                session.config.clone(),
            );
            match selector.select_and_save(role).await? {
                Some(port) => port,
                None => {
                    session.prompter.notify(
                        Notice::info(format!("{} serial port not set.", role.friendly_name()))
                            .with_follow_up(FollowUp::set_port(role)),
                    );
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    };

    let baud = settings.default_baud();
    log::info!("📺 Monitoring {} at {} baud (Ctrl+C to exit)", port, baud);
    let monitor = BaoMonitor::new(toolchain, settings.monitor);
    monitor.attach(&port, baud).await?;
    Ok(ExitCode::SUCCESS)
}
