//! Serial port listing and waiting

use anyhow::Result;
use std::process::ExitCode;
use std::time::Duration;

use crate::cli::session::{ProgressPrinter, Session};
use crate::config::ConfigStore;
use crate::models::{FollowUp, Notice, PortRole};
use crate::services::{default_port_wait, wait_for_port};
use crate::ui::Prompter;
use crate::utils::poll::PollConfig;

pub async fn execute_ports_command(session: &Session) -> Result<ExitCode> {
    let lister = session.port_lister(None).await?;
    let ports = lister.list_ports().await?;

    if ports.is_empty() {
        println!("⚠️  No serial ports found.");
        return Ok(ExitCode::SUCCESS);
    }

    let run = session.config.serial_port(PortRole::Run);
    let bootloader = session.config.serial_port(PortRole::Bootloader);

    println!("🔌 Found {} serial port(s):", ports.len());
    for entry in &ports {
        let mut roles = Vec::new();
        if run.as_deref() == Some(entry.name.as_str()) {
            roles.push("run");
        }
        if bootloader.as_deref() == Some(entry.name.as_str()) {
            roles.push("bootloader");
        }
        let roles = if roles.is_empty() {
            String::new()
        } else {
            format!(" [{}]", roles.join(", "))
        };
        match &entry.description {
            Some(description) => println!("  - {} ({}){}", entry.name, description, roles),
            None => println!("  - {}{}", entry.name, roles),
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn execute_wait_port_command(
    session: &Session,
    role: PortRole,
    timeout_ms: u64,
    interval_ms: u64,
) -> Result<ExitCode> {
    let Some(port) = session.config.serial_port(role) else {
        session.prompter.notify(
            Notice::info(format!("{} serial port not set.", role.friendly_name()))
                .with_follow_up(FollowUp::set_port(role)),
        );
        return Ok(ExitCode::FAILURE);
    };

    let lister = session.port_lister(None).await?;
    let wait = PollConfig::new(
        Duration::from_millis(timeout_ms),
        Duration::from_millis(interval_ms.max(1)),
    )
    .with_grace(default_port_wait().grace);

    log::info!("⏳ Waiting up to {} ms for {}", timeout_ms, port);
    let printer = ProgressPrinter::spawn();
    let found = wait_for_port(lister.as_ref(), &port, wait, &*printer.observer).await;
    printer.finish().await;

    if found {
        println!("✅ {} is present", port);
        Ok(ExitCode::SUCCESS)
    } else {
        session.prompter.notify(Notice::warning(format!(
            "{} did not appear within {} ms.",
            port, timeout_ms
        )));
        Ok(ExitCode::FAILURE)
    }
}
