//! Settings commands

use anyhow::{Result, bail};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::args::ConfigCommands;
use crate::cli::session::Session;
use crate::config::{ConfigStore, FileConfigStore};
use crate::services::{PortSelector, list_build_targets};

pub async fn execute_config_command(
    session: &Session,
    command: ConfigCommands,
) -> Result<ExitCode> {
    match command {
        ConfigCommands::Show => show(session),
        ConfigCommands::SetFlashLocation { dir } => set_flash_location(session, dir),
        ConfigCommands::SetPort { role, port } => {
            let Some(role) = role.role() else {
                bail!("Pass --run or --bootloader");
            };
            match port {
                Some(port) => {
                    session.config.set_serial_port(role, port.trim())?;
                    println!("✅ {} serial port set to {}", role.friendly_name(), port.trim());
                }
                None => {
                    let selector = PortSelector::new(
                        session.port_lister(None).await?,
                        session.prompter.clone(),
                        session.config.clone(),
                    );
                    match selector.select_and_save(role).await? {
                        Some(port) => {
                            println!("✅ {} serial port set to {}", role.friendly_name(), port)
                        }
                        None => println!("No port selected."),
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommands::Set { key, value } => set_value(session, &key, &value).await,
    }
}

fn show(session: &Session) -> Result<ExitCode> {
    if let Some(global) = FileConfigStore::global_path() {
        println!("# global:    {}", global.display());
    }
    println!("# workspace: {}", session.config.writable_path().display());
    println!("{}", toml::to_string_pretty(&session.config.snapshot())?);
    Ok(ExitCode::SUCCESS)
}

fn set_flash_location(session: &Session, dir: PathBuf) -> Result<ExitCode> {
    if !dir.is_dir() {
        log::warn!(
            "⚠️  {} is not mounted right now; saving it anyway",
            dir.display()
        );
    }
    session.config.set_flash_location(&dir)?;
    println!("✅ Flash location set to {}", dir.display());
    Ok(ExitCode::SUCCESS)
}

async fn set_value(session: &Session, key: &str, value: &str) -> Result<ExitCode> {
    // Reject bad keys and values before touching the file
    let mut candidate = session.config.snapshot();
    candidate.set_key(key, value)?;

    if key == "build-target" && !value.trim().is_empty() {
        match session.toolchain().await {
            Ok(toolchain) => {
                let targets = list_build_targets(&toolchain).await;
                if !targets.is_empty() && !targets.iter().any(|t| t == value.trim()) {
                    bail!(
                        "Unknown build target '{}'. Known targets: {}",
                        value.trim(),
                        targets.join(", ")
                    );
                }
            }
            Err(e) => log::debug!("Skipping build target validation: {}", e),
        }
    }

    let mut result = Ok(());
    session
        .config
        .update(&mut |settings| result = settings.set_key(key, value))?;
    result?;

    if value.trim().is_empty() {
        println!("✅ Cleared {}", key);
    } else {
        println!("✅ {} = {}", key, value.trim());
    }
    Ok(ExitCode::SUCCESS)
}
