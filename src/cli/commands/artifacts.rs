//! Artifact listing

use anyhow::Result;
use std::process::ExitCode;

use crate::cli::session::Session;
use crate::models::ArtifactRole;
use crate::services::gather_artifacts;

pub async fn execute_artifacts_command(session: &Session) -> Result<ExitCode> {
    let toolchain = session.toolchain().await?;
    let catalog = gather_artifacts(&toolchain).await;

    if catalog.is_empty() {
        println!("⚠️  No UF2 images found (loader/xous/apps). Build first.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("📦 Images in flash order:");
    for role in ArtifactRole::FLASH_ORDER {
        match catalog.path(role) {
            Some(path) => println!("  {:<6} {}", role.name(), path.display()),
            None => println!("  {:<6} (not built)", role.name()),
        }
    }
    for path in &catalog.unroled {
        println!("  ?      {} (unknown role, never flashed)", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
