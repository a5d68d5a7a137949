//! Build, clean and target listing

use anyhow::Result;
use std::process::ExitCode;

use crate::cli::session::{ProgressPrinter, Session};
use crate::config::ConfigStore;
use crate::models::Notice;
use crate::services::{ensure_build_prereqs, list_build_targets};
use crate::toolchain::{CargoRunner, FirmwareBuilder, SystemRust, Toolchain, XtaskBuilder};
use crate::ui::Prompter;

pub async fn execute_build_command(session: &Session) -> Result<ExitCode> {
    let toolchain = session.toolchain().await?;

    let spec = match ensure_build_prereqs(
        toolchain.root(),
        &session.config.snapshot(),
        &SystemRust,
        session.prompter.as_ref(),
    )
    .await
    {
        Ok(spec) => spec,
        Err(failure) => {
            session.prompter.notify(failure.notice());
            return Ok(ExitCode::FAILURE);
        }
    };

    log::info!("🔨 Building {} {}", spec.target, spec.apps.join(" "));
    let builder = XtaskBuilder::new(toolchain.root().to_path_buf(), spec);

    let printer = ProgressPrinter::spawn();
    let result = builder.build(printer.observer.clone()).await;
    printer.finish().await;

    match result {
        Ok(()) => {
            log::info!("✅ Build finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            session
                .prompter
                .notify(Notice::error(format!("Build failed. {}", e)));
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn execute_clean_command(session: &Session) -> Result<ExitCode> {
    let toolchain = session.toolchain().await?;
    let runner = CargoRunner::new(toolchain.root().to_path_buf());

    let printer = ProgressPrinter::spawn();
    let result = runner.clean(printer.observer.clone()).await;
    printer.finish().await;

    match result {
        Ok(()) => {
            log::info!("🧹 Cleaned {}", toolchain.root().display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            session.prompter.notify(Notice::error(e.to_string()));
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn execute_targets_command(session: &Session) -> Result<ExitCode> {
    let toolchain = session.toolchain().await?;
    let targets = list_build_targets(&toolchain).await;
    let current = session.config.snapshot().build_target;

    if targets.is_empty() {
        println!("⚠️  No build targets reported by the toolchain.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("🎯 Build targets:");
    for target in &targets {
        let marker = if current.as_deref() == Some(target.as_str()) {
            " (selected)"
        } else {
            ""
        };
        println!("  - {}{}", target, marker);
    }
    Ok(ExitCode::SUCCESS)
}
