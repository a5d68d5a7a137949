//! App listing, selection and scaffolding

use anyhow::Result;
use std::process::ExitCode;

use crate::cli::args::AppsCommands;
use crate::cli::session::Session;
use crate::config::ConfigStore;
use crate::models::{FollowUp, Notice};
use crate::services::{apps_dir, list_apps, missing_apps, scaffold_app};
use crate::ui::Prompter;

pub async fn execute_apps_command(
    session: &Session,
    command: Option<AppsCommands>,
) -> Result<ExitCode> {
    let root = session.xous_core_root()?;

    match command.unwrap_or(AppsCommands::List) {
        AppsCommands::List => {
            let apps = list_apps(&root);
            if apps.is_empty() {
                println!(
                    "⚠️  No apps found under {}. Create one with: baobrew apps new <NAME>",
                    apps_dir(&root).display()
                );
                return Ok(ExitCode::SUCCESS);
            }

            let selected = session.config.snapshot().app_name.unwrap_or_default();
            let selected: Vec<&str> = selected.split_whitespace().collect();
            println!("📱 Apps in {}:", apps_dir(&root).display());
            for app in &apps {
                let marker = if selected.contains(&app.as_str()) {
                    " (selected)"
                } else {
                    ""
                };
                println!("  - {}{}", app, marker);
            }
            Ok(ExitCode::SUCCESS)
        }
        AppsCommands::Select { names } => {
            let missing = missing_apps(&root, &names);
            if !missing.is_empty() {
                session.prompter.notify(
                    Notice::error(format!(
                        "Not found under {}: {}",
                        apps_dir(&root).display(),
                        missing.join(", ")
                    ))
                    .with_follow_up(FollowUp::SelectApp),
                );
                return Ok(ExitCode::FAILURE);
            }

            let value = names.join(" ");
            session
                .config
                .update(&mut |config| config.app_name = Some(value.clone()))?;
            println!("✅ Bao app set to {}", value);
            Ok(ExitCode::SUCCESS)
        }
        AppsCommands::New { name } => {
            let name = name.trim().to_string();
            let app_dir = match scaffold_app(&root, &name) {
                Ok(dir) => dir,
                Err(e) => {
                    session.prompter.notify(Notice::error(e.detail()));
                    return Ok(ExitCode::FAILURE);
                }
            };
            session
                .config
                .update(&mut |config| config.app_name = Some(name.clone()))?;
            println!("✅ Created {} and selected app \"{}\"", app_dir.display(), name);
            Ok(ExitCode::SUCCESS)
        }
    }
}
