//! Apps under `xous-core/apps-dabao/`

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::errors::{BaoError, Result};

/// App directory, relative to the xous-core root
pub const APPS_DIR: &str = "apps-dabao";

pub fn apps_dir(root: &Path) -> PathBuf {
    root.join(APPS_DIR)
}

/// Directories under `apps-dabao/` that carry a `Cargo.toml`, sorted
pub fn list_apps(root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(apps_dir(root)) else {
        return Vec::new();
    };
    let mut apps: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().join("Cargo.toml").is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    apps.sort();
    apps
}

pub fn app_exists(root: &Path, name: &str) -> bool {
    apps_dir(root).join(name).join("Cargo.toml").is_file()
}

/// Names from `apps` that have no app directory
pub fn missing_apps(root: &Path, apps: &[String]) -> Vec<String> {
    apps.iter()
        .filter(|name| !app_exists(root, name))
        .cloned()
        .collect()
}

fn app_name_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").ok())
        .as_ref()
}

/// Letters, digits, `-` and `_`, starting with a letter
pub fn is_valid_app_name(name: &str) -> bool {
    app_name_regex().is_some_and(|re| re.is_match(name))
}

fn cargo_toml(name: &str) -> String {
    format!(
        r#"[package]
name = "{name}"
version = "0.1.0"
edition = "2021"

[dependencies]
"#
    )
}

const MAIN_RS: &str = r#"#![no_std]
#![no_main]

use core::panic::PanicInfo;

#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {}
}

#[no_mangle]
pub extern "C" fn main() -> ! {
    loop {}
}
"#;

/// Create `apps-dabao/<name>/` with a minimal no_std crate. Returns the app directory.
pub fn scaffold_app(root: &Path, name: &str) -> Result<PathBuf> {
    if !is_valid_app_name(name) {
        return Err(BaoError::Config(format!(
            "Invalid app name '{}': use letters, numbers, - and _, starting with a letter",
            name
        )));
    }

    let app_dir = apps_dir(root).join(name);
    if app_dir.exists() {
        return Err(BaoError::Config(format!(
            "App folder already exists: {}",
            app_dir.display()
        )));
    }

    fs::create_dir_all(app_dir.join("src"))?;
    fs::write(app_dir.join("Cargo.toml"), cargo_toml(name))?;
    fs::write(app_dir.join("src").join("main.rs"), MAIN_RS)?;
    log::info!("Created app {} at {}", name, app_dir.display());
    Ok(app_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app(root: &Path, name: &str) {
        let dir = apps_dir(root).join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Cargo.toml"), cargo_toml(name)).unwrap();
    }

    #[test]
    fn test_list_apps_requires_manifest() {
        let root = TempDir::new().unwrap();
        app(root.path(), "hello");
        app(root.path(), "blinky");
        fs::create_dir_all(apps_dir(root.path()).join("notes")).unwrap();
        fs::write(apps_dir(root.path()).join("README.md"), "apps").unwrap();

        assert_eq!(list_apps(root.path()), vec!["blinky", "hello"]);
    }

    #[test]
    fn test_list_apps_without_apps_dir() {
        let root = TempDir::new().unwrap();
        assert!(list_apps(root.path()).is_empty());
    }

    #[test]
    fn test_missing_apps() {
        let root = TempDir::new().unwrap();
        app(root.path(), "hello");
        let wanted = vec!["hello".to_string(), "nope".to_string()];
        assert_eq!(missing_apps(root.path(), &wanted), vec!["nope"]);
    }

    #[test]
    fn test_app_names() {
        assert!(is_valid_app_name("hello"));
        assert!(is_valid_app_name("hello-world_2"));
        assert!(!is_valid_app_name("2fast"));
        assert!(!is_valid_app_name("-dash"));
        assert!(!is_valid_app_name("has space"));
        assert!(!is_valid_app_name(""));
    }

    #[test]
    fn test_scaffold_app() {
        let root = TempDir::new().unwrap();
        let dir = scaffold_app(root.path(), "hello").unwrap();

        assert!(app_exists(root.path(), "hello"));
        assert!(dir.join("src").join("main.rs").is_file());
        let manifest = fs::read_to_string(dir.join("Cargo.toml")).unwrap();
        assert!(manifest.contains("name = \"hello\""));

        let err = scaffold_app(root.path(), "hello").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(scaffold_app(root.path(), "9lives").is_err());
    }
}
