//! Configuration repository
//!
//! Collaborators read and write settings through [`ConfigStore`] instead of
//! touching files directly, so tests can inject a [`MemoryConfigStore`].

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::app_config::AppConfig;
use crate::errors::{BaoError, Result};
use crate::models::PortRole;

/// Workspace-scoped settings file, relative to the working directory
pub const WORKSPACE_CONFIG_FILE: &str = ".baobrew.toml";

/// Typed access to persisted settings
pub trait ConfigStore: Send + Sync {
    /// Current effective configuration
    fn snapshot(&self) -> AppConfig;

    /// Apply `change` to the writable scope and persist it
    fn update(&self, change: &mut dyn FnMut(&mut AppConfig)) -> Result<()>;

    fn flash_location(&self) -> Option<PathBuf> {
        self.snapshot()
            .flash_location
            .filter(|p| !p.as_os_str().is_empty())
    }

    fn set_flash_location(&self, path: &Path) -> Result<()> {
        let path = path.to_path_buf();
        self.update(&mut |config| config.flash_location = Some(path.clone()))
    }

    fn serial_port(&self, role: PortRole) -> Option<String> {
        self.snapshot().serial_port(role).map(str::to_string)
    }

    fn set_serial_port(&self, role: PortRole, port: &str) -> Result<()> {
        let port = port.trim().to_string();
        self.update(&mut |config| match role {
            PortRole::Bootloader => config.serial_port_bootloader = Some(port.clone()),
            PortRole::Run => config.serial_port_run = Some(port.clone()),
        })
    }

    fn default_baud(&self) -> u32 {
        self.snapshot().default_baud()
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: Mutex<AppConfig>,
}

impl MemoryConfigStore {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn snapshot(&self) -> AppConfig {
        match self.config.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, change: &mut dyn FnMut(&mut AppConfig)) -> Result<()> {
        let mut guard = self
            .config
            .lock()
            .map_err(|_| BaoError::Config("configuration lock poisoned".to_string()))?;
        change(&mut guard);
        Ok(())
    }
}

/// File-backed store with a read-only global layer and a writable workspace layer
#[derive(Debug)]
pub struct FileConfigStore {
    global: Option<PathBuf>,
    workspace: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    /// Global file under the user config dir, workspace file in `workspace_dir`
    pub fn discover(workspace_dir: &Path) -> Self {
        Self {
            global: Self::global_path(),
            workspace: workspace_dir.join(WORKSPACE_CONFIG_FILE),
            write_lock: Mutex::new(()),
        }
    }

    /// A single explicit file, used for both reads and writes
    pub fn single(path: PathBuf) -> Self {
        Self {
            global: None,
            workspace: path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("baobrew").join("config.toml"))
    }

    /// File that receives writes
    pub fn writable_path(&self) -> &Path {
        &self.workspace
    }

    fn read_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn load_layers(&self) -> Result<AppConfig> {
        let global = match &self.global {
            Some(path) => Self::read_file(path)?,
            None => AppConfig::default(),
        };
        let workspace = Self::read_file(&self.workspace)?;
        Ok(global.overlay(workspace))
    }
}

impl ConfigStore for FileConfigStore {
    fn snapshot(&self) -> AppConfig {
        match self.load_layers() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring unreadable configuration: {}", e);
                AppConfig::default()
            }
        }
    }

    fn update(&self, change: &mut dyn FnMut(&mut AppConfig)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| BaoError::Config("configuration lock poisoned".to_string()))?;

        let mut config = Self::read_file(&self.workspace)?;
        change(&mut config);

        if let Some(parent) = self.workspace.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.workspace, toml::to_string_pretty(&config)?)?;
        log::debug!("Saved configuration to {}", self.workspace.display());
        Ok(())
    }
}
